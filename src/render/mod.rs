//! Target-language machinery: descriptors for each supported output
//! language, the registry mapping selection keys to targets, and the
//! generation engine that renders an [`ArgumentParserSpec`] into files.
//!
//! Generation runs in two phases: first every output file's effective
//! path and newline sequence is resolved, then each file is rendered,
//! newline-normalized, encoded, and written in declared order. The split
//! keeps newline auto-detection testable on its own, and makes the write
//! order explicit — when file 2 of 2 fails, file 1 has already been
//! overwritten.

pub mod text;

mod c;
mod java;
mod python;

use crate::argspec::{Argument, ArgumentKind, ArgumentParserSpec};
use minijinja::Environment;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use text::{Newline, TextEncoding};
use thiserror::Error;

/// A supported output language.
#[derive(Debug)]
pub struct TargetLanguage {
    /// Short unique identifier used for selection (e.g. in `--language`).
    pub key: &'static str,
    /// Human-friendly display name.
    pub name: &'static str,
    /// The files this target produces, in the order output paths must be
    /// supplied.
    pub output_files: Vec<OutputFileInfo>,
}

/// Description of one file produced by a target.
#[derive(Debug)]
pub struct OutputFileInfo {
    /// Short description for display to users (e.g. "header file").
    pub name: &'static str,
    /// Path written when the caller does not specify one.
    pub default_path: &'static str,
    /// Identifier of the template rendered into this file.
    pub template_name: &'static str,
    /// Embedded template body resolved by `template_name`.
    pub template_source: &'static str,
    /// Comment pair delimiting the replaceable region in inline mode.
    pub begin_marker: &'static str,
    pub end_marker: &'static str,
}

/// Pairing of an output file with its resolved path and newline sequence.
/// Built per generation call and discarded after writing.
struct OutputFile<'a> {
    info: &'a OutputFileInfo,
    path: PathBuf,
    newline: &'static str,
}

/// Per-call settings for [`TargetLanguage::generate`].
#[derive(Debug, Default)]
pub struct GenerateOptions<'a> {
    /// Explicit output paths; the count must equal the target's declared
    /// file count. Absent means every file goes to its default path.
    pub output_paths: Option<&'a [PathBuf]>,
    /// Text encoding name for every output file; absent means UTF-8.
    pub encoding: Option<&'a str>,
    /// Line terminator for generated output; absent means auto-detect per
    /// file from its existing contents, falling back to the platform
    /// newline when the file does not exist.
    pub newline: Option<Newline>,
    /// Replace the region between each file's begin/end markers instead of
    /// overwriting the whole file. Every output file must already exist.
    pub inline: bool,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
    #[error("unable to determine newline character sequence in file: {} ({source})", path.display())]
    NewlineDetect {
        path: PathBuf,
        source: io::Error,
    },
    #[error("unable to decode characters from file using encoding {encoding}: {} ({cause})", path.display())]
    Decode {
        encoding: String,
        path: PathBuf,
        cause: String,
    },
    #[error("unable to render template {template}: {source}")]
    Render {
        template: String,
        source: minijinja::Error,
    },
    #[error("unable to encode generated code using encoding {encoding}: {} \
             (character {character:?} at position {position} is not representable)", path.display())]
    Encode {
        encoding: String,
        path: PathBuf,
        character: char,
        position: usize,
    },
    #[error("unable to write file: {} ({source})", path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("unable to read file for inline generation: {} ({source})", path.display())]
    InlineRead {
        path: PathBuf,
        source: io::Error,
    },
    #[error("marker {marker:?} not found in file: {}", path.display())]
    MarkerNotFound {
        marker: &'static str,
        path: PathBuf,
    },
}

/// Every built-in target, keyed for selection. Keys are unique by
/// construction; iteration order is sorted, which keeps listings stable.
pub fn registry() -> BTreeMap<&'static str, TargetLanguage> {
    [c::target(), java::target(), python::target()]
        .into_iter()
        .map(|target| (target.key, target))
        .collect()
}

impl TargetLanguage {
    /// Render `spec` into this target's output files.
    ///
    /// # Panics
    ///
    /// Panics when `options.output_paths` is present with a length other
    /// than `self.output_files.len()`. That mismatch is a bug in the
    /// caller, not user input; user-facing validation belongs in front of
    /// this call.
    pub fn generate(
        &self,
        spec: &ArgumentParserSpec,
        options: &GenerateOptions,
    ) -> Result<(), GenerateError> {
        let paths: Vec<PathBuf> = match options.output_paths {
            Some(paths) => {
                assert_eq!(
                    paths.len(),
                    self.output_files.len(),
                    "target {} requires {} output files, but {} paths were supplied",
                    self.key,
                    self.output_files.len(),
                    paths.len()
                );
                paths.to_vec()
            }
            None => self
                .output_files
                .iter()
                .map(|info| PathBuf::from(info.default_path))
                .collect(),
        };

        let encoding_name = options.encoding.unwrap_or(text::DEFAULT_ENCODING);
        let encoding = TextEncoding::resolve(encoding_name)
            .ok_or_else(|| GenerateError::UnknownEncoding(encoding_name.to_string()))?;

        // Phase 1: resolve the effective (path, newline) pair per file.
        let mut outputs = Vec::with_capacity(self.output_files.len());
        for (info, path) in self.output_files.iter().zip(paths) {
            let newline = match options.newline {
                Some(newline) => newline.as_str(),
                None => resolve_newline(&path, encoding, encoding_name)?,
            };
            outputs.push(OutputFile {
                info,
                path,
                newline,
            });
        }

        // Phase 2: render, normalize, encode, write — in declared order.
        let mut env = Environment::new();
        for info in &self.output_files {
            env.add_template(info.template_name, info.template_source)
                .map_err(|source| GenerateError::Render {
                    template: info.template_name.to_string(),
                    source,
                })?;
        }
        let context = spec_context(spec);

        for output in &outputs {
            let rendered = env
                .get_template(output.info.template_name)
                .and_then(|template| template.render(&context))
                .map_err(|source| GenerateError::Render {
                    template: output.info.template_name.to_string(),
                    source,
                })?;
            let body = text::normalize_newlines(&rendered, output.newline);

            let content = if options.inline {
                let existing = read_text(&output.path, encoding, encoding_name)?;
                splice(&existing, &body, output.info, &output.path)?
            } else {
                body
            };

            let bytes =
                encoding
                    .encode(&content)
                    .map_err(|unencodable| GenerateError::Encode {
                        encoding: encoding_name.to_string(),
                        path: output.path.clone(),
                        character: unencodable.character,
                        position: unencodable.position,
                    })?;
            fs::write(&output.path, bytes).map_err(|source| GenerateError::Write {
                path: output.path.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

/// Determine the newline sequence to use for `path`: the first terminator
/// already present in the file, or the platform newline when the file does
/// not exist yet.
fn resolve_newline(
    path: &Path,
    encoding: TextEncoding,
    encoding_name: &str,
) -> Result<&'static str, GenerateError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(text::platform_newline()),
        Err(source) => {
            return Err(GenerateError::NewlineDetect {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let content = encoding
        .decode(&bytes)
        .map_err(|cause| GenerateError::Decode {
            encoding: encoding_name.to_string(),
            path: path.to_path_buf(),
            cause,
        })?;
    Ok(text::detect_newline(&content).unwrap_or_else(text::platform_newline))
}

fn read_text(
    path: &Path,
    encoding: TextEncoding,
    encoding_name: &str,
) -> Result<String, GenerateError> {
    let bytes = fs::read(path).map_err(|source| GenerateError::InlineRead {
        path: path.to_path_buf(),
        source,
    })?;
    encoding.decode(&bytes).map_err(|cause| GenerateError::Decode {
        encoding: encoding_name.to_string(),
        path: path.to_path_buf(),
        cause,
    })
}

/// Replace the lines between the begin and end markers of `existing` with
/// `body`, keeping the marker lines and everything around them untouched.
fn splice(
    existing: &str,
    body: &str,
    info: &OutputFileInfo,
    path: &Path,
) -> Result<String, GenerateError> {
    let begin = existing
        .find(info.begin_marker)
        .ok_or_else(|| GenerateError::MarkerNotFound {
            marker: info.begin_marker,
            path: path.to_path_buf(),
        })?;
    let insert_at = end_of_line(existing, begin + info.begin_marker.len());
    let end = existing[insert_at..]
        .find(info.end_marker)
        .map(|offset| insert_at + offset)
        .ok_or_else(|| GenerateError::MarkerNotFound {
            marker: info.end_marker,
            path: path.to_path_buf(),
        })?;
    let resume_at = start_of_line(existing, end);

    let mut out = String::with_capacity(existing.len() + body.len());
    out.push_str(&existing[..insert_at]);
    out.push_str(body);
    out.push_str(&existing[resume_at..]);
    Ok(out)
}

/// Index just past the line terminator following `from` (or the end of
/// the text when the last line is unterminated).
fn end_of_line(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => return i + 1,
            b'\r' => {
                return if bytes.get(i + 1) == Some(&b'\n') {
                    i + 2
                } else {
                    i + 1
                }
            }
            _ => i += 1,
        }
    }
    text.len()
}

/// Index of the first character of the line containing `from`.
fn start_of_line(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = from;
    while i > 0 {
        match bytes[i - 1] {
            b'\n' | b'\r' => return i,
            _ => i -= 1,
        }
    }
    0
}

/// The view of one argument exposed to templates.
#[derive(Serialize)]
struct ArgumentView {
    keys: Vec<String>,
    help_text: Option<String>,
    /// Identifier derived from the keys, usable as a variable name.
    variable_name: String,
    /// The single longest key.
    descriptive_key: Option<String>,
    /// All keys joined with `/`.
    display: String,
    is_help: bool,
}

impl ArgumentView {
    fn new(argument: &Argument) -> Self {
        ArgumentView {
            keys: argument.keys.clone(),
            help_text: argument.help_text.clone(),
            variable_name: argument.variable_name(),
            descriptive_key: argument.most_descriptive_key().map(str::to_string),
            display: argument.to_string(),
            is_help: argument.kind == ArgumentKind::BuiltinHelp,
        }
    }
}

fn spec_context(spec: &ArgumentParserSpec) -> minijinja::Value {
    minijinja::context! {
        arguments => spec.arguments.iter().map(ArgumentView::new).collect::<Vec<_>>(),
        help_argument => spec.help_argument.as_ref().map(ArgumentView::new),
    }
}

//! cligen — generate command-line argument parsers from an XML
//! specification.
//!
//! Reads a specification document describing the arguments a program
//! accepts and writes, for the chosen target language, source code
//! implementing a matching parser:
//!
//! ```text
//! cligen -l python -o src/myapp_args.py myapp.xml
//! ```
//!
//! Languages with more than one output file (C: source + header) take one
//! `-o` per file, in the language's declared order. With `--inline`, the
//! generated code replaces the region between the language's begin/end
//! marker comments in existing files instead of overwriting them.

mod argspec;
mod render;
mod xml;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use render::text::Newline;
use render::{GenerateOptions, TargetLanguage};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cligen",
    about = "Generate command-line argument parsers from an XML specification"
)]
struct Cli {
    /// The specification file to compile
    #[arg(default_value = "cligen.xml")]
    source_file: PathBuf,

    /// The file to which to write the generated parser; target languages
    /// with more than one output file require this to be given once per
    /// file, in order. Defaults to language-specific file names.
    #[arg(short = 'o', long = "output-file")]
    output_files: Vec<PathBuf>,

    /// The target language whose parser to generate
    #[arg(short = 'l', long)]
    language: Option<String>,

    /// Insert the generated code between an existing file's begin/end
    /// marker comments instead of overwriting the whole file
    #[arg(long, overrides_with = "no_inline")]
    inline: bool,

    /// Reverse the effect of --inline if previously specified
    #[arg(long, overrides_with = "inline")]
    no_inline: bool,

    /// The text encoding for output files (default: utf-8)
    #[arg(long)]
    encoding: Option<String>,

    /// The newline sequence for output files; omit to match each existing
    /// output file, or the platform convention for new files
    #[arg(long, value_enum)]
    newline: Option<NewlineArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum NewlineArg {
    Lf,
    Cr,
    Crlf,
}

impl From<NewlineArg> for Newline {
    fn from(arg: NewlineArg) -> Newline {
        match arg {
            NewlineArg::Lf => Newline::Lf,
            NewlineArg::Cr => Newline::Cr,
            NewlineArg::Crlf => Newline::CrLf,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let targets = render::registry();

    let language = match cli.language.as_deref() {
        Some(language) => language,
        None => bail!("-l/--language not specified"),
    };
    let target = match targets.get(language) {
        Some(target) => target,
        None => bail!(
            "unknown language: {} (valid values are: {})",
            language,
            targets.keys().copied().collect::<Vec<_>>().join(", ")
        ),
    };

    let inline = cli.inline && !cli.no_inline;
    check_output_file_count(target, &cli.output_files)?;
    let output_paths = if cli.output_files.is_empty() {
        None
    } else {
        Some(cli.output_files.as_slice())
    };

    let spec = xml::parse_file(&cli.source_file).with_context(|| {
        format!(
            "failed to parse specification file: {}",
            cli.source_file.display()
        )
    })?;

    target
        .generate(
            &spec,
            &GenerateOptions {
                output_paths,
                encoding: cli.encoding.as_deref(),
                newline: cli.newline.map(Into::into),
                inline,
            },
        )
        .with_context(|| format!("failed to generate {} parser", target.name))?;

    Ok(())
}

/// Validate that the number of `-o` arguments matches the chosen
/// language's output file count. Zero is always fine (defaults apply).
fn check_output_file_count(target: &TargetLanguage, output_files: &[PathBuf]) -> Result<()> {
    let given = output_files.len();
    let required = target.output_files.len();
    if given == 0 || given == required {
        return Ok(());
    }
    if given < required {
        bail!(
            "missing -o/--output-file argument for language {} to specify the generated {}",
            target.name,
            target.output_files[given].name
        );
    }
    bail!(
        "too many -o/--output-file arguments specified for language {}: {} (expected {})",
        target.name,
        given,
        required
    );
}

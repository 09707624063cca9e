//! Parser for the XML specification document.
//!
//! Converts a document in the `http://schemas.cligen.io/arguments`
//! namespace into an [`ArgumentParserSpec`]. Unrecognized elements and
//! foreign namespaces are ignored so that older generators keep working
//! when the document format grows.

use crate::argspec::{Argument, ArgumentKind, ArgumentParserSpec};
use roxmltree::Node;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Namespace every recognized element must live in.
pub const NAMESPACE: &str = "http://schemas.cligen.io/arguments";

/// Required local name of the root element.
pub const ROOT_TAG: &str = "cligen";

#[derive(Debug, Error)]
pub enum ParseError {
    /// I/O failure reading the specification file. Passed through untouched
    /// so callers can tell a missing file apart from a malformed document.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The text could not be parsed as XML at all. Carries the underlying
    /// parser's message, including its position diagnostics.
    #[error("{0}")]
    Xml(String),
    /// Well-formed XML that is not a valid specification document.
    #[error("{0}")]
    Schema(String),
}

/// Parse the specification document at `path`.
pub fn parse_file(path: &Path) -> Result<ArgumentParserSpec, ParseError> {
    let text = fs::read_to_string(path)?;
    parse_str(&text)
}

/// Parse a specification document held in memory.
pub fn parse_str(text: &str) -> Result<ArgumentParserSpec, ParseError> {
    let document = roxmltree::Document::parse(text).map_err(|e| ParseError::Xml(e.to_string()))?;
    parse_root(document.root_element())
}

fn parse_root(root: Node) -> Result<ArgumentParserSpec, ParseError> {
    if root.tag_name().namespace() != Some(NAMESPACE) || root.tag_name().name() != ROOT_TAG {
        return Err(ParseError::Schema(format!(
            "incorrect tag name of XML root element: {} (expected {{{}}}{})",
            qualified_name(&root),
            NAMESPACE,
            ROOT_TAG
        )));
    }

    let mut arguments = Vec::new();
    let mut add_builtin_help = true;

    for child in root.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(NAMESPACE) {
            continue;
        }
        match child.tag_name().name() {
            "argument" => arguments.push(parse_argument(child)),
            "options" => parse_options(child, &mut add_builtin_help)?,
            _ => {}
        }
    }

    let help_argument = if add_builtin_help {
        let help = Argument::builtin_help();
        arguments.push(help.clone());
        Some(help)
    } else {
        None
    };

    Ok(ArgumentParserSpec::new(arguments, help_argument))
}

fn parse_argument(element: Node) -> Argument {
    let mut keys = Vec::new();
    let mut help_text = None;

    for child in element.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(NAMESPACE) {
            continue;
        }
        match child.tag_name().name() {
            "key" => keys.push(trimmed_text(child)),
            // first help element wins
            "help" => {
                if help_text.is_none() {
                    help_text = Some(trimmed_text(child));
                }
            }
            _ => {}
        }
    }

    Argument {
        keys,
        kind: ArgumentKind::StringValue,
        help_text,
    }
}

/// Apply one `options` element. Later elements overwrite earlier settings
/// field by field, so this mutates the caller's accumulated state.
fn parse_options(element: Node, add_builtin_help: &mut bool) -> Result<(), ParseError> {
    for child in element.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(NAMESPACE) {
            continue;
        }
        if child.tag_name().name() == "add-builtin-help-argument" {
            *add_builtin_help = parse_bool(child)?;
        }
    }
    Ok(())
}

fn parse_bool(element: Node) -> Result<bool, ParseError> {
    let text = trimmed_text(element);
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::Schema(format!(
            "invalid text in element {}: {} (expected \"true\" or \"false\")",
            qualified_name(&element),
            text
        )))
    }
}

fn trimmed_text(element: Node) -> String {
    element.text().unwrap_or("").trim().to_string()
}

/// Render a tag the way a fully-qualified XML name reads: `{namespace}local`
/// when a namespace is present, the bare local name otherwise.
fn qualified_name(node: &Node) -> String {
    match node.tag_name().namespace() {
        Some(ns) => format!("{{{}}}{}", ns, node.tag_name().name()),
        None => node.tag_name().name().to_string(),
    }
}

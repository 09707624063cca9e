//! Data model for an argument-parser specification — target-agnostic.

use std::fmt;

/// Complete specification of a parser to generate, as produced by the
/// XML parser or built directly by callers.
///
/// Comparison is structural: two specs built from the same logical content
/// compare equal regardless of how they were constructed. Values are never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentParserSpec {
    /// Arguments in display and generation order.
    pub arguments: Vec<Argument>,
    /// The argument that triggers help-and-exit behavior, when one exists.
    /// Must be value-equal to an element of `arguments`.
    pub help_argument: Option<Argument>,
}

impl ArgumentParserSpec {
    pub fn new(arguments: Vec<Argument>, help_argument: Option<Argument>) -> Self {
        ArgumentParserSpec {
            arguments,
            help_argument,
        }
    }
}

/// One named command-line flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Textual aliases in display order (e.g. `["-o", "--output-file"]`).
    /// May be empty.
    pub keys: Vec<String>,
    pub kind: ArgumentKind,
    pub help_text: Option<String>,
}

/// What an argument does when matched on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Consumes the next token as a string value.
    StringValue,
    /// Prints the generated help text, then the program exits successfully.
    BuiltinHelp,
}

impl Argument {
    pub fn new<K>(keys: K, kind: ArgumentKind, help_text: Option<&str>) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Argument {
            keys: keys.into_iter().map(Into::into).collect(),
            kind,
            help_text: help_text.map(str::to_string),
        }
    }

    /// The `-h`/`--help` argument synthesized when a specification does not
    /// disable it.
    pub fn builtin_help() -> Self {
        Argument::new(
            ["-h", "--help"],
            ArgumentKind::BuiltinHelp,
            Some("Print the help information then exit"),
        )
    }

    /// The single longest key, for use where only one alias can be shown.
    /// Ties are broken by first occurrence in `keys`.
    pub fn most_descriptive_key(&self) -> Option<&str> {
        let mut best: Option<&str> = None;
        for key in &self.keys {
            if best.is_none_or(|b| key.len() > b.len()) {
                best = Some(key);
            }
        }
        best
    }

    /// An identifier usable as a variable name in generated code: the
    /// alphanumeric characters of whichever key yields the longest filtered
    /// string. Ties are broken by first occurrence in `keys`.
    pub fn variable_name(&self) -> String {
        let mut best = String::new();
        for key in &self.keys {
            let filtered: String = key.chars().filter(|c| c.is_alphanumeric()).collect();
            if filtered.len() > best.len() {
                best = filtered;
            }
        }
        best
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keys.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_argument(keys: &[&str]) -> Argument {
        Argument::new(keys.iter().copied(), ArgumentKind::StringValue, None)
    }

    #[test]
    fn spec_equality_is_structural() {
        let a = ArgumentParserSpec::new(vec![string_argument(&["-n", "--name"])], None);
        let b = ArgumentParserSpec::new(vec![string_argument(&["-n", "--name"])], None);
        assert_eq!(a, b);
    }

    #[test]
    fn spec_inequality_on_arguments() {
        let a = ArgumentParserSpec::new(vec![string_argument(&["-n"])], None);
        let b = ArgumentParserSpec::new(vec![string_argument(&["-t"])], None);
        assert_ne!(a, b);
    }

    #[test]
    fn spec_inequality_on_help_argument() {
        let help = Argument::builtin_help();
        let a = ArgumentParserSpec::new(vec![help.clone()], Some(help));
        let b = ArgumentParserSpec::new(vec![Argument::builtin_help()], None);
        assert_ne!(a, b);
    }

    #[test]
    fn argument_equality_over_all_fields() {
        let a = Argument::new(["-q"], ArgumentKind::StringValue, Some("Keep quiet"));
        let b = Argument::new(["-q"], ArgumentKind::StringValue, Some("Keep quiet"));
        assert_eq!(a, b);
        assert_ne!(a, Argument::new(["-q"], ArgumentKind::StringValue, None));
        assert_ne!(a, Argument::new(["-q"], ArgumentKind::BuiltinHelp, Some("Keep quiet")));
    }

    #[test]
    fn display_joins_keys() {
        let arg = string_argument(&["-i", "--input-file"]);
        assert_eq!(arg.to_string(), "-i/--input-file");
    }

    #[test]
    fn display_empty_keys() {
        assert_eq!(string_argument(&[]).to_string(), "");
    }

    #[test]
    fn most_descriptive_key_picks_longest() {
        let arg = string_argument(&["-i", "--input-file"]);
        assert_eq!(arg.most_descriptive_key(), Some("--input-file"));
    }

    #[test]
    fn most_descriptive_key_tie_prefers_first() {
        let arg = string_argument(&["--alpha", "--bravo"]);
        assert_eq!(arg.most_descriptive_key(), Some("--alpha"));
    }

    #[test]
    fn most_descriptive_key_empty() {
        assert_eq!(string_argument(&[]).most_descriptive_key(), None);
    }

    #[test]
    fn variable_name_filters_alphanumerics() {
        let arg = string_argument(&["-i", "--input-file"]);
        assert_eq!(arg.variable_name(), "inputfile");
    }

    #[test]
    fn variable_name_longest_filtered_wins() {
        // "--a-b-c" filters to "abc", shorter than "verbose" from "-verbose"
        let arg = string_argument(&["--a-b-c", "-verbose"]);
        assert_eq!(arg.variable_name(), "verbose");
    }

    #[test]
    fn variable_name_tie_prefers_first() {
        let arg = string_argument(&["--one", "--two"]);
        assert_eq!(arg.variable_name(), "one");
    }

    #[test]
    fn variable_name_empty_keys() {
        assert_eq!(string_argument(&[]).variable_name(), "");
    }

    #[test]
    fn builtin_help_shape() {
        let help = Argument::builtin_help();
        assert_eq!(help.keys, vec!["-h", "--help"]);
        assert_eq!(help.kind, ArgumentKind::BuiltinHelp);
        assert_eq!(
            help.help_text.as_deref(),
            Some("Print the help information then exit")
        );
    }
}

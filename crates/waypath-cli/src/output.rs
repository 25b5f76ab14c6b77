//! Output format selection shared by the subcommands.

use std::fmt;
use std::str::FromStr;

/// How a command result is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Graphviz DOT of the whole graph, route highlighted.
    Dot,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Dot => "dot",
        };
        f.write_str(value)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            other => Err(format!(
                "unknown output format '{other}'; expected one of: text, json, dot"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("graphviz".parse::<OutputFormat>(), Ok(OutputFormat::Dot));
        assert_eq!("plain".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Dot] {
            assert_eq!(format.to_string().parse::<OutputFormat>(), Ok(format));
        }
    }
}

use thiserror::Error;

use crate::types::Kind;

#[derive(Debug, Error)]
pub enum ConfError {
    #[error("invalid value {value:?} for env var {var}: {source}")]
    EnvValue {
        value: String,
        var: String,
        source: ParseError,
    },

    #[cfg(feature = "clap")]
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("error parsing redact tag: parsing {text:?}: invalid syntax")]
    RedactTag { text: String },

    #[error("flag redefined: {0}")]
    FlagRedefined(String),
}

impl ConfError {
    /// Print the error and terminate the process.
    ///
    /// Argument errors go through clap, which prints usage (or the requested
    /// help) and picks the exit code. Everything else prints `error: <msg>` to
    /// stderr and exits with status 2.
    pub fn exit(&self) -> ! {
        #[cfg(feature = "clap")]
        if let ConfError::Args(err) = self {
            err.exit()
        }
        eprintln!("error: {self}");
        std::process::exit(2)
    }
}

/// Text that could not be parsed into a value of the given kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parsing {value:?} as {kind}: {reason}")]
pub struct ParseError {
    pub value: String,
    pub kind: Kind,
    pub reason: String,
}

impl ParseError {
    pub fn new(value: &str, kind: Kind, reason: &str) -> Self {
        Self {
            value: value.to_string(),
            kind,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_value_formats_correctly() {
        let err = ConfError::EnvValue {
            value: "notanint".into(),
            var: "MYAPP_PORT".into(),
            source: ParseError::new("notanint", Kind::Int, "invalid syntax"),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"notanint\""));
        assert!(msg.contains("MYAPP_PORT"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn redact_tag_formats() {
        let err = ConfError::RedactTag {
            text: "notbool".into(),
        };
        assert_eq!(
            err.to_string(),
            "error parsing redact tag: parsing \"notbool\": invalid syntax"
        );
    }

    #[test]
    fn flag_redefined_formats() {
        let err = ConfError::FlagRedefined("server-port".into());
        assert!(err.to_string().contains("server-port"));
    }

    #[test]
    fn parse_error_names_kind() {
        let err = ParseError::new("x", Kind::Duration, "invalid duration");
        assert_eq!(err.to_string(), "parsing \"x\" as duration: invalid duration");
    }
}

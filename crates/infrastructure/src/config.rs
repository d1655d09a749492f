//! Encoder configuration

use serde::Deserialize;
use tracing::warn;

/// Environment variable enabling pretty output (`1` or `true`).
pub const PRETTY_ENV: &str = "JSONAPI_PRETTY";

/// Environment variable holding the pretty indent width in spaces.
pub const INDENT_ENV: &str = "JSONAPI_INDENT";

const DEFAULT_INDENT: &str = "  ";

/// Layout of the encoded JSON.
///
/// The default is compact output without a trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Pretty-print with `indent` per nesting level.
    pub pretty: bool,
    /// Indent used when `pretty` is set.
    pub indent: String,
    /// Append a newline after the document.
    pub trailing_newline: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: DEFAULT_INDENT.to_string(),
            trailing_newline: false,
        }
    }
}

impl EncoderConfig {
    /// Compact output.
    #[must_use]
    pub fn compact() -> Self {
        Self::default()
    }

    /// Pretty output with a two-space indent and a trailing newline.
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            indent: DEFAULT_INDENT.to_string(),
            trailing_newline: true,
        }
    }

    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pretty = lookup(PRETTY_ENV).is_some_and(|value| {
            matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true")
        });
        let mut config = if pretty {
            Self::pretty()
        } else {
            Self::compact()
        };

        if let Some(raw) = lookup(INDENT_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(width) => config.indent = " ".repeat(width),
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid {INDENT_ENV}"),
            }
        }
        config
    }
}

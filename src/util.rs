use std::env;

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

pub const VAR_API_URL: &str = "COURTSIDE_API_URL";
pub const VAR_DATA_DIR: &str = "COURTSIDE_DATA_DIR";
pub const VAR_LOG_CONFIG: &str = "COURTSIDE_LOG_CONFIG";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_DATA_DIR: &str = ".courtside";
pub const LOG_CONFIG_PATH: &str = "log4rs.yaml";

const FALLBACK_LOG_PATTERN: &str = "{d(%H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Generates a closed enum whose variants serialize to fixed labels, with
/// `ALL`, `label()`, `Display` and a case-insensitive `FromStr`.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::util::UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| $crate::util::UnknownLabel {
                        kind: stringify!($name),
                        value: wanted.to_string(),
                    })
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Loads `log4rs.yaml` (or `COURTSIDE_LOG_CONFIG`), falling back to an info
/// level stderr appender when the file is missing or invalid.
pub fn init_logging() {
    let path = env::var(VAR_LOG_CONFIG).unwrap_or(String::from(LOG_CONFIG_PATH));
    if log4rs::init_file(&path, Default::default()).is_ok() {
        return;
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_LOG_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info));

    match config {
        Ok(config) => {
            if log4rs::init_config(config).is_ok() {
                log::debug!("no usable log config at {path}, logging to stderr");
            }
        }
        Err(e) => eprintln!("Failed to configure logging: {e}"),
    }
}

/// Last six characters of a token, for log lines.
pub fn get_short_token(token: &str) -> &str {
    let start = token
        .char_indices()
        .rev()
        .nth(5)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &token[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_token_keeps_tail() {
        assert_eq!(get_short_token("eyJhbGciOiJIUzI1NiJ9.abcdef"), "abcdef");
        assert_eq!(get_short_token("abc"), "abc");
        assert_eq!(get_short_token(""), "");
    }
}

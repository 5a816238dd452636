//! Viewer options — the `:set`-style settings string.
//!
//! Options can be set at startup through the `N_VIEW_OPTIONS` environment
//! variable, using the same `name=value` syntax as Vim's `:set`:
//!
//! ```text
//! N_VIEW_OPTIONS="ts=4 mt=10" n-view notes.txt
//! ```
//!
//! # Option names
//!
//! Both full names and abbreviations are accepted:
//!
//! | Full name        | Abbrev | Type    | Default | Range   |
//! |------------------|--------|---------|---------|---------|
//! | `tabstop`        | `ts`   | integer | 8       | 1..=32  |
//! | `messagetimeout` | `mt`   | seconds | 5       | 0..     |
//!
//! A bad entry does not stop the others from applying; every problem is
//! returned so the caller can report them together.

use std::time::Duration;

use tracing::debug;

use crate::error::Error;
use crate::message::DEFAULT_MESSAGE_TIMEOUT;
use crate::row::DEFAULT_TAB_STOP;

/// Environment variable read by [`Options::from_env`].
pub const OPTIONS_ENV: &str = "N_VIEW_OPTIONS";

/// Largest accepted tab stop.
pub const MAX_TAB_STOP: usize = 32;

/// A parsed settings entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option=value` — assign a value.
    Assign(String, String),

    /// `option` with no value.
    Bare(String),
}

/// Returns `true` if `name` is a known option (full name or abbreviation).
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    matches!(name, "tabstop" | "ts" | "messagetimeout" | "mt")
}

/// Split a settings string into directives.
///
/// Entries are separated by whitespace. An empty string yields nothing.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    args.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single entry.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    match arg.split_once('=') {
        Some((name, value)) => SetDirective::Assign(name.to_string(), value.to_string()),
        None => SetDirective::Bare(arg.to_string()),
    }
}

/// Settings for one viewing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Tab stop width used to build each row's render form.
    pub tab_stop: usize,

    /// How long a status message stays on screen.
    pub message_timeout: Duration,

    /// Banner shown on an empty document.
    pub welcome: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            welcome: format!("n-view -- version {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Options {
    /// Defaults overridden by `N_VIEW_OPTIONS`, if set.
    ///
    /// Returns the options along with any entries that could not be applied.
    #[must_use]
    pub fn from_env() -> (Self, Vec<Error>) {
        let mut options = Self::default();
        let errors = std::env::var(OPTIONS_ENV)
            .map(|value| options.apply_all(&value))
            .unwrap_or_default();
        (options, errors)
    }

    /// Apply every entry in `args`, collecting the ones that fail.
    pub fn apply_all(&mut self, args: &str) -> Vec<Error> {
        parse_set(args)
            .into_iter()
            .filter_map(|directive| self.apply(directive).err())
            .collect()
    }

    /// Apply one directive.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownOption`] for a name that does not exist, and
    /// [`Error::InvalidOption`] for a missing or out-of-range value.
    pub fn apply(&mut self, directive: SetDirective) -> Result<(), Error> {
        let (name, value) = match directive {
            SetDirective::Assign(name, value) => (name, value),
            SetDirective::Bare(name) if is_known_option(&name) => {
                return Err(Error::InvalidOption {
                    name,
                    value: String::new(),
                });
            }
            SetDirective::Bare(name) => return Err(Error::UnknownOption(name)),
        };

        let invalid = || Error::InvalidOption {
            name: name.clone(),
            value: value.clone(),
        };

        match name.as_str() {
            "tabstop" | "ts" => {
                let n: usize = value.parse().map_err(|_| invalid())?;
                if !(1..=MAX_TAB_STOP).contains(&n) {
                    return Err(invalid());
                }
                self.tab_stop = n;
            }
            "messagetimeout" | "mt" => {
                let secs: u64 = value.parse().map_err(|_| invalid())?;
                self.message_timeout = Duration::from_secs(secs);
            }
            _ => return Err(Error::UnknownOption(name.clone())),
        }

        debug!(%name, %value, "option set");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── parse_set ────────────────────────────────────────────────────────

    #[test]
    fn parse_empty() {
        assert!(parse_set("").is_empty());
        assert!(parse_set("   ").is_empty());
    }

    #[test]
    fn parse_assign_and_bare() {
        assert_eq!(
            parse_set("ts=4  tabstop"),
            vec![
                SetDirective::Assign("ts".into(), "4".into()),
                SetDirective::Bare("tabstop".into()),
            ]
        );
    }

    #[test]
    fn parse_assign_empty_value() {
        assert_eq!(
            parse_set_arg("ts="),
            SetDirective::Assign("ts".into(), String::new())
        );
    }

    #[test]
    fn known_names() {
        for name in ["tabstop", "ts", "messagetimeout", "mt"] {
            assert!(is_known_option(name), "{name}");
        }
        assert!(!is_known_option("number"));
    }

    // ── Options ──────────────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert_eq!(opts.tab_stop, 8);
        assert_eq!(opts.message_timeout, Duration::from_secs(5));
        assert!(opts.welcome.starts_with("n-view -- version "));
    }

    #[test]
    fn apply_full_names_and_abbreviations() {
        let mut opts = Options::default();
        assert!(opts.apply_all("tabstop=4 messagetimeout=2").is_empty());
        assert_eq!(opts.tab_stop, 4);
        assert_eq!(opts.message_timeout, Duration::from_secs(2));

        assert!(opts.apply_all("ts=2 mt=0").is_empty());
        assert_eq!(opts.tab_stop, 2);
        assert_eq!(opts.message_timeout, Duration::ZERO);
    }

    #[test]
    fn tab_stop_out_of_range() {
        let mut opts = Options::default();
        let errors = opts.apply_all("ts=0 ts=33");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "invalid value for ts: 0");
        assert_eq!(opts.tab_stop, 8);
    }

    #[test]
    fn errors_do_not_block_other_entries() {
        let mut opts = Options::default();
        let errors = opts.apply_all("wrap ts=x mt=9 ts");
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "unknown option: wrap",
                "invalid value for ts: x",
                "invalid value for ts: ",
            ]
        );
        assert_eq!(opts.message_timeout, Duration::from_secs(9));
    }

    #[test]
    fn unknown_assignment() {
        let mut opts = Options::default();
        let err = opts
            .apply(SetDirective::Assign("foo".into(), "1".into()))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownOption(name) if name == "foo"));
    }
}

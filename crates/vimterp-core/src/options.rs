//! Interpreter options and the `:set` command.
//!
//! [`Options`] deserializes from a config file (every field optional) and
//! changes at runtime through `:set`.
//!
//! # Supported syntax
//!
//! | Syntax            | Effect                        |
//! |-------------------|-------------------------------|
//! | `:set option`     | Enable boolean / show numeric |
//! | `:set nooption`   | Disable boolean               |
//! | `:set invoption`  | Toggle boolean                |
//! | `:set option!`    | Toggle boolean                |
//! | `:set option?`    | Query current value           |
//! | `:set option=N`   | Assign numeric value          |
//! | `:set`            | Show changed options          |
//! | `:set all`        | Show all options              |
//!
//! # Options
//!
//! | Full name    | Abbrev | Type    | Default | Effect                              |
//! |--------------|--------|---------|---------|-------------------------------------|
//! | `shiftwidth` | `sw`   | integer | 4       | indent unit of `>` / `<`            |
//! | `expandtab`  | `et`   | bool    | true    | indent with spaces instead of a tab |
//! | `hlsearch`   | `hls`  | bool    | true    | decorate search matches             |
//! | `clipboard`  | `cb`   | bool    | true    | mirror yanks to the host clipboard  |

use serde::Deserialize;

use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Runtime options. Missing config keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub shiftwidth: usize,
    pub expandtab: bool,
    pub hlsearch: bool,
    pub clipboard: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            shiftwidth: 4,
            expandtab: true,
            hlsearch: true,
            clipboard: true,
        }
    }
}

/// Which option a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionId {
    ShiftWidth,
    ExpandTab,
    HlSearch,
    Clipboard,
}

impl OptionId {
    const ALL: [Self; 4] = [Self::ShiftWidth, Self::ExpandTab, Self::HlSearch, Self::Clipboard];

    fn lookup(name: &str) -> Option<Self> {
        match name {
            "shiftwidth" | "sw" => Some(Self::ShiftWidth),
            "expandtab" | "et" => Some(Self::ExpandTab),
            "hlsearch" | "hls" => Some(Self::HlSearch),
            "clipboard" | "cb" => Some(Self::Clipboard),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::ShiftWidth => "shiftwidth",
            Self::ExpandTab => "expandtab",
            Self::HlSearch => "hlsearch",
            Self::Clipboard => "clipboard",
        }
    }

    const fn is_bool(self) -> bool {
        !matches!(self, Self::ShiftWidth)
    }
}

impl Options {
    /// The string one level of `>` inserts.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.expandtab {
            " ".repeat(self.shiftwidth)
        } else {
            "\t".to_string()
        }
    }

    /// Apply one `:set` directive. Queries and listings return the text to
    /// show; plain assignments return `None`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidOption`] for an unknown name, a boolean
    /// operation on a numeric option, or a value that does not parse.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>> {
        match directive {
            SetDirective::ShowAll => Ok(Some(self.describe(&OptionId::ALL))),
            SetDirective::ShowChanged => {
                let defaults = Self::default();
                let changed: Vec<OptionId> = OptionId::ALL
                    .into_iter()
                    .filter(|&id| self.format(id) != defaults.format(id))
                    .collect();
                Ok(Some(self.describe(&changed)))
            }
            SetDirective::Query(name) => Ok(Some(self.format(lookup(name)?))),
            SetDirective::On(name) => {
                let id = lookup(name)?;
                if id.is_bool() {
                    self.set_bool(id, true);
                    Ok(None)
                } else {
                    Ok(Some(self.format(id)))
                }
            }
            SetDirective::Off(name) => {
                let id = lookup_bool(name)?;
                self.set_bool(id, false);
                Ok(None)
            }
            SetDirective::Toggle(name) => {
                let id = lookup_bool(name)?;
                let value = self.get_bool(id);
                self.set_bool(id, !value);
                Ok(None)
            }
            SetDirective::Assign(name, value) => {
                let id = lookup(name)?;
                match id {
                    OptionId::ShiftWidth => {
                        self.shiftwidth = value
                            .parse()
                            .ok()
                            .filter(|&width| width > 0)
                            .ok_or_else(|| EngineError::InvalidOption(format!("{name}={value}")))?;
                    }
                    _ => {
                        let parsed = match value.as_str() {
                            "true" | "1" | "on" => true,
                            "false" | "0" | "off" => false,
                            _ => {
                                return Err(EngineError::InvalidOption(format!("{name}={value}")));
                            }
                        };
                        self.set_bool(id, parsed);
                    }
                }
                Ok(None)
            }
        }
    }

    const fn get_bool(&self, id: OptionId) -> bool {
        match id {
            OptionId::ExpandTab => self.expandtab,
            OptionId::HlSearch => self.hlsearch,
            OptionId::Clipboard => self.clipboard,
            OptionId::ShiftWidth => false,
        }
    }

    const fn set_bool(&mut self, id: OptionId, value: bool) {
        match id {
            OptionId::ExpandTab => self.expandtab = value,
            OptionId::HlSearch => self.hlsearch = value,
            OptionId::Clipboard => self.clipboard = value,
            OptionId::ShiftWidth => {}
        }
    }

    fn format(&self, id: OptionId) -> String {
        match id {
            OptionId::ShiftWidth => format!("shiftwidth={}", self.shiftwidth),
            _ => format_bool(id.name(), self.get_bool(id)),
        }
    }

    fn describe(&self, ids: &[OptionId]) -> String {
        ids.iter()
            .map(|&id| self.format(id))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn lookup(name: &str) -> Result<OptionId> {
    OptionId::lookup(name).ok_or_else(|| EngineError::InvalidOption(name.to_string()))
}

fn lookup_bool(name: &str) -> Result<OptionId> {
    Some(lookup(name)?)
        .filter(|id| id.is_bool())
        .ok_or_else(|| EngineError::InvalidOption(name.to_string()))
}

// ---------------------------------------------------------------------------
// :set parsing
// ---------------------------------------------------------------------------

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option`: enable a boolean option.
    On(String),

    /// `:set nooption`: disable a boolean option.
    Off(String),

    /// `:set option!` / `:set invoption`: toggle a boolean option.
    Toggle(String),

    /// `:set option?`: query the current value.
    Query(String),

    /// `:set option=value`: assign a value.
    Assign(String, String),

    /// `:set` with no arguments.
    ShowChanged,

    /// `:set all`.
    ShowAll,
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    OptionId::lookup(name).is_some_and(OptionId::is_bool)
}

/// Parse the full `:set` arguments string into directives.
///
/// Several space-separated arguments are allowed (`:set sw=2 noet`). An
/// empty argument string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // `no` / `inv` prefixes only count when the rest names a boolean.
    if let Some(name) = arg.strip_prefix("no").filter(|n| is_bool_option(n)) {
        return SetDirective::Off(name.to_string());
    }
    if let Some(name) = arg.strip_prefix("inv").filter(|n| is_bool_option(n)) {
        return SetDirective::Toggle(name.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

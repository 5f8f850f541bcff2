//! Quoting tables for the supported shell dialects.
//!
//! Each dialect exposes up to three pure string transforms:
//! - `escape` prefixes every special character with the dialect's escape
//!   character and adds no delimiters
//! - `strong` wraps the value in the dialect's literal (non-interpolating)
//!   quotes
//! - `weak` wraps the value in the dialect's interpolating quotes and only
//!   escapes what would end the quoted region
//!
//! The tables are plain `static` data built from function pointers, so they
//! can be shared across threads without synchronization.

use std::fmt;

mod bash;
mod cmd;
mod powershell;

pub use bash::BASH_QUOTING;
pub(crate) use cmd::has_line_break;
pub use cmd::CMD_QUOTING;
pub use powershell::POWERSHELL_QUOTING;

/// Signature shared by every quoting transform.
pub type QuoteFn = fn(&str) -> String;

/// How a single value should be rendered for the target shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QuotingMode {
    /// Character-by-character escaping, no surrounding delimiters.
    Escape,
    /// Fully literal quoting.
    Strong,
    /// Quoting that keeps the dialect's own interpolation alive.
    Weak,
}

impl QuotingMode {
    pub const ALL: [Self; 3] = [Self::Escape, Self::Strong, Self::Weak];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Escape => "escape",
            Self::Strong => "strong",
            Self::Weak => "weak",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "escape" => Some(Self::Escape),
            "strong" => Some(Self::Strong),
            "weak" => Some(Self::Weak),
            _ => None,
        }
    }
}

impl fmt::Display for QuotingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw value paired with the quoting mode it must be rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedString {
    pub value: String,
    pub mode: QuotingMode,
}

impl QuotedString {
    pub fn new(value: impl Into<String>, mode: QuotingMode) -> Self {
        Self {
            value: value.into(),
            mode,
        }
    }

    pub fn escaped(value: impl Into<String>) -> Self {
        Self::new(value, QuotingMode::Escape)
    }

    pub fn strong(value: impl Into<String>) -> Self {
        Self::new(value, QuotingMode::Strong)
    }

    pub fn weak(value: impl Into<String>) -> Self {
        Self::new(value, QuotingMode::Weak)
    }
}

/// The `{escape, strong, weak}` triple for one dialect.
///
/// `strong` is optional: cmd.exe has no quoting primitive that disables
/// interpolation, so its table leaves the slot empty and requests for it
/// surface as [`crate::QuotingError::UnsupportedMode`].
#[derive(Clone, Copy)]
pub struct QuotingFunctions {
    name: &'static str,
    escape: QuoteFn,
    strong: Option<QuoteFn>,
    weak: QuoteFn,
}

impl QuotingFunctions {
    /// Short identifier of the dialect the table belongs to.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Looks up the transform for `mode`, if the dialect provides one.
    pub fn function(&self, mode: QuotingMode) -> Option<QuoteFn> {
        match mode {
            QuotingMode::Escape => Some(self.escape),
            QuotingMode::Strong => self.strong,
            QuotingMode::Weak => Some(self.weak),
        }
    }

    pub fn supports(&self, mode: QuotingMode) -> bool {
        self.function(mode).is_some()
    }

    /// The most literal mode the dialect offers: `Strong` when available,
    /// `Escape` otherwise.
    pub fn strongest_mode(&self) -> QuotingMode {
        if self.strong.is_some() {
            QuotingMode::Strong
        } else {
            QuotingMode::Escape
        }
    }

    pub(crate) fn strongest(&self) -> QuoteFn {
        self.strong.unwrap_or(self.escape)
    }

    pub fn escape(&self, value: &str) -> String {
        (self.escape)(value)
    }

    /// Returns `None` for dialects without a strong quoting primitive.
    pub fn strong(&self, value: &str) -> Option<String> {
        self.strong.map(|quote| quote(value))
    }

    pub fn weak(&self, value: &str) -> String {
        (self.weak)(value)
    }
}

impl fmt::Debug for QuotingFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuotingFunctions")
            .field("name", &self.name)
            .field("strong", &self.strong.is_some())
            .finish()
    }
}

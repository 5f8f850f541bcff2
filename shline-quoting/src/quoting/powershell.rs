//! PowerShell (Windows PowerShell and the cross-platform `pwsh`).
//!
//! See <https://learn.microsoft.com/powershell/module/microsoft.powershell.core/about/about_quoting_rules>.
//! PowerShell treats the typographic quotes as aliases of `'` and `"`, so they
//! are handled everywhere their ASCII counterparts are.

use super::QuotingFunctions;

pub static POWERSHELL_QUOTING: QuotingFunctions = QuotingFunctions {
    name: "powershell",
    escape,
    strong: Some(strong),
    weak,
};

const SINGLE_QUOTES: &[char] = &['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];
const DOUBLE_QUOTES: &[char] = &['"', '\u{201C}', '\u{201D}', '\u{201E}'];
const METACHARACTERS: &[char] = &[
    '`', '(', ')', '{', '}', '<', '>', '|', '&', ';', ',', '$', '@', '#',
];

fn is_special(ch: char) -> bool {
    ch.is_ascii_whitespace()
        || METACHARACTERS.contains(&ch)
        || SINGLE_QUOTES.contains(&ch)
        || DOUBLE_QUOTES.contains(&ch)
}

fn escape(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    let mut out = String::with_capacity(value.len() * 2);
    for ch in value.chars() {
        match ch {
            // A backtick before a line break continues the line instead.
            '\n' => out.push_str("`n"),
            '\r' => out.push_str("`r"),
            '\t' => out.push_str("`t"),
            ch if is_special(ch) => {
                out.push('`');
                out.push(ch);
            }
            ch => out.push(ch),
        }
    }
    out
}

fn strong(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if SINGLE_QUOTES.contains(&ch) {
            out.push(ch);
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

fn weak(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        // A lone backtick would swallow or reinterpret whatever follows it.
        if ch == '`' || DOUBLE_QUOTES.contains(&ch) {
            out.push('`');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

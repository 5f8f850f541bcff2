//! POSIX-like shells (bash, sh, zsh, dash, ksh).
//!
//! See <https://www.gnu.org/software/bash/manual/html_node/Quoting.html>.

use super::QuotingFunctions;

pub static BASH_QUOTING: QuotingFunctions = QuotingFunctions {
    name: "bash",
    escape,
    strong: Some(strong),
    weak,
};

/// Characters that carry meaning for the shell outside of quotes.
const METACHARACTERS: &[char] = &[
    '\\', '\'', '"', '(', ')', '{', '}', '[', ']', '<', '>', '|', '&', ';', '$', '`', '*', '?',
    '!', '#', '~', '^',
];

fn escape(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    let mut out = String::with_capacity(value.len() * 2);
    for ch in value.chars() {
        match ch {
            // A backslash-newline pair is a line continuation, not a literal newline.
            '\n' => out.push_str("'\n'"),
            ch if ch.is_ascii_whitespace() || METACHARACTERS.contains(&ch) => {
                out.push('\\');
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
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\'' {
            // Close the literal region, emit the quote run double-quoted, reopen.
            out.push_str("'\"'");
            while chars.next_if_eq(&'\'').is_some() {
                out.push('\'');
            }
            out.push_str("\"'");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

fn weak(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => {
                out.push('\\');
                // Inside double quotes a backslash only escapes these.
                if matches!(chars.peek(), None | Some('$' | '`' | '"' | '\\' | '\n')) {
                    out.push('\\');
                }
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

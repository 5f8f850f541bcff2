//! Windows command interpreter (`cmd.exe`).
//!
//! cmd.exe has no quoting form that disables `%VAR%` expansion, so the table
//! only provides `escape` and `weak`.
//!
//! A command ends at the first line break, even inside double quotes, and a
//! caret before a line break continues onto the next line and takes its first
//! character literally. No form carries a literal line break, so both modes
//! replace each CR, LF or CRLF with a single space.

use std::borrow::Cow;

use super::QuotingFunctions;

pub static CMD_QUOTING: QuotingFunctions = QuotingFunctions {
    name: "cmd",
    escape,
    strong: None,
    weak,
};

const METACHARACTERS: &[char] = &['^', '"', '(', ')', '%', '!', '<', '>', '&', '|', ';'];

/// Whether `value` holds a line break that cmd.exe quoting will flatten.
pub(crate) fn has_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}

fn flatten_line_breaks(value: &str) -> Cow<'_, str> {
    if !has_line_break(value) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace("\r\n", " ").replace(['\r', '\n'], " "))
}

fn escape(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }

    let value = flatten_line_breaks(value);
    let mut out = String::with_capacity(value.len() * 2);
    for ch in value.chars() {
        if ch.is_ascii_whitespace() || METACHARACTERS.contains(&ch) {
            out.push('^');
        }
        out.push(ch);
    }
    out
}

fn weak(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let value = flatten_line_breaks(value);
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => out.push_str("^\""),
            '^' => {
                out.push('^');
                if matches!(chars.peek(), None | Some('"' | '^')) {
                    out.push('^');
                }
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SNIPPET: &str = r#"setTimeout(() => { console.log(1, "2'3"); }, 100)"#;

    /// Reads one caret-escaped or double-quoted cmd token back into its value.
    fn unquote(token: &str) -> String {
        let mut out = String::new();
        let mut chars = token.chars().peekable();
        let mut quoted = false;
        while let Some(ch) = chars.next() {
            match (ch, quoted) {
                ('"', _) => quoted = !quoted,
                ('^', false) => out.extend(chars.next()),
                ('^', true) => match chars.peek() {
                    Some('"' | '^') => out.extend(chars.next()),
                    _ => out.push('^'),
                },
                (ch, _) => out.push(ch),
            }
        }
        out
    }

    #[test]
    fn escape_uses_carets() {
        assert_eq!(escape("abc"), "abc");
        assert_eq!(escape("ab c"), "ab^ c");
        assert_eq!(escape(r#"ab"c"#), r#"ab^"c"#);
        assert_eq!(escape("ab'c"), "ab'c");
        assert_eq!(escape("ab^ c^"), "ab^^^ c^^");
        assert_eq!(
            escape(SNIPPET),
            r#"setTimeout^(^(^)^ =^>^ {^ console.log^(1,^ ^"2'3^"^)^;^ },^ 100^)"#
        );
    }

    #[test]
    fn escape_blocks_variable_expansion() {
        assert_eq!(escape("%PATH%"), "^%PATH^%");
        assert_eq!(escape("!delayed!"), "^!delayed^!");
        assert_eq!(escape(""), r#""""#);
    }

    #[test]
    fn weak_wraps_in_double_quotes() {
        assert_eq!(weak("abc"), r#""abc""#);
        assert_eq!(weak("ab c"), r#""ab c""#);
        assert_eq!(weak(r#"ab"c"#), r#""ab^"c""#);
        assert_eq!(weak("ab'c"), r#""ab'c""#);
        assert_eq!(weak("ab^ c^"), r#""ab^ c^^""#);
        assert_eq!(
            weak(SNIPPET),
            r#""setTimeout(() => { console.log(1, ^"2'3^"); }, 100)""#
        );
    }

    #[test]
    fn weak_doubles_carets_that_would_escape() {
        assert_eq!(weak("a^^b"), r#""a^^^b""#);
        assert_eq!(weak(r#"^""#), r#""^^^"""#);
    }

    #[test]
    fn both_modes_reconstruct_awkward_inputs() {
        let samples = [
            "",
            "   ",
            "ab^",
            r#"say "hi""#,
            r#"all ^()%!<>&|;" at once"#,
            "a^^b^",
        ];
        for sample in samples {
            assert_eq!(unquote(&escape(sample)), sample, "escape {sample:?}");
            assert_eq!(unquote(&weak(sample)), sample, "weak {sample:?}");
        }
    }

    #[test]
    fn line_breaks_cannot_smuggle_a_second_command() {
        assert_eq!(escape("a\n&calc"), "a^ ^&calc");
        assert_eq!(weak("a\n&calc"), r#""a &calc""#);
        for value in ["a\n&calc", "x\r\n|y", "\r\n", "tail\n"] {
            for rendered in [escape(value), weak(value)] {
                assert!(!rendered.contains(['\r', '\n']), "{rendered:?}");
            }
        }
    }

    #[test]
    fn line_breaks_become_single_spaces() {
        assert_eq!(escape("a\r\nb"), "a^ b");
        assert_eq!(escape("a\rb\nc"), "a^ b^ c");
        assert_eq!(unquote(&escape("one\ntwo")), "one two");
        assert_eq!(unquote(&weak("one\r\ntwo")), "one two");
        assert!(has_line_break("a\rb"));
        assert!(!has_line_break("a b"));
    }
}

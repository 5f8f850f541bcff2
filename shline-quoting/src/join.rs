//! Rendering and joining of [`QuotedString`] values for one dialect.

use crate::error::QuotingError;
use crate::quoting::{QuotedString, QuotingFunctions, QuotingMode};

/// Renders `value` with the transform `table` provides for `mode`.
pub fn render_quoted(
    value: &str,
    mode: QuotingMode,
    table: &QuotingFunctions,
) -> Result<String, QuotingError> {
    let quote = table
        .function(mode)
        .ok_or(QuotingError::UnsupportedMode {
            mode,
            dialect: table.name(),
        })?;
    Ok(quote(value))
}

/// Quotes each value with its own mode and joins the results with single
/// spaces, preserving order. An empty input yields an empty string.
///
/// ```
/// use shline_quoting::{BASH_QUOTING, QuotedString, join_quoted_arguments};
///
/// let args = [QuotedString::strong("echo"), QuotedString::escaped("a b")];
/// let line = join_quoted_arguments(&args, &BASH_QUOTING).unwrap();
/// assert_eq!(line, r"'echo' a\ b");
/// ```
pub fn join_quoted_arguments<'a, I>(
    values: I,
    table: &QuotingFunctions,
) -> Result<String, QuotingError>
where
    I: IntoIterator<Item = &'a QuotedString>,
{
    let rendered = values
        .into_iter()
        .map(|quoted| render_quoted(&quoted.value, quoted.mode, table))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join(" "))
}

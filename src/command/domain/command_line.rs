//! Splitting raw chat input into a command name and argument tail.

/// Splits `/name rest of input` into `("name", "rest of input")`.
///
/// Returns `None` when the input does not start with `/` or names no
/// command. A single separator after the name is consumed; the tail is
/// otherwise returned untouched so that [`super::ArgFormat::parse`] sees the
/// raw text.
///
/// # Examples
///
/// ```
/// use chatcmd::command::domain::split_command_line;
///
/// assert_eq!(split_command_line("/log hello  world"), Some(("log", "hello  world")));
/// assert_eq!(split_command_line("/fortune"), Some(("fortune", "")));
/// assert_eq!(split_command_line("hello"), None);
/// ```
#[must_use]
pub fn split_command_line(input: &str) -> Option<(&str, &str)> {
    let body = input.trim_start().strip_prefix('/')?;
    let (name, tail) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    if name.is_empty() {
        return None;
    }
    Some((name, tail))
}

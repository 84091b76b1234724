//! Argument formats and the argument parser.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ArgumentMismatchError, CommandDomainError};

/// A typed argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgSlot {
    /// Consumes input up to the next whitespace boundary.
    SingleWord,
    /// Consumes all remaining input verbatim.
    RestOfLine,
}

impl ArgSlot {
    /// Returns the compact format character for the slot.
    #[must_use]
    pub const fn format_char(self) -> char {
        match self {
            Self::SingleWord => 'w',
            Self::RestOfLine => 's',
        }
    }

    const fn from_format_char(character: char) -> Option<Self> {
        match character {
            'w' => Some(Self::SingleWord),
            's' => Some(Self::RestOfLine),
            _ => None,
        }
    }
}

impl fmt::Display for ArgSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleWord => f.write_str("word"),
            Self::RestOfLine => f.write_str("text"),
        }
    }
}

/// Ordered argument slots declared by a command.
///
/// At most one [`ArgSlot::RestOfLine`] slot is allowed and it must be the
/// final slot. The invariant is checked on construction, so every
/// `ArgFormat` value is valid.
///
/// # Examples
///
/// ```
/// use chatcmd::command::domain::ArgFormat;
///
/// let format = ArgFormat::parse_format("ws").expect("valid format");
/// let args = format.parse("ping  hello there").expect("input matches");
/// assert_eq!(args.as_slice(), ["ping", "hello there"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArgFormat(Vec<ArgSlot>);

impl ArgFormat {
    /// Creates a format from explicit slots.
    ///
    /// # Errors
    ///
    /// Returns [`CommandDomainError::RestOfLineNotLast`] when a rest-of-line
    /// slot is followed by another slot.
    pub fn new(slots: impl IntoIterator<Item = ArgSlot>) -> Result<Self, CommandDomainError> {
        let slots: Vec<ArgSlot> = slots.into_iter().collect();
        if let Some(index) = slots.iter().position(|slot| *slot == ArgSlot::RestOfLine)
            && index + 1 != slots.len()
        {
            return Err(CommandDomainError::RestOfLineNotLast {
                position: index + 1,
            });
        }
        Ok(Self(slots))
    }

    /// Parses the compact format syntax: `w` for a word, `s` for the rest
    /// of the line.
    ///
    /// # Errors
    ///
    /// Returns [`CommandDomainError::InvalidFormatCharacter`] for unknown
    /// characters, or [`CommandDomainError::RestOfLineNotLast`] when `s` is
    /// not final.
    pub fn parse_format(format: &str) -> Result<Self, CommandDomainError> {
        let slots = format
            .chars()
            .map(|character| {
                ArgSlot::from_format_char(character)
                    .ok_or(CommandDomainError::InvalidFormatCharacter(character))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(slots)
    }

    /// Returns a format that accepts no arguments.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns the declared slots.
    #[must_use]
    pub fn slots(&self) -> &[ArgSlot] {
        &self.0
    }

    /// Returns the number of declared slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the format accepts no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits the text following a command name into typed arguments.
    ///
    /// Leading whitespace is skipped. Each word slot consumes input up to
    /// the next whitespace boundary; a final rest-of-line slot takes the
    /// remainder verbatim with a single trailing line terminator removed.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentMismatchError::Missing`] when a slot cannot be
    /// filled, or [`ArgumentMismatchError::Unexpected`] when input remains
    /// after the last slot.
    pub fn parse(&self, raw_tail: &str) -> Result<ParsedArgs, ArgumentMismatchError> {
        let mut remaining = raw_tail.trim_start();
        let mut values = Vec::with_capacity(self.0.len());

        for (index, slot) in self.0.iter().enumerate() {
            let value = match slot {
                ArgSlot::SingleWord => {
                    let (word, rest) = remaining
                        .split_once(char::is_whitespace)
                        .unwrap_or((remaining, ""));
                    remaining = rest.trim_start();
                    word
                }
                ArgSlot::RestOfLine => {
                    let text = strip_line_terminator(remaining);
                    remaining = "";
                    text
                }
            };

            if value.is_empty() {
                return Err(ArgumentMismatchError::Missing {
                    position: index + 1,
                    expected: *slot,
                });
            }
            values.push(value.to_owned());
        }

        let leftover = remaining.trim_end();
        if !leftover.is_empty() {
            return Err(ArgumentMismatchError::Unexpected {
                remainder: leftover.to_owned(),
            });
        }

        Ok(ParsedArgs(values))
    }
}

impl TryFrom<String> for ArgFormat {
    type Error = CommandDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_format(&value)
    }
}

impl From<ArgFormat> for String {
    fn from(value: ArgFormat) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ArgFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.0 {
            write!(f, "{}", slot.format_char())?;
        }
        Ok(())
    }
}

fn strip_line_terminator(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

/// Arguments produced by [`ArgFormat::parse`], one per declared slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArgs(Vec<String>);

impl ParsedArgs {
    /// Returns the argument at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Returns the first argument.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    /// Returns all arguments in slot order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no arguments were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins the arguments with single spaces.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

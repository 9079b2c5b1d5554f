use crate::frontend::command::Command;
use crate::frontend::error::ParseResult;

pub mod command;
pub mod error;
pub mod token;

/// Cursor over the logical lines of one translation unit.
///
/// Construction strips comments and blank lines, so every remaining line
/// classifies into exactly one [`Command`].
#[derive(Debug)]
pub struct Parser {
    lines: Vec<String>,
    cursor: usize,
    current: Option<Command>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let lines = source.lines().filter_map(logical_line).collect();
        Parser {
            lines,
            cursor: 0,
            current: None,
        }
    }

    pub fn has_more_lines(&self) -> bool {
        self.cursor < self.lines.len()
    }

    /// Classifies the line at the cursor, makes it current and moves on.
    /// Only valid while `has_more_lines` returns true.
    pub fn advance(&mut self) -> ParseResult<&Command> {
        let command = self.lines[self.cursor].parse()?;
        self.cursor += 1;
        Ok(self.current.insert(command))
    }

    /// The most recently classified instruction, `None` before the first
    /// `advance`.
    pub fn current(&self) -> Option<&Command> {
        self.current.as_ref()
    }
}

/// Strips the trailing comment and surrounding whitespace; `None` when
/// nothing remains.
fn logical_line(raw: &str) -> Option<String> {
    let code = match raw.find("//") {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let code = code.trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

//! Suggestion selection
//!
//! Prints the numbered suggestion menu and reads a 1-based choice from the
//! terminal. Anything that is not a number in range fails the invocation.

use std::io::{self, BufRead, Write};

use crossterm::style::{Stylize, style};

use crate::ai::suggestion::Suggestion;
use crate::error::GenerateError;

/// Picks one suggestion out of a list
pub trait Selector {
    /// Returns the 0-based index of the chosen suggestion
    fn select(&mut self, suggestions: &[Suggestion]) -> Result<usize, GenerateError>;
}

/// Convert 1-based user input into a 0-based index into `count` items
pub fn parse_selection(input: &str, count: usize) -> Result<usize, GenerateError> {
    let trimmed = input.trim();
    let invalid = || GenerateError::InvalidSelection {
        input: trimmed.to_string(),
        count,
    };

    let choice: usize = trimmed.parse().map_err(|_| invalid())?;
    if choice == 0 || choice > count {
        return Err(invalid());
    }
    Ok(choice - 1)
}

/// Write the numbered menu
pub fn render_menu<W: Write>(
    out: &mut W,
    suggestions: &[Suggestion],
    color: bool,
) -> io::Result<()> {
    writeln!(out, "\nSuggested Unit Tests:")?;
    for (i, suggestion) in suggestions.iter().enumerate() {
        writeln!(out, "\n{}. {}", i + 1, suggestion.title)?;
        for reason in &suggestion.reasons {
            let line = format!("   - {}", reason);
            if color {
                writeln!(out, "{}", style(line).dark_grey())?;
            } else {
                writeln!(out, "{}", line)?;
            }
        }
    }
    write!(out, "\nSelect unit test: ")?;
    out.flush()
}

/// Menu on a writer, answer from a line reader
pub struct TerminalSelector<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write> TerminalSelector<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
        }
    }
}

impl TerminalSelector<io::StdinLock<'static>, io::Stdout> {
    /// Selector on the process's stdin/stdout
    pub fn stdio(color: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), color)
    }
}

impl<R: BufRead, W: Write> Selector for TerminalSelector<R, W> {
    fn select(&mut self, suggestions: &[Suggestion]) -> Result<usize, GenerateError> {
        render_menu(&mut self.output, suggestions, self.color)?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;

        parse_selection(&line, suggestions.len())
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod selection_tests;

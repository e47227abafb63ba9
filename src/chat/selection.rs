//! Code-selection helpers.
//!
//! The analysis flows send "the code the user is looking at": the selected
//! text, or the trimmed current line when nothing is selected.  The
//! front-end has no editor, so [`SelectionSpec`] describes a selection as
//! `file[:start[-end]]` and loads it from disk.

use std::io;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::host::EditorSelection;

/// The code to analyze: the selection, else the trimmed current line.
///
/// Returns `None` when both are empty.
pub fn selected_code(selection: &EditorSelection) -> Option<String> {
    if !selection.selected_text.is_empty() {
        return Some(selection.selected_text.clone());
    }
    let line = selection.current_line.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// Makes one line of code safe to echo: `"` is doubled and `` ` `` becomes `'`.
pub fn escape_for_display(line: &str) -> String {
    line.replace('"', "\"\"").replace('`', "'")
}

/// Splits code into escaped display lines.
pub fn display_lines(code: &str) -> Vec<String> {
    code.split('\n').map(escape_for_display).collect()
}

/// A file location standing in for an editor selection.
///
/// - `path` selects the whole file
/// - `path:N` puts the cursor on line `N` with nothing selected
/// - `path:N-M` selects lines `N` through `M`
///
/// Line numbers are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSpec {
    /// The file to read.
    pub path: PathBuf,
    /// First line, if a line or range was given.
    pub start: Option<usize>,
    /// Last line, if a range was given.
    pub end: Option<usize>,
}

impl SelectionSpec {
    /// Parses `file[:start[-end]]`.
    pub fn parse(input: &str) -> std::result::Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("requires a file".to_string());
        }
        let Some((path, range)) = input.rsplit_once(':') else {
            return Ok(Self::whole_file(input));
        };
        if !range.chars().all(|c| c.is_ascii_digit() || c == '-') || range.is_empty() {
            // Not a line range; the colon belongs to the path.
            return Ok(Self::whole_file(input));
        }
        let (start, end) = match range.split_once('-') {
            Some((start, end)) => (parse_line(start)?, Some(parse_line(end)?)),
            None => (parse_line(range)?, None),
        };
        if let Some(end) = end
            && end < start
        {
            return Err(format!("range ends before it starts ({start}-{end})"));
        }
        Ok(Self {
            path: PathBuf::from(path),
            start: Some(start),
            end,
        })
    }

    fn whole_file(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            start: None,
            end: None,
        }
    }

    /// Reads the file and builds the selection it describes.
    pub fn load(&self) -> Result<EditorSelection> {
        let content = std::fs::read_to_string(&self.path).map_err(|err| {
            Error::io(format!("failed to read {}", self.path.display()), err)
        })?;
        let lines: Vec<&str> = content.lines().collect();
        let out_of_range = |line: usize| {
            Error::io(
                format!(
                    "line {line} is past the end of {} ({} lines)",
                    self.path.display(),
                    lines.len()
                ),
                io::Error::from(io::ErrorKind::InvalidInput),
            )
        };
        match (self.start, self.end) {
            (None, _) => Ok(EditorSelection::selected(content.trim_end_matches('\n'))),
            (Some(line), None) => line
                .checked_sub(1)
                .and_then(|idx| lines.get(idx))
                .map(|text| EditorSelection::cursor_on(*text))
                .ok_or_else(|| out_of_range(line)),
            (Some(start), Some(end)) => {
                if start == 0 || end > lines.len() {
                    return Err(out_of_range(end));
                }
                Ok(EditorSelection {
                    selected_text: lines[start - 1..end].join("\n"),
                    current_line: lines[start - 1].to_string(),
                })
            }
        }
    }
}

fn parse_line(text: &str) -> std::result::Result<usize, String> {
    match text.parse::<usize>() {
        Ok(0) => Err("line numbers start at 1".to_string()),
        Ok(line) => Ok(line),
        Err(_) => Err(format!("expects a line number, got {text:?}")),
    }
}

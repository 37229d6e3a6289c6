//! Code writer with indentation tracking.
//!
//! Indentation is managed with guards: [`CodeWriter::indent`] raises the level
//! until the returned guard is dropped. The level lives in an
//! `Rc<Cell<usize>>`, so a live guard never holds a borrow of the writer.
//!
//! ```
//! use hubgen::writer::CodeWriter;
//!
//! let mut w = CodeWriter::new("  ");
//! w.block("export type IChatHub =", |w| {
//!     w.writeln("leave(): Promise<void>;");
//! });
//! assert_eq!(w.into_string(), "export type IChatHub = {\n  leave(): Promise<void>;\n}\n");
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::config::NewLine;

pub struct CodeWriter {
    buffer: String,
    indent_level: Rc<Cell<usize>>,
    indent_string: String,
    at_line_start: bool,
}

impl CodeWriter {
    /// Create a writer using `indent_string` for each indentation level.
    pub fn new(indent_string: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            indent_level: Rc::new(Cell::new(0)),
            indent_string: indent_string.into(),
            at_line_start: true,
        }
    }

    /// Write text without a newline. Adds indentation if at line start.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        if self.at_line_start && !text.trim().is_empty() {
            for _ in 0..self.indent_level.get() {
                self.buffer.push_str(&self.indent_string);
            }
            self.at_line_start = false;
        }

        self.buffer.push_str(text);
    }

    /// Write text followed by a newline.
    pub fn writeln(&mut self, text: &str) {
        self.write(text);
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    /// Raise the indentation level until the guard is dropped.
    pub fn indent(&mut self) -> IndentGuard {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard {
            indent_level: Rc::clone(&self.indent_level),
        }
    }

    /// Write `header {`, the indented body, then `}`.
    pub fn block<F>(&mut self, header: &str, body: F)
    where
        F: FnOnce(&mut Self),
    {
        self.writeln(&format!("{} {{", header));
        {
            let _indent = self.indent();
            body(self);
        }
        self.writeln("}");
    }

    /// The text written so far, with `\n` line endings.
    pub fn into_string(self) -> String {
        self.buffer
    }

    /// The text written so far, with every line ending replaced by `eol`.
    pub fn finish(self, eol: NewLine) -> String {
        normalize_newlines(&self.buffer, eol)
    }
}

/// Guard returned by [`CodeWriter::indent`].
pub struct IndentGuard {
    indent_level: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        self.indent_level
            .set(self.indent_level.get().saturating_sub(1));
    }
}

/// Replace every `\r\n`, `\r`, and `\n` in `text` with `eol`.
pub fn normalize_newlines(text: &str, eol: NewLine) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    match eol {
        NewLine::Lf => unified,
        other => unified.replace('\n', other.as_str()),
    }
}

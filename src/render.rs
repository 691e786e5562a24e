// SPDX-License-Identifier: (Apache-2.0 OR MIT)

//! Writing extracted strings out, optionally with spelling feedback.
//!
//! - plain: the string and a newline.
//! - underline: the string, with every misspelled word wrapped in terminal
//!   underline sequences.
//! - annotate: the string, then a line with a `^` under the first column of
//!   every misspelled word (`_` joining consecutive carets), then an error
//!   count such as `[2 spelling errors]`.
//!
//! Words are maximal runs of non-whitespace bytes. A trailing byte that is not
//! a letter is left out of what the spell checker sees, so `"word,"` is checked
//! as `"word"`, but it is always printed.

use std::io::{self, Write};

use crate::config::Annotation;
use crate::scanner::is_whitespace;
use crate::spell::SpellChecker;

/// Starts underlining.
pub const HIGHLIGHT_START: &[u8] = b"\x1b[4m";
/// Resets all terminal attributes.
pub const HIGHLIGHT_STOP: &[u8] = b"\x1b[0m";

/// One word of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
    /// Number of leading bytes handed to the spell checker.
    pub check_len: usize,
}

impl WordSpan {
    pub fn bytes<'a>(&self, text: &'a [u8]) -> &'a [u8] {
        &text[self.start..self.end]
    }

    pub fn checked_bytes<'a>(&self, text: &'a [u8]) -> &'a [u8] {
        &text[self.start..self.start + self.check_len]
    }

    /// Words with nothing left to check, such as a lone `-`, are never
    /// reported.
    pub fn is_misspelled(&self, text: &[u8], oracle: &dyn SpellChecker) -> bool {
        self.check_len > 0 && !oracle.check(self.checked_bytes(text))
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte != 0 && !is_whitespace(byte)
}

/// Splits `text` into words.
pub fn words(text: &[u8]) -> Words<'_> {
    Words { text, pos: 0 }
}

#[derive(Debug, Clone)]
pub struct Words<'a> {
    text: &'a [u8],
    pos: usize,
}

impl Iterator for Words<'_> {
    type Item = WordSpan;

    fn next(&mut self) -> Option<WordSpan> {
        let text = self.text;
        let start = self.pos + text[self.pos..].iter().position(|&b| is_word_byte(b))?;
        let end = text[start..]
            .iter()
            .position(|&b| !is_word_byte(b))
            .map_or(text.len(), |len| start + len);
        self.pos = end;

        let check_len = if text[end - 1].is_ascii_alphabetic() {
            end - start
        } else {
            end - start - 1
        };
        Some(WordSpan {
            start,
            end,
            check_len,
        })
    }
}

/// Writes strings to `out` according to the configured [`Annotation`].
pub struct Renderer<'a, W: Write> {
    out: W,
    annotation: &'a Annotation,
}

impl<'a, W: Write> Renderer<'a, W> {
    pub fn new(out: W, annotation: &'a Annotation) -> Self {
        Renderer { out, annotation }
    }

    /// Renders one string and flushes, so that output stays ordered when piped
    /// into a pager or interleaved with other writers.
    pub fn render(&mut self, text: &[u8]) -> io::Result<()> {
        let annotation = self.annotation;
        match annotation {
            Annotation::Plain => self.render_plain(text)?,
            Annotation::Underline(oracle) => self.render_underline(text, oracle.as_ref())?,
            Annotation::Annotate(oracle) => self.render_annotate(text, oracle.as_ref())?,
        }
        self.out.flush()
    }

    /// Writes a line that is not a string, such as a per-file banner.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_plain(&mut self, text: &[u8]) -> io::Result<()> {
        self.out.write_all(text)?;
        self.out.write_all(b"\n")
    }

    fn render_underline(&mut self, text: &[u8], oracle: &dyn SpellChecker) -> io::Result<()> {
        let mut printed = 0;
        for word in words(text) {
            // Whitespace since the previous word, untouched.
            self.out.write_all(&text[printed..word.start])?;
            if word.is_misspelled(text, oracle) {
                self.out.write_all(HIGHLIGHT_START)?;
                self.out.write_all(word.bytes(text))?;
                self.out.write_all(HIGHLIGHT_STOP)?;
            } else {
                self.out.write_all(word.bytes(text))?;
            }
            printed = word.end;
        }
        self.out.write_all(&text[printed..])?;
        self.out.write_all(b"\n")
    }

    fn render_annotate(&mut self, text: &[u8], oracle: &dyn SpellChecker) -> io::Result<()> {
        self.render_plain(text)?;

        let columns: Vec<usize> = words(text)
            .filter(|word| word.is_misspelled(text, oracle))
            .map(|word| word.start)
            .collect();
        if columns.is_empty() {
            return Ok(());
        }

        self.out.write_all(&caret_line(&columns))?;
        self.out.write_all(b"\n")?;
        let plural = if columns.len() == 1 { "" } else { "s" };
        writeln!(self.out, "[{} spelling error{}]", columns.len(), plural)
    }
}

/// Builds `    ^____^` for carets at `columns`, which must be increasing.
fn caret_line(columns: &[usize]) -> Vec<u8> {
    let mut line = Vec::with_capacity(columns.last().map_or(0, |c| c + 1));
    for (i, &column) in columns.iter().enumerate() {
        let fill = if i == 0 { b' ' } else { b'_' };
        line.resize(column, fill);
        line.push(b'^');
    }
    line
}

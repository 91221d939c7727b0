//! Forward-only cursor over the meaningful lines of a cave file.
//!
//! Every block reader pulls from the same cursor, so the position left behind
//! by one block is where the next one starts looking.

use std::iter::Enumerate;
use std::str::{Lines, SplitWhitespace};

/// Strip a trailing `#` comment and surrounding whitespace.
pub fn sanitize_line(line: &str) -> &str {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    line.trim_matches([' ', '\t', '\r', '\n'])
}

/// A non-empty sanitized line and its 1-based position in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn tokens(&self) -> SplitWhitespace<'a> {
        self.text.split_whitespace()
    }

    /// Leading token; never empty since blank lines are skipped.
    pub fn first_token(&self) -> &'a str {
        self.tokens().next().unwrap_or(self.text)
    }
}

pub struct LineCursor<'a> {
    lines: Enumerate<Lines<'a>>,
    consumed: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
            consumed: 0,
        }
    }

    /// Number of raw lines read so far, blank ones included.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        for (idx, raw) in self.lines.by_ref() {
            self.consumed = idx + 1;
            let text = sanitize_line(raw);
            if !text.is_empty() {
                return Some(Line {
                    number: idx + 1,
                    text,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_comment_and_whitespace() {
        assert_eq!(sanitize_line("\tKochappy\t32 \t# dwarf\r\n"), "Kochappy\t32");
        assert_eq!(sanitize_line("   {   "), "{");
    }

    #[test]
    fn sanitize_comment_only_line_is_empty() {
        assert_eq!(sanitize_line("# TekiInfo"), "");
        assert_eq!(sanitize_line("   \t# nothing here"), "");
        assert_eq!(sanitize_line(""), "");
        assert_eq!(sanitize_line("\r\n"), "");
    }

    #[test]
    fn cursor_skips_blank_lines_and_keeps_numbers() {
        let input = "# header\n\nCaveInfo\n{\n\t{c000}\t4 2\t# floors\n";
        let lines: Vec<Line<'_>> = LineCursor::new(input).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], Line { number: 3, text: "CaveInfo" });
        assert_eq!(lines[1], Line { number: 4, text: "{" });
        assert_eq!(lines[2].number, 5);
        assert_eq!(lines[2].tokens().collect::<Vec<_>>(), ["{c000}", "4", "2"]);
        assert_eq!(lines[2].first_token(), "{c000}");
    }

    #[test]
    fn cursor_handles_crlf() {
        let mut cursor = LineCursor::new("{\r\n3\r\n");
        assert_eq!(cursor.next().map(|l| l.text), Some("{"));
        assert_eq!(cursor.next().map(|l| l.text), Some("3"));
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.consumed(), 2);
    }
}

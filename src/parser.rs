use std::str::Lines;

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::section::Section;

/// A value equal to this marker starts a verbatim multi-line value.
pub const TEXT_BLOCK_BEGIN: &str = "$$$TextBlockBegin$$$";
/// A line equal to this marker ends the multi-line value.
pub const TEXT_BLOCK_END: &str = "$$$TextBlockEnd$$$";

/// Joins the lines of a text block. Fixed regardless of platform.
pub(crate) const LINE_TERMINATOR: &str = "\r\n";

/// Represents an on-going parse.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
    line: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    /// Read every line into `sections`.
    ///
    /// Sections already present (registered up front, or from an earlier parse) are reopened and
    /// extended. Unknown sections are appended when `allow_new_sections` is set; otherwise their
    /// keys are skipped until the next header.
    pub fn parse_into(
        mut self,
        sections: &mut Vec<Section>,
        allow_new_sections: bool,
    ) -> Result<(), ParseError> {
        let mut current = None::<usize>;

        while let Some(raw) = self.next_line() {
            let line = strip_comment(raw);

            if line.trim().is_empty() {
                continue;
            }

            if line.trim_start().starts_with('[') {
                let name = parse_section_name(line)
                    .ok_or(ParseError::InvalidSectionHeader { line: self.line })?;

                current = if let Some(i) = sections.iter().position(|s| s.name() == name) {
                    trace!(section = name, "reopening section");
                    Some(i)
                } else if allow_new_sections {
                    sections.push(Section::new(name));
                    Some(sections.len() - 1)
                } else {
                    debug!(section = name, "skipping unregistered section");
                    None
                };

                continue;
            }

            let Some(i) = current else {
                continue;
            };

            let (key, value) = parse_section_entry(line);
            let value = if value == TEXT_BLOCK_BEGIN {
                self.read_text_block(key)?
            } else {
                value.to_owned()
            };

            // Later occurrences of a key override earlier ones.
            sections[i].add_or_replace_key(key, value);
        }

        Ok(())
    }

    /// `str::lines` keeps a lone `\r` at the very end of the input; drop it like any other CR.
    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Collect raw lines (comments included) up to the end marker.
    fn read_text_block(&mut self, key: &str) -> Result<String, ParseError> {
        let start = self.line;
        let mut block = Vec::<&str>::new();

        loop {
            match self.next_line() {
                Some(TEXT_BLOCK_END) => return Ok(block.join(LINE_TERMINATOR)),
                Some(line) => block.push(line),
                None => {
                    return Err(ParseError::UnterminatedTextBlock {
                        key: key.to_owned(),
                        line: start,
                    });
                }
            }
        }
    }
}

/// Everything from the first `;` onward is a comment. There is no escape for a literal `;`.
fn strip_comment(line: &str) -> &str {
    line.find(';').map_or(line, |i| &line[..i])
}

/// The name is whatever sits between the opening `[` and the first `]`.
fn parse_section_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('[')?;
    let end = rest.find(']')?;

    Some(&rest[..end])
}

/// A line without `=` is a bare key with an empty value.
fn parse_section_entry(line: &str) -> (&str, &str) {
    match line.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (line.trim(), ""),
    }
}

use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use log::{debug, warn};

use crate::errors::ScriptError;

// @module: Dialogue script parsing and reassembly

// @const: Label line regex (identifier followed by a double colon)
static LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+)::\s*$").unwrap()
});

// @const: Payload directive regex (keyword plus a double-quoted string)
static PAYLOAD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?:text|line|para|cont)\s+"([^"]+)""#).unwrap()
});

/// Byte span of the quoted payload inside a raw line, plus the original
/// word count used for realignment after translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PayloadSpan {
    /// Byte offset of the first payload character (after the opening quote)
    start: usize,
    /// Byte offset just past the last payload character (before the closing quote)
    end: usize,
    /// Whitespace-delimited word count of the original payload
    word_count: usize,
}

/// A single line of a dialogue block, stored exactly as it appeared in the
/// source, including leading whitespace and the original line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// Exact original text of the line
    pub raw: String,
    /// Present when the line is a payload directive
    payload: Option<PayloadSpan>,
}

impl ScriptLine {
    /// Classify a raw line. A line that does not match the payload pattern
    /// (blank, comment, other directive, malformed quoting) is a non-payload
    /// line and will be passed through untouched.
    pub fn new(raw: String) -> Self {
        let payload = PAYLOAD_REGEX.captures(&raw).and_then(|caps| {
            caps.get(1).map(|m| PayloadSpan {
                start: m.start(),
                end: m.end(),
                word_count: m.as_str().split_whitespace().count(),
            })
        });
        ScriptLine { raw, payload }
    }

    /// Whether this line carries translatable quoted text
    pub fn is_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// The quoted payload text, if any
    pub fn payload_text(&self) -> Option<&str> {
        self.payload.map(|span| &self.raw[span.start..span.end])
    }

    /// Word count of the original payload (0 for non-payload lines)
    pub fn payload_word_count(&self) -> usize {
        self.payload.map_or(0, |span| span.word_count)
    }

    /// Rebuild the line with a new payload, keeping every byte outside the
    /// quoted span (indentation, keyword, terminator) exactly as it was.
    /// Non-payload lines are returned unchanged.
    pub fn with_payload(&self, new_payload: &str) -> ScriptLine {
        match self.payload {
            Some(span) => {
                let mut raw = String::with_capacity(
                    self.raw.len() - (span.end - span.start) + new_payload.len(),
                );
                raw.push_str(&self.raw[..span.start]);
                raw.push_str(new_payload);
                raw.push_str(&self.raw[span.end..]);
                ScriptLine::new(raw)
            }
            None => self.clone(),
        }
    }
}

impl fmt::Display for ScriptLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// An ordered group of lines belonging to one label, from just after the
/// label line to just before the next label or end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock {
    /// The label identifier (without the trailing double colon)
    pub label: String,
    /// Exact original label line, terminator included
    pub label_line: String,
    /// Ordered lines of the block
    pub lines: Vec<ScriptLine>,
}

impl ScriptBlock {
    /// Space-joined concatenation of all payload texts, in line order.
    /// This is the unit submitted to translation.
    pub fn flattened_text(&self) -> String {
        self.lines
            .iter()
            .filter_map(|line| line.payload_text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Total payload word count across the block
    pub fn payload_word_count(&self) -> usize {
        self.lines.iter().map(|line| line.payload_word_count()).sum()
    }

    /// Number of payload lines in the block
    pub fn payload_line_count(&self) -> usize {
        self.lines.iter().filter(|line| line.is_payload()).count()
    }

    /// Redistribute translated text back onto the original line positions
    /// using word-count realignment.
    ///
    /// The translated text is split into whitespace-delimited tokens and each
    /// payload line consumes as many tokens as its original payload had words.
    /// Translation changes word counts and word order, so the slicing is a
    /// structural-preservation heuristic, not a translation-quality guarantee:
    /// line breaks may land mid-phrase and trailing lines may come up short.
    /// An underrun is never an error; late lines get a partial or empty
    /// payload. Non-payload lines are copied byte-identical.
    pub fn realign(&self, translated: &str) -> ScriptBlock {
        let tokens: Vec<&str> = translated.split_whitespace().collect();
        let mut cursor = 0;

        let lines = self
            .lines
            .iter()
            .map(|line| {
                if !line.is_payload() {
                    return line.clone();
                }
                let wanted = line.payload_word_count();
                let end = (cursor + wanted).min(tokens.len());
                let new_payload = tokens[cursor..end].join(" ");
                cursor = end;
                line.with_payload(&new_payload)
            })
            .collect();

        if cursor < tokens.len() {
            warn!(
                "Block '{}': {} translated word(s) left unassigned after realignment",
                self.label,
                tokens.len() - cursor
            );
        } else if tokens.len() < self.payload_word_count() {
            debug!(
                "Block '{}': translated text has {} word(s) for {} original payload word(s)",
                self.label,
                tokens.len(),
                self.payload_word_count()
            );
        }

        ScriptBlock {
            label: self.label.clone(),
            label_line: self.label_line.clone(),
            lines,
        }
    }

    /// Reconstruct the block as source text, label line included
    pub fn render(&self) -> String {
        let mut out = String::from(&self.label_line);
        for line in &self.lines {
            out.push_str(&line.raw);
        }
        out
    }
}

impl fmt::Display for ScriptBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// A parsed dialogue script: labeled blocks in order of appearance
#[derive(Debug, Clone, Default)]
pub struct ScriptDocument {
    /// Blocks ordered as they appeared in the source
    pub blocks: Vec<ScriptBlock>,
}

impl ScriptDocument {
    /// Parse raw script text into labeled blocks.
    ///
    /// Text before the first label is ignored. A label with no content
    /// produces an empty block. A label that appears twice is rejected,
    /// since silently keeping the later occurrence would drop data.
    pub fn parse(content: &str) -> Result<Self, ScriptError> {
        let mut blocks: Vec<ScriptBlock> = Vec::new();
        let mut current: Option<ScriptBlock> = None;

        for (index, raw) in split_lines_with_terminators(content).into_iter().enumerate() {
            if let Some(caps) = LABEL_REGEX.captures(&raw) {
                let label = caps[1].to_string();
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                if blocks.iter().any(|b| b.label == label) {
                    return Err(ScriptError::DuplicateLabel(label, index + 1));
                }
                current = Some(ScriptBlock {
                    label,
                    label_line: raw,
                    lines: Vec::new(),
                });
            } else if let Some(block) = current.as_mut() {
                block.lines.push(ScriptLine::new(raw));
            }
            // Lines before the first label are dropped
        }

        if let Some(block) = current.take() {
            blocks.push(block);
        }

        debug!("Parsed {} block(s)", blocks.len());
        Ok(ScriptDocument { blocks })
    }

    /// Look up a block by label
    pub fn get(&self, label: &str) -> Option<&ScriptBlock> {
        self.blocks.iter().find(|b| b.label == label)
    }

    /// Reconstruct the whole document, blocks in appearance order
    pub fn render(&self) -> String {
        self.blocks.iter().map(|b| b.render()).collect()
    }
}

impl fmt::Display for ScriptDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Split text into lines keeping each line's original terminator attached,
/// so CRLF and a missing final newline survive reassembly byte-for-byte.
fn split_lines_with_terminators(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            lines.push(content[start..=i].to_string());
            start = i + 1;
        }
    }
    if start < content.len() {
        lines.push(content[start..].to_string());
    }
    lines
}

//! INI parser for Olympus OIF/OIB metadata.
//!
//! The Olympus description files are classic INI files with a few quirks
//! that this parser follows:
//!
//! - Values are kept raw, including surrounding quotes (`AxisName="Z"`)
//! - Option names are case-insensitive, section names are not
//! - Indented lines continue the previous value
//! - A value of exactly `""` is read as an empty string
//! - Reading more text into an existing document merges sections, later
//!   values replacing earlier ones

use std::str::FromStr;

use crate::error::ParseError;

// =============================================================================
// IniDocument
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct IniSection {
    name: String,
    options: Vec<(String, String)>,
}

impl IniSection {
    fn get(&self, option: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(name, _)| name == option)
            .map(|(_, value)| value.as_str())
    }

    fn set(&mut self, option: String, value: String) {
        match self.options.iter_mut().find(|(name, _)| *name == option) {
            Some(entry) => entry.1 = value,
            None => self.options.push((option, value)),
        }
    }
}

/// A parsed INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text into a new document.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut doc = Self::new();
        doc.read_str(text)?;
        Ok(doc)
    }

    /// Read INI text into this document, merging with existing sections.
    pub fn read_str(&mut self, text: &str) -> Result<(), ParseError> {
        let mut current: Option<usize> = None;
        let mut last_option: Option<String> = None;

        for (lineno, raw) in text.lines().enumerate() {
            let lineno = lineno + 1;
            let line = raw.trim_end_matches('\r');

            if is_comment_or_blank(line) {
                continue;
            }

            // Continuation line
            if line.starts_with(char::is_whitespace) {
                if let (Some(idx), Some(option)) = (current, last_option.as_ref()) {
                    let value = line.trim();
                    if !value.is_empty() {
                        let section = &mut self.sections[idx];
                        if let Some(entry) = section.options.iter_mut().find(|(n, _)| n == option)
                        {
                            entry.1.push('\n');
                            entry.1.push_str(value);
                        }
                    }
                    continue;
                }
            }

            if let Some(name) = parse_section_header(line) {
                current = Some(self.section_index_or_insert(name));
                last_option = None;
                continue;
            }

            let idx = match current {
                Some(idx) => idx,
                None => {
                    return Err(ParseError::MissingSectionHeader {
                        line: lineno,
                        content: line.to_string(),
                    })
                }
            };

            // Indented text with nothing to continue
            if line.starts_with(char::is_whitespace) {
                return Err(ParseError::MalformedLine {
                    line: lineno,
                    content: line.to_string(),
                });
            }

            match parse_option(line) {
                Some((option, value)) => {
                    self.sections[idx].set(option.clone(), value);
                    last_option = Some(option);
                }
                None => {
                    return Err(ParseError::MalformedLine {
                        line: lineno,
                        content: line.to_string(),
                    })
                }
            }
        }

        Ok(())
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.name == name) {
            return idx;
        }
        self.sections.push(IniSection {
            name: name.to_string(),
            options: Vec::new(),
        });
        self.sections.len() - 1
    }

    fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Check whether a section exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    /// Iterate over section names in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Iterate over `(option, value)` pairs of a section.
    pub fn options(&self, section: &str) -> Result<impl Iterator<Item = (&str, &str)>, ParseError> {
        let section = self
            .section(section)
            .ok_or_else(|| ParseError::MissingSection(section.to_string()))?;
        Ok(section
            .options
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Get the raw value of an option.
    pub fn get(&self, section: &str, option: &str) -> Result<&str, ParseError> {
        let sect = self
            .section(section)
            .ok_or_else(|| ParseError::MissingSection(section.to_string()))?;
        sect.get(&option.to_lowercase())
            .ok_or_else(|| ParseError::MissingOption {
                section: section.to_string(),
                option: option.to_lowercase(),
            })
    }

    /// Get an option and parse it into `T`.
    pub fn get_parsed<T: FromStr>(&self, section: &str, option: &str) -> Result<T, ParseError> {
        let value = self.get(section, option)?;
        value.trim().parse().map_err(|_| ParseError::InvalidValue {
            field: format!("[{}] {}", section, option),
            value: value.to_string(),
        })
    }
}

// =============================================================================
// Line Parsing
// =============================================================================

fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || line.starts_with('#') || line.starts_with(';') {
        return true;
    }
    // "rem" comments, as accepted by Windows INI readers
    line.starts_with(['r', 'R'])
        && line
            .split_whitespace()
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case("rem"))
}

fn parse_section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

fn parse_option(line: &str) -> Option<(String, String)> {
    if line.starts_with([':', '=']) {
        return None;
    }
    let sep = line.find([':', '='])?;
    let option = line[..sep].trim_end();
    if option.is_empty() {
        return None;
    }

    let mut value = &line[sep + 1..];
    // Inline comments need a preceding whitespace: "a=b ;comment"
    if let Some(pos) = value.find(';') {
        if pos > 0 && value[..pos].ends_with(char::is_whitespace) {
            value = &value[..pos];
        }
    }
    let value = value.trim();
    let value = if value == "\"\"" { "" } else { value };

    Some((option.to_lowercase(), value.to_string()))
}

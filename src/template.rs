//! Load order template parsing.
//!
//! The template is a line-oriented text file. The first line carries the
//! template version. Every non-blank line outside an attribute block names a
//! plugin, and the lines directly after it attach attributes to that plugin:
//!
//! ```text
//! 12
//! Fallout3.esm
//! Anchorage.esm      \ inline comments start with a backslash
//! MyMod.esp
//! :Fallout3.esm      requires
//! "OtherMod.esp      conflicts
//! * Load late.       comment (also `?`)
//! ```

use crate::error::{Result, SorterError};
use crate::plugin::{normalize_name, TemplateRecord};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// The parsed template: every known plugin keyed by its normalized name.
///
/// Built wholesale by [`MasterList::parse`] and never updated in place.
#[derive(Debug, Clone, Default)]
pub struct MasterList {
    records: HashMap<String, TemplateRecord>,
    duplicate_count: usize,
    file_version: i32,
    fingerprint: String,
}

/// Classification of a single template line after comment stripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Requires(&'a str),
    Conflicts(&'a str),
    Comment(&'a str),
    /// Anything else: a plugin header, which also ends the preceding block.
    Entry,
}

fn strip_comment(line: &str) -> &str {
    match line.find('\\') {
        Some(pos) => &line[..pos],
        None => line,
    }
    .trim()
}

fn classify(line: &str) -> Line<'_> {
    let mut chars = line.chars();
    match chars.next() {
        None => Line::Blank,
        Some(':') => Line::Requires(chars.as_str().trim()),
        Some('"') => Line::Conflicts(chars.as_str().trim()),
        Some('*' | '?') => Line::Comment(chars.as_str().trim()),
        Some(_) => Line::Entry,
    }
}

impl MasterList {
    /// Parses template text. Never fails: bad version lines become `0` and
    /// duplicate headers are counted, with the later entry winning.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines().map(strip_comment).peekable();

        let file_version = lines
            .peek()
            .and_then(|first| first.parse::<i32>().ok())
            .unwrap_or(0);

        let mut records = HashMap::new();
        let mut duplicate_count = 0;
        let mut next_ordinal = 0;

        while let Some(header) = lines.next() {
            if header.is_empty() {
                continue;
            }

            let mut record = TemplateRecord {
                ordinal: next_ordinal,
                ..TemplateRecord::default()
            };
            next_ordinal += 1;

            while let Some(&line) = lines.peek() {
                match classify(line) {
                    Line::Blank => {}
                    Line::Requires(name) => record.requires.push(name.to_lowercase()),
                    Line::Conflicts(name) => record.conflicts.push(name.to_lowercase()),
                    Line::Comment(text) => record.comments.push(text.to_string()),
                    Line::Entry => break,
                }
                lines.next();
            }

            let key = normalize_name(header);
            if records.insert(key, record).is_some() {
                duplicate_count += 1;
                tracing::warn!(entry = header, "duplicate load order template entry");
            }
        }

        Self {
            records,
            duplicate_count,
            file_version,
            fingerprint: format!("{:x}", md5::compute(text.as_bytes())),
        }
    }

    /// Reads and parses the template at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no load order template found");
                return Ok(None);
            }
            Err(source) => {
                return Err(SorterError::ReadTemplate {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let list = Self::parse(&text);
        tracing::info!(
            path = %path.display(),
            entries = list.len(),
            version = list.file_version,
            duplicates = list.duplicate_count,
            "loaded load order template"
        );
        Ok(Some(list))
    }

    /// Looks up a plugin by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&TemplateRecord> {
        self.records.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.get(name).map(|record| record.ordinal)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of headers that overwrote an earlier entry with the same name.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_count
    }

    /// Version number from the first template line, or `0` if it was not a number.
    pub fn file_version(&self) -> i32 {
        self.file_version
    }

    /// MD5 digest of the template text, used to detect changes on reload.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// All entries in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateRecord)> {
        let mut entries: Vec<_> = self
            .records
            .iter()
            .map(|(name, record)| (name.as_str(), record))
            .collect();
        entries.sort_by_key(|(_, record)| record.ordinal);
        entries.into_iter()
    }
}

//! Wordlist loading.

use std::fs;
use std::path::Path;

use crate::error::ScanError;

/// Trimmed, non-empty wordlist entries in file order.
#[derive(Debug, Clone)]
pub struct Wordlist {
    entries: Vec<String>,
    longest: usize,
}

impl Wordlist {
    /// Reads `path` fully into memory.
    ///
    /// Lines are trimmed of surrounding whitespace and blank lines are skipped;
    /// nothing is deduplicated or case-folded. Invalid UTF-8 is replaced
    /// lossily so binary-ish wordlists still load.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        if !path.exists() {
            return Err(ScanError::FileNotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let wordlist = Self::from_text(&String::from_utf8_lossy(&bytes));
        if wordlist.is_empty() {
            return Err(ScanError::EmptyWordlist(path.to_path_buf()));
        }
        tracing::info!(
            "loaded {} wordlist entries from {} (longest {})",
            wordlist.len(),
            path.display(),
            wordlist.longest
        );
        Ok(wordlist)
    }

    pub fn from_text(text: &str) -> Self {
        let entries: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let longest = entries
            .iter()
            .map(|e| e.chars().count())
            .max()
            .unwrap_or(0);
        Self { entries, longest }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length in characters of the longest entry.
    pub fn longest(&self) -> usize {
        self.longest
    }
}

//! Idea extraction from raw model responses.
//!
//! Total: never fails, and a non-empty input always yields a non-empty idea.
//! Two branches: marker found (collect what follows) or fallback (whole text).

use serde::{Deserialize, Serialize};

/// Default section keywords that introduce the idea payload.
pub const DEFAULT_MARKERS: &[&str] = &["PHASE 3", "Novel Idea"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaExtractor {
    markers: Vec<String>,
}

impl Default for IdeaExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect())
    }
}

impl IdeaExtractor {
    /// Markers are matched case-insensitively as substrings of a line.
    /// Blank markers are ignored.
    pub fn new(markers: Vec<String>) -> Self {
        let markers = markers
            .into_iter()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        Self { markers }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    fn is_marker(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.markers.iter().any(|m| lower.contains(m.as_str()))
    }

    /// Everything after the first marker line, non-blank lines trimmed and
    /// joined with newlines. Falls back to the trimmed input.
    pub fn extract(&self, response: &str) -> String {
        let mut collecting = false;
        let mut idea_lines: Vec<&str> = Vec::new();

        for line in response.lines() {
            if !collecting {
                collecting = self.is_marker(line);
                continue;
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                idea_lines.push(trimmed);
            }
        }

        if !idea_lines.is_empty() {
            return idea_lines.join("\n");
        }

        let trimmed = response.trim();
        if trimmed.is_empty() {
            // whitespace-only input: trimming would produce an empty idea
            return response.to_string();
        }
        trimmed.to_string()
    }
}

/// Extract with the default markers.
pub fn extract_idea(response: &str) -> String {
    IdeaExtractor::default().extract(response)
}

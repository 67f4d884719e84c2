//! Topology synthesis: turn a transcript into a short commit title and body.
//!
//! Keyword heuristics only. The tables are data in `SynthesisRules` so they
//! can be swapped without touching the matching code.

use crate::gauntlet::preview;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const MAX_BOUNDARY_CHARS: usize = 100;
const MAX_TITLE_CHARS: usize = 72;
const MAX_LISTED: usize = 3;
const FALLBACK_BOUNDARY: &str = "Verification topology explored";

/// Answer line after the "what did you verify" question.
fn verify_question() -> &'static Regex {
    static VERIFY: OnceLock<Regex> = OnceLock::new();
    VERIFY.get_or_init(|| {
        Regex::new(r"(?i)What did you start trying to verify\?[^\n]*\n+([^\n]+)")
            .expect("Invalid verify-question regex")
    })
}

/// Keyword → label pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordLabel {
    pub keyword: String,
    pub label: String,
}

impl KeywordLabel {
    fn new(keyword: &str, label: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            label: label.to_string(),
        }
    }
}

/// Matches when any of `any_of` (or nothing, if empty) and all of `all_of`
/// occur in the lowercased content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRule {
    pub label: String,
    #[serde(default)]
    pub any_of: Vec<String>,
    #[serde(default)]
    pub all_of: Vec<String>,
}

impl InsightRule {
    fn matches(&self, lower: &str) -> bool {
        let any = self.any_of.is_empty() || self.any_of.iter().any(|k| lower.contains(k.as_str()));
        any && self.all_of.iter().all(|k| lower.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRules {
    /// Upper-case path markers in the order they are reported
    pub paths: Vec<KeywordLabel>,
    /// Lower-case boundary type keywords
    pub boundary_types: Vec<KeywordLabel>,
    pub insights: Vec<InsightRule>,
}

impl Default for SynthesisRules {
    fn default() -> Self {
        Self {
            paths: vec![
                KeywordLabel::new("PATH A", "Authority"),
                KeywordLabel::new("PATH B", "Measurement"),
                KeywordLabel::new("PATH C", "Historical"),
                KeywordLabel::new("PATH D", "Derivation"),
                KeywordLabel::new("PATH E", "Consensus"),
            ],
            boundary_types: vec![
                KeywordLabel::new("hard", "Hard boundary"),
                KeywordLabel::new("soft", "Soft boundary"),
                KeywordLabel::new("circular", "Circular verification"),
                KeywordLabel::new("authority", "Authority wall"),
                KeywordLabel::new("permeable", "Permeable boundary"),
                KeywordLabel::new("route around", "Routing found"),
            ],
            insights: vec![
                InsightRule {
                    label: "Found alternative route".to_string(),
                    any_of: vec!["route around".to_string(), "routing".to_string()],
                    all_of: vec![],
                },
                InsightRule {
                    label: "Explored beyond wall".to_string(),
                    any_of: vec![],
                    all_of: vec!["beyond".to_string(), "wall".to_string()],
                },
                InsightRule {
                    label: "Mapped topology".to_string(),
                    any_of: vec!["topology".to_string(), "landscape".to_string()],
                    all_of: vec![],
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub boundary: String,
    pub paths: Vec<String>,
    pub boundary_types: Vec<String>,
    pub insights: Vec<String>,
    pub confidence: f64,
    pub title: String,
    pub body: String,
}

/// What the run set out to verify.
///
/// Looks for the answer to "What did you start trying to verify?", then a
/// `Topic:` line, then the first substantial line.
pub fn extract_boundary(content: &str) -> String {
    if let Some(caps) = verify_question().captures(content) {
        let line = caps[1].trim();
        let line = line.trim_start_matches(|c: char| c == '-' || c == '*' || c == '•').trim_start();
        if !line.is_empty() {
            return preview(line, MAX_BOUNDARY_CHARS).to_string();
        }
    }

    for line in content.lines() {
        if let Some(topic) = line.strip_prefix("Topic:") {
            let topic = topic.trim();
            if !topic.is_empty() {
                return preview(topic, MAX_BOUNDARY_CHARS).to_string();
            }
        }
    }

    content
        .lines()
        .find(|line| line.trim().chars().count() > 20 && !line.starts_with('='))
        .map(|line| preview(line.trim(), MAX_BOUNDARY_CHARS).to_string())
        .unwrap_or_else(|| FALLBACK_BOUNDARY.to_string())
}

fn matching_labels(haystack: &str, table: &[KeywordLabel]) -> Vec<String> {
    table
        .iter()
        .filter(|entry| haystack.contains(entry.keyword.as_str()))
        .map(|entry| entry.label.clone())
        .take(MAX_LISTED)
        .collect()
}

pub fn extract_paths(content: &str, rules: &SynthesisRules) -> Vec<String> {
    matching_labels(&content.to_uppercase(), &rules.paths)
}

pub fn extract_boundary_types(content: &str, rules: &SynthesisRules) -> Vec<String> {
    matching_labels(&content.to_lowercase(), &rules.boundary_types)
}

pub fn detect_insights(content: &str, rules: &SynthesisRules) -> Vec<String> {
    let lower = content.to_lowercase();
    rules
        .insights
        .iter()
        .filter(|rule| rule.matches(&lower))
        .map(|rule| rule.label.clone())
        .collect()
}

/// 0.70 base, +0.05 per path, +0.10 per insight, capped at 0.99.
pub fn confidence(paths: usize, insights: usize) -> f64 {
    (0.70 + paths as f64 * 0.05 + insights as f64 * 0.10).min(0.99)
}

pub fn synthesize(content: &str, cycle: u64, rules: &SynthesisRules) -> Synthesis {
    let boundary = extract_boundary(content);
    let paths = extract_paths(content, rules);
    let boundary_types = extract_boundary_types(content, rules);
    let insights = detect_insights(content, rules);

    let title = match insights.first().or_else(|| boundary_types.first()) {
        Some(headline) => format!("Cycle {}: {} → {}", cycle, preview(&boundary, 30), headline),
        None => format!("Cycle {}: {}", cycle, preview(&boundary, 40)),
    };
    let title = preview(&title, MAX_TITLE_CHARS).to_string();

    let confidence = confidence(paths.len(), insights.len());

    let mut body = vec![format!("BOUNDARY: {}", boundary)];
    if !paths.is_empty() {
        body.push(format!("PATHS: {}", paths.join(", ")));
    }
    if !boundary_types.is_empty() {
        body.push(format!("BOUNDARIES: {}", boundary_types.join(", ")));
    }
    if !insights.is_empty() {
        body.push(format!("TOPOLOGY: {}", insights.join(", ")));
    }
    body.push(format!("CONFIDENCE: {:.2}", confidence));

    Synthesis {
        boundary,
        paths,
        boundary_types,
        insights,
        confidence,
        title,
        body: body.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_cap() {
        assert!((confidence(0, 0) - 0.70).abs() < 1e-9);
        assert!((confidence(3, 1) - 0.95).abs() < 1e-9);
        assert!((confidence(3, 3) - 0.99).abs() < 1e-9);
    }

    #[test]
    fn test_verify_question_compiled_once() {
        assert!(std::ptr::eq(verify_question(), verify_question()));
        let caps = verify_question()
            .captures("WHAT DID YOU START TRYING TO VERIFY?\n\n* Ice is slippery.")
            .unwrap();
        assert_eq!(&caps[1], "* Ice is slippery.");
        assert_eq!(
            extract_boundary("what did you start trying to verify?\n- Ice is slippery."),
            "Ice is slippery."
        );
    }

    #[test]
    fn test_insight_rule_all_of() {
        let rule = InsightRule {
            label: "x".to_string(),
            any_of: vec![],
            all_of: vec!["beyond".to_string(), "wall".to_string()],
        };
        assert!(rule.matches("we went beyond the wall"));
        assert!(!rule.matches("we went beyond"));
    }
}

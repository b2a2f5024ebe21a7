// src/opinion.rs
//! Opinion/editorial gate. The credibility classifier is trained on factual
//! report prose, so opinion content is detected up front and excluded from
//! scoring instead of receiving a spurious verdict.
//!
//! Three independent detectors, any of which gates:
//! 1. the source URL has a whole path segment from [`OPINION_MARKERS`];
//! 2. the first 40 words contain a marker as a whole word;
//! 3. at least two distinct subjective phrases appear anywhere in the text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Section names publishers use for non-report content.
pub const OPINION_MARKERS: [&str; 7] = [
    "opinion",
    "op-ed",
    "oped",
    "editorial",
    "analysis",
    "commentary",
    "columns",
];

/// First-person, subjective phrasings. Two distinct hits gate the text.
pub const SUBJECTIVE_PHRASES: [&str; 11] = [
    "i think",
    "i believe",
    "in my view",
    "we should",
    "i feel",
    "my opinion",
    "i argue",
    "i suggest",
    "in our view",
    "personally",
    "from my perspective",
];

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = OPINION_MARKERS
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("opinion marker regex")
});

/// Heuristic detector for opinion/analysis content.
/// Returns true if the URL or the text strongly suggests an opinion column.
pub fn is_opinion_piece(text: &str, url: Option<&str>) -> bool {
    if let Some(u) = url {
        if url_has_marker_segment(u) {
            return true;
        }
    }

    let lower = text.to_lowercase();

    let first_40 = lower
        .split_whitespace()
        .take(40)
        .collect::<Vec<_>>()
        .join(" ");
    if MARKER_RE.is_match(&first_40) {
        return true;
    }

    let subjective_hits = SUBJECTIVE_PHRASES
        .iter()
        .filter(|p| lower.contains(*p))
        .count();
    subjective_hits >= 2
}

/// True when any whole path segment equals an opinion marker.
/// Only the path is inspected — the host and query string never gate.
fn url_has_marker_segment(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let after_scheme = match lower.split_once("://") {
        Some((_, rest)) => rest,
        None => lower.as_str(),
    };
    let path = match after_scheme.split_once('/') {
        Some((_, p)) => p,
        None => return false,
    };
    path.split(['/', '?', '#'])
        .any(|segment| OPINION_MARKERS.contains(&segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_subjective_phrases_gate() {
        let text = "I think the new policy is terrible and I believe it will fail";
        assert!(is_opinion_piece(text, None));
    }

    #[test]
    fn one_subjective_phrase_does_not_gate() {
        let text = "I think the central bank will hold rates steady this quarter.";
        assert!(!is_opinion_piece(text, None));
    }

    #[test]
    fn opinion_url_segment_gates() {
        let text = "The policy change takes effect next week.";
        assert!(is_opinion_piece(
            text,
            Some("https://example.com/opinion/2024/policy-take")
        ));
    }

    #[test]
    fn marker_in_hostname_does_not_gate() {
        let text = "The policy change takes effect next week.";
        assert!(!is_opinion_piece(
            text,
            Some("https://opinion-tracker.example.com/news/2024/policy")
        ));
    }

    #[test]
    fn marker_word_in_lede_gates() {
        let text = "Editorial: the council has lost its way on housing policy.";
        assert!(is_opinion_piece(text, None));
    }

    #[test]
    fn marker_past_first_40_words_does_not_gate() {
        let filler = "word ".repeat(45);
        let text = format!("{filler}editorial boards disagreed.");
        assert!(!is_opinion_piece(&text, None));
    }

    #[test]
    fn plain_report_passes() {
        let text = "Officials said the bridge will reopen on Monday after inspection.";
        assert!(!is_opinion_piece(text, None));
    }
}

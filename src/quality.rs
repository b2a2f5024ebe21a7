// src/quality.rs
//! Content-quality heuristic: a deterministic, rule-based estimate of surface
//! features that correlate with authenticity. Runs without any model, so the
//! scorer degrades gracefully when the classifier endpoints are unavailable.
//!
//! Seven sub-indicators, each a fixed discrete level; the final score is the
//! unweighted mean of the sub-indicators actually computed (sentence
//! structure is omitted when the text has no sentence terminators at all).
//! The phrase lists below are part of the scoring contract — changing them
//! changes scores.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Attribution phrases: any hit marks the text as sourced.
pub const ATTRIBUTION_PHRASES: [&str; 7] = [
    "according to",
    "sources say",
    "reported by",
    "study shows",
    "research indicates",
    "officials said",
    "spokesperson",
];

/// Sensational phrases strongly associated with misinformation.
pub const RED_FLAG_PHRASES: [&str; 8] = [
    "shocking truth",
    "doctors hate",
    "secret revealed",
    "they don't want you",
    "mainstream media won't",
    "wake up",
    "sheeple",
    "big pharma conspiracy",
];

/// Emotionally loaded words; density above 2 is a strong negative signal.
pub const EMOTIONAL_WORDS: [&str; 8] = [
    "unbelievable",
    "shocking",
    "amazing",
    "incredible",
    "outrageous",
    "devastating",
    "terrifying",
    "miraculous",
];

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}\b").expect("date regex"));
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:,\d{3})*(?:\.\d+)?\b").expect("number regex"));
static PROPER_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s[A-Z][a-z]+)*\b").expect("proper-noun regex"));
static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence regex"));

/// Per-indicator breakdown plus the final mean. `sentence_structure` is
/// `None` when no sentence was detected (not scored as zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    pub length: f64,
    pub sentence_structure: Option<f64>,
    pub attribution: f64,
    pub quotation: f64,
    pub specificity: f64,
    pub red_flags: f64,
    pub emotional_language: f64,
    /// Unweighted mean of the indicators above that were computed.
    pub score: f64,
}

/// Assess surface quality of `text`. Pure and total: the same text always
/// yields the same report, and empty input maps to the minimum-information
/// default (0.5) rather than an error.
pub fn assess(text: &str) -> QualityReport {
    let lower = text.to_lowercase();

    let word_count = text.split_whitespace().count();
    let sentence_count = SENTENCE_END_RE.find_iter(text).count();

    let length = length_level(word_count);
    let sentence_structure = sentence_level(word_count, sentence_count);
    let attribution = phrase_hit_level(&lower, &ATTRIBUTION_PHRASES, 0.9, 0.4);
    let quotation = if text.contains('"') || text.contains('\'') {
        0.8
    } else {
        0.5
    };
    let specificity = specificity_level(text);
    let red_flags = phrase_hit_level(&lower, &RED_FLAG_PHRASES, 0.1, 0.7);
    let emotional_language = emotional_level(&lower);

    let mut sum = length + attribution + quotation + specificity + red_flags + emotional_language;
    let mut n = 6usize;
    if let Some(s) = sentence_structure {
        sum += s;
        n += 1;
    }

    QualityReport {
        length,
        sentence_structure,
        attribution,
        quotation,
        specificity,
        red_flags,
        emotional_language,
        score: sum / n as f64,
    }
}

/// Appropriate length: not too short, not suspiciously long.
fn length_level(word_count: usize) -> f64 {
    if (50..=2000).contains(&word_count) {
        0.8
    } else if (20..50).contains(&word_count) || (2001..=3000).contains(&word_count) {
        0.6
    } else {
        0.3
    }
}

/// Words-per-sentence in [10, 30] reads like report prose.
fn sentence_level(word_count: usize, sentence_count: usize) -> Option<f64> {
    if sentence_count == 0 {
        return None;
    }
    let avg = word_count as f64 / sentence_count as f64;
    Some(if (10.0..=30.0).contains(&avg) { 0.8 } else { 0.5 })
}

/// Any phrase present → `hit`, else `miss`.
fn phrase_hit_level(lower: &str, phrases: &[&str], hit: f64, miss: f64) -> f64 {
    if phrases.iter().any(|p| lower.contains(p)) {
        hit
    } else {
        miss
    }
}

/// Specific details: a date pattern, a number (with optional thousands
/// separators), and at least three distinct proper-noun-like tokens.
fn specificity_level(text: &str) -> f64 {
    let has_dates = DATE_RE.is_match(text);
    let has_numbers = NUMBER_RE.is_match(text);
    let proper_nouns: HashSet<&str> = PROPER_NOUN_RE.find_iter(text).map(|m| m.as_str()).collect();
    let has_proper_nouns = proper_nouns.len() >= 3;

    match [has_dates, has_numbers, has_proper_nouns]
        .iter()
        .filter(|b| **b)
        .count()
    {
        3 => 0.9,
        2 => 0.7,
        1 => 0.6,
        _ => 0.3,
    }
}

/// Density of emotionally loaded vocabulary (distinct words present).
fn emotional_level(lower: &str) -> f64 {
    let count = EMOTIONAL_WORDS.iter().filter(|w| lower.contains(*w)).count();
    match count {
        0 => 0.8,
        1 | 2 => 0.6,
        _ => 0.2,
    }
}

// src/bias.rs
//! Emotive/sensational language signal. Informational only — it is reported
//! next to the verdict but does not feed the ensemble.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Loaded words counted toward the bias score. Whole-word matches only.
pub const BIAS_LEXICON: [&str; 23] = [
    "shocking",
    "outrage",
    "scandal",
    "cover-up",
    "exposed",
    "plot",
    "agenda",
    "propaganda",
    "rigged",
    "fake",
    "hoax",
    "catastrophe",
    "disaster",
    "crisis",
    "meltdown",
    "massive",
    "unprecedented",
    "slam",
    "blast",
    "brutal",
    "controversial",
    "alarming",
    "warning",
];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("word regex"));

/// Bias score in [0, 100] plus per-word hit counts (sorted for stable output).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BiasSignal {
    pub score: u32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub hits: BTreeMap<String, u32>,
}

/// Count lexicon hits and scale the hit ratio into [0, 100].
/// The ×3000 factor makes a ~3% loaded-word density max out the score.
pub fn detect_bias_signals(text: &str) -> BiasSignal {
    let lower = text.to_lowercase();
    let words: Vec<&str> = WORD_RE.find_iter(&lower).map(|m| m.as_str()).collect();
    if words.is_empty() {
        return BiasSignal::default();
    }

    let mut hits: BTreeMap<String, u32> = BTreeMap::new();
    let mut total = 0u32;
    for w in &words {
        if BIAS_LEXICON.contains(w) {
            *hits.entry((*w).to_string()).or_insert(0) += 1;
            total += 1;
        }
    }

    let ratio = f64::from(total) / words.len() as f64;
    let score = ((ratio * 3000.0) as u32).min(100);
    BiasSignal { score, hits }
}

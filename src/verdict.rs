//! verdict.rs — Structures for the credibility verdict, certainty and explainability.
//!
//! Goal: a standardized output shape for the verification endpoint —
//! probability + banded verdict + certainty + reasons — so the UI layer can
//! render a result without re-deriving any of the banding logic.

use serde::{Deserialize, Serialize};

/// Banded verdict for a scored article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Likely Real")]
    LikelyReal,
    #[serde(rename = "Possibly Real")]
    PossiblyReal,
    #[serde(rename = "Uncertain")]
    Uncertain,
    #[serde(rename = "Possibly Fake")]
    PossiblyFake,
    #[serde(rename = "Likely Fake")]
    LikelyFake,
}

/// How firmly the banded verdict is held. Derived from the same probability
/// as the verdict itself; `NotApplicable` is reserved for gated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Certainty {
    High,
    Medium,
    Low,
    #[serde(rename = "N/A")]
    NotApplicable,
}

/// Fixed probability thresholds. These are contract, not tunables:
/// ≥0.70 Likely Real/High, [0.55,0.70) Possibly Real/Medium,
/// [0.45,0.55) Uncertain/Low, [0.30,0.45) Possibly Fake/Medium,
/// <0.30 Likely Fake/High.
pub fn band(probability: f64) -> (Verdict, Certainty) {
    if probability >= 0.70 {
        (Verdict::LikelyReal, Certainty::High)
    } else if probability >= 0.55 {
        (Verdict::PossiblyReal, Certainty::Medium)
    } else if probability >= 0.45 {
        (Verdict::Uncertain, Certainty::Low)
    } else if probability >= 0.30 {
        (Verdict::PossiblyFake, Certainty::Medium)
    } else {
        (Verdict::LikelyFake, Certainty::High)
    }
}

/// Display confidence as an integer percentage: the distance from the nearer
/// extreme, i.e. `p` when p > 0.5 else `1 − p`. Rounds half-up.
pub fn display_confidence_pct(probability: f64) -> u8 {
    let display = if probability > 0.5 {
        probability
    } else {
        1.0 - probability
    };
    (display * 100.0 + 0.5).floor() as u8
}

/// Complete assessment for one scored document. Computed fresh per call;
/// never stored, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Calibrated P(real) in [0.01, 0.99].
    pub probability: f64,
    pub verdict: Verdict,
    pub certainty: Certainty,
    /// Integer percentage in [0, 100] for display.
    pub confidence_pct: u8,
    /// Short, human-readable notes (fallbacks, agreement, quality hints).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl Assessment {
    /// Build an assessment from a final probability; verdict, certainty and
    /// display confidence are all derived here, nowhere else.
    pub fn from_probability(probability: f64) -> Self {
        let (verdict, certainty) = band(probability);
        Self {
            probability,
            verdict,
            certainty,
            confidence_pct: display_confidence_pct(probability),
            reasons: Vec::new(),
        }
    }

    /// Fixed neutral result for degenerate input (too short to score).
    pub fn neutral(reason: impl Into<String>) -> Self {
        let mut a = Self::from_probability(0.5);
        a.reasons.push(reason.into());
        a
    }

    /// Add one reason (builder style).
    pub fn with_reason(mut self, message: impl Into<String>) -> Self {
        self.reasons.push(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banding_covers_boundaries() {
        assert_eq!(band(0.70), (Verdict::LikelyReal, Certainty::High));
        assert_eq!(band(0.6999), (Verdict::PossiblyReal, Certainty::Medium));
        assert_eq!(band(0.55), (Verdict::PossiblyReal, Certainty::Medium));
        assert_eq!(band(0.5499), (Verdict::Uncertain, Certainty::Low));
        assert_eq!(band(0.45), (Verdict::Uncertain, Certainty::Low));
        assert_eq!(band(0.4499), (Verdict::PossiblyFake, Certainty::Medium));
        assert_eq!(band(0.30), (Verdict::PossiblyFake, Certainty::Medium));
        assert_eq!(band(0.2999), (Verdict::LikelyFake, Certainty::High));
    }

    #[test]
    fn banding_is_total_over_unit_interval() {
        // Every probability lands in exactly one band (the if-chain makes
        // overlap impossible; here we check totality over a dense sweep).
        for i in 0..=1000 {
            let p = i as f64 / 1000.0;
            let (_v, c) = band(p);
            assert_ne!(c, Certainty::NotApplicable, "p={p} must map to a band");
        }
    }

    #[test]
    fn display_confidence_rounds_half_up() {
        assert_eq!(display_confidence_pct(0.7425), 74);
        assert_eq!(display_confidence_pct(0.745), 75); // 74.5 → 75
        assert_eq!(display_confidence_pct(0.5), 50);
        // Below 0.5 the distance from the fake side is reported.
        assert_eq!(display_confidence_pct(0.295), 71); // 70.5 → 71
        assert_eq!(display_confidence_pct(0.01), 99);
    }

    #[test]
    fn serialize_assessment_shape_for_ui() {
        let a = Assessment::from_probability(0.7425)
            .with_reason("models agree (|Δ| = 0.05)");

        let v: serde_json::Value = serde_json::to_value(&a).unwrap();
        assert_eq!(v["verdict"], serde_json::json!("Likely Real"));
        assert_eq!(v["certainty"], serde_json::json!("High"));
        assert_eq!(v["confidence_pct"], serde_json::json!(74));

        let p = v["probability"].as_f64().unwrap();
        assert!((p - 0.7425).abs() < 1e-9, "probability ~= 0.7425, got {p}");
        assert!(v["reasons"].is_array());
    }

    #[test]
    fn neutral_is_uncertain_low() {
        let a = Assessment::neutral("insufficient content");
        assert_eq!(a.verdict, Verdict::Uncertain);
        assert_eq!(a.certainty, Certainty::Low);
        assert_eq!(a.confidence_pct, 50);
        assert_eq!(a.reasons.len(), 1);
    }
}

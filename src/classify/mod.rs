// src/classify/mod.rs
//! Scoring pipeline entry: opinion gate → classifier signals → ensemble →
//! banded verdict. The pipeline owns the "substitute 0.5 on failure" policy;
//! adapters only report success or a typed error.

pub mod adapter;
pub mod remote;

use std::path::PathBuf;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use tracing::info;

use crate::bias::{self, BiasSignal};
use crate::config::ClassifiersConfig;
use crate::ensemble;
use crate::opinion;
use crate::preprocess;
use crate::quality::{self, QualityReport};
use crate::verdict::{Assessment, Certainty};

// Re-export convenient types.
pub use adapter::{
    ClassifierError, DisabledClassifier, DynLexical, DynZeroShot, FixedClassifier,
    LexicalClassifier, ZeroShotClassifier,
};
pub use remote::{CachingZeroShot, RemoteLexical, RemoteZeroShot};

/// Inputs shorter than this (after trim) get the fixed neutral result.
pub const MIN_SCORABLE_CHARS: usize = 10;

/// Result of one scoring call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Opinion/editorial content — the credibility classifier does not apply.
    Opinion {
        verdict: &'static str,
        certainty: Certainty,
    },
    /// A scored document with the full explainability payload.
    Scored {
        #[serde(flatten)]
        assessment: Assessment,
        #[serde(skip_serializing_if = "Option::is_none")]
        quality: Option<QualityReport>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bias: Option<BiasSignal>,
    },
}

impl Outcome {
    fn opinion() -> Self {
        Outcome::Opinion {
            verdict: "Opinion/Editorial",
            certainty: Certainty::NotApplicable,
        }
    }

    fn neutral(reason: impl Into<String>) -> Self {
        Outcome::Scored {
            assessment: Assessment::neutral(reason),
            quality: None,
            bias: None,
        }
    }
}

/// Stateless scorer over the two injected classifier handles. Handles are
/// constructed once at startup (or swapped for fakes in tests) and shared.
pub struct Scorer {
    lexical: DynLexical,
    zeroshot: DynZeroShot,
}

impl Scorer {
    pub fn new(lexical: DynLexical, zeroshot: DynZeroShot) -> Self {
        Self { lexical, zeroshot }
    }

    /// Score one document. Pure apart from the two classifier calls: the
    /// same text and the same signal values always produce the same outcome.
    pub async fn score(&self, text: &str, source_url: Option<&str>) -> Outcome {
        let trimmed = text.trim();

        // Degenerate input: a fixed neutral result instead of a spuriously
        // confident verdict on near-empty text.
        if trimmed.chars().count() < MIN_SCORABLE_CHARS {
            let out = Outcome::neutral(
                "insufficient content to assess; returning the neutral default",
            );
            self.dev_log(trimmed, &out);
            return out;
        }

        if opinion::is_opinion_piece(trimmed, source_url) {
            let out = Outcome::opinion();
            self.dev_log(trimmed, &out);
            return out;
        }

        let quality_report = quality::assess(trimmed);
        let bias_signal = bias::detect_bias_signals(trimmed);

        // The two classifier calls are independent given the same text, so
        // run them concurrently and join before combining.
        let normalized = preprocess::normalize_for_lexical(trimmed);
        let (base_res, zeroshot_res) = tokio::join!(
            self.lexical.p_real(&normalized),
            self.zeroshot.p_legitimate(trimmed),
        );

        let mut reasons = Vec::new();
        let base_proba = unwrap_or_neutral(base_res, "lexical", &mut reasons);
        let zeroshot_proba = unwrap_or_neutral(zeroshot_res, "zero-shot", &mut reasons);

        let agreement = (base_proba - zeroshot_proba).abs();
        if agreement < ensemble::AGREEMENT_THRESHOLD {
            reasons.push(format!("model signals agree (delta {agreement:.2})"));
        } else {
            reasons.push(format!(
                "model signals disagree (delta {agreement:.2}); content quality used as tiebreaker"
            ));
        }
        if quality_report.red_flags < 0.5 {
            reasons.push("sensational phrasing detected".to_string());
        }

        let probability = ensemble::combine(base_proba, zeroshot_proba, quality_report.score);
        let mut assessment = Assessment::from_probability(probability);
        assessment.reasons = reasons;

        let out = Outcome::Scored {
            assessment,
            quality: Some(quality_report),
            bias: Some(bias_signal),
        };
        self.dev_log(trimmed, &out);
        out
    }

    /// Anonymized dev diagnostics. Never logs raw text — only a hashed id.
    fn dev_log(&self, text: &str, outcome: &Outcome) {
        if !dev_logging_enabled() {
            return;
        }
        let id = anon_hash(text);
        match outcome {
            Outcome::Opinion { .. } => {
                info!(target: "credibility", %id, event = "gated_opinion");
            }
            Outcome::Scored { assessment, .. } => {
                info!(
                    target: "credibility",
                    %id,
                    event = "scored",
                    probability = assessment.probability,
                    verdict = ?assessment.verdict,
                    lexical = self.lexical.name(),
                    zeroshot = self.zeroshot.name(),
                );
            }
        }
    }
}

/// Map a classifier failure to the neutral default, visibly: the reason list
/// and the fallback counter both record the substitution.
fn unwrap_or_neutral(
    res: Result<f64, ClassifierError>,
    which: &'static str,
    reasons: &mut Vec<String>,
) -> f64 {
    match res {
        Ok(p) => p,
        Err(e) => {
            counter!("classifier_fallback_total", "classifier" => which).increment(1);
            reasons.push(format!(
                "{which} classifier unavailable ({e}); substituting neutral 0.50"
            ));
            ensemble::NEUTRAL_PROBABILITY
        }
    }
}

/// Build the scorer from runtime config.
///
/// * If `CLASSIFIER_TEST_MODE=mock`, both signals are deterministic fixtures.
/// * Endpoints that are disabled or unconfigured degrade to
///   [`DisabledClassifier`] — the pipeline then leans on the quality score.
pub fn build_scorer(cfg: &ClassifiersConfig) -> Scorer {
    if std::env::var(crate::config::ENV_TEST_MODE)
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Scorer::new(
            Arc::new(FixedClassifier(0.5)),
            Arc::new(FixedClassifier(0.5)),
        );
    }

    let lexical: DynLexical = if cfg.lexical.enabled && !cfg.lexical.endpoint.is_empty() {
        Arc::new(RemoteLexical::new(&cfg.lexical.endpoint))
    } else {
        Arc::new(DisabledClassifier)
    };

    let zeroshot: DynZeroShot = if cfg.zeroshot.enabled && !cfg.zeroshot.endpoint.is_empty() {
        let api_key = std::env::var(&cfg.zeroshot.api_key_env).unwrap_or_default();
        Arc::new(CachingZeroShot::new(
            RemoteZeroShot::new(&cfg.zeroshot.endpoint, api_key),
            PathBuf::from(&cfg.zeroshot.cache_dir),
            cfg.zeroshot.daily_limit,
        ))
    } else {
        Arc::new(DisabledClassifier)
    };

    Scorer::new(lexical, zeroshot)
}

// Dev logging gate: CREDIBILITY_DEV_LOG=1 AND dev env (debug build or
// SHUTTLE_ENV in {local,development,dev}).
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("CREDIBILITY_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Short, anonymized id for a text (first 6 bytes of SHA-256, hex).
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_scorer(base: f64, zeroshot: f64) -> Scorer {
        Scorer::new(
            Arc::new(FixedClassifier(base)),
            Arc::new(FixedClassifier(zeroshot)),
        )
    }

    #[tokio::test]
    async fn short_input_returns_fixed_neutral() {
        let s = fixed_scorer(0.9, 0.9);
        match s.score("   too short   ", None).await {
            Outcome::Scored {
                assessment,
                quality,
                bias,
            } => {
                assert!((assessment.probability - 0.5).abs() < 1e-12);
                assert!(quality.is_none());
                assert!(bias.is_none());
                assert!(!assessment.reasons.is_empty());
            }
            other => panic!("expected neutral scored outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn opinion_text_is_gated_before_classification() {
        let s = fixed_scorer(0.9, 0.9);
        let out = s
            .score(
                "I think the new policy is terrible and I believe it will fail",
                None,
            )
            .await;
        assert!(matches!(out, Outcome::Opinion { .. }));
    }

    #[tokio::test]
    async fn anon_hash_is_short_and_stable() {
        assert_eq!(anon_hash("abc"), anon_hash("abc"));
        assert_eq!(anon_hash("abc").len(), 12);
        assert_ne!(anon_hash("abc"), anon_hash("abd"));
    }
}

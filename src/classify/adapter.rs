//! Classifier adapters: trait seams for the two external probability sources.
//!
//! Everything duck-typed or transport-specific is resolved here; past this
//! boundary a classifier is just a `Result<f64, ClassifierError>` with the
//! value already normalized into [0,1]. The scoring pipeline maps `Err` to
//! the neutral 0.5 default — adapters never do that silently themselves.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Why a classifier signal is unavailable. The pipeline degrades to the
/// neutral default on any of these; the variant only matters for logs and
/// metrics.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier disabled by configuration")]
    Disabled,
    #[error("daily call limit reached")]
    DailyLimit,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned status {0}")]
    Status(u16),
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Bag-of-words model endpoint: P(real) for preprocessed text.
#[async_trait]
pub trait LexicalClassifier: Send + Sync {
    async fn p_real(&self, text: &str) -> Result<f64, ClassifierError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Zero-shot NLI endpoint: P(legitimate news) for raw text.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    async fn p_legitimate(&self, text: &str) -> Result<f64, ClassifierError>;
    fn name(&self) -> &'static str;
}

/// Aliases used by callers.
pub type DynLexical = Arc<dyn LexicalClassifier>;
pub type DynZeroShot = Arc<dyn ZeroShotClassifier>;

/// Always fails with [`ClassifierError::Disabled`]; used when an endpoint is
/// not configured. The pipeline then runs on the remaining signals.
pub struct DisabledClassifier;

#[async_trait]
impl LexicalClassifier for DisabledClassifier {
    async fn p_real(&self, _text: &str) -> Result<f64, ClassifierError> {
        Err(ClassifierError::Disabled)
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[async_trait]
impl ZeroShotClassifier for DisabledClassifier {
    async fn p_legitimate(&self, _text: &str) -> Result<f64, ClassifierError> {
        Err(ClassifierError::Disabled)
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic classifier for tests and local runs: returns a fixed
/// probability (clamped into [0,1] like any other adapter output).
#[derive(Clone, Copy)]
pub struct FixedClassifier(pub f64);

#[async_trait]
impl LexicalClassifier for FixedClassifier {
    async fn p_real(&self, _text: &str) -> Result<f64, ClassifierError> {
        Ok(self.0.clamp(0.0, 1.0))
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[async_trait]
impl ZeroShotClassifier for FixedClassifier {
    async fn p_legitimate(&self, _text: &str) -> Result<f64, ClassifierError> {
        Ok(self.0.clamp(0.0, 1.0))
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_classifier_always_errors() {
        let c = DisabledClassifier;
        assert!(matches!(
            LexicalClassifier::p_real(&c, "any").await,
            Err(ClassifierError::Disabled)
        ));
        assert!(matches!(
            ZeroShotClassifier::p_legitimate(&c, "any").await,
            Err(ClassifierError::Disabled)
        ));
    }

    #[tokio::test]
    async fn fixed_classifier_clamps_into_unit_interval() {
        let c = FixedClassifier(1.7);
        assert_eq!(LexicalClassifier::p_real(&c, "x").await.unwrap(), 1.0);
        let c = FixedClassifier(-0.2);
        assert_eq!(ZeroShotClassifier::p_legitimate(&c, "x").await.unwrap(), 0.0);
    }
}

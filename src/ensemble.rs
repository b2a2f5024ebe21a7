//! # Ensemble Combiner
//! Pure, testable logic that merges the lexical classifier's P(real), the
//! zero-shot classifier's P(legitimate) and the content-quality score into
//! one calibrated probability. No I/O, suitable for unit tests and future
//! offline evaluation.
//!
//! Policy: when the two model signals agree (|Δ| < 0.2) the blend trusts the
//! lexical model most; when they disagree, the quality score acts as the
//! tiebreaker. The blended value is then averaged with the quality score and
//! clamped away from the extremes.

/// Models "agree" when their probabilities differ by less than this.
pub const AGREEMENT_THRESHOLD: f64 = 0.2;

/// Final probabilities are clamped into [FLOOR, CEILING] so a verdict is
/// never reported as a certainty.
pub const PROBABILITY_FLOOR: f64 = 0.01;
pub const PROBABILITY_CEILING: f64 = 0.99;

/// Honest default a caller substitutes when an upstream classifier fails.
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Combine the three signals into one probability of being real.
///
/// Pure and total: given three finite floats in [0,1] this never fails and
/// the result is always in [0.01, 0.99]. Callers are responsible for
/// substituting [`NEUTRAL_PROBABILITY`] when an upstream signal is
/// unavailable and for normalizing model outputs into [0,1] beforehand —
/// there is no error path here.
pub fn combine(base_proba: f64, zeroshot_proba: f64, quality_score: f64) -> f64 {
    let agreement = (base_proba - zeroshot_proba).abs();

    let ensemble = if agreement < AGREEMENT_THRESHOLD {
        // Models agree: weighted blend, lexical model dominant.
        0.7 * base_proba + 0.3 * zeroshot_proba
    } else {
        // Models disagree: quality score as tiebreaker.
        0.4 * base_proba + 0.3 * zeroshot_proba + 0.3 * quality_score
    };

    ((ensemble + quality_score) / 2.0).clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING)
}

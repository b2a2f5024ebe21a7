// src/preprocess.rs
//! Text normalization ahead of scoring.
//!
//! Two distinct shapes are produced here:
//! - [`clean_article_text`] keeps the prose readable (for the quality
//!   heuristic and the zero-shot endpoint, which both want natural text);
//! - [`normalize_for_lexical`] strips the text down to the token stream the
//!   bag-of-words endpoint expects. Stemming and stop-word removal stay on
//!   the model host, next to the vectorizer they were trained with.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("url regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("non-word regex"));
static DIGIT_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w*\d\w*").expect("digit-word regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Decode HTML entities, drop tags and URLs, collapse whitespace.
/// Keeps punctuation and casing — the quality heuristic needs both.
pub fn clean_article_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let no_tags = TAG_RE.replace_all(&decoded, " ");
    let no_urls = URL_RE.replace_all(&no_tags, " ");
    WS_RE.replace_all(&no_urls, " ").trim().to_string()
}

/// Lowercase token stream with URLs, markup, non-word characters and
/// digit-bearing words removed — the input shape of the lexical endpoint.
pub fn normalize_for_lexical(text: &str) -> String {
    let lower = text.to_lowercase();
    let no_urls = URL_RE.replace_all(&lower, "");
    let no_tags = TAG_RE.replace_all(&no_urls, "");
    let words_only = NON_WORD_RE.replace_all(&no_tags, " ");
    let no_digit_words = DIGIT_WORD_RE.replace_all(&words_only, "");
    no_digit_words
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

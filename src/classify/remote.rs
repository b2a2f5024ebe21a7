//! Remote classifier providers: reqwest calls to the two inference endpoints,
//! plus a file cache + daily limit wrapper for the zero-shot call (the
//! expensive one). All comments are in English.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::adapter::{ClassifierError, LexicalClassifier, ZeroShotClassifier};

/// Zero-shot prompt constants. These mirror how the classifier was
/// validated; changing them shifts the calibration of every score.
const ZEROSHOT_INPUT_LIMIT: usize = 1000;
const LABEL_LEGITIMATE: &str = "legitimate news article";
const LABEL_MISLEADING: &str = "misleading or fake content";
const HYPOTHESIS_TEMPLATE: &str = "This text is {}.";

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("news-credibility-analyzer/0.1 (+github.com/lumlich/news-credibility-analyzer)")
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(10))
        .build()
        .expect("reqwest client")
}

// ------------------------------------------------------------
// Lexical model endpoint
// ------------------------------------------------------------

/// Remote bag-of-words model server. Expects a JSON `{"text": ...}` request
/// and answers `{"p_real": <float>}`.
pub struct RemoteLexical {
    http: reqwest::Client,
    endpoint: String,
}

impl RemoteLexical {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: http_client(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LexicalClassifier for RemoteLexical {
    async fn p_real(&self, text: &str) -> Result<f64, ClassifierError> {
        #[derive(Serialize)]
        struct Req<'a> {
            text: &'a str,
        }
        #[derive(Deserialize)]
        struct Resp {
            p_real: f64,
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&Req { text })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ClassifierError::Status(resp.status().as_u16()));
        }
        let body: Resp = resp
            .json()
            .await
            .map_err(|e| ClassifierError::Shape(e.to_string()))?;
        if !body.p_real.is_finite() {
            return Err(ClassifierError::Shape("p_real is not finite".into()));
        }
        Ok(body.p_real.clamp(0.0, 1.0))
    }

    fn name(&self) -> &'static str {
        "remote-lexical"
    }
}

// ------------------------------------------------------------
// Zero-shot endpoint
// ------------------------------------------------------------

/// Remote zero-shot NLI endpoint (HF-inference-style API shape). The label
/// ranking is normalized to the single P(legitimate) value here; nothing
/// list-shaped leaves this adapter.
pub struct RemoteZeroShot {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RemoteZeroShot {
    /// `api_key` may be empty for unauthenticated endpoints.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: http_client(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ZeroShotClassifier for RemoteZeroShot {
    async fn p_legitimate(&self, text: &str) -> Result<f64, ClassifierError> {
        #[derive(Serialize)]
        struct Params<'a> {
            candidate_labels: [&'a str; 2],
            hypothesis_template: &'a str,
            multi_label: bool,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            inputs: &'a str,
            parameters: Params<'a>,
        }
        #[derive(Deserialize)]
        struct Resp {
            labels: Vec<String>,
            scores: Vec<f64>,
        }

        let input: String = text.chars().take(ZEROSHOT_INPUT_LIMIT).collect();
        let req = Req {
            inputs: &input,
            parameters: Params {
                candidate_labels: [LABEL_LEGITIMATE, LABEL_MISLEADING],
                hypothesis_template: HYPOTHESIS_TEMPLATE,
                multi_label: false,
            },
        };

        let mut call = self.http.post(&self.endpoint).json(&req);
        if !self.api_key.is_empty() {
            call = call.bearer_auth(&self.api_key);
        }
        let resp = call.send().await?;
        if !resp.status().is_success() {
            return Err(ClassifierError::Status(resp.status().as_u16()));
        }
        let body: Resp = resp
            .json()
            .await
            .map_err(|e| ClassifierError::Shape(e.to_string()))?;

        let idx = body
            .labels
            .iter()
            .position(|l| l == LABEL_LEGITIMATE)
            .ok_or_else(|| ClassifierError::Shape("legitimate label missing".into()))?;
        let score = body
            .scores
            .get(idx)
            .copied()
            .ok_or_else(|| ClassifierError::Shape("score/label length mismatch".into()))?;
        if !score.is_finite() {
            return Err(ClassifierError::Shape("score is not finite".into()));
        }
        Ok(score.clamp(0.0, 1.0))
    }

    fn name(&self) -> &'static str {
        "remote-zeroshot"
    }
}

// ------------------------------------------------------------
// Caching wrapper (file cache + daily limit)
// ------------------------------------------------------------

/// Wraps a zero-shot classifier with a file cache and a daily call budget.
/// Cache hits do not consume budget; only successful real calls do.
pub struct CachingZeroShot<Z: ZeroShotClassifier> {
    inner: Z,
    cache_dir: PathBuf,
    daily_limit_max: u32,
    counter: Arc<Mutex<DailyCounter>>,
}

impl<Z: ZeroShotClassifier> CachingZeroShot<Z> {
    pub fn new(inner: Z, cache_dir: PathBuf, daily_limit_max: u32) -> Self {
        let _ = fs::create_dir_all(&cache_dir); // best-effort
        let counter = Arc::new(Mutex::new(
            load_daily_counter(&cache_dir).unwrap_or_default(),
        ));
        Self {
            inner,
            cache_dir,
            daily_limit_max,
            counter,
        }
    }

    async fn p_legitimate_impl(&self, text: &str) -> Result<f64, ClassifierError> {
        // 1) Cache lookup first — hits stay free even when the budget is spent.
        let key = cache_key(text);
        if let Some(hit) = read_cache_file(&self.cache_dir, &key) {
            return Ok(hit.p.clamp(0.0, 1.0));
        }

        // 2) Daily limit for real calls.
        {
            let mut g = self.counter.lock().expect("poisoned counter");
            if g.is_expired() {
                g.reset_to_today();
                let _ = save_daily_counter(&self.cache_dir, &g);
            }
            if g.count >= self.daily_limit_max {
                return Err(ClassifierError::DailyLimit);
            }
        }

        // 3) Real call.
        let fresh = self.inner.p_legitimate(text).await?;
        let _ = write_cache_file(&self.cache_dir, &key, &CachedScore { p: fresh });
        let mut g = self.counter.lock().expect("poisoned counter");
        g.count = g.count.saturating_add(1);
        let _ = save_daily_counter(&self.cache_dir, &g);
        Ok(fresh)
    }
}

#[async_trait]
impl<Z: ZeroShotClassifier> ZeroShotClassifier for CachingZeroShot<Z> {
    async fn p_legitimate(&self, text: &str) -> Result<f64, ClassifierError> {
        self.p_legitimate_impl(text).await
    }
    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

// ------------------------------------------------------------
// File cache helpers
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CachedScore {
    p: f64,
}

fn cache_key(input: &str) -> String {
    // DefaultHasher is sufficient for cache keys; this is not a content id.
    let mut hasher = DefaultHasher::new();
    input.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

fn cache_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

fn read_cache_file(dir: &Path, key: &str) -> Option<CachedScore> {
    let path = cache_path(dir, key);
    let mut file = fs::File::open(path).ok()?;
    let mut buf = String::new();
    file.read_to_string(&mut buf).ok()?;
    serde_json::from_str(&buf).ok()
}

fn write_cache_file(dir: &Path, key: &str, value: &CachedScore) -> io::Result<()> {
    let path = cache_path(dir, key);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    let mut f = fs::File::create(&tmp)?;
    f.write_all(json.as_bytes())?;
    fs::rename(tmp, path)?;
    Ok(())
}

// ------------------------------------------------------------
// Daily counter helpers
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DailyCounter {
    date: String,
    count: u32,
}
impl Default for DailyCounter {
    fn default() -> Self {
        Self {
            date: today(),
            count: 0,
        }
    }
}
impl DailyCounter {
    fn is_expired(&self) -> bool {
        self.date != today()
    }
    fn reset_to_today(&mut self) {
        self.date = today();
        self.count = 0;
    }
}

fn today() -> String {
    // Days since UNIX epoch (string). Sufficient for equality and rollover.
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_secs();
    let days = secs / 86_400;
    days.to_string()
}

fn counter_path(dir: &Path) -> PathBuf {
    dir.join("daily_count.json")
}

fn load_daily_counter(dir: &Path) -> io::Result<DailyCounter> {
    let p = counter_path(dir);
    let s = fs::read_to_string(p)?;
    let dc: DailyCounter =
        serde_json::from_str(&s).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(dc)
}

fn save_daily_counter(dir: &Path, dc: &DailyCounter) -> io::Result<()> {
    let p = counter_path(dir);
    let tmp = p.with_extension("json.tmp");
    let s = serde_json::to_string(dc).unwrap_or_else(|_| "{}".to_string());
    let mut f = fs::File::create(&tmp)?;
    f.write_all(s.as_bytes())?;
    fs::rename(tmp, p)?;
    Ok(())
}

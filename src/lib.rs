pub mod calibration;
pub mod clustering;
pub mod config;
pub mod scoring;
pub mod synthesis;
pub mod text;
pub mod trend;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::config::EngineConfig;
use crate::text::PhraseExtractor;

pub use crate::clustering::{build_clusters, ClusterBuilder};
pub use crate::synthesis::{synthesize, SynthesizedIdea};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub url: String,
    pub created_utc: i64,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub author: Option<String>,
}

impl RedditPost {
    pub fn full_text(&self) -> String {
        if self.body.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.body)
        }
    }

    pub fn age_days(&self, now: i64) -> f64 {
        age_days(self.created_utc, now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemPhrase {
    pub post_id: String,
    pub phrase: String,
    pub canonical: String,
    #[serde(default)]
    pub matched_text: String,
    pub detector: String,
}

/// One post as it appears inside an idea, carrying the strongest phrase it
/// contributed and its post score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepresentativePost {
    pub post_id: String,
    pub subreddit: String,
    pub title: String,
    pub url: String,
    pub created_utc: i64,
    pub upvotes: u64,
    pub comments: u64,
    pub phrase: String,
    pub matched_text: String,
    pub detector: String,
    pub pain_hits: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaCluster {
    pub id: String,
    pub title: String,
    pub canonical: String,
    pub phrases: Vec<String>,
    pub posts: Vec<RepresentativePost>,
    pub score: f64,
    pub posts_count: usize,
    pub communities_count: usize,
    pub upvotes_sum: u64,
    pub comments_sum: u64,
    pub trend_bins: Vec<u32>,
    pub trend_slope: f64,
    pub top_keywords: Vec<String>,
    pub sample_snippet: String,
    pub window_days: u32,
}

/// Runs the whole batch: drops posts outside the window, extracts phrases when
/// none are supplied, then clusters and scores.
pub fn mine_ideas(
    posts: &[RedditPost],
    phrases: Option<&[ProblemPhrase]>,
    window_days: u32,
    now: i64,
    config: &EngineConfig,
) -> Result<Vec<IdeaCluster>, String> {
    let in_window: Vec<RedditPost> = posts
        .iter()
        .filter(|post| post.age_days(now) <= window_days as f64)
        .cloned()
        .collect();

    let extracted;
    let phrases = match phrases {
        Some(phrases) => phrases,
        None => {
            let extractor = PhraseExtractor::new(&config.extraction, &config.vocabulary)?;
            extracted = extractor.extract_all(&in_window);
            &extracted[..]
        }
    };

    info!(
        "Mining ideas - posts={}/{}, phrases={}, window_days={}",
        in_window.len(),
        posts.len(),
        phrases.len(),
        window_days
    );

    let ideas = build_clusters(&in_window, phrases, window_days, now, config)?;
    info!("Mining complete - ideas={}", ideas.len());
    Ok(ideas)
}

pub fn age_days(created_utc: i64, now: i64) -> f64 {
    ((now - created_utc) as f64 / SECONDS_PER_DAY).max(0.0)
}

pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}

/// Deterministic idea id: first 16 hex chars of SHA-256 over the signature and
/// window length.
pub fn idea_id(canonical: &str, window_days: u32) -> String {
    format!("{:016x}", stable_hash64(&format!("{}:{}", canonical, window_days)))
}

fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use crate::scoring::{CommunityDiversityConfig, IdeaScoreConfig, PostScoreConfig};
use crate::synthesis::SynthesisConfig;
use crate::text::ExtractionConfig;

/// Ideas backed by fewer distinct posts are never emitted, whatever the
/// configured minimum says.
pub const MIN_CLUSTER_POSTS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub window_days: u32,
    /// Smallest number of distinct posts an idea must have to be emitted.
    pub min_cluster_posts: usize,
    pub max_keywords: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            window_days: 30,
            min_cluster_posts: MIN_CLUSTER_POSTS,
            max_keywords: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub threshold: f64,
    pub largest_first: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            largest_first: true,
        }
    }
}

/// Word lists shared by the canonicalizer, scorer and synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub stopwords: BTreeSet<String>,
    pub pain_words: BTreeSet<String>,
    pub highlight_keywords: BTreeSet<String>,
    pub primary_cues: BTreeSet<String>,
    pub problem_keywords: BTreeSet<String>,
    pub wtp_phrases: BTreeSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            stopwords: word_set(DEFAULT_STOPWORDS),
            pain_words: word_set(&[
                "annoying", "frustrating", "frustrated", "tedious", "painful", "manual",
                "manually", "hate", "struggle", "struggling", "waste", "wasting", "slow",
                "nightmare", "headache", "broken", "hours", "repetitive", "error-prone",
            ]),
            highlight_keywords: word_set(&[
                "automate", "automation", "integrate", "integration", "sync", "export",
                "import", "convert", "track", "schedule", "report", "dashboard",
            ]),
            primary_cues: word_set(&[
                "wish", "need_tool", "how_automate", "manual_work", "frustration",
            ]),
            problem_keywords: word_set(&[
                "manually", "tedious", "time-consuming", "copy paste", "copy-paste",
                "spreadsheet", "workaround", "repetitive",
            ]),
            wtp_phrases: word_set(&[
                "would pay", "i'd pay", "willing to pay", "happy to pay", "pay for",
                "take my money", "shut up and take", "paid tool", "subscription",
            ]),
        }
    }
}

impl Vocabulary {
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn is_primary_cue(&self, detector: &str) -> bool {
        self.primary_cues.contains(detector)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub engine: EngineSettings,
    pub merge: MergeConfig,
    pub post_score: PostScoreConfig,
    pub diversity: CommunityDiversityConfig,
    pub idea_score: IdeaScoreConfig,
    pub vocabulary: Vocabulary,
    pub extraction: ExtractionConfig,
    pub synthesis: SynthesisConfig,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(window) = env::var("IDEA_WINDOW_DAYS") {
            if let Ok(value) = window.parse::<u32>() {
                self.engine.window_days = value;
            }
        }
        if let Ok(threshold) = env::var("IDEA_MERGE_THRESHOLD") {
            if let Ok(value) = threshold.parse::<f64>() {
                self.merge.threshold = value.clamp(0.0, 1.0);
            }
        }
        if let Ok(min_posts) = env::var("IDEA_MIN_CLUSTER_POSTS") {
            if let Ok(value) = min_posts.parse::<usize>() {
                self.engine.min_cluster_posts = value.max(MIN_CLUSTER_POSTS);
            }
        }
        if let Ok(tau) = env::var("IDEA_TAU_DAYS") {
            if let Ok(value) = tau.parse::<f64>() {
                if value > 0.0 {
                    self.post_score.tau_days = value;
                }
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("IDEA_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/ideas.toml")))
}

pub(crate) fn word_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|word| word.to_string()).collect()
}

const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "being", "but", "by", "can", "could", "did", "do", "does", "doing", "each", "every",
    "for", "from", "get", "got", "had", "has", "have", "he", "her", "here", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "me", "more", "my", "no", "not", "of",
    "on", "onto", "or", "our", "out", "over", "she", "should", "so", "some", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "to", "too",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "who", "why", "will",
    "with", "would", "you", "your",
];

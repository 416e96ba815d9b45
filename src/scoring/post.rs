use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::Vocabulary;
use crate::RedditPost;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostScoreConfig {
    pub upvotes: f64,
    pub comments: f64,
    pub recency: f64,
    pub pattern: f64,
    pub pain: f64,
    pub tau_days: f64,
    pub highlight_bonus: f64,
    pub pain_per_hit: f64,
    pub pain_cap: f64,
}

impl Default for PostScoreConfig {
    fn default() -> Self {
        Self {
            upvotes: 1.0,
            comments: 0.5,
            recency: 0.8,
            pattern: 2.0,
            pain: 1.0,
            tau_days: 30.0,
            highlight_bonus: 0.25,
            pain_per_hit: 0.3,
            pain_cap: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostScore {
    pub recency: f64,
    pub pattern_bonus: f64,
    pub pain_hits: usize,
    pub pain_bonus: f64,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct PostScorer {
    weights: PostScoreConfig,
    pain_matcher: Option<Regex>,
    highlight_keywords: BTreeSet<String>,
}

impl PostScorer {
    pub fn new(weights: PostScoreConfig, vocabulary: &Vocabulary) -> Result<Self, String> {
        Ok(Self {
            weights,
            pain_matcher: word_matcher(&vocabulary.pain_words)?,
            highlight_keywords: vocabulary
                .highlight_keywords
                .iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
        })
    }

    /// `log1p(up) + 0.5 log1p(comments) + 0.8 recency + 2.0 pattern + 1.0 pain`
    /// with the weights taken from config.
    pub fn score(
        &self,
        post: &RedditPost,
        pattern_matched: bool,
        representative_phrase: &str,
        now: i64,
    ) -> PostScore {
        let recency = self.recency(post.age_days(now));
        let pattern_bonus = self.pattern_bonus(pattern_matched, representative_phrase);
        let pain_hits = self.pain_hits(&format!("{} {}", post.title, post.body));
        let pain_bonus = (pain_hits as f64 * self.weights.pain_per_hit).min(self.weights.pain_cap);

        let score = self.weights.upvotes * (post.upvotes as f64).ln_1p()
            + self.weights.comments * (post.comments as f64).ln_1p()
            + self.weights.recency * recency
            + self.weights.pattern * pattern_bonus
            + self.weights.pain * pain_bonus;

        PostScore {
            recency,
            pattern_bonus,
            pain_hits,
            pain_bonus,
            score,
        }
    }

    pub fn recency(&self, age_days: f64) -> f64 {
        if self.weights.tau_days <= 0.0 {
            return 0.0;
        }
        (-age_days.max(0.0) / self.weights.tau_days).exp()
    }

    pub fn pattern_bonus(&self, pattern_matched: bool, representative_phrase: &str) -> f64 {
        if !pattern_matched {
            return 0.0;
        }
        let lowercase = representative_phrase.to_lowercase();
        let highlighted = self
            .highlight_keywords
            .iter()
            .any(|keyword| lowercase.contains(keyword.as_str()));
        if highlighted {
            1.0 + self.weights.highlight_bonus
        } else {
            1.0
        }
    }

    /// Counts every word-bounded, case-insensitive occurrence of a pain word.
    pub fn pain_hits(&self, text: &str) -> usize {
        self.pain_matcher
            .as_ref()
            .map(|matcher| matcher.find_iter(text).count())
            .unwrap_or(0)
    }
}

fn word_matcher(words: &BTreeSet<String>) -> Result<Option<Regex>, String> {
    let alternatives: Vec<String> = words
        .iter()
        .map(|word| word.trim())
        .filter(|word| !word.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }

    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|err| format!("failed to compile pain word matcher: {}", err))
}

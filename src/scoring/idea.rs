use serde::{Deserialize, Serialize};

use crate::round2;
use crate::scoring::CommunityDiversityScorer;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeaScoreConfig {
    pub volume_base: f64,
    pub volume_weight: f64,
}

impl Default for IdeaScoreConfig {
    fn default() -> Self {
        Self {
            volume_base: 0.8,
            volume_weight: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdeaScorer {
    config: IdeaScoreConfig,
    diversity: CommunityDiversityScorer,
}

impl IdeaScorer {
    pub fn new(config: IdeaScoreConfig, diversity: CommunityDiversityScorer) -> Self {
        Self { config, diversity }
    }

    /// `sum(post_scores) * diversity * (0.8 + 0.2 * log1p(count))`, rounded to
    /// two decimals.
    pub fn score(&self, post_scores: &[f64], unique_communities: usize) -> f64 {
        if post_scores.is_empty() {
            return 0.0;
        }
        let total: f64 = post_scores.iter().sum();
        let diversity = self.diversity.multiplier(unique_communities);
        let volume = (post_scores.len() as f64).ln_1p();
        round2(total * diversity * (self.config.volume_base + self.config.volume_weight * volume))
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityDiversityConfig {
    pub step: f64,
    pub cap: f64,
}

impl Default for CommunityDiversityConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            cap: 1.5,
        }
    }
}

/// Rewards ideas that surface in several communities, saturating at `cap`.
#[derive(Debug, Clone)]
pub struct CommunityDiversityScorer {
    config: CommunityDiversityConfig,
}

impl CommunityDiversityScorer {
    pub fn new(config: CommunityDiversityConfig) -> Self {
        Self { config }
    }

    pub fn multiplier(&self, unique_communities: usize) -> f64 {
        let extra = unique_communities.saturating_sub(1) as f64;
        (1.0 + self.config.step * extra).min(self.config.cap)
    }
}

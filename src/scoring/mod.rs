pub mod diversity;
pub mod idea;
pub mod post;

pub use diversity::{CommunityDiversityConfig, CommunityDiversityScorer};
pub use idea::{IdeaScoreConfig, IdeaScorer};
pub use post::{PostScore, PostScoreConfig, PostScorer};

pub mod canonical;
pub mod extract;
pub mod similarity;

pub use canonical::{canonicalize, normalize_tokens, stem};
pub use extract::{CuePattern, ExtractionConfig, PhraseExtractor};
pub use similarity::{dice, jaro, jaro_winkler, phrase_similarity};

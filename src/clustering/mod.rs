pub mod builder;
pub mod draft;

pub use builder::{build_clusters, top_keywords, ClusterBuilder};
pub use draft::{group_by_signature, merge_similar, ClusterDraft, PhraseCount};

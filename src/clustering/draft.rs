use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::{MergeConfig, Vocabulary};
use crate::text::phrase_similarity;
use crate::ProblemPhrase;

#[derive(Debug, Clone, PartialEq)]
pub struct PhraseCount {
    pub phrase: String,
    pub count: usize,
}

/// A provisional group of phrases. Frequencies keep insertion order so the
/// representative tie-break is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterDraft {
    pub canonical: String,
    pub entries: Vec<ProblemPhrase>,
    pub frequencies: Vec<PhraseCount>,
}

impl ClusterDraft {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            entries: Vec::new(),
            frequencies: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ProblemPhrase) {
        match self
            .frequencies
            .iter_mut()
            .find(|count| count.phrase == entry.phrase)
        {
            Some(count) => count.count += 1,
            None => self.frequencies.push(PhraseCount {
                phrase: entry.phrase.clone(),
                count: 1,
            }),
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most frequent phrase; the earliest one wins a tie.
    pub fn representative(&self) -> Option<&str> {
        let mut best: Option<&PhraseCount> = None;
        for count in &self.frequencies {
            if best.map_or(true, |current| count.count > current.count) {
                best = Some(count);
            }
        }
        best.map(|count| count.phrase.as_str())
    }

    pub fn phrases(&self) -> Vec<String> {
        self.frequencies
            .iter()
            .map(|count| count.phrase.clone())
            .collect()
    }

    pub fn distinct_posts(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.post_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Combines two drafts into a new one. `target` keeps its signature and its
    /// entries come first; neither input is modified.
    pub fn merge(target: &ClusterDraft, absorbed: &ClusterDraft) -> ClusterDraft {
        let mut merged = ClusterDraft {
            canonical: target.canonical.clone(),
            entries: target.entries.clone(),
            frequencies: target.frequencies.clone(),
        };
        merged.entries.extend(absorbed.entries.iter().cloned());
        for count in &absorbed.frequencies {
            match merged
                .frequencies
                .iter_mut()
                .find(|existing| existing.phrase == count.phrase)
            {
                Some(existing) => existing.count += count.count,
                None => merged.frequencies.push(count.clone()),
            }
        }
        merged
    }

    /// One entry per post, in order of first appearance. Primary-cue detectors
    /// beat generic hits, then the longer phrase wins.
    pub fn choose_post_entries(&self, vocabulary: &Vocabulary) -> Vec<&ProblemPhrase> {
        let mut order: Vec<&str> = Vec::new();
        let mut chosen: HashMap<&str, &ProblemPhrase> = HashMap::new();

        for entry in &self.entries {
            match chosen.get(entry.post_id.as_str()) {
                None => {
                    order.push(entry.post_id.as_str());
                    chosen.insert(entry.post_id.as_str(), entry);
                }
                Some(&current) => {
                    if is_stronger(entry, current, vocabulary) {
                        chosen.insert(entry.post_id.as_str(), entry);
                    }
                }
            }
        }

        order
            .into_iter()
            .filter_map(|post_id| chosen.get(post_id).copied())
            .collect()
    }
}

fn is_stronger(candidate: &ProblemPhrase, current: &ProblemPhrase, vocabulary: &Vocabulary) -> bool {
    let candidate_primary = vocabulary.is_primary_cue(&candidate.detector);
    let current_primary = vocabulary.is_primary_cue(&current.detector);
    if candidate_primary != current_primary {
        return candidate_primary;
    }
    candidate.phrase.chars().count() > current.phrase.chars().count()
}

/// Groups phrases by canonical signature in first-seen order. Phrases with an
/// empty signature are dropped.
pub fn group_by_signature(phrases: &[ProblemPhrase]) -> Vec<ClusterDraft> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut drafts: Vec<ClusterDraft> = Vec::new();

    for phrase in phrases {
        if phrase.canonical.is_empty() {
            debug!("Skipping phrase with empty signature - post={}", phrase.post_id);
            continue;
        }
        let slot = *index.entry(phrase.canonical.as_str()).or_insert_with(|| {
            drafts.push(ClusterDraft::new(phrase.canonical.clone()));
            drafts.len() - 1
        });
        drafts[slot].push(phrase.clone());
    }

    drafts
}

/// Folds drafts whose representatives are similar enough into earlier
/// accepted drafts. With `largest_first` the biggest drafts are accepted
/// first and act as merge targets.
pub fn merge_similar(mut drafts: Vec<ClusterDraft>, config: &MergeConfig) -> Vec<ClusterDraft> {
    if config.largest_first {
        drafts.sort_by(|a, b| b.len().cmp(&a.len()));
    }

    let mut accepted: Vec<ClusterDraft> = Vec::new();
    for draft in drafts {
        let Some(representative) = draft.representative().map(str::to_lowercase) else {
            continue;
        };

        let target = accepted.iter().position(|candidate| {
            candidate
                .representative()
                .map(|other| {
                    phrase_similarity(&representative, &other.to_lowercase()) >= config.threshold
                })
                .unwrap_or(false)
        });

        match target {
            Some(idx) => {
                debug!(
                    "Merging draft - from={}, into={}, entries={}",
                    draft.canonical,
                    accepted[idx].canonical,
                    draft.len()
                );
                let merged = ClusterDraft::merge(&accepted[idx], &draft);
                accepted[idx] = merged;
            }
            None => accepted.push(draft),
        }
    }

    accepted
}

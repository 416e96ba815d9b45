use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

use crate::clustering::draft::{group_by_signature, merge_similar, ClusterDraft};
use crate::config::{EngineConfig, Vocabulary, MIN_CLUSTER_POSTS};
use crate::scoring::{CommunityDiversityScorer, IdeaScorer, PostScorer};
use crate::text::normalize_tokens;
use crate::trend::compute_trend;
use crate::{idea_id, IdeaCluster, ProblemPhrase, RedditPost, RepresentativePost};

pub struct ClusterBuilder<'a> {
    config: &'a EngineConfig,
    post_scorer: PostScorer,
    idea_scorer: IdeaScorer,
}

impl<'a> ClusterBuilder<'a> {
    pub fn new(config: &'a EngineConfig) -> Result<Self, String> {
        let post_scorer = PostScorer::new(config.post_score.clone(), &config.vocabulary)?;
        let idea_scorer = IdeaScorer::new(
            config.idea_score.clone(),
            CommunityDiversityScorer::new(config.diversity.clone()),
        );
        Ok(Self {
            config,
            post_scorer,
            idea_scorer,
        })
    }

    pub fn build(
        &self,
        posts: &[RedditPost],
        phrases: &[ProblemPhrase],
        window_days: u32,
        now: i64,
    ) -> Vec<IdeaCluster> {
        let drafts = group_by_signature(phrases);
        let signature_count = drafts.len();
        let merged = merge_similar(drafts, &self.config.merge);
        debug!(
            "Drafts merged - signatures={}, merged={}, threshold={}",
            signature_count,
            merged.len(),
            self.config.merge.threshold
        );

        let post_index: HashMap<&str, &RedditPost> =
            posts.iter().map(|post| (post.id.as_str(), post)).collect();

        let mut ideas: Vec<IdeaCluster> = merged
            .iter()
            .filter_map(|draft| self.finalize(draft, &post_index, window_days, now))
            .collect();

        ideas.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        info!(
            "Clusters built - drafts={}, ideas={}, window_days={}",
            merged.len(),
            ideas.len(),
            window_days
        );
        ideas
    }

    fn finalize(
        &self,
        draft: &ClusterDraft,
        post_index: &HashMap<&str, &RedditPost>,
        window_days: u32,
        now: i64,
    ) -> Option<IdeaCluster> {
        let min_posts = self.config.engine.min_cluster_posts.max(MIN_CLUSTER_POSTS);
        let vocabulary = &self.config.vocabulary;

        let chosen = draft.choose_post_entries(vocabulary);
        if chosen.len() < min_posts {
            return None;
        }

        let mut posts: Vec<RepresentativePost> = Vec::with_capacity(chosen.len());
        for entry in chosen {
            let Some(post) = post_index.get(entry.post_id.as_str()) else {
                continue;
            };
            let pattern_matched = vocabulary.is_primary_cue(&entry.detector);
            let breakdown = self.post_scorer.score(post, pattern_matched, &entry.phrase, now);
            posts.push(RepresentativePost {
                post_id: post.id.clone(),
                subreddit: post.subreddit.clone(),
                title: post.title.clone(),
                url: post.url.clone(),
                created_utc: post.created_utc,
                upvotes: post.upvotes,
                comments: post.comments,
                phrase: entry.phrase.clone(),
                matched_text: entry.matched_text.clone(),
                detector: entry.detector.clone(),
                pain_hits: breakdown.pain_hits,
                score: breakdown.score,
            });
        }

        if posts.is_empty() {
            debug!("Skipping draft with no resolvable posts - canonical={}", draft.canonical);
            return None;
        }
        if posts.len() < min_posts {
            debug!(
                "Skipping draft below minimum size - canonical={}, resolved={}",
                draft.canonical,
                posts.len()
            );
            return None;
        }

        posts.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let communities: BTreeSet<&str> = posts.iter().map(|post| post.subreddit.as_str()).collect();
        let scores: Vec<f64> = posts.iter().map(|post| post.score).collect();
        let score = self.idea_scorer.score(&scores, communities.len());
        let trend = compute_trend(posts.iter().map(|post| post.created_utc), window_days, now);

        Some(IdeaCluster {
            id: idea_id(&draft.canonical, window_days),
            title: draft.representative().unwrap_or(draft.canonical.as_str()).to_string(),
            canonical: draft.canonical.clone(),
            phrases: draft.phrases(),
            score,
            posts_count: posts.len(),
            communities_count: communities.len(),
            upvotes_sum: posts.iter().map(|post| post.upvotes).sum(),
            comments_sum: posts.iter().map(|post| post.comments).sum(),
            trend_bins: trend.bins,
            trend_slope: trend.slope,
            top_keywords: top_keywords(draft, vocabulary, self.config.engine.max_keywords),
            sample_snippet: posts
                .first()
                .map(|post| post.matched_text.clone())
                .unwrap_or_default(),
            window_days,
            posts,
        })
    }
}

pub fn build_clusters(
    posts: &[RedditPost],
    phrases: &[ProblemPhrase],
    window_days: u32,
    now: i64,
    config: &EngineConfig,
) -> Result<Vec<IdeaCluster>, String> {
    let builder = ClusterBuilder::new(config)?;
    Ok(builder.build(posts, phrases, window_days, now))
}

/// Most frequent non-stopword tokens over the draft's phrases, weighted by
/// how often each phrase was seen. Ties fall back to alphabetical order.
pub fn top_keywords(draft: &ClusterDraft, vocabulary: &Vocabulary, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for phrase in &draft.frequencies {
        for token in normalize_tokens(&phrase.phrase) {
            if vocabulary.is_stopword(&token) {
                continue;
            }
            *counts.entry(token).or_insert(0) += phrase.count;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(token, _)| token).collect()
}

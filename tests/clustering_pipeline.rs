use idea_miner::clustering::{group_by_signature, merge_similar, top_keywords, ClusterDraft};
use idea_miner::config::{EngineConfig, MergeConfig, Vocabulary};
use idea_miner::{
    build_clusters, idea_id, mine_ideas, IdeaCluster, ProblemPhrase, RedditPost, SECONDS_PER_DAY,
};

const NOW: i64 = 1_700_000_000;

fn post(id: &str, subreddit: &str, title: &str, age_days: f64, upvotes: u64) -> RedditPost {
    RedditPost {
        id: id.to_string(),
        subreddit: subreddit.to_string(),
        title: title.to_string(),
        body: String::new(),
        url: format!("https://reddit.com/r/{}/{}", subreddit, id),
        created_utc: NOW - (age_days * SECONDS_PER_DAY) as i64,
        upvotes,
        comments: 3,
        author: None,
    }
}

fn phrase(post_id: &str, text: &str, canonical: &str, detector: &str) -> ProblemPhrase {
    ProblemPhrase {
        post_id: post_id.to_string(),
        phrase: text.to_string(),
        canonical: canonical.to_string(),
        matched_text: format!("{} (context)", text),
        detector: detector.to_string(),
    }
}

fn summary(ideas: &[IdeaCluster]) -> Vec<(String, f64, Vec<String>)> {
    ideas
        .iter()
        .map(|idea| {
            (
                idea.id.clone(),
                idea.score,
                idea.posts.iter().map(|post| post.post_id.clone()).collect(),
            )
        })
        .collect()
}

fn jira_fixture() -> (Vec<RedditPost>, Vec<ProblemPhrase>) {
    let posts = vec![
        post(
            "p1",
            "productivity",
            "How do I automate turning meeting notes into Jira tasks?",
            2.0,
            40,
        ),
        post(
            "p2",
            "jira",
            "Every week I need to copy paste meeting notes into Jira",
            9.0,
            12,
        ),
    ];
    let phrases = vec![
        phrase("p1", "Meeting Notes Into Jira Tasks", "jira_meet_note_task", "how_automate"),
        phrase("p2", "Copy Paste Meeting Notes Into Jira Tasks", "jira_meet_note_task", "manual_work"),
    ];
    (posts, phrases)
}

#[test]
fn meeting_notes_posts_form_one_idea() {
    let (posts, phrases) = jira_fixture();
    let config = EngineConfig::default();

    let ideas = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();

    assert_eq!(ideas.len(), 1);
    let idea = &ideas[0];
    assert_eq!(idea.posts_count, 2);
    assert_eq!(idea.communities_count, 2);
    assert_eq!(idea.canonical, "jira_meet_note_task");
    assert_eq!(idea.id, idea_id("jira_meet_note_task", 30));
    assert_eq!(idea.id.len(), 16);
    assert_eq!(idea.upvotes_sum, 52);
    assert_eq!(idea.comments_sum, 6);
    assert_eq!(idea.trend_bins.len(), 5);
    assert_eq!(idea.trend_bins.iter().sum::<u32>(), 2);
    assert_eq!(idea.window_days, 30);
    assert!(idea.score > 0.0);
    assert!(idea.top_keywords.len() <= 5);
    assert!(idea.top_keywords.contains(&"jira".to_string()));
    assert!(idea.posts[0].score >= idea.posts[1].score);
    assert_eq!(idea.sample_snippet, idea.posts[0].matched_text);
}

#[test]
fn idea_id_depends_on_window() {
    assert_eq!(idea_id("jira_meet_note_task", 30), idea_id("jira_meet_note_task", 30));
    assert_ne!(idea_id("jira_meet_note_task", 30), idea_id("jira_meet_note_task", 7));
}

#[test]
fn posts_count_ignores_extra_phrases_from_same_post() {
    let (posts, mut phrases) = jira_fixture();
    phrases.push(phrase(
        "p1",
        "Turning Meeting Notes Into Jira Tasks Automatically Every Week",
        "jira_meet_note_task",
        "keyword",
    ));
    let config = EngineConfig::default();

    let ideas = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();

    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].posts_count, 2);
    assert_eq!(ideas[0].phrases.len(), 3);
    let chosen = ideas[0]
        .posts
        .iter()
        .find(|post| post.post_id == "p1")
        .unwrap();
    assert_eq!(chosen.detector, "how_automate");
}

#[test]
fn longer_phrase_wins_between_equal_detectors() {
    let vocabulary = Vocabulary::default();
    let drafts = group_by_signature(&[
        phrase("p1", "Notes To Jira", "jira_note", "keyword"),
        phrase("p1", "Meeting Notes To Jira", "jira_note", "keyword"),
        phrase("p2", "Notes To Jira", "jira_note", "keyword"),
    ]);

    let chosen = drafts[0].choose_post_entries(&vocabulary);
    assert_eq!(chosen.len(), 2);
    assert_eq!(chosen[0].post_id, "p1");
    assert_eq!(chosen[0].phrase, "Meeting Notes To Jira");
    assert_eq!(chosen[1].post_id, "p2");
}

#[test]
fn single_post_drafts_are_never_emitted() {
    let posts = vec![post("p1", "smallbusiness", "Invoices", 1.0, 5)];
    let phrases = vec![
        phrase("p1", "Export Invoices", "export_invoice", "wish"),
        phrase("p1", "Export Invoices To Pdf", "export_invoice", "keyword"),
    ];
    let config = EngineConfig::default();

    let ideas = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();
    assert!(ideas.is_empty());
}

#[test]
fn minimum_size_below_two_still_drops_single_post_ideas() {
    let posts = vec![post("p1", "smallbusiness", "Invoices", 1.0, 5)];
    let phrases = vec![phrase("p1", "Export Invoices", "export_invoice", "wish")];
    let mut config = EngineConfig::default();
    config.engine.min_cluster_posts = 1;

    let ideas = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();
    assert!(ideas.is_empty());

    config.engine.min_cluster_posts = 0;
    let ideas = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();
    assert!(ideas.is_empty());
}

#[test]
fn drafts_with_missing_posts_are_skipped() {
    let (posts, _) = jira_fixture();
    let phrases = vec![
        phrase("ghost1", "Track Gym Workouts", "gym_track_workout", "wish"),
        phrase("ghost2", "Track Gym Workouts", "gym_track_workout", "wish"),
        phrase("p1", "Track Gym Workouts", "gym_track_workout", "wish"),
    ];
    let config = EngineConfig::default();

    let ideas = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();
    assert!(ideas.is_empty());
}

#[test]
fn configured_minimum_size_is_respected() {
    let (posts, phrases) = jira_fixture();
    let mut config = EngineConfig::default();
    config.engine.min_cluster_posts = 3;

    let ideas = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();
    assert!(ideas.is_empty());
}

#[test]
fn empty_signatures_never_form_drafts() {
    let drafts = group_by_signature(&[
        phrase("p1", "The And Of", "", "wish"),
        phrase("p2", "Export Invoices", "export_invoice", "wish"),
    ]);
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].canonical, "export_invoice");
}

#[test]
fn representative_prefers_frequency_then_first_seen() {
    let drafts = group_by_signature(&[
        phrase("p1", "Sync Notion Tasks", "notion_sync_task", "wish"),
        phrase("p2", "Notion Task Sync", "notion_sync_task", "wish"),
        phrase("p3", "Notion Task Sync", "notion_sync_task", "wish"),
    ]);
    assert_eq!(drafts[0].representative(), Some("Notion Task Sync"));

    let tied = group_by_signature(&[
        phrase("p1", "Sync Notion Tasks", "notion_sync_task", "wish"),
        phrase("p2", "Notion Task Sync", "notion_sync_task", "wish"),
    ]);
    assert_eq!(tied[0].representative(), Some("Sync Notion Tasks"));
}

#[test]
fn merge_builds_a_new_draft_from_both_inputs() {
    let drafts = group_by_signature(&[
        phrase("p1", "Export Invoices", "export_invoice", "wish"),
        phrase("p2", "Export Invoices", "export_invoice", "wish"),
        phrase("p3", "Export Invoice", "export_invoic", "wish"),
        phrase("p4", "Export Invoices", "export_invoic", "wish"),
    ]);
    let target = drafts[0].clone();
    let absorbed = drafts[1].clone();

    let merged = ClusterDraft::merge(&drafts[0], &drafts[1]);

    assert_eq!(drafts[0], target);
    assert_eq!(drafts[1], absorbed);
    assert_eq!(merged.canonical, "export_invoice");
    assert_eq!(merged.len(), 4);
    assert_eq!(merged.distinct_posts(), 4);
    assert_eq!(merged.frequencies.len(), 2);
    assert_eq!(merged.frequencies[0].phrase, "Export Invoices");
    assert_eq!(merged.frequencies[0].count, 3);
    assert_eq!(merged.representative(), Some("Export Invoices"));
}

#[test]
fn larger_drafts_absorb_similar_smaller_ones() {
    let drafts = group_by_signature(&[
        phrase("p9", "Automaticaly Export Invoices To Quickbooks", "automaticaly_export_invoice_quickbook", "wish"),
        phrase("p1", "Automatically Export Invoices To Quickbooks", "automatically_export_invoice_quickbook", "wish"),
        phrase("p2", "Automatically Export Invoices To Quickbooks", "automatically_export_invoice_quickbook", "wish"),
        phrase("p3", "Automatically Export Invoices To Quickbooks", "automatically_export_invoice_quickbook", "wish"),
        phrase("p4", "Track Gym Workouts", "gym_track_workout", "wish"),
    ]);
    assert_eq!(drafts.len(), 3);

    let merged = merge_similar(drafts, &MergeConfig::default());

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].canonical, "automatically_export_invoice_quickbook");
    assert_eq!(merged[0].len(), 4);
    assert_eq!(
        merged[0].representative(),
        Some("Automatically Export Invoices To Quickbooks")
    );
    assert_eq!(merged[1].canonical, "gym_track_workout");
}

#[test]
fn merge_threshold_is_configurable() {
    let drafts = group_by_signature(&[
        phrase("p1", "Automatically Export Invoices To Quickbooks", "automatically_export_invoice_quickbook", "wish"),
        phrase("p2", "Automaticaly Export Invoices To Quickbooks", "automaticaly_export_invoice_quickbook", "wish"),
    ]);
    let strict = MergeConfig {
        threshold: 0.999,
        largest_first: true,
    };
    assert_eq!(merge_similar(drafts, &strict).len(), 2);
}

#[test]
fn top_keywords_skip_stopwords_and_weight_by_frequency() {
    let vocabulary = Vocabulary::default();
    let drafts = group_by_signature(&[
        phrase("p1", "Export Invoices To Quickbooks", "export_invoice_quickbook", "wish"),
        phrase("p2", "Export Invoices To Quickbooks", "export_invoice_quickbook", "wish"),
        phrase("p3", "Export Invoices From Stripe", "export_invoice_quickbook", "wish"),
    ]);

    let keywords = top_keywords(&drafts[0], &vocabulary, 3);
    assert_eq!(keywords, vec!["export", "invoices", "quickbooks"]);
    assert!(!keywords.contains(&"to".to_string()));
}

#[test]
fn ideas_are_sorted_by_score_and_deterministic() {
    let mut posts = Vec::new();
    let mut phrases = Vec::new();
    for (idx, upvotes) in [5u64, 8].iter().enumerate() {
        let id = format!("gym{}", idx);
        posts.push(post(&id, "fitness", "Tracking workouts", 3.0, *upvotes));
        phrases.push(phrase(&id, "Track Gym Workouts", "gym_track_workout", "keyword"));
    }
    for (idx, upvotes) in [300u64, 120, 80].iter().enumerate() {
        let id = format!("inv{}", idx);
        let subreddit = if idx == 0 { "accounting" } else { "smallbusiness" };
        posts.push(post(&id, subreddit, "Invoices are tedious", 1.0, *upvotes));
        phrases.push(phrase(&id, "Export Invoices To Quickbooks", "export_invoice_quickbook", "wish"));
    }
    let config = EngineConfig::default();

    let first = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();
    let second = build_clusters(&posts, &phrases, 30, NOW, &config).unwrap();

    assert_eq!(first.len(), 2);
    assert!(first[0].score >= first[1].score);
    assert_eq!(first[0].canonical, "export_invoice_quickbook");
    assert_eq!(first[0].communities_count, 2);

    assert_eq!(summary(&first), summary(&second));
    assert!(first.iter().all(|idea| idea.posts_count >= 2));
}

#[test]
fn mine_ideas_extracts_phrases_and_drops_stale_posts() {
    let text = "I wish there was a tool to sync Notion tasks with Google Calendar";
    let posts = vec![
        post("n1", "notion", text, 1.0, 20),
        post("n2", "productivity", text, 4.0, 15),
        post("n3", "notion", text, 60.0, 500),
    ];
    let config = EngineConfig::default();

    let ideas = mine_ideas(&posts, None, 30, NOW, &config).unwrap();

    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].posts_count, 2);
    assert_eq!(ideas[0].upvotes_sum, 35);
    assert!(ideas[0].posts.iter().all(|post| post.detector == "wish"));
    assert_eq!(ideas[0].title, "Tool To Sync Notion Tasks With Google Calendar");
}

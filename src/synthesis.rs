use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::config::Vocabulary;
use crate::text::extract::split_sentences;
use crate::IdeaCluster;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRule {
    pub needles: Vec<String>,
    pub requirement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Extra complexity contributed when any of `terms` appears in the idea text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityTerm {
    pub terms: Vec<String>,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub platforms: Vec<PlatformRule>,
    pub default_requirements: Vec<String>,
    pub personas: Vec<PersonaRule>,
    pub default_persona: String,
    pub complexity_base: f64,
    pub complexity_per_requirement: f64,
    pub complexity_terms: Vec<ComplexityTerm>,
    /// `(wtp mentions, summed upvotes)` needed for worth buckets 1, 2 and 3.
    pub worth_thresholds: Vec<(usize, u64)>,
    pub price_bands: Vec<String>,
    pub monetization: Vec<String>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            platforms: vec![
                platform(&["jira"], "Jira API integration"),
                platform(&["github"], "GitHub API integration"),
                platform(&["gitlab"], "GitLab API integration"),
                platform(&["slack"], "Slack app / webhook"),
                platform(&["discord"], "Discord bot"),
                platform(&["notion"], "Notion API integration"),
                platform(&["email", "gmail", "outlook", "inbox"], "Email ingestion (IMAP / Gmail API)"),
                platform(&["pdf"], "PDF parsing & extraction"),
                platform(&["sheet", "excel", "csv"], "Spreadsheet import / export"),
                platform(&["calendar", "meeting"], "Calendar integration"),
                platform(&["stripe", "billing"], "Stripe billing"),
                platform(&["shopify"], "Shopify app"),
                platform(&["quickbooks", "xero"], "Accounting software sync"),
                platform(&["salesforce", "hubspot", "crm"], "CRM integration"),
                platform(&["zapier", "webhook"], "Webhook / Zapier connector"),
            ],
            default_requirements: vec![
                "Web app with user accounts".to_string(),
                "CSV import / export".to_string(),
            ],
            personas: vec![
                persona("Developers & engineering teams", &["github", "gitlab", "jira", "code", "deploy", "api", "bug", "pull request"]),
                persona("Finance & bookkeeping teams", &["invoice", "receipt", "expense", "accounting", "quickbooks", "tax", "bookkeeping"]),
                persona("Sales & marketing teams", &["crm", "lead", "hubspot", "salesforce", "campaign", "newsletter", "outreach"]),
                persona("Recruiters & HR", &["candidate", "hiring", "resume", "recruit", "onboarding", "interview"]),
                persona("E-commerce sellers", &["shopify", "inventory", "order", "etsy", "amazon", "shipping"]),
                persona("Project managers", &["meeting", "notes", "task", "standup", "project", "deadline"]),
                persona("Researchers & students", &["paper", "citation", "research", "study", "thesis"]),
            ],
            default_persona: "Builders & operators".to_string(),
            complexity_base: 1.0,
            complexity_per_requirement: 0.6,
            complexity_terms: vec![
                complexity(&["pdf"], 0.8),
                complexity(&["email"], 0.4),
                complexity(&["web", "webhook"], 0.9),
                complexity(&["realtime", "real-time", "live"], 0.7),
                complexity(&["model", "ml", "machine learning"], 1.2),
                complexity(&["billing", "oauth"], 0.8),
                complexity(&["dashboard", "editor", "drag", "visual", "design", "ui"], 0.6),
                complexity(&["tax", "legal", "medical", "compliance", "payroll", "accounting"], 0.7),
            ],
            worth_thresholds: vec![(1, 50), (2, 200), (3, 500)],
            price_bands: vec![
                "$0–9/mo".to_string(),
                "$9–19/mo".to_string(),
                "$19–49/mo".to_string(),
                "$49–99/mo".to_string(),
            ],
            monetization: vec![
                "Free tier with a one-time paid export or template pack".to_string(),
                "Freemium with a low-cost pro plan".to_string(),
                "Per-seat subscription for small teams".to_string(),
                "Team subscription with usage-based add-ons".to_string(),
            ],
        }
    }
}

fn platform(needles: &[&str], requirement: &str) -> PlatformRule {
    PlatformRule {
        needles: needles.iter().map(|needle| needle.to_string()).collect(),
        requirement: requirement.to_string(),
    }
}

fn persona(name: &str, keywords: &[&str]) -> PersonaRule {
    PersonaRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
    }
}

fn complexity(terms: &[&str], weight: f64) -> ComplexityTerm {
    ComplexityTerm {
        terms: terms.iter().map(|term| term.to_string()).collect(),
        weight,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexityTier {
    WeekendBuild,
    OneToTwoWeeks,
    Complex,
}

impl ComplexityTier {
    pub fn from_score(score: f64) -> Self {
        if score <= 2.0 {
            ComplexityTier::WeekendBuild
        } else if score <= 3.5 {
            ComplexityTier::OneToTwoWeeks
        } else {
            ComplexityTier::Complex
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplexityTier::WeekendBuild => "Weekend build",
            ComplexityTier::OneToTwoWeeks => "1–2 weeks",
            ComplexityTier::Complex => "Complex",
        }
    }

    pub fn effort_days(self) -> u32 {
        match self {
            ComplexityTier::WeekendBuild => 2,
            ComplexityTier::OneToTwoWeeks => 7,
            ComplexityTier::Complex => 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedIdea {
    pub idea_id: String,
    pub name: String,
    pub pitch: String,
    pub target_users: String,
    pub requirements: Vec<String>,
    pub complexity_score: f64,
    pub complexity_tier: ComplexityTier,
    pub effort_days: u32,
    pub wtp_mentions: usize,
    pub worth_bucket: usize,
    pub price_band: String,
    pub monetization: String,
    pub pain_intensity: usize,
    pub value_proposition: String,
}

/// Rule-based description of an idea. Missing signal degrades to the generic
/// persona and requirements instead of failing.
pub fn synthesize(
    cluster: &IdeaCluster,
    config: &SynthesisConfig,
    vocabulary: &Vocabulary,
) -> SynthesizedIdea {
    let focus_text = format!("{} {}", cluster.title, cluster.top_keywords.join(" ")).to_lowercase();
    let cluster_text = cluster_text(cluster);

    let matched = guess_requirements(&focus_text, config);
    let complexity_score = complexity_score(&focus_text, matched.len(), config);
    let complexity_tier = ComplexityTier::from_score(complexity_score);
    let requirements = if matched.is_empty() {
        config.default_requirements.clone()
    } else {
        matched
    };

    let wtp_mentions = wtp_mentions(cluster, vocabulary);
    let worth_bucket = worth_bucket(wtp_mentions, cluster.upvotes_sum, config);
    let price_band = pick(&config.price_bands, worth_bucket);
    let monetization = pick(&config.monetization, worth_bucket);

    let target_users = choose_persona(&cluster_text, config);
    let pain_intensity = cluster
        .posts
        .iter()
        .map(|post| post.pain_hits)
        .sum::<usize>()
        .max(1);

    let pitch = format!(
        "A {} tool for {} that handles \"{}\" ({} posts across {} communities).",
        complexity_tier.label().to_lowercase(),
        target_users.to_lowercase(),
        cluster.title,
        cluster.posts_count,
        cluster.communities_count
    );

    SynthesizedIdea {
        idea_id: cluster.id.clone(),
        name: cluster.title.clone(),
        pitch,
        target_users,
        requirements,
        complexity_score,
        complexity_tier,
        effort_days: complexity_tier.effort_days(),
        wtp_mentions,
        worth_bucket,
        price_band,
        monetization,
        pain_intensity,
        value_proposition: value_proposition(pain_intensity),
    }
}

pub fn guess_requirements(text: &str, config: &SynthesisConfig) -> Vec<String> {
    let mut requirements: Vec<String> = Vec::new();
    for rule in &config.platforms {
        let hit = rule
            .needles
            .iter()
            .any(|needle| text.contains(needle.to_lowercase().as_str()));
        if hit && !requirements.contains(&rule.requirement) {
            requirements.push(rule.requirement.clone());
        }
    }
    requirements
}

pub fn complexity_score(text: &str, requirement_count: usize, config: &SynthesisConfig) -> f64 {
    let tokens: Vec<&str> = text
        .split(|ch: char| !(ch.is_alphanumeric() || ch == '-'))
        .filter(|token| !token.is_empty())
        .collect();

    let mut score = config.complexity_base + config.complexity_per_requirement * requirement_count as f64;
    for term in &config.complexity_terms {
        if term.terms.iter().any(|needle| mentions(text, &tokens, needle)) {
            score += term.weight;
        }
    }
    score
}

/// Multi-word terms match as substrings, single words as whole tokens so
/// that "ml" does not fire inside "html".
fn mentions(text: &str, tokens: &[&str], needle: &str) -> bool {
    if needle.contains(' ') {
        text.contains(needle)
    } else {
        tokens.iter().any(|token| *token == needle)
    }
}

pub fn worth_bucket(wtp_mentions: usize, upvotes: u64, config: &SynthesisConfig) -> usize {
    config
        .worth_thresholds
        .iter()
        .take_while(|(mentions, votes)| wtp_mentions >= *mentions || upvotes >= *votes)
        .count()
}

fn choose_persona(text: &str, config: &SynthesisConfig) -> String {
    let mut best: Option<(&PersonaRule, usize)> = None;
    for rule in &config.personas {
        let hits = rule
            .keywords
            .iter()
            .filter(|keyword| text.contains(keyword.to_lowercase().as_str()))
            .count();
        if hits > 0 && best.map_or(true, |(_, current)| hits > current) {
            best = Some((rule, hits));
        }
    }
    best.map(|(rule, _)| rule.name.clone())
        .unwrap_or_else(|| config.default_persona.clone())
}

fn value_proposition(pain_intensity: usize) -> String {
    let low = pain_intensity.min(10);
    let high = low * 2 + 1;
    format!("Saves {}–{} hours/week", low, high)
}

fn cluster_text(cluster: &IdeaCluster) -> String {
    let mut parts: Vec<&str> = vec![cluster.title.as_str(), cluster.sample_snippet.as_str()];
    parts.extend(cluster.phrases.iter().map(String::as_str));
    parts.extend(cluster.top_keywords.iter().map(String::as_str));
    for post in &cluster.posts {
        parts.push(post.title.as_str());
        parts.push(post.matched_text.as_str());
    }
    parts.join(" ").to_lowercase()
}

/// Number of distinct sentences in the cluster that express willingness to
/// pay. A sentence counts once however many phrases it contains, and the
/// sample snippet is not counted again when a post already carries it.
pub fn wtp_mentions(cluster: &IdeaCluster, vocabulary: &Vocabulary) -> usize {
    let phrases: Vec<String> = vocabulary
        .wtp_phrases
        .iter()
        .map(|phrase| phrase.to_lowercase())
        .collect();

    let mut sources: Vec<&str> = vec![cluster.title.as_str(), cluster.sample_snippet.as_str()];
    sources.extend(cluster.phrases.iter().map(String::as_str));
    let mut seen_posts: HashSet<&str> = HashSet::new();
    for post in &cluster.posts {
        if seen_posts.insert(post.post_id.as_str()) {
            sources.push(post.title.as_str());
            sources.push(post.matched_text.as_str());
        }
    }

    let sentences: BTreeSet<String> = sources
        .into_iter()
        .flat_map(split_sentences)
        .map(str::to_lowercase)
        .collect();

    sentences
        .iter()
        .filter(|sentence| phrases.iter().any(|phrase| sentence.contains(phrase.as_str())))
        .count()
}

fn pick(values: &[String], index: usize) -> String {
    values
        .get(index)
        .or_else(|| values.last())
        .cloned()
        .unwrap_or_default()
}

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::Vocabulary;
use crate::text::canonicalize;
use crate::{ProblemPhrase, RedditPost};

/// A structural cue. `pattern` is matched case-insensitively against one
/// sentence; its first capture group becomes the phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuePattern {
    pub id: String,
    pub pattern: String,
}

impl CuePattern {
    fn new(id: &str, pattern: &str) -> Self {
        Self {
            id: id.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub cues: Vec<CuePattern>,
    pub keyword_detector: String,
    pub max_phrase_chars: usize,
    pub min_phrase_words: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            cues: vec![
                CuePattern::new(
                    "wish",
                    r"\bi wish (?:there (?:was|were) |i had |i could )?(?:an? |some )?(.+)",
                ),
                CuePattern::new(
                    "need_tool",
                    r"\b(?:is there|looking for|need|know of) (?:an? |any )(?:tool|app|way|service|software|solution) (?:to|that|for|which) (.+)",
                ),
                CuePattern::new(
                    "how_automate",
                    r"\bhow (?:do|can|would|should) (?:i|we|you) (?:automate|streamline|speed up|simplify) (.+)",
                ),
                CuePattern::new(
                    "manual_work",
                    r"\b(?:i|we) (?:have to|need to|spend (?:hours|ages|too long)) (?:manually )?(.+)",
                ),
                CuePattern::new(
                    "frustration",
                    r"\b(?:sick of|tired of|frustrated (?:with|by)|hate having to) (.+)",
                ),
            ],
            keyword_detector: "keyword".to_string(),
            max_phrase_chars: 80,
            min_phrase_words: 2,
        }
    }
}

pub struct PhraseExtractor {
    cues: Vec<(String, Regex)>,
    keyword_detector: String,
    problem_keywords: Vec<String>,
    max_phrase_chars: usize,
    min_phrase_words: usize,
    vocabulary: Vocabulary,
}

impl PhraseExtractor {
    pub fn new(config: &ExtractionConfig, vocabulary: &Vocabulary) -> Result<Self, String> {
        let mut cues = Vec::with_capacity(config.cues.len());
        for cue in &config.cues {
            let regex = Regex::new(&format!("(?i){}", cue.pattern))
                .map_err(|err| format!("invalid cue pattern {}: {}", cue.id, err))?;
            cues.push((cue.id.clone(), regex));
        }

        Ok(Self {
            cues,
            keyword_detector: config.keyword_detector.clone(),
            problem_keywords: vocabulary.problem_keywords.iter().cloned().collect(),
            max_phrase_chars: config.max_phrase_chars.max(1),
            min_phrase_words: config.min_phrase_words.max(1),
            vocabulary: vocabulary.clone(),
        })
    }

    pub fn extract_all(&self, posts: &[RedditPost]) -> Vec<ProblemPhrase> {
        posts.iter().flat_map(|post| self.extract(post)).collect()
    }

    /// At most one phrase per sentence and one per (post, signature).
    pub fn extract(&self, post: &RedditPost) -> Vec<ProblemPhrase> {
        let mut phrases = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for sentence in split_sentences(&post.full_text()) {
            let Some((detector, raw)) = self.detect(sentence) else {
                continue;
            };
            let Some(phrase) = self.build_phrase(raw) else {
                continue;
            };
            let canonical = canonicalize(&phrase, &self.vocabulary);
            if canonical.is_empty() || !seen.insert(canonical.clone()) {
                continue;
            }
            phrases.push(ProblemPhrase {
                post_id: post.id.clone(),
                phrase,
                canonical,
                matched_text: sentence.to_string(),
                detector,
            });
        }

        phrases
    }

    fn detect<'s>(&self, sentence: &'s str) -> Option<(String, &'s str)> {
        for (id, regex) in &self.cues {
            if let Some(captures) = regex.captures(sentence) {
                let matched = captures.get(1).or_else(|| captures.get(0))?;
                return Some((id.clone(), matched.as_str()));
            }
        }

        let lowercase = sentence.to_lowercase();
        if self
            .problem_keywords
            .iter()
            .any(|keyword| lowercase.contains(keyword.as_str()))
        {
            return Some((self.keyword_detector.clone(), sentence));
        }

        None
    }

    fn build_phrase(&self, raw: &str) -> Option<String> {
        let clause = clip_clause(raw);
        let words: Vec<&str> = clause.split_whitespace().collect();
        if words.len() < self.min_phrase_words {
            return None;
        }

        let mut phrase = String::new();
        for word in words {
            let word = title_case(word);
            let extra = if phrase.is_empty() { 0 } else { 1 };
            if phrase.chars().count() + extra + word.chars().count() > self.max_phrase_chars {
                break;
            }
            if !phrase.is_empty() {
                phrase.push(' ');
            }
            phrase.push_str(&word);
        }

        if phrase.is_empty() {
            None
        } else {
            Some(phrase)
        }
    }
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(|ch: char| matches!(ch, '.' | '!' | '?' | '\n'))
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

fn clip_clause(raw: &str) -> &str {
    let mut end = raw.len();
    for separator in [",", ";", ":", " because ", " but ", " so that "] {
        if let Some(idx) = raw.find(separator) {
            end = end.min(idx);
        }
    }
    raw[..end].trim_matches(|ch: char| ch.is_whitespace() || ch == '"' || ch == '\'')
}

pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

use crate::model::DocumentModel;
use crate::text::{ends_with_page_number, is_all_caps};
use crate::types::{Topic, TopicKind};
use regex::Regex;
use std::sync::LazyLock;

static SUBTOPIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}\.\d{1,2}\.").unwrap());

static NUMBERING_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d.\s]*$").unwrap());

/// Normalize a heading or TOC entry: tabs become spaces, digits are dropped,
/// surrounding punctuation (numbering dots, dot leaders) is stripped and
/// whitespace is collapsed. Case is preserved.
pub fn normalize_topic(text: &str) -> String {
    let without_digits: String = text
        .chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_ascii_digit())
        .collect();

    without_digits
        .trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || c == '…')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn comparison_key(text: &str) -> String {
    normalize_topic(text).to_uppercase()
}

/// Expected heading vocabulary, in table-of-contents order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicSet {
    pub main_topics: Vec<Topic>,
    pub subtopics: Vec<Topic>,
}

impl TopicSet {
    pub fn is_empty(&self) -> bool {
        self.main_topics.is_empty() && self.subtopics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.main_topics.len() + self.subtopics.len()
    }

    pub fn main_match(&self, text: &str) -> Option<&Topic> {
        let key = comparison_key(text);
        if key.is_empty() {
            return None;
        }
        self.main_topics
            .iter()
            .find(|topic| topic.label.to_uppercase() == key)
    }

    pub fn sub_match(&self, text: &str) -> Option<&Topic> {
        let key = comparison_key(text);
        if key.is_empty() {
            return None;
        }
        self.subtopics
            .iter()
            .find(|topic| topic.label.to_uppercase() == key)
    }

    pub fn matches_any(&self, text: &str) -> bool {
        self.main_match(text).is_some() || self.sub_match(text).is_some()
    }

    /// All topics merged back into table-of-contents order
    pub fn in_order(&self) -> Vec<&Topic> {
        let mut all: Vec<&Topic> = self.main_topics.iter().chain(&self.subtopics).collect();
        all.sort_by_key(|topic| topic.ordinal);
        all
    }

    /// The topic following the first one whose label contains `needle`
    pub fn topic_after(&self, needle: &str) -> Option<(&Topic, Option<&Topic>)> {
        let needle = needle.to_uppercase();
        let ordered = self.in_order();
        let position = ordered
            .iter()
            .position(|topic| topic.label.to_uppercase().contains(&needle))?;
        Some((ordered[position], ordered.get(position + 1).copied()))
    }
}

/// Builds the topic vocabulary from the structured TOC, or from the
/// paragraphs following the contents marker when there is none.
pub struct TopicExtractor<'a> {
    contents_marker: &'a str,
}

impl<'a> TopicExtractor<'a> {
    pub fn new(contents_marker: &'a str) -> Self {
        Self { contents_marker }
    }

    pub fn extract(&self, model: &DocumentModel) -> TopicSet {
        let entries = match &model.table_of_contents {
            Some(entries) if entries.iter().any(|e| !e.trim().is_empty()) => {
                log::debug!("Using structured table of contents ({} entries)", entries.len());
                entries.clone()
            }
            _ => self.manual_entries(model),
        };
        build_topics(&entries)
    }

    /// Paragraphs after the contents marker, up to the first blank one
    fn manual_entries(&self, model: &DocumentModel) -> Vec<String> {
        let marker = self.contents_marker.to_uppercase();
        let Some(start) = model
            .paragraphs
            .iter()
            .position(|p| p.trimmed_text().to_uppercase().contains(&marker))
        else {
            return Vec::new();
        };

        let entries: Vec<String> = model.paragraphs[start + 1..]
            .iter()
            .take_while(|p| !p.is_blank())
            .map(|p| p.trimmed_text().to_string())
            .collect();
        log::debug!("Found '{}', scanned {} entries manually", self.contents_marker, entries.len());
        entries
    }
}

/// Classify raw TOC entries. Entries without a trailing page number wrap onto
/// the next line and are joined with it before classification.
pub fn build_topics(entries: &[String]) -> TopicSet {
    let mut topics = TopicSet::default();
    let mut pending: Option<String> = None;
    let mut ordinal = 0;

    let mut push = |raw: &str, topics: &mut TopicSet| {
        if NUMBERING_ONLY.is_match(raw) {
            return;
        }
        let label = normalize_topic(raw);
        if label.is_empty() {
            return;
        }
        let kind = classify(raw, &label);
        let topic = Topic { label, kind, ordinal };
        ordinal += 1;
        match kind {
            TopicKind::Main => topics.main_topics.push(topic),
            TopicKind::Sub => topics.subtopics.push(topic),
        }
    };

    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        if ends_with_page_number(entry) {
            let full = match pending.take() {
                Some(head) => format!("{head} {entry}"),
                None => entry.to_string(),
            };
            push(&full, &mut topics);
        } else {
            pending = Some(match pending.take() {
                Some(head) => format!("{head} {entry}"),
                None => entry.to_string(),
            });
        }
    }

    if let Some(rest) = pending {
        push(&rest, &mut topics);
    }

    topics
}

fn classify(raw: &str, normalized: &str) -> TopicKind {
    // Digits are already gone from the normalized label
    if is_all_caps(normalized) {
        TopicKind::Main
    } else if SUBTOPIC_PATTERN.is_match(raw) {
        TopicKind::Sub
    } else {
        TopicKind::Main
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Paragraph;

    fn entries(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_strips_numbering_and_leaders() {
        assert_eq!(normalize_topic("1.2. Data sources\t12"), "Data sources");
        assert_eq!(normalize_topic("INTRODUCTION ........ 5"), "INTRODUCTION");
        assert_eq!(normalize_topic("2  ANALYSIS:"), "ANALYSIS");
    }

    #[test]
    fn test_classification() {
        let topics = build_topics(&entries(&[
            "INTRODUCTION\t5",
            "1.1. Problem statement\t6",
            "1.2. Existing solutions\t8",
            "CONCLUSIONS\t40",
        ]));
        let main: Vec<_> = topics.main_topics.iter().map(|t| t.label.as_str()).collect();
        let sub: Vec<_> = topics.subtopics.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(main, vec!["INTRODUCTION", "CONCLUSIONS"]);
        assert_eq!(sub, vec!["Problem statement", "Existing solutions"]);
        assert_eq!(topics.subtopics[1].ordinal, 2);
    }

    #[test]
    fn test_unnumbered_mixed_case_entry_defaults_to_main() {
        let topics = build_topics(&entries(&["List of abbreviations 3"]));
        assert_eq!(topics.main_topics.len(), 1);
        assert_eq!(topics.main_topics[0].kind, TopicKind::Main);
    }

    #[test]
    fn test_wrapped_entries_are_joined() {
        let topics = build_topics(&entries(&[
            "1.3. Comparison of existing approaches to automated",
            "document verification\t14",
            "CONCLUSIONS\t40",
        ]));
        assert_eq!(topics.subtopics.len(), 1);
        assert_eq!(
            topics.subtopics[0].label,
            "Comparison of existing approaches to automated document verification"
        );
        assert_eq!(topics.main_topics.len(), 1);
    }

    #[test]
    fn test_trailing_buffer_is_flushed() {
        let topics = build_topics(&entries(&["INTRODUCTION 5", "APPENDICES"]));
        assert_eq!(topics.main_topics.len(), 2);
        assert_eq!(topics.main_topics[1].label, "APPENDICES");
    }

    #[test]
    fn test_numbering_only_lines_are_dropped() {
        let topics = build_topics(&entries(&["12", "...", "INTRODUCTION 5"]));
        assert_eq!(topics.len(), 1);
    }

    #[test]
    fn test_matching_is_case_insensitive_on_normalized_text() {
        let topics = build_topics(&entries(&["INTRODUCTION 5", "1.1. Problem statement 6"]));
        assert!(topics.main_match("Introduction").is_some());
        assert!(topics.sub_match("1.1. PROBLEM STATEMENT").is_some());
        assert!(topics.main_match("Problem statement").is_none());
        assert!(!topics.matches_any(""));
    }

    #[test]
    fn test_manual_extraction_stops_at_blank_paragraph() {
        let model = DocumentModel::from_paragraphs(vec![
            Paragraph::new("Title page"),
            Paragraph::new("CONTENTS"),
            Paragraph::new("INTRODUCTION\t3"),
            Paragraph::new("PROJECT STAGES\t4"),
            Paragraph::new(""),
            Paragraph::new("INTRODUCTION"),
        ]);
        let topics = TopicExtractor::new("CONTENTS").extract(&model);
        assert_eq!(topics.main_topics.len(), 2);
    }

    #[test]
    fn test_structured_toc_takes_precedence() {
        let mut model = DocumentModel::from_paragraphs(vec![
            Paragraph::new("CONTENTS"),
            Paragraph::new("SOMETHING ELSE 2"),
        ]);
        model.table_of_contents = Some(entries(&["INTRODUCTION 3"]));
        let topics = TopicExtractor::new("CONTENTS").extract(&model);
        assert_eq!(topics.main_topics[0].label, "INTRODUCTION");
        assert_eq!(topics.len(), 1);
    }

    #[test]
    fn test_topic_after() {
        let topics = build_topics(&entries(&["INTRODUCTION 3", "PROJECT STAGES 4", "DEADLINES 5"]));
        let (topic, next) = topics.topic_after("project stages").unwrap();
        assert_eq!(topic.label, "PROJECT STAGES");
        assert_eq!(next.unwrap().label, "DEADLINES");
    }
}

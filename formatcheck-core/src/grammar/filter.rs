use super::provider::ProviderMatch;
use super::similarity::is_near;
use crate::config::GrammarConfig;
use crate::error::CheckError;
use crate::text::snippet;
use crate::types::{Finding, FindingCategory};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// First word quoted in a provider message: «word», "word" or “word”
static QUOTED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[«"“](.+?)[»"”]"#).unwrap());

/// Slice `text` by UTF-16 offset and length, the unit the provider counts in
fn utf16_slice(text: &str, offset: usize, length: usize) -> Option<String> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let end = offset.checked_add(length)?;
    let slice = units.get(offset..end)?;
    String::from_utf16(slice).ok()
}

fn utf16_prefix(text: &str, offset: usize) -> String {
    let units: Vec<u16> = text.encode_utf16().take(offset).collect();
    String::from_utf16_lossy(&units)
}

/// Removes provider false positives and renders the remaining matches.
pub struct GrammarFilter<'a> {
    config: &'a GrammarConfig,
    exceptions: &'a HashSet<String>,
    abbreviation: Regex,
}

impl<'a> GrammarFilter<'a> {
    pub fn new(
        config: &'a GrammarConfig,
        exceptions: &'a HashSet<String>,
    ) -> Result<Self, CheckError> {
        let pattern = format!(r"\b[{}]{{2,}}\b", config.abbreviation_alphabet);
        let abbreviation = Regex::new(&pattern)
            .map_err(|_| CheckError::InvalidAlphabet(config.abbreviation_alphabet.clone()))?;
        Ok(Self {
            config,
            exceptions,
            abbreviation,
        })
    }

    fn abbreviations<'t>(&self, text: &'t str) -> HashSet<&'t str> {
        self.abbreviation.find_iter(text).map(|m| m.as_str()).collect()
    }

    fn offending_text(text: &str, m: &ProviderMatch) -> String {
        utf16_slice(text, m.offset, m.length)
            .or_else(|| utf16_slice(&m.context.text, m.context.offset, m.context.length))
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    fn suggested_word(m: &ProviderMatch, offending: &str) -> String {
        if let Some(caps) = QUOTED_WORD.captures(&m.message) {
            return caps[1].to_string();
        }
        m.replacements
            .first()
            .map(|r| r.value.clone())
            .unwrap_or_else(|| offending.to_string())
    }

    fn is_exception(&self, word: &str) -> bool {
        !word.is_empty() && self.exceptions.iter().any(|exception| is_near(word, exception))
    }

    fn is_false_uppercase(&self, text: &str, m: &ProviderMatch, offending: &str) -> bool {
        if m.rule.id != self.config.uppercase_rule_id {
            return false;
        }
        let before = utf16_prefix(text, m.offset);
        before.trim_end().ends_with(';') || offending.to_lowercase() == offending
    }

    /// Surviving matches as findings, in provider order
    pub fn filter(&self, text: &str, page: Option<u32>, matches: &[ProviderMatch]) -> Vec<Finding> {
        let abbreviations = self.abbreviations(text);
        let sentence = snippet(text, self.config.snippet_words);
        let page_label = page.map(|p| p.to_string()).unwrap_or_else(|| "?".to_string());

        matches
            .iter()
            .filter_map(|m| {
                let offending = Self::offending_text(text, m);
                let suggested = Self::suggested_word(m, &offending);

                if abbreviations.contains(offending.as_str())
                    || abbreviations.contains(suggested.as_str())
                {
                    return None;
                }
                if self.is_exception(&offending) {
                    return None;
                }
                if self.is_false_uppercase(text, m, &offending) {
                    return None;
                }
                if offending.is_empty() && self.config.empty_span_messages.contains(&m.message) {
                    return None;
                }

                Some(
                    Finding::new(
                        FindingCategory::Grammar,
                        format!(
                            "Issue on page {page_label}: {} → '{offending}' \
                             (suggested: {suggested}) in sentence: {sentence}",
                            m.message
                        ),
                    )
                    .on_page(page)
                    .with_text(offending),
                )
            })
            .collect()
    }
}

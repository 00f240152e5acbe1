// Grammar pass - one provider request per body paragraph, filtered locally:
// - provider.rs: GrammarProvider trait, wire types, LanguageTool client
// - filter.rs: false-positive suppression and finding rendering
// - similarity.rs: edit distance for exception words

pub mod filter;
pub mod provider;
pub mod similarity;

pub use filter::GrammarFilter;
pub use provider::{GrammarProvider, ProviderMatch};

#[cfg(feature = "languagetool")]
pub use provider::LanguageToolProvider;

use crate::error::ProviderError;
use crate::model::DocumentModel;
use crate::types::{Finding, FindingCategory, Zone};
use crate::zones::ZoneMap;

pub struct GrammarPass<'a> {
    provider: &'a dyn GrammarProvider,
    filter: GrammarFilter<'a>,
    language: &'a str,
}

impl<'a> GrammarPass<'a> {
    pub fn new(
        provider: &'a dyn GrammarProvider,
        filter: GrammarFilter<'a>,
        language: &'a str,
    ) -> Self {
        Self {
            provider,
            filter,
            language,
        }
    }

    /// Check every body paragraph outside tables, sequentially
    pub fn run(&self, model: &DocumentModel, zones: &ZoneMap) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut requests = 0usize;

        for (index, paragraph) in model.paragraphs.iter().enumerate() {
            let in_body = zones.zone_of(index) == Some(Zone::Body);
            if !in_body || paragraph.in_table || paragraph.is_blank() {
                continue;
            }

            let text = paragraph.trimmed_text();
            requests += 1;
            match self.provider.check(text, self.language) {
                Ok(matches) => findings.extend(self.filter.filter(text, paragraph.page, &matches)),
                Err(ProviderError::Decode(reason)) => {
                    log::warn!(
                        "Skipping paragraph {index}: unreadable {} response ({reason})",
                        self.provider.name()
                    );
                }
                Err(e) => {
                    log::warn!(
                        "{} request failed for paragraph {index}: {e}",
                        self.provider.name()
                    );
                    findings.push(
                        Finding::new(FindingCategory::GrammarError, format!("Error: {e}"))
                            .on_page(paragraph.page),
                    );
                }
            }
        }

        log::info!(
            "Grammar pass: {requests} requests, {} findings",
            findings.len()
        );
        findings
    }
}

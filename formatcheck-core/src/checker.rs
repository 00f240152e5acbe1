use crate::access::DocumentAccess;
use crate::config::{ConfigManager, ProfileConfig};
use crate::error::CheckError;
use crate::grammar::{GrammarFilter, GrammarPass, GrammarProvider};
use crate::model::DocumentModel;
use crate::rules::RuleEngine;
use crate::topics::TopicExtractor;
use crate::types::*;
use crate::zones::ZoneMap;
use anyhow::Result;
use chrono::Utc;
use std::cell::RefCell;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Collects timings for the stages of one check
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        log::debug!("{step_name}: {}ms", elapsed.as_millis());
        self.timings.push((step_name.to_string(), elapsed));
        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }
}

pub struct FormatChecker {
    config_manager: ConfigManager,
    rule_engine: RuleEngine,
    provider: Option<Box<dyn GrammarProvider>>,
    profiling: bool,
    step_timings: RefCell<Vec<(String, Duration)>>,
}

impl FormatChecker {
    /// Built-in profiles, no grammar provider
    pub fn new() -> Result<Self> {
        Ok(Self::new_with_dependencies(ConfigManager::new()?, None))
    }

    /// Create FormatChecker with full dependency injection
    pub fn new_with_dependencies(
        config_manager: ConfigManager,
        provider: Option<Box<dyn GrammarProvider>>,
    ) -> Self {
        Self {
            config_manager,
            rule_engine: RuleEngine::new(),
            provider,
            profiling: false,
            step_timings: RefCell::new(Vec::new()),
        }
    }

    /// Built-in profiles with the LanguageTool provider at `endpoint`
    #[cfg(feature = "languagetool")]
    pub fn new_with_languagetool(endpoint: &str) -> Result<Self> {
        let provider = crate::grammar::LanguageToolProvider::new(endpoint);
        Ok(Self::new_with_dependencies(
            ConfigManager::new()?,
            Some(Box::new(provider)),
        ))
    }

    pub fn set_profiling(&mut self, enabled: bool) {
        self.profiling = enabled;
    }

    pub fn set_provider(&mut self, provider: Box<dyn GrammarProvider>) {
        self.provider = Some(provider);
    }

    pub fn load_custom_config(&mut self, config_path: &str) -> Result<()> {
        log::info!("Loading custom profile from: {config_path}");
        self.config_manager.load_config_from_file(config_path)?;
        Ok(())
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    /// Per-checker timings of the last formatting run
    pub fn rule_timings(&self) -> Vec<(String, Duration)> {
        self.rule_engine.rule_timings.borrow().clone()
    }

    /// Stage timings of the last check, empty unless profiling is enabled
    pub fn step_timings(&self) -> Vec<(String, Duration)> {
        self.step_timings.borrow().clone()
    }

    /// Checker surface: never fails, errors become the `{error}` outcome
    pub fn check(
        &self,
        access: &dyn DocumentAccess,
        document_type: &str,
        run_formatting: bool,
        run_grammar: bool,
        exception_words: &HashSet<String>,
    ) -> CheckOutcome {
        let result = self.try_check(
            access,
            document_type,
            run_formatting,
            run_grammar,
            exception_words,
        );
        match result {
            Ok(report) => CheckOutcome::Report(report),
            Err(e) => {
                log::warn!("Check rejected: {e}");
                CheckOutcome::error(e.to_string())
            }
        }
    }

    pub fn try_check(
        &self,
        access: &dyn DocumentAccess,
        document_type: &str,
        run_formatting: bool,
        run_grammar: bool,
        exception_words: &HashSet<String>,
    ) -> Result<CheckReport, CheckError> {
        let doc_type: DocumentType = document_type.parse()?;
        let config = self
            .config_manager
            .get_config(&doc_type)
            .ok_or_else(|| CheckError::UnknownDocumentType(document_type.to_string()))?;

        let model = DocumentModel::capture(access)?;
        self.check_model(&model, config, run_formatting, run_grammar, exception_words)
    }

    /// Run one profile over an already captured model
    pub fn check_model(
        &self,
        model: &DocumentModel,
        config: &ProfileConfig,
        run_formatting: bool,
        run_grammar: bool,
        exception_words: &HashSet<String>,
    ) -> Result<CheckReport, CheckError> {
        if model.is_empty() {
            return Err(CheckError::EmptyDocument);
        }

        self.step_timings.borrow_mut().clear();
        let mut profiler = StepProfiler::new(self.profiling);
        let topics = profiler.time_step("Topic extraction", || {
            TopicExtractor::new(&config.markers.contents).extract(model)
        });
        let zones = profiler.time_step("Zone tracking", || {
            ZoneMap::build(
                &model.paragraphs,
                &config.markers,
                &topics,
                config.appendix_policy,
            )
        });
        log::info!(
            "{}: {} main topics, {} subtopics, {} paragraphs unscanned",
            config.document_type,
            topics.main_topics.len(),
            topics.subtopics.len(),
            zones.unscanned()
        );

        if config.requires_contents && !zones.has_contents() {
            return Err(CheckError::MissingContents(config.markers.contents.clone()));
        }

        // Built before any request so a bad alphabet is a configuration error
        let grammar_filter = if run_grammar {
            Some(GrammarFilter::new(&config.grammar, exception_words)?)
        } else {
            None
        };

        let formatting = if run_formatting {
            profiler.time_step("Formatting checks", || {
                self.rule_engine.apply_rules(model, &zones, &topics, config)
            })
        } else {
            Vec::new()
        };

        let grammar = match (grammar_filter, self.provider.as_deref()) {
            (None, _) => Vec::new(),
            (Some(filter), Some(provider)) => profiler.time_step("Grammar pass", || {
                GrammarPass::new(provider, filter, &config.grammar.language).run(model, &zones)
            }),
            (Some(_), None) => {
                log::warn!("Grammar check requested but no provider is configured");
                vec![Finding::new(
                    FindingCategory::GrammarError,
                    "Error: no grammar provider is configured",
                )]
            }
        };

        *self.step_timings.borrow_mut() = profiler.timings().to_vec();
        Ok(CheckReport {
            document_type: config.document_type.clone(),
            checked_at: Utc::now(),
            formatting,
            grammar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::SnapshotDocument;

    fn checker() -> FormatChecker {
        FormatChecker::new().unwrap()
    }

    fn document(lines: &[&str]) -> SnapshotDocument {
        SnapshotDocument {
            paragraphs: lines.iter().map(|l| Paragraph::new(l)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_document_type_is_an_error_outcome() {
        let doc = document(&["text"]);
        let outcome = checker().check(&doc, "appendix", true, false, &HashSet::new());
        assert!(outcome.is_error());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["error"], "Unknown document part: appendix");
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let doc = document(&["", "\x0c"]);
        let outcome = checker().check(&doc, "entry", true, false, &HashSet::new());
        assert!(outcome.is_error());
    }

    #[test]
    fn test_missing_contents_is_rejected_when_required() {
        let doc = document(&["INTRODUCTION", "Text"]);
        let result = checker().try_check(&doc, "main_part", true, false, &HashSet::new());
        assert_eq!(result.unwrap_err(), CheckError::MissingContents("CONTENTS".to_string()));

        // Title pages have no contents page
        assert!(checker().try_check(&doc, "entry", true, false, &HashSet::new()).is_ok());
    }

    #[test]
    fn test_grammar_without_provider_is_one_error_finding() {
        let doc = document(&["CONTENTS", "INTRODUCTION 3", "", "INTRODUCTION", "Text"]);
        let report = checker()
            .try_check(&doc, "main_part", false, true, &HashSet::new())
            .unwrap();
        assert!(report.formatting.is_empty());
        assert_eq!(report.grammar.len(), 1);
        assert_eq!(report.grammar[0].category, FindingCategory::GrammarError);
    }

    #[test]
    fn test_custom_profile_file_replaces_builtin() {
        let path = std::env::temp_dir().join("formatcheck_custom_entry_profile.yaml");
        std::fs::write(&path, "document_type: entry\nstyle:\n  font_size: 12.0\n").unwrap();

        let mut checker = checker();
        checker.load_custom_config(path.to_str().unwrap()).unwrap();
        let config = checker.config_manager().get_config(&DocumentType::Entry).unwrap();
        assert_eq!(config.style.font_size, 12.0);
        std::fs::remove_file(&path).ok();
    }

    #[cfg(feature = "languagetool")]
    #[test]
    fn test_languagetool_checker_has_a_provider() {
        let checker =
            FormatChecker::new_with_languagetool("http://localhost:8081/v2/check").unwrap();
        assert_eq!(checker.provider.as_deref().map(|p| p.name()), Some("LanguageTool"));
    }

    #[test]
    fn test_step_timings_follow_the_profiling_switch() {
        let doc = document(&["CONTENTS", "INTRODUCTION 3", "", "INTRODUCTION", "Text"]);
        let mut checker = checker();
        checker.try_check(&doc, "main_part", true, false, &HashSet::new()).unwrap();
        assert!(checker.step_timings().is_empty());

        checker.set_profiling(true);
        checker.try_check(&doc, "main_part", true, false, &HashSet::new()).unwrap();
        let steps: Vec<_> = checker.step_timings().into_iter().map(|(name, _)| name).collect();
        assert_eq!(steps, vec!["Topic extraction", "Zone tracking", "Formatting checks"]);
    }

    #[test]
    fn test_profiler_records_only_when_enabled() {
        let mut profiler = StepProfiler::new(false);
        assert_eq!(profiler.time_step("noop", || 2 + 2), 4);
        assert!(profiler.timings().is_empty());

        let mut profiler = StepProfiler::new(true);
        profiler.time_step("noop", || ());
        assert_eq!(profiler.timings().len(), 1);
    }
}

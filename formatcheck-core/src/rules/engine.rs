use crate::config::ProfileConfig;
use crate::model::{DocumentModel, TableModel};
use crate::topics::TopicSet;
use crate::types::{Finding, Paragraph, Zone};
use crate::zones::ZoneMap;
use std::cell::RefCell;
use std::time::{Duration, Instant};

use super::captions::CaptionRule;
use super::centered_indents::CenteredIndentRule;
use super::font::FontRule;
use super::headings::HeadingRule;
use super::lists::ListRule;
use super::names;
use super::page_geometry::PageGeometryRule;
use super::project_stages::ProjectStagesRule;
use super::spacing::SpacingRule;
use super::table_span::TableSpanRule;
use super::tables::TableRule;

pub const ALL_ZONES: &[Zone] = &[Zone::FrontMatter, Zone::Toc, Zone::Body, Zone::Appendix];
pub const BODY_ONLY: &[Zone] = &[Zone::Body];

/// Everything a checker may read. Shared, immutable, built once per check.
pub struct CheckContext<'a> {
    pub model: &'a DocumentModel,
    pub zones: &'a ZoneMap,
    pub topics: &'a TopicSet,
    /// Zones the running checker is allowed to scan
    pub scope: &'a [Zone],
}

impl<'a> CheckContext<'a> {
    pub fn new(
        model: &'a DocumentModel,
        zones: &'a ZoneMap,
        topics: &'a TopicSet,
        scope: &'a [Zone],
    ) -> Self {
        Self {
            model,
            zones,
            topics,
            scope,
        }
    }

    pub fn in_scope(&self, index: usize) -> bool {
        self.zones.is_in(index, self.scope)
    }

    /// Tables that cannot be placed in the document are always checked
    pub fn table_in_scope(&self, table: &TableModel) -> bool {
        table.anchor.map_or(true, |index| self.in_scope(index))
    }

    /// In-scope tables of the document
    pub fn scoped_tables(&self) -> impl Iterator<Item = &'a TableModel> + '_ {
        self.model
            .tables
            .iter()
            .filter(move |table| self.table_in_scope(table))
    }

    /// Paragraphs inside the checker's zones, with their document index
    pub fn scoped_paragraphs(&self) -> impl Iterator<Item = (usize, &'a Paragraph)> + '_ {
        self.model
            .paragraphs
            .iter()
            .enumerate()
            .filter(move |(index, _)| self.in_scope(*index))
    }

    /// Scoped paragraphs that carry visible text outside of tables
    pub fn text_paragraphs(&self) -> impl Iterator<Item = (usize, &'a Paragraph)> + '_ {
        self.scoped_paragraphs()
            .filter(|(_, p)| !p.in_table && !p.is_blank())
    }

    pub fn is_heading(&self, paragraph: &Paragraph) -> bool {
        self.topics.matches_any(paragraph.trimmed_text())
    }
}

// Sequential checker pipeline infrastructure
pub trait CheckRule {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding>;
    fn name(&self) -> &str;

    /// Zones scanned when the profile entry names none
    fn default_zones(&self) -> &'static [Zone] {
        ALL_ZONES
    }
}

pub struct RuleEngine {
    pub rule_timings: RefCell<Vec<(String, Duration)>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rule_timings: RefCell::new(Vec::new()),
        }
    }

    /// Run the profile pipeline in order and concatenate the findings
    pub fn apply_rules(
        &self,
        model: &DocumentModel,
        zones: &ZoneMap,
        topics: &TopicSet,
        config: &ProfileConfig,
    ) -> Vec<Finding> {
        log::info!(
            "Running {} checkers for {}",
            config.pipeline.rules.len(),
            config.document_type
        );

        // Clear previous timings
        self.rule_timings.borrow_mut().clear();

        let mut findings = Vec::new();
        for rule_config in &config.pipeline.rules {
            if !rule_config.enabled {
                log::info!("Skipping disabled checker: {}", rule_config.name);
                continue;
            }

            let rule_start = Instant::now();
            match Self::rule_by_name(&rule_config.name, config) {
                Some(rule) => {
                    let scope = if rule_config.zones.is_empty() {
                        rule.default_zones()
                    } else {
                        rule_config.zones.as_slice()
                    };
                    let context = CheckContext::new(model, zones, topics, scope);
                    let rule_findings = rule.check(&context);
                    log::debug!("{}: {} findings", rule.name(), rule_findings.len());
                    findings.extend(rule_findings);
                }
                None => {
                    log::warn!("Unknown checker: {}. Skipping...", rule_config.name);
                }
            }

            self.rule_timings
                .borrow_mut()
                .push((rule_config.name.clone(), rule_start.elapsed()));
        }

        findings
    }

    fn rule_by_name<'a>(name: &str, config: &'a ProfileConfig) -> Option<Box<dyn CheckRule + 'a>> {
        let rule: Box<dyn CheckRule + 'a> = match name {
            names::PAGE_GEOMETRY => Box::new(PageGeometryRule::new(config)),
            names::FONT => Box::new(FontRule::new(config)),
            names::SPACING => Box::new(SpacingRule::new(config)),
            names::HEADINGS => Box::new(HeadingRule::new(config)),
            names::LISTS => Box::new(ListRule::new(config)),
            names::TABLES => Box::new(TableRule::new(config)),
            names::TABLE_SPAN => Box::new(TableSpanRule::new(config)),
            names::CAPTIONS => Box::new(CaptionRule::new(config)),
            names::CENTERED_INDENTS => Box::new(CenteredIndentRule::new(config)),
            names::PROJECT_STAGES => Box::new(ProjectStagesRule::new(config)),
            _ => return None,
        };
        Some(rule)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::types::DocumentType;

    fn setup() -> (DocumentModel, ZoneMap, TopicSet) {
        let model = DocumentModel::from_paragraphs(vec![Paragraph::new("Plain text")]);
        let zones = ZoneMap::uniform(model.paragraphs.len(), Zone::Body);
        (model, zones, TopicSet::default())
    }

    #[test]
    fn test_every_named_rule_is_constructible() {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        for name in names::ALL {
            assert!(RuleEngine::rule_by_name(name, &config).is_some(), "{name}");
        }
    }

    #[test]
    fn test_disabled_and_unknown_rules_are_skipped() {
        let (model, zones, topics) = setup();
        let mut config = ProfileConfig::builtin(DocumentType::MainPart);
        config.pipeline.rules = vec![
            RuleConfig {
                enabled: false,
                ..RuleConfig::new(names::FONT)
            },
            RuleConfig::new("NoSuchChecker"),
        ];

        let engine = RuleEngine::new();
        let findings = engine.apply_rules(&model, &zones, &topics, &config);
        assert!(findings.is_empty());

        let timings = engine.rule_timings.borrow();
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].0, "NoSuchChecker");
    }

    #[test]
    fn test_zone_override_narrows_scope() {
        let (model, _, topics) = setup();
        let zones = ZoneMap::uniform(1, Zone::Appendix);
        let mut config = ProfileConfig::builtin(DocumentType::MainPart);
        config.pipeline.rules = vec![RuleConfig::new(names::FONT).in_zones(&[Zone::Body])];

        // The paragraph has no font at all, but it lives in the appendix
        let findings = RuleEngine::new().apply_rules(&model, &zones, &topics, &config);
        assert!(findings.is_empty());

        config.pipeline.rules = vec![RuleConfig::new(names::FONT)];
        let findings = RuleEngine::new().apply_rules(&model, &zones, &topics, &config);
        assert_eq!(findings.len(), 2);
    }
}

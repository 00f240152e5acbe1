use crate::rules::names;
use crate::types::{DocumentType, Zone};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

// Default value functions for serde
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub document_type: DocumentType,
    /// Reject documents that never show the contents marker
    #[serde(default = "default_true")]
    pub requires_contents: bool,
    /// What happens to the paragraph stream once the appendix marker is seen
    #[serde(default)]
    pub appendix_policy: AppendixPolicy,
    #[serde(default)]
    pub markers: Markers,
    #[serde(default)]
    pub style: StyleGuide,
    /// Pipeline configuration - defines which checkers run and in what order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub grammar: GrammarConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppendixPolicy {
    /// Everything after the marker is classified as appendix and skipped by body checks
    #[default]
    SkipRemaining,
    /// Scanning ends at the marker; later paragraphs get no zone at all
    Stop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// List of checkers to run in order
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the checker
    pub name: String,
    /// Whether this checker is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Zones the checker scans. Empty means the checker's own default.
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl RuleConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            zones: Vec::new(),
        }
    }

    pub fn in_zones(mut self, zones: &[Zone]) -> Self {
        self.zones = zones.to_vec();
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: vec![RuleConfig::new(names::PAGE_GEOMETRY)],
        }
    }
}

impl PipelineConfig {
    pub fn rule(&self, name: &str) -> Option<&RuleConfig> {
        self.rules.iter().find(|rule| rule.name == name)
    }
}

// Default value functions for markers
fn default_contents_marker() -> String {
    "CONTENTS".to_string()
}

fn default_appendix_marker() -> String {
    "APPENDICES".to_string()
}

fn default_table_label() -> String {
    "Table".to_string()
}

fn default_table_continuation() -> String {
    "Continuation of table".to_string()
}

fn default_caption_prefix() -> String {
    "Fig.".to_string()
}

fn default_caption_placeholder() -> String {
    "/".to_string()
}

fn default_project_stages_topic() -> String {
    "PROJECT STAGES".to_string()
}

/// Literal strings that drive zone transitions and label recognition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Markers {
    /// Heading of the table of contents (matched case-insensitively)
    #[serde(default = "default_contents_marker")]
    pub contents: String,
    /// Heading that opens the appendices (matched exactly)
    #[serde(default = "default_appendix_marker")]
    pub appendices: String,
    #[serde(default = "default_table_label")]
    pub table_label: String,
    #[serde(default = "default_table_continuation")]
    pub table_continuation: String,
    #[serde(default = "default_caption_prefix")]
    pub caption_prefix: String,
    /// Placeholder lines skipped between an image and its caption
    #[serde(default = "default_caption_placeholder")]
    pub caption_placeholder: String,
    #[serde(default = "default_project_stages_topic")]
    pub project_stages_topic: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            contents: default_contents_marker(),
            appendices: default_appendix_marker(),
            table_label: default_table_label(),
            table_continuation: default_table_continuation(),
            caption_prefix: default_caption_prefix(),
            caption_placeholder: default_caption_placeholder(),
            project_stages_topic: default_project_stages_topic(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginsConfig {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for MarginsConfig {
    fn default() -> Self {
        Self {
            left: 3.00,
            right: 2.00,
            top: 2.00,
            bottom: 2.00,
        }
    }
}

/// Inclusive range of total indent (left + first line), in centimeters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndentRange {
    pub min: f64,
    pub max: f64,
}

impl IndentRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListIndentConfig {
    pub bulleted: IndentRange,
    /// Numbered items whose marker is a single digit
    pub numbered_single_digit: IndentRange,
    /// Numbered items from 10 on; the wider marker shifts the text
    pub numbered_multi_digit: IndentRange,
    pub outline_numbered: IndentRange,
}

impl Default for ListIndentConfig {
    fn default() -> Self {
        Self {
            bulleted: IndentRange::new(1.20, 1.30),
            numbered_single_digit: IndentRange::new(1.20, 1.30),
            numbered_multi_digit: IndentRange::new(0.95, 1.30),
            outline_numbered: IndentRange::new(1.75, 1.85),
        }
    }
}

fn default_tolerance_cm() -> f64 {
    crate::geometry::DEFAULT_TOLERANCE_CM
}

fn default_font_name() -> String {
    "Times New Roman".to_string()
}

fn default_font_size() -> f32 {
    14.0
}

fn default_line_spacing() -> f32 {
    1.5
}

fn default_line_spacing_tolerance() -> f32 {
    0.05
}

fn default_page_width_cm() -> f64 {
    21.0
}

fn default_page_height_cm() -> f64 {
    29.7
}

fn default_table_label_right_indent_cm() -> f64 {
    0.25
}

fn default_project_stages_indents_cm() -> Vec<f64> {
    vec![0.0, 1.25]
}

/// Expected values of the department style guide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleGuide {
    #[serde(default)]
    pub margins: MarginsConfig,
    #[serde(default = "default_page_width_cm")]
    pub page_width_cm: f64,
    #[serde(default = "default_page_height_cm")]
    pub page_height_cm: f64,
    /// Tolerance for all centimeter comparisons
    #[serde(default = "default_tolerance_cm")]
    pub tolerance_cm: f64,
    #[serde(default = "default_font_name")]
    pub font_name: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
    #[serde(default = "default_line_spacing_tolerance")]
    pub line_spacing_tolerance: f32,
    #[serde(default = "default_table_label_right_indent_cm")]
    pub table_label_right_indent_cm: f64,
    #[serde(default)]
    pub list_indents: ListIndentConfig,
    /// Allowed left indents for rows of the project stages section
    #[serde(default = "default_project_stages_indents_cm")]
    pub project_stages_indents_cm: Vec<f64>,
}

impl Default for StyleGuide {
    fn default() -> Self {
        Self {
            margins: MarginsConfig::default(),
            page_width_cm: default_page_width_cm(),
            page_height_cm: default_page_height_cm(),
            tolerance_cm: default_tolerance_cm(),
            font_name: default_font_name(),
            font_size: default_font_size(),
            line_spacing: default_line_spacing(),
            line_spacing_tolerance: default_line_spacing_tolerance(),
            table_label_right_indent_cm: default_table_label_right_indent_cm(),
            list_indents: ListIndentConfig::default(),
            project_stages_indents_cm: default_project_stages_indents_cm(),
        }
    }
}

// Default value functions for the grammar pass
fn default_grammar_endpoint() -> String {
    "https://api.languagetool.org/v2/check".to_string()
}

fn default_grammar_language() -> String {
    "uk".to_string()
}

fn default_abbreviation_alphabet() -> String {
    "A-ZА-ЯІЇЄҐ".to_string()
}

fn default_uppercase_rule_id() -> String {
    "UPPERCASE_SENTENCE_START".to_string()
}

fn default_empty_span_messages() -> Vec<String> {
    vec![
        "Знайдено потенційну орфографічну помилку.".to_string(),
        "Це слово є жаргонним".to_string(),
    ]
}

fn default_snippet_words() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarConfig {
    #[serde(default = "default_grammar_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_grammar_language")]
    pub language: String,
    /// Regex character class body of uppercase letters that form abbreviations
    #[serde(default = "default_abbreviation_alphabet")]
    pub abbreviation_alphabet: String,
    #[serde(default = "default_uppercase_rule_id")]
    pub uppercase_rule_id: String,
    /// Provider messages that are noise when the offending span is empty
    #[serde(default = "default_empty_span_messages")]
    pub empty_span_messages: Vec<String>,
    #[serde(default = "default_snippet_words")]
    pub snippet_words: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            endpoint: default_grammar_endpoint(),
            language: default_grammar_language(),
            abbreviation_alphabet: default_abbreviation_alphabet(),
            uppercase_rule_id: default_uppercase_rule_id(),
            empty_span_messages: default_empty_span_messages(),
            snippet_words: default_snippet_words(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    configs: HashMap<DocumentType, ProfileConfig>,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let mut manager = Self {
            configs: HashMap::new(),
        };

        // Load built-in profiles
        manager.load_builtin_configs()?;

        Ok(manager)
    }

    pub fn get_config(&self, doc_type: &DocumentType) -> Option<&ProfileConfig> {
        self.configs.get(doc_type)
    }

    /// Replace the profile for the document type named in the file
    pub fn load_config_from_file(&mut self, path: &str) -> Result<()> {
        let config = ProfileConfig::load_from_file(path)?;
        self.insert(config);
        Ok(())
    }

    pub fn insert(&mut self, config: ProfileConfig) {
        self.configs.insert(config.document_type.clone(), config);
    }

    fn load_builtin_configs(&mut self) -> Result<()> {
        for doc_type in DocumentType::all() {
            self.insert(ProfileConfig::builtin(doc_type));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new().expect("Failed to create default ConfigManager")
    }
}

impl ProfileConfig {
    /// Built-in profile for a document type
    pub fn builtin(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::Entry => Self::entry(),
            DocumentType::TechAssignment => Self::tech_assignment(),
            DocumentType::MainPart => Self::main_part(),
        }
    }

    /// Title pages: only page geometry is checked
    fn entry() -> Self {
        Self {
            document_type: DocumentType::Entry,
            requires_contents: false,
            appendix_policy: AppendixPolicy::Stop,
            markers: Markers::default(),
            style: StyleGuide::default(),
            pipeline: PipelineConfig {
                rules: vec![RuleConfig::new(names::PAGE_GEOMETRY)],
            },
            grammar: GrammarConfig::default(),
        }
    }

    fn tech_assignment() -> Self {
        Self {
            document_type: DocumentType::TechAssignment,
            requires_contents: true,
            appendix_policy: AppendixPolicy::Stop,
            markers: Markers::default(),
            style: StyleGuide::default(),
            pipeline: PipelineConfig {
                rules: vec![
                    RuleConfig::new(names::PAGE_GEOMETRY),
                    RuleConfig::new(names::FONT),
                    RuleConfig::new(names::HEADINGS),
                    RuleConfig::new(names::LISTS),
                    RuleConfig::new(names::PROJECT_STAGES),
                    RuleConfig::new(names::SPACING),
                    RuleConfig::new(names::CENTERED_INDENTS),
                ],
            },
            grammar: GrammarConfig::default(),
        }
    }

    fn main_part() -> Self {
        Self {
            document_type: DocumentType::MainPart,
            requires_contents: true,
            appendix_policy: AppendixPolicy::SkipRemaining,
            markers: Markers::default(),
            style: StyleGuide::default(),
            pipeline: PipelineConfig {
                rules: vec![
                    RuleConfig::new(names::PAGE_GEOMETRY),
                    // Appendices carry their own styling
                    RuleConfig::new(names::FONT).in_zones(&[
                        Zone::FrontMatter,
                        Zone::Toc,
                        Zone::Body,
                    ]),
                    RuleConfig::new(names::HEADINGS),
                    RuleConfig::new(names::LISTS),
                    RuleConfig::new(names::TABLES),
                    RuleConfig::new(names::TABLE_SPAN),
                    RuleConfig::new(names::CAPTIONS),
                    RuleConfig::new(names::SPACING),
                    RuleConfig::new(names::CENTERED_INDENTS),
                ],
            },
            grammar: GrammarConfig::default(),
        }
    }

    /// Load config from file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: ProfileConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load config with fallback to the built-in profile
    pub fn load_with_fallback(path: Option<&str>, document_type: DocumentType) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                log::warn!("Failed to load config from {p} ({e}), using built-in profile");
                Self::builtin(document_type)
            }),
            None => Self::builtin(document_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_cover_all_document_types() {
        let manager = ConfigManager::new().unwrap();
        for doc_type in DocumentType::all() {
            let config = manager.get_config(&doc_type).unwrap();
            assert_eq!(config.document_type, doc_type);
            assert!(config.pipeline.rule(names::PAGE_GEOMETRY).is_some());
        }
    }

    #[test]
    fn test_entry_profile_only_checks_geometry() {
        let config = ProfileConfig::builtin(DocumentType::Entry);
        assert!(!config.requires_contents);
        assert_eq!(config.pipeline.rules.len(), 1);
    }

    #[test]
    fn test_yaml_profile_fills_defaults() {
        let yaml = r#"
document_type: main_part
appendix_policy: stop
markers:
  contents: "ЗМІСТ"
  appendices: "ДОДАТКИ"
pipeline:
  rules:
    - name: Font
    - name: Tables
      enabled: false
"#;
        let config = ProfileConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.appendix_policy, AppendixPolicy::Stop);
        assert_eq!(config.markers.contents, "ЗМІСТ");
        assert_eq!(config.markers.caption_prefix, "Fig.");
        assert_eq!(config.style.font_name, "Times New Roman");
        assert!(config.requires_contents);
        assert!(!config.pipeline.rule("Tables").unwrap().enabled);
        assert!(config.pipeline.rule("Font").unwrap().zones.is_empty());
    }

    #[test]
    fn test_custom_profile_replaces_builtin() {
        let mut manager = ConfigManager::new().unwrap();
        let mut custom = ProfileConfig::builtin(DocumentType::Entry);
        custom.style.font_size = 12.0;
        manager.insert(custom);
        let config = manager.get_config(&DocumentType::Entry).unwrap();
        assert_eq!(config.style.font_size, 12.0);
    }
}

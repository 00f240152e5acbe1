use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CheckError;

// ===== DOCUMENT TYPES =====

/// The part of the thesis being checked. Each one maps to a checker profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Title page and other entry sheets
    Entry,
    /// Technical assignment (terms of reference)
    TechAssignment,
    /// Explanatory note: the main body of the thesis
    MainPart,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Entry => "entry",
            DocumentType::TechAssignment => "tech_assignment",
            DocumentType::MainPart => "main_part",
        }
    }

    pub fn all() -> [DocumentType; 3] {
        [
            DocumentType::Entry,
            DocumentType::TechAssignment,
            DocumentType::MainPart,
        ]
    }
}

impl FromStr for DocumentType {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "entry" => Ok(DocumentType::Entry),
            "tech_assignment" => Ok(DocumentType::TechAssignment),
            "main_part" => Ok(DocumentType::MainPart),
            other => Err(CheckError::UnknownDocumentType(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== PARAGRAPH MODEL =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// List membership as reported by the host. Replaces the host's numeric
/// list type codes (2 = bullet, 3 = numbered, 4 = outline numbered).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    #[default]
    None,
    Bulleted,
    Numbered,
    OutlineNumbered,
}

impl ListKind {
    pub fn label(&self) -> &'static str {
        match self {
            ListKind::None => "none",
            ListKind::Bulleted => "bulleted",
            ListKind::Numbered => "numbered",
            ListKind::OutlineNumbered => "outline numbered",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListMembership {
    #[serde(default)]
    pub kind: ListKind,
    /// Marker string generated by the host ("1.", "12)", "•")
    #[serde(default)]
    pub marker: Option<String>,
}

impl ListMembership {
    pub fn is_list(&self) -> bool {
        self.kind != ListKind::None
    }

    /// Leading integer of the marker, if the marker starts with digits
    pub fn leading_number(&self) -> Option<u32> {
        let marker = self.marker.as_deref()?.trim_start();
        let digits: String = marker.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

/// Read-only paragraph snapshot pulled from the host.
///
/// Lengths are in the host's native unit (points). `None` means the host
/// could not report a single value (mixed runs or an unset property).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Paragraph {
    pub text: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub left_indent: f64,
    #[serde(default)]
    pub right_indent: f64,
    #[serde(default)]
    pub first_line_indent: f64,
    /// Line spacing in lines (1.0 single, 1.5, 2.0 double)
    #[serde(default)]
    pub line_spacing: Option<f32>,
    #[serde(default)]
    pub list: ListMembership,
    #[serde(default)]
    pub in_table: bool,
    #[serde(default)]
    pub has_inline_shape: bool,
}

impl Paragraph {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    /// Text with surrounding whitespace and host control characters removed
    /// (cell markers `\x07`, page breaks `\x0c`, paragraph marks).
    pub fn trimmed_text(&self) -> &str {
        self.text
            .trim_matches(|c: char| c.is_whitespace() || c.is_control())
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed_text().is_empty()
    }

    pub fn is_bold(&self) -> bool {
        self.bold == Some(true)
    }
}

// ===== TABLES AND SHAPES =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TableCell {
    pub text: String,
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineShape {
    /// Index into the document paragraph stream of the anchoring paragraph
    pub paragraph_index: usize,
}

/// Page geometry in points
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSetup {
    pub left_margin: f64,
    pub right_margin: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    pub page_width: f64,
    pub page_height: f64,
}

// ===== ZONES AND TOPICS =====

/// Mutually exclusive structural region of the document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    FrontMatter,
    Toc,
    Body,
    Appendix,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TopicKind {
    Main,
    Sub,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    /// Normalized label (no numbering, no page number, no trailing punctuation)
    pub label: String,
    pub kind: TopicKind,
    /// Position in the table of contents, counting all entries
    pub ordinal: usize,
}

// ===== FINDINGS =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    PageGeometry,
    Font,
    Spacing,
    Heading,
    List,
    ListMarker,
    Table,
    TableSpan,
    Caption,
    CenteredIndent,
    ProjectStages,
    /// A host accessor failed and the check was skipped
    Skipped,
    Grammar,
    /// The grammar provider could not be reached for a paragraph
    GrammarError,
}

/// One reported style or grammar deviation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub category: FindingCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offending_text: Option<String>,
}

impl Finding {
    pub fn new(category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            page: None,
            message: message.into(),
            offending_text: None,
        }
    }

    pub fn on_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.offending_text = Some(text.into());
        self
    }

    /// Finding anchored to a paragraph: takes its page and text
    pub fn at(
        category: FindingCategory,
        paragraph: &Paragraph,
        message: impl Into<String>,
    ) -> Self {
        Self::new(category, message)
            .on_page(paragraph.page)
            .with_text(paragraph.trimmed_text())
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(page) = self.page {
            write!(f, "[page {page}] ")?;
        }
        f.write_str(&self.message)?;
        if let Some(text) = &self.offending_text {
            write!(f, " in paragraph: {text}")?;
        }
        Ok(())
    }
}

// ===== RESULTS =====

/// Full result of a successful check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub document_type: DocumentType,
    pub checked_at: DateTime<Utc>,
    pub formatting: Vec<Finding>,
    pub grammar: Vec<Finding>,
}

/// What the checker surface returns: either findings or an error message.
/// Serializes to `{"formatting": [...], "grammar": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckOutcome {
    Report(CheckReport),
    Error { error: String },
}

impl CheckOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        CheckOutcome::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CheckOutcome::Error { .. })
    }

    pub fn report(&self) -> Option<&CheckReport> {
        match self {
            CheckOutcome::Report(report) => Some(report),
            CheckOutcome::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_parsing() {
        assert_eq!("main_part".parse::<DocumentType>().unwrap(), DocumentType::MainPart);
        assert_eq!(" entry ".parse::<DocumentType>().unwrap(), DocumentType::Entry);
        assert!("additional_parts".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_list_marker_leading_number() {
        let single = ListMembership {
            kind: ListKind::Numbered,
            marker: Some("7.".to_string()),
        };
        let double = ListMembership {
            kind: ListKind::Numbered,
            marker: Some("12)".to_string()),
        };
        let bullet = ListMembership {
            kind: ListKind::Bulleted,
            marker: Some("•".to_string()),
        };
        assert_eq!(single.leading_number(), Some(7));
        assert_eq!(double.leading_number(), Some(12));
        assert_eq!(bullet.leading_number(), None);
    }

    #[test]
    fn test_trimmed_text_strips_host_control_chars() {
        let paragraph = Paragraph::new("  Results\x07\r");
        assert_eq!(paragraph.trimmed_text(), "Results");
        assert!(Paragraph::new("\x0c").is_blank());
    }

    #[test]
    fn test_error_outcome_serializes_flat() {
        let outcome = CheckOutcome::error("Unknown document part");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["error"], "Unknown document part");
    }
}

use super::engine::{CheckContext, CheckRule};
use crate::config::{ProfileConfig, StyleGuide};
use crate::geometry::is_absurd_font_size;
use crate::types::{Finding, FindingCategory, Paragraph};

// FontRule - every visible paragraph outside tables uses the body font
pub struct FontRule<'a> {
    style: &'a StyleGuide,
}

impl<'a> FontRule<'a> {
    pub fn new(config: &'a ProfileConfig) -> Self {
        Self {
            style: &config.style,
        }
    }

    fn check_paragraph(&self, paragraph: &Paragraph, findings: &mut Vec<Finding>) {
        if is_absurd_font_size(paragraph.font_size) {
            log::debug!("Skipping paragraph with abnormal font size: {}", paragraph.trimmed_text());
            return;
        }

        if paragraph.font_name.as_deref() != Some(self.style.font_name.as_str()) {
            let actual = paragraph.font_name.as_deref().unwrap_or("mixed");
            findings.push(Finding::at(
                FindingCategory::Font,
                paragraph,
                format!("Incorrect font: {actual} (should be {})", self.style.font_name),
            ));
        }

        let size_matches = paragraph
            .font_size
            .is_some_and(|size| (size - self.style.font_size).abs() < f32::EPSILON);
        if !size_matches {
            let actual = paragraph
                .font_size
                .map(|size| format!("{size} pt"))
                .unwrap_or_else(|| "mixed size".to_string());
            findings.push(Finding::at(
                FindingCategory::Font,
                paragraph,
                format!("Incorrect font size: {actual} (should be {} pt)", self.style.font_size),
            ));
        }
    }
}

impl<'a> CheckRule for FontRule<'a> {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (_, paragraph) in context.text_paragraphs() {
            self.check_paragraph(paragraph, &mut findings);
        }
        findings
    }

    fn name(&self) -> &str {
        "Font"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentModel;
    use crate::rules::engine::ALL_ZONES;
    use crate::topics::TopicSet;
    use crate::types::{DocumentType, Zone};
    use crate::zones::ZoneMap;

    fn paragraph(text: &str, font: Option<&str>, size: Option<f32>) -> Paragraph {
        Paragraph {
            font_name: font.map(str::to_string),
            font_size: size,
            ..Paragraph::new(text)
        }
    }

    fn run(paragraphs: Vec<Paragraph>) -> Vec<Finding> {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        let model = DocumentModel::from_paragraphs(paragraphs);
        let zones = ZoneMap::uniform(model.paragraphs.len(), Zone::Body);
        let topics = TopicSet::default();
        let context = CheckContext::new(&model, &zones, &topics, ALL_ZONES);
        FontRule::new(&config).check(&context)
    }

    #[test]
    fn test_name_and_size_are_reported_separately() {
        let findings = run(vec![paragraph("Body", Some("Arial"), Some(12.0))]);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("Arial"));
        assert!(findings[1].message.contains("12 pt"));
    }

    #[test]
    fn test_compliant_paragraph() {
        let findings = run(vec![paragraph("Body", Some("Times New Roman"), Some(14.0))]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_sentinel_size_blank_and_table_paragraphs_are_skipped() {
        let mut in_table = paragraph("Cell", Some("Arial"), Some(10.0));
        in_table.in_table = true;
        let findings = run(vec![
            paragraph("Mixed runs", Some("Arial"), Some(9_999_999.0)),
            paragraph("\x0c", None, None),
            in_table,
        ]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_missing_values_are_mismatches() {
        let findings = run(vec![paragraph("Body", None, None)]);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("mixed"));
    }
}

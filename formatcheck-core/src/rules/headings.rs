use super::engine::{CheckContext, CheckRule, BODY_ONLY};
use crate::config::ProfileConfig;
use crate::text::{ends_with_page_number, first_alphabetic, is_all_caps, strip_numeric_prefix};
use crate::types::{Finding, FindingCategory, Paragraph, Zone};

// HeadingRule - body headings follow the capitalization and weight of their TOC kind
pub struct HeadingRule;

impl HeadingRule {
    pub fn new(_config: &ProfileConfig) -> Self {
        Self
    }

    fn check_main(paragraph: &Paragraph) -> Option<Finding> {
        let text = paragraph.trimmed_text();
        (!(is_all_caps(text) && paragraph.is_bold())).then(|| {
            Finding::at(
                FindingCategory::Heading,
                paragraph,
                "Incorrect formatting for main topic (should be bold and in capitals)",
            )
        })
    }

    fn check_sub(paragraph: &Paragraph, findings: &mut Vec<Finding>) {
        if !paragraph.is_bold() {
            findings.push(Finding::at(
                FindingCategory::Heading,
                paragraph,
                "Incorrect formatting for subtopic (should be bold)",
            ));
        }

        let title = strip_numeric_prefix(paragraph.trimmed_text());
        if first_alphabetic(title).is_some_and(|c| !c.is_uppercase()) {
            findings.push(Finding::at(
                FindingCategory::Heading,
                paragraph,
                "Incorrect capitalization for subtopic (should start with a capital letter)",
            ));
        }
    }
}

impl CheckRule for HeadingRule {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (_, paragraph) in context.text_paragraphs() {
            let text = paragraph.trimmed_text();
            // Stray TOC-like lines in the body carry a page number; they are not headings
            if ends_with_page_number(text) {
                continue;
            }

            if context.topics.main_match(text).is_some() {
                findings.extend(Self::check_main(paragraph));
            } else if context.topics.sub_match(text).is_some() {
                Self::check_sub(paragraph, &mut findings);
            }
        }

        findings
    }

    fn name(&self) -> &str {
        "Headings"
    }

    fn default_zones(&self) -> &'static [Zone] {
        BODY_ONLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentModel;
    use crate::topics::build_topics;
    use crate::types::DocumentType;
    use crate::zones::ZoneMap;

    fn heading(text: &str, bold: bool) -> Paragraph {
        Paragraph {
            bold: Some(bold),
            ..Paragraph::new(text)
        }
    }

    fn run(paragraphs: Vec<Paragraph>) -> Vec<Finding> {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        let topics = build_topics(&[
            "INTRODUCTION 3".to_string(),
            "1.1. Problem statement 4".to_string(),
        ]);
        let model = DocumentModel::from_paragraphs(paragraphs);
        let zones = ZoneMap::uniform(model.paragraphs.len(), Zone::Body);
        let context = CheckContext::new(&model, &zones, &topics, BODY_ONLY);
        HeadingRule::new(&config).check(&context)
    }

    #[test]
    fn test_well_formed_headings() {
        let findings = run(vec![
            heading("INTRODUCTION", true),
            heading("1.1. Problem statement", true),
        ]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_main_topic_must_be_caps_and_bold() {
        let findings = run(vec![heading("Introduction", true), heading("INTRODUCTION", false)]);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_subtopic_weight_and_capitalization() {
        let findings = run(vec![heading("1.1. problem statement", false)]);
        assert_eq!(findings.len(), 2);
        assert!(findings[1].message.contains("capital letter"));
    }

    #[test]
    fn test_other_zones_are_ignored() {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        let topics = build_topics(&["INTRODUCTION 3".to_string()]);
        let model = DocumentModel::from_paragraphs(vec![heading("Introduction", false)]);
        let zones = ZoneMap::uniform(1, Zone::Toc);
        let context = CheckContext::new(&model, &zones, &topics, BODY_ONLY);
        assert!(HeadingRule::new(&config).check(&context).is_empty());
    }
}

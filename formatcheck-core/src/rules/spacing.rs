use super::engine::{CheckContext, CheckRule};
use crate::config::{ProfileConfig, StyleGuide};
use crate::types::{Finding, FindingCategory};

// SpacingRule - interline spacing of visible paragraphs outside tables
pub struct SpacingRule<'a> {
    style: &'a StyleGuide,
}

impl<'a> SpacingRule<'a> {
    pub fn new(config: &'a ProfileConfig) -> Self {
        Self {
            style: &config.style,
        }
    }

    fn matches(&self, spacing: Option<f32>) -> bool {
        spacing.is_some_and(|lines| {
            (lines - self.style.line_spacing).abs() <= self.style.line_spacing_tolerance + 1e-6
        })
    }
}

impl<'a> CheckRule for SpacingRule<'a> {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        context
            .text_paragraphs()
            .filter(|(_, p)| !self.matches(p.line_spacing))
            .map(|(_, p)| {
                let actual = p
                    .line_spacing
                    .map(|lines| format!("{lines:.2}"))
                    .unwrap_or_else(|| "unknown".to_string());
                Finding::at(
                    FindingCategory::Spacing,
                    p,
                    format!(
                        "Incorrect interline spacing: {actual} (should be {:.2})",
                        self.style.line_spacing
                    ),
                )
            })
            .collect()
    }

    fn name(&self) -> &str {
        "Spacing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentModel;
    use crate::rules::engine::ALL_ZONES;
    use crate::topics::TopicSet;
    use crate::types::{DocumentType, Paragraph, Zone};
    use crate::zones::ZoneMap;

    fn spaced(text: &str, spacing: Option<f32>) -> Paragraph {
        Paragraph {
            line_spacing: spacing,
            ..Paragraph::new(text)
        }
    }

    #[test]
    fn test_spacing_tolerance_and_missing_value() {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        let model = DocumentModel::from_paragraphs(vec![
            spaced("one and a half", Some(1.5)),
            spaced("close enough", Some(1.54)),
            spaced("single", Some(1.0)),
            spaced("unknown", None),
            spaced("", Some(1.0)),
        ]);
        let zones = ZoneMap::uniform(model.paragraphs.len(), Zone::Body);
        let topics = TopicSet::default();
        let context = CheckContext::new(&model, &zones, &topics, ALL_ZONES);

        let findings = SpacingRule::new(&config).check(&context);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].offending_text.as_deref(), Some("single"));
        assert!(findings[1].message.contains("unknown"));
    }
}

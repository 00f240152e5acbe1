use super::engine::{CheckContext, CheckRule, BODY_ONLY};
use crate::config::ProfileConfig;
use crate::geometry::{points_to_cm, within_tolerance};
use crate::types::{Alignment, Finding, FindingCategory, Zone};

// CenteredIndentRule - centered paragraphs must not be shifted by indents
pub struct CenteredIndentRule {
    tolerance: f64,
}

impl CenteredIndentRule {
    pub fn new(config: &ProfileConfig) -> Self {
        Self {
            tolerance: config.style.tolerance_cm,
        }
    }
}

impl CheckRule for CenteredIndentRule {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        context
            .text_paragraphs()
            .filter(|(_, p)| p.alignment == Alignment::Center)
            .filter_map(|(_, p)| {
                let indents = [
                    ("left", p.left_indent),
                    ("first line", p.first_line_indent),
                    ("right", p.right_indent),
                ];
                let wrong: Vec<String> = indents
                    .iter()
                    .map(|&(side, points)| (side, points_to_cm(points)))
                    .filter(|&(_, cm)| !within_tolerance(cm, 0.0, self.tolerance))
                    .map(|(side, cm)| format!("{side} {cm:.2} cm"))
                    .collect();

                (!wrong.is_empty()).then(|| {
                    Finding::at(
                        FindingCategory::CenteredIndent,
                        p,
                        format!("Centered paragraph has indents ({})", wrong.join(", ")),
                    )
                })
            })
            .collect()
    }

    fn name(&self) -> &str {
        "CenteredIndents"
    }

    fn default_zones(&self) -> &'static [Zone] {
        BODY_ONLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cm_to_points;
    use crate::model::DocumentModel;
    use crate::topics::TopicSet;
    use crate::types::{DocumentType, Paragraph};
    use crate::zones::ZoneMap;

    #[test]
    fn test_only_centered_paragraphs_with_indents_are_reported() {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        let model = DocumentModel::from_paragraphs(vec![
            Paragraph {
                alignment: Alignment::Center,
                ..Paragraph::new("Clean title")
            },
            Paragraph {
                alignment: Alignment::Center,
                first_line_indent: cm_to_points(1.25),
                ..Paragraph::new("Indented title")
            },
            Paragraph {
                first_line_indent: cm_to_points(1.25),
                ..Paragraph::new("Body text")
            },
        ]);
        let zones = ZoneMap::uniform(model.paragraphs.len(), Zone::Body);
        let topics = TopicSet::default();
        let context = CheckContext::new(&model, &zones, &topics, BODY_ONLY);

        let findings = CenteredIndentRule::new(&config).check(&context);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("first line 1.25 cm"));
    }
}

use super::engine::{CheckContext, CheckRule, BODY_ONLY};
use crate::config::{Markers, ProfileConfig, StyleGuide};
use crate::geometry::{points_to_cm, within_tolerance};
use crate::topics::normalize_topic;
use crate::types::{Finding, FindingCategory, Paragraph, Zone};

// ProjectStagesRule - rows of the project stages section share one allowed indent
pub struct ProjectStagesRule<'a> {
    style: &'a StyleGuide,
    markers: &'a Markers,
}

impl<'a> ProjectStagesRule<'a> {
    pub fn new(config: &'a ProfileConfig) -> Self {
        Self {
            style: &config.style,
            markers: &config.markers,
        }
    }

    /// Left indent in cm, falling back to the first-line indent when there is none
    fn row_indent(&self, paragraph: &Paragraph) -> f64 {
        let left = points_to_cm(paragraph.left_indent);
        if within_tolerance(left, 0.0, self.style.tolerance_cm) {
            points_to_cm(paragraph.first_line_indent)
        } else {
            left
        }
    }

    fn check_row(&self, paragraph: &Paragraph, expected: f64, findings: &mut Vec<Finding>) {
        let tolerance = self.style.tolerance_cm;
        let left = self.row_indent(paragraph);
        if !within_tolerance(left, expected, tolerance) {
            findings.push(Finding::at(
                FindingCategory::ProjectStages,
                paragraph,
                format!(
                    "Inconsistent left indent in row: {left:.2} cm \
                     (should be {expected:.2} cm)"
                ),
            ));
        }

        let right = points_to_cm(paragraph.right_indent);
        if !within_tolerance(right, 0.0, tolerance) {
            findings.push(Finding::at(
                FindingCategory::ProjectStages,
                paragraph,
                format!("Incorrect right indent in row: {right:.2} cm (should be 0.00 cm)"),
            ));
        }
    }
}

impl<'a> CheckRule for ProjectStagesRule<'a> {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        let topic_name = &self.markers.project_stages_topic;
        let Some((topic, next_topic)) = context.topics.topic_after(topic_name) else {
            return vec![Finding::new(
                FindingCategory::ProjectStages,
                format!("Topic '{topic_name}' not found"),
            )];
        };
        let topic_key = topic.label.to_uppercase();
        let next_key = next_topic.map(|t| t.label.to_uppercase());

        let mut findings = Vec::new();
        let mut in_section = false;
        let mut expected: Option<f64> = None;

        for (_, paragraph) in context.text_paragraphs() {
            let key = normalize_topic(paragraph.trimmed_text()).to_uppercase();
            if !in_section {
                in_section = key == topic_key;
                continue;
            }
            if next_key.as_deref() == Some(key.as_str()) {
                break;
            }

            let indent = match expected {
                Some(indent) => indent,
                None => {
                    let first = self.row_indent(paragraph);
                    let allowed = self
                        .style
                        .project_stages_indents_cm
                        .iter()
                        .find(|&&a| within_tolerance(first, a, self.style.tolerance_cm));
                    match allowed {
                        Some(&a) => {
                            expected = Some(a);
                            a
                        }
                        None => {
                            findings.push(Finding::at(
                                FindingCategory::ProjectStages,
                                paragraph,
                                format!("Invalid left indent in first row: {first:.2} cm"),
                            ));
                            return findings;
                        }
                    }
                }
            };
            self.check_row(paragraph, indent, &mut findings);
        }

        findings
    }

    fn name(&self) -> &str {
        "ProjectStages"
    }

    fn default_zones(&self) -> &'static [Zone] {
        BODY_ONLY
    }
}

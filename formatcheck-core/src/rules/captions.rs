use super::engine::{CheckContext, CheckRule, BODY_ONLY};
use crate::config::{Markers, ProfileConfig};
use crate::text::is_all_caps;
use crate::types::{Alignment, Finding, FindingCategory, Paragraph, Zone};
use std::collections::BTreeSet;

// CaptionRule - images are centered and followed by a "Fig." caption
pub struct CaptionRule<'a> {
    markers: &'a Markers,
}

impl<'a> CaptionRule<'a> {
    pub fn new(config: &'a ProfileConfig) -> Self {
        Self {
            markers: &config.markers,
        }
    }

    /// Anchoring paragraphs of every image, in document order
    fn anchors(context: &CheckContext<'_>) -> BTreeSet<usize> {
        let from_shapes = context.model.inline_shapes.iter().map(|s| s.paragraph_index);
        let from_flags = context
            .model
            .paragraphs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.has_inline_shape)
            .map(|(i, _)| i);
        from_shapes
            .chain(from_flags)
            .filter(|&i| i < context.model.paragraphs.len() && context.in_scope(i))
            .collect()
    }

    fn is_candidate_line(&self, paragraph: &Paragraph) -> bool {
        !paragraph.is_blank() && paragraph.trimmed_text() != self.markers.caption_placeholder
    }

    fn check_caption(&self, caption: &Paragraph, findings: &mut Vec<Finding>) {
        let text = caption.trimmed_text();
        let prefix = self.markers.caption_prefix.as_str();
        let starts = text
            .get(..prefix.len())
            .is_some_and(|head| head.to_lowercase() == prefix.to_lowercase());
        if !starts {
            return;
        }

        if caption.alignment != Alignment::Center {
            findings.push(Finding::at(
                FindingCategory::Caption,
                caption,
                "Caption is not centered",
            ));
        }
        if caption.is_bold() {
            findings.push(Finding::at(
                FindingCategory::Caption,
                caption,
                "Caption should not be bold",
            ));
        }
        if !text.starts_with(prefix) {
            findings.push(Finding::at(
                FindingCategory::Caption,
                caption,
                format!("Caption should start with '{prefix}'"),
            ));
        }
        if is_all_caps(&text[prefix.len()..]) {
            findings.push(Finding::at(
                FindingCategory::Caption,
                caption,
                "Caption text should not be in capitals",
            ));
        }
    }
}

impl<'a> CheckRule for CaptionRule<'a> {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for index in Self::anchors(context) {
            let image = &context.model.paragraphs[index];
            if image.alignment != Alignment::Center {
                findings.push(
                    Finding::new(FindingCategory::Caption, "Image is not centered")
                        .on_page(image.page),
                );
            }

            match context.model.next_matching(index, |p| self.is_candidate_line(p)) {
                Some(next) => self.check_caption(&context.model.paragraphs[next], &mut findings),
                None => findings.push(
                    Finding::new(FindingCategory::Caption, "Image has no caption")
                        .on_page(image.page),
                ),
            }
        }

        findings
    }

    fn name(&self) -> &str {
        "Captions"
    }

    fn default_zones(&self) -> &'static [Zone] {
        BODY_ONLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentModel;
    use crate::topics::TopicSet;
    use crate::types::{DocumentType, InlineShape};
    use crate::zones::ZoneMap;

    fn centered(text: &str) -> Paragraph {
        Paragraph {
            alignment: Alignment::Center,
            ..Paragraph::new(text)
        }
    }

    fn run(paragraphs: Vec<Paragraph>, shapes: &[usize]) -> Vec<Finding> {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        let mut model = DocumentModel::from_paragraphs(paragraphs);
        model.inline_shapes = shapes
            .iter()
            .map(|&paragraph_index| InlineShape { paragraph_index })
            .collect();
        let zones = ZoneMap::uniform(model.paragraphs.len(), Zone::Body);
        let topics = TopicSet::default();
        let context = CheckContext::new(&model, &zones, &topics, BODY_ONLY);
        CaptionRule::new(&config).check(&context)
    }

    #[test]
    fn test_valid_caption_after_placeholder() {
        let findings = run(
            vec![centered(""), centered("/"), centered("Fig. 1.1 Example output")],
            &[0],
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_uppercase_caption_is_one_finding() {
        let findings = run(vec![centered(""), centered("Fig. EXAMPLE OUTPUT")], &[0]);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("capitals"));
    }

    #[test]
    fn test_prefix_case_alignment_and_weight() {
        let caption = Paragraph {
            bold: Some(true),
            ..Paragraph::new("FIG. 2 Layout")
        };
        let findings = run(vec![Paragraph::new(""), caption], &[0]);
        let messages: Vec<_> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Image is not centered",
                "Caption is not centered",
                "Caption should not be bold",
                "Caption should start with 'Fig.'",
            ]
        );
    }

    #[test]
    fn test_missing_caption_and_non_caption_follower() {
        assert_eq!(run(vec![centered(""), centered("/")], &[0]).len(), 1);
        assert!(run(vec![centered(""), Paragraph::new("Plain text")], &[0]).is_empty());
    }

    #[test]
    fn test_flagged_paragraphs_count_as_images() {
        let image = Paragraph {
            has_inline_shape: true,
            ..centered("")
        };
        let findings = run(vec![image], &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "Image has no caption");
    }
}

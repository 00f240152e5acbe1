use super::engine::{CheckContext, CheckRule, BODY_ONLY};
use crate::config::{IndentRange, ListIndentConfig, ProfileConfig};
use crate::geometry::{points_to_cm, within_range};
use crate::types::{Finding, FindingCategory, ListKind, Paragraph, Zone};
use regex::Regex;
use std::sync::LazyLock;

// Manually typed marker, the whitespace after it and the first character of the item
static MANUAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[.)]|[*•–-])(\s+)?(.)?").unwrap());

/// Contiguous run of list paragraphs of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct ListBlock {
    pub kind: ListKind,
    /// Document indices of the member paragraphs
    pub members: Vec<usize>,
}

/// Group scoped paragraphs into blocks. A paragraph of another kind, a non-list
/// paragraph or a paragraph outside the scope closes the current block.
pub fn list_blocks(context: &CheckContext<'_>) -> Vec<ListBlock> {
    let mut blocks: Vec<ListBlock> = Vec::new();
    let mut current: Option<ListBlock> = None;

    for (index, paragraph) in context.model.paragraphs.iter().enumerate() {
        let kind = paragraph.list.kind;
        let member = context.in_scope(index) && !paragraph.in_table && kind != ListKind::None;

        if member {
            if let Some(block) = current.as_mut().filter(|block| block.kind == kind) {
                block.members.push(index);
                continue;
            }
        }

        blocks.extend(current.take());
        if member {
            current = Some(ListBlock {
                kind,
                members: vec![index],
            });
        }
    }
    blocks.extend(current);
    blocks
}

// ListRule - indents of host-generated lists and spacing of manual markers
pub struct ListRule<'a> {
    indents: &'a ListIndentConfig,
    tolerance: f64,
}

impl<'a> ListRule<'a> {
    pub fn new(config: &'a ProfileConfig) -> Self {
        Self {
            indents: &config.style.list_indents,
            tolerance: config.style.tolerance_cm,
        }
    }

    fn expected_range(&self, paragraph: &Paragraph) -> Option<IndentRange> {
        match paragraph.list.kind {
            ListKind::None => None,
            ListKind::Bulleted => Some(self.indents.bulleted),
            ListKind::Numbered => match paragraph.list.leading_number() {
                Some(n) if n >= 10 => Some(self.indents.numbered_multi_digit),
                _ => Some(self.indents.numbered_single_digit),
            },
            ListKind::OutlineNumbered => Some(self.indents.outline_numbered),
        }
    }

    fn check_block(&self, context: &CheckContext<'_>, block: &ListBlock) -> Option<Finding> {
        block.members.iter().find_map(|&index| {
            let paragraph = &context.model.paragraphs[index];
            if context.is_heading(paragraph) {
                return None;
            }
            let range = self.expected_range(paragraph)?;
            let total = points_to_cm(paragraph.left_indent + paragraph.first_line_indent);
            if within_range(total, range.min, range.max, self.tolerance) {
                return None;
            }
            Some(Finding::at(
                FindingCategory::List,
                paragraph,
                format!(
                    "Incorrect indents in {} paragraph: {total:.2} cm (should be {:.2}-{:.2} cm)",
                    block.kind.label(),
                    range.min,
                    range.max
                ),
            ))
        })
    }

    fn check_manual_marker(paragraph: &Paragraph) -> Option<Finding> {
        let caps = MANUAL_MARKER.captures(paragraph.trimmed_text())?;
        let marker = caps.get(1)?.as_str();
        let spacing = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let follower = caps.get(3).and_then(|m| m.as_str().chars().next());

        let too_wide = spacing.chars().count() > 1;
        // "1.Text" and "•Text" are glued markers. "1.2." and "-word" are not markers.
        let glued =
            marker != "-" && spacing.is_empty() && follower.is_some_and(|c| c.is_alphabetic());

        (too_wide || glued).then(|| {
            Finding::at(
                FindingCategory::ListMarker,
                paragraph,
                format!("Incorrect spacing after manually typed list marker '{marker}'"),
            )
        })
    }
}

impl<'a> CheckRule for ListRule<'a> {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings: Vec<Finding> = list_blocks(context)
            .iter()
            .filter_map(|block| self.check_block(context, block))
            .collect();

        findings.extend(
            context
                .text_paragraphs()
                .filter_map(|(_, p)| Self::check_manual_marker(p)),
        );
        findings
    }

    fn name(&self) -> &str {
        "Lists"
    }

    fn default_zones(&self) -> &'static [Zone] {
        BODY_ONLY
    }
}

use super::engine::{CheckContext, CheckRule, BODY_ONLY};
use crate::config::{Markers, ProfileConfig, StyleGuide};
use crate::geometry::{is_absurd_font_size, points_to_cm, within_tolerance};
use crate::model::TableModel;
use crate::types::{Alignment, Finding, FindingCategory, Paragraph, TableCell, Zone};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Running state of the label scan
#[derive(Debug, Default)]
struct LabelState {
    /// Every label seen so far, well-formed or not
    counter: u32,
    /// Last number used under each chapter prefix ("2" for "Table 2.3")
    chapters: HashMap<String, u32>,
    last_number: Option<String>,
}

// TableRule - table labels, continuation labels and cell fonts
pub struct TableRule<'a> {
    style: &'a StyleGuide,
    markers: &'a Markers,
    label: Regex,
    exact_label: Regex,
}

impl<'a> TableRule<'a> {
    pub fn new(config: &'a ProfileConfig) -> Self {
        let label = regex::escape(&config.markers.table_label);
        Self {
            style: &config.style,
            markers: &config.markers,
            // Escaped literal plus fixed syntax; always a valid pattern
            label: Regex::new(&format!(r"^{label}\s+(\d+(?:\.\d+)*)")).unwrap(),
            exact_label: Regex::new(&format!(r"^{label} \d+(?:\.\d+)*\.?$")).unwrap(),
        }
    }

    fn check_label(
        &self,
        context: &CheckContext<'_>,
        index: usize,
        paragraph: &Paragraph,
        number: &str,
        state: &mut LabelState,
        findings: &mut Vec<Finding>,
    ) {
        state.counter += 1;
        let text = paragraph.trimmed_text();

        if !self.exact_label.is_match(text) {
            findings.push(Finding::at(
                FindingCategory::Table,
                paragraph,
                format!(
                    "Incorrect table label format (expected '{} {number}.')",
                    self.markers.table_label
                ),
            ));
        }

        if let Some(expected) = expected_number(number, state) {
            findings.push(Finding::at(
                FindingCategory::Table,
                paragraph,
                format!(
                    "Table numbering incorrect (expected '{} {expected}.')",
                    self.markers.table_label
                ),
            ));
        }
        state.last_number = Some(number.to_string());

        let right_cm = points_to_cm(paragraph.right_indent);
        let expected_right = self.style.table_label_right_indent_cm;
        if !within_tolerance(right_cm, expected_right, self.style.tolerance_cm) {
            findings.push(Finding::at(
                FindingCategory::Table,
                paragraph,
                format!(
                    "Incorrect right indent of table label: {right_cm:.2} cm \
                     (should be {expected_right:.2} cm)"
                ),
            ));
        }

        match context.model.next_non_blank(index) {
            Some(next) => {
                let title = &context.model.paragraphs[next];
                if title.alignment != Alignment::Center {
                    findings.push(Finding::at(
                        FindingCategory::Table,
                        title,
                        format!("Title of table {number} is not centered"),
                    ));
                }
            }
            None => findings.push(Finding::at(
                FindingCategory::Table,
                paragraph,
                format!("Table {number} has no title"),
            )),
        }
    }

    fn check_continuation(&self, paragraph: &Paragraph, state: &LabelState) -> Option<Finding> {
        let text = paragraph.trimmed_text();
        let prefix = &self.markers.table_continuation;

        let Some(last) = &state.last_number else {
            return Some(Finding::at(
                FindingCategory::Table,
                paragraph,
                "Continuation label appears before any table",
            ));
        };

        let expected = format!("{prefix} {last}");
        let actual = text.trim_end_matches('.');
        (actual != expected).then(|| {
            Finding::at(
                FindingCategory::Table,
                paragraph,
                format!("Incorrect continuation format (expected '{expected}')"),
            )
        })
    }

    fn check_cells(&self, table: &TableModel) -> Vec<Finding> {
        let cells = match &table.cells {
            Ok(cells) => cells,
            Err(e) => {
                log::warn!("Skipping cells of table {}: {e}", table.number);
                return vec![Finding::new(
                    FindingCategory::Skipped,
                    format!("Could not check fonts of table {}: {e}", table.number),
                )];
            }
        };

        let mut reported: HashSet<&str> = HashSet::new();
        cells
            .iter()
            .filter(|cell| !cell.text.trim().is_empty())
            // One verdict per distinct text, taken from its first cell
            .filter(|cell| reported.insert(cell.text.trim()))
            .filter(|cell| !self.cell_matches(cell))
            .map(|cell| {
                let font = cell.font_name.as_deref().unwrap_or("mixed");
                let size = cell
                    .font_size
                    .map(|s| format!("{s} pt"))
                    .unwrap_or_else(|| "mixed size".to_string());
                Finding::new(
                    FindingCategory::Table,
                    format!(
                        "Table {} contains text not in {} {} pt: {font}, {size}",
                        table.number, self.style.font_name, self.style.font_size
                    ),
                )
                .with_text(cell.text.trim())
            })
            .collect()
    }

    fn cell_matches(&self, cell: &TableCell) -> bool {
        if is_absurd_font_size(cell.font_size) {
            return true;
        }
        cell.font_name.as_deref() == Some(self.style.font_name.as_str())
            && cell
                .font_size
                .is_some_and(|size| (size - self.style.font_size).abs() < f32::EPSILON)
    }
}

/// `None` when the number continues its sequence, else the expected number
fn expected_number(number: &str, state: &mut LabelState) -> Option<String> {
    match number.rsplit_once('.') {
        None => {
            let actual: Option<u32> = number.parse().ok();
            (actual != Some(state.counter)).then(|| state.counter.to_string())
        }
        Some((chapter, ordinal)) => {
            let last = state.chapters.entry(chapter.to_string()).or_insert(0);
            let expected = *last + 1;
            let actual: Option<u32> = ordinal.parse().ok();
            // Resynchronize on the number found so one gap yields one finding
            *last = actual.unwrap_or(expected);
            (actual != Some(expected)).then(|| format!("{chapter}.{expected}"))
        }
    }
}

impl<'a> CheckRule for TableRule<'a> {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut state = LabelState::default();

        for (index, paragraph) in context.text_paragraphs() {
            let text = paragraph.trimmed_text();
            if text.starts_with(self.markers.table_continuation.as_str()) {
                findings.extend(self.check_continuation(paragraph, &state));
            } else if let Some(caps) = self.label.captures(text) {
                let number = caps[1].to_string();
                self.check_label(context, index, paragraph, &number, &mut state, &mut findings);
            }
        }

        for table in context.scoped_tables() {
            findings.extend(self.check_cells(table));
        }

        findings
    }

    fn name(&self) -> &str {
        "Tables"
    }

    fn default_zones(&self) -> &'static [Zone] {
        BODY_ONLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::geometry::cm_to_points;
    use crate::model::{DocumentModel, TableSpan};
    use crate::topics::TopicSet;
    use crate::types::DocumentType;
    use crate::zones::ZoneMap;

    fn label(text: &str) -> Paragraph {
        Paragraph {
            right_indent: cm_to_points(0.25),
            alignment: Alignment::Right,
            ..Paragraph::new(text)
        }
    }

    fn title(text: &str) -> Paragraph {
        Paragraph {
            alignment: Alignment::Center,
            ..Paragraph::new(text)
        }
    }

    fn run_model(model: &DocumentModel) -> Vec<Finding> {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        let zones = ZoneMap::uniform(model.paragraphs.len(), Zone::Body);
        let topics = TopicSet::default();
        let context = CheckContext::new(model, &zones, &topics, BODY_ONLY);
        TableRule::new(&config).check(&context)
    }

    fn run(paragraphs: Vec<Paragraph>) -> Vec<Finding> {
        run_model(&DocumentModel::from_paragraphs(paragraphs))
    }

    #[test]
    fn test_well_formed_labels() {
        let findings = run(vec![
            label("Table 1."),
            title("Survey results"),
            label("Table 2"),
            Paragraph::new(""),
            title("Costs"),
            Paragraph::new("Continuation of table 2"),
        ]);
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn test_numbering_and_format() {
        let findings = run(vec![
            label("Table 2."),
            title("Skipped one"),
            label("Table  2."),
            title("Double space"),
        ]);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("expected 'Table 1.'"));
        assert!(findings[1].message.contains("format"));
    }

    #[test]
    fn test_chapter_numbers_continue_per_prefix() {
        let findings = run(vec![
            label("Table 1.1."),
            title("a"),
            label("Table 1.2."),
            title("b"),
            label("Table 2.1."),
            title("c"),
            label("Table 2.3."),
            title("d"),
        ]);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("expected 'Table 2.2.'"));
    }

    #[test]
    fn test_label_indent_and_title_alignment() {
        let findings = run(vec![
            Paragraph::new("Table 1."),
            Paragraph::new("Left aligned title"),
        ]);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("right indent"));
        assert!(findings[1].message.contains("not centered"));
    }

    #[test]
    fn test_continuation_must_name_last_table() {
        let findings = run(vec![
            Paragraph::new("Continuation of table 1"),
            label("Table 1."),
            title("Data"),
            Paragraph::new("Continuation of table 3"),
        ]);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("before any table"));
        assert!(findings[1].message.contains("'Continuation of table 1'"));
    }

    #[test]
    fn test_cell_fonts_are_deduplicated_and_unreadable_tables_skipped() {
        let arial = |text: &str| TableCell {
            text: text.to_string(),
            font_name: Some("Arial".to_string()),
            font_size: Some(14.0),
        };
        let mut model = DocumentModel::from_paragraphs(Vec::new());
        model.tables = vec![
            TableModel {
                number: 1,
                anchor: None,
                cells: Ok(vec![arial("Total"), arial("Total"), arial("Sum")]),
                span: TableSpan::Pages { first: 1, last: 1 },
            },
            TableModel {
                number: 2,
                anchor: None,
                cells: Err(HostError::CellAccess {
                    table: 1,
                    reason: "merged".to_string(),
                }),
                span: TableSpan::Pages { first: 2, last: 2 },
            },
        ];

        let findings = run_model(&model);
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].offending_text.as_deref(), Some("Total"));
        assert_eq!(findings[1].offending_text.as_deref(), Some("Sum"));
        assert_eq!(findings[2].category, FindingCategory::Skipped);
    }

    #[test]
    fn test_compliant_cell_text_is_not_reported_again() {
        let cell = |text: &str, font: &str| TableCell {
            text: text.to_string(),
            font_name: Some(font.to_string()),
            font_size: Some(14.0),
        };
        let mut model = DocumentModel::from_paragraphs(Vec::new());
        model.tables = vec![TableModel {
            number: 1,
            anchor: None,
            cells: Ok(vec![
                cell("Total", "Times New Roman"),
                cell("Total", "Arial"),
                cell("Sum", "Arial"),
            ]),
            span: TableSpan::Pages { first: 1, last: 1 },
        }];

        let findings = run_model(&model);
        assert_eq!(findings.len(), 1, "{findings:?}");
        assert_eq!(findings[0].offending_text.as_deref(), Some("Sum"));
    }

    #[test]
    fn test_appendix_table_cells_are_not_checked() {
        let config = ProfileConfig::builtin(DocumentType::MainPart);
        let mut model = DocumentModel::from_paragraphs(vec![
            Paragraph::new("APPENDIX A"),
            Paragraph {
                in_table: true,
                ..Paragraph::new("fn main() {}")
            },
        ]);
        model.tables = vec![TableModel {
            number: 1,
            anchor: Some(1),
            cells: Ok(vec![TableCell {
                text: "fn main() {}".to_string(),
                font_name: Some("Courier New".to_string()),
                font_size: Some(10.0),
            }]),
            span: TableSpan::Pages { first: 20, last: 22 },
        }];

        let zones = ZoneMap::uniform(model.paragraphs.len(), Zone::Appendix);
        let topics = TopicSet::default();
        let context = CheckContext::new(&model, &zones, &topics, BODY_ONLY);
        assert!(TableRule::new(&config).check(&context).is_empty());
    }
}

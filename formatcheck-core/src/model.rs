use crate::access::DocumentAccess;
use crate::error::HostError;
use crate::types::{InlineShape, PageSetup, Paragraph, TableCell};

/// Page span of a table, read through the fallible row accessors
#[derive(Debug, Clone, PartialEq)]
pub enum TableSpan {
    Pages { first: u32, last: u32 },
    Unknown { reason: String },
}

#[derive(Debug, Clone)]
pub struct TableModel {
    /// 1-based position of the table in the document
    pub number: usize,
    /// First paragraph inside the table; `None` when it cannot be placed
    pub anchor: Option<usize>,
    pub cells: Result<Vec<TableCell>, HostError>,
    pub span: TableSpan,
}

/// In-memory document captured once from the host and shared by all checkers
#[derive(Debug, Clone)]
pub struct DocumentModel {
    pub paragraphs: Vec<Paragraph>,
    pub page_setup: Result<PageSetup, HostError>,
    pub tables: Vec<TableModel>,
    pub inline_shapes: Vec<InlineShape>,
    pub table_of_contents: Option<Vec<String>>,
}

impl DocumentModel {
    /// Read everything the checkers need. Only the paragraph stream is required;
    /// other accessor failures are kept in the model and reported by the checkers.
    pub fn capture(access: &dyn DocumentAccess) -> Result<Self, HostError> {
        let paragraphs = access.paragraphs()?;
        let page_setup = access.page_setup();
        let runs = table_runs(&paragraphs);

        let tables = (0..access.table_count())
            .map(|index| TableModel {
                number: index + 1,
                anchor: access
                    .table_anchor(index)
                    .or_else(|| runs.get(index).copied()),
                cells: access.table_cells(index),
                span: read_span(access, index),
            })
            .collect();

        let model = Self {
            paragraphs,
            page_setup,
            tables,
            inline_shapes: access.inline_shapes(),
            table_of_contents: access.table_of_contents(),
        };

        log::debug!(
            "Captured {}: {} paragraphs, {} tables, {} inline shapes",
            access.name(),
            model.paragraphs.len(),
            model.tables.len(),
            model.inline_shapes.len()
        );
        Ok(model)
    }

    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            page_setup: Err(HostError::PageSetup("not captured".to_string())),
            tables: Vec::new(),
            inline_shapes: Vec::new(),
            table_of_contents: None,
        }
    }

    /// True when there is no visible text at all
    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.is_blank())
    }

    /// Index of the next non-blank paragraph after `index`
    pub fn next_non_blank(&self, index: usize) -> Option<usize> {
        self.next_matching(index, |p| !p.is_blank())
    }

    pub fn next_matching<F>(&self, index: usize, predicate: F) -> Option<usize>
    where
        F: Fn(&Paragraph) -> bool,
    {
        self.paragraphs
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, p)| predicate(p))
            .map(|(i, _)| i)
    }
}

/// Start index of every run of consecutive `in_table` paragraphs
fn table_runs(paragraphs: &[Paragraph]) -> Vec<usize> {
    paragraphs
        .iter()
        .enumerate()
        .filter(|(i, p)| p.in_table && (*i == 0 || !paragraphs[i - 1].in_table))
        .map(|(i, _)| i)
        .collect()
}

fn read_span(access: &dyn DocumentAccess, table: usize) -> TableSpan {
    let pages = access.table_row_count(table).and_then(|rows| {
        if rows == 0 {
            return Err(HostError::RowAccess {
                table,
                row: 0,
                reason: "table has no rows".to_string(),
            });
        }
        let first = access.table_row_page(table, 0)?;
        let last = access.table_row_page(table, rows - 1)?;
        Ok((first, last))
    });

    match pages {
        Ok((first, last)) => TableSpan::Pages { first, last },
        Err(e) => TableSpan::Unknown {
            reason: e.to_string(),
        },
    }
}

//! JSON snapshot host
//!
//! A snapshot is the paragraph/table/shape object model exported from the word
//! processor once, so documents can be checked without an automation session.
//! Row and cell access failures of the live host are reproduced through the
//! `vertically_merged` and `cells_unreadable` flags.

use super::traits::{DocumentAccess, DocumentHost};
use crate::error::HostError;
use crate::types::{InlineShape, PageSetup, Paragraph, TableCell};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub page_setup: Option<PageSetup>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub tables: Vec<SnapshotTable>,
    #[serde(default)]
    pub inline_shapes: Vec<InlineShape>,
    #[serde(default)]
    pub table_of_contents: Option<Vec<String>>,
    #[serde(skip)]
    pub(crate) closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotTable {
    pub rows: Vec<SnapshotRow>,
    /// Paragraph index of the first cell paragraph
    #[serde(default)]
    pub anchor_paragraph: Option<usize>,
    /// Individual rows cannot be addressed (host fails on vertical merges)
    #[serde(default)]
    pub vertically_merged: bool,
    /// The cell range cannot be enumerated at all
    #[serde(default)]
    pub cells_unreadable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotRow {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

impl SnapshotDocument {
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        serde_json::from_str(json).map_err(|e| HostError::Malformed(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let content = std::fs::read_to_string(path).map_err(|e| HostError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn table(&self, table: usize) -> Result<&SnapshotTable, HostError> {
        self.tables.get(table).ok_or(HostError::NoSuchTable { table })
    }
}

impl DocumentAccess for SnapshotDocument {
    fn paragraphs(&self) -> Result<Vec<Paragraph>, HostError> {
        Ok(self.paragraphs.clone())
    }

    fn page_setup(&self) -> Result<PageSetup, HostError> {
        self.page_setup
            .clone()
            .ok_or_else(|| HostError::PageSetup("snapshot has no page setup".to_string()))
    }

    fn table_count(&self) -> usize {
        self.tables.len()
    }

    fn table_row_count(&self, table: usize) -> Result<usize, HostError> {
        Ok(self.table(table)?.rows.len())
    }

    fn table_row_page(&self, table: usize, row: usize) -> Result<u32, HostError> {
        let snapshot_table = self.table(table)?;
        if snapshot_table.vertically_merged {
            return Err(HostError::RowAccess {
                table,
                row,
                reason: "table has vertically merged cells".to_string(),
            });
        }
        snapshot_table
            .rows
            .get(row)
            .and_then(|r| r.page)
            .ok_or_else(|| HostError::RowAccess {
                table,
                row,
                reason: "row has no page information".to_string(),
            })
    }

    fn table_cells(&self, table: usize) -> Result<Vec<TableCell>, HostError> {
        let snapshot_table = self.table(table)?;
        if snapshot_table.cells_unreadable {
            return Err(HostError::CellAccess {
                table,
                reason: "merged cells could not be enumerated".to_string(),
            });
        }
        Ok(snapshot_table
            .rows
            .iter()
            .flat_map(|row| row.cells.iter().cloned())
            .collect())
    }

    fn table_anchor(&self, table: usize) -> Option<usize> {
        self.tables.get(table).and_then(|t| t.anchor_paragraph)
    }

    fn inline_shapes(&self) -> Vec<InlineShape> {
        self.inline_shapes.clone()
    }

    fn table_of_contents(&self) -> Option<Vec<String>> {
        self.table_of_contents.clone()
    }

    fn close(&mut self) -> Result<(), HostError> {
        self.closed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "SnapshotDocument"
    }
}

/// Opens `.json` snapshot files
#[derive(Debug, Default, Clone)]
pub struct SnapshotHost;

impl SnapshotHost {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentHost for SnapshotHost {
    type Document = SnapshotDocument;

    fn open(&self, path: &Path) -> Result<Self::Document, HostError> {
        if !path.exists() {
            return Err(HostError::Io(format!("File does not exist: {}", path.display())));
        }
        if !self.supports_file_type(path) {
            return Err(HostError::Malformed(format!(
                "Unsupported file format: {} (expected a .json snapshot)",
                path.display()
            )));
        }
        SnapshotDocument::from_file(path)
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

// Document Access Interface
//
// The engine never talks to the word processor directly. Everything it needs
// is read through this trait, in the host's native unit (points). Accessors
// that the host is known to fail on (rows of tables with vertically merged
// cells, cell ranges, page setup of odd sections) return HostError so the
// checkers can degrade to a finding instead of aborting.

use crate::error::HostError;
use crate::types::{InlineShape, PageSetup, Paragraph, TableCell};
use std::path::Path;

pub trait DocumentAccess {
    /// Ordered paragraph stream, table cell paragraphs included (`in_table`)
    fn paragraphs(&self) -> Result<Vec<Paragraph>, HostError>;

    /// Page geometry of the first section
    fn page_setup(&self) -> Result<PageSetup, HostError>;

    fn table_count(&self) -> usize;

    fn table_row_count(&self, table: usize) -> Result<usize, HostError>;

    /// Page number the given row starts on
    fn table_row_page(&self, table: usize, row: usize) -> Result<u32, HostError>;

    /// All cells of the table in reading order
    fn table_cells(&self, table: usize) -> Result<Vec<TableCell>, HostError>;

    /// Index of the first paragraph inside the table, when the host knows it.
    /// Otherwise the model places tables by their runs of `in_table` paragraphs.
    fn table_anchor(&self, _table: usize) -> Option<usize> {
        None
    }

    fn inline_shapes(&self) -> Vec<InlineShape>;

    /// Entries of a structured table-of-contents field, when the document has one
    fn table_of_contents(&self) -> Option<Vec<String>>;

    /// Release the host-side document. Called exactly once by `DocumentSession`.
    fn close(&mut self) -> Result<(), HostError>;

    /// Name for logging
    fn name(&self) -> &str;
}

/// Opens documents. One open document per check request.
pub trait DocumentHost {
    type Document: DocumentAccess;

    fn open(&self, path: &Path) -> Result<Self::Document, HostError>;

    /// Check if the host can open the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}

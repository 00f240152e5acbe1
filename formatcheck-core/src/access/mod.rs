//! Document access layer
//!
//! This module defines the boundary between the host that owns the document
//! (a word processor automation session, or a captured snapshot) and the
//! checking engine.
//!
//! ## Architecture
//!
//! ```text
//! Document (DOCX opened by the host, or a JSON snapshot)
//!     ↓
//! [DocumentHost::open] → DocumentSession (closes on drop)
//!     ↓
//! [DocumentAccess]  paragraphs, tables, shapes, page setup
//!     ↓
//! DocumentModel (captured once)
//!     ↓
//! [Rule Engine]
//! ```
//!
//! ## Available hosts
//!
//! - `SnapshotHost` - JSON snapshots exported from the word processor

pub mod traits;
pub mod snapshot;
pub mod session;

// Re-export main types
pub use traits::{DocumentAccess, DocumentHost};
pub use snapshot::{SnapshotDocument, SnapshotHost, SnapshotRow, SnapshotTable};
pub use session::DocumentSession;

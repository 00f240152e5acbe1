// Formatcheck Core Library
//
// Style-guide linter for thesis documents. A document is read once through the
// Document Access Interface, split into structural zones, checked by the
// profile's rule pipeline and optionally sent paragraph by paragraph to a
// grammar provider.

pub mod access;
pub mod checker;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grammar;
pub mod model;
pub mod rules;
pub mod text;
pub mod topics;
pub mod types;
pub mod zones;

// Re-export main types and functions for easy use
pub use access::{DocumentAccess, DocumentHost, DocumentSession, SnapshotDocument, SnapshotHost};
pub use checker::FormatChecker;
pub use config::{ConfigManager, ProfileConfig};
pub use error::{CheckError, HostError, ProviderError};
pub use grammar::{GrammarProvider, ProviderMatch};
pub use model::DocumentModel;
pub use types::*;

#[cfg(feature = "languagetool")]
pub use grammar::LanguageToolProvider;

// Scoped document session
//
// The host keeps one open document per check request. The session owns it and
// closes it on every exit path, early returns and panics included.

use super::traits::{DocumentAccess, DocumentHost};
use crate::error::HostError;
use std::ops::Deref;
use std::path::Path;

pub struct DocumentSession<D: DocumentAccess> {
    document: D,
    closed: bool,
}

impl<D: DocumentAccess> DocumentSession<D> {
    pub fn open<H>(host: &H, path: &Path) -> Result<Self, HostError>
    where
        H: DocumentHost<Document = D>,
    {
        let document = host.open(path)?;
        log::debug!("Opened {} from {}", document.name(), path.display());
        Ok(Self::from_document(document))
    }

    /// Wrap an already opened document
    pub fn from_document(document: D) -> Self {
        Self {
            document,
            closed: false,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Close explicitly and surface the host's error
    pub fn close(mut self) -> Result<(), HostError> {
        self.closed = true;
        self.document.close()
    }
}

impl<D: DocumentAccess> Deref for DocumentSession<D> {
    type Target = D;

    fn deref(&self) -> &Self::Target {
        self.document()
    }
}

impl<D: DocumentAccess> Drop for DocumentSession<D> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.document.close() {
            log::warn!("Failed to close {}: {e}", self.document.name());
        }
    }
}

//! # Edit Session
//!
//! One editing session: a document plus the selection service that receives
//! cursor notifications. Every mutation goes through `&mut self`, so a
//! session is the single critical section around `transact`/`undo`/`redo`.
//! Embed it behind one mutex or actor if several callers share it.

use tracing::debug;

use crate::component::Component;
use crate::document::{ApplyResult, Document};
use crate::errors::{EditorError, EditorResult};
use crate::ops::Transaction;
use crate::selection::SelectionService;

pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    document: Document,
    selection: Box<dyn SelectionService + Send>,
}

impl EditSession {
    pub fn new(
        id: impl Into<String>,
        document: Document,
        selection: impl SelectionService + Send + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            document,
            selection: Box::new(selection),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Hand the document back, ending the session
    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn selection(&self) -> &dyn SelectionService {
        self.selection.as_ref()
    }

    /// Apply a transaction and notify the selection service
    pub fn transact(&mut self, transaction: Transaction) -> EditorResult<ApplyResult> {
        let result = self.document.transact(transaction)?;
        self.notify(&result);
        Ok(result)
    }

    /// Undo; `Ok(false)` when there is nothing to undo
    pub fn undo(&mut self) -> EditorResult<bool> {
        match self.document.undo()? {
            Some(result) => {
                self.notify(&result);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Redo; `Ok(false)` when there is nothing to redo
    pub fn redo(&mut self) -> EditorResult<bool> {
        match self.document.redo()? {
            Some(result) => {
                self.notify(&result);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Insert at the end of the section the selection points into (not logged)
    pub fn insert_component(&mut self, component: Box<dyn Component>) -> EditorResult<()> {
        let target = self
            .selection
            .insertion_target()
            .ok_or(EditorError::NoInsertionTarget)?;
        let index = self.document.get_section_by_name(&target)?.len();

        debug!(session = %self.id, section = %target, component = %component.name(), "Inserting at selection");
        self.document.insert_component(component, &target, index)
    }

    fn notify(&mut self, result: &ApplyResult) {
        for change in &result.selection {
            change.dispatch(self.selection.as_mut());
        }
    }
}

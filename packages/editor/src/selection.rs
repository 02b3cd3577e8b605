//! # Selection Service
//!
//! The core never reads the selection to decide whether to mutate. It only
//! reports cursor movement after a transaction has been committed, and asks
//! for an insertion target in the session's convenience entry point.

use serde::{Deserialize, Serialize};

/// A cursor inside a component's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub component: String,
    pub offset: usize,
}

impl CursorPosition {
    pub fn new(component: impl Into<String>, offset: usize) -> Self {
        Self {
            component: component.into(),
            offset,
        }
    }
}

/// Collaborator that owns cursor/selection state
pub trait SelectionService {
    fn set_cursor(&mut self, position: CursorPosition);

    fn select(&mut self, from: CursorPosition, to: CursorPosition);

    /// Section new components should land in, if any
    fn insertion_target(&self) -> Option<String>;
}

/// Notification produced by the executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectionChange {
    Cursor(CursorPosition),
    Range {
        from: CursorPosition,
        to: CursorPosition,
    },
}

impl SelectionChange {
    /// Forward this change to a selection service
    pub fn dispatch(&self, service: &mut dyn SelectionService) {
        match self {
            SelectionChange::Cursor(position) => service.set_cursor(position.clone()),
            SelectionChange::Range { from, to } => service.select(from.clone(), to.clone()),
        }
    }
}

/// In-memory selection that remembers what it was told
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedSelection {
    /// Every notification received, oldest first
    pub changes: Vec<SelectionChange>,
    pub insertion_target: Option<String>,
}

impl RecordedSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targeting(section: impl Into<String>) -> Self {
        Self {
            changes: Vec::new(),
            insertion_target: Some(section.into()),
        }
    }

    pub fn last(&self) -> Option<&SelectionChange> {
        self.changes.last()
    }
}

impl SelectionService for RecordedSelection {
    fn set_cursor(&mut self, position: CursorPosition) {
        self.changes.push(SelectionChange::Cursor(position));
    }

    fn select(&mut self, from: CursorPosition, to: CursorPosition) {
        self.changes.push(SelectionChange::Range { from, to });
    }

    fn insertion_target(&self) -> Option<String> {
        self.insertion_target.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_routes_to_service() {
        let mut selection = RecordedSelection::new();

        SelectionChange::Cursor(CursorPosition::new("c1", 2)).dispatch(&mut selection);
        SelectionChange::Range {
            from: CursorPosition::new("c1", 0),
            to: CursorPosition::new("c1", 4),
        }
        .dispatch(&mut selection);

        assert_eq!(selection.changes.len(), 2);
        assert_eq!(
            selection.last(),
            Some(&SelectionChange::Range {
                from: CursorPosition::new("c1", 0),
                to: CursorPosition::new("c1", 4),
            })
        );
    }
}

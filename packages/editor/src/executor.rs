//! # Action Executor
//!
//! Interprets one [`ActionSpec`] against the document tree. Forward and
//! inverse specs go through the same dispatcher; only the payload differs.
//!
//! | action            | effect                                      | notification            |
//! |-------------------|---------------------------------------------|-------------------------|
//! | `insertChars`     | insert text at index                        | cursor if `cursorOffset`|
//! | `removeChars`     | remove `count` chars at index               | cursor if `cursorOffset`|
//! | `updateComponent` | replace text and/or apply formats           | cursor or range         |
//! | `deleteComponent` | remove from owning section                  | none                    |
//! | `insertComponent` | build via registry, insert into section     | none                    |
//!
//! Every name lookup miss is a `NotFound` error that aborts the rest of the
//! transaction.

use tracing::debug;

use crate::document::DocumentTree;
use crate::errors::{EditorError, EditorResult};
use crate::ops::{ActionSpec, Transaction};
use crate::registry::{ComponentConfig, VariantRegistry};
use crate::selection::{CursorPosition, SelectionChange};

/// Which half of each operation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `do` specs, first operation first
    Forward,
    /// `undo` specs, last operation first
    Inverse,
}

pub(crate) struct Executor<'a> {
    tree: &'a mut DocumentTree,
    registry: &'a VariantRegistry,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(tree: &'a mut DocumentTree, registry: &'a VariantRegistry) -> Self {
        Self { tree, registry }
    }

    /// Run every operation of `transaction` in `direction`
    ///
    /// Stops at the first failing action; the caller owns rollback.
    pub(crate) fn apply(
        &mut self,
        direction: Direction,
        transaction: &Transaction,
    ) -> EditorResult<Vec<SelectionChange>> {
        let mut changes = Vec::new();

        match direction {
            Direction::Forward => {
                for operation in transaction.operations() {
                    changes.extend(self.execute(&operation.forward)?);
                }
            }
            Direction::Inverse => {
                for operation in transaction.operations().iter().rev() {
                    changes.extend(self.execute(&operation.inverse)?);
                }
            }
        }

        Ok(changes)
    }

    /// Dispatch a single action
    pub(crate) fn execute(&mut self, action: &ActionSpec) -> EditorResult<Option<SelectionChange>> {
        debug!(op = action.kind(), component = %action.component(), "Executing action");

        match action {
            ActionSpec::InsertChars {
                component,
                index,
                value,
                cursor_offset,
            } => {
                self.tree
                    .component_mut(component)?
                    .insert_characters_at(value, *index)?;
                Ok(cursor(component, *cursor_offset))
            }

            ActionSpec::RemoveChars {
                component,
                index,
                count,
                cursor_offset,
            } => {
                self.tree
                    .component_mut(component)?
                    .remove_characters_at(*index, *count)?;
                Ok(cursor(component, *cursor_offset))
            }

            ActionSpec::UpdateComponent {
                component,
                value,
                formats,
                cursor_offset,
                select_range,
            } => {
                let target = self.tree.component_mut(component)?;
                if let Some(value) = value {
                    target.set_text(value)?;
                }
                if let Some(formats) = formats {
                    target.apply_formats(formats)?;
                }

                Ok(match (cursor_offset, select_range) {
                    (Some(offset), Some(range)) => {
                        let end = offset.checked_add(*range).ok_or(EditorError::IndexOutOfRange {
                            index: *offset,
                            len: *range,
                        })?;
                        Some(SelectionChange::Range {
                            from: CursorPosition::new(component.as_str(), *offset),
                            to: CursorPosition::new(component.as_str(), end),
                        })
                    }
                    (Some(offset), None) => cursor(component, Some(*offset)),
                    (None, _) => None,
                })
            }

            ActionSpec::DeleteComponent { component } => {
                self.tree.remove_component(component)?;
                Ok(None)
            }

            ActionSpec::InsertComponent {
                section,
                component,
                component_class,
                index,
                attrs,
            } => {
                // Resolve the section before building anything
                self.tree.section(section)?;

                let config = ComponentConfig::new(component.as_str())
                    .with_attrs(attrs.clone().unwrap_or_default());
                let built = self.registry.create(component_class, config)?;
                self.tree.insert_component(section, built, *index)?;
                Ok(None)
            }
        }
    }
}

fn cursor(component: &str, offset: Option<usize>) -> Option<SelectionChange> {
    offset.map(|offset| SelectionChange::Cursor(CursorPosition::new(component, offset)))
}

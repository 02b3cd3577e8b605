//! # Transactions and Operations
//!
//! The log entries are also the wire format for recorded editing sessions:
//!
//! ```text
//! Transaction := [Operation]
//! Operation   := { do: ActionSpec, undo: ActionSpec }
//! ActionSpec  := { op: "insertChars" | "removeChars" | "updateComponent"
//!                    | "deleteComponent" | "insertComponent", ... }
//! ```
//!
//! Every operation carries its own inverse. The executor never derives one;
//! the builders on [`Operation`] are the only place inverses get computed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::component::{Component, FormatRange};

/// One edit, dispatched by the executor
///
/// A missing `index` means 0 for every action that takes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ActionSpec {
    /// Insert `value` at character `index`
    #[serde(rename_all = "camelCase")]
    InsertChars {
        component: String,
        #[serde(default)]
        index: usize,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor_offset: Option<usize>,
    },

    /// Remove `count` characters at `index`
    #[serde(rename_all = "camelCase")]
    RemoveChars {
        component: String,
        #[serde(default)]
        index: usize,
        count: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor_offset: Option<usize>,
    },

    /// Replace text and/or apply formatting
    #[serde(rename_all = "camelCase")]
    UpdateComponent {
        component: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formats: Option<Vec<FormatRange>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor_offset: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select_range: Option<usize>,
    },

    /// Remove a component from its owning section
    DeleteComponent { component: String },

    /// Build a component through the registry and insert it into `section`
    #[serde(rename_all = "camelCase")]
    InsertComponent {
        section: String,
        component: String,
        component_class: String,
        #[serde(default)]
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attrs: Option<Map<String, Value>>,
    },
}

impl ActionSpec {
    /// Wire name of this action
    pub fn kind(&self) -> &'static str {
        match self {
            ActionSpec::InsertChars { .. } => "insertChars",
            ActionSpec::RemoveChars { .. } => "removeChars",
            ActionSpec::UpdateComponent { .. } => "updateComponent",
            ActionSpec::DeleteComponent { .. } => "deleteComponent",
            ActionSpec::InsertComponent { .. } => "insertComponent",
        }
    }

    /// Name of the component this action targets
    pub fn component(&self) -> &str {
        match self {
            ActionSpec::InsertChars { component, .. }
            | ActionSpec::RemoveChars { component, .. }
            | ActionSpec::UpdateComponent { component, .. }
            | ActionSpec::DeleteComponent { component }
            | ActionSpec::InsertComponent { component, .. } => component,
        }
    }
}

/// A forward action paired with its precomputed inverse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "do")]
    pub forward: ActionSpec,

    #[serde(rename = "undo")]
    pub inverse: ActionSpec,
}

impl Operation {
    pub fn new(forward: ActionSpec, inverse: ActionSpec) -> Self {
        Self { forward, inverse }
    }

    /// Insert `text` at `index`; undo removes it again
    pub fn insert_chars(component: impl Into<String>, index: usize, text: impl Into<String>) -> Self {
        let component = component.into();
        let text = text.into();
        let count = text.chars().count();

        Self::new(
            ActionSpec::InsertChars {
                component: component.clone(),
                index,
                value: text,
                cursor_offset: Some(index + count),
            },
            ActionSpec::RemoveChars {
                component,
                index,
                count,
                cursor_offset: Some(index),
            },
        )
    }

    /// Remove `removed` (the text currently at `index`); undo puts it back
    pub fn remove_chars(component: impl Into<String>, index: usize, removed: impl Into<String>) -> Self {
        let component = component.into();
        let removed = removed.into();
        let count = removed.chars().count();

        Self::new(
            ActionSpec::RemoveChars {
                component: component.clone(),
                index,
                count,
                cursor_offset: Some(index),
            },
            ActionSpec::InsertChars {
                component,
                index,
                value: removed,
                cursor_offset: Some(index + count),
            },
        )
    }

    /// Swap the whole text from `old` to `new`
    pub fn replace_text(
        component: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        let component = component.into();
        let old = old.into();
        let new = new.into();
        let old_len = old.chars().count();
        let new_len = new.chars().count();

        Self::new(
            ActionSpec::UpdateComponent {
                component: component.clone(),
                value: Some(new),
                formats: None,
                cursor_offset: Some(new_len),
                select_range: None,
            },
            ActionSpec::UpdateComponent {
                component,
                value: Some(old),
                formats: None,
                cursor_offset: Some(old_len),
                select_range: None,
            },
        )
    }

    /// Apply `ranges`; undo clears the same attributes on the same spans
    ///
    /// The inverse is only exact when the spans carried none of these
    /// attributes beforehand.
    pub fn format(component: impl Into<String>, ranges: Vec<FormatRange>) -> Self {
        let component = component.into();
        let cleared = ranges
            .iter()
            .map(|range| FormatRange {
                index: range.index,
                length: range.length,
                attributes: range
                    .attributes
                    .keys()
                    .map(|key| (key.clone(), Value::Null))
                    .collect(),
            })
            .collect();

        Self::new(
            ActionSpec::UpdateComponent {
                component: component.clone(),
                value: None,
                formats: Some(ranges),
                cursor_offset: None,
                select_range: None,
            },
            ActionSpec::UpdateComponent {
                component,
                value: None,
                formats: Some(cleared),
                cursor_offset: None,
                select_range: None,
            },
        )
    }

    /// Insert a fresh component; undo deletes it
    pub fn insert_component(
        section: impl Into<String>,
        component: impl Into<String>,
        component_class: impl Into<String>,
        index: usize,
    ) -> Self {
        let component = component.into();

        Self::new(
            ActionSpec::InsertComponent {
                section: section.into(),
                component: component.clone(),
                component_class: component_class.into(),
                index,
                attrs: None,
            },
            ActionSpec::DeleteComponent { component },
        )
    }

    /// Delete a component; undo re-inserts a fresh one of the same class
    ///
    /// Content edited after insertion is not restored. Use
    /// [`Operation::delete_component_restoring`] to capture it.
    pub fn delete_component(
        section: impl Into<String>,
        component: impl Into<String>,
        component_class: impl Into<String>,
        index: usize,
    ) -> Self {
        let component = component.into();

        Self::new(
            ActionSpec::DeleteComponent {
                component: component.clone(),
            },
            ActionSpec::InsertComponent {
                section: section.into(),
                component,
                component_class: component_class.into(),
                index,
                attrs: None,
            },
        )
    }

    /// Delete `component`; undo rebuilds it from its current snapshot
    pub fn delete_component_restoring(
        section: impl Into<String>,
        index: usize,
        component: &dyn Component,
    ) -> Self {
        let model = component.to_model();

        Self::new(
            ActionSpec::DeleteComponent {
                component: model.name.clone(),
            },
            ActionSpec::InsertComponent {
                section: section.into(),
                component: model.name,
                component_class: model.variant_kind,
                index,
                attrs: Some(model.fields),
            },
        )
    }
}

/// Atomically applied, atomically undone group of operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction {
    operations: Vec<Operation>,
}

impl Transaction {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn single(operation: Operation) -> Self {
        Self::new(vec![operation])
    }

    /// Append an operation (builder style)
    pub fn with(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl FromIterator<Operation> for Transaction {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

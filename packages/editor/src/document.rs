//! # Document
//!
//! Ordered sections of named components, plus the operation log that is the
//! only logged way to change them.
//!
//! ## Lifecycle
//!
//! ```text
//! build (insert_section, not logged)
//!   → transact / undo / redo (logged, all-or-nothing)
//!   → to_model (snapshot)
//! ```
//!
//! Before a transaction runs, the sections it can reach are saved in a
//! [`Checkpoint`]. If any action fails the checkpoint is restored. The log
//! cursor and the returned selection changes are produced only after every
//! action succeeded, so a rejected transaction leaves the document, the log
//! and `at` exactly as they were.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::component::Component;
use crate::config::EditorConfig;
use crate::errors::{EditorError, EditorResult};
use crate::executor::{Direction, Executor};
use crate::history::OperationLog;
use crate::model::DocumentModel;
use crate::ops::{ActionSpec, Transaction};
use crate::registry::{ComponentConfig, VariantRegistry};
use crate::section::Section;
use crate::selection::SelectionChange;

/// Copies of the sections a transaction can touch, keyed by position
///
/// The executor never adds or removes sections, so positions stay valid
/// until the checkpoint is restored or dropped.
#[derive(Debug)]
pub(crate) struct Checkpoint {
    sections: Vec<(usize, Section)>,
}

/// Sections plus the name index kept alongside them
///
/// `sections_by_name` maps a section name to its position,
/// `owners` maps a component name to its owning section's name.
#[derive(Debug, Default)]
pub(crate) struct DocumentTree {
    sections: Vec<Section>,
    sections_by_name: HashMap<String, usize>,
    owners: HashMap<String, String>,
}

impl DocumentTree {
    pub(crate) fn section(&self, name: &str) -> EditorResult<&Section> {
        self.sections_by_name
            .get(name)
            .map(|&pos| &self.sections[pos])
            .ok_or_else(|| EditorError::section_not_found(name))
    }

    fn section_mut(&mut self, name: &str) -> EditorResult<&mut Section> {
        let pos = *self
            .sections_by_name
            .get(name)
            .ok_or_else(|| EditorError::section_not_found(name))?;
        Ok(&mut self.sections[pos])
    }

    pub(crate) fn owner_of(&self, component: &str) -> EditorResult<&str> {
        self.owners
            .get(component)
            .map(String::as_str)
            .ok_or_else(|| EditorError::component_not_found(component))
    }

    pub(crate) fn component(&self, name: &str) -> EditorResult<&dyn Component> {
        let owner = self.owner_of(name)?;
        self.section(owner)?
            .component(name)
            .ok_or_else(|| EditorError::component_not_found(name))
    }

    pub(crate) fn component_mut(&mut self, name: &str) -> EditorResult<&mut dyn Component> {
        let owner = self.owner_of(name)?.to_string();
        self.section_mut(&owner)?
            .component_mut(name)
            .ok_or_else(|| EditorError::component_not_found(name))
    }

    pub(crate) fn contains_component(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    pub(crate) fn insert_component(
        &mut self,
        section: &str,
        component: Box<dyn Component>,
        index: usize,
    ) -> EditorResult<()> {
        let name = component.name().to_string();
        if self.owners.contains_key(&name) {
            return Err(EditorError::DuplicateName(name));
        }

        self.section_mut(section)?
            .insert_component_at(component, index)?;
        self.owners.insert(name, section.to_string());
        Ok(())
    }

    pub(crate) fn remove_component(&mut self, name: &str) -> EditorResult<Box<dyn Component>> {
        let owner = self.owner_of(name)?.to_string();
        let removed = self.section_mut(&owner)?.remove_component(name)?;
        self.owners.remove(name);
        Ok(removed)
    }

    /// Save every section that `actions` reach
    ///
    /// A component is reached through its current owner, an insert through
    /// its target section. Names that do not resolve yet either fail later or
    /// belong to a component inserted earlier in the same run, whose section
    /// is already saved.
    pub(crate) fn checkpoint<'a>(
        &self,
        actions: impl IntoIterator<Item = &'a ActionSpec>,
    ) -> Checkpoint {
        let mut positions: Vec<usize> = actions
            .into_iter()
            .filter_map(|action| {
                let section = match action {
                    ActionSpec::InsertComponent { section, .. } => section.as_str(),
                    other => self.owners.get(other.component())?.as_str(),
                };
                self.sections_by_name.get(section).copied()
            })
            .collect();
        positions.sort_unstable();
        positions.dedup();

        Checkpoint {
            sections: positions
                .into_iter()
                .map(|pos| (pos, self.sections[pos].clone()))
                .collect(),
        }
    }

    /// Put the saved sections back and rebuild their owner entries
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        // Drop every current owner first; a component may have moved between
        // two saved sections
        for (pos, _) in &checkpoint.sections {
            for component in self.sections[*pos].components() {
                self.owners.remove(component.name());
            }
        }

        for (pos, saved) in checkpoint.sections {
            for component in saved.components() {
                self.owners
                    .insert(component.name().to_string(), saved.name().to_string());
            }
            self.sections[pos] = saved;
        }
    }

    pub(crate) fn push_section(&mut self, section: Section) -> EditorResult<&Section> {
        if self.sections_by_name.contains_key(section.name()) {
            return Err(EditorError::DuplicateName(section.name().to_string()));
        }

        let mut seen = Vec::with_capacity(section.len());
        for component in section.components() {
            let name = component.name();
            if self.owners.contains_key(name) || seen.contains(&name) {
                return Err(EditorError::DuplicateName(name.to_string()));
            }
            seen.push(name);
        }

        for component in section.components() {
            self.owners
                .insert(component.name().to_string(), section.name().to_string());
        }

        let pos = self.sections.len();
        self.sections_by_name.insert(section.name().to_string(), pos);
        self.sections.push(section);
        Ok(&self.sections[pos])
    }

    fn remove_section(&mut self, name: &str) -> EditorResult<Section> {
        let pos = self
            .sections_by_name
            .remove(name)
            .ok_or_else(|| EditorError::section_not_found(name))?;

        let section = self.sections.remove(pos);
        for component in section.components() {
            self.owners.remove(component.name());
        }

        // Positions after the removed section shift down by one
        for later in self.sections_by_name.values_mut() {
            if *later > pos {
                *later -= 1;
            }
        }

        Ok(section)
    }
}

/// Result of a transaction, undo or redo that changed the document
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    /// New document version
    pub version: u64,

    /// Log cursor after the change
    pub at: usize,

    /// Cursor/selection notifications, in the order the actions produced them
    pub selection: Vec<SelectionChange>,
}

/// Editable sectioned document
#[derive(Debug)]
pub struct Document {
    tree: DocumentTree,
    log: OperationLog,
    registry: VariantRegistry,
    config: EditorConfig,

    /// Increments on each successful transact/undo/redo
    version: u64,
}

impl Document {
    /// Empty document with the built-in variants and default config
    pub fn new() -> Self {
        Self::with_registry(VariantRegistry::builtin(), EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::with_registry(VariantRegistry::builtin(), config)
    }

    pub fn with_registry(registry: VariantRegistry, config: EditorConfig) -> Self {
        Self {
            tree: DocumentTree::default(),
            log: OperationLog::with_max_levels(config.max_history),
            registry,
            config,
            version: 0,
        }
    }

    /// Rebuild a document from a snapshot using the built-in variants
    pub fn from_model(model: &DocumentModel) -> EditorResult<Self> {
        Self::from_model_with(model, VariantRegistry::builtin(), EditorConfig::default())
    }

    /// Rebuild a document from a snapshot; each component goes through `registry`
    pub fn from_model_with(
        model: &DocumentModel,
        registry: VariantRegistry,
        config: EditorConfig,
    ) -> EditorResult<Self> {
        let mut doc = Self::with_registry(registry, config);

        for section_model in &model.sections {
            let components = section_model
                .components
                .iter()
                .map(|c| {
                    let config =
                        ComponentConfig::new(c.name.clone()).with_attrs(c.fields.clone());
                    doc.registry.create(&c.variant_kind, config)
                })
                .collect::<EditorResult<Vec<_>>>()?;

            doc.insert_section(Section::with_components(
                section_model.name.clone(),
                components,
            ))?;
        }

        info!(sections = model.sections.len(), "Loaded document from snapshot");
        Ok(doc)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    pub fn history(&self) -> &OperationLog {
        &self.log
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.tree.sections.iter()
    }

    /// Append a section (not logged)
    ///
    /// A section without components first receives one default component,
    /// named after the section.
    pub fn insert_section(&mut self, mut section: Section) -> EditorResult<&Section> {
        if section.is_empty() {
            let name = self.default_component_name(section.name());
            let component = self
                .registry
                .create(&self.config.default_variant, ComponentConfig::new(name))?;
            section.insert_component_at(component, 0)?;
        }

        debug!(section = %section.name(), components = section.len(), "Inserting section");
        self.tree.push_section(section)
    }

    /// Remove a section by name (not logged)
    pub fn remove_section(&mut self, name: &str) -> EditorResult<Section> {
        let section = self.tree.remove_section(name)?;
        debug!(section = %name, "Removed section");
        Ok(section)
    }

    /// Insert a component into `section` at `index` (not logged)
    pub fn insert_component(
        &mut self,
        component: Box<dyn Component>,
        section: &str,
        index: usize,
    ) -> EditorResult<()> {
        self.tree.insert_component(section, component, index)
    }

    pub fn get_section_by_name(&self, name: &str) -> EditorResult<&Section> {
        self.tree.section(name)
    }

    pub fn get_component_by_name(&self, name: &str) -> EditorResult<&dyn Component> {
        self.tree.component(name)
    }

    /// Name of the section that owns `component`
    pub fn section_of(&self, component: &str) -> EditorResult<&str> {
        self.tree.owner_of(component)
    }

    pub fn to_model(&self) -> DocumentModel {
        DocumentModel {
            sections: self.tree.sections.iter().map(Section::to_model).collect(),
        }
    }

    /// Apply a transaction and record it, discarding any redo tail
    pub fn transact(&mut self, transaction: Transaction) -> EditorResult<ApplyResult> {
        let selection = self.stage(Direction::Forward, &transaction)?;

        let operations = transaction.len();
        let discarded = self.log.record(transaction);
        self.version += 1;

        info!(
            operations,
            discarded,
            at = self.log.at(),
            len = self.log.len(),
            "Transaction applied"
        );
        Ok(self.result(selection))
    }

    /// Revert the most recently applied transaction; `None` at origin
    pub fn undo(&mut self) -> EditorResult<Option<ApplyResult>> {
        let Some(transaction) = self.log.last_applied().cloned() else {
            debug!("Nothing to undo");
            return Ok(None);
        };

        let selection = self.stage(Direction::Inverse, &transaction)?;
        self.log.retreat();
        self.version += 1;

        info!(at = self.log.at(), len = self.log.len(), "Undo");
        Ok(Some(self.result(selection)))
    }

    /// Re-apply the next redoable transaction; `None` at head
    pub fn redo(&mut self) -> EditorResult<Option<ApplyResult>> {
        let Some(transaction) = self.log.next_redo().cloned() else {
            debug!("Nothing to redo");
            return Ok(None);
        };

        let selection = self.stage(Direction::Forward, &transaction)?;
        self.log.advance();
        self.version += 1;

        info!(at = self.log.at(), len = self.log.len(), "Redo");
        Ok(Some(self.result(selection)))
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Run `transaction` in place, restoring the touched sections on failure
    fn stage(
        &mut self,
        direction: Direction,
        transaction: &Transaction,
    ) -> EditorResult<Vec<SelectionChange>> {
        let checkpoint = self.tree.checkpoint(
            transaction
                .operations()
                .iter()
                .map(|operation| match direction {
                    Direction::Forward => &operation.forward,
                    Direction::Inverse => &operation.inverse,
                }),
        );

        let applied = Executor::new(&mut self.tree, &self.registry).apply(direction, transaction);
        match applied {
            Ok(selection) => Ok(selection),
            Err(err) => {
                warn!(
                    ?direction,
                    error = %err,
                    restored = checkpoint.sections.len(),
                    "Transaction rejected"
                );
                self.tree.restore(checkpoint);
                Err(err)
            }
        }
    }

    fn result(&self, selection: Vec<SelectionChange>) -> ApplyResult {
        ApplyResult {
            version: self.version,
            at: self.log.at(),
            selection,
        }
    }

    fn default_component_name(&self, section: &str) -> String {
        (0..)
            .map(|n| format!("{section}-{n}"))
            .find(|name| !self.tree.contains_component(name))
            .unwrap_or_else(|| section.to_string())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{MediaEmbed, Paragraph};
    use crate::ops::Operation;

    fn paragraph(name: &str) -> Box<dyn Component> {
        Box::new(Paragraph::new(name))
    }

    #[test]
    fn test_create_document() {
        let doc = Document::new();
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.sections().count(), 0);
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_empty_section_gets_default_component() {
        let mut doc = Document::new();
        let section = doc.insert_section(Section::new("s1")).unwrap();

        assert_eq!(section.len(), 1);
        let first = section.components().next().unwrap();
        assert_eq!(first.variant_kind(), "Paragraph");
        assert_eq!(first.name(), "s1-0");
        assert_eq!(doc.section_of("s1-0").unwrap(), "s1");
    }

    #[test]
    fn test_default_variant_comes_from_config() {
        let config = EditorConfig {
            default_variant: MediaEmbed::FIGURE.to_string(),
            ..EditorConfig::default()
        };
        let mut doc = Document::with_config(config);
        doc.insert_section(Section::new("s1")).unwrap();

        assert_eq!(
            doc.get_component_by_name("s1-0").unwrap().variant_kind(),
            "Figure"
        );
    }

    #[test]
    fn test_unregistered_default_variant_fails() {
        let mut doc = Document::with_registry(VariantRegistry::new(), EditorConfig::default());
        let err = doc.insert_section(Section::new("s1")).unwrap_err();
        assert_eq!(err, EditorError::UnknownVariant("Paragraph".to_string()));
        assert!(doc.get_section_by_name("s1").is_err());
    }

    #[test]
    fn test_section_names_are_unique() {
        let mut doc = Document::new();
        doc.insert_section(Section::new("s1")).unwrap();
        let err = doc.insert_section(Section::new("s1")).unwrap_err();
        assert_eq!(err, EditorError::DuplicateName("s1".to_string()));
    }

    #[test]
    fn test_component_names_are_unique() {
        let mut doc = Document::new();
        doc.insert_section(Section::with_components("s1", vec![paragraph("c1")]))
            .unwrap();

        let err = doc
            .insert_section(Section::with_components("s2", vec![paragraph("c1")]))
            .unwrap_err();
        assert_eq!(err, EditorError::DuplicateName("c1".to_string()));

        let err = doc
            .insert_section(Section::with_components(
                "s3",
                vec![paragraph("x"), paragraph("x")],
            ))
            .unwrap_err();
        assert_eq!(err, EditorError::DuplicateName("x".to_string()));

        assert!(doc.insert_component(paragraph("c1"), "s1", 0).is_err());
        assert_eq!(doc.sections().count(), 1);
    }

    #[test]
    fn test_lookup_miss_is_not_found() {
        let doc = Document::new();
        assert!(doc.get_component_by_name("nope").unwrap_err().is_not_found());
        assert!(doc.get_section_by_name("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_section_updates_index() {
        let mut doc = Document::new();
        doc.insert_section(Section::with_components("a", vec![paragraph("a1")]))
            .unwrap();
        doc.insert_section(Section::with_components("b", vec![paragraph("b1")]))
            .unwrap();
        doc.insert_section(Section::with_components("c", vec![paragraph("c1")]))
            .unwrap();

        let removed = doc.remove_section("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert!(doc.get_component_by_name("a1").is_err());

        // Later sections are still reachable after positions shift
        assert_eq!(doc.get_section_by_name("c").unwrap().name(), "c");
        assert_eq!(doc.get_component_by_name("c1").unwrap().name(), "c1");
        assert!(doc.remove_section("a").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_section_is_not_logged() {
        let mut doc = Document::new();
        doc.insert_section(Section::new("s1")).unwrap();
        doc.remove_section("s1").unwrap();
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_insert_component_with_explicit_target() {
        let mut doc = Document::new();
        doc.insert_section(Section::new("s1")).unwrap();
        doc.insert_component(paragraph("c1"), "s1", 0).unwrap();

        let names: Vec<&str> = doc
            .get_section_by_name("s1")
            .unwrap()
            .components()
            .map(|c| c.name())
            .collect();
        assert_eq!(names, vec!["c1", "s1-0"]);

        let err = doc.insert_component(paragraph("c2"), "s1", 9).unwrap_err();
        assert_eq!(err, EditorError::IndexOutOfRange { index: 9, len: 2 });
        assert!(doc.get_component_by_name("c2").is_err());
    }

    #[test]
    fn test_transact_increments_version() {
        let mut doc = Document::new();
        doc.insert_section(Section::with_components("s1", vec![paragraph("c1")]))
            .unwrap();

        let result = doc
            .transact(Transaction::single(Operation::insert_chars("c1", 0, "Hi")))
            .unwrap();
        assert_eq!(result.version, 1);
        assert_eq!(result.at, 1);
        assert_eq!(doc.get_component_by_name("c1").unwrap().text(), Some("Hi"));
    }

    #[test]
    fn test_rejected_transaction_leaves_version() {
        let mut doc = Document::new();
        let err = doc
            .transact(Transaction::single(Operation::insert_chars("ghost", 0, "x")))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(doc.version(), 0);
        assert!(doc.history().is_empty());
    }

    #[test]
    fn test_default_name_skips_taken_names() {
        let mut doc = Document::new();
        doc.insert_section(Section::with_components("s0", vec![paragraph("s1-0")]))
            .unwrap();
        doc.insert_section(Section::new("s1")).unwrap();
        assert_eq!(doc.section_of("s1-1").unwrap(), "s1");
    }
}

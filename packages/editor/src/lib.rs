//! # Folio Editor
//!
//! Document editing model: ordered sections of named, polymorphic
//! components, changed only through a reversible operation log.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ session: Document + SelectionService        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: sections, name index, history     │
//! │  - transact / undo / redo (all-or-nothing)  │
//! │  - snapshot to/from DocumentModel           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ executor: ActionSpec → component edits      │
//! │  - registry builds inserted components      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Operations carry their inverse**: the executor never computes one
//! 2. **Names are unique**: lookup is by name through an index, misses are errors
//! 3. **Transactions are atomic**: a failing action rejects the whole transaction
//! 4. **New edits destroy the redo tail**
//!
//! ## Usage
//!
//! ```rust
//! use folio_editor::{Document, Operation, Section, Transaction};
//!
//! let mut doc = Document::new();
//! doc.insert_section(Section::new("s1"))?;
//!
//! doc.transact(Transaction::single(Operation::insert_component(
//!     "s1", "c1", "Paragraph", 0,
//! )))?;
//! doc.transact(Transaction::single(Operation::insert_chars("c1", 0, "Hi")))?;
//! assert_eq!(doc.get_component_by_name("c1")?.text(), Some("Hi"));
//!
//! doc.undo()?;
//! doc.undo()?;
//! assert!(doc.get_component_by_name("c1").is_err());
//! # Ok::<(), folio_editor::EditorError>(())
//! ```

mod component;
mod config;
mod document;
mod errors;
mod executor;
mod history;
mod model;
mod ops;
mod registry;
mod section;
mod selection;
mod session;

pub use component::{Component, FormatRange, MediaEmbed, Paragraph};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use document::{ApplyResult, Document};
pub use errors::{ConfigError, EditorError, EditorResult, EntityKind};
pub use history::OperationLog;
pub use model::{ComponentModel, DocumentModel, SectionModel};
pub use ops::{ActionSpec, Operation, Transaction};
pub use registry::{ComponentConfig, ComponentFactory, VariantRegistry};
pub use section::Section;
pub use selection::{CursorPosition, RecordedSelection, SelectionChange, SelectionService};
pub use session::EditSession;

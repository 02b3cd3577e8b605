//! # Components
//!
//! A component is a named, mutable content unit inside a section. The
//! executor only ever talks to the [`Component`] capability surface; the
//! concrete variants below are what the built-in registry constructs.
//!
//! Character indices count Unicode scalar values, not bytes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{EditorError, EditorResult};
use crate::model::ComponentModel;
use crate::registry::ComponentConfig;

/// Capability surface shared by every component variant
///
/// Variants without a text buffer keep the default implementations, which
/// reject the edit with [`EditorError::UnsupportedEdit`].
pub trait Component: fmt::Debug + Send + Sync {
    /// Unique name within the owning document
    fn name(&self) -> &str;

    /// Registry key this component was built from
    fn variant_kind(&self) -> &str;

    /// Current text, for variants that hold one
    fn text(&self) -> Option<&str> {
        None
    }

    fn insert_characters_at(&mut self, _text: &str, _index: usize) -> EditorResult<()> {
        Err(unsupported(self.name(), "insertCharactersAt"))
    }

    fn remove_characters_at(&mut self, _index: usize, _count: usize) -> EditorResult<()> {
        Err(unsupported(self.name(), "removeCharactersAt"))
    }

    fn set_text(&mut self, _value: &str) -> EditorResult<()> {
        Err(unsupported(self.name(), "setText"))
    }

    fn apply_formats(&mut self, _ranges: &[FormatRange]) -> EditorResult<()> {
        Err(unsupported(self.name(), "applyFormats"))
    }

    /// Snapshot of this component
    fn to_model(&self) -> ComponentModel;

    /// Clone behind the trait object (used when staging a transaction)
    fn box_clone(&self) -> Box<dyn Component>;
}

impl Clone for Box<dyn Component> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

fn unsupported(component: &str, edit: &'static str) -> EditorError {
    EditorError::UnsupportedEdit {
        component: component.to_string(),
        edit,
    }
}

/// A formatting run over `[index, index + length)`
///
/// Applying a range whose span already exists merges attributes into it;
/// a `null` attribute value clears that attribute, which is how inverse
/// operations remove formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatRange {
    pub index: usize,
    pub length: usize,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl FormatRange {
    pub fn new(index: usize, length: usize) -> Self {
        Self {
            index,
            length,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn end(&self) -> usize {
        self.index.saturating_add(self.length)
    }

    /// End offset, or `IndexOutOfRange` if the range does not fit in `len`
    fn checked_end(&self, len: usize) -> EditorResult<usize> {
        self.index
            .checked_add(self.length)
            .filter(|end| *end <= len)
            .ok_or(EditorError::IndexOutOfRange {
                index: self.end(),
                len,
            })
    }
}

/// Snapshot keys owned by [`ComponentModel`] itself
const RESERVED_ATTRS: [&str; 2] = ["name", "variantKind"];

fn check_reserved_attrs(attrs: &Map<String, Value>) -> EditorResult<()> {
    match RESERVED_ATTRS.iter().find(|key| attrs.contains_key(**key)) {
        Some(key) => Err(EditorError::InvalidAction(format!(
            "attribute `{key}` is reserved"
        ))),
        None => Ok(()),
    }
}

/// Plain-text paragraph with formatting ranges (the default variant)
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    name: String,
    text: String,
    formats: Vec<FormatRange>,
}

impl Paragraph {
    pub const KIND: &'static str = "Paragraph";

    pub fn new(name: impl Into<String>) -> Self {
        Self::with_text(name, "")
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            formats: Vec::new(),
        }
    }

    /// Build from factory config; `text` and `formats` attrs seed the content
    pub fn from_config(config: ComponentConfig) -> EditorResult<Self> {
        let ComponentConfig { name, attrs } = config;
        check_reserved_attrs(&attrs)?;

        let text = match attrs.get("text") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                return Err(EditorError::InvalidAction(format!(
                    "Paragraph text must be a string, got {other}"
                )))
            }
        };

        let mut paragraph = Self::with_text(name, text);

        if let Some(formats) = attrs.get("formats") {
            let ranges: Vec<FormatRange> = serde_json::from_value(formats.clone())
                .map_err(|e| EditorError::InvalidAction(format!("Invalid formats: {e}")))?;
            paragraph.apply_formats(&ranges)?;
        }

        Ok(paragraph)
    }

    pub fn formats(&self) -> &[FormatRange] {
        &self.formats
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }

    fn shift_formats_for_insert(&mut self, index: usize, inserted: usize) {
        for range in &mut self.formats {
            if range.index >= index {
                range.index += inserted;
            } else if index < range.end() {
                range.length += inserted;
            }
        }
    }

    fn shift_formats_for_remove(&mut self, index: usize, count: usize) {
        let removed_end = index + count;
        let clamp = |pos: usize| {
            if pos >= removed_end {
                pos - count
            } else if pos > index {
                index
            } else {
                pos
            }
        };

        self.formats.retain_mut(|range| {
            let start = clamp(range.index);
            let end = clamp(range.end());
            range.index = start;
            range.length = end - start;
            range.length > 0
        });
    }

    fn merge_format(&mut self, range: &FormatRange) {
        let existing = self
            .formats
            .iter()
            .position(|r| r.index == range.index && r.length == range.length);

        let target = match existing {
            Some(pos) => &mut self.formats[pos],
            None => {
                self.formats.push(FormatRange::new(range.index, range.length));
                let last = self.formats.len() - 1;
                &mut self.formats[last]
            }
        };

        for (key, value) in &range.attributes {
            if value.is_null() {
                target.attributes.remove(key);
            } else {
                target.attributes.insert(key.clone(), value.clone());
            }
        }

        self.formats.retain(|r| !r.attributes.is_empty());
        self.formats.sort_by_key(|r| (r.index, r.length));
    }
}

impl Component for Paragraph {
    fn name(&self) -> &str {
        &self.name
    }

    fn variant_kind(&self) -> &str {
        Self::KIND
    }

    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn insert_characters_at(&mut self, text: &str, index: usize) -> EditorResult<()> {
        let len = self.char_len();
        if index > len {
            return Err(EditorError::IndexOutOfRange { index, len });
        }

        let offset = self.byte_offset(index);
        self.text.insert_str(offset, text);
        self.shift_formats_for_insert(index, text.chars().count());
        Ok(())
    }

    fn remove_characters_at(&mut self, index: usize, count: usize) -> EditorResult<()> {
        let len = self.char_len();
        let end = index
            .checked_add(count)
            .filter(|end| *end <= len)
            .ok_or(EditorError::IndexOutOfRange {
                index: index.saturating_add(count),
                len,
            })?;

        let start_byte = self.byte_offset(index);
        let end_byte = self.byte_offset(end);
        self.text.replace_range(start_byte..end_byte, "");
        self.shift_formats_for_remove(index, count);
        Ok(())
    }

    fn set_text(&mut self, value: &str) -> EditorResult<()> {
        self.text = value.to_string();
        self.formats.clear();
        Ok(())
    }

    fn apply_formats(&mut self, ranges: &[FormatRange]) -> EditorResult<()> {
        let len = self.char_len();
        // Validate all ranges before touching anything
        for range in ranges {
            range.checked_end(len)?;
        }

        for range in ranges {
            self.merge_format(range);
        }
        Ok(())
    }

    fn to_model(&self) -> ComponentModel {
        let mut fields = Map::new();
        fields.insert("text".to_string(), Value::String(self.text.clone()));
        if !self.formats.is_empty() {
            fields.insert(
                "formats".to_string(),
                serde_json::to_value(&self.formats).unwrap_or(Value::Null),
            );
        }

        ComponentModel {
            name: self.name.clone(),
            variant_kind: Self::KIND.to_string(),
            fields,
        }
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}

/// Embedded media (figure, video, image search result)
///
/// Media carries attributes only; it offers no text or formatting edits.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEmbed {
    name: String,
    kind: String,
    attrs: Map<String, Value>,
}

impl MediaEmbed {
    pub const FIGURE: &'static str = "Figure";
    pub const VIDEO: &'static str = "Video";
    pub const IMAGE_SEARCH_RESULT: &'static str = "ImageSearchResult";

    /// Build from factory config; attrs become the snapshot fields
    pub fn new(kind: impl Into<String>, config: ComponentConfig) -> EditorResult<Self> {
        check_reserved_attrs(&config.attrs)?;

        Ok(Self {
            name: config.name,
            kind: kind.into(),
            attrs: config.attrs,
        })
    }

    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }
}

impl Component for MediaEmbed {
    fn name(&self) -> &str {
        &self.name
    }

    fn variant_kind(&self) -> &str {
        &self.kind
    }

    fn to_model(&self) -> ComponentModel {
        ComponentModel {
            name: self.name.clone(),
            variant_kind: self.kind.clone(),
            fields: self.attrs.clone(),
        }
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}

//! # Document Snapshot
//!
//! Plain nested structure mirroring sections → components. This is what
//! `Document::to_model` produces and `Document::from_model` consumes, and
//! it is the structural-equality yardstick used by the undo/redo tests.
//!
//! ```text
//! Document  := { sections: [Section] }
//! Section   := { name, components: [Component] }
//! Component := { name, variantKind, ...variant-specific fields }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    #[serde(default)]
    pub sections: Vec<SectionModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionModel {
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentModel {
    pub name: String,
    pub variant_kind: String,

    /// Variant payload; doubles as the factory config when the snapshot is loaded
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DocumentModel {
    /// Find a component snapshot by name
    pub fn component(&self, name: &str) -> Option<&ComponentModel> {
        self.sections
            .iter()
            .flat_map(|section| section.components.iter())
            .find(|component| component.name == name)
    }

    /// Find a section snapshot by name
    pub fn section(&self, name: &str) -> Option<&SectionModel> {
        self.sections.iter().find(|section| section.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_fields_are_flattened() {
        let json = json!({
            "sections": [{
                "name": "intro",
                "components": [
                    { "name": "p1", "variantKind": "Paragraph", "text": "Hello" },
                    { "name": "v1", "variantKind": "Video", "src": "clip.mp4" }
                ]
            }]
        });

        let model: DocumentModel = serde_json::from_value(json.clone()).unwrap();
        let p1 = model.component("p1").unwrap();
        assert_eq!(p1.variant_kind, "Paragraph");
        assert_eq!(p1.fields.get("text"), Some(&json!("Hello")));
        assert_eq!(model.section("intro").unwrap().components.len(), 2);

        assert_eq!(serde_json::to_value(&model).unwrap(), json);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let model: DocumentModel = serde_json::from_str("{}").unwrap();
        assert!(model.sections.is_empty());
        assert!(model.component("anything").is_none());
    }
}

//! # Component Variant Registry
//!
//! Maps a variant kind (e.g. `"Paragraph"`, `"Video"`) to a factory that
//! builds a component from a [`ComponentConfig`]. The executor resolves
//! `insertComponent` actions through here, so new variants plug in without
//! touching the core.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::component::{Component, MediaEmbed, Paragraph};
use crate::errors::{EditorError, EditorResult};

/// Configuration handed to a variant factory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentConfig {
    pub name: String,
    pub attrs: Map<String, Value>,
}

impl ComponentConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Map::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Map<String, Value>) -> Self {
        self.attrs = attrs;
        self
    }
}

pub type ComponentFactory =
    Box<dyn Fn(ComponentConfig) -> EditorResult<Box<dyn Component>> + Send + Sync>;

#[derive(Default)]
pub struct VariantRegistry {
    factories: HashMap<String, ComponentFactory>,
}

impl VariantRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the paragraph and media variants
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register(Paragraph::KIND, |config| {
            Ok(Box::new(Paragraph::from_config(config)?) as Box<dyn Component>)
        });

        for kind in [
            MediaEmbed::FIGURE,
            MediaEmbed::VIDEO,
            MediaEmbed::IMAGE_SEARCH_RESULT,
        ] {
            registry.register(kind, move |config| {
                Ok(Box::new(MediaEmbed::new(kind, config)?) as Box<dyn Component>)
            });
        }

        registry
    }

    /// Register (or replace) the factory for `kind`
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(ComponentConfig) -> EditorResult<Box<dyn Component>> + Send + Sync + 'static,
    {
        let kind = kind.into();
        debug!(variant = %kind, "Registering component variant");
        self.factories.insert(kind, Box::new(factory));
    }

    /// Build a component of `kind`
    pub fn create(&self, kind: &str, config: ComponentConfig) -> EditorResult<Box<dyn Component>> {
        let Some(factory) = self.factories.get(kind) else {
            warn!(variant = %kind, "Unknown component variant");
            return Err(EditorError::UnknownVariant(kind.to_string()));
        };

        let component = factory(config)?;
        debug!(variant = %kind, name = %component.name(), "Created component");
        Ok(component)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_kinds() {
        let registry = VariantRegistry::builtin();
        assert_eq!(
            registry.kinds(),
            vec!["Figure", "ImageSearchResult", "Paragraph", "Video"]
        );
    }

    #[test]
    fn test_create_paragraph() {
        let registry = VariantRegistry::builtin();
        let component = registry
            .create("Paragraph", ComponentConfig::new("p1"))
            .unwrap();

        assert_eq!(component.name(), "p1");
        assert_eq!(component.variant_kind(), "Paragraph");
        assert_eq!(component.text(), Some(""));
    }

    #[test]
    fn test_create_media_keeps_attrs() {
        let registry = VariantRegistry::builtin();
        let mut attrs = Map::new();
        attrs.insert("src".into(), json!("cat.png"));

        let component = registry
            .create("Figure", ComponentConfig::new("f1").with_attrs(attrs))
            .unwrap();

        assert_eq!(component.variant_kind(), "Figure");
        assert_eq!(component.to_model().fields.get("src"), Some(&json!("cat.png")));
    }

    #[test]
    fn test_unknown_variant() {
        let registry = VariantRegistry::new();
        let err = registry
            .create("Paragraph", ComponentConfig::new("p1"))
            .unwrap_err();
        assert_eq!(err, EditorError::UnknownVariant("Paragraph".to_string()));
    }

    #[test]
    fn test_register_replaces_factory() {
        let mut registry = VariantRegistry::builtin();
        registry.register("Paragraph", |config| {
            Ok(Box::new(Paragraph::with_text(config.name, "seeded")) as Box<dyn Component>)
        });

        let component = registry
            .create("Paragraph", ComponentConfig::new("p1"))
            .unwrap();
        assert_eq!(component.text(), Some("seeded"));
        assert!(registry.contains("Video"));
    }
}

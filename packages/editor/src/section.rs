//! Ordered container of components.

use crate::component::Component;
use crate::errors::{EditorError, EditorResult};
use crate::model::SectionModel;

#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    components: Vec<Box<dyn Component>>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    pub fn with_components(name: impl Into<String>, components: Vec<Box<dyn Component>>) -> Self {
        Self {
            name: name.into(),
            components,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|c| c.as_ref())
    }

    pub fn component(&self, name: &str) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    pub fn component_mut(&mut self, name: &str) -> Option<&mut dyn Component> {
        let component = self.components.iter_mut().find(|c| c.name() == name)?;
        Some(component.as_mut())
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.name() == name)
    }

    /// Insert at `index`, which must lie in `[0, len]`
    pub fn insert_component_at(
        &mut self,
        component: Box<dyn Component>,
        index: usize,
    ) -> EditorResult<()> {
        if index > self.components.len() {
            return Err(EditorError::IndexOutOfRange {
                index,
                len: self.components.len(),
            });
        }

        self.components.insert(index, component);
        Ok(())
    }

    /// Remove the component with this name and hand it back
    pub fn remove_component(&mut self, name: &str) -> EditorResult<Box<dyn Component>> {
        let pos = self
            .position_of(name)
            .ok_or_else(|| EditorError::component_not_found(name))?;
        Ok(self.components.remove(pos))
    }

    pub fn to_model(&self) -> SectionModel {
        SectionModel {
            name: self.name.clone(),
            components: self.components.iter().map(|c| c.to_model()).collect(),
        }
    }
}

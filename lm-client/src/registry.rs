use crate::model::LanguageModel;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Criteria for picking a model; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelector {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
}

impl ModelSelector {
    pub fn new(vendor: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            vendor: Some(vendor.into()),
            family: Some(family.into()),
        }
    }

    fn matches(&self, model: &dyn LanguageModel) -> bool {
        let info = model.info();
        self.vendor.as_ref().is_none_or(|v| *v == info.vendor)
            && self.family.as_ref().is_none_or(|f| *f == info.family)
    }
}

/// Models available to the chat participant, in registration order.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: Vec<Arc<dyn LanguageModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: Arc<dyn LanguageModel>) {
        debug!("registered language model {}", model.info().id);
        self.models.push(model);
    }

    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.register(model);
        self
    }

    /// First registered model matching every field of `selector`.
    pub fn select(&self, selector: &ModelSelector) -> Option<Arc<dyn LanguageModel>> {
        let selected = self
            .models
            .iter()
            .find(|model| selector.matches(model.as_ref()))
            .cloned();
        if selected.is_none() {
            debug!("no language model matches {selector:?}");
        }
        selected
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.models.iter().map(|m| &m.info().id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeModel;
    use pretty_assertions::assert_eq;

    fn registry() -> ModelRegistry {
        ModelRegistry::new()
            .with_model(Arc::new(FakeModel::with_identity("copilot", "gpt-4o")))
            .with_model(Arc::new(FakeModel::with_identity("copilot", "gpt-3.5-turbo")))
            .with_model(Arc::new(FakeModel::with_identity("local", "llama")))
    }

    #[test]
    fn selects_first_full_match() {
        let model = registry()
            .select(&ModelSelector::new("copilot", "gpt-3.5-turbo"))
            .unwrap();
        assert_eq!(model.info().family, "gpt-3.5-turbo");
    }

    #[test]
    fn empty_selector_picks_first_model() {
        let model = registry().select(&ModelSelector::default()).unwrap();
        assert_eq!(model.info().family, "gpt-4o");
    }

    #[test]
    fn vendor_only_selector() {
        let selector = ModelSelector {
            vendor: Some("local".to_string()),
            family: None,
        };
        assert_eq!(registry().select(&selector).unwrap().info().family, "llama");
    }

    #[test]
    fn no_match_is_none() {
        assert!(
            registry()
                .select(&ModelSelector::new("copilot", "o1-mini"))
                .is_none()
        );
        assert!(
            ModelRegistry::new()
                .select(&ModelSelector::default())
                .is_none()
        );
    }
}

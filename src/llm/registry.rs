//! Model registry for the configured LLM provider

use super::{GeminiModel, GeminiService, LlmService, LoggingService};
use std::collections::HashMap;
use std::sync::Arc;

const PREFERRED_DEFAULT: &str = "gemini-2.5-flash";

/// Configuration for LLM providers
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub gemini_api_key: Option<String>,
    /// Gateway URL that authenticates on our behalf
    pub gateway: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok(),
            gateway: std::env::var("LLM_GATEWAY").ok(),
            default_model: std::env::var("DEFAULT_MODEL").ok(),
        }
    }
}

/// Registry of available LLM models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: String,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        let mut services: HashMap<String, Arc<dyn LlmService>> = HashMap::new();

        if let Some(api_key) = Self::api_key(config) {
            for model in GeminiModel::ALL {
                match GeminiService::new(api_key.clone(), model, config.gateway.as_deref()) {
                    Ok(service) => {
                        services.insert(
                            model.model_id().to_string(),
                            Arc::new(LoggingService::new(Arc::new(service))),
                        );
                    }
                    Err(e) => {
                        tracing::warn!(model = model.model_id(), error = %e, "Skipping model");
                    }
                }
            }
        }

        let default_model = config
            .default_model
            .clone()
            .filter(|id| services.contains_key(id))
            .unwrap_or_else(|| PREFERRED_DEFAULT.to_string());

        Self {
            services,
            default_model,
        }
    }

    /// In gateway mode the key is "implicit"; otherwise a non-empty key is required
    fn api_key(config: &LlmConfig) -> Option<String> {
        if config.gateway.is_some() {
            return Some("implicit".to_string());
        }
        config
            .gemini_api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .cloned()
    }

    /// Get a model by ID
    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// Get the default model
    pub fn default(&self) -> Option<Arc<dyn LlmService>> {
        self.get(&self.default_model)
    }

    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    /// List all available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }

    pub fn has_models(&self) -> bool {
        !self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_api_keys_no_models() {
        let registry = ModelRegistry::new(&LlmConfig::default());
        assert!(!registry.has_models());
        assert!(registry.default().is_none());
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let config = LlmConfig {
            gemini_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!ModelRegistry::new(&config).has_models());
    }

    #[test]
    fn test_key_enables_all_gemini_models() {
        let config = LlmConfig {
            gemini_api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(
            registry.available_models(),
            vec!["gemini-2.0-flash", "gemini-2.5-flash", "gemini-2.5-pro"]
        );
        assert_eq!(registry.default_model_id(), "gemini-2.5-flash");
        assert!(registry.default().is_some());
    }

    #[test]
    fn test_gateway_without_key() {
        let config = LlmConfig {
            gateway: Some("https://example.com".to_string()),
            ..Default::default()
        };
        assert!(ModelRegistry::new(&config).get("gemini-2.5-pro").is_some());
    }

    #[test]
    fn test_custom_default_model() {
        let config = LlmConfig {
            gemini_api_key: Some("test-key".to_string()),
            default_model: Some("gemini-2.5-pro".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(registry.default_model_id(), "gemini-2.5-pro");
        assert_eq!(registry.default().unwrap().model_id(), "gemini-2.5-pro");
    }

    #[test]
    fn test_unknown_default_model_falls_back() {
        let config = LlmConfig {
            gemini_api_key: Some("test-key".to_string()),
            default_model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ModelRegistry::new(&config).default_model_id(),
            "gemini-2.5-flash"
        );
    }
}

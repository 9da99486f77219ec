use indexmap::IndexMap;
use serde_json::Value;

/// Construction parameters supplied by the hosting chat runtime.
#[derive(Debug, Clone, Default)]
pub struct HostParams {
    pub locale: Option<String>,
    /// Overrides the default submission endpoint of the widget.
    pub endpoint: Option<String>,
    /// Domain seed data, e.g. the base cost of the property being discussed.
    pub base_cost: Option<f64>,
    pub context: IndexMap<String, Value>,
}

impl HostParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_base_cost(mut self, base_cost: f64) -> Self {
        self.base_cost = Some(base_cost);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }
}

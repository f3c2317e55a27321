//! Storefront configuration.

use std::time::Duration;

/// Configuration for a storefront application.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Store name.
    pub name: String,
    /// Default page title.
    pub default_title: String,
    /// Deadline after which an unanswered cart mutation is treated as
    /// failed and its controls re-enable.
    pub mutation_timeout: Duration,
    /// Maximum quantity a single cart line may carry.
    pub max_quantity_per_line: i64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            name: "Vitrine".to_string(),
            default_title: "Vitrine Store".to_string(),
            mutation_timeout: Duration::from_secs(10),
            max_quantity_per_line: 9999,
        }
    }
}

impl StorefrontConfig {
    /// Create a new configuration with the given store name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the default page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Set the cart mutation deadline.
    pub fn with_mutation_timeout(mut self, timeout: Duration) -> Self {
        self.mutation_timeout = timeout;
        self
    }

    /// Set the per-line quantity cap.
    pub fn with_max_quantity(mut self, max: i64) -> Self {
        self.max_quantity_per_line = max;
        self
    }
}

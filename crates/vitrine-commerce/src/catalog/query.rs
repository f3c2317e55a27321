//! Read-only catalog query interface.

use crate::catalog::product::{Product, SelectedOption};
use crate::error::CommerceError;
use async_trait::async_trait;

/// Catalog query interface the storefront reads product data through.
///
/// Implementations talk to the remote catalog; the core treats them as
/// opaque and side-effect free. Fetch failures are terminal for the
/// current render and are not retried here.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a product by handle, with the given option selection
    /// applied so the backend can mark the selected variant.
    async fn product_by_handle(
        &self,
        handle: &str,
        selected: &[SelectedOption],
    ) -> Result<Option<Product>, CommerceError>;
}

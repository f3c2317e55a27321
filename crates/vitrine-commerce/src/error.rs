//! Commerce error types.

use thiserror::Error;

/// Errors that can occur on the catalog/read side of the storefront.
///
/// A selection with no matching variant is not an error; the selector
/// reports it through its output so the caller can decide between an
/// out-of-stock state and a redirect.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant not found.
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// The catalog backend failed to answer a query. Terminal for the
    /// current render; retry policy belongs to the caller.
    #[error("Catalog query failed: {0}")]
    CatalogFetch(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow in a money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),
}

//! Catalog domain types and variant selection for Vitrine storefronts.
//!
//! This crate provides the read side of a storefront:
//!
//! - **Catalog**: products, variants, bundle composition
//! - **Selection**: mapping chosen option values to a variant, plus the
//!   canonical variant URL and its inverse
//! - **Money**: minor-unit monetary values with checked arithmetic
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_commerce::prelude::*;
//!
//! let selection = select(&product, &chosen);
//! if let Some(variant) = &selection.variant {
//!     let url = variant_url(&product.handle, &variant.selected_options);
//!     // render option affordances from selection.options
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod ids;
pub mod money;
pub mod selection;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::catalog::{
        bundle_components, component_views, is_bundle, BundleComponent, Catalog,
        ComponentVariant, ComponentView, ImageRef, Product, ProductOption, SelectedOption,
        Variant, DEFAULT_VARIANT_TITLE,
    };

    pub use crate::selection::{
        first_variant_url, parse_selected_options, select, select_variant, variant_url,
        OptionDisplay, OptionValueState, VariantSelection,
    };
}

//! Product catalog module.
//!
//! Contains product and variant types, bundle resolution, and the
//! read-only catalog query interface.

mod bundle;
mod product;
mod query;

pub use bundle::{bundle_components, component_views, is_bundle, ComponentView};
pub use product::{
    BundleComponent, ComponentVariant, ImageRef, Product, ProductOption, SelectedOption,
    Variant, DEFAULT_VARIANT_TITLE,
};
pub use query::Catalog;

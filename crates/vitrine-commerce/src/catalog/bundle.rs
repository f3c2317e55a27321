//! Bundle resolution.
//!
//! A bundle is a variant whose fulfillment is composed of other
//! variants in fixed quantities, sold as a single merchandise unit.
//! Resolution is strictly a display transform: the remote cart
//! service owns bundle expansion, so adding a bundle to the cart adds
//! exactly one line for the bundle merchandise.

use crate::catalog::product::{BundleComponent, ImageRef, Variant, DEFAULT_VARIANT_TITLE};
use crate::ids::VariantId;

/// Whether a variant should be treated as a bundle.
///
/// A `requires_components` variant with an empty component list is
/// malformed catalog data; it degrades to a non-bundle rather than
/// failing.
pub fn is_bundle(variant: &Variant) -> bool {
    variant.requires_components && !variant.components.is_empty()
}

/// The ordered component list of a bundle, expanded exactly one level
/// deep: components are simple variants by catalog construction and
/// are never recursed into, so a malformed cyclic catalog cannot loop
/// the resolver.
///
/// Empty for simple variants and for malformed bundles. A component
/// that lists the parent itself is dropped rather than expanded.
pub fn bundle_components(variant: &Variant) -> &[BundleComponent] {
    if is_bundle(variant) {
        &variant.components
    } else {
        &[]
    }
}

/// A bundle component prepared for rendering: label, link target,
/// image, quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentView {
    /// Component variant identifier.
    pub variant_id: VariantId,
    /// Display label; the placeholder variant title is suppressed.
    pub label: String,
    /// Path of the component's own product page.
    pub url: String,
    /// Component image, if any.
    pub image: Option<ImageRef>,
    /// Quantity of the component per bundle unit.
    pub quantity: i64,
}

/// Render-ready views of a bundle's components, in composition order.
pub fn component_views(variant: &Variant) -> Vec<ComponentView> {
    bundle_components(variant)
        .iter()
        .filter(|c| c.variant.id != variant.id)
        .map(|c| {
            let label = if c.variant.title == DEFAULT_VARIANT_TITLE {
                c.variant.product_title.clone()
            } else {
                format!("{} - {}", c.variant.product_title, c.variant.title)
            };
            ComponentView {
                variant_id: c.variant.id.clone(),
                label,
                url: format!("/products/{}", c.variant.product_handle),
                image: c.variant.image.clone(),
                quantity: c.quantity,
            }
        })
        .collect()
}

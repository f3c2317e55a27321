//! Product and variant types.

use crate::ids::{MediaId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Placeholder title the catalog uses for the sole variant of a
/// product that has no real options.
pub const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// A selected option on a variant (e.g., Size: Large).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Option value (e.g., "Large", "Blue").
    pub value: String,
}

impl SelectedOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Reference to a catalog image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRef {
    /// Media identifier, when the catalog assigns one.
    pub id: Option<MediaId>,
    /// URL to the image file.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i32>,
    /// Image height in pixels.
    pub height: Option<i32>,
}

impl ImageRef {
    /// Create an image reference from a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            alt_text: None,
            width: None,
            height: None,
        }
    }
}

/// Denormalized snapshot of a component variant inside a bundle.
///
/// Carries just what the storefront needs to render the component and
/// link to its own product page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentVariant {
    /// Component variant identifier.
    pub id: VariantId,
    /// Variant title (may be the placeholder default title).
    pub title: String,
    /// Title of the component's parent product.
    pub product_title: String,
    /// Handle of the component's parent product.
    pub product_handle: String,
    /// Component image, if any.
    pub image: Option<ImageRef>,
}

/// One entry of a bundle's composition: a component variant and the
/// quantity of it the bundle contains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleComponent {
    /// The component variant.
    pub variant: ComponentVariant,
    /// Fixed quantity of the component per bundle unit.
    pub quantity: i64,
}

/// A product variant (e.g., a size/color combination).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// Variant title (e.g., "Large / Blue").
    pub title: String,
    /// Per-unit price.
    pub price: Money,
    /// Whether the variant can currently be sold.
    pub available_for_sale: bool,
    /// Options that define this variant, in product option order.
    pub selected_options: Vec<SelectedOption>,
    /// Variant image, if any.
    pub image: Option<ImageRef>,
    /// Whether fulfillment is composed of other variants.
    pub requires_components: bool,
    /// Bundle composition, ordered. Non-empty iff this is a
    /// well-formed bundle.
    pub components: Vec<BundleComponent>,
    /// Variants this one is itself grouped under.
    pub group_ids: Vec<VariantId>,
}

impl Variant {
    /// Create a new simple variant.
    pub fn new(id: VariantId, title: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            available_for_sale: true,
            selected_options: Vec::new(),
            image: None,
            requires_components: false,
            components: Vec::new(),
            group_ids: Vec::new(),
        }
    }

    /// Add a selected option to this variant.
    pub fn add_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.selected_options.push(SelectedOption::new(name, value));
    }

    /// Get the value chosen for an option name, case-insensitive on
    /// the name.
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
            .map(|o| o.value.as_str())
    }

    /// Whether the title is the catalog's placeholder default.
    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_VARIANT_TITLE
    }

    /// Title suitable for display, suppressing the placeholder.
    pub fn display_title(&self) -> Option<&str> {
        if self.has_default_title() {
            None
        } else {
            Some(self.title.as_str())
        }
    }
}

/// An option a product offers (e.g., Size with values S/M/L).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductOption {
    /// Option name.
    pub name: String,
    /// Possible values, in catalog order.
    pub values: Vec<String>,
}

impl ProductOption {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL-friendly handle (unique).
    pub handle: String,
    /// Full description.
    pub description: Option<String>,
    /// Option definitions, in catalog order.
    pub options: Vec<ProductOption>,
    /// Variants, in catalog order.
    pub variants: Vec<Variant>,
}

impl Product {
    /// Create a new product with no options or variants.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            handle: handle.into(),
            description: None,
            options: Vec::new(),
            variants: Vec::new(),
        }
    }

    /// The variant shown when no options are chosen: the first
    /// available-for-sale variant, or the first overall.
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }

    /// Look up a variant by ID.
    pub fn variant_by_id(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Whether the product's only variant is the catalog placeholder,
    /// i.e. there is nothing for the shopper to choose.
    pub fn has_only_default_variant(&self) -> bool {
        self.variants.len() == 1
            && self.variants[0].has_default_title()
    }

    /// Whether an option name is defined on this product,
    /// case-insensitive.
    pub fn recognizes_option(&self, name: &str) -> bool {
        self.options
            .iter()
            .any(|o| o.name.eq_ignore_ascii_case(name))
    }
}

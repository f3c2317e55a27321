//! Authoritative cart snapshot types and store.
//!
//! Aggregate cost is a remote concern (tax and discount rules live on
//! the server), so every amount here is taken verbatim from the last
//! confirmed response and never computed locally.

use serde::{Deserialize, Serialize};
use vitrine_commerce::catalog::{ImageRef, SelectedOption};
use vitrine_commerce::selection::variant_url;
use vitrine_commerce::{CartId, LineId, Money, VariantId};

/// Snapshot of the sellable entity a cart line references.
///
/// Denormalized from the variant so a line renders without a catalog
/// round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Merchandise {
    /// Variant identifier.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// Title of the parent product.
    pub product_title: String,
    /// Handle of the parent product.
    pub product_handle: String,
    /// Per-unit price.
    pub price: Money,
    /// Variant image, if any.
    pub image: Option<ImageRef>,
    /// Options that define the variant.
    pub selected_options: Vec<SelectedOption>,
    /// Whether the variant is a bundle. The server expands bundle
    /// fulfillment; the line still counts as one merchandise unit.
    pub requires_components: bool,
}

impl Merchandise {
    /// URL of the variant this merchandise references, for linking a
    /// cart line back to its product page.
    pub fn url(&self) -> String {
        variant_url(&self.product_handle, &self.selected_options)
    }

    /// Whether to badge the line as a bundle.
    pub fn is_bundle(&self) -> bool {
        self.requires_components
    }
}

/// Per-line cost snapshot from the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineCost {
    /// Total for the line (unit price × quantity minus applicable
    /// discounts).
    pub total: Money,
    /// Amount per quantity unit.
    pub unit: Money,
    /// Pre-discount per-unit amount, when the line is discounted.
    pub compare_at_unit: Option<Money>,
}

/// A confirmed cart line.
///
/// The ID is opaque and stays stable across updates to the same
/// merchandise. Quantity zero means removal; such lines never appear
/// in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Opaque stable line identifier.
    pub id: LineId,
    /// The merchandise being purchased.
    pub merchandise: Merchandise,
    /// Quantity, always positive in a snapshot.
    pub quantity: i64,
    /// Cost snapshot from the server.
    pub cost: LineCost,
}

/// A discount code stored on the cart. A code may be stored but not
/// currently applicable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountCode {
    /// The code as entered.
    pub code: String,
    /// Whether the server applied it to the current lines.
    pub applicable: bool,
}

/// Aggregate cost from the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartCost {
    /// Sum of line totals before taxes and duties.
    pub subtotal: Money,
    /// Amount the shopper pays.
    pub total: Money,
    /// Tax portion, when the server reports one.
    pub tax: Option<Money>,
    /// Duty portion, when the server reports one.
    pub duty: Option<Money>,
}

/// A free-form key/value attribute on the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// The authoritative cart as last confirmed by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Cart identifier.
    pub id: CartId,
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
    /// Stored discount codes.
    pub discount_codes: Vec<DiscountCode>,
    /// Aggregate cost.
    pub cost: CartCost,
    /// Customer note.
    pub note: Option<String>,
    /// Free-form attributes.
    pub attributes: Vec<Attribute>,
    /// Opaque checkout handoff token.
    pub checkout_url: Option<String>,
    /// Total quantity across lines, as reported by the server.
    pub total_quantity: i64,
}

impl Cart {
    /// Look up a line by ID.
    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Codes the server currently applies, for display and for
    /// resubmission when one is removed.
    pub fn applicable_codes(&self) -> Vec<&str> {
        self.discount_codes
            .iter()
            .filter(|d| d.applicable)
            .map(|d| d.code.as_str())
            .collect()
    }

    /// Whether the confirmed cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Holds the single authoritative cart snapshot.
///
/// The store exclusively owns the confirmed cart; every confirmed
/// server response replaces it wholesale, never merging fields.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    cart: Option<Cart>,
}

impl SnapshotStore {
    /// Create an empty store (no cart yet).
    pub fn new() -> Self {
        Self { cart: None }
    }

    /// Replace the snapshot with a confirmed server response.
    ///
    /// Zero-quantity lines are filtered on ingest; they are
    /// equivalent to removal and must not linger in the snapshot.
    pub fn replace(&mut self, mut cart: Cart) {
        cart.lines.retain(|l| l.quantity > 0);
        self.cart = Some(cart);
    }

    /// The current snapshot, if any response has been confirmed.
    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// The confirmed cart's identifier, needed to address mutations.
    pub fn cart_id(&self) -> Option<&CartId> {
        self.cart.as_ref().map(|c| &c.id)
    }
}

//! The optimistic projection.
//!
//! A pure derivation over the confirmed snapshot and the live entries
//! of the mutation queue, recomputed on every read. The projector owns
//! no state of its own.

use crate::mutation::{LineUpdate, MutationQueue, MAX_QUANTITY_PER_LINE};
use crate::snapshot::{Cart, DiscountCode, Merchandise};
use vitrine_commerce::{Currency, LineId, Money};

/// A line as the shopper currently sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticLine {
    /// Confirmed line ID; `None` for a provisional line the server has
    /// not acknowledged yet.
    pub id: Option<LineId>,
    /// The merchandise on the line.
    pub merchandise: Merchandise,
    /// Displayed quantity.
    pub quantity: i64,
    /// Line cost: the server's figure when untouched, otherwise a
    /// best-effort unit price × quantity.
    pub cost: Money,
    /// True while an unconfirmed mutation shapes this line; the UI
    /// disables the line's controls to prevent duplicate submission.
    pub is_optimistic: bool,
}

impl OptimisticLine {
    /// The update one quantity-stepper decrease produces. Stops at 1;
    /// removal is always an explicit quantity-zero update. `None`
    /// while the line is provisional or its controls are disabled.
    pub fn decreased(&self) -> Option<LineUpdate> {
        let id = self.id.as_ref()?;
        if self.is_optimistic || self.quantity <= 1 {
            return None;
        }
        Some(LineUpdate::new(id.clone(), self.quantity - 1))
    }

    /// The update one quantity-stepper increase produces, bounded by
    /// `max` (clamped to the hard per-line cap).
    pub fn increased(&self, max: i64) -> Option<LineUpdate> {
        let id = self.id.as_ref()?;
        let max = max.min(MAX_QUANTITY_PER_LINE);
        if self.is_optimistic || self.quantity >= max {
            return None;
        }
        Some(LineUpdate::new(id.clone(), self.quantity + 1))
    }
}

/// The cart view shown before (and after) server confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticCart {
    /// Visible lines: confirmed lines with live overrides applied,
    /// then provisional lines in issuance order.
    pub lines: Vec<OptimisticLine>,
    /// Subtotal; authoritative only when flagged so.
    pub subtotal: Money,
    /// Whether `subtotal` came from the server rather than a local
    /// approximation.
    pub totals_authoritative: bool,
    /// Stored discount codes from the snapshot.
    pub discount_codes: Vec<DiscountCode>,
    /// True while a discount-code submission is unconfirmed; the UI
    /// disables the discount form.
    pub has_pending_discount_update: bool,
    /// Checkout handoff token from the snapshot.
    pub checkout_url: Option<String>,
    /// Customer note from the snapshot.
    pub note: Option<String>,
    /// Empty-state gate: no confirmed lines and no pending add.
    pub is_empty: bool,
    /// Quantity across visible lines.
    pub total_quantity: i64,
}

/// Derive the shopper's view from the snapshot and the queue.
pub fn project(snapshot: Option<&Cart>, queue: &MutationQueue) -> OptimisticCart {
    let currency = snapshot
        .map(|c| c.cost.subtotal.currency)
        .or_else(|| queue.pending_adds().first().map(|a| a.merchandise.price.currency))
        .unwrap_or(Currency::default());

    let mut lines: Vec<OptimisticLine> = Vec::new();
    let mut overridden = false;

    if let Some(cart) = snapshot {
        for line in &cart.lines {
            match queue.live_quantity(&line.id) {
                // Quantity zero removes the line from the projection
                // immediately, before any network response.
                Some(0) => {
                    overridden = true;
                }
                Some(quantity) => {
                    overridden = true;
                    let cost = line
                        .cost
                        .unit
                        .try_multiply(quantity)
                        .unwrap_or(Money::zero(currency));
                    lines.push(OptimisticLine {
                        id: Some(line.id.clone()),
                        merchandise: line.merchandise.clone(),
                        quantity,
                        cost,
                        is_optimistic: true,
                    });
                }
                None => lines.push(OptimisticLine {
                    id: Some(line.id.clone()),
                    merchandise: line.merchandise.clone(),
                    quantity: line.quantity,
                    cost: line.cost.total,
                    is_optimistic: false,
                }),
            }
        }
    }

    // Provisional lines for unconfirmed adds, ordered after existing
    // lines. A bundle add stays one line; the server owns component
    // expansion. An add whose merchandise already appears on a
    // confirmed line is reflected in the snapshot (a later response
    // from the write-serializing server landed first) and must not be
    // synthesized again.
    for add in queue.pending_adds() {
        if add.quantity == 0 {
            continue;
        }
        let reflected = snapshot.map_or(false, |c| {
            c.lines.iter().any(|l| l.merchandise.id == add.merchandise.id)
        });
        if reflected {
            continue;
        }
        overridden = true;
        let cost = add
            .merchandise
            .price
            .try_multiply(add.quantity)
            .unwrap_or(Money::zero(currency));
        lines.push(OptimisticLine {
            id: None,
            merchandise: add.merchandise.clone(),
            quantity: add.quantity,
            cost,
            is_optimistic: true,
        });
    }

    let totals_authoritative = snapshot.is_some() && !overridden;
    let subtotal = if let (true, Some(cart)) = (totals_authoritative, snapshot) {
        cart.cost.subtotal
    } else {
        Money::try_sum(lines.iter().map(|l| &l.cost), currency)
            .unwrap_or(Money::zero(currency))
    };
    let total_quantity = if let (true, Some(cart)) = (totals_authoritative, snapshot) {
        cart.total_quantity
    } else {
        lines.iter().map(|l| l.quantity).sum()
    };

    OptimisticCart {
        is_empty: snapshot.map_or(true, |c| c.lines.is_empty()) && !queue.has_pending_add(),
        lines,
        subtotal,
        totals_authoritative,
        discount_codes: snapshot.map(|c| c.discount_codes.clone()).unwrap_or_default(),
        has_pending_discount_update: queue.pending_discount_codes().is_some(),
        checkout_url: snapshot.and_then(|c| c.checkout_url.clone()),
        note: snapshot.and_then(|c| c.note.clone()),
        total_quantity,
    }
}

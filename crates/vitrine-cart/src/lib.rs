//! Optimistic cart reconciliation for Vitrine storefronts.
//!
//! The remote cart service is the source of truth for lines, discount
//! applicability, and every total. This crate keeps the shopper's view
//! responsive anyway:
//!
//! - **Snapshot store** holds the last confirmed cart, replaced
//!   wholesale on every confirmed response.
//! - **Mutation queue** tracks user-initiated commands through their
//!   lifecycle, serializing conflicts per line (last writer wins by
//!   issuance order, never by response arrival).
//! - **Optimistic projector** derives the view the shopper sees before
//!   confirmation; it owns no state and is recomputed on every read.
//! - **Cart client** dispatches commands through the [`CartService`]
//!   interface and reconciles or discards each response.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_cart::prelude::*;
//!
//! let client = CartClient::new(service);
//! client.add_lines(vec![AddLine::new(merchandise, 1)]).await?;
//! let view = client.view();
//! assert!(!view.is_empty);
//! ```

pub mod client;
pub mod error;
pub mod mutation;
pub mod projection;
pub mod snapshot;

pub use client::{CartClient, CartService};
pub use error::CartError;
pub use mutation::{AddLine, CartMutation, LineUpdate, MutationQueue, Settlement};
pub use projection::{project, OptimisticCart, OptimisticLine};
pub use snapshot::{Cart, CartLine, Merchandise, SnapshotStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::client::{CartClient, CartService};
    pub use crate::error::CartError;
    pub use crate::mutation::{
        AddLine, CartMutation, LineUpdate, MutationQueue, MutationState, PendingMutation,
        Settlement,
    };
    pub use crate::projection::{project, OptimisticCart, OptimisticLine};
    pub use crate::snapshot::{
        Attribute, Cart, CartCost, CartLine, DiscountCode, LineCost, Merchandise,
        SnapshotStore,
    };
}

//! Cart client: dispatches commands and reconciles responses.

use crate::error::CartError;
use crate::mutation::{AddLine, CartMutation, LineUpdate, MutationQueue, Settlement};
use crate::projection::{project, OptimisticCart};
use crate::snapshot::{Cart, SnapshotStore};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use vitrine_commerce::{CartId, LineId};

/// The remote cart mutation interface.
///
/// One call per command; the service returns the full updated
/// authoritative cart or a structured failure. The service is assumed
/// to serialize writes to the same cart identifier; no cancellation
/// primitive exists, so a call always runs to completion even when its
/// result will be discarded.
#[async_trait]
pub trait CartService: Send + Sync {
    async fn apply(
        &self,
        cart_id: Option<&CartId>,
        mutation: &CartMutation,
    ) -> Result<Cart, CartError>;
}

struct State {
    store: SnapshotStore,
    queue: MutationQueue,
}

/// Drives the snapshot store and mutation queue against a
/// [`CartService`].
///
/// Reads through [`CartClient::view`] never block on in-flight
/// mutations; the internal lock is held only around queue and store
/// bookkeeping, never across an await.
pub struct CartClient {
    state: Mutex<State>,
    service: Arc<dyn CartService>,
}

impl CartClient {
    /// Create a client with the default mutation deadline.
    pub fn new(service: Arc<dyn CartService>) -> Self {
        Self {
            state: Mutex::new(State {
                store: SnapshotStore::new(),
                queue: MutationQueue::new(),
            }),
            service,
        }
    }

    /// Create a client with an explicit mutation deadline.
    pub fn with_timeout(service: Arc<dyn CartService>, timeout: Duration) -> Self {
        Self {
            state: Mutex::new(State {
                store: SnapshotStore::new(),
                queue: MutationQueue::with_timeout(timeout),
            }),
            service,
        }
    }

    /// Seed the store with a cart fetched outside the client (e.g.,
    /// the session's cart on first page load).
    pub fn restore(&self, cart: Cart) {
        self.lock().store.replace(cart);
    }

    /// Add lines for the given merchandise.
    pub async fn add_lines(&self, lines: Vec<AddLine>) -> Result<Settlement, CartError> {
        self.dispatch(CartMutation::AddLines(lines)).await
    }

    /// Change quantities of existing lines; quantity zero removes.
    pub async fn update_lines(
        &self,
        updates: Vec<LineUpdate>,
    ) -> Result<Settlement, CartError> {
        {
            let state = self.lock();
            for update in &updates {
                let known = state
                    .store
                    .cart()
                    .map_or(false, |c| c.line(&update.line_id).is_some());
                if !known {
                    return Err(CartError::UnknownLine(update.line_id.clone()));
                }
            }
        }
        self.dispatch(CartMutation::UpdateLines(updates)).await
    }

    /// Remove lines, expressed as updates to quantity zero.
    pub async fn remove_lines(&self, line_ids: Vec<LineId>) -> Result<Settlement, CartError> {
        let updates = line_ids
            .into_iter()
            .map(|id| LineUpdate::new(id, 0))
            .collect();
        self.update_lines(updates).await
    }

    /// Replace the entire discount code set.
    pub async fn update_discount_codes(
        &self,
        codes: Vec<String>,
    ) -> Result<Settlement, CartError> {
        self.dispatch(CartMutation::UpdateDiscountCodes(codes)).await
    }

    /// Remove one code by resubmitting the applicable set minus it.
    pub async fn remove_discount_code(&self, code: &str) -> Result<Settlement, CartError> {
        let codes: Vec<String> = {
            let state = self.lock();
            let current = state
                .queue
                .pending_discount_codes()
                .map(|c| c.to_vec())
                .unwrap_or_else(|| {
                    state
                        .store
                        .cart()
                        .map(|c| {
                            c.applicable_codes()
                                .into_iter()
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default()
                });
            current
                .into_iter()
                .filter(|c| !c.eq_ignore_ascii_case(code))
                .collect()
        };
        self.update_discount_codes(codes).await
    }

    /// The shopper's current view, recomputed from the snapshot and
    /// live mutations.
    pub fn view(&self) -> OptimisticCart {
        let state = self.lock();
        project(state.store.cart(), &state.queue)
    }

    /// The last confirmed cart, if any.
    pub fn snapshot(&self) -> Option<Cart> {
        self.lock().store.cart().cloned()
    }

    /// Fail live mutations past the deadline so their controls
    /// re-enable. Hosts call this from their UI tick; late responses
    /// for expired mutations settle as timeouts.
    pub fn expire_overdue(&self) -> usize {
        let expired = self.lock().queue.expire_overdue(Instant::now());
        for seq in &expired {
            warn!(seq = *seq, "mutation expired without a response");
        }
        expired.len()
    }

    async fn dispatch(&self, mut mutation: CartMutation) -> Result<Settlement, CartError> {
        mutation.clamp();
        let (seq, cart_id) = {
            let mut state = self.lock();
            let seq = state.queue.submit(mutation.clone());
            state.queue.begin(seq);
            (seq, state.store.cart_id().cloned())
        };
        debug!(seq, kind = mutation.kind(), "dispatching cart mutation");

        let result = self.service.apply(cart_id.as_ref(), &mutation).await;

        let mut state = self.lock();
        match result {
            Ok(cart) => match state.queue.settle(seq) {
                Settlement::Applied => {
                    state.store.replace(cart);
                    debug!(seq, "mutation settled");
                    Ok(Settlement::Applied)
                }
                Settlement::Discarded => {
                    warn!(seq, "discarding response superseded by a newer mutation");
                    Ok(Settlement::Discarded)
                }
                Settlement::Expired => {
                    let timeout = state.queue.timeout();
                    warn!(seq, "response arrived after the mutation deadline");
                    Err(CartError::Timeout(timeout))
                }
            },
            Err(err) => match state.queue.fail(seq) {
                Some(affected) => {
                    warn!(
                        seq,
                        affected = affected.len(),
                        error = %err,
                        "mutation failed; optimistic state reverted"
                    );
                    Err(err)
                }
                None => {
                    let timeout = state.queue.timeout();
                    warn!(seq, "error arrived after the mutation deadline");
                    Err(CartError::Timeout(timeout))
                }
            },
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves bookkeeping state
        // that is still structurally valid; recover rather than
        // poison every later read.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

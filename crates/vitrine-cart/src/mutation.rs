//! Cart mutation commands and the pending-mutation queue.
//!
//! Each shopper action becomes one discrete command with a lifecycle
//! of pending → in-flight → settled or failed. The queue exclusively
//! owns pending mutations; an entry is destroyed when its response is
//! applied, discarded as superseded, or expired.

use crate::snapshot::Merchandise;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use vitrine_commerce::LineId;

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// Default deadline after which an unanswered mutation is treated as
/// failed and its controls re-enable, rather than staying disabled
/// indefinitely when a response never comes.
pub const DEFAULT_MUTATION_TIMEOUT: Duration = Duration::from_secs(10);

/// One entry of an add-lines command.
///
/// Carries the full merchandise snapshot so the projector can show a
/// provisional line before the server confirms.
#[derive(Debug, Clone, PartialEq)]
pub struct AddLine {
    /// What to add.
    pub merchandise: Merchandise,
    /// Requested quantity.
    pub quantity: i64,
}

impl AddLine {
    pub fn new(merchandise: Merchandise, quantity: i64) -> Self {
        Self {
            merchandise,
            quantity,
        }
    }
}

/// One entry of an update-lines command. Quantity zero removes the
/// line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineUpdate {
    /// The line to change.
    pub line_id: LineId,
    /// New quantity; zero is removal.
    pub quantity: i64,
}

impl LineUpdate {
    pub fn new(line_id: LineId, quantity: i64) -> Self {
        Self { line_id, quantity }
    }
}

/// A user-initiated cart command.
#[derive(Debug, Clone, PartialEq)]
pub enum CartMutation {
    /// Add lines for the given merchandise.
    AddLines(Vec<AddLine>),
    /// Change quantities of existing lines (zero removes).
    UpdateLines(Vec<LineUpdate>),
    /// Replace the entire discount code set; not additive. Removing a
    /// single code means resubmitting the set minus that code.
    UpdateDiscountCodes(Vec<String>),
}

impl CartMutation {
    /// Removal expressed as an update to quantity zero, so the queue
    /// has a single removal path.
    pub fn remove_lines(line_ids: Vec<LineId>) -> Self {
        CartMutation::UpdateLines(
            line_ids
                .into_iter()
                .map(|id| LineUpdate::new(id, 0))
                .collect(),
        )
    }

    /// Command kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            CartMutation::AddLines(_) => "add_lines",
            CartMutation::UpdateLines(_) => "update_lines",
            CartMutation::UpdateDiscountCodes(_) => "update_discount_codes",
        }
    }

    /// Line IDs this command targets (empty for adds and discounts).
    pub fn updated_line_ids(&self) -> Vec<&LineId> {
        match self {
            CartMutation::UpdateLines(updates) => {
                updates.iter().map(|u| &u.line_id).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Clamp every requested quantity to `0..=MAX_QUANTITY_PER_LINE`.
    pub(crate) fn clamp(&mut self) {
        match self {
            CartMutation::AddLines(adds) => {
                for a in adds {
                    a.quantity = a.quantity.clamp(0, MAX_QUANTITY_PER_LINE);
                }
            }
            CartMutation::UpdateLines(updates) => {
                for u in updates {
                    u.quantity = u.quantity.clamp(0, MAX_QUANTITY_PER_LINE);
                }
            }
            CartMutation::UpdateDiscountCodes(_) => {}
        }
    }
}

/// Lifecycle state of a pending mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Created, not yet dispatched.
    Pending,
    /// Dispatched, awaiting the server response.
    InFlight,
    /// Response applied to the snapshot.
    Settled,
    /// Rejected, transport failure, or deadline expiry.
    Failed,
}

/// A command tracked by the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation {
    /// Issuance sequence number; conflict ordering uses this, never
    /// response arrival order.
    pub seq: u64,
    /// The command itself.
    pub mutation: CartMutation,
    /// Lifecycle state.
    pub state: MutationState,
    /// When the shopper acted.
    pub issued_at: Instant,
}

impl PendingMutation {
    /// Whether this entry still shapes the optimistic projection.
    pub fn is_live(&self) -> bool {
        matches!(self.state, MutationState::Pending | MutationState::InFlight)
    }
}

/// How a server response was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The response replaced the snapshot.
    Applied,
    /// A newer mutation superseded this one; the response was
    /// discarded wholesale.
    Discarded,
    /// The mutation had already expired; the late response was
    /// discarded.
    Expired,
}

/// Tracks in-flight cart commands and serializes conflicts.
///
/// Per line, only the most recently issued mutation stays live: an
/// older mutation's response is applied only if nothing newer has been
/// issued against any of its lines since. Discount-code submissions
/// supersede each other the same way, regardless of line.
#[derive(Debug)]
pub struct MutationQueue {
    next_seq: u64,
    entries: Vec<PendingMutation>,
    last_line_seq: HashMap<LineId, u64>,
    last_discount_seq: Option<u64>,
    expired: HashSet<u64>,
    timeout: Duration,
}

impl Default for MutationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationQueue {
    /// Create a queue with the default mutation deadline.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_MUTATION_TIMEOUT)
    }

    /// Create a queue with an explicit mutation deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            next_seq: 0,
            entries: Vec::new(),
            last_line_seq: HashMap::new(),
            last_discount_seq: None,
            expired: HashSet::new(),
            timeout,
        }
    }

    /// The configured mutation deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Accept a command, clamping quantities, and return its sequence
    /// number.
    pub fn submit(&mut self, mut mutation: CartMutation) -> u64 {
        mutation.clamp();
        let seq = self.next_seq;
        self.next_seq += 1;

        for line_id in mutation.updated_line_ids() {
            self.last_line_seq.insert(line_id.clone(), seq);
        }
        if matches!(mutation, CartMutation::UpdateDiscountCodes(_)) {
            self.last_discount_seq = Some(seq);
        }

        self.entries.push(PendingMutation {
            seq,
            mutation,
            state: MutationState::Pending,
            issued_at: Instant::now(),
        });
        seq
    }

    /// Mark a command dispatched.
    pub fn begin(&mut self, seq: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.seq == seq) {
            entry.state = MutationState::InFlight;
        }
    }

    /// The live quantity override for a line, if any: the most
    /// recently issued live update targeting it. Superseded entries
    /// are skipped; once a newer mutation settles and leaves the
    /// queue, a stale live entry must not regress the projection.
    pub fn live_quantity(&self, line_id: &LineId) -> Option<i64> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.is_live() && !self.is_superseded(e.seq))
            .find_map(|e| match &e.mutation {
                CartMutation::UpdateLines(updates) => updates
                    .iter()
                    .rev()
                    .find(|u| &u.line_id == line_id)
                    .map(|u| u.quantity),
                _ => None,
            })
    }

    /// Whether any live mutation targets this line; the UI disables
    /// the line's controls while true.
    pub fn is_line_busy(&self, line_id: &LineId) -> bool {
        self.live_quantity(line_id).is_some()
    }

    /// Live add-lines entries in issuance order, for provisional
    /// projection.
    pub fn pending_adds(&self) -> Vec<&AddLine> {
        self.entries
            .iter()
            .filter(|e| e.is_live())
            .flat_map(|e| match &e.mutation {
                CartMutation::AddLines(adds) => adds.as_slice(),
                _ => &[],
            })
            .collect()
    }

    /// Whether any add-lines command is still unconfirmed. Gates the
    /// empty-cart state.
    pub fn has_pending_add(&self) -> bool {
        !self.pending_adds().is_empty()
    }

    /// The discount code set from the most recent live discount
    /// submission, if one is unconfirmed.
    pub fn pending_discount_codes(&self) -> Option<&[String]> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.is_live() && !self.is_superseded(e.seq))
            .find_map(|e| match &e.mutation {
                CartMutation::UpdateDiscountCodes(codes) => Some(codes.as_slice()),
                _ => None,
            })
    }

    /// Whether a mutation's response must be discarded because a newer
    /// mutation against any of its lines (or the discount set) has
    /// been issued. Discard is wholesale; a stale response never
    /// updates non-conflicting fields.
    pub fn is_superseded(&self, seq: u64) -> bool {
        let Some(entry) = self.entries.iter().find(|e| e.seq == seq) else {
            return false;
        };
        match &entry.mutation {
            CartMutation::UpdateLines(updates) => updates.iter().any(|u| {
                self.last_line_seq
                    .get(&u.line_id)
                    .is_some_and(|&last| last > seq)
            }),
            CartMutation::UpdateDiscountCodes(_) => {
                self.last_discount_seq.is_some_and(|last| last > seq)
            }
            CartMutation::AddLines(_) => false,
        }
    }

    /// Reconcile a successful server response for `seq`.
    ///
    /// The entry is destroyed either way; the caller applies the
    /// response to the snapshot only on [`Settlement::Applied`].
    pub fn settle(&mut self, seq: u64) -> Settlement {
        if self.expired.remove(&seq) {
            return Settlement::Expired;
        }
        let superseded = self.is_superseded(seq);
        self.remove(seq);
        if superseded {
            Settlement::Discarded
        } else {
            Settlement::Applied
        }
    }

    /// Record a failed mutation and destroy its entry. Returns the
    /// line IDs whose optimistic state reverts to the snapshot, or
    /// `None` when the mutation had already expired; the late error
    /// is then reported as a timeout, matching the late-Ok path.
    pub fn fail(&mut self, seq: u64) -> Option<Vec<LineId>> {
        if self.expired.remove(&seq) {
            return None;
        }
        let affected = self
            .entries
            .iter()
            .find(|e| e.seq == seq)
            .map(|e| {
                e.mutation
                    .updated_line_ids()
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        self.remove(seq);
        Some(affected)
    }

    /// Fail every live mutation older than the deadline, so controls
    /// re-enable instead of staying disabled indefinitely. Returns the
    /// expired sequence numbers; their late responses will settle as
    /// [`Settlement::Expired`].
    pub fn expire_overdue(&mut self, now: Instant) -> Vec<u64> {
        let timeout = self.timeout;
        let overdue: Vec<u64> = self
            .entries
            .iter()
            .filter(|e| e.is_live() && now.duration_since(e.issued_at) >= timeout)
            .map(|e| e.seq)
            .collect();
        for &seq in &overdue {
            self.expired.insert(seq);
            self.remove(seq);
        }
        overdue
    }

    /// Number of live entries.
    pub fn live_len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_live()).count()
    }

    fn remove(&mut self, seq: u64) {
        self.entries.retain(|e| e.seq != seq);
    }
}

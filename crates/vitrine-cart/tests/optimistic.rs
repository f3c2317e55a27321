//! End-to-end reconciliation scenarios: optimistic display before the
//! server answers, out-of-order settlement, failure revert, expiry.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::yield_now;
use vitrine_cart::prelude::*;
use vitrine_commerce::{CartId, Currency, LineId, Money};

fn merchandise(id: &str, cents: i64, bundle: bool) -> Merchandise {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": "Large",
        "product_title": "Shirt",
        "product_handle": "shirt",
        "price": {"amount_cents": cents, "currency": "USD"},
        "image": null,
        "selected_options": [{"name": "Size", "value": "Large"}],
        "requires_components": bundle,
    }))
    .expect("merchandise fixture")
}

fn line(id: &str, qty: i64, unit_cents: i64) -> CartLine {
    CartLine {
        id: LineId::new(id),
        merchandise: merchandise("v1", unit_cents, false),
        quantity: qty,
        cost: LineCost {
            total: Money::new(unit_cents * qty, Currency::USD),
            unit: Money::new(unit_cents, Currency::USD),
            compare_at_unit: None,
        },
    }
}

fn cart(lines: Vec<CartLine>) -> Cart {
    let subtotal = Money::try_sum(lines.iter().map(|l| &l.cost.total), Currency::USD)
        .expect("fixture subtotal");
    Cart {
        id: CartId::new("cart-1"),
        total_quantity: lines.iter().map(|l| l.quantity).sum(),
        lines,
        discount_codes: Vec::new(),
        cost: CartCost {
            subtotal,
            total: subtotal,
            tax: None,
            duty: None,
        },
        note: None,
        attributes: Vec::new(),
        checkout_url: Some("https://shop.example/checkout/tok".to_string()),
    }
}

/// One scripted service call: optionally parks on a gate before
/// answering, so tests can observe mid-flight state and force
/// responses to arrive out of issuance order.
struct ScriptedCall {
    gate: Option<Arc<Notify>>,
    response: Result<Cart, CartError>,
}

struct ScriptedService {
    calls: Mutex<VecDeque<ScriptedCall>>,
}

impl ScriptedService {
    fn new(calls: Vec<ScriptedCall>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(calls.into()),
        })
    }
}

fn answer(response: Result<Cart, CartError>) -> ScriptedCall {
    ScriptedCall {
        gate: None,
        response,
    }
}

fn gated(gate: &Arc<Notify>, response: Result<Cart, CartError>) -> ScriptedCall {
    ScriptedCall {
        gate: Some(gate.clone()),
        response,
    }
}

#[async_trait]
impl CartService for ScriptedService {
    async fn apply(
        &self,
        _cart_id: Option<&CartId>,
        _mutation: &CartMutation,
    ) -> Result<Cart, CartError> {
        let call = self
            .calls
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected service call");
        if let Some(gate) = call.gate {
            gate.notified().await;
        }
        call.response
    }
}

#[tokio::test]
async fn add_to_empty_cart_shows_provisional_line_before_confirmation() {
    let gate = Arc::new(Notify::new());
    let confirmed = cart(vec![line("l1", 1, 1000)]);
    let service = ScriptedService::new(vec![gated(&gate, Ok(confirmed))]);
    let client = Arc::new(CartClient::new(service));

    assert!(client.view().is_empty);

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .add_lines(vec![AddLine::new(merchandise("v1", 1000, false), 1)])
                .await
        })
    };
    yield_now().await;

    // Mid-flight: one provisional line, approximate totals, not empty.
    let view = client.view();
    assert!(!view.is_empty);
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].id, None);
    assert!(view.lines[0].is_optimistic);
    assert!(!view.totals_authoritative);
    assert_eq!(view.subtotal.amount_cents, 1000);

    gate.notify_one();
    assert_eq!(task.await.unwrap().unwrap(), Settlement::Applied);

    let view = client.view();
    assert_eq!(view.lines[0].id, Some(LineId::new("l1")));
    assert!(!view.lines[0].is_optimistic);
    assert!(view.totals_authoritative);
}

#[tokio::test]
async fn quantity_increase_matches_worked_example() {
    // Confirmed: one line, qty 1, $10.00. The shopper clicks increase.
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::new(vec![gated(&gate, Ok(cart(vec![line("l1", 2, 1000)])))]);
    let client = Arc::new(CartClient::new(service));
    client.restore(cart(vec![line("l1", 1, 1000)]));

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_lines(vec![LineUpdate::new(LineId::new("l1"), 2)])
                .await
        })
    };
    yield_now().await;

    // Optimistic: qty 2, approximate $20.00, control disabled.
    let view = client.view();
    assert_eq!(view.lines[0].quantity, 2);
    assert_eq!(view.lines[0].cost.amount_cents, 2000);
    assert!(view.lines[0].is_optimistic);
    assert!(!view.totals_authoritative);

    gate.notify_one();
    assert_eq!(task.await.unwrap().unwrap(), Settlement::Applied);

    // Confirmed: visually unchanged, control re-enabled.
    let view = client.view();
    assert_eq!(view.lines[0].quantity, 2);
    assert_eq!(view.lines[0].cost.amount_cents, 2000);
    assert!(!view.lines[0].is_optimistic);
    assert!(view.totals_authoritative);
}

#[tokio::test]
async fn last_writer_wins_under_out_of_order_responses() {
    let gate = Arc::new(Notify::new());
    // First call (qty 2) parks; second call (qty 5) answers at once.
    let service = ScriptedService::new(vec![
        gated(&gate, Ok(cart(vec![line("l1", 2, 1000)]))),
        answer(Ok(cart(vec![line("l1", 5, 1000)]))),
    ]);
    let client = Arc::new(CartClient::new(service));
    client.restore(cart(vec![line("l1", 1, 1000)]));

    let stale = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_lines(vec![LineUpdate::new(LineId::new("l1"), 2)])
                .await
        })
    };
    yield_now().await;

    let fresh = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_lines(vec![LineUpdate::new(LineId::new("l1"), 5)])
                .await
        })
    };
    yield_now().await;

    // The newer mutation settled; the projection shows 5 while the
    // stale response is still outstanding.
    assert_eq!(client.view().lines[0].quantity, 5);

    // The stale response arrives last and is discarded wholesale.
    gate.notify_one();
    assert_eq!(stale.await.unwrap().unwrap(), Settlement::Discarded);
    assert_eq!(fresh.await.unwrap().unwrap(), Settlement::Applied);

    let view = client.view();
    assert_eq!(view.lines[0].quantity, 5);
    assert_eq!(view.subtotal.amount_cents, 5000);
    assert!(view.totals_authoritative);
}

#[tokio::test]
async fn zero_quantity_removes_before_any_response() {
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::new(vec![gated(&gate, Ok(cart(vec![])))]);
    let client = Arc::new(CartClient::new(service));
    client.restore(cart(vec![line("l1", 1, 1000)]));

    let task = {
        let client = client.clone();
        tokio::spawn(async move { client.remove_lines(vec![LineId::new("l1")]).await })
    };
    yield_now().await;

    // Removed synchronously from the projection.
    assert!(client.view().lines.is_empty());

    gate.notify_one();
    assert_eq!(task.await.unwrap().unwrap(), Settlement::Applied);
    assert!(client.view().is_empty);
}

#[tokio::test]
async fn rejection_reverts_affected_lines() {
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::new(vec![gated(
        &gate,
        Err(CartError::Rejected("insufficient stock".to_string())),
    )]);
    let client = Arc::new(CartClient::new(service));
    client.restore(cart(vec![line("l1", 1, 1000)]));

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_lines(vec![LineUpdate::new(LineId::new("l1"), 9)])
                .await
        })
    };
    yield_now().await;
    assert_eq!(client.view().lines[0].quantity, 9);

    gate.notify_one();
    let err = task.await.unwrap().unwrap_err();
    assert_eq!(err, CartError::Rejected("insufficient stock".to_string()));

    // Back to the last confirmed snapshot.
    let view = client.view();
    assert_eq!(view.lines[0].quantity, 1);
    assert!(view.totals_authoritative);
}

#[tokio::test]
async fn expiry_reenables_controls_and_times_out_the_caller() {
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::new(vec![gated(&gate, Ok(cart(vec![])))]);
    let client = Arc::new(CartClient::with_timeout(service, Duration::from_millis(0)));
    client.restore(cart(vec![line("l1", 1, 1000)]));

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_lines(vec![LineUpdate::new(LineId::new("l1"), 3)])
                .await
        })
    };
    yield_now().await;
    assert!(client.view().lines[0].is_optimistic);

    // Host tick past the deadline: the control re-enables.
    assert_eq!(client.expire_overdue(), 1);
    let view = client.view();
    assert_eq!(view.lines[0].quantity, 1);
    assert!(!view.lines[0].is_optimistic);

    // The late response is discarded and the caller sees a timeout.
    gate.notify_one();
    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, CartError::Timeout(_)));
    assert_eq!(client.view().lines[0].quantity, 1);
}

#[tokio::test]
async fn add_confirmed_by_an_earlier_arriving_response_is_not_duplicated() {
    // The server serializes writes: it processes the parked add first,
    // so the discount response that arrives first already contains the
    // new line. The provisional line must fold into it, not double it.
    let gate = Arc::new(Notify::new());
    let confirmed = cart(vec![line("l1", 1, 1000)]);
    let mut with_code = confirmed.clone();
    with_code.discount_codes = vec![DiscountCode {
        code: "SAVE10".to_string(),
        applicable: true,
    }];
    let service = ScriptedService::new(vec![
        gated(&gate, Ok(confirmed)),
        answer(Ok(with_code)),
    ]);
    let client = Arc::new(CartClient::new(service));

    let add = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .add_lines(vec![AddLine::new(merchandise("v1", 1000, false), 1)])
                .await
        })
    };
    yield_now().await;

    let discount = {
        let client = client.clone();
        tokio::spawn(async move {
            client.update_discount_codes(vec!["SAVE10".to_string()]).await
        })
    };
    yield_now().await;

    // The discount response settled first and confirmed line l1; the
    // add is still in flight but already reflected.
    let view = client.view();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].id, Some(LineId::new("l1")));
    assert_eq!(view.subtotal.amount_cents, 1000);

    gate.notify_one();
    assert_eq!(add.await.unwrap().unwrap(), Settlement::Applied);
    assert_eq!(discount.await.unwrap().unwrap(), Settlement::Applied);

    let view = client.view();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.subtotal.amount_cents, 1000);
    assert!(view.totals_authoritative);
}

#[tokio::test]
async fn error_arriving_after_expiry_reports_a_timeout() {
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::new(vec![gated(
        &gate,
        Err(CartError::Rejected("insufficient stock".to_string())),
    )]);
    let client = Arc::new(CartClient::with_timeout(service, Duration::from_millis(0)));
    client.restore(cart(vec![line("l1", 1, 1000)]));

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_lines(vec![LineUpdate::new(LineId::new("l1"), 3)])
                .await
        })
    };
    yield_now().await;
    assert_eq!(client.expire_overdue(), 1);

    // The late rejection is reported as the timeout the shopper
    // already saw, not as a fresh failure.
    gate.notify_one();
    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, CartError::Timeout(_)));
    assert_eq!(client.view().lines[0].quantity, 1);
}

#[tokio::test]
async fn bundle_add_projects_exactly_one_line() {
    let gate = Arc::new(Notify::new());
    let mut confirmed_line = line("l1", 1, 5000);
    confirmed_line.merchandise = merchandise("b1", 5000, true);
    let service = ScriptedService::new(vec![gated(&gate, Ok(cart(vec![confirmed_line])))]);
    let client = Arc::new(CartClient::new(service));

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .add_lines(vec![AddLine::new(merchandise("b1", 5000, true), 1)])
                .await
        })
    };
    yield_now().await;

    // One provisional line for the bundle merchandise; components are
    // never injected client-side.
    let view = client.view();
    assert_eq!(view.lines.len(), 1);
    assert!(view.lines[0].merchandise.is_bundle());

    gate.notify_one();
    task.await.unwrap().unwrap();
    let view = client.view();
    assert_eq!(view.lines.len(), 1);
    assert!(view.lines[0].merchandise.is_bundle());
}

#[tokio::test]
async fn later_discount_submission_supersedes_earlier() {
    let gate = Arc::new(Notify::new());
    let with_codes = |codes: &[&str]| {
        let mut c = cart(vec![line("l1", 1, 1000)]);
        c.discount_codes = codes
            .iter()
            .map(|code| DiscountCode {
                code: code.to_string(),
                applicable: true,
            })
            .collect();
        c
    };
    let service = ScriptedService::new(vec![
        gated(&gate, Ok(with_codes(&["SAVE10"]))),
        answer(Ok(with_codes(&["SAVE10", "FREESHIP"]))),
    ]);
    let client = Arc::new(CartClient::new(service));
    client.restore(cart(vec![line("l1", 1, 1000)]));

    let stale = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_discount_codes(vec!["SAVE10".to_string()])
                .await
        })
    };
    yield_now().await;

    let fresh = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_discount_codes(vec!["SAVE10".to_string(), "FREESHIP".to_string()])
                .await
        })
    };
    yield_now().await;

    gate.notify_one();
    assert_eq!(stale.await.unwrap().unwrap(), Settlement::Discarded);
    assert_eq!(fresh.await.unwrap().unwrap(), Settlement::Applied);

    let codes = client.snapshot().unwrap();
    assert_eq!(codes.applicable_codes(), vec!["SAVE10", "FREESHIP"]);
}

#[tokio::test]
async fn concurrent_mutations_on_independent_lines_both_apply() {
    // The remote serializes writes per cart: the second command's
    // response reflects only itself, while the parked first command
    // answers last with both changes applied.
    let after_second = cart(vec![line("l1", 1, 1000), line("l2", 4, 2000)]);
    let after_both = cart(vec![line("l1", 3, 1000), line("l2", 4, 2000)]);
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::new(vec![
        gated(&gate, Ok(after_both)),
        answer(Ok(after_second)),
    ]);
    let client = Arc::new(CartClient::new(service));
    client.restore(cart(vec![line("l1", 1, 1000), line("l2", 1, 2000)]));

    let first = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_lines(vec![LineUpdate::new(LineId::new("l1"), 3)])
                .await
        })
    };
    yield_now().await;
    let second = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .update_lines(vec![LineUpdate::new(LineId::new("l2"), 4)])
                .await
        })
    };
    yield_now().await;

    // Both optimistic overrides visible while the first is parked.
    let view = client.view();
    assert_eq!(view.lines[0].quantity, 3);
    assert_eq!(view.lines[1].quantity, 4);

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), Settlement::Applied);
    assert_eq!(second.await.unwrap().unwrap(), Settlement::Applied);

    let view = client.view();
    assert_eq!(view.lines[0].quantity, 3);
    assert_eq!(view.lines[1].quantity, 4);
    assert!(view.totals_authoritative);
}

//! Integration tests for approval-then-action sequencing.

mod support;

use std::sync::Arc;

use onchain::{CallError, SwapDirection, H256};
use swapdesk_session::notify::{Notification, NotificationSink};
use swapdesk_session::orchestrator::{
    OperationGate, OperationKind, OperationOutcome, OperationStep, Orchestrator,
    ValidationRejection,
};

use support::{
    entries, new_log, scales, spender, symbols, MockExchange, MockToken, RecordingSink, ADD_TX,
    REMOVE_TX, SWAP_TX,
};

fn rig(
    base: MockToken,
    quote: MockToken,
    exchange: MockExchange,
) -> (Orchestrator, Arc<RecordingSink>, OperationGate) {
    let sink = Arc::new(RecordingSink::default());
    let gate = OperationGate::new();
    let orchestrator = Orchestrator::new(
        Arc::new(base),
        Arc::new(quote),
        Arc::new(exchange),
        spender(),
        scales(),
        symbols(),
        gate.clone(),
        Arc::clone(&sink) as Arc<dyn NotificationSink>,
    );
    (orchestrator, sink, gate)
}

/// Test that a swap approves the source token first, then submits the
/// directional swap call, and only awaits the swap's confirmation.
#[tokio::test]
async fn test_swap_approves_source_before_swapping() {
    let log = new_log();
    let (orchestrator, sink, gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.swap(SwapDirection::BaseToQuote, "2.5").await;

    match outcome {
        OperationOutcome::Completed { tx_hash } => {
            assert_eq!(tx_hash, H256::from_low_u64_be(SWAP_TX));
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(
        entries(&log),
        vec![
            "approve WC 2500000000000000000",
            "swap_base_to_quote 2500000000000000000",
            "confirm swap",
        ]
    );
    // The approval submission is acknowledged but never awaited.
    assert!(!entries(&log)
        .iter()
        .any(|entry| entry.starts_with("confirm approval")));
    assert!(!gate.in_flight());

    let notifications = sink.notifications();
    assert_eq!(notifications.len(), 1);
    assert!(matches!(
        notifications[0],
        Notification::OperationSucceeded {
            operation: OperationKind::Swap,
            ..
        }
    ));
}

/// Test that the opposite direction approves the quote leg and hits the
/// opposite swap entry point.
#[tokio::test]
async fn test_swap_quote_to_base_uses_quote_leg() {
    let log = new_log();
    let (orchestrator, _sink, _gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.swap(SwapDirection::QuoteToBase, "1").await;

    assert!(outcome.is_completed());
    assert_eq!(
        entries(&log),
        vec![
            "approve SONIC 1000000000000000000",
            "swap_quote_to_base 1000000000000000000",
            "confirm swap",
        ]
    );
}

/// Test that the gate reads Submitting through approval and submission,
/// Confirming during the receipt wait, and Idle on both sides.
#[tokio::test]
async fn test_gate_tracks_submitting_and_confirming_phases() {
    let log = new_log();
    let gate = OperationGate::new();
    let sink = Arc::new(RecordingSink::default());
    let orchestrator = Orchestrator::new(
        Arc::new(MockToken::new("WC", &log).probed(gate.clone())),
        Arc::new(MockToken::new("SONIC", &log)),
        Arc::new(MockExchange::new(&log).probed(gate.clone())),
        spender(),
        scales(),
        symbols(),
        gate.clone(),
        Arc::clone(&sink) as Arc<dyn NotificationSink>,
    );

    assert!(!gate.in_flight());
    let outcome = orchestrator.swap(SwapDirection::BaseToQuote, "1").await;
    assert!(outcome.is_completed());
    assert!(!gate.in_flight());

    assert_eq!(
        entries(&log),
        vec![
            "approve WC 1000000000000000000@Submitting",
            "swap_base_to_quote 1000000000000000000@Submitting",
            "confirm swap@Confirming",
        ]
    );
}

/// Test that a failed approval aborts the sequence before the swap call and
/// the notification names the step and the underlying reason.
#[tokio::test]
async fn test_swap_approval_failure_stops_the_sequence() {
    let log = new_log();
    let base = MockToken::new("WC", &log)
        .failing_approval(CallError::Rpc("connection refused".to_string()));
    let (orchestrator, sink, gate) = rig(
        base,
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.swap(SwapDirection::BaseToQuote, "2.5").await;

    let failure = match outcome {
        OperationOutcome::Failed(failure) => failure,
        other => panic!("expected failure, got {:?}", other),
    };
    assert_eq!(failure.operation, OperationKind::Swap);
    assert_eq!(
        failure.step,
        OperationStep::Approval {
            symbol: "WC".to_string()
        }
    );
    assert_eq!(entries(&log), vec!["approve WC 2500000000000000000"]);
    assert!(!gate.in_flight());

    let notifications = sink.notifications();
    assert_eq!(notifications.len(), 1);
    let text = notifications[0].text();
    assert!(text.starts_with("Swap failed:"), "unexpected text: {}", text);
    assert!(text.contains("approval of WC"));
    assert!(text.contains("connection refused"));
}

/// Test that a revert during the confirmation wait surfaces as a
/// confirmation-step failure carrying the raw chain reason.
#[tokio::test]
async fn test_swap_revert_surfaces_at_confirmation_step() {
    let log = new_log();
    let reverted = CallError::Reverted {
        tx_hash: H256::from_low_u64_be(SWAP_TX),
    };
    let exchange = MockExchange::new(&log).failing_confirmation(reverted.clone());
    let (orchestrator, sink, _gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        exchange,
    );

    let outcome = orchestrator.swap(SwapDirection::BaseToQuote, "1").await;

    let failure = match outcome {
        OperationOutcome::Failed(failure) => failure,
        other => panic!("expected failure, got {:?}", other),
    };
    assert_eq!(failure.step, OperationStep::Confirmation);
    assert_eq!(failure.source, reverted);

    let text = sink.notifications()[0].text();
    assert!(text.contains("reverted on chain"), "unexpected text: {}", text);
}

/// Test that nothing runs after a failed swap submission: the completed
/// approval stands as-is and no compensating call is attempted.
#[tokio::test]
async fn test_no_compensation_after_submission_failure() {
    let log = new_log();
    let exchange =
        MockExchange::new(&log).failing_submission(CallError::Rpc("nonce too low".to_string()));
    let (orchestrator, _sink, _gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        exchange,
    );

    let outcome = orchestrator.swap(SwapDirection::BaseToQuote, "1").await;

    let failure = match outcome {
        OperationOutcome::Failed(failure) => failure,
        other => panic!("expected failure, got {:?}", other),
    };
    assert_eq!(failure.step, OperationStep::Action);
    assert_eq!(
        entries(&log),
        vec![
            "approve WC 1000000000000000000",
            "swap_base_to_quote 1000000000000000000",
        ]
    );
}

/// Test that empty input is rejected with no network traffic and no
/// notification.
#[tokio::test]
async fn test_empty_amount_rejected_before_any_call() {
    let log = new_log();
    let (orchestrator, sink, gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.swap(SwapDirection::BaseToQuote, "   ").await;

    assert!(matches!(
        outcome,
        OperationOutcome::Rejected(ValidationRejection::EmptyAmount { .. })
    ));
    assert!(entries(&log).is_empty());
    assert!(sink.notifications().is_empty());
    assert!(!gate.in_flight());
}

/// Test that malformed input is rejected naming the offending field.
#[tokio::test]
async fn test_malformed_amount_rejected_before_any_call() {
    let log = new_log();
    let (orchestrator, sink, _gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.swap(SwapDirection::BaseToQuote, "1.2.3").await;

    match outcome {
        OperationOutcome::Rejected(ValidationRejection::BadAmount { field, .. }) => {
            assert_eq!(field, "WC");
        }
        other => panic!("expected a bad-amount rejection, got {:?}", other),
    }
    assert!(entries(&log).is_empty());
    assert!(sink.notifications().is_empty());
}

/// Test that adding liquidity approves both legs in pair order before the
/// single add call.
#[tokio::test]
async fn test_add_liquidity_approves_both_tokens_in_order() {
    let log = new_log();
    let (orchestrator, sink, _gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.add_liquidity("1", "2").await;

    match outcome {
        OperationOutcome::Completed { tx_hash } => {
            assert_eq!(tx_hash, H256::from_low_u64_be(ADD_TX));
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(
        entries(&log),
        vec![
            "approve WC 1000000000000000000",
            "approve SONIC 2000000000000000000",
            "add_liquidity 1000000000000000000 2000000000000000000",
            "confirm add_liquidity",
        ]
    );
    assert!(matches!(
        sink.notifications()[0],
        Notification::OperationSucceeded {
            operation: OperationKind::AddLiquidity,
            ..
        }
    ));
}

/// Test that a failed base approval blocks the quote approval and the add
/// call entirely, and the user is told which approval failed.
#[tokio::test]
async fn test_add_liquidity_stops_at_first_failed_approval() {
    let log = new_log();
    let base = MockToken::new("WC", &log)
        .failing_approval(CallError::Rpc("connection refused".to_string()));
    let (orchestrator, sink, gate) = rig(
        base,
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.add_liquidity("1", "2").await;

    let failure = match outcome {
        OperationOutcome::Failed(failure) => failure,
        other => panic!("expected failure, got {:?}", other),
    };
    assert_eq!(failure.operation, OperationKind::AddLiquidity);
    assert_eq!(
        failure.step,
        OperationStep::Approval {
            symbol: "WC".to_string()
        }
    );
    assert_eq!(entries(&log), vec!["approve WC 1000000000000000000"]);
    assert!(!gate.in_flight());

    let text = sink.notifications()[0].text();
    assert!(text.starts_with("Add liquidity failed:"));
    assert!(text.contains("approval of WC"));
}

/// Test that both amounts validate before either approval goes out.
#[tokio::test]
async fn test_add_liquidity_validates_both_amounts_first() {
    let log = new_log();
    let (orchestrator, sink, _gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.add_liquidity("1", "not-a-number").await;

    match outcome {
        OperationOutcome::Rejected(ValidationRejection::BadAmount { field, .. }) => {
            assert_eq!(field, "SONIC");
        }
        other => panic!("expected a bad-amount rejection, got {:?}", other),
    }
    assert!(entries(&log).is_empty());
    assert!(sink.notifications().is_empty());
}

/// Test that removing liquidity submits exactly one mutating call and no
/// approval; the exchange burns shares it already controls.
#[tokio::test]
async fn test_remove_liquidity_skips_approval() {
    let log = new_log();
    let (orchestrator, sink, _gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.remove_liquidity("3").await;

    match outcome {
        OperationOutcome::Completed { tx_hash } => {
            assert_eq!(tx_hash, H256::from_low_u64_be(REMOVE_TX));
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(
        entries(&log),
        vec![
            "remove_liquidity 3000000000000000000",
            "confirm remove_liquidity",
        ]
    );
    assert!(matches!(
        sink.notifications()[0],
        Notification::OperationSucceeded {
            operation: OperationKind::RemoveLiquidity,
            ..
        }
    ));
}

/// Test that the share field validates like the token fields.
#[tokio::test]
async fn test_remove_liquidity_rejects_empty_share_amount() {
    let log = new_log();
    let (orchestrator, sink, _gate) = rig(
        MockToken::new("WC", &log),
        MockToken::new("SONIC", &log),
        MockExchange::new(&log),
    );

    let outcome = orchestrator.remove_liquidity("").await;

    match outcome {
        OperationOutcome::Rejected(ValidationRejection::EmptyAmount { field }) => {
            assert_eq!(field, "LP");
        }
        other => panic!("expected an empty-amount rejection, got {:?}", other),
    }
    assert!(entries(&log).is_empty());
    assert!(sink.notifications().is_empty());
}

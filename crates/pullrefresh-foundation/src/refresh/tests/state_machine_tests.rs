use super::*;

use std::cell::RefCell;

use pullrefresh_core::Runtime;

use crate::refresh::lifecycle::RefreshCompletion;

type Pending = Rc<RefCell<Vec<RefreshCompletion>>>;

fn machine(runtime: &Runtime, threshold: f32) -> (ThresholdStateMachine, Pending) {
    let pending: Pending = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&pending);
    let lifecycle = RefreshLifecycle::new(
        move |completion: RefreshCompletion| sink.borrow_mut().push(completion),
        runtime.handle(),
    );
    (ThresholdStateMachine::new(threshold, lifecycle), pending)
}

#[test]
fn starts_idle() {
    let runtime = Runtime::default();
    let (machine, _) = machine(&runtime, 150.0);
    assert_eq!(machine.refresh_state(), RefreshState::Idle);
    assert_eq!(machine.lifecycle().started_count(), 0);
}

#[test]
fn below_threshold_stays_idle() {
    let runtime = Runtime::default();
    let (machine, pending) = machine(&runtime, 150.0);

    let decision = machine.on_fling_result(120.0);

    assert_eq!(decision, FlingDecision::BelowThreshold { distance: 120.0 });
    assert_eq!(machine.refresh_state(), RefreshState::Idle);
    assert!(pending.borrow().is_empty());
}

#[test]
fn exactly_threshold_triggers() {
    let runtime = Runtime::default();
    let (machine, pending) = machine(&runtime, 150.0);

    assert_eq!(machine.on_fling_result(150.0), FlingDecision::Refresh);
    assert_eq!(machine.refresh_state(), RefreshState::Refreshing);
    assert_eq!(pending.borrow().len(), 1);
}

#[test]
fn release_while_refreshing_is_ignored() {
    let runtime = Runtime::default();
    let (machine, pending) = machine(&runtime, 150.0);

    machine.on_fling_result(200.0);
    let second = machine.on_fling_result(500.0);

    assert_eq!(second, FlingDecision::IgnoredWhileRefreshing);
    assert_eq!(machine.lifecycle().started_count(), 1);
    assert_eq!(pending.borrow().len(), 1);
}

#[test]
fn completion_returns_to_idle_on_ui_queue() {
    let runtime = Runtime::default();
    let (machine, pending) = machine(&runtime, 150.0);
    machine.on_fling_result(160.0);

    let completion = pending.borrow_mut().pop().expect("operation started");
    completion.succeed();
    assert_eq!(machine.refresh_state(), RefreshState::Refreshing);

    runtime.handle().drain_ui();
    assert_eq!(machine.refresh_state(), RefreshState::Idle);
}

#[test]
fn failed_refresh_still_returns_to_idle() {
    let runtime = Runtime::default();
    let (machine, pending) = machine(&runtime, 150.0);
    machine.on_fling_result(160.0);

    let completion = pending.borrow_mut().pop().expect("operation started");
    completion.fail("timeout");
    runtime.handle().drain_ui();

    assert_eq!(machine.refresh_state(), RefreshState::Idle);
    assert!(machine.lifecycle().last_result().is_some_and(|r| r.is_err()));
}

#[test]
fn state_observers_see_both_transitions() {
    let runtime = Runtime::default();
    let (machine, pending) = machine(&runtime, 150.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        machine
            .state()
            .subscribe(move |state| seen.borrow_mut().push(*state));
    }

    machine.on_fling_result(151.0);
    drop(pending.borrow_mut().pop());
    runtime.handle().drain_ui();

    assert_eq!(
        *seen.borrow(),
        vec![RefreshState::Refreshing, RefreshState::Idle]
    );
}

#[test]
fn stale_completion_does_not_end_newer_refresh() {
    let runtime = Runtime::default();
    let (machine, pending) = machine(&runtime, 150.0);

    machine.on_fling_result(160.0);
    let first = pending.borrow_mut().pop().expect("first refresh");
    machine.on_refresh_complete();
    assert_eq!(machine.refresh_state(), RefreshState::Idle);

    machine.on_fling_result(160.0);
    assert_eq!(machine.refresh_state(), RefreshState::Refreshing);

    first.succeed();
    runtime.handle().drain_ui();
    assert_eq!(machine.refresh_state(), RefreshState::Refreshing);
}

#[test]
fn nan_distance_never_triggers() {
    let runtime = Runtime::default();
    let (machine, _) = machine(&runtime, 150.0);

    let decision = machine.on_fling_result(f32::NAN);

    assert!(!decision.started_refresh());
    assert_eq!(machine.refresh_state(), RefreshState::Idle);
}

use throttle_core::{ThrottleWindow, WindowAction, WindowState};

#[test]
fn test_new_window_is_idle() {
    let window = ThrottleWindow::new(false);
    assert_eq!(window.state(), WindowState::Idle);
    assert!(!window.is_pending());
    assert!(!window.is_trailing());

    assert!(ThrottleWindow::new(true).is_trailing());
}

#[test]
fn test_zero_triggers_do_nothing() {
    let mut window = ThrottleWindow::new(true);
    assert_eq!(window.on_triggers(0), WindowAction::Ignore);
    assert_eq!(window.state(), WindowState::Idle);
}

#[test]
fn test_leading_edge_fires_and_arms() {
    let mut window = ThrottleWindow::new(false);
    assert_eq!(window.on_triggers(1), WindowAction::FireAndArm);
    assert_eq!(window.state(), WindowState::Armed);
}

#[test]
fn test_triggers_while_armed_are_dropped_without_trailing() {
    let mut window = ThrottleWindow::new(false);
    assert_eq!(window.on_triggers(1), WindowAction::FireAndArm);

    // Nothing is remembered
    assert_eq!(window.on_triggers(1), WindowAction::Ignore);
    assert_eq!(window.on_triggers(7), WindowAction::Ignore);
    assert!(!window.is_pending());

    // Period ends with nothing pending, window goes idle
    assert_eq!(window.on_expired(), WindowAction::Disarm);
    assert_eq!(window.state(), WindowState::Idle);
}

#[test]
fn test_burst_while_idle_fires_once_without_trailing() {
    let mut window = ThrottleWindow::new(false);
    assert_eq!(window.on_triggers(5), WindowAction::FireAndArm);
    assert!(!window.is_pending());
    assert_eq!(window.on_expired(), WindowAction::Disarm);
}

#[test]
fn test_burst_while_idle_queues_trailing_fire() {
    let mut window = ThrottleWindow::new(true);

    // First trigger of the batch is the leading edge, the rest arrive while armed
    assert_eq!(window.on_triggers(5), WindowAction::FireAndArm);
    assert!(window.is_pending());

    assert_eq!(window.on_expired(), WindowAction::FireAndArm);
    assert!(!window.is_pending());
    assert_eq!(window.on_expired(), WindowAction::Disarm);
}

#[test]
fn test_trailing_triggers_coalesce() {
    let mut window = ThrottleWindow::new(true);
    assert_eq!(window.on_triggers(1), WindowAction::FireAndArm);

    assert_eq!(window.on_triggers(1), WindowAction::Ignore);
    assert_eq!(window.on_triggers(1), WindowAction::Ignore);
    assert_eq!(window.on_triggers(1), WindowAction::Ignore);
    assert!(window.is_pending());

    // Three triggers, one trailing fire
    assert_eq!(window.on_expired(), WindowAction::FireAndArm);
    assert_eq!(window.state(), WindowState::Armed);
    assert_eq!(window.on_expired(), WindowAction::Disarm);
    assert_eq!(window.state(), WindowState::Idle);
}

#[test]
fn test_trailing_fire_rearms_window() {
    let mut window = ThrottleWindow::new(true);
    assert_eq!(window.on_triggers(1), WindowAction::FireAndArm);
    assert_eq!(window.on_triggers(1), WindowAction::Ignore);
    assert_eq!(window.on_expired(), WindowAction::FireAndArm);

    // Still armed after the trailing fire: a new trigger is pending again, not a leading edge
    assert_eq!(window.on_triggers(1), WindowAction::Ignore);
    assert!(window.is_pending());
    assert_eq!(window.on_expired(), WindowAction::FireAndArm);
    assert_eq!(window.on_expired(), WindowAction::Disarm);
}

#[test]
fn test_expiry_while_idle_is_ignored() {
    let mut window = ThrottleWindow::new(true);
    assert_eq!(window.on_expired(), WindowAction::Ignore);
    assert_eq!(window.state(), WindowState::Idle);
}

#[test]
fn test_idle_window_fires_leading_edge_again() {
    let mut window = ThrottleWindow::new(false);

    for _ in 0..3 {
        assert_eq!(window.on_triggers(1), WindowAction::FireAndArm);
        assert_eq!(window.on_expired(), WindowAction::Disarm);
    }
}

#[test]
fn test_fires_never_exceed_one_per_period() {
    // Simulate a trigger storm: every period sees triggers, fires stay at one per expiry
    let mut window = ThrottleWindow::new(true);
    let mut fires = 0;

    if window.on_triggers(3) == WindowAction::FireAndArm {
        fires += 1;
    }
    for _ in 0..10 {
        window.on_triggers(4);
        if window.on_expired() == WindowAction::FireAndArm {
            fires += 1;
        }
    }

    // One leading edge plus one trailing fire per elapsed period
    assert_eq!(fires, 11);
}

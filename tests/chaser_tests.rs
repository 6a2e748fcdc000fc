//! Integration tests for Chaser with the thread-backed step timer

mod common;
use common::*;

use led_chaser::{Chaser, ChaserConfig, ChaserError, Command, DispatcherState};

fn start(width: u8, interval_ms: u32) -> (Chaser<RecordingPort>, RecordingPort) {
    let port = RecordingPort::new();
    let config = ChaserConfig::builder()
        .width(width)
        .interval_ms(interval_ms)
        .build()
        .unwrap();
    let chaser = Chaser::start(config, port.clone()).unwrap();
    (chaser, port)
}

#[test]
fn start_turns_outputs_off() {
    let (chaser, port) = start(10, 1);
    assert_eq!(port.history(), [0]);
    assert_eq!(chaser.current_position(), None);
    assert_eq!(chaser.completed_count(), 0);
    assert_eq!(chaser.queued_count(), 0);
    assert_eq!(chaser.interval(), 1);
}

#[test]
fn forward_sequence_runs_to_completion() {
    let (chaser, port) = start(10, 1);
    chaser.enqueue(Command::Forward).unwrap();

    assert!(wait_until(|| chaser.completed_count() == 1));
    assert_eq!(port.steps(), [1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024]);
    assert_eq!(chaser.current_position(), None);
}

#[test]
fn backward_sequence_runs_to_completion() {
    let (chaser, port) = start(10, 1);
    chaser.enqueue(Command::Backward).unwrap();

    assert!(wait_until(|| chaser.completed_count() == 1));
    assert_eq!(port.steps(), [512, 256, 128, 64, 32, 16, 8, 4, 2, 1, 0]);
    assert_eq!(chaser.current_position(), None);
}

#[test]
fn queued_commands_run_in_order_without_overlap() {
    let (chaser, port) = start(4, 1);
    let commands = [
        Command::Backward,
        Command::Forward,
        Command::Forward,
        Command::Backward,
    ];
    for command in commands {
        chaser.enqueue(command).unwrap();
    }

    assert!(wait_until(|| chaser.completed_count() == 4));

    let mut expected = Vec::new();
    for command in commands {
        match command {
            Command::Forward => expected.extend(forward_patterns(4)),
            Command::Backward => expected.extend(backward_patterns(4)),
        }
    }
    assert_eq!(port.steps(), expected);
    assert!(wait_until(|| chaser.dispatcher_state() == DispatcherState::Idle));
}

#[test]
fn overfilling_queue_rejects_exactly_one_command() {
    // Long interval keeps the first sequence busy while the queue fills.
    let port = RecordingPort::new();
    let config = ChaserConfig::builder().interval_ms(10_000).build().unwrap();
    let mut chaser: Chaser<RecordingPort, 4> = Chaser::start(config, port.clone()).unwrap();

    chaser.enqueue(Command::Forward).unwrap();
    assert!(wait_until(|| chaser.dispatcher_state() == DispatcherState::Running));

    let attempts = [
        Command::Backward,
        Command::Forward,
        Command::Backward,
        Command::Backward,
        Command::Forward,
    ];
    let results: Vec<_> = attempts.iter().map(|c| chaser.enqueue(*c)).collect();

    let rejected = results.iter().filter(|r| r.is_err()).count();
    assert_eq!(rejected, 1);
    assert_eq!(results[4], Err(ChaserError::QueueFull { capacity: 4 }));
    assert_eq!(chaser.queued_preview().as_slice(), &attempts[..4]);

    chaser.stop();
}

#[test]
fn accepted_commands_dispatch_in_enqueue_order() {
    let port = RecordingPort::new();
    let config = ChaserConfig::builder().width(2).interval_ms(1).build().unwrap();
    let chaser: Chaser<RecordingPort, 3> = Chaser::start(config, port.clone()).unwrap();

    // The dispatcher may already hold the first command, so allow one extra slot.
    let mut accepted = Vec::new();
    let mut rejected = 0;
    let attempts = [
        Command::Backward,
        Command::Forward,
        Command::Backward,
        Command::Forward,
        Command::Backward,
    ];
    for command in attempts {
        match chaser.enqueue(command) {
            Ok(()) => accepted.push(command),
            Err(ChaserError::QueueFull { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error {other}"),
        }
    }
    assert!(accepted.len() >= 3);
    assert_eq!(accepted.len() + rejected, 5);

    let total = accepted.len() as u32;
    assert!(wait_until(|| chaser.completed_count() == total));

    let mut expected = Vec::new();
    for command in accepted {
        match command {
            Command::Forward => expected.extend(forward_patterns(2)),
            Command::Backward => expected.extend(backward_patterns(2)),
        }
    }
    assert_eq!(port.steps(), expected);
}

#[test]
fn write_path_parses_tokens() {
    let (chaser, _port) = start(10, 10_000);
    chaser.enqueue(Command::Forward).unwrap();
    assert!(wait_until(|| chaser.dispatcher_state() == DispatcherState::Running));

    assert_eq!(chaser.write(b"up\n"), Ok(3));
    assert_eq!(chaser.write(b"down"), Ok(4));
    assert_eq!(chaser.write(b"sideways\n"), Err(ChaserError::InvalidCommand));
    assert_eq!(chaser.write(b"up\n            x"), Err(ChaserError::InvalidCommand));

    assert_eq!(
        chaser.queued_preview().as_slice(),
        &[Command::Forward, Command::Backward]
    );
}

#[test]
fn zero_interval_is_rejected() {
    let (chaser, _port) = start(10, 250);
    assert_eq!(chaser.set_interval(0), Err(ChaserError::InvalidInterval));
    assert_eq!(chaser.interval(), 250);
    assert_eq!(chaser.store_interval("0\n"), Err(ChaserError::InvalidInterval));
    assert_eq!(chaser.interval(), 250);

    chaser.set_interval(5).unwrap();
    assert_eq!(chaser.interval(), 5);
    assert_eq!(chaser.store_interval("0x20\n"), Ok(32));
    assert_eq!(chaser.interval(), 32);
}

#[test]
fn interval_change_leaves_scheduled_step_alone() {
    let (chaser, _port) = start(10, 10_000);
    chaser.enqueue(Command::Forward).unwrap();

    // First step fires immediately and schedules the second 10 s out.
    assert!(wait_until(|| chaser.current_position() == Some(1)));
    chaser.set_interval(1).unwrap();

    // The already-scheduled arm keeps its old deadline.
    std::thread::sleep(std::time::Duration::from_millis(50));
    assert_eq!(chaser.current_position(), Some(1));
    assert_eq!(chaser.completed_count(), 0);
}

#[test]
fn stop_mid_sequence_abandons_queue_and_clears_output() {
    let (mut chaser, port) = start(10, 20);
    chaser.enqueue(Command::Forward).unwrap();
    chaser.enqueue(Command::Backward).unwrap();
    chaser.enqueue(Command::Forward).unwrap();

    assert!(wait_until(|| chaser.current_position() >= Some(2)));
    chaser.stop();

    assert!(chaser.is_stopped());
    assert_eq!(port.last(), Some(0));
    assert_eq!(chaser.completed_count(), 0);
    assert_eq!(chaser.current_position(), None);
    assert_eq!(chaser.queued_count(), 2);
    assert_eq!(chaser.dispatcher_state(), DispatcherState::Stopped);

    // Nothing fires after stop.
    let written = port.history().len();
    std::thread::sleep(std::time::Duration::from_millis(60));
    assert_eq!(port.history().len(), written);

    // Second stop is a no-op.
    chaser.stop();
    assert_eq!(port.history().len(), written);
}

#[test]
fn drop_stops_the_chaser() {
    let port = RecordingPort::new();
    {
        let config = ChaserConfig::builder().interval_ms(5).build().unwrap();
        let chaser: Chaser<RecordingPort> = Chaser::start(config, port.clone()).unwrap();
        chaser.enqueue(Command::Backward).unwrap();
        assert!(wait_until(|| chaser.current_position().is_some()));
    }
    assert_eq!(port.last(), Some(0));
}

#[test]
fn telemetry_reflects_running_state() {
    let (chaser, _port) = start(10, 10_000);
    chaser.enqueue(Command::Backward).unwrap();
    assert!(wait_until(|| chaser.current_position() == Some(8)));
    chaser.enqueue(Command::Forward).unwrap();

    let telemetry = chaser.telemetry();
    assert_eq!(telemetry.interval_ms, 10_000);
    assert_eq!(telemetry.current_position, Some(8));
    assert_eq!(telemetry.completed, 0);
    assert_eq!(telemetry.queued_count(), 1);
    assert_eq!(telemetry.dispatcher, DispatcherState::Running);

    let mut preview = String::new();
    telemetry.write_preview(&mut preview).unwrap();
    assert_eq!(preview, "up\n");
}

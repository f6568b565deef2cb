//! Performance benchmarks for the hot paths of the movement core.

use bincode::{deserialize, serialize};
use client::prediction::PredictionController;
use client::snapshot_buffer::SnapshotBuffer;
use glam::Vec3;
use server::input_queue::InputQueue;
use shared::{
    BoxWorld, MovementConfig, MovementSimulator, MovementState, Packet, Snapshot, TickInput,
};
use std::time::Instant;

const DT: f32 = 1.0 / 64.0;

fn forward(seq: u64) -> TickInput {
    TickInput::new(if seq % 5 == 0 { 1.0 } else { 0.0 }, 1.0)
        .with_sequence(seq)
        .with_jump(seq % 64 == 0, false)
}

/// Benchmarks raw simulator throughput: one player must cost far less than a
/// tick even at 128 Hz.
#[test]
fn benchmark_simulator_step() {
    let simulator = MovementSimulator::new(BoxWorld::arena(), MovementConfig::default());
    let mut state = MovementState::spawn(Vec3::new(0.0, 0.01, 0.0));

    let iterations = 100_000u64;
    let start = Instant::now();

    for i in 0..iterations {
        state = simulator.step(&state, &forward(i + 1), DT);
    }

    let duration = start.elapsed();
    println!(
        "Simulator step: {} ticks in {:?} ({:.2} ns/tick)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(state.is_finite());
    // 100k ticks should finish in well under 2 seconds.
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks prediction: the per-frame cost on the client.
#[test]
fn benchmark_client_prediction() {
    let mut controller = PredictionController::new(
        MovementConfig::default(),
        MovementState::spawn(Vec3::new(0.0, 0.01, 0.0)),
        DT,
    );

    let iterations = 10_000u64;
    let start = Instant::now();

    for i in 0..iterations {
        controller.predict(forward(i + 1));
    }

    let duration = start.elapsed();
    println!(
        "Client prediction: {} predictions in {:?} ({:.2} μs/prediction)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks reconciliation with a realistically sized unacknowledged
/// history. The replay runs synchronously inside a tick, so it has to be
/// cheap.
#[test]
fn benchmark_reconciliation_replay() {
    let mut controller = PredictionController::new(
        MovementConfig::default(),
        MovementState::spawn(Vec3::new(0.0, 0.01, 0.0)),
        DT,
    );

    // Two broadcast intervals of backlog at 64 Hz.
    let backlog = 128u64;
    let iterations = 200;
    let start = Instant::now();

    let mut base = 0u64;
    for _ in 0..iterations {
        for seq in 1..=backlog {
            controller.predict(forward(base + seq));
        }
        let authoritative = *controller.state();
        // Half the history acknowledged: prune 64, replay 64.
        controller.reconcile(authoritative, base + backlog / 2);
        controller.reconcile(*controller.state(), base + backlog);
        base += backlog;
    }

    let duration = start.elapsed();
    println!(
        "Reconciliation: {} cycles in {:?} ({:.2} μs/cycle)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}

/// Benchmarks snapshot serialization at a full server (16 players).
#[test]
fn benchmark_snapshot_serialization() {
    let mut snapshot = Snapshot {
        tick: 12_345,
        timestamp: 1_234_567_890,
        ..Snapshot::default()
    };
    for id in 1..=16u32 {
        let mut state = MovementState::spawn(Vec3::new(id as f32, 0.0, -(id as f32)));
        state.velocity = Vec3::new(4.0, 0.0, 2.0);
        state.on_floor = true;
        snapshot.players.insert(id, state);
        snapshot.last_processed_input.insert(id, id as u64 * 10);
    }
    let packet = Packet::Snapshot { snapshot };

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let serialized = serialize(&packet).unwrap();
        let _deserialized: Packet = deserialize(&serialized).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Snapshot serialization: {} roundtrips in {:?} ({:.2} μs/roundtrip)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 2000);
}

/// Benchmarks the input queue under churn, including the eviction path.
#[test]
fn benchmark_input_queue_churn() {
    let mut queue = InputQueue::default();

    let iterations = 100_000u64;
    let start = Instant::now();

    for seq in 1..=iterations {
        queue.enqueue(forward(seq));
        if seq % 3 == 0 {
            let _ = queue.dequeue();
        }
    }

    let duration = start.elapsed();
    println!(
        "Input queue: {} enqueues in {:?} ({:.2} ns/op)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks interpolation sampling, the per-remote-player per-frame cost.
#[test]
fn benchmark_snapshot_buffer_sampling() {
    let mut buffer = SnapshotBuffer::new(100, false);
    for i in 0..32u64 {
        let state = MovementState::spawn(Vec3::new(i as f32, 0.0, 0.0));
        buffer.push(1000 + i * 50, state);
    }

    let iterations = 100_000u64;
    let start = Instant::now();

    let mut checksum = 0.0f32;
    for i in 0..iterations {
        let now = 1100 + (i % 1500);
        if let Some(state) = buffer.sample(now) {
            checksum += state.transform.origin.x;
        }
    }

    let duration = start.elapsed();
    println!(
        "Snapshot sampling: {} samples in {:?} ({:.2} ns/sample, checksum {})",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64,
        checksum
    );

    assert!(duration.as_millis() < 1000);
}

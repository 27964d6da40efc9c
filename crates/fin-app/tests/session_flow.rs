//! End-to-end session behaviour: single-flight runs and snapshot handling.

use fin_app::guard::SolveFn;
use fin_app::{ExecutionGuard, FinConfig, Session, SolveEvent, SubmitOutcome, config};
use fin_solver::{FinParameters, ParameterUpdate, solve};
use std::sync::mpsc::{Sender, channel};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn gated_session(n: usize) -> (Session, Sender<()>) {
    let (go_tx, go_rx) = channel::<()>();
    let go_rx = Mutex::new(go_rx);
    let solver: SolveFn = Arc::new(move |params, n| {
        let _ = go_rx
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(10));
        solve(params, n)
    });
    let (guard, events) = ExecutionGuard::with_solver(n, solver);
    (Session::with_guard(guard, events), go_tx)
}

#[test]
fn snapshot_keeps_parameters_of_the_run() {
    let (mut session, go) = gated_session(32);
    assert_eq!(session.run().unwrap(), SubmitOutcome::Dispatched);

    // edit while the solve is in flight
    session.apply(&ParameterUpdate {
        k: Some(400.0),
        ..ParameterUpdate::default()
    });
    go.send(()).unwrap();
    session.wait().unwrap();

    let snap = session.snapshot().expect("snapshot after completion");
    assert_eq!(snap.params.k, 15.0);
    assert_eq!(session.params().k, 400.0);
}

#[test]
fn second_run_rejected_while_first_outstanding() {
    let (mut session, go) = gated_session(8);
    assert_eq!(session.run().unwrap(), SubmitOutcome::Dispatched);
    assert_eq!(session.run().unwrap(), SubmitOutcome::AlreadyRunning);
    assert_eq!(session.run().unwrap(), SubmitOutcome::AlreadyRunning);

    go.send(()).unwrap();
    assert!(matches!(
        session.wait().unwrap(),
        SolveEvent::Completed { .. }
    ));
    assert!(session.poll().is_none());

    // accepted again once idle
    assert_eq!(session.run().unwrap(), SubmitOutcome::Dispatched);
    go.send(()).unwrap();
    session.wait().unwrap();
}

#[test]
fn poll_returns_while_next_run_is_in_flight() {
    let (mut session, go) = gated_session(16);
    assert_eq!(session.run().unwrap(), SubmitOutcome::Dispatched);
    go.send(()).unwrap();
    let deadline = Instant::now() + Duration::from_secs(10);
    while session.is_running() {
        assert!(Instant::now() < deadline, "first run never finished");
        std::thread::yield_now();
    }

    // start the next run before the first completion is picked up
    assert_eq!(session.run().unwrap(), SubmitOutcome::Dispatched);
    assert!(session.is_running());

    let started = Instant::now();
    let event = session.poll();
    let elapsed = started.elapsed();
    assert!(matches!(event, Some(SolveEvent::Completed { .. })));
    assert!(elapsed < Duration::from_secs(2), "poll took {elapsed:?}");
    assert!(session.is_running());
    assert!(session.snapshot().is_some());

    go.send(()).unwrap();
    assert!(matches!(
        session.wait().unwrap(),
        SolveEvent::Completed { .. }
    ));
    assert!(!session.is_running());
    assert!(session.poll().is_none());
}

#[test]
fn failure_keeps_previous_snapshot() {
    let mut session = Session::new(16);
    session.run().unwrap();
    session.wait().unwrap();
    let good = session.snapshot().unwrap();

    session.apply(&ParameterUpdate {
        thickness: Some(0.0),
        ..ParameterUpdate::default()
    });
    session.run().unwrap();
    match session.wait().unwrap() {
        SolveEvent::Failed { message, params } => {
            assert!(message.contains("t must be > 0"), "{message}");
            assert_eq!(params.thickness, 0.0);
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let still = session.snapshot().unwrap();
    assert_eq!(still.run_id, good.run_id);
    assert!(Arc::ptr_eq(&still, &good));
}

#[test]
fn one_event_per_accepted_submission() {
    let mut session = Session::new(64);
    let mut dispatched = 0;
    let mut completed = 0;
    for _ in 0..200 {
        if session.run().unwrap() == SubmitOutcome::Dispatched {
            dispatched += 1;
        }
        if session.poll().is_some() {
            completed += 1;
        }
    }
    while session.is_running() || completed < dispatched {
        match session.wait() {
            Ok(_) => completed += 1,
            Err(_) => break,
        }
    }
    assert!(dispatched >= 1);
    assert_eq!(dispatched, completed);
}

#[test]
fn export_collaborator_sees_complete_snapshot() {
    let mut session = Session::new(20);
    let cell = session.snapshot_cell();
    assert!(cell.is_empty());
    session.run().unwrap();
    session.wait().unwrap();

    let text = fin_results::to_table_string(&cell.get().unwrap()).unwrap();
    let table = fin_results::read_table(&text).unwrap();
    assert_eq!(table.positions.len(), 20);
    assert_eq!(table.params, FinParameters::default());
}

#[test]
fn config_file_roundtrip() {
    let temp_dir = std::env::temp_dir().join("fin_app_config_test");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();
    let path = temp_dir.join("fin.yaml");

    let cfg = FinConfig {
        parameters: ParameterUpdate {
            h: Some(45.0),
            ..ParameterUpdate::default()
        },
        sample_count: 120,
        presets: Vec::new(),
    };
    config::save_yaml(&path, &cfg).unwrap();
    let loaded = config::load_yaml(&path).unwrap();
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.initial_parameters().h, 45.0);
}

#[test]
fn missing_config_file_names_path() {
    let path = std::env::temp_dir().join("fin_app_missing").join("nope.yaml");
    let err = config::load_yaml(&path).unwrap_err();
    assert!(err.to_string().contains("nope.yaml"));
}

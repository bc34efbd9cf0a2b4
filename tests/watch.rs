// ABOUTME: Tests for the watch loop's serialisation and coalescing of redeployments.
// ABOUTME: Drives the loop with scripted change messages and a counting run function.

use atroctl::deploy::{DeployError, DeployReport};
use atroctl::output::{Output, OutputMode};
use atroctl::types::{DeployId, Slot};
use atroctl::watch::{self, WatchMessage};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

fn changed(name: &str) -> WatchMessage {
    WatchMessage::Changed(PathBuf::from(name))
}

fn report() -> DeployReport {
    DeployReport {
        id: DeployId::from(Slot::Green),
        secrets: 0,
        function_bytes: 1,
        statics: 0,
    }
}

fn quiet() -> Output {
    Output::new(OutputMode::Quiet)
}

#[tokio::test]
async fn changes_during_a_run_produce_one_follow_up() {
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(changed("src/index.js")).unwrap();

    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let mut during_first_run = Some(tx);

    watch::drive(
        rx,
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(tx) = during_first_run.take() {
                tx.send(changed("src/a.js")).unwrap();
                tx.send(changed("src/b.js")).unwrap();
            }
            async { Ok::<_, DeployError>(report()) }
        },
        &quiet(),
    )
    .await;

    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn runs_never_overlap() {
    let (tx, rx) = mpsc::unbounded_channel();
    for i in 0..5 {
        tx.send(changed(&format!("src/{i}.js"))).unwrap();
    }
    drop(tx);

    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let runs = Arc::new(AtomicUsize::new(0));

    let (flight, max, count) = (
        Arc::clone(&in_flight),
        Arc::clone(&max_in_flight),
        Arc::clone(&runs),
    );
    watch::drive(
        rx,
        move || {
            let (flight, max, count) = (Arc::clone(&flight), Arc::clone(&max), Arc::clone(&count));
            async move {
                let now = flight.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                count.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, DeployError>(report())
            }
        },
        &quiet(),
    )
    .await;

    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    // The first message starts a run; the four queued behind it coalesce into one more.
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_run_does_not_stop_the_loop() {
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(changed("src/index.js")).unwrap();

    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let mut sender = Some(tx);

    watch::drive(
        rx,
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let result = if n == 0 {
                Err(DeployError::UnknownSlot {
                    reported: String::new(),
                })
            } else {
                Ok(report())
            };
            // Once the first run has failed, one more change arrives and then the source closes.
            if n == 0
                && let Some(tx) = sender.take()
            {
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    tx.send(changed("src/index.js")).unwrap();
                });
            }
            async move { result }
        },
        &quiet(),
    )
    .await;

    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn source_errors_are_not_fatal_and_do_not_trigger_runs() {
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(WatchMessage::SourceError("queue overflow".to_string()))
        .unwrap();
    tx.send(changed("src/index.js")).unwrap();
    drop(tx);

    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    watch::drive(
        rx,
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, DeployError>(report()) }
        },
        &quiet(),
    )
    .await;

    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn writes_under_watched_directories_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("lib");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(nested.join("util.js"), "").unwrap();

    let (watcher, mut events) = watch::start(&[dir.path()]).unwrap();
    assert_eq!(watcher.dirs().len(), 2);

    std::fs::write(nested.join("util.js"), "export const x = 1;\n").unwrap();

    let message = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match events.recv().await {
                Some(WatchMessage::Changed(path)) => return Some(path),
                Some(WatchMessage::SourceError(_)) => continue,
                None => return None,
            }
        }
    })
    .await
    .expect("no change reported");

    assert!(message.unwrap().ends_with("util.js"));
}

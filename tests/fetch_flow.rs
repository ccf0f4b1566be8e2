//! Fetch lifecycle against a source whose responses the test releases by hand

use contactdir::{
    Contact, ContactQuery, ContactSource, Debouncer, DirectoryError, FetchController, FetchState,
    FETCH_FAILED_MESSAGE,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

enum Reply {
    Rows(Vec<Contact>),
    Fail(u16),
}

/// Each fetch blocks until the test sends a reply for its search term.
struct GatedSource {
    gates: Mutex<HashMap<String, Receiver<Reply>>>,
    started: Sender<String>,
}

impl GatedSource {
    fn new(terms: &[&str]) -> (Arc<Self>, HashMap<String, Sender<Reply>>, Receiver<String>) {
        let mut gates = HashMap::new();
        let mut senders = HashMap::new();
        for term in terms {
            let (tx, rx) = unbounded();
            gates.insert(term.to_string(), rx);
            senders.insert(term.to_string(), tx);
        }
        let (started_tx, started_rx) = unbounded();
        let source = Arc::new(Self {
            gates: Mutex::new(gates),
            started: started_tx,
        });
        (source, senders, started_rx)
    }
}

impl ContactSource for GatedSource {
    fn fetch(&self, query: &ContactQuery) -> contactdir::Result<Vec<Contact>> {
        let term = query.search_term().unwrap_or("").to_string();
        let gate = self.gates.lock().unwrap().get(&term).cloned();
        let _ = self.started.send(term.clone());
        match gate.and_then(|rx| rx.recv().ok()) {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Fail(status)) => Err(DirectoryError::from_status(status, "gated failure")),
            None => Err(DirectoryError::WorkerLost),
        }
    }

    fn count(&self) -> contactdir::Result<Option<u64>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

fn contact(id: i64, name: &str, company: &str) -> Contact {
    Contact::new(id, name, format!("{}@mail.test", id), "555", company)
}

fn wait_started(started: &Receiver<String>, n: usize) {
    for _ in 0..n {
        started.recv_timeout(Duration::from_secs(5)).unwrap();
    }
}

/// Pump until `done` holds or five seconds pass.
fn pump_until(fetch: &mut FetchController, done: impl Fn(&FetchController) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(fetch) {
        assert!(Instant::now() < deadline, "timed out");
        fetch.pump();
        std::thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn slow_superseded_response_never_overwrites_newer_result() {
    let (source, gates, started) = GatedSource::new(&["a", "ab"]);
    let mut fetch = FetchController::new(source);

    let first = fetch.retrieve("a");
    let second = fetch.retrieve("ab");
    assert!(second > first);
    wait_started(&started, 2);

    // second request completes first
    gates["ab"].send(Reply::Rows(vec![contact(2, "Abby", "X")])).unwrap();
    pump_until(&mut fetch, |f| !f.machine().is_loading());
    assert_eq!(fetch.machine().contacts()[0].name, "Abby");

    // then the stale one arrives
    gates["a"]
        .send(Reply::Rows(vec![contact(1, "Al", "X"), contact(2, "Abby", "X")]))
        .unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert!(!fetch.pump());
    assert_eq!(fetch.machine().contacts().len(), 1);
    assert_eq!(fetch.machine().query(), "ab");
}

#[test]
fn stale_failure_does_not_replace_success() {
    let (source, gates, started) = GatedSource::new(&["a", "ab"]);
    let mut fetch = FetchController::new(source);

    fetch.retrieve("a");
    fetch.retrieve("ab");
    wait_started(&started, 2);

    gates["ab"].send(Reply::Rows(vec![])).unwrap();
    pump_until(&mut fetch, |f| !f.machine().is_loading());
    gates["a"].send(Reply::Fail(500)).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    fetch.pump();

    assert_eq!(fetch.machine().state(), &FetchState::Success(vec![]));
}

#[test]
fn loading_persists_until_the_latest_request_finishes() {
    let (source, gates, started) = GatedSource::new(&["a", "ab"]);
    let mut fetch = FetchController::new(source);

    fetch.retrieve("a");
    fetch.retrieve("ab");
    wait_started(&started, 2);

    gates["a"].send(Reply::Rows(vec![contact(1, "Al", "X")])).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    fetch.pump();
    assert!(fetch.machine().is_loading());
    assert!(fetch.machine().is_initial_loading());
    assert!(fetch.machine().contacts().is_empty());

    gates["ab"].send(Reply::Rows(vec![])).unwrap();
    pump_until(&mut fetch, |f| !f.machine().is_loading());
    assert!(!fetch.machine().is_initial_loading());
}

#[test]
fn retry_after_failure_recovers() {
    let (source, gates, started) = GatedSource::new(&["acme"]);
    let mut fetch = FetchController::new(source);

    fetch.retrieve("acme");
    wait_started(&started, 1);
    gates["acme"].send(Reply::Fail(503)).unwrap();
    pump_until(&mut fetch, |f| !f.machine().is_loading());
    assert_eq!(fetch.machine().error(), Some(FETCH_FAILED_MESSAGE));

    fetch.retry().expect("retry is offered in error state");
    assert!(fetch.machine().error().is_none());
    wait_started(&started, 1);
    gates["acme"]
        .send(Reply::Rows(vec![contact(1, "Jane", "Acme Corp")]))
        .unwrap();
    pump_until(&mut fetch, |f| !f.machine().is_loading());

    assert!(matches!(fetch.machine().state(), FetchState::Success(rows) if rows.len() == 1));
    assert!(fetch.retry().is_none());
}

#[test]
fn debounced_burst_issues_a_single_retrieval() {
    let (source, gates, started) = GatedSource::new(&["", "jan"]);
    let mut fetch = FetchController::new(source);
    let mut debouncer = Debouncer::new(String::new(), Duration::from_millis(300));

    // mount
    fetch.retrieve(debouncer.value());
    wait_started(&started, 1);
    gates[""].send(Reply::Rows(vec![])).unwrap();
    pump_until(&mut fetch, |f| !f.machine().is_loading());

    let t0 = Instant::now();
    for (i, text) in ["j", "ja", "jan"].iter().enumerate() {
        let at = t0 + Duration::from_millis(i as u64 * 120);
        debouncer.arm(text.to_string(), at);
        if let Some(q) = debouncer.poll(at) {
            fetch.retrieve(&q);
        }
    }
    for step in 0..20 {
        if let Some(q) = debouncer.poll(t0 + Duration::from_millis(step * 50)) {
            fetch.retrieve(&q);
        }
    }

    wait_started(&started, 1);
    assert!(started.recv_timeout(Duration::from_millis(100)).is_err());
    assert_eq!(fetch.machine().latest_ticket().map(|t| t.id()), Some(2));
    assert_eq!(fetch.machine().query(), "jan");

    gates["jan"].send(Reply::Rows(vec![contact(4, "Jan", "Y")])).unwrap();
    pump_until(&mut fetch, |f| !f.machine().is_loading());
    assert_eq!(fetch.machine().contacts().len(), 1);
}

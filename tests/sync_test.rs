//! Sync client scenarios: load/save outcomes driving the link state,
//! the single in-flight invariant, and the self-re-arming poll cadence.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use folio::link::LinkState;
use folio::protocol::Document;
use folio::sync::{RemoteError, RemoteStore, SyncClient, SyncEvent, POLL_INTERVAL};

// ─── Fakes ───────────────────────────────────────────────────────

/// In-memory remote with per-operation failure switches and call counts.
struct ScriptedRemote {
    doc: Mutex<Document>,
    fail_fetch: AtomicBool,
    fail_store: AtomicBool,
    fail_status: AtomicBool,
    /// Accept writes but echo them back as not durably persisted.
    echo_unsaved: AtomicBool,
    fetch_calls: AtomicUsize,
    store_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl ScriptedRemote {
    fn new(content: &str, title: &str, saved: bool) -> Self {
        Self {
            doc: Mutex::new(Document {
                content: content.to_string(),
                title: title.to_string(),
                saved,
            }),
            fail_fetch: AtomicBool::new(false),
            fail_store: AtomicBool::new(false),
            fail_status: AtomicBool::new(false),
            echo_unsaved: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            store_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }
}

impl RemoteStore for ScriptedRemote {
    fn fetch(&self) -> Result<Document, RemoteError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        Ok(self.doc.lock().unwrap().clone())
    }

    fn store(&self, doc: &Document) -> Result<Document, RemoteError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        let mut held = self.doc.lock().unwrap();
        *held = doc.clone();
        if self.echo_unsaved.load(Ordering::SeqCst) {
            held.saved = false;
        }
        Ok(held.clone())
    }

    fn status(&self) -> Result<(), RemoteError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(RemoteError::Status(502));
        }
        Ok(())
    }
}

/// Remote whose saves block until the test releases them, to hold an
/// operation in flight deterministically.
struct GatedRemote {
    release: Mutex<mpsc::Receiver<()>>,
    store_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl GatedRemote {
    fn new() -> (Arc<Self>, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let remote = Arc::new(Self {
            release: Mutex::new(rx),
            store_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        });
        (remote, tx)
    }
}

impl RemoteStore for GatedRemote {
    fn fetch(&self) -> Result<Document, RemoteError> {
        Err(RemoteError::Transport("not used".to_string()))
    }

    fn store(&self, doc: &Document) -> Result<Document, RemoteError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        self.release.lock().unwrap().recv().ok();
        Ok(doc.clone())
    }

    fn status(&self) -> Result<(), RemoteError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn client_for(remote: &Arc<ScriptedRemote>) -> SyncClient {
    SyncClient::new(Arc::clone(remote) as Arc<dyn RemoteStore>)
}

/// An instant safely past the next poll deadline.
fn past_poll_deadline() -> Instant {
    Instant::now() + POLL_INTERVAL + Duration::from_secs(1)
}

// ─── Load ────────────────────────────────────────────────────────

#[test]
fn load_success_links_clean_and_reports_the_document() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    assert!(client.request_load());
    let events = client.settle(&mut link);

    assert_eq!(link, LinkState::Linked { dirty: false });
    assert_eq!(
        events,
        vec![SyncEvent::DocumentLoaded {
            content: "hello".to_string(),
            title: "doc".to_string(),
        }]
    );
}

#[test]
fn load_with_saved_false_delivers_content_but_unlinks() {
    let remote = Arc::new(ScriptedRemote::new("draft", "doc", false));
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    client.request_load();
    let events = client.settle(&mut link);

    assert_eq!(link, LinkState::Unlinked);
    assert!(matches!(events[0], SyncEvent::DocumentLoaded { .. }));
}

#[test]
fn load_failure_unlinks_silently() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    remote.fail_fetch.store(true, Ordering::SeqCst);
    let mut client = client_for(&remote);
    let mut link = LinkState::Linked { dirty: false };

    client.request_load();
    let events = client.settle(&mut link);

    assert_eq!(link, LinkState::Unlinked);
    assert!(events.is_empty());
}

// ─── Dirty / clean classification ────────────────────────────────

#[test]
fn edits_reclassify_without_any_network_call() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    client.request_load();
    client.settle(&mut link);
    assert_eq!(link, LinkState::Linked { dirty: false });

    client.reclassify("hello!", &mut link);
    assert_eq!(link, LinkState::Linked { dirty: true });

    // Reverting the edit by hand is clean again — no network involved.
    client.reclassify("hello", &mut link);
    assert_eq!(link, LinkState::Linked { dirty: false });

    assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote.store_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn reclassify_before_any_snapshot_is_a_noop() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    let client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    client.reclassify("anything", &mut link);
    assert_eq!(link, LinkState::Unlinked);
}

// ─── Save ────────────────────────────────────────────────────────

#[test]
fn save_success_adopts_the_servers_echo() {
    let remote = Arc::new(ScriptedRemote::new("", "Untitled", true));
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    assert!(client.request_save("hello!", "doc"));
    let events = client.settle(&mut link);

    assert_eq!(link, LinkState::Linked { dirty: false });
    assert_eq!(
        events,
        vec![SyncEvent::DocumentSaved {
            content: "hello!".to_string(),
            title: "doc".to_string(),
        }]
    );
    // The echo becomes the snapshot.
    client.reclassify("hello!", &mut link);
    assert_eq!(link, LinkState::Linked { dirty: false });
}

#[test]
fn save_failure_unlinks_from_any_prior_state_and_reports() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    remote.fail_store.store(true, Ordering::SeqCst);
    let mut client = client_for(&remote);
    let mut link = LinkState::Linked { dirty: true };

    client.request_save("hello!", "doc");
    let events = client.settle(&mut link);

    assert_eq!(link, LinkState::Unlinked);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SyncEvent::SaveFailed(_)));
}

#[test]
fn save_echoed_as_unsaved_unlinks_without_a_notice() {
    let remote = Arc::new(ScriptedRemote::new("", "Untitled", true));
    remote.echo_unsaved.store(true, Ordering::SeqCst);
    let mut client = client_for(&remote);
    let mut link = LinkState::Linked { dirty: true };

    client.request_save("hello", "doc");
    let events = client.settle(&mut link);

    // The write went through but the server would not call it persisted:
    // the link drops, and there is no interrupting failure event.
    assert_eq!(link, LinkState::Unlinked);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SyncEvent::DocumentSaved { .. }));
}

// ─── Single in-flight invariant ──────────────────────────────────

#[test]
fn second_request_while_one_is_in_flight_is_dropped() {
    let (remote, release) = GatedRemote::new();
    let mut client = SyncClient::new(Arc::clone(&remote) as Arc<dyn RemoteStore>);
    let mut link = LinkState::Unlinked;

    assert!(client.request_save("first", "doc"));
    assert!(client.in_flight());

    // Dropped, not queued — and loads are refused just the same.
    assert!(!client.request_save("second", "doc"));
    assert!(!client.request_load());

    release.send(()).unwrap();
    let events = client.settle(&mut link);

    assert_eq!(remote.store_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        events,
        vec![SyncEvent::DocumentSaved {
            content: "first".to_string(),
            title: "doc".to_string(),
        }]
    );
}

// ─── Poll cadence ────────────────────────────────────────────────

#[test]
fn poll_does_not_fire_before_its_deadline() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    client.tick(Instant::now(), &mut link);
    assert!(!client.in_flight());
    assert_eq!(remote.status_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn poll_failure_unlinks() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    remote.fail_status.store(true, Ordering::SeqCst);
    let mut client = client_for(&remote);
    let mut link = LinkState::Linked { dirty: false };

    client.tick(past_poll_deadline(), &mut link);
    assert!(client.in_flight());
    let events = client.settle(&mut link);

    assert_eq!(link, LinkState::Unlinked);
    assert!(events.is_empty());
}

#[test]
fn poll_success_while_clean_chains_a_reload() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    client.request_load();
    client.settle(&mut link);
    assert_eq!(link, LinkState::Linked { dirty: false });

    // Remote content changes out of band.
    remote.doc.lock().unwrap().content = "hello from elsewhere".to_string();

    client.tick(past_poll_deadline(), &mut link);
    client.settle(&mut link); // poll completes, chains the reload
    let events = client.settle(&mut link); // reload completes

    assert_eq!(
        events,
        vec![SyncEvent::DocumentLoaded {
            content: "hello from elsewhere".to_string(),
            title: "doc".to_string(),
        }]
    );
    assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn poll_success_while_dirty_never_touches_the_buffer() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    client.request_load();
    client.settle(&mut link);
    client.reclassify("hello!", &mut link);
    assert_eq!(link, LinkState::Linked { dirty: true });

    client.tick(past_poll_deadline(), &mut link);
    let events = client.settle(&mut link);

    assert!(events.is_empty());
    assert_eq!(link, LinkState::Linked { dirty: true });
    assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn poll_success_while_unlinked_changes_nothing() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    client.tick(past_poll_deadline(), &mut link);
    let events = client.settle(&mut link);

    assert!(events.is_empty());
    assert_eq!(link, LinkState::Unlinked);
    assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn poll_cadence_survives_failures() {
    let remote = Arc::new(ScriptedRemote::new("hello", "doc", true));
    remote.fail_status.store(true, Ordering::SeqCst);
    let mut client = client_for(&remote);
    let mut link = LinkState::Unlinked;

    let first = past_poll_deadline();
    client.tick(first, &mut link);
    client.settle(&mut link);

    client.tick(first + POLL_INTERVAL, &mut link);
    client.settle(&mut link);

    assert_eq!(remote.status_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn poll_skips_while_an_operation_is_in_flight_but_keeps_its_cadence() {
    let (remote, release) = GatedRemote::new();
    let mut client = SyncClient::new(Arc::clone(&remote) as Arc<dyn RemoteStore>);
    let mut link = LinkState::Unlinked;

    client.request_save("held", "doc");

    // Deadline passes while the save is still in flight: skipped, no stack.
    let first = past_poll_deadline();
    client.tick(first, &mut link);
    assert_eq!(remote.status_calls.load(Ordering::SeqCst), 0);

    release.send(()).unwrap();
    client.settle(&mut link);

    // The deadline was still re-armed at skip time.
    client.tick(first + POLL_INTERVAL, &mut link);
    client.settle(&mut link);
    assert_eq!(remote.status_calls.load(Ordering::SeqCst), 1);
}

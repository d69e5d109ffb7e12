//! Remote synchronization: load, save, and poll against the backing store,
//! translating every outcome into a link-state transition.
//!
//! Operations run on background threads and are drained from `tick()`,
//! so the render loop never blocks on the network. At most one operation
//! is ever in flight; a request arriving while one is outstanding is
//! dropped, not queued.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::link::LinkState;
use crate::protocol::Document;

/// Cadence of the liveness poll. The deadline re-arms every time it
/// fires, whatever the attempt's outcome, so the cadence never stalls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
}

impl From<ureq::Error> for RemoteError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => RemoteError::Status(code),
            ureq::Error::Transport(transport) => RemoteError::Transport(transport.to_string()),
        }
    }
}

impl From<std::io::Error> for RemoteError {
    fn from(err: std::io::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

/// Transport seam to the remote store. Calls block; the sync client runs
/// them on worker threads.
pub trait RemoteStore: Send + Sync {
    /// `GET /api/content`.
    fn fetch(&self) -> Result<Document, RemoteError>;
    /// `POST /api/content`, returning the server's authoritative echo.
    fn store(&self, doc: &Document) -> Result<Document, RemoteError>;
    /// `GET /api/status` liveness probe.
    fn status(&self) -> Result<(), RemoteError>;
}

/// HTTP transport against a `folio-serve` base URL.
pub struct HttpRemote {
    agent: ureq::Agent,
    base: String,
}

impl HttpRemote {
    pub fn new(base: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { agent, base }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base, endpoint)
    }
}

impl RemoteStore for HttpRemote {
    fn fetch(&self) -> Result<Document, RemoteError> {
        let response = self.agent.get(&self.url("content")).call()?;
        Ok(response.into_json()?)
    }

    fn store(&self, doc: &Document) -> Result<Document, RemoteError> {
        let response = self.agent.post(&self.url("content")).send_json(doc)?;
        Ok(response.into_json()?)
    }

    fn status(&self) -> Result<(), RemoteError> {
        self.agent.get(&self.url("status")).call()?;
        Ok(())
    }
}

/// What a completed operation means for the editor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A load completed; the session replaces buffer and title.
    DocumentLoaded { content: String, title: String },
    /// A save completed; the session applies the server's echoed values.
    DocumentSaved { content: String, title: String },
    /// A save failed; the session raises an interrupting notice.
    SaveFailed(String),
}

enum Op {
    Load(Result<Document, RemoteError>),
    Save(Result<Document, RemoteError>),
    Poll(Result<(), RemoteError>),
}

#[derive(Clone, Copy)]
enum OpKind {
    Load,
    Save,
    Poll,
}

struct InFlight {
    kind: OpKind,
    handle: JoinHandle<Op>,
}

/// Orchestrates all communication with the remote store and drives the
/// link state machine from operation outcomes.
pub struct SyncClient {
    remote: Arc<dyn RemoteStore>,
    /// Content as of the most recent successful load or save response.
    /// Only used to classify the buffer as dirty or clean.
    last_saved: Option<String>,
    in_flight: Option<InFlight>,
    next_poll_at: Instant,
}

impl SyncClient {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            remote,
            last_saved: None,
            in_flight: None,
            next_poll_at: Instant::now() + POLL_INTERVAL,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Fetches the remote document. Returns false (skip, not queue) when
    /// any operation is already in flight. Safe as the first call of a
    /// session, before any buffer exists.
    pub fn request_load(&mut self) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        let remote = Arc::clone(&self.remote);
        let handle = std::thread::spawn(move || Op::Load(remote.fetch()));
        self.in_flight = Some(InFlight {
            kind: OpKind::Load,
            handle,
        });
        true
    }

    /// Sends content and title to the store, requesting persistence.
    /// Same skip-on-busy behavior as `request_load`.
    pub fn request_save(&mut self, content: &str, title: &str) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        let doc = Document {
            content: content.to_string(),
            title: title.to_string(),
            saved: true,
        };
        let remote = Arc::clone(&self.remote);
        let handle = std::thread::spawn(move || Op::Save(remote.store(&doc)));
        self.in_flight = Some(InFlight {
            kind: OpKind::Save,
            handle,
        });
        true
    }

    fn request_poll(&mut self) {
        if self.in_flight.is_some() {
            // Skip: a load or save is already talking to the store.
            return;
        }
        let remote = Arc::clone(&self.remote);
        let handle = std::thread::spawn(move || Op::Poll(remote.status()));
        self.in_flight = Some(InFlight {
            kind: OpKind::Poll,
            handle,
        });
    }

    /// Reclassifies the link from the current buffer content: equal to the
    /// snapshot means clean, anything else means dirty. Both are no-ops
    /// while unlinked, and nothing happens before a first snapshot exists.
    pub fn reclassify(&self, content: &str, link: &mut LinkState) {
        match &self.last_saved {
            Some(snapshot) if content == snapshot => link.mark_saved(),
            Some(_) => link.mark_dirty(),
            None => {}
        }
    }

    /// Non-blocking drive, called from the session's tick: drains a
    /// finished operation, applies its outcome, and runs the poll
    /// scheduler.
    pub fn tick(&mut self, now: Instant, link: &mut LinkState) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        if self
            .in_flight
            .as_ref()
            .is_some_and(|op| op.handle.is_finished())
        {
            events.extend(self.join_in_flight(link));
        }
        if now >= self.next_poll_at {
            // Re-arm before attempting: the cadence holds whether this
            // attempt dispatches or skips.
            self.next_poll_at = now + POLL_INTERVAL;
            self.request_poll();
        }
        events
    }

    /// Blocking drive: waits for the in-flight operation (if any) and
    /// applies it. Used when quitting with a save still outstanding.
    pub fn settle(&mut self, link: &mut LinkState) -> Vec<SyncEvent> {
        self.join_in_flight(link)
    }

    fn join_in_flight(&mut self, link: &mut LinkState) -> Vec<SyncEvent> {
        let Some(op) = self.in_flight.take() else {
            return Vec::new();
        };
        let outcome = match op.handle.join() {
            Ok(outcome) => outcome,
            // A panicked worker is indistinguishable from a lost request.
            Err(_) => {
                let err = RemoteError::Transport("worker thread panicked".to_string());
                match op.kind {
                    OpKind::Load => Op::Load(Err(err)),
                    OpKind::Save => Op::Save(Err(err)),
                    OpKind::Poll => Op::Poll(Err(err)),
                }
            }
        };
        self.apply(outcome, link)
    }

    fn apply(&mut self, outcome: Op, link: &mut LinkState) -> Vec<SyncEvent> {
        match outcome {
            Op::Load(Ok(doc)) => {
                self.accept(&doc, link);
                vec![SyncEvent::DocumentLoaded {
                    content: doc.content,
                    title: doc.title,
                }]
            }
            Op::Load(Err(err)) => {
                warn!("load failed: {err}");
                link.mark_unlinked();
                Vec::new()
            }
            Op::Save(Ok(doc)) => {
                self.accept(&doc, link);
                vec![SyncEvent::DocumentSaved {
                    content: doc.content,
                    title: doc.title,
                }]
            }
            Op::Save(Err(err)) => {
                warn!("save failed: {err}");
                link.mark_unlinked();
                vec![SyncEvent::SaveFailed(err.to_string())]
            }
            Op::Poll(Ok(())) => {
                // Reload only while linked and clean; a reload under local
                // edits would clobber them.
                if *link == (LinkState::Linked { dirty: false }) {
                    self.request_load();
                }
                Vec::new()
            }
            Op::Poll(Err(err)) => {
                debug!("poll failed: {err}");
                link.mark_unlinked();
                Vec::new()
            }
        }
    }

    /// Server responses are authoritative: the snapshot follows the
    /// reported content and the link follows the reported persistence
    /// flag, whatever we sent.
    fn accept(&mut self, doc: &Document, link: &mut LinkState) {
        self.last_saved = Some(doc.content.clone());
        if doc.saved {
            link.mark_linked(false);
        } else {
            link.mark_unlinked();
        }
    }
}

//! End-to-end server tests: a real listener on an ephemeral port,
//! exercised through the same HTTP transport the editor uses.

use std::net::SocketAddr;

use folio::protocol::Document;
use folio::server::{self, ServeState};
use folio::store::{self, TextEncoding};
use folio::sync::{HttpRemote, RemoteStore};

async fn spawn_server(state: ServeState) -> SocketAddr {
    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Runs blocking transport calls off the async runtime.
async fn with_remote<T: Send + 'static>(
    addr: SocketAddr,
    f: impl FnOnce(HttpRemote) -> T + Send + 'static,
) -> T {
    tokio::task::spawn_blocking(move || f(HttpRemote::new(format!("http://{addr}"))))
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn status_answers_the_liveness_probe() {
    let dir = tempfile::tempdir().unwrap();
    let state = ServeState::new(None, dir.path().to_path_buf(), TextEncoding::Utf8);
    let addr = spawn_server(state).await;

    with_remote(addr, |remote| remote.status().unwrap()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn load_without_a_bound_file_is_explicitly_unsaved() {
    let dir = tempfile::tempdir().unwrap();
    let state = ServeState::new(None, dir.path().to_path_buf(), TextEncoding::Utf8);
    let addr = spawn_server(state).await;

    let doc = with_remote(addr, |remote| remote.fetch().unwrap()).await;
    assert_eq!(doc.content, "");
    assert_eq!(doc.title, "Untitled");
    assert!(!doc.saved);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let state = ServeState::new(
        Some(path.clone()),
        dir.path().to_path_buf(),
        TextEncoding::Utf8,
    );
    let addr = spawn_server(state).await;

    let echoed = with_remote(addr, |remote| {
        remote
            .store(&Document {
                content: "hello from the wire".to_string(),
                title: "whatever the client thinks".to_string(),
                saved: true,
            })
            .unwrap()
    })
    .await;

    // The server's echo is authoritative: the title comes from the bound
    // file, not from the posted value.
    assert!(echoed.saved);
    assert_eq!(echoed.title, "notes.txt");
    assert_eq!(echoed.content, "hello from the wire");

    let fetched = with_remote(addr, |remote| remote.fetch().unwrap()).await;
    assert!(fetched.saved);
    assert_eq!(fetched.content, "hello from the wire");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello from the wire");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn first_save_derives_the_path_from_the_title() {
    let dir = tempfile::tempdir().unwrap();
    let state = ServeState::new(None, dir.path().to_path_buf(), TextEncoding::Utf8);
    let addr = spawn_server(state).await;

    let echoed = with_remote(addr, |remote| {
        remote
            .store(&Document {
                content: "first save".to_string(),
                title: "my: draft?".to_string(),
                saved: true,
            })
            .unwrap()
    })
    .await;

    assert!(echoed.saved);
    assert_eq!(echoed.title, "my draft.txt");
    let on_disk = std::fs::read_to_string(dir.path().join("my draft.txt")).unwrap();
    assert_eq!(on_disk, "first save");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreadable_file_loads_as_unsaved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    let state = ServeState::new(Some(path), dir.path().to_path_buf(), TextEncoding::Utf8);
    let addr = spawn_server(state).await;

    let doc = with_remote(addr, |remote| remote.fetch().unwrap()).await;
    assert!(!doc.saved);
    assert_eq!(doc.title, "Error");
    assert!(doc.content.starts_with("Error reading file"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gbk_files_round_trip_through_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("笔记.txt");
    let state = ServeState::new(
        Some(path.clone()),
        dir.path().to_path_buf(),
        TextEncoding::Gbk,
    );
    let addr = spawn_server(state).await;

    with_remote(addr, |remote| {
        remote
            .store(&Document {
                content: "你好，世界".to_string(),
                title: String::new(),
                saved: true,
            })
            .unwrap()
    })
    .await;

    // On disk the bytes are GBK, not UTF-8.
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, store::encode("你好，世界", TextEncoding::Gbk).unwrap());

    let fetched = with_remote(addr, |remote| remote.fetch().unwrap()).await;
    assert_eq!(fetched.content, "你好，世界");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unencodable_content_is_echoed_back_unsaved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let state = ServeState::new(Some(path), dir.path().to_path_buf(), TextEncoding::Gbk);
    let addr = spawn_server(state).await;

    let echoed = with_remote(addr, |remote| {
        remote
            .store(&Document {
                content: "crab \u{1F980}".to_string(),
                title: String::new(),
                saved: true,
            })
            .unwrap()
    })
    .await;

    // The write was refused; the echo keeps the content but cannot call
    // it persisted.
    assert!(!echoed.saved);
    assert_eq!(echoed.content, "crab \u{1F980}");
}

//! `MergeClient` against a server on a real socket.

use std::net::SocketAddr;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use pdfmerge::MergeError;
use pdfmerge::client::MergeClient;
use pdfmerge::selection::{SelectedFile, Selection};
use pdfmerge::server::serve_on;

use crate::common::{TestApp, page_markers, pdf_bytes};

struct RunningServer {
    app: TestApp,
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
}

impl RunningServer {
    async fn start() -> Self {
        let app = TestApp::new().await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        tokio::spawn(serve_on(listener, app.state.clone(), async move {
            let _ = stopped.await;
        }));

        Self {
            app,
            addr,
            stop: Some(stop),
        }
    }

    fn client(&self) -> MergeClient {
        MergeClient::new(format!("http://{}", self.addr))
    }

    /// The response body may be released shortly after the client has read it.
    async fn wait_for_cleanup(&self) -> bool {
        for _ in 0..50 {
            if self.app.leftovers().is_empty() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

fn pdf(label: &str, pages: usize) -> SelectedFile {
    SelectedFile::from_bytes(format!("{label}.pdf"), pdf_bytes(label, pages))
}

#[tokio::test]
async fn test_submit_reordered_selection() {
    let server = RunningServer::start().await;

    let mut selection = Selection::new();
    selection.replace([pdf("A", 2), pdf("B", 1), pdf("C", 1)]);
    assert!(selection.move_up(2));
    assert!(selection.move_down(0));
    assert_eq!(selection.names(), vec!["C.pdf", "A.pdf", "B.pdf"]);

    let download = server.client().submit(&selection).await.unwrap();
    assert!(download.filename.starts_with("merged_"));
    assert!(download.filename.ends_with(".pdf"));
    assert_eq!(page_markers(&download.bytes), vec!["C-1", "A-1", "A-2", "B-1"]);

    let out_dir = TempDir::new().unwrap();
    let saved = download.save_to(out_dir.path()).await.unwrap();
    assert_eq!(std::fs::read(saved).unwrap(), download.bytes.to_vec());

    assert!(server.wait_for_cleanup().await);
}

#[tokio::test]
async fn test_submit_from_paths() {
    let server = RunningServer::start().await;
    let input_dir = TempDir::new().unwrap();

    let first = input_dir.path().join("first.pdf");
    let second = input_dir.path().join("second.pdf");
    std::fs::write(&first, pdf_bytes("first", 1)).unwrap();
    std::fs::write(&second, pdf_bytes("second", 2)).unwrap();

    let selection = Selection::from_paths([&second, &first]);
    let download = server.client().submit(&selection).await.unwrap();
    assert_eq!(
        page_markers(&download.bytes),
        vec!["second-1", "second-2", "first-1"]
    );
}

#[tokio::test]
async fn test_server_failure_keeps_selection() {
    let server = RunningServer::start().await;

    let mut selection = Selection::new();
    selection.replace([
        pdf("ok", 1),
        SelectedFile::from_bytes("broken.pdf", b"garbage".to_vec()),
    ]);
    let before = selection.clone();

    let result = server.client().submit(&selection).await;
    assert!(matches!(result, Err(MergeError::Server { status: 500 })));
    assert_eq!(selection, before);
    assert!(server.app.leftovers().is_empty());
}

#[tokio::test]
async fn test_emptied_selection_is_never_sent() {
    let server = RunningServer::start().await;

    let mut selection = Selection::new();
    selection.replace([pdf("only", 1)]);
    assert!(selection.remove(0).is_some());

    let result = server.client().submit(&selection).await;
    assert!(matches!(result, Err(MergeError::EmptySelection)));
    assert!(server.app.leftovers().is_empty());
}

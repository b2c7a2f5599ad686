//! Unit tests for the cached fetcher

use super::*;
use crate::fetcher::core::files::create_temp_path;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate, Times,
};

/// Helper struct to capture fetch events during testing
#[derive(Debug, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<FetchEvent>>>,
}

impl EventCapture {
    fn new() -> Self {
        Self::default()
    }

    fn get_callback(&self) -> FetchCallback {
        let events = self.events.clone();
        Arc::new(move |event| {
            events.lock().unwrap().push(event);
        })
    }

    fn get_events(&self) -> Vec<FetchEvent> {
        self.events.lock().unwrap().clone()
    }

    fn failure_categories(&self) -> Vec<&'static str> {
        self.get_events()
            .into_iter()
            .filter_map(|event| match event {
                FetchEvent::Failed { category, .. } => Some(category),
                _ => None,
            })
            .collect()
    }
}

const CSV_BODY: &[u8] = b"flow,bytes,label\n1,120,0\n2,4096,1\n";

async fn serve(
    route: &str,
    response: ResponseTemplate,
    expected_hits: impl Into<Times>,
) -> (MockServer, String) {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(expected_hits)
        .mount(&mock_server)
        .await;
    let url = format!("{}{}", mock_server.uri(), route);
    (mock_server, url)
}

fn fetcher_with(capture: &EventCapture) -> Fetcher {
    Fetcher::new(FetchConfig::default())
        .unwrap()
        .with_callback(capture.get_callback())
}

#[cfg(test)]
mod download_tests {
    use super::*;

    #[tokio::test]
    async fn test_downloads_body_to_local_path() {
        let (_server, url) = serve("/data.csv", ResponseTemplate::new(200).set_body_bytes(CSV_BODY), 1).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("data.csv");
        let capture = EventCapture::new();

        let outcome = fetcher_with(&capture).fetch(&url, &dest).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded { size: CSV_BODY.len() as u64 });
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), CSV_BODY);
        assert!(!create_temp_path(&dest).exists());

        let events = capture.get_events();
        assert!(matches!(events.first(), Some(FetchEvent::DownloadStarted { .. })));
        assert!(matches!(events.last(), Some(FetchEvent::DownloadComplete { size, .. }) if *size == CSV_BODY.len() as u64));
    }

    #[tokio::test]
    async fn test_second_call_is_cache_hit_with_single_request() {
        // expect(1) is verified when the server drops
        let (_server, url) = serve("/data.csv", ResponseTemplate::new(200).set_body_bytes(CSV_BODY), 1).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("data.csv");
        let capture = EventCapture::new();
        let fetcher = fetcher_with(&capture);

        fetcher.ensure_cached(&url, &dest).await;
        fetcher.ensure_cached(&url, &dest).await;

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), CSV_BODY);
        let events = capture.get_events();
        assert!(matches!(events.last(), Some(FetchEvent::CacheHit { path }) if path == &dest));
        assert!(capture.failure_categories().is_empty());
    }

    #[tokio::test]
    async fn test_existing_file_left_unchanged() {
        let (_server, url) = serve("/data.csv", ResponseTemplate::new(200).set_body_bytes(CSV_BODY), 0).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("data.csv");
        tokio::fs::write(&dest, b"stale, arbitrary content").await.unwrap();
        let capture = EventCapture::new();

        let outcome = fetcher_with(&capture).fetch(&url, &dest).await.unwrap();

        assert_eq!(outcome, FetchOutcome::AlreadyCached { size: 24 });
        assert!(!outcome.was_downloaded());
        assert_eq!(outcome.size(), 24);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"stale, arbitrary content");
        assert_eq!(capture.get_events().len(), 1);
    }

    #[tokio::test]
    async fn test_non_utf8_body_preserved_verbatim() {
        let body: Vec<u8> = vec![b'a', b',', 0xff, 0xfe, b'\n', 0x00, 0xc3];
        let (_server, url) = serve("/raw.bin", ResponseTemplate::new(200).set_body_bytes(body.clone()), 1).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("raw.bin");

        Fetcher::new(FetchConfig::default()).unwrap().ensure_cached(&url, &dest).await;

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_free_function_downloads_with_defaults() {
        let (_server, url) = serve("/data.csv", ResponseTemplate::new(200).set_body_bytes(CSV_BODY), 1).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("data.csv");

        ensure_cached(&url, &dest).await;

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), CSV_BODY);
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_leaves_no_file() {
        let (_server, url) = serve("/missing.csv", ResponseTemplate::new(404), 1).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("missing.csv");
        let capture = EventCapture::new();
        let fetcher = fetcher_with(&capture);

        match fetcher.fetch(&url, &dest).await {
            Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 404),
            other => panic!("Expected HttpStatus error, got {:?}", other),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_not_found_is_swallowed() {
        let (_server, url) = serve("/missing.csv", ResponseTemplate::new(404), 1).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("missing.csv");
        let capture = EventCapture::new();

        fetcher_with(&capture).ensure_cached(&url, &dest).await;

        assert!(!dest.exists());
        assert_eq!(capture.failure_categories(), vec!["http_status"]);
    }

    #[tokio::test]
    async fn test_server_error_is_swallowed() {
        let (_server, url) = serve("/boom.csv", ResponseTemplate::new(503), 1).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("boom.csv");

        ensure_cached(&url, &dest).await;

        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_timeout_leaves_no_file() {
        let (_server, url) = serve(
            "/slow.csv",
            ResponseTemplate::new(200)
                .set_body_bytes(CSV_BODY)
                .set_delay(Duration::from_secs(2)),
            0..,
        )
        .await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("slow.csv");
        let capture = EventCapture::new();
        let fetcher = Fetcher::new(FetchConfig::default().with_timeout(Duration::from_millis(200)))
            .unwrap()
            .with_callback(capture.get_callback());

        fetcher.ensure_cached(&url, &dest).await;

        assert!(!dest.exists());
        assert!(!create_temp_path(&dest).exists());
        assert_eq!(capture.failure_categories(), vec!["network_timeout"]);
    }

    #[tokio::test]
    async fn test_write_failure_leaves_no_file() {
        let (_server, url) = serve("/data.csv", ResponseTemplate::new(200).set_body_bytes(CSV_BODY), 1).await;
        let temp_dir = tempdir().unwrap();
        // Parent directory is never created by the fetcher
        let dest = temp_dir.path().join("absent-dir").join("data.csv");
        let fetcher = Fetcher::new(FetchConfig::default()).unwrap();

        let err = fetcher.fetch(&url, &dest).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::LocalStorage);
        assert!(matches!(err, FetchError::Storage { operation: FileOperation::Create, .. }));
        assert!(!dest.exists());
        assert!(!temp_dir.path().join("absent-dir").exists());
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        // Bind then drop to get a port nothing is listening on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}/data.csv", port);
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("data.csv");
        let capture = EventCapture::new();

        fetcher_with(&capture).ensure_cached(&url, &dest).await;

        assert!(!dest.exists());
        assert_eq!(capture.failure_categories(), vec!["http_request"]);
    }

    #[tokio::test]
    async fn test_invalid_url_is_swallowed() {
        let temp_dir = tempdir().unwrap();
        let dest: PathBuf = temp_dir.path().join("data.csv");
        let capture = EventCapture::new();

        fetcher_with(&capture).ensure_cached("not a url", &dest).await;

        assert!(!dest.exists());
        assert_eq!(capture.failure_categories(), vec!["invalid_url"]);
    }
}

#[cfg(test)]
mod timeout_tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const CHUNK: &[u8] = b"7,512,1\n";

    /// One-shot HTTP server writing `chunks` body pieces with `gap` between them
    ///
    /// Content-Length always announces `announced` chunks, so a server sending
    /// fewer leaves the client waiting on the socket.
    async fn serve_trickle(announced: usize, chunks: usize, gap: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.set_nodelay(true).unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                announced * CHUNK.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            for _ in 0..chunks {
                tokio::time::sleep(gap).await;
                if socket.write_all(CHUNK).await.is_err() {
                    return;
                }
            }
            // Hold the connection open past any client read timeout
            tokio::time::sleep(Duration::from_secs(3)).await;
        });
        format!("http://{}/trickle.csv", addr)
    }

    fn fetcher_with_timeout(capture: &EventCapture, timeout: Duration) -> Fetcher {
        Fetcher::new(FetchConfig::default().with_timeout(timeout))
            .unwrap()
            .with_callback(capture.get_callback())
    }

    #[tokio::test]
    async fn test_steady_body_may_outlast_timeout() {
        // 6 x 150 ms is well past the 500 ms timeout, no single gap is
        let url = serve_trickle(6, 6, Duration::from_millis(150)).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("trickle.csv");
        let capture = EventCapture::new();

        let outcome = fetcher_with_timeout(&capture, Duration::from_millis(500))
            .fetch(&url, &dest)
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded { size: (6 * CHUNK.len()) as u64 });
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), CHUNK.repeat(6));
        assert!(capture.failure_categories().is_empty());
    }

    #[tokio::test]
    async fn test_stalled_body_times_out_without_partial_file() {
        let url = serve_trickle(6, 1, Duration::from_millis(10)).await;
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("stalled.csv");
        let capture = EventCapture::new();

        fetcher_with_timeout(&capture, Duration::from_millis(300))
            .ensure_cached(&url, &dest)
            .await;

        assert!(!dest.exists());
        assert!(!create_temp_path(&dest).exists());
        assert_eq!(capture.failure_categories(), vec!["network_timeout"]);
    }
}

#[cfg(test)]
mod reporter_tests {
    use super::*;

    #[derive(Default)]
    struct CountingReporter {
        hits: Arc<Mutex<usize>>,
    }

    impl FetchReporter for CountingReporter {
        fn on_cache_hit(&self, _path: &std::path::Path) {
            *self.hits.lock().unwrap() += 1;
        }
    }

    #[tokio::test]
    async fn test_reporter_converts_into_callback() {
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("cached.csv");
        tokio::fs::write(&dest, CSV_BODY).await.unwrap();

        let hits = Arc::new(Mutex::new(0));
        let reporter = CountingReporter { hits: hits.clone() };
        let fetcher = Fetcher::new(FetchConfig::default())
            .unwrap()
            .with_callback(reporter.into_callback());

        fetcher.ensure_cached("http://127.0.0.1:9/unused.csv", &dest).await;
        fetcher.ensure_cached("http://127.0.0.1:9/unused.csv", &dest).await;

        assert_eq!(*hits.lock().unwrap(), 2);
    }

    #[test]
    fn test_null_and_console_reporters_accept_all_events() {
        let path = PathBuf::from("data/x.csv");
        for callback in [NullReporter.into_callback(), ConsoleReporter.into_callback()] {
            callback(FetchEvent::CacheHit { path: path.clone() });
            callback(FetchEvent::DownloadStarted { url: "http://h/x.csv".into(), path: path.clone() });
            callback(FetchEvent::DownloadComplete { url: "http://h/x.csv".into(), path: path.clone(), size: 3 });
            callback(FetchEvent::Failed {
                url: "http://h/x.csv".into(),
                path: path.clone(),
                category: "http_status",
                error: "HTTP 404".into(),
            });
        }
    }
}

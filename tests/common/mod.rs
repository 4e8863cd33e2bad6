#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use page_analyzer::app::analyzer::Analyzer;
use page_analyzer::config::FetchConfig;
use page_analyzer::fetch::HttpFetcher;

pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Reply {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type", "text/html; charset=utf-8".to_owned())],
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![("Location", location.into())],
            body: String::new(),
        }
    }
}

/// Local HTTP fixture. The handler gets the request path, the server's base url and
/// how many requests came before this one.
pub struct FixtureServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    shutdown_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FixtureServer {
    pub fn spawn<F>(handler: F) -> Self
    where
        F: Fn(&str, &str, usize) -> Reply + Send + 'static,
    {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base_url = format!("http://{}", server.server_addr());
        let hits = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let thread_base = base_url.clone();
        let thread_hits = Arc::clone(&hits);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let seen = thread_hits.fetch_add(1, Ordering::SeqCst);
                let path = request.url().split('?').next().unwrap_or("/").to_owned();
                let reply = handler(&path, &thread_base, seen);

                let mut response =
                    tiny_http::Response::from_string(reply.body).with_status_code(reply.status);
                for (name, value) in reply.headers {
                    let header = tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes())
                        .expect("build header");
                    response = response.with_header(header);
                }
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            hits,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub struct TestAnalyzer {
    pub analyzer: Analyzer,
    pub pool: sqlx::SqlitePool,
    _temp: tempfile::TempDir,
}

pub async fn analyzer() -> anyhow::Result<TestAnalyzer> {
    let temp = tempfile::TempDir::new()?;
    let database_url = format!("sqlite://{}", temp.path().join("analyzer.db").display());
    let pool = page_analyzer::db::connect(&database_url, 4).await?;
    let fetcher = HttpFetcher::new(&FetchConfig {
        timeout: Some(Duration::from_secs(10)),
        ..FetchConfig::default()
    })?;
    let analyzer = Analyzer::with_pool(pool.clone(), Arc::new(fetcher));
    Ok(TestAnalyzer {
        analyzer,
        pool,
        _temp: temp,
    })
}

/// A url on localhost that refuses connections.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = listener.local_addr().expect("probe addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

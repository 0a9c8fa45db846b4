#![allow(dead_code)]

use actix_web::dev::{Service, ServerHandle};
use actix_web::{web, App, HttpServer};
use mechanic_connect::{Config, MemoryStore, SessionStore, Transport, TransportEvents};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Counts what the transport reports to its host.
#[derive(Default)]
pub struct RecordingEvents {
    pub expired: AtomicUsize,
    pub forbidden: Mutex<Vec<String>>,
}

impl RecordingEvents {
    pub fn expired(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

impl TransportEvents for RecordingEvents {
    fn session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }

    fn forbidden(&self, message: &str) {
        self.forbidden.lock().unwrap().push(message.to_string());
    }
}

/// An in-process API server standing in for the real backend.
pub struct MockBackend {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
    handle: ServerHandle,
}

impl MockBackend {
    /// Starts a server whose routes are mounted under `/api/v1` by `routes`.
    pub fn start<F>(routes: F) -> MockBackend
    where
        F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
    {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let recorded = hits.clone();

        let server = HttpServer::new(move || {
            let recorded = recorded.clone();
            App::new()
                .wrap_fn(move |req, srv| {
                    recorded
                        .lock()
                        .unwrap()
                        .push(format!("{} {}", req.method(), req.path()));
                    srv.call(req)
                })
                .service(web::scope("/api/v1").configure(routes.clone()))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind mock backend");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_rt::spawn(server);

        MockBackend {
            base_url: format!("http://{}/api/v1", addr),
            hits,
            handle,
        }
    }

    /// Every request received so far, as "METHOD /path".
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self, method_and_path: &str) -> usize {
        self.hits().iter().filter(|h| *h == method_and_path).count()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to reserve a port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/v1", port)
}

pub fn transport(base_url: &str, events: Arc<RecordingEvents>) -> Arc<Transport> {
    Arc::new(Transport::new(&Config::with_base_url(base_url), events).expect("transport"))
}

pub fn transport_with_timeout(
    base_url: &str,
    timeout: Duration,
    events: Arc<RecordingEvents>,
) -> Arc<Transport> {
    let config = Config {
        request_timeout: timeout,
        ..Config::with_base_url(base_url)
    };
    Arc::new(Transport::new(&config, events).expect("transport"))
}

pub fn session_store(
    base_url: &str,
) -> (Arc<SessionStore>, Arc<MemoryStore>, Arc<RecordingEvents>) {
    let events = Arc::new(RecordingEvents::default());
    let storage = Arc::new(MemoryStore::new());
    let store = SessionStore::new(transport(base_url, events.clone()), storage.clone());
    (Arc::new(store), storage, events)
}

//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use mortgage_leads::config::LeadsConfig;
use mortgage_leads::http::HttpServer;
use mortgage_leads::lifecycle::Shutdown;

pub const ADMIN_KEY: &str = "test-admin-key";

/// A running server on an ephemeral port with its own lead file.
pub struct TestServer {
    pub addr: SocketAddr,
    pub leads_path: PathBuf,
    pub client: reqwest::Client,
    shutdown: Shutdown,
    _dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Raw contents of the lead file, parsed.
    pub fn stored(&self) -> serde_json::Value {
        match std::fs::read_to_string(&self.leads_path) {
            Ok(text) => serde_json::from_str(&text).unwrap(),
            Err(_) => serde_json::json!([]),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with admin enabled and forwarded headers trusted, so each
/// test can pick its own client address.
pub async fn spawn_server(configure: impl FnOnce(&mut LeadsConfig)) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let leads_path = dir.path().join("leads.json");

    let mut config = LeadsConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.storage.leads_path = leads_path.display().to_string();
    config.rate_limit.trust_forwarded_headers = true;
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.into();
    configure(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    TestServer {
        addr,
        leads_path,
        client,
        shutdown,
        _dir: dir,
    }
}

/// A submission that passes validation.
pub fn valid_lead() -> serde_json::Value {
    serde_json::json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "phone": "416-555-0199",
        "loanAmount": "450,000",
        "downPayment": 90000,
        "interestRate": 4.79,
        "amortization": 25,
        "message": "Looking to buy in the spring.",
        "source": "affordability-calculator"
    })
}

//! Shared setup: the mock backend on an ephemeral port and a client config
//! pointing at it.

#![allow(dead_code)]

use std::net::SocketAddr;

use lib_armenu::configs::client_config::{ClientConfig, ItemRetryConfig};
use lib_armenu::menu::MenuApi;
use servers::menu_mock::{self, MockState};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const ADMIN_KEY: &str = "test-admin-key";

pub const APP_BASE_URL: &str = "https://menu.example";

/// A running mock backend. Shuts down when dropped.
pub struct TestBackend {
    pub addr: SocketAddr,
    pub state: MockState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestBackend {
    /// Starts the backend over the demo catalog.
    pub async fn start() -> TestBackend {
        Self::start_with(MockState::demo(Some(ADMIN_KEY.to_string()))).await
    }

    pub async fn start_with(state: MockState) -> TestBackend {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(menu_mock::serve(listener, state.clone(), async move {
            let _ = rx.await;
        }));

        TestBackend {
            addr,
            state,
            shutdown: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// No transport retries and millisecond item retries, so failure paths
    /// stay fast and request counts stay exact.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.base_url(),
            app_base_url: APP_BASE_URL.to_string(),
            request_timeout_ms: 5_000,
            transport_retries: 0,
            item_retry: ItemRetryConfig {
                max_retries: 3,
                base_delay_ms: 5,
                max_delay_ms: 20,
            },
            admin_key: Some(ADMIN_KEY.to_string()),
        }
    }

    pub fn api(&self) -> MenuApi {
        MenuApi::new(&self.config()).unwrap()
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A base URL where nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

//! Shared harness: a live router on an ephemeral port backed by an in-memory
//! database and a per-test upload directory.

#![allow(dead_code)]

use std::path::PathBuf;

use pocketwriter::api::{self, AppState};
use pocketwriter::storage::Database;
use pocketwriter::uploads::UploadStore;

pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

pub struct TestServer {
    pub base: String,
    pub db: Database,
    pub upload_dir: PathBuf,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn(test: &str) -> Self {
        let upload_dir = std::env::temp_dir().join(format!("pocketwriter_it_{}", test));
        std::fs::remove_dir_all(&upload_dir).ok();

        let db = Database::open(":memory:").await.unwrap();
        let state = AppState::new(db.clone(), UploadStore::new(&upload_dir));
        let app = api::router(state, MAX_UPLOAD_BYTES);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            db,
            upload_dir,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn cleanup(&self) {
        std::fs::remove_dir_all(&self.upload_dir).ok();
    }
}

#![allow(dead_code)]

use std::fs;
use std::process::{Command, Output};
use std::sync::Arc;

use axum::Router;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Path of the compiled `moveminds` binary.
pub fn moveminds_binary() -> &'static str {
    env!("CARGO_BIN_EXE_moveminds")
}

/// Runs the binary against an isolated config directory.
pub struct MoveMindsTest {
    pub temp_dir: TempDir,
    api_url: Option<String>,
}

impl MoveMindsTest {
    pub fn new() -> Self {
        MoveMindsTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            api_url: None,
        }
    }

    /// Point every invocation at a fake backend.
    pub fn with_api(api_url: impl Into<String>) -> Self {
        MoveMindsTest {
            api_url: Some(api_url.into()),
            ..Self::new()
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(moveminds_binary());
        command
            .args(args)
            .env("MOVEMINDS_CONFIG_DIR", self.temp_dir.path())
            .env("NO_COLOR", "1")
            .env_remove("MOVEMINDS_API_URL")
            .env_remove("MOVEMINDS_LOG");
        if let Some(url) = &self.api_url {
            command.env("MOVEMINDS_API_URL", url);
        }
        command.output().expect("Failed to execute moveminds")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Write `session.json` as if `login` had succeeded.
    pub fn sign_in_as(&self, user_id: i64, username: &str, role: &str) {
        let content = json!({
            "token": "test-token",
            "userId": user_id,
            "username": username,
            "role": role,
        });
        fs::write(self.temp_dir.path().join("session.json"), content.to_string())
            .expect("Failed to write session file");
    }

    pub fn session_exists(&self) -> bool {
        self.temp_dir.path().join("session.json").exists()
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.temp_dir.path().join("config.yaml"), content)
            .expect("Failed to write config file");
    }
}

/// Requests seen by a fake backend, as `METHOD /path?query` lines.
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    pub fn record(&self, line: impl Into<String>) {
        self.0.lock().push(line.into());
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.lock().iter().any(|line| line.contains(needle))
    }
}

/// Serve `router` on an ephemeral port; returns the base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("Fake backend has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake backend stopped");
    });
    format!("http://{addr}")
}

/// Serve `router` from a background thread with its own runtime, for tests
/// that block on the binary.
pub fn serve_in_background(router: Router) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to start runtime");
        runtime.block_on(async move {
            tx.send(serve(router).await).expect("Test thread went away");
            std::future::pending::<()>().await;
        });
    });
    rx.recv().expect("Fake backend did not start")
}

pub fn user_json(id: i64, username: &str, role: &str, verified: bool) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@moveminds.lk"),
        "firstName": username,
        "lastName": "Perera",
        "role": role,
        "isVerified": verified,
        "isActive": true,
    })
}

pub fn program_json(id: i64, name: &str, difficulty: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} for every body"),
        "category": "Yoga",
        "difficultyLevel": difficulty,
        "price": price,
        "durationWeeks": 6,
        "instructorId": 2,
        "instructorName": "Kasun Silva",
        "isActive": true,
    })
}

/// Slice `items` the way a Spring pageable endpoint does.
pub fn spring_page(items: &[Value], page: usize, size: usize) -> Value {
    let size = size.max(1);
    let content: Vec<Value> = items.iter().skip(page * size).take(size).cloned().collect();
    json!({
        "content": content,
        "totalPages": items.len().div_ceil(size),
        "totalElements": items.len(),
        "number": page,
        "size": size,
    })
}

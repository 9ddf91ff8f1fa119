//! End-to-end tests against a live server on an ephemeral port

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use automator_config::{AutomatorConfig, ProcessDefinition, TaskDefinition};
use automator_core::{ProcessSnapshot, ProcessStatus, TaskSnapshot, TaskStatus};
use automator_server::Server;

struct TestServer {
    base_url: String,
    client: Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<()>>,
}

impl TestServer {
    async fn start() -> Result<Self> {
        let mut config = AutomatorConfig::default();
        config.automation.processes = vec![
            ProcessDefinition::new("fast", 1),
            ProcessDefinition::new("slow", 30),
        ];
        config.automation.tasks = vec![
            TaskDefinition::new("quick", 1),
            TaskDefinition::new("long", 60),
        ];

        let server = Server::new(config).await?;
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_on(listener, async {
            let _ = rx.await;
        }));

        Ok(Self {
            base_url,
            client: Client::builder().timeout(Duration::from_secs(5)).build()?,
            shutdown: Some(tx),
            handle,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await?
    }
}

#[tokio::test]
async fn test_process_lifecycle_over_http() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server
        .client
        .post(server.url("/processes/fast/start"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let started: ProcessSnapshot = response.json().await?;
    assert_eq!(started.status, ProcessStatus::Running);
    assert_eq!(started.cycles_completed, 0);

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let running: ProcessSnapshot = server
        .client
        .get(server.url("/processes/fast"))
        .send()
        .await?
        .json()
        .await?;
    assert!(running.cycles_completed >= 1, "{:?}", running);
    assert!(running.has_cycled());

    let stopped: ProcessSnapshot = server
        .client
        .post(server.url("/processes/fast/stop"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(stopped.status, ProcessStatus::Stopped);

    // No cycle completes once stop has been requested
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let after: ProcessSnapshot = server
        .client
        .get(server.url("/processes/fast"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(after.cycles_completed, stopped.cycles_completed);
    assert_eq!(after.last_cycle_dttm, stopped.last_cycle_dttm);

    server.stop().await
}

#[tokio::test]
async fn test_ui_style_process_patch() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server
        .client
        .patch(server.url("/process/slow"))
        .json(&json!({"status": "running", "cycle_time": 10}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let snapshot: ProcessSnapshot = response.json().await?;
    assert_eq!(snapshot.status, ProcessStatus::Running);
    assert_eq!(snapshot.cycle_time, 10);

    let response = server
        .client
        .patch(server.url("/process/slow"))
        .json(&json!({"status": "sideways"}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let list: Value = server
        .client
        .get(server.url("/processes"))
        .send()
        .await?
        .json()
        .await?;
    let names: Vec<&str> = list["processes"]
        .as_array()
        .map(|items| items.iter().filter_map(|p| p["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["fast", "slow"]);

    server.stop().await
}

#[tokio::test]
async fn test_task_run_over_http() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.client.post(server.url("/tasks/quick")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let started: TaskSnapshot = response.json().await?;
    assert_eq!(started.status, TaskStatus::Running);
    assert!(!started.id.is_nil());

    let response = server.client.post(server.url("/tasks/quick")).send().await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await?;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains(&started.id.to_string()));

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let finished: TaskSnapshot = server
        .client
        .get(server.url("/tasks/quick"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(finished.status, TaskStatus::Finished);
    assert_eq!(finished.id, started.id);
    assert!(finished.finish_dttm > finished.start_dttm);

    let restarted: TaskSnapshot = server
        .client
        .post(server.url("/tasks/quick"))
        .send()
        .await?
        .json()
        .await?;
    assert_ne!(restarted.id, started.id);
    assert!(restarted.start_dttm > started.start_dttm);

    server.stop().await
}

#[tokio::test]
async fn test_task_duration_update_over_http() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server
        .client
        .patch(server.url("/tasks/long"))
        .json(&json!({"duration": 5}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: TaskSnapshot = response.json().await?;
    assert_eq!(updated.duration, 5);
    assert_eq!(updated.status, TaskStatus::Init);

    let response = server
        .client
        .patch(server.url("/tasks/long"))
        .json(&json!({"duration": 0}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    server.stop().await
}

#[tokio::test]
async fn test_errors_and_health() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.client.get(server.url("/tasks/ghost")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["status"], 404);

    let response = server.client.get(server.url("/no/such/route")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let health: Value = server
        .client
        .get(server.url("/health"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["processes"]["total"], 2);
    assert_eq!(health["tasks"]["total"], 2);

    let response = server.client.get(server.url("/tasks")).send().await?;
    assert!(response.headers().contains_key("x-request-id"));

    server.stop().await
}

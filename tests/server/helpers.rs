use std::io::Cursor;
use std::path::Path;

use chrono::Duration;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::AbortHandle;
use userdesk::application::routes::app_router;
use userdesk::application::services::SeedService;
use userdesk::application::services::seed::SeedData;
use userdesk::application::state::{AppState, AppStateConfig};
use userdesk::domain::users::Account;
use userdesk::infrastructure::auth::TokenCodec;
use userdesk::infrastructure::database::{Database, DatabasePool};

pub const PASSWORD: &str = "correct horse battery";
pub const JWT_SECRET: &[u8] = b"integration-test-secret";

pub struct TestApp {
    pub address: String,
    pub pool: DatabasePool,
    pub seed_service: SeedService,
    pub client: Client,
    media_root: TempDir,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    pub fn media_root(&self) -> &Path {
        self.media_root.path()
    }

    /// Files currently stored under `media/profile_pics`.
    pub fn stored_pictures(&self) -> Vec<String> {
        let dir = self.media_root().join("profile_pics");
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        entries
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.api_url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.api_url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_app() -> TestApp {
    let database = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    let media_root = tempfile::tempdir().expect("Failed to create media root");

    let state = AppState::from_database(
        &database,
        AppStateConfig {
            tokens: test_codec(),
            media_root: media_root.path().to_path_buf(),
            bcrypt_cost: 4,
        },
    );
    let seed_service = state.seed_service.clone();
    let app = app_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{local_addr}");

    let server_handle = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await
        .expect("Server failed to start");
    })
    .abort_handle();

    TestApp {
        address,
        pool: database.clone_pool(),
        seed_service,
        client: Client::new(),
        media_root,
        server_handle,
    }
}

/// Same signing setup as the server under test.
pub fn test_codec() -> TokenCodec {
    TokenCodec::new(JWT_SECRET, Duration::minutes(5), Duration::hours(24))
}

pub async fn create_account(app: &TestApp, username: &str) -> Account {
    let response = app
        .post_json(
            "/users",
            &json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": PASSWORD,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse account")
}

/// Log in and return the raw response body.
pub async fn login(app: &TestApp, username: &str, password: &str) -> reqwest::Response {
    app.post_json(
        "/auth/login",
        &json!({ "username": username, "password": password }),
    )
    .await
}

/// Create an account, log it in, and return it with its access and refresh tokens.
pub async fn logged_in_account(app: &TestApp, username: &str) -> (Account, String, String) {
    let account = create_account(app, username).await;
    let response = login(app, username, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse login");
    let access = body["tokens"]["access"].as_str().unwrap().to_string();
    let refresh = body["tokens"]["refresh"].as_str().unwrap().to_string();
    (account, access, refresh)
}

pub async fn error_code(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse error body");
    body["code"].as_str().unwrap_or_default().to_string()
}

pub async fn json_body<T: DeserializeOwned>(response: reqwest::Response) -> T {
    response.json().await.expect("Failed to parse response body")
}

pub async fn seed(app: &TestApp, document: &Value) {
    let data = SeedData::from_json(&document.to_string()).expect("valid seed document");
    app.seed_service.load(data).await.expect("Failed to seed");
}

pub fn tiny_png() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 40, 40]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes.into_inner()
}

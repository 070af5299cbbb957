pub mod mock;
pub mod routes;
pub mod store;
pub mod telemetry;

use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::{Server, Service};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, HttpServer, web};
use payloads::{BearerToken, RecallRecord, requests};
use reqwest::StatusCode;

pub use store::{LoginRefusal, MockStore, RecordedRequest};

pub const ALICE_EMAIL: &str = "alice@example.com";
pub const ALICE_PASSWORD: &str = "password123";

pub struct Config {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
    /// List of allowed CORS origins. Use "*" to allow any origin
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".into(),
            port: 0,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    /// Read `IP_ADDRESS`, `PORT` and `ALLOWED_ORIGINS`, falling back to the
    /// defaults for anything unset. A `.env` file is honoured.
    pub fn from_env() -> anyhow::Result<Self> {
        use std::env::var;

        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Ok(origins) => origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => defaults.allowed_origins,
        };
        let port = match var("PORT") {
            Ok(port) => port.parse()?,
            Err(_) => defaults.port,
        };

        Ok(Config {
            ip: var("IP_ADDRESS").unwrap_or(defaults.ip),
            port,
            allowed_origins,
        })
    }
}

/// Build the mock server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub fn build(config: &mut Config, store: MockStore) -> std::io::Result<Server> {
    let store = web::Data::new(store);
    let allowed_origins = config.allowed_origins.clone();

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();

    let server = HttpServer::new(move || {
        let cors = if allowed_origins.iter().any(|o| o == "*") {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
        } else {
            let mut cors =
                Cors::default().allow_any_method().allow_any_header();
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .wrap_fn(|req, srv| {
                if let Some(store) = req.app_data::<web::Data<MockStore>>() {
                    store.record(RecordedRequest {
                        method: req.method().to_string(),
                        path: req.path().to_string(),
                        authorization: req
                            .headers()
                            .get(AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                }
                srv.call(req)
            })
            .wrap(cors)
            .service(routes::api_services())
            .service(routes::ops::healthz)
            .service(routes::ops::latency)
            .service(routes::preferences::get)
            .service(routes::preferences::replace)
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct TestApp {
    pub port: u16,
    pub address: String,
    pub store: MockStore,
    /// Anonymous client. Tests that need a token build their own with
    /// [`TestApp::client_with`].
    pub client: payloads::APIClient,
}

impl TestApp {
    pub fn client_with(
        &self,
        tokens: std::sync::Arc<dyn payloads::TokenSource>,
    ) -> payloads::APIClient {
        payloads::APIClient::new(self.address.clone()).with_tokens(tokens)
    }

    /// A token the mock accepts, without going through login.
    pub fn issue_token(&self, token: &str) -> BearerToken {
        self.store.issue_token(token);
        BearerToken::new(token)
    }

    pub fn create_alice_user(&self) {
        self.store.add_user(ALICE_EMAIL, ALICE_PASSWORD);
    }

    pub fn seed_recalls(&self, recalls: impl IntoIterator<Item = RecallRecord>) {
        for recall in recalls {
            self.store.add_recall(recall);
        }
    }
}

pub fn alice_credentials() -> requests::LoginCredentials {
    requests::LoginCredentials::new(ALICE_EMAIL, ALICE_PASSWORD)
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    telemetry::init_test_subscriber();

    let mut config = Config {
        port,
        ..Config::default()
    };
    let store = MockStore::new();
    let server = build(&mut config, store.clone()).unwrap();
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{}", config.port);
    TestApp {
        port: config.port,
        client: payloads::APIClient::new(address.clone()),
        address,
        store,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}

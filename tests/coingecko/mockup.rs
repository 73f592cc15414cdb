use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

use axum::extract::Query;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Json;
use axum::response::Response;
use axum::routing;
use axum::Router;
use serde_json::json;

/// (timestamp in ms, usd price) records
pub type APIData = Vec<(i64, f64)>;

async fn wait_some() {
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
}

/// How the mockup answers price queries
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Serve these records, filtered by time range for range queries
    Prices(APIData),
    /// Fail with given status code
    Status(u16),
    /// Reply with this raw JSON body
    Body(&'static str),
}

struct MockState {
    behaviour: Mutex<Behaviour>,
    /// Reply delays by requested number of days
    delays: Mutex<HashMap<u32, Duration>>,
    /// Received request uri's
    queries: Mutex<Vec<String>>,
}

/// Coingecko api mockup
pub struct MockGecko {
    url: String,
    state: Arc<MockState>,
    term_tx: Option<oneshot::Sender<()>>,
}

impl MockGecko {
    /// Start serving with given `behaviour` on a free local port.
    pub async fn start(behaviour: Behaviour) -> Self {
        let state = Arc::new(MockState {
            behaviour: Mutex::new(behaviour),
            delays: Mutex::new(HashMap::new()),
            queries: Mutex::new(vec![]),
        });

        let app = Router::new()
            .route("/bitcoin/market_chart", routing::get(query_days))
            .route("/bitcoin/market_chart/range", routing::get(query_range))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            tracing::info!("Starting MockGecko server listening on {}", &address);
            tokio::select! {
                _ = server => {},
                _ = rx => {tracing::info!("Stopped server")},
            }
        });
        // Wait some to ensure server is ready
        wait_some().await;

        Self {
            url: format!("http://{address}/bitcoin"),
            state,
            term_tx: Some(tx),
        }
    }

    /// Coin endpoint url to be queried by clients
    pub fn get_url(&self) -> &str {
        &self.url
    }

    /// Change how subsequent queries are answered.
    pub fn set_behaviour(&self, behaviour: Behaviour) {
        *self.state.behaviour.lock().unwrap() = behaviour;
    }

    /// Delay replies to queries for given number of `days`.
    ///
    /// Range queries count as 1 day.
    pub fn delay(&self, days: u32, delay: Duration) {
        self.state.delays.lock().unwrap().insert(days, delay);
    }

    /// Request uri's received so far
    pub fn queries(&self) -> Vec<String> {
        self.state.queries.lock().unwrap().clone()
    }

    pub async fn stop(&mut self) {
        if let Some(tx) = self.term_tx.take() {
            tx.send(()).unwrap();
            wait_some().await;
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct DaysParameters {
    #[allow(dead_code)]
    vs_currency: String,
    days: u32,
}

#[derive(Debug, serde::Deserialize)]
struct RangeParameters {
    #[allow(dead_code)]
    vs_currency: String,
    from: i64,
    to: i64,
}

#[derive(Debug, serde::Serialize)]
struct QueryResponse {
    prices: APIData,
    market_caps: APIData,
    total_volumes: APIData,
}

/// Mock of `https://api.coingecko.com/api/v3/coins/bitcoin/market_chart`
async fn query_days(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    params: Query<DaysParameters>,
) -> Response {
    tracing::debug!("query_days {params:?}");
    reply(&state, &uri, params.days, |_| true).await
}

/// Mock of `https://api.coingecko.com/api/v3/coins/bitcoin/market_chart/range`
async fn query_range(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    params: Query<RangeParameters>,
) -> Response {
    tracing::debug!("query_range {params:?}");
    // Convert time range from s to ms
    let fr_ms = params.from * 1000;
    let to_ms = params.to * 1000;
    reply(&state, &uri, 1, |t| t >= fr_ms && t <= to_ms).await
}

async fn reply(state: &MockState, uri: &Uri, days: u32, keep: impl Fn(i64) -> bool) -> Response {
    state.queries.lock().unwrap().push(uri.to_string());
    let delay = state.delays.lock().unwrap().get(&days).cloned();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let behaviour = state.behaviour.lock().unwrap().clone();
    match behaviour {
        Behaviour::Prices(data) => {
            let res = QueryResponse {
                prices: data.into_iter().filter(|r| keep(r.0)).collect(),
                market_caps: vec![],
                total_volumes: vec![],
            };
            Json(json!(res)).into_response()
        }
        Behaviour::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            "mockup failure".to_owned(),
        )
            .into_response(),
        Behaviour::Body(body) => {
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
    }
}

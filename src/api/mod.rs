use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::core::{
    DividendKind, DividendMode, Inputs, Projection, ProjectionYear, Summary, format, project,
};
use crate::settings::{SettingsStore, load_inputs, persist_inputs};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

pub type SharedStore = Arc<Mutex<Box<dyn SettingsStore + Send>>>;

#[derive(Clone)]
struct AppState {
    store: SharedStore,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiDividendMode {
    #[serde(alias = "flat-per-share", alias = "flatPerShare", alias = "per-share")]
    Flat,
    #[serde(
        alias = "rate-of-share-value",
        alias = "rateOfShareValue",
        alias = "percent"
    )]
    Rate,
}

impl From<ApiDividendMode> for DividendKind {
    fn from(value: ApiDividendMode) -> Self {
        match value {
            ApiDividendMode::Flat => DividendKind::Flat,
            ApiDividendMode::Rate => DividendKind::Rate,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    mode: Option<ApiDividendMode>,

    equity_swap: Option<f64>,
    hours_per_week: Option<f64>,
    weeks_per_year: Option<f64>,
    hourly_rate: Option<f64>,
    share_value: Option<f64>,
    option_strike_price: Option<f64>,

    dividend_per_share: Option<f64>,
    dividend_rate: Option<f64>,
    growth_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsQuery {
    mode: Option<ApiDividendMode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InputsResponse {
    mode: DividendKind,
    equity_swap: f64,
    hours_per_week: f64,
    weeks_per_year: f64,
    hourly_rate: f64,
    share_value: f64,
    option_strike_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    dividend_per_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dividend_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    growth_rate: Option<f64>,
}

impl From<&Inputs> for InputsResponse {
    fn from(inputs: &Inputs) -> Self {
        let (dividend_per_share, dividend_rate, growth_rate) = match inputs.dividend {
            DividendMode::Flat { per_share } => (Some(per_share), None, None),
            DividendMode::RateOfShareValue { rate, growth_rate } => {
                (None, Some(rate), Some(growth_rate))
            }
        };
        InputsResponse {
            mode: inputs.dividend.kind(),
            equity_swap: inputs.equity_swap_percent,
            hours_per_week: inputs.hours_per_week,
            weeks_per_year: inputs.weeks_per_year,
            hourly_rate: inputs.hourly_rate,
            share_value: inputs.share_value,
            option_strike_price: inputs.option_strike_price,
            dividend_per_share,
            dividend_rate,
            growth_rate,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayResponse {
    equity_swap: String,
    vested_options: String,
    cash: String,
    cash_bonus: String,
    annual_dividend: String,
    total_cash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    mode: DividendKind,
    inputs: InputsResponse,
    summary: Summary,
    display: DisplayResponse,
    projection: Vec<ProjectionYear>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/settings", get(settings_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(AppState { store })
}

pub async fn run_http_server(port: u16, store: SharedStore) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(store);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "equity swap calculator listening");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn settings_handler(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> Response {
    handle_settings(&state.store, query)
}

async fn project_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<ProjectPayload>,
) -> Response {
    handle_project(&state.store, payload)
}

async fn project_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Response {
    handle_project(&state.store, payload)
}

fn lock_store(store: &SharedStore) -> MutexGuard<'_, Box<dyn SettingsStore + Send>> {
    // A panic mid-write leaves at worst a stale key; keep serving.
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn handle_settings(store: &SharedStore, query: SettingsQuery) -> Response {
    let kind = query.mode.map(Into::into).unwrap_or(DividendKind::Rate);
    let inputs = load_inputs(&**lock_store(store), kind);
    json_response(StatusCode::OK, InputsResponse::from(&inputs))
}

fn handle_project(store: &SharedStore, payload: ProjectPayload) -> Response {
    let mut guard = lock_store(store);
    let inputs = inputs_from_payload(payload, &**guard);

    let projection = match project(&inputs) {
        Ok(projection) => projection,
        Err(e) => {
            warn!(error = %e, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    // Only accepted inputs are saved.
    if let Err(e) = persist_inputs(&mut **guard, &inputs) {
        error!(error = %e, "failed to persist calculator inputs");
    }
    drop(guard);

    json_response(StatusCode::OK, build_project_response(&inputs, &projection))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn payload_from_json(json: &str) -> Result<ProjectPayload, String> {
    serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))
}

/// Fields missing from the payload fall back to the stored value, then the default.
fn inputs_from_payload(payload: ProjectPayload, store: &dyn SettingsStore) -> Inputs {
    let kind = payload.mode.map(Into::into).unwrap_or(DividendKind::Rate);
    let mut inputs = load_inputs(store, kind);

    if let Some(v) = payload.equity_swap {
        inputs.equity_swap_percent = v;
    }
    if let Some(v) = payload.hours_per_week {
        inputs.hours_per_week = v;
    }
    if let Some(v) = payload.weeks_per_year {
        inputs.weeks_per_year = v;
    }
    if let Some(v) = payload.hourly_rate {
        inputs.hourly_rate = v;
    }
    if let Some(v) = payload.share_value {
        inputs.share_value = v;
    }
    if let Some(v) = payload.option_strike_price {
        inputs.option_strike_price = v;
    }

    match &mut inputs.dividend {
        DividendMode::Flat { per_share } => {
            if let Some(v) = payload.dividend_per_share {
                *per_share = v;
            }
        }
        DividendMode::RateOfShareValue { rate, growth_rate } => {
            if let Some(v) = payload.dividend_rate {
                *rate = v;
            }
            if let Some(v) = payload.growth_rate {
                *growth_rate = v;
            }
        }
    }
    inputs
}

fn build_project_response(inputs: &Inputs, projection: &Projection) -> ProjectResponse {
    let summary = &projection.summary;
    ProjectResponse {
        mode: inputs.dividend.kind(),
        inputs: InputsResponse::from(inputs),
        summary: summary.clone(),
        display: DisplayResponse {
            equity_swap: format::percent(inputs.equity_swap_percent),
            vested_options: format::group_thousands(summary.vested_options),
            cash: format::per_year(summary.cash),
            cash_bonus: format::per_year(summary.cash_bonus),
            annual_dividend: format::per_year(summary.annual_dividend),
            total_cash: format::per_year(summary.total_cash),
        },
        projection: projection.series.clone().unwrap_or_default(),
    }
}

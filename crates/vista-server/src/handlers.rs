//! Request handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vista_core::types::{toggle_collapse, SlicerKind, SlicerOption};
use vista_core::{
    AlmBasis, DateRange, FactKind, FactRow, Page, PortfolioBasis, Scenario, Selection, VistaError,
    Year,
};
use vista_engine::{ChartSpec, Dashboard, EngineError, FactFilter, ReturnsRequest};
use vista_traits::reference_data::TickerInfo;
use vista_traits::Ticker;

/// Application state.
pub struct AppState {
    /// The dashboard
    pub dashboard: Arc<Dashboard>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Error response.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// Handler failure, rendered as a status code and an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<VistaError> for ApiError {
    fn from(e: VistaError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        let status = match e {
            EngineError::BaselineMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            EngineError::Source(_) => StatusCode::BAD_GATEWAY,
            EngineError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, error = %self.message, "request failed");
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// NAVIGATION
// =============================================================================

/// Navigation entry.
#[derive(Debug, Serialize)]
pub struct PageEntry {
    page: Page,
    path: &'static str,
    title: &'static str,
}

/// List navigable pages.
pub async fn list_pages() -> Json<Vec<PageEntry>> {
    Json(
        Page::ALL
            .iter()
            .map(|&page| PageEntry {
                page,
                path: page.path(),
                title: page.title(),
            })
            .collect(),
    )
}

/// One slicer as a page shows it.
#[derive(Debug, Serialize)]
pub struct SlicerResponse {
    kind: SlicerKind,
    heading: &'static str,
    options: Vec<SlicerOption>,
    default: u8,
}

/// Slicers of one page.
#[derive(Debug, Serialize)]
pub struct PageSlicersResponse {
    page: Page,
    path: &'static str,
    slicers: Vec<SlicerResponse>,
}

/// Slicers a page shows, with options and defaults. Unknown pages resolve to RoC.
pub async fn page_slicers(Path(page): Path<String>) -> Json<PageSlicersResponse> {
    let page = Page::from_path(&page);
    let reference = Selection::reference();

    let slicers = page
        .slicers()
        .visible()
        .into_iter()
        .map(|kind| SlicerResponse {
            kind,
            heading: kind.heading(),
            options: kind.options(),
            default: match kind {
                SlicerKind::Year => reference.year.value(),
                SlicerKind::Portfolio => reference.portfolio.code(),
                SlicerKind::Basis => reference.basis.code(),
                SlicerKind::Scenario => reference.scenario.code(),
            },
        })
        .collect();

    Json(PageSlicersResponse {
        page,
        path: page.path(),
        slicers,
    })
}

/// Query for the navbar toggler.
#[derive(Debug, Deserialize)]
pub struct ToggleQuery {
    /// Times the toggler was pressed.
    #[serde(default)]
    pub clicks: u32,
    /// Current open state.
    #[serde(default)]
    pub is_open: bool,
}

/// Next open state of the collapsed navbar.
pub async fn toggle_navbar(Query(query): Query<ToggleQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "is_open": toggle_collapse(query.clicks, query.is_open) }))
}

// =============================================================================
// RETURN ON CAPITAL
// =============================================================================

/// Slicer codes; absent values take the reference selection's.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    /// Year (1 to 20)
    pub year: Option<i64>,
    /// Portfolio basis code
    pub portfolio: Option<i64>,
    /// ALM basis code
    pub basis: Option<i64>,
    /// Scenario code
    pub scenario: Option<i64>,
}

impl SelectionQuery {
    /// Resolve to a typed selection.
    pub fn to_selection(&self) -> Result<Selection, VistaError> {
        let reference = Selection::reference();
        Ok(Selection::new(
            self.year.map(Year::new).transpose()?.unwrap_or(reference.year),
            self.portfolio
                .map(PortfolioBasis::from_code)
                .transpose()?
                .unwrap_or(reference.portfolio),
            self.basis
                .map(AlmBasis::from_code)
                .transpose()?
                .unwrap_or(reference.basis),
            self.scenario
                .map(Scenario::from_code)
                .transpose()?
                .unwrap_or(reference.scenario),
        ))
    }
}

/// Year header, waterfall and KPI cards for one selection.
///
/// A KPI failure is carried in the body's `kpi_error`; use `/roc/kpis` for a
/// status code.
pub async fn return_on_capital(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult<vista_engine::RocView> {
    let selection = query.to_selection()?;
    debug!(?selection, "return on capital");
    Ok(Json(state.dashboard.return_on_capital(&selection)))
}

/// Waterfall chart for one selection.
pub async fn waterfall(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult<ChartSpec> {
    let selection = query.to_selection()?;
    Ok(Json(state.dashboard.waterfall(&selection)))
}

/// KPI cards for one selection.
pub async fn kpis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult<Vec<ChartSpec>> {
    let selection = query.to_selection()?;
    Ok(Json(state.dashboard.kpis(&selection)?))
}

/// Baseline snapshot response.
#[derive(Debug, Serialize)]
pub struct BaselineResponse {
    selection: Selection,
    entries: Vec<vista_engine::BaselineEntry>,
}

/// Baseline values the KPI deltas are measured against.
pub async fn baseline(State(state): State<Arc<AppState>>) -> Json<BaselineResponse> {
    let snapshot = state.dashboard.baseline();
    Json(BaselineResponse {
        selection: snapshot.selection(),
        entries: snapshot.entries(),
    })
}

// =============================================================================
// ALM AND FACTS
// =============================================================================

/// ALM scenario fan for the page's portfolio and basis slicers.
pub async fn alm(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult<ChartSpec> {
    let selection = query.to_selection()?;
    Ok(Json(state.dashboard.alm(selection.portfolio, selection.basis)))
}

/// Raw rows of a dataset.
///
/// `table=waterfall|alm` picks the dataset (default waterfall); every other
/// parameter is a `column=code` predicate.
pub async fn facts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<FactRow>> {
    let mut kind = FactKind::Waterfall;
    let mut predicates = Vec::with_capacity(params.len());

    for (key, value) in params {
        if key.eq_ignore_ascii_case("table") {
            kind = match value.to_ascii_lowercase().as_str() {
                "waterfall" => FactKind::Waterfall,
                "alm" => FactKind::Alm,
                other => return Err(ApiError::bad_request(format!("unknown table: {other}"))),
            };
        } else {
            predicates.push((key, value));
        }
    }

    let predicate = FactFilter::from_pairs(predicates)?;
    Ok(Json(state.dashboard.facts(kind, &predicate)))
}

// =============================================================================
// TICKERS
// =============================================================================

/// Ticker reference list.
pub async fn list_tickers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TickerInfo>> {
    Ok(Json(state.dashboard.tickers().await?))
}

/// Query for the ticker-returns view.
#[derive(Debug, Deserialize)]
pub struct ReturnsQuery {
    /// Comma separated symbols
    #[serde(default)]
    pub tickers: String,
    /// First date (YYYY-MM-DD)
    pub start: String,
    /// Last date (YYYY-MM-DD)
    pub end: String,
    /// Overlay running-peak lines
    #[serde(default)]
    pub drawdown: bool,
}

/// Rebased price chart, per-ticker risk figures and data status.
pub async fn ticker_returns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReturnsQuery>,
) -> ApiResult<vista_engine::ReturnsView> {
    let request = ReturnsRequest {
        tickers: Ticker::parse_list(&query.tickers),
        range: DateRange::parse(&query.start, &query.end)?,
        drawdown: query.drawdown,
    };
    Ok(Json(state.dashboard.ticker_returns(&request).await))
}

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::aggregate::{self, AggregationResult};
use crate::funding::{self, FundingTimeline, KpiSnapshot, HISTORY_EMPTY_WARNING, KPI_EMPTY_WARNING};
use crate::news::{self, NewsItem};
use crate::source::{self, config, DataSource};
use crate::taxonomy::{Category, Taxonomy, TaxonomyEntry};

const NEWS_EMPTY_WARNING: &str = "No news data available. Check your 'news_data_url' secret.";

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
    pub taxonomy: Arc<Taxonomy>,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>, taxonomy: Taxonomy) -> Self {
        Self {
            source,
            taxonomy: Arc::new(taxonomy),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/taxonomy", get(get_taxonomy))
        .route("/classify", post(classify))
        .route("/news", get(get_news))
        .route("/news/summary", get(news_summary))
        .route("/kpi", get(get_kpi))
        .route("/funding-history", get(get_funding_history))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Upstream failures surface as 502 with the failing source id; bad filters as 400.
#[derive(Debug)]
pub enum ApiError {
    Upstream {
        source_id: &'static str,
        error: anyhow::Error,
    },
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'static str>,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Upstream { source_id, error } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    source: Some(source_id),
                    error: format!("{error:#}"),
                },
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    source: None,
                    error: msg,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

async fn load(state: &AppState, source_id: &'static str) -> Result<source::Table, ApiError> {
    source::fetch_table(state.source.as_ref(), source_id)
        .await
        .map_err(|error| ApiError::Upstream { source_id, error })
}

fn warn_if(empty: bool, msg: &str) -> Option<String> {
    empty.then(|| msg.to_string())
}

#[derive(Serialize)]
struct TaxonomyOut {
    categories: Vec<TaxonomyEntry>,
    fallback: Category,
}

async fn get_taxonomy(State(state): State<AppState>) -> Json<TaxonomyOut> {
    Json(TaxonomyOut {
        categories: state.taxonomy.entries().to_vec(),
        fallback: state.taxonomy.fallback(),
    })
}

#[derive(Deserialize)]
struct ClassifyReq {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Serialize)]
struct ClassifyResp {
    tag: Category,
}

async fn classify(State(state): State<AppState>, Json(body): Json<ClassifyReq>) -> Json<ClassifyResp> {
    let title = body.title.unwrap_or_default();
    Json(ClassifyResp {
        tag: state.taxonomy.classify(&title),
    })
}

#[derive(Deserialize, Default)]
struct NewsQuery {
    competitor: Option<String>,
    tag: Option<String>,
}

#[derive(Serialize)]
struct NewsOut {
    items: Vec<NewsItem>,
    dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

async fn get_news(
    State(state): State<AppState>,
    Query(q): Query<NewsQuery>,
) -> Result<Json<NewsOut>, ApiError> {
    let tag_filter = match q.tag.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(
            raw.parse::<Category>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        ),
        None => None,
    };
    let comp_filter = q
        .competitor
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let table = load(&state, config::NEWS_DATA).await?;
    let prepared = news::prepare_table(&table, &state.taxonomy);
    let warning = warn_if(table.is_empty(), NEWS_EMPTY_WARNING);

    let items = prepared
        .items
        .into_iter()
        .filter(|it| tag_filter.map_or(true, |t| it.tag == t))
        .filter(|it| {
            comp_filter.map_or(true, |c| {
                it.competitor
                    .as_deref()
                    .is_some_and(|have| have.eq_ignore_ascii_case(c))
            })
        })
        .collect();

    Ok(Json(NewsOut {
        items,
        dropped: prepared.dropped,
        warning,
    }))
}

#[derive(Serialize)]
struct SummaryOut {
    #[serde(flatten)]
    summary: AggregationResult,
    items: usize,
    dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

async fn news_summary(State(state): State<AppState>) -> Result<Json<SummaryOut>, ApiError> {
    let table = load(&state, config::NEWS_DATA).await?;
    let prepared = news::prepare_table(&table, &state.taxonomy);
    let summary = aggregate::summarize(&prepared.items, &state.taxonomy);
    tracing::info!(
        target: "api",
        items = prepared.items.len(),
        dropped = prepared.dropped,
        tags = summary.tag_frequency.len(),
        "news summary computed"
    );
    Ok(Json(SummaryOut {
        summary,
        items: prepared.items.len(),
        dropped: prepared.dropped,
        warning: warn_if(table.is_empty(), NEWS_EMPTY_WARNING),
    }))
}

#[derive(Serialize)]
struct KpiOut {
    #[serde(flatten)]
    snapshot: KpiSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

async fn get_kpi(State(state): State<AppState>) -> Result<Json<KpiOut>, ApiError> {
    let table = load(&state, config::FUNDING_DATA).await?;
    let snapshot = funding::kpi_snapshot(&table);
    let warning = warn_if(snapshot.is_empty(), KPI_EMPTY_WARNING);
    Ok(Json(KpiOut { snapshot, warning }))
}

#[derive(Serialize)]
struct TimelineOut {
    #[serde(flatten)]
    timeline: FundingTimeline,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

async fn get_funding_history(State(state): State<AppState>) -> Result<Json<TimelineOut>, ApiError> {
    let table = load(&state, config::FUNDING_HISTORY).await?;
    let timeline = funding::funding_timeline(&table);
    let warning = warn_if(table.is_empty(), HISTORY_EMPTY_WARNING);
    Ok(Json(TimelineOut { timeline, warning }))
}

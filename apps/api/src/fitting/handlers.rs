//! Axum route handlers for the Themes and Fitting API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::fitting::result::FittingResult;
use crate::fitting::stats::{compare_stats, compute_stats, AllocationStats, StatsComparison};
use crate::fitting::validator::{validate, ValidationReport};
use crate::fitting::{fit, fit_content, FitPreferences};
use crate::layout::themes::{all_themes, get_theme, lookup_theme, resolve_theme, Theme};
use crate::models::cv::CvContent;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FitRequest {
    pub content: CvContent,
    /// Defaults to the configured default theme.
    pub theme_id: Option<String>,
    #[serde(default)]
    pub preferences: FitPreferences,
    /// Defaults to today (UTC).
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub content: CvContent,
    pub theme_a: String,
    pub theme_b: String,
    #[serde(default)]
    pub preferences: FitPreferences,
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ThemeSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub total_capacity: u32,
    pub max_pages: u32,
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct FitReport {
    pub result: FittingResult,
    pub validation: ValidationReport,
    pub stats: AllocationStats,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub a: FitReport,
    pub b: FitReport,
    pub comparison: StatsComparison,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/themes
pub async fn handle_list_themes(State(state): State<AppState>) -> Json<Vec<ThemeSummary>> {
    let default_id = get_theme(&state.config.default_theme_id).id;
    let themes = all_themes()
        .iter()
        .map(|theme| ThemeSummary {
            id: theme.id,
            name: theme.name,
            total_capacity: theme.total_capacity,
            max_pages: theme.pages.max_pages,
            is_default: theme.id == default_id,
        })
        .collect();
    Json(themes)
}

/// GET /api/v1/themes/:id
///
/// Explicit lookup: an unknown id is a 404 here, not a fallback.
pub async fn handle_get_theme(Path(theme_id): Path<String>) -> Result<Json<&'static Theme>, AppError> {
    let theme = lookup_theme(&theme_id).map_err(|e| AppError::NotFound(e.to_string()))?;
    Ok(Json(theme))
}

/// POST /api/v1/fit
///
/// Fits the content into the requested theme and returns the full `FittingResult`.
pub async fn handle_fit(
    State(state): State<AppState>,
    Json(request): Json<FitRequest>,
) -> Result<Json<FittingResult>, AppError> {
    check_experience_limit(&state, &request.content)?;
    let theme_id = request
        .theme_id
        .unwrap_or_else(|| state.config.default_theme_id.clone());
    let reference_date = request.reference_date.unwrap_or_else(today);

    let result = run_blocking(move || {
        fit(&request.content, &theme_id, &request.preferences, reference_date)
    })
    .await?;

    Ok(Json(result))
}

/// POST /api/v1/fit/report
///
/// Same input as `/fit`; adds the validator report and allocation stats.
pub async fn handle_fit_report(
    State(state): State<AppState>,
    Json(request): Json<FitRequest>,
) -> Result<Json<FitReport>, AppError> {
    check_experience_limit(&state, &request.content)?;
    let theme_id = request
        .theme_id
        .unwrap_or_else(|| state.config.default_theme_id.clone());
    let reference_date = request.reference_date.unwrap_or_else(today);

    let report = run_blocking(move || {
        build_report(&request.content, &theme_id, &request.preferences, reference_date)
    })
    .await?;

    Ok(Json(report))
}

/// POST /api/v1/fit/compare
///
/// Fits the same content under two themes and compares the outcomes.
pub async fn handle_fit_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    check_experience_limit(&state, &request.content)?;
    let reference_date = request.reference_date.unwrap_or_else(today);

    let response = run_blocking(move || {
        let a = build_report(
            &request.content,
            &request.theme_a,
            &request.preferences,
            reference_date,
        );
        let b = build_report(
            &request.content,
            &request.theme_b,
            &request.preferences,
            reference_date,
        );
        let comparison = compare_stats(&a.stats, &b.stats);
        CompareResponse { a, b, comparison }
    })
    .await?;

    info!(
        theme_a = %response.comparison.theme_a,
        theme_b = %response.comparison.theme_b,
        preferred = %response.comparison.preferred_theme,
        "themes compared"
    );

    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn check_experience_limit(state: &AppState, content: &CvContent) -> Result<(), AppError> {
    let max = state.config.max_experiences_per_request;
    if content.experiences.len() > max {
        return Err(AppError::Validation(format!(
            "Too many experiences: {} (maximum is {max})",
            content.experiences.len()
        )));
    }
    Ok(())
}

/// Runs the CPU-bound engine off the async executor.
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in fitting: {e}")))
}

fn build_report(
    content: &CvContent,
    theme_id: &str,
    prefs: &FitPreferences,
    reference_date: NaiveDate,
) -> FitReport {
    let (theme, fell_back) = resolve_theme(theme_id);
    let result = fit_content(content, theme, fell_back, prefs, reference_date);
    let validation = validate(&result, theme);
    let stats = compute_stats(&result, theme);
    FitReport {
        result,
        validation,
        stats,
    }
}

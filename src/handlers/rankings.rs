// src/handlers/rankings.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError, config::AppState, middleware::i18n::Locale, models::ranking::Rankings,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RankingsQuery {
    /// 1 a 12. Padrão: mês corrente
    pub month: Option<u32>,
    /// Padrão: ano corrente
    pub year: Option<i32>,
    /// Tamanho máximo de cada lista (ex.: 5 para o top 5)
    pub limit: Option<usize>,
}

// GET /api/rankings
#[utoipa::path(
    get,
    path = "/api/rankings",
    tag = "Rankings",
    params(RankingsQuery),
    responses(
        (status = 200, description = "Rankings de supervisores e vendedores do mês", body = Rankings),
        (status = 400, description = "Mês inválido ou no futuro")
    )
)]
pub async fn get_rankings(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<RankingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rankings = app_state
        .ranking_service
        .get_rankings(query.year, query.month, query.limit)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(rankings)))
}

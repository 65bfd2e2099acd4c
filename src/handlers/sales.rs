// src/handlers/sales.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::{
        dates::Period,
        error::ApiError,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        catalog::SaleOptions,
        sale::{Sale, SaleColumn, SaleFields, SalePage},
    },
    services::{
        sales_service::DEFAULT_PAGE_SIZE,
        search::{BiometricFilter, SearchCriteria, SearchResult},
    },
};

// =============================================================================
//  PAYLOADS E RESPOSTAS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListSalesQuery {
    /// Página, começando em 1
    pub page: Option<u64>,
    /// Itens por página (padrão 10)
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Texto livre; cada palavra precisa aparecer no campo escolhido
    #[serde(default)]
    pub q: String,
    /// Campo pesquisado (padrão: client)
    pub field: Option<SaleColumn>,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub biometric: BiometricFilter,
    pub state: Option<String>,
    pub supervisor: Option<String>,
    pub manager: Option<String>,
}

impl From<SearchQuery> for SearchCriteria {
    fn from(query: SearchQuery) -> Self {
        SearchCriteria {
            query: query.q,
            field: query.field.unwrap_or(SaleColumn::Client),
            period: query.period,
            biometric: query.biometric,
            state: query.state,
            supervisor: query.supervisor,
            manager: query.manager,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteSalePayload {
    #[schema(example = "senha-compartilhada")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedSaleResponse {
    pub message: String,
    pub sale: Sale,
}

// =============================================================================
//  CADASTRO
// =============================================================================

// POST /api/vendas
#[utoipa::path(
    post,
    path = "/api/vendas",
    tag = "Vendas",
    request_body = SaleFields,
    responses(
        (status = 201, description = "Venda criada", body = Sale),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SaleFields>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = app_state
        .sales_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// GET /api/vendas
#[utoipa::path(
    get,
    path = "/api/vendas",
    tag = "Vendas",
    params(ListSalesQuery),
    responses(
        (status = 200, description = "Página de vendas, mais recentes primeiro", body = SalePage)
    )
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ListSalesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .sales_service
        .list_page(query.page.unwrap_or(1), query.per_page.unwrap_or(DEFAULT_PAGE_SIZE))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/vendas/search
#[utoipa::path(
    get,
    path = "/api/vendas/search",
    tag = "Vendas",
    params(SearchQuery),
    responses(
        (status = 200, description = "Vendas encontradas", body = SearchResult)
    )
)]
pub async fn search_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let criteria = SearchCriteria::from(query);
    let result = app_state
        .sales_service
        .search(&criteria)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(result)))
}

// GET /api/vendas/options
#[utoipa::path(
    get,
    path = "/api/vendas/options",
    tag = "Vendas",
    responses(
        (status = 200, description = "Listas do formulário de edição", body = SaleOptions)
    )
)]
pub async fn get_options() -> impl IntoResponse {
    Json(SaleOptions::catalog())
}

// GET /api/vendas/{id}
#[utoipa::path(
    get,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    params(("id" = i64, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda", body = Sale),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = app_state
        .sales_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(sale)))
}

// PATCH /api/vendas/{id}
#[utoipa::path(
    patch,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    params(("id" = i64, Path, description = "ID da venda")),
    request_body = SaleFields,
    responses(
        (status = 200, description = "Venda atualizada", body = UpdatedSaleResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    Json(patch): Json<SaleFields>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = app_state
        .sales_service
        .update(id, patch)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.pick("Venda atualizada com sucesso!", "Sale updated successfully!");
    Ok((StatusCode::OK, Json(UpdatedSaleResponse { message: message.to_string(), sale })))
}

// DELETE /api/vendas/{id}
#[utoipa::path(
    delete,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    params(("id" = i64, Path, description = "ID da venda")),
    request_body = DeleteSalePayload,
    responses(
        (status = 200, description = "Venda excluída", body = NoticeResponse),
        (status = 403, description = "Senha incorreta"),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    Json(payload): Json<DeleteSalePayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .sales_service
        .delete(id, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.pick("Venda excluída com sucesso!", "Sale deleted successfully!");
    Ok((StatusCode::OK, Json(NoticeResponse { message: message.to_string() })))
}

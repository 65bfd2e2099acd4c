use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::Locale;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Venda não encontrada")]
    NotFound,

    #[error("Data inválida: {0:?}")]
    InvalidDate(String),

    #[error("Senha de exclusão incorreta")]
    InvalidDeletePassword,

    #[error("Período inválido: {0}")]
    InvalidPeriod(String),

    #[error("Página inválida: {0}")]
    InvalidPage(u64),

    // Falha de rede/banco em qualquer operação do armazenamento
    #[error("Erro no armazenamento de vendas: {0}")]
    StoreError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Aviso que volta para o usuário: status HTTP + mensagem já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: locale
                        .pick("Um ou mais campos são inválidos.", "One or more fields are invalid.")
                        .to_string(),
                    details: Some(details),
                }
            }
            AppError::NotFound => ApiError::new(
                StatusCode::NOT_FOUND,
                locale.pick("Venda não encontrada.", "Sale not found."),
            ),
            AppError::InvalidDate(value) => ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("{} {value:?}", locale.pick("Data inválida:", "Invalid date:")),
            ),
            AppError::InvalidDeletePassword => ApiError::new(
                StatusCode::FORBIDDEN,
                locale.pick("Senha incorreta!", "Wrong password!"),
            ),
            AppError::InvalidPage(page) => ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("{} {page}", locale.pick("Página inválida:", "Invalid page:")),
            ),
            AppError::InvalidPeriod(detail) => ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("{} {detail}", locale.pick("Período inválido:", "Invalid period:")),
            ),

            // Erros de armazenamento e internos viram 500. O detalhe fica só no log.
            e @ (AppError::StoreError(_) | AppError::InternalServerError(_)) => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    locale.pick(
                        "Erro ao acessar as vendas. Tente novamente mais tarde.",
                        "Could not reach the sales store. Please try again later.",
                    ),
                )
            }
        }
    }
}

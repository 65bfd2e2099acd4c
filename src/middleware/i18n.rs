// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Idioma das mensagens devolvidas ao usuário. Sem cabeçalho, português.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Pt,
    En,
}

impl Locale {
    pub fn from_header(value: &str) -> Self {
        accept_language::parse(value)
            .first()
            // "pt-BR" -> "pt", "en-US" -> "en"
            .map(|tag| tag.split('-').next().unwrap_or(tag.as_str()).to_ascii_lowercase())
            .map(|lang| match lang.as_str() {
                "en" => Locale::En,
                _ => Locale::Pt,
            })
            .unwrap_or_default()
    }

    pub fn pick(self, pt: &'static str, en: &'static str) -> &'static str {
        match self {
            Locale::Pt => pt,
            Locale::En => en,
        }
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

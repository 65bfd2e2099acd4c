// src/handlers/dashboard.rs

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::{stream, Stream};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use utoipa::IntoParams;

use crate::{
    common::{dates::Period, error::ApiError},
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::{BiometricBreakdown, DashboardData},
    services::{events::SaleEvent, DashboardService},
};

// O dashboard abre no dia de hoje
fn default_period() -> Period {
    Period::Today
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// today | thisWeek | thisMonth | all (aceita daily/weekly/monthly)
    #[serde(default = "default_period")]
    pub period: Period,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BiometricsQuery {
    #[param(example = "PERNAMBUCO")]
    pub state: String,
    #[serde(default = "default_period")]
    pub period: Period,
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Métricas por estado e globais do período", body = DashboardData)
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let data = app_state
        .dashboard_service
        .get_dashboard(query.period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(data)))
}

// GET /api/dashboard/biometrics
#[utoipa::path(
    get,
    path = "/api/dashboard/biometrics",
    tag = "Dashboard",
    params(BiometricsQuery),
    responses(
        (status = 200, description = "Biometria de um estado no período", body = BiometricBreakdown)
    )
)]
pub async fn get_biometrics(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<BiometricsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let breakdown = app_state
        .dashboard_service
        .get_biometric_breakdown(&query.state, query.period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(breakdown)))
}

// GET /api/dashboard/stream
#[utoipa::path(
    get,
    path = "/api/dashboard/stream",
    tag = "Dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Server-Sent Events: um `snapshot` ao conectar e outro a cada mudança nas vendas")
    )
)]
pub async fn stream_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DashboardQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = app_state.events.subscribe();
    let stream = snapshot_stream(app_state.dashboard_service, query.period, receiver, locale);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

struct StreamState {
    service: DashboardService,
    period: Period,
    receiver: broadcast::Receiver<SaleEvent>,
    locale: Locale,
    connected: bool,
}

/// Snapshot inicial e um novo a cada evento. Termina quando o feed fecha.
fn snapshot_stream(
    service: DashboardService,
    period: Period,
    receiver: broadcast::Receiver<SaleEvent>,
    locale: Locale,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let state = StreamState { service, period, receiver, locale, connected: false };

    stream::unfold(state, |mut state| async move {
        if state.connected {
            match state.receiver.recv().await {
                Ok(_) => {}
                // Perdeu eventos: um recálculo cobre todos
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "stream do dashboard atrasado");
                }
                Err(RecvError::Closed) => return None,
            }
        }
        state.connected = true;

        let event = snapshot_event(&state.service, state.period, state.locale).await;
        Some((Ok(event), state))
    })
}

async fn snapshot_event(service: &DashboardService, period: Period, locale: Locale) -> Event {
    match service.get_dashboard(period).await {
        Ok(data) => Event::default()
            .event("snapshot")
            .json_data(&data)
            .unwrap_or_else(|e| {
                tracing::error!("Falha ao serializar o dashboard: {}", e);
                Event::default().event("error").data("serialization")
            }),
        // O erro vai como evento; a conexão continua aberta
        Err(e) => Event::default().event("error").data(e.to_api_error(&locale).message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::MemorySaleRepository, services::events::SaleEvents};
    use futures::StreamExt;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stream_sends_snapshot_per_event_and_ends_with_feed() {
        let service = DashboardService::new(Arc::new(MemorySaleRepository::new()));
        let events = SaleEvents::new();
        let mut stream = Box::pin(snapshot_stream(service, Period::All, events.subscribe(), Locale::Pt));

        // Snapshot ao conectar
        assert!(matches!(stream.next().await, Some(Ok(_))));

        events.publish(SaleEvent::Created(1));
        assert!(matches!(stream.next().await, Some(Ok(_))));

        drop(events);
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_dashboard_defaults_to_today() {
        let query: DashboardQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.period, Period::Today);

        let query: DashboardQuery = serde_json::from_value(serde_json::json!({ "period": "monthly" })).unwrap();
        assert_eq!(query.period, Period::ThisMonth);
    }
}

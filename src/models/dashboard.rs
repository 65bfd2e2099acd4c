// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::common::dates::Period;

// 1. Faixa da meta (cor do badge no card do estado)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Success, // >= 80%
    Warning, // >= 70%
    #[default]
    Error,
}

impl TargetStatus {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            80.. => TargetStatus::Success,
            70..=79 => TargetStatus::Warning,
            _ => TargetStatus::Error,
        }
    }
}

// 2. Vendedor dentro de um estado
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorTally {
    pub name: Option<String>,
    pub supervisor: Option<String>,
    pub state: Option<String>,
    pub count: u32,
}

// 3. Card de um estado
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateMetrics {
    /// Estado ausente também é uma chave válida (vem como null).
    pub state: Option<String>,
    pub total: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub canceled: u32,
    pub in_treatment_ctop: u32,
    pub in_treatment_doc: u32,
    pub reinput: u32,

    pub biometric_total: u32,
    pub biometric_approved: u32,
    pub biometric_in_progress: u32,
    pub biometric_not_done: u32,
    pub biometric_rejected: u32,

    pub daily_target: u32,
    pub target_percent: u32,
    pub target_status: TargetStatus,

    pub vendors: Vec<VendorTally>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferTally {
    pub name: Option<String>,
    pub count: u32,
}

// 4. Totais para o gráfico de status das ordens
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusTotals {
    pub completed: u32,
    pub in_progress: u32,
    pub canceled: u32,
}

// 5. Métricas gerais (card do topo)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMetrics {
    pub best_selling_offer: Option<OfferTally>,
    /// Soma dos valores concluídos / quantidade concluída, 2 casas ("0.00" sem vendas).
    #[schema(example = "130.00")]
    pub average_ticket: String,
    pub status_totals: StatusTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub period: Period,
    pub states: Vec<StateMetrics>,
    pub metrics: GlobalMetrics,
}

// 6. Modal de biometria de um estado
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BiometricBreakdown {
    pub state: String,
    pub period: Period,
    pub approved: u32,
    pub in_progress: u32,
    pub rejected: u32,
    pub not_done: u32,
}

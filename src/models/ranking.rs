// src/models/ranking.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RankingDimension {
    Supervisor,
    Salesperson,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    #[schema(example = 1)]
    pub position: usize,
    /// "N/A" quando a venda não tem o campo preenchido.
    #[schema(example = "José Silva")]
    pub name: String,
    #[schema(example = 12)]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    pub year: i32,
    pub month: u32,
    pub supervisors: Vec<RankingEntry>,
    pub salespeople: Vec<RankingEntry>,
}

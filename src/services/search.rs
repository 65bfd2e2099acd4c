// src/services/search.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::{
        dates::{filter_by_period, sort_by_date_desc, Period},
        text::{contains_all_words, query_words, same_name},
    },
    models::sale::{BiometricStatus, Sale, SaleColumn},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum BiometricFilter {
    #[default]
    All,
    /// Só biometria APROVADA
    #[serde(alias = "aprovada")]
    Approved,
    /// Todo o resto, inclusive vazio
    #[serde(alias = "pendente")]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub query: String,
    pub field: SaleColumn,
    pub period: Period,
    pub biometric: BiometricFilter,
    // Filtros de categoria: igualdade sem caixa/acentos
    pub state: Option<String>,
    pub supervisor: Option<String>,
    pub manager: Option<String>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            field: SaleColumn::Client,
            period: Period::All,
            biometric: BiometricFilter::All,
            state: None,
            supervisor: None,
            manager: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub count: usize,
    pub sales: Vec<Sale>,
}

fn is_approved(sale: &Sale) -> bool {
    sale.fields
        .biometric_status
        .as_deref()
        .is_some_and(|b| b.trim().to_uppercase() == BiometricStatus::Approved.label())
}

fn matches_name(value: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        Some(wanted) if !wanted.trim().is_empty() => value.is_some_and(|v| same_name(v, wanted)),
        _ => true,
    }
}

/// Busca livre + filtros sobre a lista em memória.
/// Com período diferente de `All`, o resultado sai reordenado por data (mais recente primeiro).
pub fn search_sales(sales: Vec<Sale>, criteria: &SearchCriteria, now: NaiveDateTime) -> SearchResult {
    let words = query_words(&criteria.query);

    let mut sales: Vec<Sale> = sales
        .into_iter()
        .filter(|sale| {
            words.is_empty()
                || contains_all_words(sale.get(criteria.field).unwrap_or_default(), &words)
        })
        .filter(|sale| matches_name(sale.fields.state.as_deref(), criteria.state.as_deref()))
        .filter(|sale| matches_name(sale.fields.supervisor.as_deref(), criteria.supervisor.as_deref()))
        .filter(|sale| matches_name(sale.fields.manager.as_deref(), criteria.manager.as_deref()))
        .collect();

    if criteria.period != Period::All {
        sales = filter_by_period(sales, criteria.period, now);
        sort_by_date_desc(&mut sales);
    }

    match criteria.biometric {
        BiometricFilter::All => {}
        BiometricFilter::Approved => sales.retain(is_approved),
        BiometricFilter::Pending => sales.retain(|s| !is_approved(s)),
    }

    SearchResult { count: sales.len(), sales }
}

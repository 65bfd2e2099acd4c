// src/services/dashboard_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::{
        dates::{filter_by_period, local_now, Period},
        error::AppError,
        text::parse_price,
    },
    db::{SaleQuery, SaleStore},
    models::{
        catalog::daily_target,
        dashboard::{
            BiometricBreakdown, DashboardData, GlobalMetrics, OfferTally, StateMetrics,
            StatusTotals, TargetStatus, VendorTally,
        },
        sale::{BiometricStatus, OrderStatus, Sale, SaleType},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn SaleStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn SaleStore>) -> Self {
        Self { store }
    }

    pub async fn get_dashboard(&self, period: Period) -> Result<DashboardData, AppError> {
        self.get_dashboard_at(period, local_now()).await
    }

    pub async fn get_dashboard_at(
        &self,
        period: Period,
        now: NaiveDateTime,
    ) -> Result<DashboardData, AppError> {
        let sales = self.store.select(&SaleQuery::new()).await?;
        let sales = filter_by_period(sales, period, now);

        let states = aggregate_by_state(&sales);
        let metrics = global_metrics(&sales, &states);

        Ok(DashboardData { period, states, metrics })
    }

    pub async fn get_biometric_breakdown(
        &self,
        state: &str,
        period: Period,
    ) -> Result<BiometricBreakdown, AppError> {
        self.get_biometric_breakdown_at(state, period, local_now()).await
    }

    pub async fn get_biometric_breakdown_at(
        &self,
        state: &str,
        period: Period,
        now: NaiveDateTime,
    ) -> Result<BiometricBreakdown, AppError> {
        let sales = self.store.select(&SaleQuery::new()).await?;
        let sales = filter_by_period(sales, period, now);

        Ok(biometric_breakdown(&sales, state, period))
    }
}

// =========================================================================
//  MOTOR DE AGREGAÇÃO (funções puras sobre a lista já filtrada)
// =========================================================================

/// Agrupa por estado, na ordem em que cada estado aparece pela primeira vez.
/// Estado ausente vira um grupo próprio (`state: None`).
pub fn aggregate_by_state(sales: &[Sale]) -> Vec<StateMetrics> {
    let mut states: Vec<StateMetrics> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();

    for sale in sales {
        let key = sale.fields.state.as_deref();
        let slot = *index.entry(key).or_insert_with(|| {
            states.push(StateMetrics {
                state: key.map(str::to_string),
                ..Default::default()
            });
            states.len() - 1
        });
        let metrics = &mut states[slot];

        metrics.total += 1;

        // Status fora do vocabulário só contam no total
        match sale.order_status() {
            Some(OrderStatus::Completed) => metrics.completed += 1,
            Some(OrderStatus::InProgress) => metrics.in_progress += 1,
            Some(OrderStatus::Canceled) => metrics.canceled += 1,
            Some(OrderStatus::InTreatmentCtop) => metrics.in_treatment_ctop += 1,
            Some(OrderStatus::InTreatmentDoc) => metrics.in_treatment_doc += 1,
            None => {}
        }

        if sale.sale_type() == Some(SaleType::Reinput) {
            metrics.reinput += 1;
        }

        if sale.fields.biometric_status.as_deref().is_some_and(|b| !b.is_empty()) {
            metrics.biometric_total += 1;
            match sale.biometric_status() {
                Some(BiometricStatus::Approved) => metrics.biometric_approved += 1,
                Some(BiometricStatus::InProgress) => metrics.biometric_in_progress += 1,
                Some(BiometricStatus::NotDone) => metrics.biometric_not_done += 1,
                Some(BiometricStatus::Rejected) => metrics.biometric_rejected += 1,
                None => {}
            }
        }

        let salesperson = sale.fields.salesperson.as_deref();
        match metrics.vendors.iter_mut().find(|v| v.name.as_deref() == salesperson) {
            Some(vendor) => vendor.count += 1,
            None => metrics.vendors.push(VendorTally {
                name: salesperson.map(str::to_string),
                supervisor: sale.fields.supervisor.clone(),
                state: sale.fields.state.clone(),
                count: 1,
            }),
        }
    }

    for metrics in &mut states {
        metrics.daily_target = daily_target(metrics.state.as_deref());
        metrics.target_percent = target_percent(metrics.completed, metrics.daily_target);
        metrics.target_status = TargetStatus::from_percent(metrics.target_percent);
    }

    states
}

/// round(concluídas / meta * 100). A meta nunca é zero (padrão 75).
pub fn target_percent(completed: u32, target: u32) -> u32 {
    (f64::from(completed) / f64::from(target.max(1)) * 100.0).round() as u32
}

pub fn global_metrics(sales: &[Sale], states: &[StateMetrics]) -> GlobalMetrics {
    let mut offers: Vec<OfferTally> = Vec::new();
    let mut total_value = Decimal::ZERO;
    let mut completed = 0u32;

    for sale in sales.iter().filter(|s| s.is_completed()) {
        completed += 1;
        total_value += sale.fields.price.as_deref().and_then(parse_price).unwrap_or(Decimal::ZERO);

        let offer = sale.fields.offer.as_deref();
        match offers.iter_mut().find(|o| o.name.as_deref() == offer) {
            Some(tally) => tally.count += 1,
            None => offers.push(OfferTally { name: offer.map(str::to_string), count: 1 }),
        }
    }

    // Empate: fica a primeira oferta encontrada
    let best_selling_offer = offers
        .into_iter()
        .fold(None, |best: Option<OfferTally>, tally| match best {
            Some(b) if b.count >= tally.count => Some(b),
            _ => Some(tally),
        });

    let average_ticket = if completed > 0 {
        (total_value / Decimal::from(completed))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    let status_totals = states.iter().fold(StatusTotals::default(), |mut acc, m| {
        acc.completed += m.completed;
        acc.in_progress += m.in_progress;
        acc.canceled += m.canceled;
        acc
    });

    GlobalMetrics {
        best_selling_offer,
        average_ticket: format!("{average_ticket:.2}"),
        status_totals,
    }
}

/// Biometria de um estado. Venda sem biometria conta como "NÃO FEZ";
/// rótulos desconhecidos são ignorados.
pub fn biometric_breakdown(sales: &[Sale], state: &str, period: Period) -> BiometricBreakdown {
    let mut breakdown = BiometricBreakdown {
        state: state.to_string(),
        period,
        ..Default::default()
    };

    for sale in sales.iter().filter(|s| s.fields.state.as_deref() == Some(state)) {
        let status = match sale.fields.biometric_status.as_deref() {
            None | Some("") => Some(BiometricStatus::NotDone),
            Some(label) => BiometricStatus::from_label(label),
        };
        match status {
            Some(BiometricStatus::Approved) => breakdown.approved += 1,
            Some(BiometricStatus::InProgress) => breakdown.in_progress += 1,
            Some(BiometricStatus::Rejected) => breakdown.rejected += 1,
            Some(BiometricStatus::NotDone) => breakdown.not_done += 1,
            None => {}
        }
    }

    breakdown
}

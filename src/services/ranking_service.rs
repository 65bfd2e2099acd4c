// src/services/ranking_service.rs

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::{
    common::{
        dates::{local_now, month_bounds, sale_date_of},
        error::AppError,
    },
    db::{SaleQuery, SaleStore},
    models::{
        ranking::{RankingDimension, RankingEntry, Rankings},
        sale::{OrderStatus, Sale, SaleColumn},
    },
};

const MISSING_NAME: &str = "N/A";

#[derive(Clone)]
pub struct RankingService {
    store: Arc<dyn SaleStore>,
}

impl RankingService {
    pub fn new(store: Arc<dyn SaleStore>) -> Self {
        Self { store }
    }

    /// Rankings do mês (padrão: mês corrente). Meses futuros são recusados.
    pub async fn get_rankings(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        limit: Option<usize>,
    ) -> Result<Rankings, AppError> {
        self.get_rankings_at(year, month, limit, local_now().date()).await
    }

    pub async fn get_rankings_at(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        limit: Option<usize>,
        today: NaiveDate,
    ) -> Result<Rankings, AppError> {
        let year = year.unwrap_or(today.year());
        let month = month.unwrap_or(today.month());

        let (first, last) = month_bounds(year, month)
            .ok_or_else(|| AppError::InvalidPeriod(format!("{month:02}/{year}")))?;
        if first > today {
            return Err(AppError::InvalidPeriod(format!("{month:02}/{year}")));
        }

        // O filtro de status vai para o armazenamento; o de data fica aqui,
        // porque a coluna guarda datas em formatos diferentes.
        let query = SaleQuery::new().eq(SaleColumn::OrderStatus, OrderStatus::Completed.label());
        let sales: Vec<Sale> = self
            .store
            .select(&query)
            .await?
            .into_iter()
            .filter(|sale| match sale_date_of(sale) {
                Ok(date) => date >= first && date <= last,
                Err(e) => {
                    tracing::warn!("Venda {} fora do ranking: {}", sale.id, e);
                    false
                }
            })
            .collect();

        if sales.is_empty() {
            tracing::info!("Nenhuma venda concluída em {:02}/{}", month, year);
        }

        Ok(Rankings {
            year,
            month,
            supervisors: rank(&sales, RankingDimension::Supervisor, limit),
            salespeople: rank(&sales, RankingDimension::Salesperson, limit),
        })
    }
}

/// Conta vendas concluídas por supervisor ou vendedor, da maior para a menor.
/// Empates mantêm a ordem em que o nome apareceu (ordenação estável).
pub fn rank(sales: &[Sale], dimension: RankingDimension, limit: Option<usize>) -> Vec<RankingEntry> {
    let column = match dimension {
        RankingDimension::Supervisor => SaleColumn::Supervisor,
        RankingDimension::Salesperson => SaleColumn::Salesperson,
    };

    let mut counts: Vec<(String, u32)> = Vec::new();
    for sale in sales.iter().filter(|s| s.is_completed()) {
        let name = sale.get(column).filter(|n| !n.is_empty()).unwrap_or(MISSING_NAME);
        match counts.iter_mut().find(|(key, _)| key == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name.to_string(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some(limit) = limit {
        counts.truncate(limit);
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, (name, count))| RankingEntry { position: i + 1, name, count })
        .collect()
}

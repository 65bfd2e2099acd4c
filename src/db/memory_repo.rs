// src/db/memory_repo.rs

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    db::sale_repo::{SaleQuery, SaleStore},
    models::sale::{Sale, SaleFields},
};

/// Armazenamento em memória, com a mesma semântica do repositório Postgres.
/// Usado em desenvolvimento (`STORE_BACKEND=memory`) e nos testes.
#[derive(Default)]
pub struct MemorySaleRepository {
    inner: RwLock<MemoryTable>,
}

#[derive(Default)]
struct MemoryTable {
    rows: Vec<Sale>,
    last_id: i64,
}

impl MemorySaleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_nullable(a: Option<&str>, b: Option<&str>, ascending: bool) -> Ordering {
    // NULLS LAST nas duas direções, igual ao SQL
    match (a, b) {
        (Some(a), Some(b)) if ascending => a.cmp(b),
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl SaleStore for MemorySaleRepository {
    async fn select(&self, query: &SaleQuery) -> Result<Vec<Sale>, AppError> {
        let table = self.inner.read().await;

        let mut rows: Vec<Sale> = table
            .rows
            .iter()
            .filter(|sale| {
                query
                    .filters
                    .iter()
                    .all(|f| sale.get(f.column) == Some(f.value.as_str()))
            })
            .cloned()
            .collect();

        if let Some(order) = query.order {
            rows.sort_by(|a, b| {
                compare_nullable(a.get(order.column), b.get(order.column), order.ascending)
                    .then_with(|| b.id.cmp(&a.id))
            });
        }

        if let Some(range) = query.range {
            rows = rows
                .into_iter()
                .skip(range.offset as usize)
                .take(range.limit as usize)
                .collect();
        }

        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, AppError> {
        let table = self.inner.read().await;
        Ok(table.rows.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, fields: &SaleFields) -> Result<Sale, AppError> {
        let mut table = self.inner.write().await;
        table.last_id += 1;

        let sale = Sale {
            id: table.last_id,
            created_at: Utc::now(),
            fields: fields.clone(),
        };
        table.rows.push(sale.clone());

        Ok(sale)
    }

    async fn update(&self, id: i64, patch: &SaleFields) -> Result<(), AppError> {
        let mut table = self.inner.write().await;
        let sale = table
            .rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::NotFound)?;

        sale.fields.apply(patch);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut table = self.inner.write().await;
        let before = table.rows.len();
        table.rows.retain(|s| s.id != id);

        if table.rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sale::SaleColumn;

    fn fields(sale_date: &str, state: &str) -> SaleFields {
        SaleFields {
            sale_date: Some(sale_date.into()),
            state: Some(state.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_and_unique() {
        let repo = MemorySaleRepository::new();
        let a = repo.insert(&fields("2024-03-01", "BAHIA")).await.unwrap();
        let b = repo.insert(&fields("2024-03-02", "BAHIA")).await.unwrap();
        assert_ne!(a.id, b.id);

        repo.delete(a.id).await.unwrap();
        let c = repo.insert(&fields("2024-03-03", "CEARÁ")).await.unwrap();
        assert!(c.id > b.id);
    }

    #[tokio::test]
    async fn test_select_filter_order_range() {
        let repo = MemorySaleRepository::new();
        for (date, state) in [
            ("2024-03-01", "BAHIA"),
            ("2024-03-03", "BAHIA"),
            ("2024-03-02", "CEARÁ"),
            ("2024-03-04", "BAHIA"),
        ] {
            repo.insert(&fields(date, state)).await.unwrap();
        }

        let query = SaleQuery::new()
            .eq(SaleColumn::State, "BAHIA")
            .order_by(SaleColumn::SaleDate, false)
            .range(1, 5);
        let rows = repo.select(&query).await.unwrap();
        let dates: Vec<_> = rows.iter().map(|s| s.get(SaleColumn::SaleDate).unwrap()).collect();
        assert_eq!(dates, vec!["2024-03-03", "2024-03-01"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id() {
        let repo = MemorySaleRepository::new();
        let patch = fields("2024-03-01", "BAHIA");
        assert!(matches!(repo.update(99, &patch).await, Err(AppError::NotFound)));
        assert!(matches!(repo.delete(99).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let repo = MemorySaleRepository::new();
        let sale = repo.insert(&fields("2024-03-01", "BAHIA")).await.unwrap();

        let patch = SaleFields {
            order_status: Some("CANCELADA".into()),
            ..Default::default()
        };
        repo.update(sale.id, &patch).await.unwrap();

        let stored = repo.find_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(stored.fields.state.as_deref(), Some("BAHIA"));
        assert_eq!(stored.fields.order_status.as_deref(), Some("CANCELADA"));
    }
}

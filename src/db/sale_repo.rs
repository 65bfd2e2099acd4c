// src/db/sale_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::sale::{Sale, SaleColumn, SaleFields},
};

// =========================================================================
//  CONSULTA
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleFilter {
    pub column: SaleColumn,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleOrder {
    pub column: SaleColumn,
    pub ascending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleRange {
    pub offset: u64,
    pub limit: u64,
}

/// SELECT sobre `vendas`: igualdade por coluna, ordenação e faixa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleQuery {
    pub filters: Vec<SaleFilter>,
    pub order: Option<SaleOrder>,
    pub range: Option<SaleRange>,
}

impl SaleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: SaleColumn, value: impl Into<String>) -> Self {
        self.filters.push(SaleFilter { column, value: value.into() });
        self
    }

    pub fn order_by(mut self, column: SaleColumn, ascending: bool) -> Self {
        self.order = Some(SaleOrder { column, ascending });
        self
    }

    pub fn range(mut self, offset: u64, limit: u64) -> Self {
        self.range = Some(SaleRange { offset, limit });
        self
    }
}

// =========================================================================
//  ARMAZENAMENTO
// =========================================================================

/// O que o resto do sistema precisa de quem guarda as vendas.
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn select(&self, query: &SaleQuery) -> Result<Vec<Sale>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, AppError>;

    /// O id é atribuído pelo armazenamento.
    async fn insert(&self, fields: &SaleFields) -> Result<Sale, AppError>;

    /// Troca só os campos preenchidos em `patch`. `NotFound` se o id não existe.
    async fn update(&self, id: i64, patch: &SaleFields) -> Result<(), AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn build_select(query: &SaleQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM vendas");

    if !query.filters.is_empty() {
        qb.push(" WHERE ");
        let mut conditions = qb.separated(" AND ");
        for filter in &query.filters {
            conditions.push(filter.column.as_sql());
            conditions.push_unseparated(" = ");
            conditions.push_bind_unseparated(filter.value.clone());
        }
    }

    if let Some(order) = query.order {
        qb.push(" ORDER BY ")
            .push(order.column.as_sql())
            .push(if order.ascending { " ASC NULLS LAST" } else { " DESC NULLS LAST" })
            .push(", id DESC");
    }

    if let Some(range) = query.range {
        // i64 porque o Postgres não tem inteiro sem sinal
        qb.push(" LIMIT ")
            .push_bind(range.limit as i64)
            .push(" OFFSET ")
            .push_bind(range.offset as i64);
    }

    qb
}

#[async_trait]
impl SaleStore for SaleRepository {
    async fn select(&self, query: &SaleQuery) -> Result<Vec<Sale>, AppError> {
        let sales = build_select(query)
            .build_query_as::<Sale>()
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM vendas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    async fn insert(&self, fields: &SaleFields) -> Result<Sale, AppError> {
        let present: Vec<(SaleColumn, &str)> = fields.present().collect();

        // Formulário vazio: só id e created_at
        if present.is_empty() {
            let sale = sqlx::query_as::<_, Sale>("INSERT INTO vendas DEFAULT VALUES RETURNING *")
                .fetch_one(&self.pool)
                .await?;
            return Ok(sale);
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("INSERT INTO vendas (");
        let mut columns = qb.separated(", ");
        for (column, _) in &present {
            columns.push(column.as_sql());
        }
        qb.push(") VALUES (");
        let mut values = qb.separated(", ");
        for (_, value) in &present {
            values.push_bind(value.to_string());
        }
        qb.push(") RETURNING *");

        let sale = qb.build_query_as::<Sale>().fetch_one(&self.pool).await?;

        Ok(sale)
    }

    async fn update(&self, id: i64, patch: &SaleFields) -> Result<(), AppError> {
        if patch.is_empty() {
            // Nada para trocar, mas o id ainda precisa existir
            return match self.find_by_id(id).await? {
                Some(_) => Ok(()),
                None => Err(AppError::NotFound),
            };
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE vendas SET ");
        let mut assignments = qb.separated(", ");
        for (column, value) in patch.present() {
            assignments.push(column.as_sql());
            assignments.push_unseparated(" = ");
            assignments.push_bind_unseparated(value.to_string());
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vendas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

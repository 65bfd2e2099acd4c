// src/services/sales_service.rs

use std::sync::Arc;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{dates::local_now, error::AppError},
    db::{SaleQuery, SaleStore},
    models::sale::{Sale, SaleColumn, SaleFields, SalePage},
    services::{
        events::{SaleEvent, SaleEvents},
        search::{search_sales, SearchCriteria, SearchResult},
    },
};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// Fluxo do cadastro: criar, listar, editar, excluir e buscar vendas.
#[derive(Clone)]
pub struct SalesService {
    store: Arc<dyn SaleStore>,
    events: SaleEvents,
    delete_password: Arc<str>,
}

impl SalesService {
    pub fn new(store: Arc<dyn SaleStore>, events: SaleEvents, delete_password: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            events,
            delete_password: delete_password.into(),
        }
    }

    pub async fn create(&self, fields: SaleFields) -> Result<Sale, AppError> {
        validate_new_sale(&fields)?;

        let sale = self.store.insert(&fields).await?;
        tracing::info!("Venda {} salva com sucesso", sale.id);
        self.events.publish(SaleEvent::Created(sale.id));

        Ok(sale)
    }

    /// Páginas começam em 1. Mais recentes primeiro.
    pub async fn list_page(&self, page: u64, per_page: u64) -> Result<SalePage, AppError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);

        // O offset vai para o Postgres como BIGINT
        let offset = (page - 1)
            .checked_mul(per_page)
            .filter(|offset| *offset <= i64::MAX as u64)
            .ok_or(AppError::InvalidPage(page))?;

        // Uma linha a mais para saber se existe próxima página
        let query = SaleQuery::new()
            .order_by(SaleColumn::SaleDate, false)
            .range(offset, per_page + 1);
        let mut sales = self.store.select(&query).await?;

        let has_more = sales.len() as u64 > per_page;
        sales.truncate(per_page as usize);

        Ok(SalePage { sales, page, per_page, has_more })
    }

    pub async fn get(&self, id: i64) -> Result<Sale, AppError> {
        self.store.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn update(&self, id: i64, patch: SaleFields) -> Result<Sale, AppError> {
        patch.validate()?;

        self.store.update(id, &patch).await?;
        tracing::info!("Venda {} atualizada", id);
        self.events.publish(SaleEvent::Updated(id));

        self.get(id).await
    }

    pub async fn delete(&self, id: i64, password: &str) -> Result<(), AppError> {
        if password != &*self.delete_password {
            tracing::warn!("Senha incorreta ao excluir a venda {}", id);
            return Err(AppError::InvalidDeletePassword);
        }

        self.store.delete(id).await?;
        tracing::info!("Venda {} excluída", id);
        self.events.publish(SaleEvent::Deleted(id));

        Ok(())
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult, AppError> {
        let query = SaleQuery::new().order_by(SaleColumn::SaleDate, false);
        let sales = self.store.select(&query).await?;
        Ok(search_sales(sales, criteria, local_now()))
    }
}

/// Na criação a data da venda é obrigatória; o resto segue o `Validate`.
fn validate_new_sale(fields: &SaleFields) -> Result<(), ValidationErrors> {
    let mut errors = fields.validate().err().unwrap_or_else(ValidationErrors::new);

    if fields.sale_date.as_deref().is_none_or(|d| d.trim().is_empty()) {
        errors.add("sale_date", ValidationError::new("required").with_message("required".into()));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemorySaleRepository;

    fn service() -> SalesService {
        SalesService::new(Arc::new(MemorySaleRepository::new()), SaleEvents::new(), "segredo")
    }

    fn fields(date: &str, client: &str) -> SaleFields {
        SaleFields {
            sale_date: Some(date.into()),
            client: Some(client.into()),
            order_status: Some("EM ANDAMENTO".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_sale_date() {
        let service = service();
        let result = service.create(SaleFields { client: Some("Maria".into()), ..Default::default() }).await;

        match result {
            Err(AppError::ValidationError(errors)) => {
                assert!(errors.field_errors().contains_key("sale_date"));
            }
            other => panic!("esperava erro de validação, veio {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_publishes_event() {
        let service = service();
        let mut rx = service.events.subscribe();

        let sale = service.create(fields("2024-03-15", "Maria")).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), SaleEvent::Created(sale.id));
        assert_eq!(service.get(sale.id).await.unwrap().fields.client.as_deref(), Some("Maria"));
    }

    #[tokio::test]
    async fn test_list_page_reports_more() {
        let service = service();
        for day in 1..=12 {
            service.create(fields(&format!("2024-03-{day:02}"), "c")).await.unwrap();
        }

        let first = service.list_page(1, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(first.sales.len(), 10);
        assert!(first.has_more);
        assert_eq!(first.sales[0].fields.sale_date.as_deref(), Some("2024-03-12"));

        let second = service.list_page(2, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(second.sales.len(), 2);
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn test_list_page_rejects_page_past_offset_range() {
        let service = service();
        service.create(fields("2024-03-01", "c")).await.unwrap();

        let huge = service.list_page(u64::MAX, DEFAULT_PAGE_SIZE).await;
        assert!(matches!(huge, Err(AppError::InvalidPage(u64::MAX))));

        // Página 0 vira 1
        let first = service.list_page(0, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(first.page, 1);
        assert_eq!(first.sales.len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let service = service();
        let sale = service.create(fields("2024-03-15", "Maria")).await.unwrap();
        let mut rx = service.events.subscribe();

        let patch = SaleFields { order_status: Some("CONCLUÍDO".into()), ..Default::default() };
        let updated = service.update(sale.id, patch).await.unwrap();

        assert_eq!(updated.fields.client.as_deref(), Some("Maria"));
        assert!(updated.is_completed());
        assert_eq!(rx.recv().await.unwrap(), SaleEvent::Updated(sale.id));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let service = service();
        let patch = SaleFields { client: Some("x".into()), ..Default::default() };
        assert!(matches!(service.update(999, patch).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_checks_password() {
        let service = service();
        let sale = service.create(fields("2024-03-15", "Maria")).await.unwrap();

        let wrong = service.delete(sale.id, "chute").await;
        assert!(matches!(wrong, Err(AppError::InvalidDeletePassword)));
        assert!(service.get(sale.id).await.is_ok());

        service.delete(sale.id, "segredo").await.unwrap();
        assert!(matches!(service.get(sale.id).await, Err(AppError::NotFound)));
        assert!(matches!(service.delete(sale.id, "segredo").await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_search_goes_through_store() {
        let service = service();
        service.create(fields("2024-03-15", "Maria da Silva")).await.unwrap();
        service.create(fields("2024-03-16", "João Souza")).await.unwrap();

        let criteria = SearchCriteria { query: "silva".into(), ..Default::default() };
        let result = service.search(&criteria).await.unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.sales[0].fields.client.as_deref(), Some("Maria da Silva"));
    }
}

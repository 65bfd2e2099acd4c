// src/config.rs

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{MemorySaleRepository, SaleRepository, SaleStore},
    services::{events::SaleEvents, DashboardService, RankingService, SalesService},
};

pub mod settings;
pub use settings::{Settings, StoreBackend};

#[derive(Clone)]
pub struct AppState {
    pub sales_service: SalesService,
    pub dashboard_service: DashboardService,
    pub ranking_service: RankingService,
    // O stream do dashboard se inscreve aqui
    pub events: SaleEvents,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn SaleStore> = match settings.store_backend {
            StoreBackend::Postgres => {
                let database_url = settings
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;

                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(SaleRepository::new(pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Usando armazenamento em memória: os dados somem ao reiniciar");
                Arc::new(MemorySaleRepository::new())
            }
        };

        Ok(Self::with_store(store, &settings.delete_password))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(store: Arc<dyn SaleStore>, delete_password: &str) -> Self {
        let events = SaleEvents::new();

        Self {
            sales_service: SalesService::new(store.clone(), events.clone(), delete_password),
            dashboard_service: DashboardService::new(store.clone()),
            ranking_service: RankingService::new(store),
            events,
        }
    }
}

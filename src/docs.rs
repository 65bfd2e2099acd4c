// src/docs.rs

use utoipa::OpenApi;

use crate::{common, handlers, models, services};

#[derive(OpenApi)]
#[openapi(
    info(title = "Vendas API", description = "Cadastro, dashboard e rankings de vendas"),
    paths(
        // --- Vendas ---
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::search_sales,
        handlers::sales::get_options,
        handlers::sales::get_sale,
        handlers::sales::update_sale,
        handlers::sales::delete_sale,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_biometrics,
        handlers::dashboard::stream_dashboard,

        // --- Rankings ---
        handlers::rankings::get_rankings,
    ),
    components(
        schemas(
            // --- Vendas ---
            models::sale::Sale,
            models::sale::SaleFields,
            models::sale::SaleColumn,
            models::sale::SalePage,
            models::sale::OrderStatus,
            models::sale::BiometricStatus,
            models::sale::SaleType,
            models::catalog::SaleOptions,
            services::search::BiometricFilter,
            services::search::SearchResult,
            common::dates::Period,

            // --- Payloads ---
            handlers::sales::DeleteSalePayload,
            handlers::sales::NoticeResponse,
            handlers::sales::UpdatedSaleResponse,

            // --- Dashboard ---
            models::dashboard::TargetStatus,
            models::dashboard::VendorTally,
            models::dashboard::StateMetrics,
            models::dashboard::OfferTally,
            models::dashboard::StatusTotals,
            models::dashboard::GlobalMetrics,
            models::dashboard::DashboardData,
            models::dashboard::BiometricBreakdown,

            // --- Rankings ---
            models::ranking::RankingEntry,
            models::ranking::Rankings,
        )
    ),
    tags(
        (name = "Vendas", description = "Cadastro e busca de vendas"),
        (name = "Dashboard", description = "Indicadores por estado e tempo real"),
        (name = "Rankings", description = "Ranking mensal de supervisores e vendedores")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/vendas",
            "/api/vendas/search",
            "/api/vendas/options",
            "/api/vendas/{id}",
            "/api/dashboard",
            "/api/dashboard/biometrics",
            "/api/dashboard/stream",
            "/api/rankings",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltou {path}");
        }
    }
}

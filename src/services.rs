pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod ranking_service;
pub use ranking_service::RankingService;
pub mod sales_service;
pub use sales_service::SalesService;

pub mod events;
pub mod search;

pub mod sale_repo;
pub use sale_repo::{SaleQuery, SaleRepository, SaleStore};
pub mod memory_repo;
pub use memory_repo::MemorySaleRepository;

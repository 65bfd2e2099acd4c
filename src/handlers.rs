pub mod dashboard;
pub mod rankings;
pub mod sales;

pub mod catalog;
pub mod dashboard;
pub mod ranking;
pub mod sale;

pub mod dashboard;
pub mod domain;
pub mod fares;
pub mod meals;
pub mod refunds;
pub mod reviews;

pub mod base_price;
pub mod best_times;
pub mod presentation;
pub mod pricing;

use crate::{catalog::Catalog, config::Config};
use actix_web::web;

pub mod items;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/items")
            .service(items::list_items)
            .service(items::get_best_times)
            .service(items::get_timeline)
            .service(items::get_price_quote)
            .service(items::recover_base_price),
    );
}

use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

use shop_forecaster::api::{self, AppState};
use shop_forecaster::catalog::Catalog;
use shop_forecaster::config::Config;

#[get("/")]
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "Shop Forecaster",
        "version": env!("CARGO_PKG_VERSION"),
        "items": state.catalog.len(),
        "shop_closes": state.config.shop_closes.to_rfc3339()
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let catalog = match Catalog::load(&config.items_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;
    log::info!(
        "Price band {:?}, base price {}, shop closes at {}",
        config.band.safe_bounds(),
        config.base_price,
        config.shop_closes
    );
    log::info!("Starting Shop Forecaster at http://0.0.0.0:{}", port);

    let state = web::Data::new(AppState { config, catalog });

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .service(health_check)
            .configure(api::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

use crate::{
    api::AppState,
    models::{Item, PriceCandidate},
    services::{
        base_price,
        best_times::{find_best_times, price_timeline},
        presentation::{describe_change, hours_away, percent_change},
        pricing::{hour_index, quote_price},
    },
};
use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Deserialize)]
pub struct BestTimesQuery {
    pub user_id: Option<String>,
    pub count: Option<usize>,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub user_id: Option<String>,
    pub at: Option<String>, // RFC 3339, defaults to now
}

#[derive(Deserialize)]
pub struct BasePriceQuery {
    pub user_id: Option<String>,
    pub observed: Option<i64>,
    pub at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CandidateResponse {
    pub timestamp: String,
    pub hour_index: i64,
    pub price: i64,
    pub percent_change: f64,
    pub change: String,
    pub hours_away: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BestTimesResponse {
    pub item_id: String,
    pub base_price: f64,
    pub closes_at: String,
    pub candidates: Vec<CandidateResponse>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QuoteResponse {
    pub item_id: String,
    pub hour_index: i64,
    pub seed: String,
    pub random: f64,
    pub price: i64,
    pub base_price: f64,
    pub percent_change: f64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BasePriceResponse {
    pub item_id: String,
    pub observed: i64,
    pub hour_index: i64,
    pub base_price: i64,
}

// ============================================================================
// Helpers
// ============================================================================

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

fn require_user(user_id: &Option<String>) -> Result<String, HttpResponse> {
    match user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(bad_request("user_id is required")),
    }
}

fn find_item<'a>(state: &'a AppState, item_id: &str) -> Result<&'a Item, HttpResponse> {
    state.catalog.get(item_id).ok_or_else(|| {
        HttpResponse::NotFound().json(serde_json::json!({
            "error": "Unknown item",
            "item_id": item_id
        }))
    })
}

fn parse_instant(at: &Option<String>) -> Result<DateTime<Utc>, HttpResponse> {
    match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| bad_request("Invalid 'at' timestamp. Use RFC 3339")),
        None => Ok(Utc::now()),
    }
}

fn to_response(candidate: &PriceCandidate, base_price: f64, now: &DateTime<Utc>) -> CandidateResponse {
    CandidateResponse {
        timestamp: candidate.timestamp.to_rfc3339(),
        hour_index: hour_index(&candidate.timestamp),
        price: candidate.price,
        percent_change: percent_change(candidate.price, base_price),
        change: describe_change(candidate.price, base_price),
        hours_away: hours_away(&candidate.timestamp, now),
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// List the catalog
#[get("")]
pub async fn list_items(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.items())
}

/// Get the cheapest upcoming hours for an item before the shop closes
#[get("/{id}/best-times")]
pub async fn get_best_times(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<BestTimesQuery>,
) -> impl Responder {
    let user_id = match require_user(&query.user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let item = match find_item(&state, &path) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    let config = &state.config;
    let count = query.count.unwrap_or(config.top_k);
    let now = Utc::now();

    let best = find_best_times(
        &user_id,
        &item.id,
        now,
        &config.shop_closes,
        config.base_price,
        &config.band,
        count,
    );

    HttpResponse::Ok().json(BestTimesResponse {
        item_id: item.id.clone(),
        base_price: config.base_price,
        closes_at: config.shop_closes.to_rfc3339(),
        candidates: best
            .iter()
            .map(|c| to_response(c, config.base_price, &now))
            .collect(),
    })
}

/// Get every remaining hourly slot in chronological order
#[get("/{id}/timeline")]
pub async fn get_timeline(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<UserQuery>,
) -> impl Responder {
    let user_id = match require_user(&query.user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let item = match find_item(&state, &path) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    let config = &state.config;
    let now = Utc::now();
    let timeline = price_timeline(
        &user_id,
        &item.id,
        now,
        &config.shop_closes,
        config.base_price,
        &config.band,
    );

    let response: Vec<CandidateResponse> = timeline
        .iter()
        .map(|c| to_response(c, config.base_price, &now))
        .collect();
    HttpResponse::Ok().json(response)
}

/// Get the price an item shows at an instant
#[get("/{id}/price")]
pub async fn get_price_quote(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<QuoteQuery>,
) -> impl Responder {
    let user_id = match require_user(&query.user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let item = match find_item(&state, &path) {
        Ok(item) => item,
        Err(resp) => return resp,
    };
    let at = match parse_instant(&query.at) {
        Ok(at) => at,
        Err(resp) => return resp,
    };

    let config = &state.config;
    let quote = quote_price(&user_id, &item.id, &at, config.base_price, &config.band);

    HttpResponse::Ok().json(QuoteResponse {
        item_id: item.id.clone(),
        hour_index: quote.hour_index,
        seed: quote.seed,
        random: quote.random,
        price: quote.price,
        base_price: config.base_price,
        percent_change: percent_change(quote.price, config.base_price),
    })
}

/// Recover the base price behind an observed price (defaults to the listed price)
#[get("/{id}/base-price")]
pub async fn recover_base_price(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<BasePriceQuery>,
) -> impl Responder {
    let user_id = match require_user(&query.user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let item = match find_item(&state, &path) {
        Ok(item) => item,
        Err(resp) => return resp,
    };
    let at = match parse_instant(&query.at) {
        Ok(at) => at,
        Err(resp) => return resp,
    };

    let observed = query.observed.unwrap_or(item.price.round() as i64);
    if !(1..=base_price::MAX_OBSERVED_PRICE).contains(&observed) {
        return bad_request(&format!(
            "observed must be between 1 and {}",
            base_price::MAX_OBSERVED_PRICE
        ));
    }
    let hour = hour_index(&at);

    match base_price::recover_base_price(&user_id, &item.id, observed, hour, &state.config.band) {
        Some(base) => HttpResponse::Ok().json(BasePriceResponse {
            item_id: item.id.clone(),
            observed,
            hour_index: hour,
            base_price: base,
        }),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": "No base price reproduces the observed price",
            "observed": observed,
            "hour_index": hour
        })),
    }
}

// ============================================================================
// Tests
// ============================================================================

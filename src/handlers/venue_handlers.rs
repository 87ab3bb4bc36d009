use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use diesel::Connection;

use crate::db::{get_conn, DbPool};
use crate::models::search_models::SearchPayload;
use crate::models::venue_models::VenueForm;
use crate::store::venue_store;

pub async fn list_venues(pool: web::Data<DbPool>) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match venue_store::list_venues(&mut conn, Utc::now().naive_utc()) {
        Ok(groups) => HttpResponse::Ok().json(groups),
        Err(e) => e.error_response(),
    }
}

pub async fn search_venues(
    pool: web::Data<DbPool>,
    payload: web::Form<SearchPayload>,
) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match venue_store::search_venues(&mut conn, &payload.term(), Utc::now().naive_utc()) {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => e.error_response(),
    }
}

pub async fn get_venue(pool: web::Data<DbPool>, path: web::Path<i32>) -> impl Responder {
    let venue_id = path.into_inner();

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match venue_store::get_venue(&mut conn, venue_id, Utc::now().naive_utc()) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => e.error_response(),
    }
}

pub async fn create_venue(
    pool: web::Data<DbPool>,
    payload: web::Json<VenueForm>,
) -> impl Responder {
    let form = payload.into_inner();

    // Basic validation
    if form.name.trim().is_empty() {
        return HttpResponse::BadRequest().body("Venue name cannot be empty");
    }
    if form.city.trim().is_empty() || form.state.trim().is_empty() {
        return HttpResponse::BadRequest().body("City and state are required");
    }

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match conn.transaction(|conn| venue_store::create_venue(conn, &form)) {
        Ok(venue) => HttpResponse::Created().json(venue),
        Err(e) => {
            tracing::error!("venue {} could not be listed: {}", form.name, e);
            e.error_response()
        }
    }
}

pub async fn edit_venue(pool: web::Data<DbPool>, path: web::Path<i32>) -> impl Responder {
    let venue_id = path.into_inner();

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match venue_store::venue_prefill(&mut conn, venue_id) {
        Ok(prefill) => HttpResponse::Ok().json(prefill),
        Err(e) => e.error_response(),
    }
}

pub async fn update_venue(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    payload: web::Json<VenueForm>,
) -> impl Responder {
    let venue_id = path.into_inner();
    let form = payload.into_inner();

    // Basic validation
    if form.name.trim().is_empty() {
        return HttpResponse::BadRequest().body("Venue name cannot be empty");
    }
    if form.city.trim().is_empty() || form.state.trim().is_empty() {
        return HttpResponse::BadRequest().body("City and state are required");
    }

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match conn.transaction(|conn| venue_store::update_venue(conn, venue_id, &form)) {
        Ok(venue) => HttpResponse::Ok().json(venue),
        Err(e) => {
            tracing::error!("venue {} could not be updated: {}", venue_id, e);
            e.error_response()
        }
    }
}

pub async fn delete_venue(pool: web::Data<DbPool>, path: web::Path<i32>) -> impl Responder {
    let venue_id = path.into_inner();

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match conn.transaction(|conn| venue_store::delete_venue(conn, venue_id)) {
        Ok(()) => HttpResponse::Ok().body("Venue deleted successfully"),
        Err(e) => {
            tracing::error!("venue {} could not be deleted: {}", venue_id, e);
            e.error_response()
        }
    }
}

use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use diesel::Connection;

use crate::db::{get_conn, DbPool};
use crate::models::artist_models::ArtistForm;
use crate::models::search_models::SearchPayload;
use crate::store::artist_store;

pub async fn list_artists(pool: web::Data<DbPool>) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match artist_store::list_artists(&mut conn, Utc::now().naive_utc()) {
        Ok(artists) => HttpResponse::Ok().json(artists),
        Err(e) => e.error_response(),
    }
}

pub async fn search_artists(
    pool: web::Data<DbPool>,
    payload: web::Form<SearchPayload>,
) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match artist_store::search_artists(&mut conn, &payload.term(), Utc::now().naive_utc()) {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => e.error_response(),
    }
}

pub async fn get_artist(pool: web::Data<DbPool>, path: web::Path<i32>) -> impl Responder {
    let artist_id = path.into_inner();

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match artist_store::get_artist(&mut conn, artist_id, Utc::now().naive_utc()) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => e.error_response(),
    }
}

pub async fn create_artist(
    pool: web::Data<DbPool>,
    payload: web::Json<ArtistForm>,
) -> impl Responder {
    let form = payload.into_inner();

    // Basic validation
    if form.name.trim().is_empty() {
        return HttpResponse::BadRequest().body("Artist name cannot be empty");
    }
    if form.city.trim().is_empty() || form.state.trim().is_empty() {
        return HttpResponse::BadRequest().body("City and state are required");
    }

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match conn.transaction(|conn| artist_store::create_artist(conn, &form)) {
        Ok(artist) => HttpResponse::Created().json(artist),
        Err(e) => {
            tracing::error!("artist {} could not be listed: {}", form.name, e);
            e.error_response()
        }
    }
}

pub async fn edit_artist(pool: web::Data<DbPool>, path: web::Path<i32>) -> impl Responder {
    let artist_id = path.into_inner();

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match artist_store::artist_prefill(&mut conn, artist_id) {
        Ok(prefill) => HttpResponse::Ok().json(prefill),
        Err(e) => e.error_response(),
    }
}

pub async fn update_artist(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    payload: web::Json<ArtistForm>,
) -> impl Responder {
    let artist_id = path.into_inner();
    let form = payload.into_inner();

    // Basic validation
    if form.name.trim().is_empty() {
        return HttpResponse::BadRequest().body("Artist name cannot be empty");
    }
    if form.city.trim().is_empty() || form.state.trim().is_empty() {
        return HttpResponse::BadRequest().body("City and state are required");
    }

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match conn.transaction(|conn| artist_store::update_artist(conn, artist_id, &form)) {
        Ok(artist) => HttpResponse::Ok().json(artist),
        Err(e) => {
            tracing::error!("artist {} could not be updated: {}", artist_id, e);
            e.error_response()
        }
    }
}

pub async fn delete_artist(pool: web::Data<DbPool>, path: web::Path<i32>) -> impl Responder {
    let artist_id = path.into_inner();

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match conn.transaction(|conn| artist_store::delete_artist(conn, artist_id)) {
        Ok(()) => HttpResponse::Ok().body("Artist deleted successfully"),
        Err(e) => {
            tracing::error!("artist {} could not be deleted: {}", artist_id, e);
            e.error_response()
        }
    }
}

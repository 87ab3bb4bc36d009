use actix_web::{web, HttpResponse, Responder, ResponseError};
use diesel::Connection;

use crate::db::{get_conn, DbPool};
use crate::models::search_models::SearchPayload;
use crate::models::show_models::ShowForm;
use crate::store::show_store;

pub async fn list_shows(pool: web::Data<DbPool>) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match show_store::list_shows(&mut conn) {
        Ok(listings) => HttpResponse::Ok().json(listings),
        Err(e) => e.error_response(),
    }
}

pub async fn search_shows(
    pool: web::Data<DbPool>,
    payload: web::Form<SearchPayload>,
) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match show_store::search_shows(&mut conn, &payload.term()) {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => e.error_response(),
    }
}

pub async fn create_show(pool: web::Data<DbPool>, payload: web::Json<ShowForm>) -> impl Responder {
    let form = payload.into_inner();

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match conn.transaction(|conn| show_store::create_show(conn, &form)) {
        Ok(show) => HttpResponse::Created().json(show),
        Err(e) => {
            tracing::error!("show could not be added: {}", e);
            e.error_response()
        }
    }
}

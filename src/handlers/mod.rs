use actix_web::{get, web, Responder};
use serde::Serialize;

use crate::error::ApiError;

pub mod favorites;
pub mod people;
pub mod planets;
pub mod users;

const ENDPOINTS: &[&str] = &[
    "GET /",
    "POST /user",
    "GET /users",
    "GET /users/favorites?user_id={user_id}",
    "POST /character",
    "GET /people",
    "GET /people/{people_id}",
    "POST /planet",
    "GET /planets",
    "GET /planets/{planet_id}",
    "POST /favorite/planet/{planet_id}?user_id={user_id}",
    "DELETE /favorite/planet/{planet_id}?user_id={user_id}",
    "POST /favorite/people/{people_id}?user_id={user_id}",
    "DELETE /favorite/people/{people_id}?user_id={user_id}",
];

#[derive(Serialize)]
struct Sitemap {
    endpoints: &'static [&'static str],
}

#[get("/")]
async fn sitemap() -> impl Responder {
    web::Json(Sitemap {
        endpoints: ENDPOINTS,
    })
}

/// Mounts every route plus extractor configs that report bad input in the
/// regular error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid JSON body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query string: {}", err)).into()
    }))
    // Ids that do not parse name no resource at all.
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("Unroutable path: {}", err);
        ApiError::NotFound("Resource not found").into()
    }))
    .service(sitemap)
    .service(users::create_user)
    .service(users::list_users)
    .service(users::list_user_favorites)
    .service(people::create_character)
    .service(people::list_people)
    .service(people::get_person)
    .service(planets::create_planet)
    .service(planets::list_planets)
    .service(planets::get_planet)
    .service(favorites::add_planet)
    .service(favorites::remove_planet)
    .service(favorites::add_person)
    .service(favorites::remove_person);
}

use actix_web::{get, post, web, HttpResponse};

use crate::catalog::{self, NewPlanetRequest};
use crate::error::Result;
use crate::store::EntityStore;

#[post("/planet")]
pub async fn create_planet(
    store: web::Data<dyn EntityStore>,
    new_planet: web::Json<NewPlanetRequest>,
) -> Result<HttpResponse> {
    let store = store.into_inner();
    let planet =
        web::block(move || catalog::create_planet(store.as_ref(), new_planet.into_inner()))
            .await??;
    Ok(HttpResponse::Created().json(planet))
}

#[get("/planets")]
pub async fn list_planets(store: web::Data<dyn EntityStore>) -> Result<HttpResponse> {
    let store = store.into_inner();
    let planets = web::block(move || store.list_planets()).await??;
    Ok(HttpResponse::Ok().json(planets))
}

#[get("/planets/{planet_id}")]
pub async fn get_planet(
    store: web::Data<dyn EntityStore>,
    planet_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let planet_id = planet_id.into_inner();
    let store = store.into_inner();
    let planet = web::block(move || catalog::get_planet(store.as_ref(), planet_id)).await??;
    Ok(HttpResponse::Ok().json(planet))
}

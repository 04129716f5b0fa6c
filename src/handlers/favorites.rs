use actix_web::{delete, post, web, HttpResponse};

use crate::error::Result;
use crate::favorites;
use crate::handlers::users::UserQuery;
use crate::store::EntityStore;
use crate::views::MessageResponse;

#[post("/favorite/planet/{planet_id}")]
pub async fn add_planet(
    store: web::Data<dyn EntityStore>,
    planet_id: web::Path<i32>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let user_id = query.user_id()?;
    let planet_id = planet_id.into_inner();
    let store = store.into_inner();
    let favorite =
        web::block(move || favorites::add_planet_favorite(store.as_ref(), user_id, planet_id))
            .await??;
    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "Planet {} added to favorites",
        favorite.name
    ))))
}

#[post("/favorite/people/{people_id}")]
pub async fn add_person(
    store: web::Data<dyn EntityStore>,
    people_id: web::Path<i32>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let user_id = query.user_id()?;
    let people_id = people_id.into_inner();
    let store = store.into_inner();
    let favorite = web::block(move || {
        favorites::add_character_favorite(store.as_ref(), user_id, people_id)
    })
    .await??;
    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "Character {} added to favorites",
        favorite.name
    ))))
}

#[delete("/favorite/planet/{planet_id}")]
pub async fn remove_planet(
    store: web::Data<dyn EntityStore>,
    planet_id: web::Path<i32>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let user_id = query.user_id()?;
    let planet_id = planet_id.into_inner();
    let store = store.into_inner();
    let favorite = web::block(move || {
        favorites::remove_planet_favorite(store.as_ref(), user_id, planet_id)
    })
    .await??;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Planet {} removed from favorites",
        favorite.name
    ))))
}

#[delete("/favorite/people/{people_id}")]
pub async fn remove_person(
    store: web::Data<dyn EntityStore>,
    people_id: web::Path<i32>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let user_id = query.user_id()?;
    let people_id = people_id.into_inner();
    let store = store.into_inner();
    let favorite = web::block(move || {
        favorites::remove_character_favorite(store.as_ref(), user_id, people_id)
    })
    .await??;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Character {} removed from favorites",
        favorite.name
    ))))
}

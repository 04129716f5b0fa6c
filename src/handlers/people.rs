use actix_web::{get, post, web, HttpResponse};

use crate::catalog::{self, NewCharacterRequest};
use crate::error::Result;
use crate::store::EntityStore;

#[post("/character")]
pub async fn create_character(
    store: web::Data<dyn EntityStore>,
    new_character: web::Json<NewCharacterRequest>,
) -> Result<HttpResponse> {
    let store = store.into_inner();
    let character = web::block(move || {
        catalog::create_character(store.as_ref(), new_character.into_inner())
    })
    .await??;
    Ok(HttpResponse::Created().json(character))
}

#[get("/people")]
pub async fn list_people(store: web::Data<dyn EntityStore>) -> Result<HttpResponse> {
    let store = store.into_inner();
    let people = web::block(move || store.list_characters()).await??;
    Ok(HttpResponse::Ok().json(people))
}

#[get("/people/{people_id}")]
pub async fn get_person(
    store: web::Data<dyn EntityStore>,
    people_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let people_id = people_id.into_inner();
    let store = store.into_inner();
    let character = web::block(move || catalog::get_character(store.as_ref(), people_id)).await??;
    Ok(HttpResponse::Ok().json(character))
}

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use crate::catalog::{self, NewUserRequest};
use crate::credentials::CredentialHasher;
use crate::error::{ApiError, Result};
use crate::favorites;
use crate::store::EntityStore;

/// `?user_id=` on the favorite endpoints.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<i32>,
}

impl UserQuery {
    pub fn user_id(&self) -> Result<i32> {
        self.user_id.ok_or_else(|| ApiError::missing_field("user_id"))
    }
}

#[post("/user")]
pub async fn create_user(
    store: web::Data<dyn EntityStore>,
    hasher: web::Data<dyn CredentialHasher>,
    new_user: web::Json<NewUserRequest>,
) -> Result<HttpResponse> {
    let store = store.into_inner();
    let hasher = hasher.into_inner();
    let user = web::block(move || {
        catalog::register_user(store.as_ref(), hasher.as_ref(), new_user.into_inner())
    })
    .await??;
    Ok(HttpResponse::Created().json(user))
}

#[get("/users")]
pub async fn list_users(store: web::Data<dyn EntityStore>) -> Result<HttpResponse> {
    let store = store.into_inner();
    let users = web::block(move || catalog::list_users(store.as_ref())).await??;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/favorites")]
pub async fn list_user_favorites(
    store: web::Data<dyn EntityStore>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let user_id = query.user_id()?;
    let store = store.into_inner();
    let favorites =
        web::block(move || favorites::list_favorites_for_user(store.as_ref(), user_id)).await??;
    Ok(HttpResponse::Ok().json(favorites))
}

use crate::error::{ApiError, Result};
use crate::model::{Favorite, FavoriteTarget, NewFavorite};
use crate::store::{EntityStore, StoreError};

fn ensure_user(store: &dyn EntityStore, user_id: i32, message: &'static str) -> Result<()> {
    match store.get_user(user_id)? {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound(message)),
    }
}

fn link(store: &dyn EntityStore, user_id: i32, target: FavoriteTarget) -> Result<Favorite> {
    ensure_user(store, user_id, "User Does not exist")?;
    let name = match target {
        FavoriteTarget::Planet(id) => {
            store
                .get_planet(id)?
                .ok_or(ApiError::NotFound("Planet Does not exist"))?
                .name
        }
        FavoriteTarget::Character(id) => {
            store
                .get_character(id)?
                .ok_or(ApiError::NotFound("character Does not exist"))?
                .name
        }
    };

    let favorite = store
        .create_favorite(NewFavorite {
            name,
            user_id,
            target,
        })
        .map_err(|e| match e {
            StoreError::DuplicateKey(_) => ApiError::FavoriteAlreadyExists,
            e => e.into(),
        })?;
    log::debug!("User {} favorited {:?}", user_id, target);
    Ok(favorite)
}

fn unlink(
    store: &dyn EntityStore,
    user_id: i32,
    target: FavoriteTarget,
    missing: &'static str,
) -> Result<Favorite> {
    ensure_user(store, user_id, "User does not exist")?;
    let favorite = store
        .find_favorite(user_id, target)?
        .ok_or(ApiError::NotFound(missing))?;

    // A concurrent delete may have won the race.
    if !store.delete_favorite(favorite.id)? {
        return Err(ApiError::NotFound(missing));
    }
    log::debug!("User {} unfavorited {:?}", user_id, target);
    Ok(favorite)
}

pub fn add_planet_favorite(
    store: &dyn EntityStore,
    user_id: i32,
    planet_id: i32,
) -> Result<Favorite> {
    link(store, user_id, FavoriteTarget::Planet(planet_id))
}

pub fn add_character_favorite(
    store: &dyn EntityStore,
    user_id: i32,
    character_id: i32,
) -> Result<Favorite> {
    link(store, user_id, FavoriteTarget::Character(character_id))
}

pub fn remove_planet_favorite(
    store: &dyn EntityStore,
    user_id: i32,
    planet_id: i32,
) -> Result<Favorite> {
    unlink(
        store,
        user_id,
        FavoriteTarget::Planet(planet_id),
        "Favorite planet does not exist",
    )
}

pub fn remove_character_favorite(
    store: &dyn EntityStore,
    user_id: i32,
    character_id: i32,
) -> Result<Favorite> {
    unlink(
        store,
        user_id,
        FavoriteTarget::Character(character_id),
        "Favorite character does not exist",
    )
}

pub fn list_favorites_for_user(store: &dyn EntityStore, user_id: i32) -> Result<Vec<Favorite>> {
    ensure_user(store, user_id, "User does not exist")?;
    Ok(store.list_favorites_for_user(user_id)?)
}

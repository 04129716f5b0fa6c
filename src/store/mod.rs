pub mod memory;
pub mod pg;

use crate::model::{
    Character, Favorite, FavoriteTarget, NewCharacter, NewFavorite, NewPlanet, NewUser, Planet,
    User,
};

pub use memory::MemoryStore;
pub use pg::PgStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Duplicate value for unique key {0}")]
    DuplicateKey(String),
    #[error("Referenced row does not exist")]
    MissingReference,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Unique and foreign-key rules are enforced here; callers' `find_*`
/// pre-checks only give friendlier errors.
pub trait EntityStore: Send + Sync {
    fn create_user(&self, new_user: NewUser) -> StoreResult<User>;
    fn get_user(&self, id: i32) -> StoreResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    fn list_users(&self) -> StoreResult<Vec<User>>;

    fn create_character(&self, new_character: NewCharacter) -> StoreResult<Character>;
    fn get_character(&self, id: i32) -> StoreResult<Option<Character>>;
    fn find_character_by_name(&self, name: &str) -> StoreResult<Option<Character>>;
    fn list_characters(&self) -> StoreResult<Vec<Character>>;

    fn create_planet(&self, new_planet: NewPlanet) -> StoreResult<Planet>;
    fn get_planet(&self, id: i32) -> StoreResult<Option<Planet>>;
    fn find_planet_by_name(&self, name: &str) -> StoreResult<Option<Planet>>;
    fn list_planets(&self) -> StoreResult<Vec<Planet>>;

    fn create_favorite(&self, new_favorite: NewFavorite) -> StoreResult<Favorite>;
    fn find_favorite(&self, user_id: i32, target: FavoriteTarget)
        -> StoreResult<Option<Favorite>>;
    /// Returns `false` when no row had that id.
    fn delete_favorite(&self, id: i32) -> StoreResult<bool>;
    fn list_favorites_for_user(&self, user_id: i32) -> StoreResult<Vec<Favorite>>;
    fn list_favorites(&self) -> StoreResult<Vec<Favorite>>;
}

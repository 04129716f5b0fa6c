use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;

use crate::model::{
    Character, Favorite, FavoriteTarget, NewCharacter, NewFavorite, NewPlanet, NewUser, Planet,
    User,
};
use crate::store::{EntityStore, StoreError, StoreResult};

/// Rows keyed by id plus the last id handed out, like a SERIAL column.
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.values().find(|&row| pred(row)).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

struct Tables {
    users: Table<User>,
    characters: Table<Character>,
    planets: Table<Planet>,
    favorites: Table<Favorite>,
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                users: Table::new(),
                characters: Table::new(),
                planets: Table::new(),
                favorites: Table::new(),
            }),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Internal(anyhow!("memory store lock poisoned")))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for MemoryStore {
    fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tables = self.lock()?;
        if tables.users.find(|u| u.email == new_user.email).is_some() {
            return Err(StoreError::DuplicateKey("users_email_key".to_string()));
        }
        Ok(tables.users.insert_with(|id| User {
            id,
            email: new_user.email,
            password: new_user.password,
        }))
    }

    fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.get(id))
    }

    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.find(|u| u.email == email))
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock()?.users.all())
    }

    fn create_character(&self, new_character: NewCharacter) -> StoreResult<Character> {
        let mut tables = self.lock()?;
        if tables
            .characters
            .find(|c| c.name == new_character.name)
            .is_some()
        {
            return Err(StoreError::DuplicateKey("characters_name_key".to_string()));
        }
        Ok(tables.characters.insert_with(|id| Character {
            id,
            name: new_character.name,
            gender: new_character.gender,
            skin_color: new_character.skin_color,
            hair_color: new_character.hair_color,
            height: new_character.height,
            eye_color: new_character.eye_color,
            mass: new_character.mass,
            homeworld: new_character.homeworld,
            birth_year: new_character.birth_year,
        }))
    }

    fn get_character(&self, id: i32) -> StoreResult<Option<Character>> {
        Ok(self.lock()?.characters.get(id))
    }

    fn find_character_by_name(&self, name: &str) -> StoreResult<Option<Character>> {
        Ok(self.lock()?.characters.find(|c| c.name == name))
    }

    fn list_characters(&self) -> StoreResult<Vec<Character>> {
        Ok(self.lock()?.characters.all())
    }

    fn create_planet(&self, new_planet: NewPlanet) -> StoreResult<Planet> {
        let mut tables = self.lock()?;
        if tables.planets.find(|p| p.name == new_planet.name).is_some() {
            return Err(StoreError::DuplicateKey("planets_name_key".to_string()));
        }
        Ok(tables.planets.insert_with(|id| Planet {
            id,
            name: new_planet.name,
            climate: new_planet.climate,
            surface_water: new_planet.surface_water,
            diameter: new_planet.diameter,
            rotation_period: new_planet.rotation_period,
            gravity: new_planet.gravity,
            orbital_period: new_planet.orbital_period,
            population: new_planet.population,
        }))
    }

    fn get_planet(&self, id: i32) -> StoreResult<Option<Planet>> {
        Ok(self.lock()?.planets.get(id))
    }

    fn find_planet_by_name(&self, name: &str) -> StoreResult<Option<Planet>> {
        Ok(self.lock()?.planets.find(|p| p.name == name))
    }

    fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        Ok(self.lock()?.planets.all())
    }

    fn create_favorite(&self, new_favorite: NewFavorite) -> StoreResult<Favorite> {
        let mut tables = self.lock()?;
        let target_exists = match new_favorite.target {
            FavoriteTarget::Planet(id) => tables.planets.rows.contains_key(&id),
            FavoriteTarget::Character(id) => tables.characters.rows.contains_key(&id),
        };
        if !tables.users.rows.contains_key(&new_favorite.user_id) || !target_exists {
            return Err(StoreError::MissingReference);
        }
        let duplicate = tables
            .favorites
            .find(|f| f.user_id == new_favorite.user_id && f.target == new_favorite.target);
        if duplicate.is_some() {
            let key = match new_favorite.target {
                FavoriteTarget::Planet(_) => "favorites_user_planet_key",
                FavoriteTarget::Character(_) => "favorites_user_character_key",
            };
            return Err(StoreError::DuplicateKey(key.to_string()));
        }
        Ok(tables.favorites.insert_with(|id| Favorite {
            id,
            name: new_favorite.name,
            user_id: new_favorite.user_id,
            target: new_favorite.target,
        }))
    }

    fn find_favorite(
        &self,
        user_id: i32,
        target: FavoriteTarget,
    ) -> StoreResult<Option<Favorite>> {
        Ok(self
            .lock()?
            .favorites
            .find(|f| f.user_id == user_id && f.target == target))
    }

    fn delete_favorite(&self, id: i32) -> StoreResult<bool> {
        Ok(self.lock()?.favorites.rows.remove(&id).is_some())
    }

    fn list_favorites_for_user(&self, user_id: i32) -> StoreResult<Vec<Favorite>> {
        let tables = self.lock()?;
        Ok(tables
            .favorites
            .rows
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    fn list_favorites(&self) -> StoreResult<Vec<Favorite>> {
        Ok(self.lock()?.favorites.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (MemoryStore, User, Planet) {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                email: "luke@rebellion.org".to_string(),
                password: "hash".to_string(),
            })
            .unwrap();
        let planet = store
            .create_planet(NewPlanet {
                name: "Tatooine".to_string(),
                climate: Some("arid".to_string()),
                ..Default::default()
            })
            .unwrap();
        (store, user, planet)
    }

    #[test]
    fn ids_are_assigned_sequentially() {
        let store = MemoryStore::new();
        let first = store
            .create_character(NewCharacter {
                name: "C-3PO".to_string(),
                ..Default::default()
            })
            .unwrap();
        let second = store
            .create_character(NewCharacter {
                name: "R2-D2".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.get_character(2).unwrap(), Some(second));
        assert_eq!(store.get_character(3).unwrap(), None);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (store, _, _) = seeded();
        let err = store
            .create_user(NewUser {
                email: "luke@rebellion.org".to_string(),
                password: "other".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(key) if key == "users_email_key"));
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_planet_name_is_rejected() {
        let (store, _, _) = seeded();
        let err = store
            .create_planet(NewPlanet {
                name: "Tatooine".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
        assert_eq!(store.list_planets().unwrap().len(), 1);
    }

    #[test]
    fn favorite_requires_existing_references() {
        let (store, user, planet) = seeded();
        let err = store
            .create_favorite(NewFavorite {
                name: "Ghost".to_string(),
                user_id: user.id + 1,
                target: FavoriteTarget::Planet(planet.id),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference));

        let err = store
            .create_favorite(NewFavorite {
                name: "Ghost".to_string(),
                user_id: user.id,
                target: FavoriteTarget::Character(1),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference));
        assert!(store.list_favorites().unwrap().is_empty());
    }

    #[test]
    fn favorite_is_unique_per_user_and_target() {
        let (store, user, planet) = seeded();
        let other = store
            .create_user(NewUser {
                email: "leia@rebellion.org".to_string(),
                password: "hash".to_string(),
            })
            .unwrap();
        let favorite = NewFavorite {
            name: planet.name.clone(),
            user_id: user.id,
            target: FavoriteTarget::Planet(planet.id),
        };
        store.create_favorite(favorite.clone()).unwrap();
        assert!(matches!(
            store.create_favorite(favorite.clone()),
            Err(StoreError::DuplicateKey(_))
        ));

        // Same name for a different user is fine.
        store
            .create_favorite(NewFavorite {
                user_id: other.id,
                ..favorite
            })
            .unwrap();
        assert_eq!(store.list_favorites().unwrap().len(), 2);
    }

    #[test]
    fn delete_favorite_leaves_referenced_rows() {
        let (store, user, planet) = seeded();
        let favorite = store
            .create_favorite(NewFavorite {
                name: planet.name.clone(),
                user_id: user.id,
                target: FavoriteTarget::Planet(planet.id),
            })
            .unwrap();

        assert!(store.delete_favorite(favorite.id).unwrap());
        assert!(!store.delete_favorite(favorite.id).unwrap());
        assert!(store.list_favorites_for_user(user.id).unwrap().is_empty());
        assert!(store.get_user(user.id).unwrap().is_some());
        assert!(store.get_planet(planet.id).unwrap().is_some());
    }
}

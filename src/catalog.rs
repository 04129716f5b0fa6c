use serde::{Deserialize, Serialize};

use crate::credentials::CredentialHasher;
use crate::error::{ApiError, Result};
use crate::model::{Character, NewCharacter, NewPlanet, NewUser, Planet};
use crate::store::{EntityStore, StoreError};
use crate::views::UserView;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewCharacterRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub skin_color: Option<String>,
    pub hair_color: Option<String>,
    pub height: Option<String>,
    pub eye_color: Option<String>,
    pub mass: Option<String>,
    pub homeworld: Option<String>,
    pub birth_year: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewPlanetRequest {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub surface_water: Option<String>,
    pub diameter: Option<String>,
    pub rotation_period: Option<String>,
    pub gravity: Option<String>,
    pub orbital_period: Option<String>,
    pub population: Option<i32>,
}

/// Column widths from the `users`, `characters` and `planets` tables.
const MAX_EMAIL_LEN: usize = 120;
const MAX_NAME_LEN: usize = 80;

fn required(value: Option<String>, field: &str, max_len: usize) -> Result<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing_field(field))?;
    if value.chars().count() > max_len {
        return Err(ApiError::Validation(format!(
            "Field {} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(value)
}

pub fn register_user(
    store: &dyn EntityStore,
    hasher: &dyn CredentialHasher,
    request: NewUserRequest,
) -> Result<UserView> {
    let email = required(request.email, "email", MAX_EMAIL_LEN)?;
    // Passwords are taken verbatim, whitespace included.
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::missing_field("password"))?;

    if store.find_user_by_email(&email)?.is_some() {
        return Err(ApiError::EmailNotAvailable);
    }

    let user = store
        .create_user(NewUser {
            email,
            password: hasher.hash(&password)?,
        })
        .map_err(|e| match e {
            StoreError::DuplicateKey(_) => ApiError::EmailNotAvailable,
            e => e.into(),
        })?;
    log::info!("Registered user {}", user.id);
    Ok(UserView::new(user, Vec::new()))
}

pub fn list_users(store: &dyn EntityStore) -> Result<Vec<UserView>> {
    let users = store.list_users()?;
    let favorites = store.list_favorites()?;
    Ok(UserView::group(users, favorites))
}

pub fn create_character(
    store: &dyn EntityStore,
    request: NewCharacterRequest,
) -> Result<Character> {
    let name = required(request.name, "name", MAX_NAME_LEN)?;
    if store.find_character_by_name(&name)?.is_some() {
        return Err(ApiError::NameNotAvailable("Character"));
    }

    let character = store
        .create_character(NewCharacter {
            name,
            gender: request.gender,
            skin_color: request.skin_color,
            hair_color: request.hair_color,
            height: request.height,
            eye_color: request.eye_color,
            mass: request.mass,
            homeworld: request.homeworld,
            birth_year: request.birth_year,
        })
        .map_err(|e| match e {
            StoreError::DuplicateKey(_) => ApiError::NameNotAvailable("Character"),
            e => e.into(),
        })?;
    log::info!("Created character {} ({})", character.id, character.name);
    Ok(character)
}

pub fn get_character(store: &dyn EntityStore, id: i32) -> Result<Character> {
    store
        .get_character(id)?
        .ok_or(ApiError::NotFound("Character not found"))
}

pub fn create_planet(store: &dyn EntityStore, request: NewPlanetRequest) -> Result<Planet> {
    let name = required(request.name, "name", MAX_NAME_LEN)?;
    if store.find_planet_by_name(&name)?.is_some() {
        return Err(ApiError::NameNotAvailable("Planet"));
    }

    let planet = store
        .create_planet(NewPlanet {
            name,
            climate: request.climate,
            surface_water: request.surface_water,
            diameter: request.diameter,
            rotation_period: request.rotation_period,
            gravity: request.gravity,
            orbital_period: request.orbital_period,
            population: request.population,
        })
        .map_err(|e| match e {
            StoreError::DuplicateKey(_) => ApiError::NameNotAvailable("Planet"),
            e => e.into(),
        })?;
    log::info!("Created planet {} ({})", planet.id, planet.name);
    Ok(planet)
}

pub fn get_planet(store: &dyn EntityStore, id: i32) -> Result<Planet> {
    store
        .get_planet(id)?
        .ok_or(ApiError::NotFound("Planet not found"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::credentials::BcryptHasher;
    use crate::store::MemoryStore;

    fn user_request(email: &str, password: &str) -> NewUserRequest {
        NewUserRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn registered_user_serializes_without_password() {
        let store = MemoryStore::new();
        let view = register_user(&store, &BcryptHasher::new(4), user_request("a@b.com", "x"))
            .unwrap();

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value, json!({"id": 1, "email": "a@b.com", "favorites": []}));
    }

    #[test]
    fn password_is_stored_hashed() {
        let store = MemoryStore::new();
        let hasher = BcryptHasher::new(4);
        register_user(&store, &hasher, user_request("a@b.com", "x")).unwrap();

        let stored = store.find_user_by_email("a@b.com").unwrap().unwrap();
        assert_ne!(stored.password, "x");
        assert!(bcrypt::verify("x", &stored.password).unwrap());
    }

    #[test]
    fn duplicate_email_leaves_user_count_unchanged() {
        let store = MemoryStore::new();
        let hasher = BcryptHasher::new(4);
        register_user(&store, &hasher, user_request("a@b.com", "x")).unwrap();

        let err = register_user(&store, &hasher, user_request("a@b.com", "y")).unwrap_err();
        assert!(matches!(err, ApiError::EmailNotAvailable));
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn missing_user_fields_are_rejected() {
        let store = MemoryStore::new();
        let hasher = BcryptHasher::new(4);

        let err = register_user(
            &store,
            &hasher,
            NewUserRequest {
                email: None,
                password: Some("x".to_string()),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: email");

        let err = register_user(
            &store,
            &hasher,
            NewUserRequest {
                email: Some("a@b.com".to_string()),
                password: None,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: password");
        assert!(store.list_users().unwrap().is_empty());
    }

    #[test]
    fn duplicate_character_name_leaves_count_unchanged() {
        let store = MemoryStore::new();
        let request = || NewCharacterRequest {
            name: Some("Luke Skywalker".to_string()),
            gender: Some("male".to_string()),
            ..Default::default()
        };
        let luke = create_character(&store, request()).unwrap();
        assert_eq!(luke.gender.as_deref(), Some("male"));

        let err = create_character(&store, request()).unwrap_err();
        assert!(matches!(err, ApiError::NameNotAvailable("Character")));
        assert_eq!(store.list_characters().unwrap().len(), 1);
    }

    #[test]
    fn blank_planet_name_is_rejected() {
        let store = MemoryStore::new();
        let err = create_planet(
            &store,
            NewPlanetRequest {
                name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(store.list_planets().unwrap().is_empty());
    }

    #[test]
    fn duplicate_planet_name_leaves_count_unchanged() {
        let store = MemoryStore::new();
        let request = || NewPlanetRequest {
            name: Some("Hoth".to_string()),
            population: Some(0),
            ..Default::default()
        };
        create_planet(&store, request()).unwrap();
        assert!(matches!(
            create_planet(&store, request()),
            Err(ApiError::NameNotAvailable("Planet"))
        ));
        assert_eq!(store.list_planets().unwrap().len(), 1);
    }

    #[test]
    fn overlong_email_is_rejected() {
        let store = MemoryStore::new();
        let email = format!("{}@b.com", "a".repeat(115));
        let err = register_user(&store, &BcryptHasher::new(4), user_request(&email, "x"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field email must be at most 120 characters"
        );
        assert!(store.list_users().unwrap().is_empty());

        let email = format!("{}@b.com", "a".repeat(114));
        register_user(&store, &BcryptHasher::new(4), user_request(&email, "x")).unwrap();
    }

    #[test]
    fn overlong_names_are_rejected() {
        let store = MemoryStore::new();
        let err = create_planet(
            &store,
            NewPlanetRequest {
                name: Some("P".repeat(81)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = create_character(
            &store,
            NewCharacterRequest {
                name: Some("C".repeat(81)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Field name must be at most 80 characters");
        assert!(store.list_planets().unwrap().is_empty());
        assert!(store.list_characters().unwrap().is_empty());

        // Width is counted in characters, like VARCHAR.
        create_planet(
            &store,
            NewPlanetRequest {
                name: Some("é".repeat(80)),
                ..Default::default()
            },
        )
        .unwrap();
    }

    #[test]
    fn lookups_signal_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            get_character(&store, 1),
            Err(ApiError::NotFound("Character not found"))
        ));
        assert!(matches!(
            get_planet(&store, 1),
            Err(ApiError::NotFound("Planet not found"))
        ));
    }
}

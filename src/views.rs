use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Favorite, User};

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub favorites: Vec<Favorite>,
}

impl UserView {
    pub fn new(user: User, favorites: Vec<Favorite>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            favorites,
        }
    }

    /// Attaches each favorite to its owner. Favorites of unknown users are dropped.
    pub fn group(users: Vec<User>, favorites: Vec<Favorite>) -> Vec<Self> {
        let mut by_user: HashMap<i32, Vec<Favorite>> = HashMap::new();
        for favorite in favorites {
            by_user.entry(favorite.user_id).or_default().push(favorite);
        }
        users
            .into_iter()
            .map(|user| {
                let favorites = by_user.remove(&user.id).unwrap_or_default();
                Self::new(user, favorites)
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

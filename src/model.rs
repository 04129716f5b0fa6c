use anyhow::anyhow;
use diesel::{Insertable, Queryable, Selectable};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::schema::*;

/// A registered user. `password` holds the credential hash, never the plain text.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = characters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Character {
    pub id: i32,
    pub name: String,
    pub gender: Option<String>,
    pub skin_color: Option<String>,
    pub hair_color: Option<String>,
    pub height: Option<String>,
    pub eye_color: Option<String>,
    pub mass: Option<String>,
    pub homeworld: Option<String>,
    pub birth_year: Option<String>,
}

#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = characters)]
pub struct NewCharacter {
    pub name: String,
    pub gender: Option<String>,
    pub skin_color: Option<String>,
    pub hair_color: Option<String>,
    pub height: Option<String>,
    pub eye_color: Option<String>,
    pub mass: Option<String>,
    pub homeworld: Option<String>,
    pub birth_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = planets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Planet {
    pub id: i32,
    pub name: String,
    pub climate: Option<String>,
    pub surface_water: Option<String>,
    pub diameter: Option<String>,
    pub rotation_period: Option<String>,
    pub gravity: Option<String>,
    pub orbital_period: Option<String>,
    pub population: Option<i32>,
}

#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = planets)]
pub struct NewPlanet {
    pub name: String,
    pub climate: Option<String>,
    pub surface_water: Option<String>,
    pub diameter: Option<String>,
    pub rotation_period: Option<String>,
    pub gravity: Option<String>,
    pub orbital_period: Option<String>,
    pub population: Option<i32>,
}

/// What a favorite points at. A favorite always has exactly one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteTarget {
    Planet(i32),
    Character(i32),
}

impl FavoriteTarget {
    pub fn planet_id(&self) -> Option<i32> {
        match self {
            FavoriteTarget::Planet(id) => Some(*id),
            FavoriteTarget::Character(_) => None,
        }
    }

    pub fn character_id(&self) -> Option<i32> {
        match self {
            FavoriteTarget::Character(id) => Some(*id),
            FavoriteTarget::Planet(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub target: FavoriteTarget,
}

impl Serialize for Favorite {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Favorite", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("user_id", &self.user_id)?;
        state.serialize_field("planet_id", &self.target.planet_id())?;
        state.serialize_field("character_id", &self.target.character_id())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub name: String,
    pub user_id: i32,
    pub target: FavoriteTarget,
}

/// Raw `favorites` row, with the target split over two nullable columns.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FavoriteRow {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub planet_id: Option<i32>,
    pub character_id: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub struct NewFavoriteRow {
    pub name: String,
    pub user_id: i32,
    pub planet_id: Option<i32>,
    pub character_id: Option<i32>,
}

impl From<NewFavorite> for NewFavoriteRow {
    fn from(value: NewFavorite) -> Self {
        Self {
            planet_id: value.target.planet_id(),
            character_id: value.target.character_id(),
            name: value.name,
            user_id: value.user_id,
        }
    }
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = anyhow::Error;

    fn try_from(row: FavoriteRow) -> anyhow::Result<Self> {
        let target = match (row.planet_id, row.character_id) {
            (Some(planet_id), None) => FavoriteTarget::Planet(planet_id),
            (None, Some(character_id)) => FavoriteTarget::Character(character_id),
            _ => return Err(anyhow!("favorite {} must reference exactly one target", row.id)),
        };
        Ok(Self {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(planet_id: Option<i32>, character_id: Option<i32>) -> FavoriteRow {
        FavoriteRow {
            id: 7,
            name: "Hoth".to_string(),
            user_id: 1,
            planet_id,
            character_id,
        }
    }

    #[test]
    fn favorite_row_with_single_target_converts() {
        let favorite = Favorite::try_from(row(Some(4), None)).unwrap();
        assert_eq!(favorite.target, FavoriteTarget::Planet(4));

        let favorite = Favorite::try_from(row(None, Some(2))).unwrap();
        assert_eq!(favorite.target, FavoriteTarget::Character(2));
    }

    #[test]
    fn favorite_row_without_exactly_one_target_is_rejected() {
        assert!(Favorite::try_from(row(None, None)).is_err());
        assert!(Favorite::try_from(row(Some(1), Some(1))).is_err());
    }

    #[test]
    fn favorite_serializes_unused_reference_as_null() {
        let favorite = Favorite {
            id: 3,
            name: "Dagobah".to_string(),
            user_id: 1,
            target: FavoriteTarget::Planet(5),
        };
        assert_eq!(
            serde_json::to_value(&favorite).unwrap(),
            json!({
                "id": 3,
                "name": "Dagobah",
                "user_id": 1,
                "planet_id": 5,
                "character_id": null,
            })
        );
    }

    #[test]
    fn new_favorite_splits_target_into_columns() {
        let row = NewFavoriteRow::from(NewFavorite {
            name: "Yoda".to_string(),
            user_id: 2,
            target: FavoriteTarget::Character(9),
        });
        assert_eq!(row.planet_id, None);
        assert_eq!(row.character_id, Some(9));
    }
}

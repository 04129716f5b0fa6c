use anyhow::anyhow;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{
    ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
};
use r2d2::Pool;

use crate::model::{
    Character, Favorite, FavoriteRow, FavoriteTarget, NewCharacter, NewFavorite, NewFavoriteRow,
    NewPlanet, NewUser, Planet, User,
};
use crate::schema::{characters, favorites, planets, users};
use crate::store::{EntityStore, StoreError, StoreResult};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

impl From<DieselError> for StoreError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::DuplicateKey(info.constraint_name().unwrap_or("unknown").to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                StoreError::MissingReference
            }
            e => StoreError::Internal(anyhow!("{}", e)),
        }
    }
}

/// Postgres-backed store. Each call checks a connection out of the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn connect(database_url: &str, pool_size: u32) -> anyhow::Result<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e| anyhow!("Failed to create pool: {}", e))?;
        Ok(Self::new(pool))
    }

    fn conn(&self) -> StoreResult<DbConnection> {
        self.pool
            .get()
            .map_err(|e| StoreError::Internal(anyhow!("Couldn't get db connection from pool: {}", e)))
    }
}

fn into_favorites(rows: Vec<FavoriteRow>) -> StoreResult<Vec<Favorite>> {
    rows.into_iter()
        .map(|row| Favorite::try_from(row).map_err(StoreError::from))
        .collect()
}

impl EntityStore for PgStore {
    fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut conn = self.conn()?;
        let user = diesel::insert_into(users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;
        log::debug!("Inserted user {}", user.id);
        Ok(user)
    }

    fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        let mut conn = self.conn()?;
        Ok(users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut conn = self.conn()?;
        Ok(users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut conn = self.conn()?;
        Ok(users::table.select(User::as_select()).load(&mut conn)?)
    }

    fn create_character(&self, new_character: NewCharacter) -> StoreResult<Character> {
        let mut conn = self.conn()?;
        let character = diesel::insert_into(characters::table)
            .values(new_character)
            .returning(Character::as_returning())
            .get_result(&mut conn)?;
        log::debug!("Inserted character {}", character.id);
        Ok(character)
    }

    fn get_character(&self, id: i32) -> StoreResult<Option<Character>> {
        let mut conn = self.conn()?;
        Ok(characters::table
            .find(id)
            .select(Character::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn find_character_by_name(&self, name: &str) -> StoreResult<Option<Character>> {
        let mut conn = self.conn()?;
        Ok(characters::table
            .filter(characters::name.eq(name))
            .select(Character::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn list_characters(&self) -> StoreResult<Vec<Character>> {
        let mut conn = self.conn()?;
        Ok(characters::table
            .select(Character::as_select())
            .load(&mut conn)?)
    }

    fn create_planet(&self, new_planet: NewPlanet) -> StoreResult<Planet> {
        let mut conn = self.conn()?;
        let planet = diesel::insert_into(planets::table)
            .values(new_planet)
            .returning(Planet::as_returning())
            .get_result(&mut conn)?;
        log::debug!("Inserted planet {}", planet.id);
        Ok(planet)
    }

    fn get_planet(&self, id: i32) -> StoreResult<Option<Planet>> {
        let mut conn = self.conn()?;
        Ok(planets::table
            .find(id)
            .select(Planet::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn find_planet_by_name(&self, name: &str) -> StoreResult<Option<Planet>> {
        let mut conn = self.conn()?;
        Ok(planets::table
            .filter(planets::name.eq(name))
            .select(Planet::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        let mut conn = self.conn()?;
        Ok(planets::table.select(Planet::as_select()).load(&mut conn)?)
    }

    fn create_favorite(&self, new_favorite: NewFavorite) -> StoreResult<Favorite> {
        let mut conn = self.conn()?;
        let row = diesel::insert_into(favorites::table)
            .values(NewFavoriteRow::from(new_favorite))
            .returning(FavoriteRow::as_returning())
            .get_result(&mut conn)?;
        log::debug!("Inserted favorite {} for user {}", row.id, row.user_id);
        Ok(Favorite::try_from(row)?)
    }

    fn find_favorite(
        &self,
        user_id: i32,
        target: FavoriteTarget,
    ) -> StoreResult<Option<Favorite>> {
        let mut conn = self.conn()?;
        let of_user = favorites::table.filter(favorites::user_id.eq(user_id));
        let row = match target {
            FavoriteTarget::Planet(planet_id) => of_user
                .filter(favorites::planet_id.eq(planet_id))
                .select(FavoriteRow::as_select())
                .first(&mut conn)
                .optional()?,
            FavoriteTarget::Character(character_id) => of_user
                .filter(favorites::character_id.eq(character_id))
                .select(FavoriteRow::as_select())
                .first(&mut conn)
                .optional()?,
        };
        Ok(row.map(Favorite::try_from).transpose()?)
    }

    fn delete_favorite(&self, id: i32) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(favorites::table.find(id)).execute(&mut conn)?;
        log::debug!("Deleted {} favorite row(s) with id {}", deleted, id);
        Ok(deleted > 0)
    }

    fn list_favorites_for_user(&self, user_id: i32) -> StoreResult<Vec<Favorite>> {
        let mut conn = self.conn()?;
        let rows = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .select(FavoriteRow::as_select())
            .load(&mut conn)?;
        into_favorites(rows)
    }

    fn list_favorites(&self) -> StoreResult<Vec<Favorite>> {
        let mut conn = self.conn()?;
        let rows = favorites::table
            .select(FavoriteRow::as_select())
            .load(&mut conn)?;
        into_favorites(rows)
    }
}

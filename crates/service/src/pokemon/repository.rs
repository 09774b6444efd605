use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::errors::ModelError;
use models::pokemon::{Model, NewPokemon, PokemonPatch};

/// Storage operations the catalog needs. Unique-key violations on `no` or
/// `name` must come back as `ModelError::Duplicate`.
#[async_trait]
pub trait PokemonRepository: Send + Sync {
    async fn insert(&self, new: NewPokemon) -> Result<Model, ModelError>;
    async fn insert_many(&self, items: Vec<NewPokemon>) -> Result<u64, ModelError>;
    /// Ascending by `no`.
    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Model>, ModelError>;
    async fn find_by_no(&self, no: i32) -> Result<Option<Model>, ModelError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, ModelError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Model>, ModelError>;
    async fn update(&self, id: Uuid, patch: PokemonPatch) -> Result<Model, ModelError>;
    /// Rows removed, 0 when `id` is unknown.
    async fn delete(&self, id: Uuid) -> Result<u64, ModelError>;
    async fn delete_all(&self) -> Result<u64, ModelError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmPokemonRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmPokemonRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl PokemonRepository for SeaOrmPokemonRepository {
    async fn insert(&self, new: NewPokemon) -> Result<Model, ModelError> {
        models::pokemon::create(&self.db, new).await
    }

    async fn insert_many(&self, items: Vec<NewPokemon>) -> Result<u64, ModelError> {
        models::pokemon::create_many(&self.db, items).await
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Model>, ModelError> {
        models::pokemon::list(&self.db, limit, offset).await
    }

    async fn find_by_no(&self, no: i32) -> Result<Option<Model>, ModelError> {
        models::pokemon::find_by_no(&self.db, no).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, ModelError> {
        models::pokemon::find_by_id(&self.db, id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Model>, ModelError> {
        models::pokemon::find_by_name(&self.db, name).await
    }

    async fn update(&self, id: Uuid, patch: PokemonPatch) -> Result<Model, ModelError> {
        models::pokemon::update(&self.db, id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ModelError> {
        models::pokemon::delete(&self.db, id).await
    }

    async fn delete_all(&self) -> Result<u64, ModelError> {
        models::pokemon::delete_all(&self.db).await
    }
}

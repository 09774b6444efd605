#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use models::pokemon::Model;

use crate::pokemon::{CreatePokemon, MemoryPokemonRepository, PokemonRepository, PokemonService};

/// Fresh in-memory SQLite with the schema applied. One connection so the
/// database outlives individual queries.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn memory_service() -> PokemonService<MemoryPokemonRepository> {
    PokemonService::new(Arc::new(MemoryPokemonRepository::new()))
}

/// Create `(no, name)` pairs through the service, in order.
pub async fn seed_items<R>(svc: &PokemonService<R>, items: &[(i32, &str)]) -> Vec<Model>
where
    R: PokemonRepository + ?Sized,
{
    let mut out = Vec::with_capacity(items.len());
    for (no, name) in items {
        let created = svc
            .create(CreatePokemon { no: *no, name: (*name).to_string(), attributes: None })
            .await
            .expect("seed item");
        out.push(created);
    }
    out
}

use std::sync::Arc;
use tracing::{debug, info, instrument};

use models::pokemon::Model;

use crate::errors::ServiceError;
use crate::pagination::{Pagination, DEFAULT_LIMIT};
use crate::pokemon::domain::{CreatePokemon, UpdatePokemon};
use crate::pokemon::lookup::{self, parse_id};
use crate::pokemon::repository::PokemonRepository;

/// Application service for the pokemon catalog.
/// Owns name normalization, the lookup chain and error translation; storage
/// is whatever repository it was built with.
pub struct PokemonService<R: PokemonRepository + ?Sized> {
    repo: Arc<R>,
    default_limit: u64,
}

impl<R: PokemonRepository + ?Sized> Clone for PokemonService<R> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo), default_limit: self.default_limit }
    }
}

impl<R: PokemonRepository + ?Sized> PokemonService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo, default_limit: DEFAULT_LIMIT } }

    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    #[instrument(skip(self, input), fields(no = input.no))]
    pub async fn create(&self, input: CreatePokemon) -> Result<Model, ServiceError> {
        let new = input.into_new()?;
        let created = self
            .repo
            .insert(new)
            .await
            .map_err(|e| ServiceError::from_model(e, "create"))?;
        info!(id = %created.id, no = created.no, name = %created.name, "pokemon_created");
        Ok(created)
    }

    /// Items ascending by `no`; `offset` skipped, at most `limit` returned.
    pub async fn list(&self, pagination: Pagination) -> Result<Vec<Model>, ServiceError> {
        let (limit, offset) = pagination.resolve(self.default_limit)?;
        self.repo
            .list(limit, offset)
            .await
            .map_err(|e| ServiceError::from_model(e, "list"))
    }

    /// Resolve `key` as `no`, then datastore id, then name.
    #[instrument(skip(self))]
    pub async fn find_one(&self, key: &str) -> Result<Model, ServiceError> {
        match lookup::resolve(self.repo.as_ref(), key)
            .await
            .map_err(|e| ServiceError::from_model(e, "find"))?
        {
            Some((strategy, found)) => {
                debug!(?strategy, id = %found.id, "pokemon_resolved");
                Ok(found)
            }
            None => Err(ServiceError::NotFound(format!(
                "Pokemon with id, name or no \"{key}\" not found"
            ))),
        }
    }

    /// Resolve like `find_one`, apply the patch, return the stored document.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, key: &str, patch: UpdatePokemon) -> Result<Model, ServiceError> {
        let current = self.find_one(key).await?;
        let patch = patch.into_patch()?;
        if patch.is_empty() {
            return Ok(current);
        }
        let updated = self
            .repo
            .update(current.id, patch)
            .await
            .map_err(|e| ServiceError::from_model(e, "update"))?;
        info!(id = %updated.id, no = updated.no, name = %updated.name, "pokemon_updated");
        Ok(updated)
    }

    /// Delete by exact datastore id. An unknown id is a `BadRequest`.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        let uuid = parse_id(id)
            .ok_or_else(|| ServiceError::BadRequest(format!("{id} is not a valid id")))?;
        let deleted = self
            .repo
            .delete(uuid)
            .await
            .map_err(|e| ServiceError::from_model(e, "delete"))?;
        if deleted == 0 {
            return Err(ServiceError::BadRequest(format!("Pokemon with id \"{id}\" not found")));
        }
        info!(id = %uuid, "pokemon_removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::pokemon::memory::MemoryPokemonRepository;
    use crate::test_support::{memory_service, seed_items};

    fn create(no: i32, name: &str) -> CreatePokemon {
        CreatePokemon { no, name: name.into(), attributes: None }
    }

    #[tokio::test]
    async fn create_stores_lowercased_name() {
        let svc = memory_service();
        let created = svc.create(create(1, "BulbaSAUR")).await.unwrap();
        assert_eq!(created.name, "bulbasaur");
        assert_eq!(svc.find_one(&created.id.to_string()).await.unwrap().name, "bulbasaur");
    }

    #[tokio::test]
    async fn duplicate_name_any_casing_or_no_conflicts() {
        let svc = memory_service();
        svc.create(create(1, "bulbasaur")).await.unwrap();
        let err = svc.create(create(2, "BULBASAUR")).await.unwrap_err();
        assert_eq!(err, ServiceError::Conflict(r#"Pokemon exists in db {"name":"bulbasaur"}"#.into()));
        let err = svc.create(create(1, "ivysaur")).await.unwrap_err();
        assert_eq!(err, ServiceError::Conflict(r#"Pokemon exists in db {"no":1}"#.into()));
    }

    #[tokio::test]
    async fn find_one_resolves_each_key_shape() {
        let svc = memory_service();
        let items = seed_items(&svc, &[(1, "bulbasaur"), (2, "ivysaur")]).await;
        let ivysaur = &items[1];

        assert_eq!(svc.find_one("2").await.unwrap().id, ivysaur.id);
        assert_eq!(svc.find_one(&ivysaur.id.to_string()).await.unwrap().id, ivysaur.id);
        assert_eq!(svc.find_one("  IvySaur  ").await.unwrap().id, ivysaur.id);
        assert!(matches!(svc.find_one("missingno").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_one_accepts_integral_numeric_forms() {
        let svc = memory_service();
        let items = seed_items(&svc, &[(1, "bulbasaur")]).await;

        assert_eq!(svc.find_one("1.0").await.unwrap().id, items[0].id);
        assert_eq!(svc.find_one("1e0").await.unwrap().id, items[0].id);
        assert!(matches!(svc.find_one("1.5").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn numeric_key_without_matching_no_falls_back_to_name() {
        let svc = memory_service();
        let odd = svc.create(create(5, "151")).await.unwrap();
        assert_eq!(svc.find_one("151").await.unwrap().id, odd.id);
    }

    #[tokio::test]
    async fn no_match_wins_over_name_match() {
        let svc = memory_service();
        let seven = svc.create(create(7, "squirtle")).await.unwrap();
        svc.create(create(8, "7")).await.unwrap();
        assert_eq!(svc.find_one("7").await.unwrap().id, seven.id);
    }

    #[tokio::test]
    async fn list_pages_in_no_order() {
        let svc = memory_service();
        seed_items(&svc, &[(3, "venusaur"), (1, "bulbasaur"), (4, "charmander"), (2, "ivysaur")]).await;
        let page = svc.list(Pagination::new(2, 1)).await.unwrap();
        let names: Vec<&str> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ivysaur", "venusaur"]);
    }

    #[tokio::test]
    async fn list_defaults_to_configured_limit() {
        let svc = PokemonService::new(Arc::new(MemoryPokemonRepository::new())).with_default_limit(3);
        let many: Vec<(i32, String)> = (1..=5).map(|n| (n, format!("mon{n}"))).collect();
        let refs: Vec<(i32, &str)> = many.iter().map(|(n, s)| (*n, s.as_str())).collect();
        seed_items(&svc, &refs).await;
        assert_eq!(svc.list(Pagination::default()).await.unwrap().len(), 3);
        assert!(matches!(svc.list(Pagination::new(0, 0)).await, Err(ServiceError::BadRequest(_))));
    }

    #[tokio::test]
    async fn remove_existing_then_lookup_is_not_found() {
        let svc = memory_service();
        let items = seed_items(&svc, &[(1, "bulbasaur")]).await;
        let id = items[0].id.to_string();
        svc.remove(&id).await.unwrap();
        assert!(matches!(svc.find_one(&id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_unknown_id_is_bad_request() {
        let svc = memory_service();
        let err = svc.remove(&uuid::Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(ref m) if m.contains("not found")));
        let err = svc.remove("pikachu").await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(ref m) if m.contains("not a valid id")));
    }

    #[tokio::test]
    async fn update_lowercases_name_and_is_findable() {
        let svc = memory_service();
        seed_items(&svc, &[(1, "bulbasaur")]).await;
        let patch = UpdatePokemon { name: Some("BULBA".into()), ..Default::default() };
        let updated = svc.update("1", patch).await.unwrap();
        assert_eq!(updated.name, "bulba");
        assert_eq!(svc.find_one("Bulba").await.unwrap().id, updated.id);
    }

    // The response is the stored document after the write, not the pre-update
    // snapshot merged with the input.
    #[tokio::test]
    async fn update_returns_persisted_document_not_stale_snapshot() {
        let svc = memory_service();
        let items = seed_items(&svc, &[(1, "bulbasaur")]).await;
        let before = items[0].clone();
        let patch = UpdatePokemon { attributes: Some(json!({"type": "grass"})), ..Default::default() };
        let updated = svc.update("bulbasaur", patch).await.unwrap();
        assert_eq!(updated.attributes, json!({"type": "grass"}));
        assert_ne!(updated.attributes, before.attributes);
        assert!(updated.updated_at >= before.updated_at);
        assert_eq!(svc.find_one("1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_conflict_and_not_found() {
        let svc = memory_service();
        seed_items(&svc, &[(1, "bulbasaur"), (2, "ivysaur")]).await;
        let err = svc.update("2", UpdatePokemon { no: Some(1), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let err = svc.update("mew", UpdatePokemon::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn catalog_scenario() {
        let svc = memory_service();
        let items = seed_items(&svc, &[(1, "bulbasaur"), (2, "ivysaur")]).await;
        let ivysaur = items[1].clone();

        assert!(matches!(svc.create(create(1, "Bulbasaur")).await, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.find_one("2").await.unwrap().name, "ivysaur");
        assert_eq!(svc.find_one("IVYSAUR").await.unwrap().name, "ivysaur");
        svc.remove(&ivysaur.id.to_string()).await.unwrap();
        assert!(matches!(svc.find_one("2").await, Err(ServiceError::NotFound(_))));
    }
}

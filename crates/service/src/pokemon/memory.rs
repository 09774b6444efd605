use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::errors::ModelError;
use models::pokemon::{apply_patch, materialize, validate_name, validate_no, Model, NewPokemon, PokemonPatch};

use super::repository::PokemonRepository;

/// In-process store keeping the same unique keys as the `pokemon` table.
/// Each write holds the lock for its whole check-and-set.
#[derive(Clone, Default)]
pub struct MemoryPokemonRepository {
    inner: Arc<RwLock<HashMap<Uuid, Model>>>,
}

impl MemoryPokemonRepository {
    pub fn new() -> Self { Self::default() }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

fn conflict(map: &HashMap<Uuid, Model>, no: Option<i32>, name: Option<&str>, exclude: Option<Uuid>) -> Option<ModelError> {
    let others = move || map.values().filter(move |m| Some(m.id) != exclude);
    if let Some(no) = no {
        if others().any(|m| m.no == no) {
            return Some(ModelError::duplicate("no", no));
        }
    }
    if let Some(name) = name {
        if others().any(|m| m.name == name) {
            return Some(ModelError::duplicate("name", name));
        }
    }
    None
}

fn check(new: &NewPokemon) -> Result<(), ModelError> {
    validate_no(new.no)?;
    validate_name(&new.name)
}

#[async_trait]
impl PokemonRepository for MemoryPokemonRepository {
    async fn insert(&self, new: NewPokemon) -> Result<Model, ModelError> {
        check(&new)?;
        let mut map = self.inner.write().await;
        if let Some(dup) = conflict(&map, Some(new.no), Some(&new.name), None) {
            return Err(dup);
        }
        let model = materialize(new);
        map.insert(model.id, model.clone());
        Ok(model)
    }

    async fn insert_many(&self, items: Vec<NewPokemon>) -> Result<u64, ModelError> {
        for item in &items {
            check(item)?;
        }
        let mut map = self.inner.write().await;
        // all-or-nothing, like a single multi-row INSERT
        let mut staged: HashMap<Uuid, Model> = HashMap::with_capacity(items.len());
        for item in items {
            if let Some(dup) = conflict(&map, Some(item.no), Some(&item.name), None)
                .or_else(|| conflict(&staged, Some(item.no), Some(&item.name), None))
            {
                return Err(dup);
            }
            let model = materialize(item);
            staged.insert(model.id, model);
        }
        let count = staged.len() as u64;
        map.extend(staged);
        Ok(count)
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Model>, ModelError> {
        let map = self.inner.read().await;
        let mut rows: Vec<Model> = map.values().cloned().collect();
        rows.sort_by_key(|m| m.no);
        Ok(rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn find_by_no(&self, no: i32) -> Result<Option<Model>, ModelError> {
        let map = self.inner.read().await;
        Ok(map.values().find(|m| m.no == no).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, ModelError> {
        let map = self.inner.read().await;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Model>, ModelError> {
        let map = self.inner.read().await;
        Ok(map.values().find(|m| m.name == name).cloned())
    }

    async fn update(&self, id: Uuid, patch: PokemonPatch) -> Result<Model, ModelError> {
        if let Some(no) = patch.no { validate_no(no)?; }
        if let Some(name) = patch.name.as_deref() { validate_name(name)?; }
        let mut map = self.inner.write().await;
        if !map.contains_key(&id) {
            return Err(ModelError::NotFound(format!("pokemon {id}")));
        }
        if let Some(dup) = conflict(&map, patch.no, patch.name.as_deref(), Some(id)) {
            return Err(dup);
        }
        let existing = map
            .get_mut(&id)
            .ok_or_else(|| ModelError::NotFound(format!("pokemon {id}")))?;
        apply_patch(existing, patch);
        Ok(existing.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ModelError> {
        let mut map = self.inner.write().await;
        Ok(u64::from(map.remove(&id).is_some()))
    }

    async fn delete_all(&self) -> Result<u64, ModelError> {
        let mut map = self.inner.write().await;
        let count = map.len() as u64;
        map.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new(no: i32, name: &str) -> NewPokemon {
        NewPokemon { no, name: name.into(), attributes: json!({}) }
    }

    #[tokio::test]
    async fn unique_keys_are_enforced() {
        let repo = MemoryPokemonRepository::new();
        repo.insert(new(1, "bulbasaur")).await.unwrap();
        assert!(matches!(repo.insert(new(1, "other")).await, Err(ModelError::Duplicate { ref key, .. }) if key == "no"));
        assert!(matches!(repo.insert(new(2, "bulbasaur")).await, Err(ModelError::Duplicate { ref key, .. }) if key == "name"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn insert_many_is_all_or_nothing() {
        let repo = MemoryPokemonRepository::new();
        let err = repo.insert_many(vec![new(1, "a"), new(2, "b"), new(3, "a")]).await.unwrap_err();
        assert!(matches!(err, ModelError::Duplicate { .. }));
        assert!(repo.is_empty().await);
        assert_eq!(repo.insert_many(vec![new(1, "a"), new(2, "b")]).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn update_may_keep_its_own_keys() {
        let repo = MemoryPokemonRepository::new();
        let m = repo.insert(new(1, "bulbasaur")).await.unwrap();
        let patch = PokemonPatch { no: Some(1), name: Some("bulbasaur".into()), attributes: Some(json!({"type": "grass"})) };
        let updated = repo.update(m.id, patch).await.unwrap();
        assert_eq!(updated.attributes["type"], "grass");
    }

    #[tokio::test]
    async fn list_orders_by_no_and_pages() {
        let repo = MemoryPokemonRepository::new();
        repo.insert_many(vec![new(3, "c"), new(1, "a"), new(2, "b")]).await.unwrap();
        let page: Vec<i32> = repo.list(2, 1).await.unwrap().iter().map(|m| m.no).collect();
        assert_eq!(page, vec![2, 3]);
        assert!(repo.list(10, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_reports_rows() {
        let repo = MemoryPokemonRepository::new();
        let m = repo.insert(new(1, "a")).await.unwrap();
        assert_eq!(repo.delete(m.id).await.unwrap(), 1);
        assert_eq!(repo.delete(m.id).await.unwrap(), 0);
    }
}

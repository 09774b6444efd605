use std::sync::Arc;

use service::pokemon::{PokemonRepository, PokemonService};
use service::seed::SeedService;

/// Shared handler state. Cloned per request; everything inside is `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub pokemon: PokemonService<dyn PokemonRepository>,
    pub seed: Arc<SeedService<dyn PokemonRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn PokemonRepository>, cfg: &configs::AppConfig) -> Self {
        let pokemon = PokemonService::new(Arc::clone(&repo)).with_default_limit(cfg.pagination.default_limit);
        let seed = Arc::new(SeedService::new(repo, cfg.seed.source_url.clone(), cfg.seed.limit));
        Self { pokemon, seed }
    }
}

//! Catalog seeding from the public PokeAPI listing.
//!
//! The listing only carries `name` and a resource `url` ending in the
//! national dex number, which becomes `no`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use models::pokemon::{normalize_name, NewPokemon};

use crate::errors::ServiceError;
use crate::pokemon::repository::PokemonRepository;

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiListing {
    pub results: Vec<PokeApiEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeedSummary {
    pub removed: u64,
    pub inserted: u64,
}

/// `.../pokemon/25/` -> `25`
pub fn no_from_url(url: &str) -> Option<i32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// Entries whose url carries no usable number are skipped.
pub fn parse_listing(listing: PokeApiListing) -> Vec<NewPokemon> {
    listing
        .results
        .into_iter()
        .filter_map(|entry| match no_from_url(&entry.url) {
            Some(no) if no >= 1 => Some(NewPokemon {
                no,
                name: normalize_name(&entry.name),
                attributes: json!({ "url": entry.url }),
            }),
            _ => {
                warn!(name = %entry.name, url = %entry.url, "seed_entry_skipped");
                None
            }
        })
        .collect()
}

pub struct SeedService<R: PokemonRepository + ?Sized> {
    repo: Arc<R>,
    client: reqwest::Client,
    source_url: String,
    limit: u32,
}

impl<R: PokemonRepository + ?Sized> SeedService<R> {
    pub fn new(repo: Arc<R>, source_url: impl Into<String>, limit: u32) -> Self {
        Self { repo, client: reqwest::Client::new(), source_url: source_url.into(), limit }
    }

    /// Replace the whole catalog with the upstream listing.
    #[instrument(skip(self), fields(source = %self.source_url, limit = self.limit))]
    pub async fn seed(&self) -> Result<SeedSummary, ServiceError> {
        let listing = self.fetch().await?;
        self.seed_from(listing).await
    }

    async fn fetch(&self) -> Result<PokeApiListing, ServiceError> {
        let url = format!("{}?limit={}", self.source_url, self.limit);
        let upstream = |e: reqwest::Error| {
            error!(error = %e, %url, "seed_fetch_failed");
            ServiceError::Internal("Can't fetch seed data - Check server logs".into())
        };
        self.client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(upstream)?
            .json::<PokeApiListing>()
            .await
            .map_err(upstream)
    }

    pub async fn seed_from(&self, listing: PokeApiListing) -> Result<SeedSummary, ServiceError> {
        let removed = self
            .repo
            .delete_all()
            .await
            .map_err(|e| ServiceError::from_model(e, "seed"))?;
        let items = parse_listing(listing);
        let inserted = self
            .repo
            .insert_many(items)
            .await
            .map_err(|e| ServiceError::from_model(e, "seed"))?;
        info!(removed, inserted, "catalog_seeded");
        Ok(SeedSummary { removed, inserted })
    }
}

//! Flexible key resolution.
//!
//! A key is tried against `no`, then the datastore id, then `name`. Every
//! strategy runs whenever the earlier ones came back empty, whatever the key
//! looks like: a numeric key with no matching `no` is still tried as a name.

use uuid::Uuid;

use models::errors::ModelError;
use models::pokemon::{normalize_name, Model};

use super::repository::PokemonRepository;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Key parses as an integral number; match on `no`.
    No,
    /// Key parses as a UUID; match on `id`.
    Id,
    /// Lower-cased, trimmed key; match on `name`.
    Name,
}

/// Order in which strategies are attempted.
pub const LOOKUP_ORDER: [LookupStrategy; 3] = [LookupStrategy::No, LookupStrategy::Id, LookupStrategy::Name];

/// Any finite, integral number within `i32` range, so `"1.0"` and `"1e0"` both give `1`.
pub fn parse_no(key: &str) -> Option<i32> {
    let n: f64 = key.trim().parse().ok()?;
    if n.is_finite() && n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
        Some(n as i32)
    } else {
        None
    }
}

pub fn parse_id(key: &str) -> Option<Uuid> {
    Uuid::parse_str(key).ok()
}

pub fn name_key(key: &str) -> String {
    normalize_name(key).trim().to_string()
}

impl LookupStrategy {
    /// `Ok(None)` both when the key does not fit this strategy and when nothing matched.
    pub async fn resolve<R>(self, repo: &R, key: &str) -> Result<Option<Model>, ModelError>
    where
        R: PokemonRepository + ?Sized,
    {
        match self {
            LookupStrategy::No => match parse_no(key) {
                Some(no) => repo.find_by_no(no).await,
                None => Ok(None),
            },
            LookupStrategy::Id => match parse_id(key) {
                Some(id) => repo.find_by_id(id).await,
                None => Ok(None),
            },
            LookupStrategy::Name => {
                let name = name_key(key);
                if name.is_empty() {
                    return Ok(None);
                }
                repo.find_by_name(&name).await
            }
        }
    }
}

/// Run the chain, stopping at the first hit.
pub async fn resolve<R>(repo: &R, key: &str) -> Result<Option<(LookupStrategy, Model)>, ModelError>
where
    R: PokemonRepository + ?Sized,
{
    for strategy in LOOKUP_ORDER {
        if let Some(found) = strategy.resolve(repo, key).await? {
            return Ok(Some((strategy, found)));
        }
    }
    Ok(None)
}

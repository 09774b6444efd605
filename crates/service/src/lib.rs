//! Service layer providing the catalog operations on top of models.
//! - Separates business rules (name normalization, lookup order, error kinds) from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Storage is injected through the `PokemonRepository` trait.

pub mod errors;
pub mod pagination;
pub mod pokemon;
pub mod seed;
#[cfg(test)]
pub mod test_support;

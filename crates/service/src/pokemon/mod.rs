//! The catalog resource: inputs, storage seam, lookup chain and service.

pub mod domain;
pub mod lookup;
pub mod memory;
pub mod repository;
pub mod service;

pub use domain::{CreatePokemon, UpdatePokemon};
pub use memory::MemoryPokemonRepository;
pub use repository::{PokemonRepository, SeaOrmPokemonRepository};
pub use service::PokemonService;

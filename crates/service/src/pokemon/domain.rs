use serde::{Deserialize, Serialize};
use serde_json::Value;

use models::pokemon::{normalize_name, validate_name, validate_no, NewPokemon, PokemonPatch};

use crate::errors::ServiceError;

/// Create input. `attributes` is stored as-is.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CreatePokemon {
    pub no: i32,
    pub name: String,
    #[serde(default)]
    pub attributes: Option<Value>,
}

/// Partial update input; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdatePokemon {
    #[serde(default)]
    pub no: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub attributes: Option<Value>,
}

fn invalid(e: models::errors::ModelError) -> ServiceError {
    ServiceError::BadRequest(e.to_string())
}

impl CreatePokemon {
    /// Validate and lower-case the name.
    pub fn into_new(self) -> Result<NewPokemon, ServiceError> {
        validate_no(self.no).map_err(invalid)?;
        validate_name(&self.name).map_err(invalid)?;
        Ok(NewPokemon {
            no: self.no,
            name: normalize_name(&self.name),
            attributes: self.attributes.unwrap_or_else(|| Value::Object(Default::default())),
        })
    }
}

impl UpdatePokemon {
    /// Validate present fields and lower-case the name if given.
    pub fn into_patch(self) -> Result<PokemonPatch, ServiceError> {
        if let Some(no) = self.no {
            validate_no(no).map_err(invalid)?;
        }
        if let Some(name) = self.name.as_deref() {
            validate_name(name).map_err(invalid)?;
        }
        Ok(PokemonPatch {
            no: self.no,
            name: self.name.as_deref().map(normalize_name),
            attributes: self.attributes,
        })
    }
}

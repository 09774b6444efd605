use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct PokemonDoc {
    pub id: Uuid,
    pub no: i32,
    pub name: String,
    #[schema(value_type = Object)]
    pub attributes: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct CreatePokemonDoc {
    pub no: i32,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<serde_json::Value>,
}

#[derive(ToSchema)]
pub struct UpdatePokemonDoc {
    pub no: Option<i32>,
    pub name: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<serde_json::Value>,
}

#[derive(ToSchema)]
pub struct SeedSummaryDoc { pub removed: u64, pub inserted: u64 }

#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQueryDoc {
    /// Page size, defaults to the configured limit
    pub limit: Option<u64>,
    /// Items to skip
    pub offset: Option<u64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::pokemon::create,
        crate::routes::pokemon::list,
        crate::routes::pokemon::find_one,
        crate::routes::pokemon::update,
        crate::routes::pokemon::remove,
        crate::routes::seed::run,
    ),
    components(
        schemas(
            HealthResponse,
            PokemonDoc,
            CreatePokemonDoc,
            UpdatePokemonDoc,
            SeedSummaryDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "pokemon", description = "Catalog CRUD"),
        (name = "seed", description = "Bulk load from PokeAPI")
    )
)]
pub struct ApiDoc;

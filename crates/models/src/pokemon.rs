use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, QuerySelect, Set, SqlErr};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pokemon")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub no: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub attributes: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted on insert. `name` is expected to be normalized already.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPokemon {
    pub no: i32,
    pub name: String,
    pub attributes: Json,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PokemonPatch {
    pub no: Option<i32>,
    pub name: Option<String>,
    pub attributes: Option<Json>,
}

impl PokemonPatch {
    pub fn is_empty(&self) -> bool {
        self.no.is_none() && self.name.is_none() && self.attributes.is_none()
    }
}

/// Names are compared and stored lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

pub fn validate_no(no: i32) -> Result<(), ModelError> {
    if no < 1 {
        return Err(ModelError::Validation("no must be a positive integer".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// Build the model a fresh insert would persist.
pub fn materialize(new: NewPokemon) -> Model {
    let now = Utc::now().into();
    Model {
        id: Uuid::new_v4(),
        no: new.no,
        name: new.name,
        attributes: new.attributes,
        created_at: now,
        updated_at: now,
    }
}

/// Apply a patch in place and bump `updated_at`.
pub fn apply_patch(model: &mut Model, patch: PokemonPatch) {
    if let Some(no) = patch.no { model.no = no; }
    if let Some(name) = patch.name { model.name = name; }
    if let Some(attributes) = patch.attributes { model.attributes = attributes; }
    model.updated_at = Utc::now().into();
}

fn active(model: Model) -> ActiveModel {
    ActiveModel {
        id: Set(model.id),
        no: Set(model.no),
        name: Set(model.name),
        attributes: Set(model.attributes),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

/// Identify which unique key a rejected write collided with.
/// Rows with id `exclude` are ignored so an update does not collide with itself.
async fn find_conflict(
    db: &DatabaseConnection,
    no: Option<i32>,
    name: Option<&str>,
    exclude: Option<Uuid>,
) -> Result<Option<ModelError>, DbErr> {
    if let Some(no) = no {
        let mut q = Entity::find().filter(Column::No.eq(no));
        if let Some(id) = exclude { q = q.filter(Column::Id.ne(id)); }
        if q.one(db).await?.is_some() {
            return Ok(Some(ModelError::duplicate("no", no)));
        }
    }
    if let Some(name) = name {
        let mut q = Entity::find().filter(Column::Name.eq(name));
        if let Some(id) = exclude { q = q.filter(Column::Id.ne(id)); }
        if q.one(db).await?.is_some() {
            return Ok(Some(ModelError::duplicate("name", name)));
        }
    }
    Ok(None)
}

async fn classify(
    db: &DatabaseConnection,
    err: DbErr,
    no: Option<i32>,
    name: Option<&str>,
    exclude: Option<Uuid>,
) -> ModelError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => match find_conflict(db, no, name, exclude).await {
            Ok(Some(dup)) => dup,
            // lost a race with a delete; report what the driver said
            Ok(None) => ModelError::duplicate("unique", detail),
            Err(lookup) => ModelError::Db(lookup.to_string()),
        },
        _ => ModelError::Db(err.to_string()),
    }
}

pub async fn create(db: &DatabaseConnection, new: NewPokemon) -> Result<Model, ModelError> {
    validate_no(new.no)?;
    validate_name(&new.name)?;
    let model = materialize(new);
    let (no, name) = (model.no, model.name.clone());
    match active(model).insert(db).await {
        Ok(m) => Ok(m),
        Err(e) => Err(classify(db, e, Some(no), Some(&name), None).await),
    }
}

/// Bulk insert; returns the number of rows written.
pub async fn create_many(db: &DatabaseConnection, items: Vec<NewPokemon>) -> Result<u64, ModelError> {
    if items.is_empty() {
        return Ok(0);
    }
    for item in &items {
        validate_no(item.no)?;
        validate_name(&item.name)?;
    }
    let count = items.len() as u64;
    let keys: Vec<(i32, String)> = items.iter().map(|i| (i.no, i.name.clone())).collect();
    let rows = items.into_iter().map(|i| active(materialize(i)));
    match Entity::insert_many(rows).exec(db).await {
        Ok(_) => Ok(count),
        Err(e) => {
            if !matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return Err(ModelError::Db(e.to_string()));
            }
            for (no, name) in &keys {
                match find_conflict(db, Some(*no), Some(name), None).await {
                    Ok(Some(dup)) => return Err(dup),
                    Ok(None) => continue,
                    Err(lookup) => return Err(ModelError::Db(lookup.to_string())),
                }
            }
            // the batch collided with itself; the first repeated key wins
            let mut seen_no = std::collections::HashSet::new();
            let mut seen_name = std::collections::HashSet::new();
            for (no, name) in keys {
                if !seen_no.insert(no) { return Err(ModelError::duplicate("no", no)); }
                if !seen_name.insert(name.clone()) { return Err(ModelError::duplicate("name", name)); }
            }
            Err(ModelError::Db(e.to_string()))
        }
    }
}

/// Page ordered by ascending `no`.
pub async fn list(db: &DatabaseConnection, limit: u64, offset: u64) -> Result<Vec<Model>, ModelError> {
    let rows = Entity::find()
        .order_by_asc(Column::No)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_no(db: &DatabaseConnection, no: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::No.eq(no)).one(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Name.eq(name)).one(db).await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, patch: PokemonPatch) -> Result<Model, ModelError> {
    if let Some(no) = patch.no { validate_no(no)?; }
    if let Some(name) = patch.name.as_deref() { validate_name(name)?; }
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("pokemon {id}")))?
        .into();
    let (no, name) = (patch.no, patch.name.clone());
    if let Some(v) = patch.no { am.no = Set(v); }
    if let Some(v) = patch.name { am.name = Set(v); }
    if let Some(v) = patch.attributes { am.attributes = Set(v); }
    am.updated_at = Set(Utc::now().into());
    match am.update(db).await {
        Ok(m) => Ok(m),
        Err(e) => Err(classify(db, e, no, name.as_deref(), Some(id)).await),
    }
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

pub async fn delete_all(db: &DatabaseConnection) -> Result<u64, ModelError> {
    let res = Entity::delete_many().exec(db).await?;
    Ok(res.rows_affected)
}

//! Create `pokemon` table.
//! `no` and `name` carry unique indexes; duplicate inserts fail at the store.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pokemon::Table)
                    .if_not_exists()
                    .col(uuid(Pokemon::Id).primary_key())
                    .col(integer(Pokemon::No).not_null())
                    .col(string_len(Pokemon::Name, 128).not_null())
                    .col(json(Pokemon::Attributes).not_null())
                    .col(timestamp_with_time_zone(Pokemon::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Pokemon::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_pokemon_no")
                    .table(Pokemon::Table)
                    .col(Pokemon::No)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_pokemon_name")
                    .table(Pokemon::Table)
                    .col(Pokemon::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Pokemon::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Pokemon {
    Table,
    Id,
    No,
    Name,
    Attributes,
    CreatedAt,
    UpdatedAt,
}

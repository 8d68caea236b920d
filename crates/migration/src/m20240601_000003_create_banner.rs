//! Create `banner` table.
//!
//! Promotional display units; style columns hold CSS utility classes or hex colors.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Banner::Table)
                    .if_not_exists()
                    .col(pk_auto(Banner::Id))
                    .col(string_len(Banner::Title, 100).not_null())
                    .col(string_len(Banner::Subtitle, 200).not_null())
                    .col(string_len(Banner::Tag, 50).not_null().default("NUEVO"))
                    .col(string_len(Banner::Image, 255).not_null())
                    .col(string_len(Banner::BackgroundStyle, 50).not_null().default("bg-green-600"))
                    .col(string_len(Banner::TextStyle, 50).not_null().default("text-white"))
                    .col(string_len(Banner::ButtonLabel, 50).not_null().default("VER MÁS"))
                    .col(string_len(Banner::Link, 200).not_null().default("/productos"))
                    .col(boolean(Banner::Active).not_null().default(true))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Banner::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Banner {
    Table,
    Id,
    Title,
    Subtitle,
    Tag,
    Image,
    BackgroundStyle,
    TextStyle,
    ButtonLabel,
    Link,
    Active,
}

//! Create `product` table with FK to `category`.
//!
//! Price and stock are guarded by CHECK constraints.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 200).not_null())
                    .col(ColumnDef::new(Product::Description).text().null())
                    .col(
                        decimal_len(Product::Price, 10, 2)
                            .not_null()
                            .check(Expr::col(Product::Price).gte(0)),
                    )
                    .col(integer(Product::CategoryId).not_null())
                    .col(
                        integer(Product::Stock)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Product::Stock).gte(0)),
                    )
                    .col(ColumnDef::new(Product::Image).string_len(255).null())
                    .col(boolean(Product::Featured).not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category")
                            .from(Product::Table, Product::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, Name, Description, Price, CategoryId, Stock, Image, Featured }

#[derive(DeriveIden)]
enum Category { Table, Id }

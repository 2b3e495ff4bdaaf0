//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for the marketplace:
//!
//! - `users`: authentication identities
//! - `consumers` / `sellers` / `admins`: one role row per user
//! - `stores`: one store per seller
//! - `products`: catalog entries, owned by a store
//! - `stock_entries`: sellable quantity per (store, product)
//! - `cart_items`: reserved quantity per (consumer, product)
//! - `purchase_records`: immutable purchase history

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Login,
    PasswordHash,
}

#[derive(Iden)]
enum Consumers {
    Table,
    Id,
    UserId,
    Money,
}

#[derive(Iden)]
enum Sellers {
    Table,
    Id,
    UserId,
    Money,
}

#[derive(Iden)]
enum Admins {
    Table,
    Id,
    UserId,
}

#[derive(Iden)]
enum Stores {
    Table,
    Id,
    Title,
    SellerId,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Title,
    Price,
    StoreId,
}

#[derive(Iden)]
enum StockEntries {
    Table,
    Id,
    StoreId,
    ProductId,
    Quantity,
}

#[derive(Iden)]
enum CartItems {
    Table,
    Id,
    ConsumerId,
    ProductId,
    Quantity,
}

#[derive(Iden)]
enum PurchaseRecords {
    Table,
    Id,
    ConsumerId,
    ProductId,
    Quantity,
    PurchasedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Login).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-login-unique")
                    .table(Users::Table)
                    .col(Users::Login)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Role rows: consumers, sellers, admins
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Consumers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Consumers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Consumers::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Consumers::Money)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-consumers-user_id")
                            .from(Consumers::Table, Consumers::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-consumers-user_id-unique")
                    .table(Consumers::Table)
                    .col(Consumers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sellers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sellers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sellers::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Sellers::Money)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sellers-user_id")
                            .from(Sellers::Table, Sellers::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sellers-user_id-unique")
                    .table(Sellers::Table)
                    .col(Sellers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admins::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-admins-user_id")
                            .from(Admins::Table, Admins::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-admins-user_id-unique")
                    .table(Admins::Table)
                    .col(Admins::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Stores
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stores::Title).string().not_null())
                    .col(ColumnDef::new(Stores::SellerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stores-seller_id")
                            .from(Stores::Table, Stores::SellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One store per seller.
        manager
            .create_index(
                Index::create()
                    .name("idx-stores-seller_id-unique")
                    .table(Stores::Table)
                    .col(Stores::SellerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Products
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Title).string().not_null())
                    .col(ColumnDef::new(Products::Price).big_integer().not_null())
                    .col(ColumnDef::new(Products::StoreId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-products-store_id")
                            .from(Products::Table, Products::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-store_id")
                    .table(Products::Table)
                    .col(Products::StoreId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Stock entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(StockEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockEntries::StoreId).integer().not_null())
                    .col(ColumnDef::new(StockEntries::ProductId).integer().not_null())
                    .col(
                        ColumnDef::new(StockEntries::Quantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stock_entries-store_id")
                            .from(StockEntries::Table, StockEntries::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stock_entries-product_id")
                            .from(StockEntries::Table, StockEntries::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stock_entries-store_id-product_id-unique")
                    .table(StockEntries::Table)
                    .col(StockEntries::StoreId)
                    .col(StockEntries::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Cart items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CartItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CartItems::ConsumerId).integer().not_null())
                    .col(ColumnDef::new(CartItems::ProductId).integer().not_null())
                    .col(ColumnDef::new(CartItems::Quantity).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cart_items-consumer_id")
                            .from(CartItems::Table, CartItems::ConsumerId)
                            .to(Consumers::Table, Consumers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cart_items-product_id")
                            .from(CartItems::Table, CartItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cart_items-consumer_id-product_id-unique")
                    .table(CartItems::Table)
                    .col(CartItems::ConsumerId)
                    .col(CartItems::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Purchase records
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PurchaseRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::ConsumerId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRecords::PurchasedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_records-consumer_id")
                            .from(PurchaseRecords::Table, PurchaseRecords::ConsumerId)
                            .to(Consumers::Table, Consumers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_records-product_id")
                            .from(PurchaseRecords::Table, PurchaseRecords::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchase_records-consumer_id")
                    .table(PurchaseRecords::Table)
                    .col(PurchaseRecords::ConsumerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchase_records-product_id")
                    .table(PurchaseRecords::Table)
                    .col(PurchaseRecords::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(PurchaseRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CartItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sellers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Consumers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

use sea_orm::{ActiveValue, DatabaseConnection, DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, cart_items, consumers, products, sellers, stock_entries, stores};

mod admin;
mod cart;
mod catalog;
mod purchase;
mod sellers_ops;
mod users;

pub use cart::{CartLine, CartSnapshot};
pub use catalog::{CatalogProduct, StoreWithSeller};
pub use purchase::PurchaseOutcome;
pub use sellers_ops::{StockLine, StoreOverview};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(super) async fn require_consumer(
        &self,
        db: &DatabaseTransaction,
        consumer_id: i32,
    ) -> ResultEngine<consumers::Model> {
        consumers::Entity::find_by_id(consumer_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("consumer not exists".to_string()))
    }

    pub(super) async fn require_seller(
        &self,
        db: &DatabaseTransaction,
        seller_id: i32,
    ) -> ResultEngine<sellers::Model> {
        sellers::Entity::find_by_id(seller_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("seller not exists".to_string()))
    }

    pub(super) async fn require_product(
        &self,
        db: &DatabaseTransaction,
        product_id: i32,
    ) -> ResultEngine<products::Model> {
        products::Entity::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))
    }

    /// The seller's store, or `KeyNotFound` when none was created yet.
    pub(super) async fn require_store_of_seller(
        &self,
        db: &DatabaseTransaction,
        seller_id: i32,
    ) -> ResultEngine<stores::Model> {
        stores::Entity::find()
            .filter(stores::Column::SellerId.eq(seller_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))
    }

    /// A product scoped to one store; missing and foreign products are
    /// indistinguishable to the caller.
    pub(super) async fn require_product_in_store(
        &self,
        db: &DatabaseTransaction,
        product_id: i32,
        store_id: i32,
    ) -> ResultEngine<products::Model> {
        products::Entity::find_by_id(product_id)
            .filter(products::Column::StoreId.eq(store_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))
    }

    pub(super) async fn stock_entry(
        &self,
        db: &DatabaseTransaction,
        store_id: i32,
        product_id: i32,
    ) -> ResultEngine<Option<stock_entries::Model>> {
        stock_entries::Entity::find()
            .filter(stock_entries::Column::StoreId.eq(store_id))
            .filter(stock_entries::Column::ProductId.eq(product_id))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Adds `delta` units of a product back to (or out of) its store,
    /// creating the stock row at 0 first when absent.
    pub(super) async fn add_stock(
        &self,
        db: &DatabaseTransaction,
        store_id: i32,
        product_id: i32,
        delta: i64,
    ) -> ResultEngine<stock_entries::Model> {
        let entry = match self.stock_entry(db, store_id, product_id).await? {
            Some(entry) => entry,
            None => {
                let new_entry = stock_entries::ActiveModel {
                    store_id: ActiveValue::Set(store_id),
                    product_id: ActiveValue::Set(product_id),
                    quantity: ActiveValue::Set(0),
                    ..Default::default()
                };
                new_entry.insert(db).await?
            }
        };

        let mut active: stock_entries::ActiveModel = entry.clone().into();
        active.quantity = ActiveValue::Set(entry.quantity + delta);
        active.update(db).await.map_err(Into::into)
    }

    pub(super) async fn cart_item(
        &self,
        db: &DatabaseTransaction,
        consumer_id: i32,
        product_id: i32,
    ) -> ResultEngine<Option<cart_items::Model>> {
        cart_items::Entity::find()
            .filter(cart_items::Column::ConsumerId.eq(consumer_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .one(db)
            .await
            .map_err(Into::into)
    }
}

fn require_positive_amount(amount: i64, label: &str) -> ResultEngine<()> {
    if amount <= 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be positive"
        )));
    }
    Ok(())
}

fn require_quantity(quantity: i64) -> ResultEngine<()> {
    if quantity < 1 {
        return Err(EngineError::InvalidAmount(
            "quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn normalize_required_title(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(
            "title must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}

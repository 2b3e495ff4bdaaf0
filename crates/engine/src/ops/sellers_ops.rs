//! Seller store, product and balance management.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, cart_items, products, purchase_records, sellers, stock_entries,
    stores,
};

use super::{
    Engine, normalize_required_title, require_positive_amount, require_quantity, with_tx,
};

/// A stock row joined with its product, for the seller's overview.
#[derive(Clone, Debug)]
pub struct StockLine {
    pub entry: stock_entries::Model,
    pub product: products::Model,
}

/// The seller's store with its stocked products.
#[derive(Clone, Debug)]
pub struct StoreOverview {
    pub store: stores::Model,
    pub products: Vec<StockLine>,
}

impl Engine {
    /// Create the seller's store. At most one per seller.
    pub async fn create_store(&self, seller_id: i32, title: &str) -> ResultEngine<stores::Model> {
        let title = normalize_required_title(title)?;

        with_tx!(self, |db_tx| {
            let exists = stores::Entity::find()
                .filter(stores::Column::SellerId.eq(seller_id))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey("store".to_string()));
            }

            let store = stores::ActiveModel {
                title: ActiveValue::Set(title),
                seller_id: ActiveValue::Set(seller_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            Ok(store)
        })
    }

    /// Add a product to the seller's store.
    ///
    /// A stock row is only created when an initial quantity is given;
    /// a catalog entry with zero stock is legal.
    pub async fn create_product(
        &self,
        seller_id: i32,
        title: &str,
        price: i64,
        quantity: Option<i64>,
    ) -> ResultEngine<products::Model> {
        let title = normalize_required_title(title)?;
        require_positive_amount(price, "price")?;

        with_tx!(self, |db_tx| {
            let store = self.require_store_of_seller(&db_tx, seller_id).await?;

            let product = products::ActiveModel {
                title: ActiveValue::Set(title),
                price: ActiveValue::Set(price),
                store_id: ActiveValue::Set(store.id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            if let Some(quantity) = quantity
                && quantity > 0
            {
                stock_entries::ActiveModel {
                    store_id: ActiveValue::Set(store.id),
                    product_id: ActiveValue::Set(product.id),
                    quantity: ActiveValue::Set(quantity),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;
            }

            Ok(product)
        })
    }

    /// Partial update of a product owned by the seller.
    pub async fn update_product(
        &self,
        seller_id: i32,
        product_id: i32,
        title: Option<&str>,
        price: Option<i64>,
    ) -> ResultEngine<products::Model> {
        with_tx!(self, |db_tx| {
            let store = self.require_store_of_seller(&db_tx, seller_id).await?;
            let product = self
                .require_product_in_store(&db_tx, product_id, store.id)
                .await?;

            let mut active: products::ActiveModel = product.into();
            if let Some(title) = title {
                active.title = ActiveValue::Set(normalize_required_title(title)?);
            }
            if let Some(price) = price {
                require_positive_amount(price, "price")?;
                active.price = ActiveValue::Set(price);
            }
            let updated = active.update(&db_tx).await?;

            Ok(updated)
        })
    }

    /// Remove a product from the seller's store along with every row
    /// referencing it, dependents first.
    pub async fn delete_product_as_seller(
        &self,
        seller_id: i32,
        product_id: i32,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let store = self.require_store_of_seller(&db_tx, seller_id).await?;
            self.require_product_in_store(&db_tx, product_id, store.id)
                .await?;

            self.delete_product_rows(&db_tx, product_id).await?;

            Ok(())
        })
    }

    /// Restock a product: creates the stock row at 0 when absent, then
    /// adds the quantity. No stocking history is kept.
    pub async fn increase_product_quantity(
        &self,
        seller_id: i32,
        product_id: i32,
        quantity: i64,
    ) -> ResultEngine<stock_entries::Model> {
        require_quantity(quantity)?;

        with_tx!(self, |db_tx| {
            let store = self.require_store_of_seller(&db_tx, seller_id).await?;
            self.require_product_in_store(&db_tx, product_id, store.id)
                .await?;

            let entry = self.add_stock(&db_tx, store.id, product_id, quantity).await?;

            Ok(entry)
        })
    }

    /// Withdraw from the seller's balance, which never goes negative.
    pub async fn withdraw_money(&self, seller_id: i32, amount: i64) -> ResultEngine<i64> {
        require_positive_amount(amount, "amount")?;

        with_tx!(self, |db_tx| {
            let seller = self.require_seller(&db_tx, seller_id).await?;
            if seller.money < amount {
                return Err(EngineError::InsufficientFunds {
                    required: amount,
                    available: seller.money,
                });
            }

            let new_balance = seller.money - amount;
            let mut active: sellers::ActiveModel = seller.into();
            active.money = ActiveValue::Set(new_balance);
            active.update(&db_tx).await?;

            Ok(new_balance)
        })
    }

    /// The seller's store plus its stock rows joined with products.
    pub async fn seller_store_products(&self, seller_id: i32) -> ResultEngine<StoreOverview> {
        with_tx!(self, |db_tx| {
            let store = self.require_store_of_seller(&db_tx, seller_id).await?;

            let rows: Vec<(stock_entries::Model, Option<products::Model>)> =
                stock_entries::Entity::find()
                    .filter(stock_entries::Column::StoreId.eq(store.id))
                    .find_also_related(products::Entity)
                    .all(&db_tx)
                    .await?;

            let mut lines = Vec::with_capacity(rows.len());
            for (entry, product) in rows {
                let product = product.ok_or_else(|| {
                    EngineError::KeyNotFound("product not exists".to_string())
                })?;
                lines.push(StockLine { entry, product });
            }

            Ok(StoreOverview {
                store,
                products: lines,
            })
        })
    }

    /// Delete every row referencing a product, then the product itself.
    /// Shared by the seller path and the admin cascades.
    pub(super) async fn delete_product_rows(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        product_id: i32,
    ) -> ResultEngine<()> {
        stock_entries::Entity::delete_many()
            .filter(stock_entries::Column::ProductId.eq(product_id))
            .exec(db_tx)
            .await?;
        purchase_records::Entity::delete_many()
            .filter(purchase_records::Column::ProductId.eq(product_id))
            .exec(db_tx)
            .await?;
        cart_items::Entity::delete_many()
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(db_tx)
            .await?;
        products::Entity::delete_by_id(product_id).exec(db_tx).await?;
        Ok(())
    }
}

//! Consumer cart and balance operations.
//!
//! Cart lines are reserved stock: adding to the cart moves units out of
//! the store's stock entry in the same transaction, removing or
//! shrinking a line moves them back.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, cart_items, consumers, products, stores,
};

use super::{Engine, require_positive_amount, require_quantity, with_tx};

/// A cart line joined with its product and the product's store.
#[derive(Clone, Debug)]
pub struct CartLine {
    pub item: cart_items::Model,
    pub product: products::Model,
    pub store: stores::Model,
}

/// Everything a consumer sees when opening the cart.
#[derive(Clone, Debug)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub balance: i64,
}

impl Engine {
    /// Add money to a consumer's balance. No upper bound.
    pub async fn deposit_money(&self, consumer_id: i32, amount: i64) -> ResultEngine<i64> {
        require_positive_amount(amount, "amount")?;

        with_tx!(self, |db_tx| {
            let consumer = self.require_consumer(&db_tx, consumer_id).await?;
            let new_balance = consumer.money + amount;

            let mut active: consumers::ActiveModel = consumer.into();
            active.money = ActiveValue::Set(new_balance);
            active.update(&db_tx).await?;

            Ok(new_balance)
        })
    }

    /// Reserve `quantity` units of a product into the consumer's cart.
    ///
    /// Fails when the store has fewer units available than requested;
    /// a missing stock row counts as zero.
    pub async fn add_to_cart(
        &self,
        consumer_id: i32,
        product_id: i32,
        quantity: i64,
    ) -> ResultEngine<cart_items::Model> {
        require_quantity(quantity)?;

        with_tx!(self, |db_tx| {
            let product = self.require_product(&db_tx, product_id).await?;

            let available = self
                .stock_entry(&db_tx, product.store_id, product.id)
                .await?
                .map_or(0, |entry| entry.quantity);
            if available < quantity {
                return Err(EngineError::InsufficientStock { available });
            }

            self.add_stock(&db_tx, product.store_id, product.id, -quantity)
                .await?;

            let item = match self.cart_item(&db_tx, consumer_id, product_id).await? {
                Some(item) => {
                    let new_quantity = item.quantity + quantity;
                    let mut active: cart_items::ActiveModel = item.into();
                    active.quantity = ActiveValue::Set(new_quantity);
                    active.update(&db_tx).await?
                }
                None => {
                    cart_items::ActiveModel {
                        consumer_id: ActiveValue::Set(consumer_id),
                        product_id: ActiveValue::Set(product_id),
                        quantity: ActiveValue::Set(quantity),
                        ..Default::default()
                    }
                    .insert(&db_tx)
                    .await?
                }
            };

            Ok(item)
        })
    }

    /// Drop a cart line, returning its full reserved quantity to the
    /// store. Returns the quantity that went back.
    pub async fn remove_from_cart(
        &self,
        consumer_id: i32,
        product_id: i32,
    ) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            let item = self
                .cart_item(&db_tx, consumer_id, product_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("product not in cart".to_string()))?;
            let product = self.require_product(&db_tx, product_id).await?;

            let returned = item.quantity;
            // add_stock recreates the row at 0 first; the stock entry may
            // have been cleaned up while the line sat in the cart.
            self.add_stock(&db_tx, product.store_id, product.id, returned)
                .await?;

            let active: cart_items::ActiveModel = item.into();
            active.delete(&db_tx).await?;

            Ok(returned)
        })
    }

    /// Set a cart line to `new_quantity`.
    ///
    /// A shrink returns the delta to the store. A grow does not re-check
    /// store availability: only add_to_cart draws stock down, so the
    /// stock ledger stays consistent either way.
    pub async fn update_cart_quantity(
        &self,
        consumer_id: i32,
        product_id: i32,
        new_quantity: i64,
    ) -> ResultEngine<cart_items::Model> {
        require_quantity(new_quantity)?;

        with_tx!(self, |db_tx| {
            let item = self
                .cart_item(&db_tx, consumer_id, product_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("product not in cart".to_string()))?;
            let product = self.require_product(&db_tx, product_id).await?;

            let delta = item.quantity - new_quantity;
            if delta > 0 {
                self.add_stock(&db_tx, product.store_id, product.id, delta)
                    .await?;
            }

            let mut active: cart_items::ActiveModel = item.into();
            active.quantity = ActiveValue::Set(new_quantity);
            let updated = active.update(&db_tx).await?;

            Ok(updated)
        })
    }

    /// All cart lines joined with product and store, plus the balance.
    pub async fn cart(&self, consumer_id: i32) -> ResultEngine<CartSnapshot> {
        with_tx!(self, |db_tx| {
            let consumer = self.require_consumer(&db_tx, consumer_id).await?;

            let rows: Vec<(cart_items::Model, Option<products::Model>)> =
                cart_items::Entity::find()
                    .filter(cart_items::Column::ConsumerId.eq(consumer_id))
                    .find_also_related(products::Entity)
                    .all(&db_tx)
                    .await?;

            let mut lines = Vec::with_capacity(rows.len());
            for (item, product) in rows {
                let product = product.ok_or_else(|| {
                    EngineError::KeyNotFound("product not exists".to_string())
                })?;
                let store = stores::Entity::find_by_id(product.store_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))?;
                lines.push(CartLine {
                    item,
                    product,
                    store,
                });
            }

            Ok(CartSnapshot {
                lines,
                balance: consumer.money,
            })
        })
    }
}

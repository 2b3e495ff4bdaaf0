//! The purchase workflow: the one multi-step transaction.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, cart_items, consumers, purchase_records, sellers, stores,
};

use super::{Engine, with_tx};

/// Result of a completed purchase.
#[derive(Clone, Debug)]
pub struct PurchaseOutcome {
    pub total_cost: i64,
    pub purchases: Vec<purchase_records::Model>,
}

impl Engine {
    /// Buy everything in the consumer's cart.
    ///
    /// Aggregates the cart into a total cost and per-seller payments,
    /// checks funds, debits the consumer, writes one purchase record
    /// per line, credits each seller and clears the cart. All of it
    /// commits atomically; an insufficient-funds failure leaves every
    /// row untouched. Stock is not touched here: the cart already
    /// holds the reserved units.
    pub async fn purchase_cart(&self, consumer_id: i32) -> ResultEngine<PurchaseOutcome> {
        let purchased_at = Utc::now();

        with_tx!(self, |db_tx| {
            let items = cart_items::Entity::find()
                .filter(cart_items::Column::ConsumerId.eq(consumer_id))
                .all(&db_tx)
                .await?;
            if items.is_empty() {
                return Err(EngineError::EmptyCart);
            }

            let mut total_cost: i64 = 0;
            let mut seller_payments: HashMap<i32, i64> = HashMap::new();

            for item in &items {
                let product = self.require_product(&db_tx, item.product_id).await?;
                let store = stores::Entity::find_by_id(product.store_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))?;

                let item_cost = product.price * item.quantity;
                total_cost += item_cost;
                *seller_payments.entry(store.seller_id).or_insert(0) += item_cost;
            }

            let consumer = self.require_consumer(&db_tx, consumer_id).await?;
            if consumer.money < total_cost {
                return Err(EngineError::InsufficientFunds {
                    required: total_cost,
                    available: consumer.money,
                });
            }

            let new_balance = consumer.money - total_cost;
            let mut consumer_active: consumers::ActiveModel = consumer.into();
            consumer_active.money = ActiveValue::Set(new_balance);
            consumer_active.update(&db_tx).await?;

            let mut purchases = Vec::with_capacity(items.len());
            for item in &items {
                let record = purchase_records::ActiveModel {
                    consumer_id: ActiveValue::Set(consumer_id),
                    product_id: ActiveValue::Set(item.product_id),
                    quantity: ActiveValue::Set(item.quantity),
                    purchased_at: ActiveValue::Set(purchased_at),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;
                purchases.push(record);
            }

            for (seller_id, payment) in seller_payments {
                let seller = self.require_seller(&db_tx, seller_id).await?;
                let credited = seller.money + payment;
                let mut seller_active: sellers::ActiveModel = seller.into();
                seller_active.money = ActiveValue::Set(credited);
                seller_active.update(&db_tx).await?;
            }

            cart_items::Entity::delete_many()
                .filter(cart_items::Column::ConsumerId.eq(consumer_id))
                .exec(&db_tx)
                .await?;

            Ok(PurchaseOutcome {
                total_cost,
                purchases,
            })
        })
    }
}

//! Admin cascading deletes.
//!
//! The schema does not declare ON DELETE CASCADE everywhere and the
//! user cascade branches on the attached role, so the ordering lives
//! here: dependents always go before parents, inside one transaction.

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Role, admins, cart_items, consumers, products, purchase_records,
    sellers, stock_entries, stores, users,
};

use super::{Engine, with_tx};

impl Engine {
    /// Delete a user, its role row, and everything the role owns.
    pub async fn delete_user(&self, user_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let user = users::Entity::find_by_id(user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            let role = self.role_of(&db_tx, &user).await?;

            match role {
                Role::Consumer(consumer) => {
                    purchase_records::Entity::delete_many()
                        .filter(purchase_records::Column::ConsumerId.eq(consumer.id))
                        .exec(&db_tx)
                        .await?;
                    cart_items::Entity::delete_many()
                        .filter(cart_items::Column::ConsumerId.eq(consumer.id))
                        .exec(&db_tx)
                        .await?;
                    consumers::Entity::delete_by_id(consumer.id)
                        .exec(&db_tx)
                        .await?;
                }
                Role::Seller(seller) => {
                    let seller_stores = stores::Entity::find()
                        .filter(stores::Column::SellerId.eq(seller.id))
                        .all(&db_tx)
                        .await?;
                    for store in seller_stores {
                        self.delete_store_rows(&db_tx, store.id).await?;
                    }
                    sellers::Entity::delete_by_id(seller.id)
                        .exec(&db_tx)
                        .await?;
                }
                Role::Admin(admin) => {
                    admins::Entity::delete_by_id(admin.id).exec(&db_tx).await?;
                }
            }

            users::Entity::delete_by_id(user_id).exec(&db_tx).await?;

            Ok(())
        })
    }

    /// Delete a product and every row referencing it.
    pub async fn delete_product(&self, product_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.delete_product_rows(&db_tx, product_id).await?;
            Ok(())
        })
    }

    /// Delete a store, its products, and every dependent row.
    pub async fn delete_store(&self, store_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.delete_store_rows(&db_tx, store_id).await?;
            Ok(())
        })
    }

    /// Product-by-product teardown of a store, then the leftover stock
    /// rows and the store itself.
    async fn delete_store_rows(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        store_id: i32,
    ) -> ResultEngine<()> {
        let store_products = products::Entity::find()
            .filter(products::Column::StoreId.eq(store_id))
            .all(db_tx)
            .await?;
        for product in store_products {
            self.delete_product_rows(db_tx, product.id).await?;
        }

        stock_entries::Entity::delete_many()
            .filter(stock_entries::Column::StoreId.eq(store_id))
            .exec(db_tx)
            .await?;
        stores::Entity::delete_by_id(store_id).exec(db_tx).await?;
        Ok(())
    }
}

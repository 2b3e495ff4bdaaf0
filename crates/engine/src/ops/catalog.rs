//! Read-only catalog browsing. No side effects.

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, products, sellers, stock_entries, stores};

use super::{Engine, with_tx};

/// A product with its current available quantity (0 when no stock row
/// exists).
#[derive(Clone, Debug)]
pub struct CatalogProduct {
    pub product: products::Model,
    pub available_quantity: i64,
}

/// A store together with the seller owning it.
#[derive(Clone, Debug)]
pub struct StoreWithSeller {
    pub store: stores::Model,
    pub seller: sellers::Model,
}

impl Engine {
    pub async fn all_products(&self) -> ResultEngine<Vec<CatalogProduct>> {
        let rows: Vec<(products::Model, Option<stock_entries::Model>)> = products::Entity::find()
            .find_also_related(stock_entries::Entity)
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(product, entry)| CatalogProduct {
                available_quantity: entry.map_or(0, |e| e.quantity),
                product,
            })
            .collect())
    }

    pub async fn product_by_id(&self, product_id: i32) -> ResultEngine<CatalogProduct> {
        let (product, entry) = products::Entity::find_by_id(product_id)
            .find_also_related(stock_entries::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))?;

        Ok(CatalogProduct {
            available_quantity: entry.map_or(0, |e| e.quantity),
            product,
        })
    }

    pub async fn all_stores(&self) -> ResultEngine<Vec<StoreWithSeller>> {
        let rows: Vec<(stores::Model, Option<sellers::Model>)> = stores::Entity::find()
            .find_also_related(sellers::Entity)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (store, seller) in rows {
            let seller = seller
                .ok_or_else(|| EngineError::KeyNotFound("seller not exists".to_string()))?;
            out.push(StoreWithSeller { store, seller });
        }
        Ok(out)
    }

    /// A store's catalog: every product with its available quantity.
    pub async fn store_products(
        &self,
        store_id: i32,
    ) -> ResultEngine<(StoreWithSeller, Vec<CatalogProduct>)> {
        with_tx!(self, |db_tx| {
            let store = stores::Entity::find_by_id(store_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))?;
            let seller = self.require_seller(&db_tx, store.seller_id).await?;

            let rows: Vec<(products::Model, Option<stock_entries::Model>)> =
                products::Entity::find()
                    .filter(products::Column::StoreId.eq(store_id))
                    .find_also_related(stock_entries::Entity)
                    .all(&db_tx)
                    .await?;

            let catalog = rows
                .into_iter()
                .map(|(product, entry)| CatalogProduct {
                    available_quantity: entry.map_or(0, |e| e.quantity),
                    product,
                })
                .collect();

            Ok((StoreWithSeller { store, seller }, catalog))
        })
    }
}

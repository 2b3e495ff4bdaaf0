//! Cart items: a consumer's reserved, not-yet-purchased quantity.
//!
//! One row per (consumer, product) pair. The quantity is stock already
//! pulled out of `stock_entries`, so purchase does not touch stock.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub consumer_id: i32,
    pub product_id: i32,
    /// At least 1; a line with nothing reserved is deleted instead.
    pub quantity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::consumers::Entity",
        from = "Column::ConsumerId",
        to = "super::consumers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Consumer,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Product,
}

impl Related<super::consumers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consumer.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub use error::EngineError;
pub use ops::{
    CartLine, CartSnapshot, CatalogProduct, Engine, EngineBuilder, PurchaseOutcome, StockLine,
    StoreOverview, StoreWithSeller,
};
pub use users::{AuthUser, Role, RoleKind};

pub mod admins;
pub mod cart_items;
pub mod consumers;
mod error;
mod ops;
pub mod products;
pub mod purchase_records;
pub mod sellers;
pub mod stock_entries;
pub mod stores;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;

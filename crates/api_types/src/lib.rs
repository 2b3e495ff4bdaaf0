use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a user, chosen once at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Consumer,
    Seller,
    Admin,
}

/// Plain acknowledgement for delete endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub login: String,
        pub password: String,
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub login: String,
        pub password: String,
    }

    /// Public view of a user; never carries the password hash.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub login: String,
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub message: String,
        pub token: String,
        pub user: UserView,
    }
}

pub mod consumer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Deposit {
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub message: String,
        pub balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AddToCart {
        pub product_id: i32,
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UpdateCartQuantity {
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartItemView {
        pub id: i32,
        pub product_id: i32,
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartItemResponse {
        pub message: String,
        pub cart_item: CartItemView,
    }

    /// A cart line joined with the product and its store.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartLineView {
        pub id: i32,
        pub product_id: i32,
        pub product_title: String,
        pub price: i64,
        pub quantity: i64,
        pub store_id: i32,
        pub store_title: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartResponse {
        pub cart_items: Vec<CartLineView>,
        pub balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RemoveFromCartResponse {
        pub message: String,
        pub returned_quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseView {
        pub id: i32,
        pub product_id: i32,
        pub quantity: i64,
        pub purchase_date: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseResponse {
        pub message: String,
        pub total_cost: i64,
        pub purchases: Vec<PurchaseView>,
    }
}

pub mod seller {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreateStore {
        pub title: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StoreView {
        pub id: i32,
        pub title: String,
        pub seller_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreResponse {
        pub message: String,
        pub store: StoreView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreateProduct {
        pub title: String,
        pub price: i64,
        /// Initial stock; omitted or zero leaves the product unstocked.
        pub quantity: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UpdateProduct {
        pub title: Option<String>,
        pub price: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductView {
        pub id: i32,
        pub title: String,
        pub price: i64,
        pub store_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductResponse {
        pub message: String,
        pub product: ProductView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncreaseQuantity {
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StockEntryView {
        pub id: i32,
        pub store_id: i32,
        pub product_id: i32,
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StockResponse {
        pub message: String,
        pub store_product: StockEntryView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Withdraw {
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub message: String,
        pub balance: i64,
    }

    /// One stocked product in the seller's overview.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockLineView {
        pub product: ProductView,
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreProductsResponse {
        pub store: StoreView,
        pub products: Vec<StockLineView>,
    }
}

pub mod catalog {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CatalogProductView {
        pub id: i32,
        pub title: String,
        pub price: i64,
        pub store_id: i32,
        /// 0 when the store has no stock row for this product.
        pub available_quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductsResponse {
        pub products: Vec<CatalogProductView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StoreWithSellerView {
        pub id: i32,
        pub title: String,
        pub seller_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoresResponse {
        pub stores: Vec<StoreWithSellerView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreProductsResponse {
        pub store: StoreWithSellerView,
        pub products: Vec<CatalogProductView>,
    }
}

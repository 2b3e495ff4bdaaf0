//! The module contains the error the engine can throw.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Insufficient funds")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("Insufficient quantity in store")]
    InsufficientStock { available: i64 },
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::EmptyCart, Self::EmptyCart) => true,
            (
                Self::InsufficientFunds {
                    required: r1,
                    available: a1,
                },
                Self::InsufficientFunds {
                    required: r2,
                    available: a2,
                },
            ) => r1 == r2 && a1 == a2,
            (
                Self::InsufficientStock { available: a1 },
                Self::InsufficientStock { available: a2 },
            ) => a1 == a2,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

//! Users table.
//!
//! A user is the authentication identity. Exactly one role row
//! (consumer, seller or admin) is attached at registration time.

use sea_orm::entity::prelude::*;

use crate::{admins, consumers, sellers};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub login: String,
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::consumers::Entity")]
    Consumer,
    #[sea_orm(has_one = "super::sellers::Entity")]
    Seller,
    #[sea_orm(has_one = "super::admins::Entity")]
    Admin,
}

impl Related<super::consumers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consumer.def()
    }
}

impl Related<super::sellers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::admins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Which role a user registers as. Fixed for the lifetime of the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleKind {
    Consumer,
    Seller,
    Admin,
}

impl RoleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for RoleKind {
    type Error = crate::EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "consumer" => Ok(Self::Consumer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            other => Err(crate::EngineError::InvalidRole(other.to_string())),
        }
    }
}

/// The role row attached to a user.
///
/// Modeled as a tagged union so "exactly one role" is structural, not
/// three independent optional foreign keys.
#[derive(Clone, Debug, PartialEq)]
pub enum Role {
    Consumer(consumers::Model),
    Seller(sellers::Model),
    Admin(admins::Model),
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Consumer(_) => RoleKind::Consumer,
            Self::Seller(_) => RoleKind::Seller,
            Self::Admin(_) => RoleKind::Admin,
        }
    }
}

/// An authenticated user together with its role row.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub user: Model,
    pub role: Role,
}

impl AuthUser {
    /// Consumer id of the caller, or `Forbidden`.
    pub fn require_consumer(&self) -> Result<&consumers::Model, crate::EngineError> {
        match &self.role {
            Role::Consumer(consumer) => Ok(consumer),
            _ => Err(crate::EngineError::Forbidden(
                "consumer role required".to_string(),
            )),
        }
    }

    /// Seller id of the caller, or `Forbidden`.
    pub fn require_seller(&self) -> Result<&sellers::Model, crate::EngineError> {
        match &self.role {
            Role::Seller(seller) => Ok(seller),
            _ => Err(crate::EngineError::Forbidden(
                "seller role required".to_string(),
            )),
        }
    }

    pub fn require_admin(&self) -> Result<&admins::Model, crate::EngineError> {
        match &self.role {
            Role::Admin(admin) => Ok(admin),
            _ => Err(crate::EngineError::Forbidden(
                "admin role required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_kind_round_trip() {
        for kind in [RoleKind::Consumer, RoleKind::Seller, RoleKind::Admin] {
            assert_eq!(RoleKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(RoleKind::try_from("superuser").is_err());
    }

    #[test]
    fn require_role_rejects_other_roles() {
        let auth = AuthUser {
            user: Model {
                id: 1,
                login: "bob".to_string(),
                password_hash: "x".to_string(),
            },
            role: Role::Consumer(consumers::Model {
                id: 7,
                user_id: 1,
                money: 0,
            }),
        };

        assert_eq!(auth.require_consumer().unwrap().id, 7);
        assert!(auth.require_seller().is_err());
        assert!(auth.require_admin().is_err());
    }
}

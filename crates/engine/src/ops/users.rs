//! Registration and authenticated-user lookup.

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    AuthUser, EngineError, ResultEngine, Role, RoleKind, admins, consumers, sellers, users,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a user and its single role row.
    ///
    /// The caller passes an already-hashed password; the engine never
    /// sees plaintext credentials.
    pub async fn register_user(
        &self,
        login: &str,
        password_hash: &str,
        role: RoleKind,
    ) -> ResultEngine<AuthUser> {
        let login = login.trim();
        if login.is_empty() {
            return Err(EngineError::InvalidAmount(
                "login must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Login.eq(login))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(login.to_string()));
            }

            let user = users::ActiveModel {
                login: ActiveValue::Set(login.to_string()),
                password_hash: ActiveValue::Set(password_hash.to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let role = match role {
                RoleKind::Consumer => {
                    let consumer = consumers::ActiveModel {
                        user_id: ActiveValue::Set(user.id),
                        money: ActiveValue::Set(0),
                        ..Default::default()
                    }
                    .insert(&db_tx)
                    .await?;
                    Role::Consumer(consumer)
                }
                RoleKind::Seller => {
                    let seller = sellers::ActiveModel {
                        user_id: ActiveValue::Set(user.id),
                        money: ActiveValue::Set(0),
                        ..Default::default()
                    }
                    .insert(&db_tx)
                    .await?;
                    Role::Seller(seller)
                }
                RoleKind::Admin => {
                    let admin = admins::ActiveModel {
                        user_id: ActiveValue::Set(user.id),
                        ..Default::default()
                    }
                    .insert(&db_tx)
                    .await?;
                    Role::Admin(admin)
                }
            };

            Ok(AuthUser { user, role })
        })
    }

    /// User row by login, for credential verification. `None` and a
    /// hash mismatch must be reported identically by the caller.
    pub async fn user_by_login(&self, login: &str) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Login.eq(login))
            .one(&self.database)
            .await
            .map_err(Into::into)
    }

    /// Load a user with its role union attached.
    pub async fn auth_user(&self, user_id: i32) -> ResultEngine<AuthUser> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        let role = self.role_of(&self.database, &user).await?;
        Ok(AuthUser { user, role })
    }

    pub(super) async fn role_of<C: ConnectionTrait>(
        &self,
        db: &C,
        user: &users::Model,
    ) -> ResultEngine<Role> {
        if let Some(consumer) = consumers::Entity::find()
            .filter(consumers::Column::UserId.eq(user.id))
            .one(db)
            .await?
        {
            return Ok(Role::Consumer(consumer));
        }
        if let Some(seller) = sellers::Entity::find()
            .filter(sellers::Column::UserId.eq(user.id))
            .one(db)
            .await?
        {
            return Ok(Role::Seller(seller));
        }
        if let Some(admin) = admins::Entity::find()
            .filter(admins::Column::UserId.eq(user.id))
            .one(db)
            .await?
        {
            return Ok(Role::Admin(admin));
        }
        Err(EngineError::KeyNotFound(
            "user has no role attached".to_string(),
        ))
    }
}

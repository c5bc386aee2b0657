use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, categories, credit_cards, investments, users};

use super::Engine;

/// Generates `find_*_owned` and `require_*` methods for a user-owned entity.
///
/// Every lookup filters on `user_id`: a row owned by someone else is
/// indistinguishable from a missing row.
macro_rules! impl_owned_lookup {
    ($find_fn:ident, $require_fn:ident, $entity:path, $user_col:expr, $model:ty, $err_msg:literal) => {
        pub(super) async fn $find_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<Option<$model>> {
            <$entity>::find_by_id(id.to_string())
                .filter($user_col.eq(user_id.to_string()))
                .one(db)
                .await
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<$model> {
            self.$find_fn(db, id, user_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        find_account_owned,
        require_account,
        accounts::Entity,
        accounts::Column::UserId,
        accounts::Model,
        "account not exists"
    );

    impl_owned_lookup!(
        find_category_owned,
        require_category,
        categories::Entity,
        categories::Column::UserId,
        categories::Model,
        "category not exists"
    );

    impl_owned_lookup!(
        find_credit_card_owned,
        require_credit_card,
        credit_cards::Entity,
        credit_cards::Column::UserId,
        credit_cards::Model,
        "credit card not exists"
    );

    impl_owned_lookup!(
        find_investment_owned,
        require_investment,
        investments::Entity,
        investments::Column::UserId,
        investments::Model,
        "investment not exists"
    );

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }
}

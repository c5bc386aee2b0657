use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Account, EngineError, ResultEngine, accounts};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Add a new account for a user.
    pub async fn new_account(
        &self,
        name: &str,
        user_id: &str,
        balance_minor: i64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "account")?;
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let duplicate = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id.to_string()))
                .filter(accounts::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if duplicate.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let account = Account::new(name, user_id.to_string(), balance_minor);
            let account_id = account.id;
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account_id)
        })
    }

    /// Return an account owned by the user.
    pub async fn account(&self, account_id: Uuid, user_id: &str) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, account_id, user_id).await?;
            Account::try_from(model)
        })
    }

    /// List the user's accounts, sorted by name.
    pub async fn accounts(&self, user_id: &str) -> ResultEngine<Vec<Account>> {
        let models: Vec<accounts::Model> = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(accounts::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Account::try_from).collect()
    }
}

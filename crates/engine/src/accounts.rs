//! Account primitives.
//!
//! An `Account` holds a denormalized balance in integer minor units. The
//! balance is only ever mutated by the transaction write ops; callers never
//! patch it directly.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    /// Balance at creation time, kept so the ledger can be replayed.
    pub initial_balance_minor: i64,
    pub balance_minor: i64,
}

impl Account {
    pub fn new(name: String, user_id: String, balance_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            initial_balance_minor: balance_minor,
            balance_minor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub initial_balance_minor: i64,
    pub balance_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            user_id: ActiveValue::Set(account.user_id.clone()),
            name: ActiveValue::Set(account.name.clone()),
            initial_balance_minor: ActiveValue::Set(account.initial_balance_minor),
            balance_minor: ActiveValue::Set(account.balance_minor),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid account id".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            initial_balance_minor: model.initial_balance_minor,
            balance_minor: model.balance_minor,
        })
    }
}

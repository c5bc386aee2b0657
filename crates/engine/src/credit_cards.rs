//! Credit card entity.
//!
//! `used_minor` tracks the amount charged so far. Credit-card expenses charge
//! the card instead of debiting an account.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub used_minor: i64,
}

impl CreditCard {
    pub fn new(name: String, user_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            used_minor: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "credit_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub used_minor: i64,
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

impl From<&CreditCard> for ActiveModel {
    fn from(card: &CreditCard) -> Self {
        Self {
            id: ActiveValue::Set(card.id.to_string()),
            user_id: ActiveValue::Set(card.user_id.clone()),
            name: ActiveValue::Set(card.name.clone()),
            used_minor: ActiveValue::Set(card.used_minor),
        }
    }
}

impl TryFrom<Model> for CreditCard {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid credit card id".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            used_minor: model.used_minor,
        })
    }
}

//! Attachment entity, owned by a transaction.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub file_name: String,
}

impl Attachment {
    pub fn new(transaction_id: Uuid, file_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            file_name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub transaction_id: String,
    pub file_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id"
    )]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Attachment> for ActiveModel {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: ActiveValue::Set(attachment.id.to_string()),
            transaction_id: ActiveValue::Set(attachment.transaction_id.to_string()),
            file_name: ActiveValue::Set(attachment.file_name.clone()),
        }
    }
}

impl TryFrom<Model> for Attachment {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid attachment id".to_string()))?,
            transaction_id: Uuid::parse_str(&model.transaction_id)
                .map_err(|_| EngineError::InvalidId("invalid transaction id".to_string()))?,
            file_name: model.file_name,
        })
    }
}

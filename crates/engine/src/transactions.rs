//! Transaction primitives.
//!
//! A `Transaction` is an atomic event that moves money against exactly one of
//! three targets: an account, a credit card (expense charged to the card), or
//! an investment valuation (plus the funding account).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Attachment, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Investment,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Investment => "investment",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "investment" => Ok(Self::Investment),
            other => Err(EngineError::InvalidKind(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    /// Non-negative; the kind defines the sign of the balance effect.
    pub amount_minor: i64,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub investment_id: Option<Uuid>,
    pub note: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: String,
        kind: TransactionKind,
        occurred_at: DateTime<Utc>,
        amount_minor: i64,
        account_id: Uuid,
        category_id: Option<Uuid>,
        credit_card_id: Option<Uuid>,
        investment_id: Option<Uuid>,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        if amount_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be >= 0".to_string(),
            ));
        }
        if credit_card_id.is_some() && kind != TransactionKind::Expense {
            return Err(EngineError::InvalidKind(
                "credit_card_id requires an expense transaction".to_string(),
            ));
        }
        if investment_id.is_some() && kind != TransactionKind::Investment {
            return Err(EngineError::InvalidKind(
                "investment_id requires an investment transaction".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            occurred_at,
            amount_minor,
            account_id,
            category_id,
            credit_card_id,
            investment_id,
            note,
            attachments: Vec::new(),
        })
    }

    /// True when the expense is charged to a credit card instead of the
    /// account.
    #[must_use]
    pub fn is_card_charge(&self) -> bool {
        self.kind == TransactionKind::Expense && self.credit_card_id.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub occurred_at: DateTimeUtc,
    pub amount_minor: i64,
    pub account_id: String,
    pub category_id: Option<String>,
    pub credit_card_id: Option<String>,
    pub investment_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attachments::Entity")]
    Attachments,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::credit_cards::Entity",
        from = "Column::CreditCardId",
        to = "super::credit_cards::Column::Id"
    )]
    CreditCards,
    #[sea_orm(
        belongs_to = "super::investments::Entity",
        from = "Column::InvestmentId",
        to = "super::investments::Column::Id"
    )]
    Investments,
}

impl Related<super::attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::credit_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditCards.def()
    }
}

impl Related<super::investments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            account_id: ActiveValue::Set(tx.account_id.to_string()),
            category_id: ActiveValue::Set(tx.category_id.map(|id| id.to_string())),
            credit_card_id: ActiveValue::Set(tx.credit_card_id.map(|id| id.to_string())),
            investment_id: ActiveValue::Set(tx.investment_id.map(|id| id.to_string())),
            note: ActiveValue::Set(tx.note.clone()),
        }
    }
}

fn parse_optional_id(value: Option<String>, label: &str) -> ResultEngine<Option<Uuid>> {
    value
        .map(|s| {
            Uuid::parse_str(&s).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
        })
        .transpose()
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            occurred_at: model.occurred_at,
            amount_minor: model.amount_minor,
            account_id: Uuid::parse_str(&model.account_id)
                .map_err(|_| EngineError::InvalidId("invalid account id".to_string()))?,
            category_id: parse_optional_id(model.category_id, "category")?,
            credit_card_id: parse_optional_id(model.credit_card_id, "credit card")?,
            investment_id: parse_optional_id(model.investment_id, "investment")?,
            note: model.note,
            attachments: Vec::new(),
        })
    }
}

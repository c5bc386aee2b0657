//! Command structs for engine write operations.
//!
//! These types group parameters for the transaction write ops, keeping call
//! sites readable and avoiding long argument lists. They are the typed,
//! already-normalized input to the atomic unit: dates are `DateTime<Utc>`,
//! references are `Uuid`s.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::TransactionKind;

/// Create a transaction.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub account_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub investment_id: Option<Uuid>,
    pub note: Option<String>,
    /// File names to attach to the new transaction.
    pub attachments: Vec<String>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount_minor: i64,
        account_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            amount_minor,
            account_id,
            occurred_at,
            category_id: None,
            credit_card_id: None,
            investment_id: None,
            note: None,
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn credit_card_id(mut self, credit_card_id: Uuid) -> Self {
        self.credit_card_id = Some(credit_card_id);
        self
    }

    #[must_use]
    pub fn investment_id(mut self, investment_id: Uuid) -> Self {
        self.investment_id = Some(investment_id);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn attachment(mut self, file_name: impl Into<String>) -> Self {
        self.attachments.push(file_name.into());
        self
    }
}

/// Update an existing transaction. `None` fields keep the stored value.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub transaction_id: Uuid,
    pub user_id: String,

    pub kind: Option<TransactionKind>,
    pub amount_minor: Option<i64>,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub investment_id: Option<Uuid>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(transaction_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            transaction_id,
            user_id: user_id.into(),
            kind: None,
            amount_minor: None,
            account_id: None,
            category_id: None,
            credit_card_id: None,
            investment_id: None,
            occurred_at: None,
            note: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn credit_card_id(mut self, credit_card_id: Uuid) -> Self {
        self.credit_card_id = Some(credit_card_id);
        self
    }

    #[must_use]
    pub fn investment_id(mut self, investment_id: Uuid) -> Self {
        self.investment_id = Some(investment_id);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

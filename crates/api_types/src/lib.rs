use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        /// Opening balance in minor units; defaults to 0.
        pub balance_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountCreated {
        pub id: Uuid,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
    }
}

pub mod credit_card {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditCardNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditCardView {
        pub id: Uuid,
        pub name: String,
        pub used_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditCardCreated {
        pub id: Uuid,
    }
}

pub mod investment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentNew {
        pub name: String,
        /// Free-form label ("stocks", "crypto", ...) used by statistics.
        pub kind: Option<String>,
        pub initial_value_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentView {
        pub id: Uuid,
        pub name: String,
        pub kind: Option<String>,
        pub initial_value_minor: i64,
        pub current_value_minor: i64,
        pub absolute_return_minor: i64,
        pub percentage_return: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentCreated {
        pub id: Uuid,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
        Investment,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        /// Non-negative amount in minor units; the kind defines the sign.
        pub amount_minor: i64,
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub credit_card_id: Option<Uuid>,
        pub investment_id: Option<Uuid>,
        pub note: Option<String>,
        /// File names to attach.
        pub attachments: Option<Vec<String>>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: Option<TransactionKind>,
        pub amount_minor: Option<i64>,
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub credit_card_id: Option<Uuid>,
        pub investment_id: Option<Uuid>,
        pub note: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttachmentView {
        pub id: Uuid,
        pub file_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
        pub amount_minor: i64,
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub credit_card_id: Option<Uuid>,
        pub investment_id: Option<Uuid>,
        pub note: Option<String>,
        pub attachments: Vec<AttachmentView>,
    }

    #[derive(Debug, Deserialize, Serialize, Default)]
    pub struct TransactionListQuery {
        pub from: Option<DateTime<FixedOffset>>,
        pub to: Option<DateTime<FixedOffset>>,
        pub kind: Option<TransactionKind>,
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub credit_card_id: Option<Uuid>,
        pub investment_id: Option<Uuid>,
        /// 1-based page number; defaults to 1.
        pub page: Option<u64>,
        /// Page size; defaults to 10.
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub total: u64,
        pub page: u64,
        pub limit: u64,
        pub pages: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDeleted {
        pub success: bool,
    }
}

pub mod stats {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum StatsPeriod {
        Day,
        Week,
        #[default]
        Month,
        Year,
    }

    #[derive(Debug, Deserialize, Serialize, Default)]
    pub struct StatsQuery {
        pub period: Option<StatsPeriod>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsOverview {
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub total_investment_minor: i64,
        pub balance_minor: i64,
        pub period: StatsPeriod,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryBreakdown {
        pub category: String,
        pub amount_minor: i64,
        pub percentage: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyPoint {
        /// Calendar day (UTC), `YYYY-MM-DD`.
        pub date: NaiveDate,
        pub income_minor: i64,
        pub expense_minor: i64,
        pub investment_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub overview: StatsOverview,
        pub expenses_by_category: Vec<CategoryBreakdown>,
        pub income_by_category: Vec<CategoryBreakdown>,
        pub investments_by_kind: Vec<CategoryBreakdown>,
        pub chart_data: Vec<DailyPoint>,
    }
}

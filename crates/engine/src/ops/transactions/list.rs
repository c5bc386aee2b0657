use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{
    Attachment, EngineError, ResultEngine, Transaction, TransactionKind, attachments, transactions,
};

use super::super::{Engine, with_tx};

/// Filters for listing a user's transactions.
///
/// `from`/`to` are inclusive, in UTC. `page` starts at 1; `limit` defaults
/// to 10.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, acts as an allow-list of kinds to return.
    pub kinds: Option<Vec<TransactionKind>>,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub investment_id: Option<Uuid>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// One page of transactions plus the pagination bookkeeping.
#[derive(Clone, Debug)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::InvalidAmount(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    if filter.kinds.as_ref().is_some_and(|k| k.is_empty()) {
        return Err(EngineError::InvalidAmount(
            "kinds must not be empty".to_string(),
        ));
    }
    if filter.limit.is_some_and(|limit| limit == 0) {
        return Err(EngineError::InvalidAmount(
            "limit must be > 0".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::OccurredAt.lte(to));
        }
        if let Some(kinds) = &filter.kinds {
            let kinds: Vec<String> = kinds.iter().map(|k| k.as_str().to_string()).collect();
            self = self.filter(transactions::Column::Kind.is_in(kinds));
        }
        if let Some(account_id) = filter.account_id {
            self = self.filter(transactions::Column::AccountId.eq(account_id.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id.to_string()));
        }
        if let Some(credit_card_id) = filter.credit_card_id {
            self = self.filter(transactions::Column::CreditCardId.eq(credit_card_id.to_string()));
        }
        if let Some(investment_id) = filter.investment_id {
            self = self.filter(transactions::Column::InvestmentId.eq(investment_id.to_string()));
        }
        self
    }
}

impl Engine {
    /// Lists a user's transactions, newest first, with offset pagination.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<TransactionPage> {
        validate_list_filter(filter)?;
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter.limit.unwrap_or(10);

        with_tx!(self, |db_tx| {
            let query = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .apply_tx_filters(filter);

            let total = query.clone().count(&db_tx).await?;

            let models: Vec<transactions::Model> = query
                .order_by_desc(transactions::Column::OccurredAt)
                .order_by_desc(transactions::Column::Id)
                .offset((page - 1) * limit)
                .limit(limit)
                .all(&db_tx)
                .await?;

            let transactions = self.populate_page(&db_tx, models).await?;

            Ok(TransactionPage {
                transactions,
                total,
                page,
                limit,
                pages: total.div_ceil(limit),
            })
        })
    }

    /// Lists the user's transactions that reference a given investment,
    /// newest first.
    pub async fn transactions_for_investment(
        &self,
        user_id: &str,
        investment_id: Uuid,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.require_investment(&db_tx, investment_id, user_id)
                .await?;

            let models: Vec<transactions::Model> = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .filter(transactions::Column::InvestmentId.eq(investment_id.to_string()))
                .order_by_desc(transactions::Column::OccurredAt)
                .order_by_desc(transactions::Column::Id)
                .all(&db_tx)
                .await?;

            self.populate_page(&db_tx, models).await
        })
    }

    /// Converts a page of models, loading all attachments in one query.
    async fn populate_page(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        models: Vec<transactions::Model>,
    ) -> ResultEngine<Vec<Transaction>> {
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let mut by_transaction: HashMap<String, Vec<Attachment>> = HashMap::new();
        if !ids.is_empty() {
            let attachment_models: Vec<attachments::Model> = attachments::Entity::find()
                .filter(attachments::Column::TransactionId.is_in(ids))
                .order_by_asc(attachments::Column::Id)
                .all(db_tx)
                .await?;
            for model in attachment_models {
                let attachment = Attachment::try_from(model)?;
                by_transaction
                    .entry(attachment.transaction_id.to_string())
                    .or_default()
                    .push(attachment);
            }
        }

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let mut tx = Transaction::try_from(model)?;
            tx.attachments = by_transaction.remove(&tx.id.to_string()).unwrap_or_default();
            out.push(tx);
        }
        Ok(out)
    }
}

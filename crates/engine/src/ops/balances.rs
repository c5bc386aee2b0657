use std::collections::HashMap;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Performance, ResultEngine, TransactionKind, accounts, credit_cards, investments,
    transactions,
};

use super::{Engine, with_tx};

/// Signed effect of a transaction on its account: income credits, expense and
/// investment debit.
pub(super) fn signed_account_delta(kind: TransactionKind, amount_minor: i64) -> i64 {
    match kind {
        TransactionKind::Income => amount_minor,
        TransactionKind::Expense | TransactionKind::Investment => -amount_minor,
    }
}

impl Engine {
    /// Applies `delta_minor` to an account balance.
    ///
    /// `err_msg` distinguishes the missing-account cases (original account vs
    /// target account) for the caller's error reporting.
    pub(super) async fn apply_account_delta(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
        user_id: &str,
        delta_minor: i64,
        err_msg: &str,
    ) -> ResultEngine<()> {
        let model = self
            .find_account_owned(db, account_id, user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(err_msg.to_string()))?;

        let account_model = accounts::ActiveModel {
            id: ActiveValue::Set(model.id),
            balance_minor: ActiveValue::Set(model.balance_minor + delta_minor),
            ..Default::default()
        };
        account_model.update(db).await?;
        Ok(())
    }

    /// Applies `delta_minor` to an investment valuation and recomputes its
    /// performance pair.
    ///
    /// Returns `false` when the investment does not exist (callers decide
    /// whether that is fatal).
    pub(super) async fn apply_investment_delta(
        &self,
        db: &DatabaseTransaction,
        investment_id: Uuid,
        user_id: &str,
        delta_minor: i64,
    ) -> ResultEngine<bool> {
        let Some(model) = self
            .find_investment_owned(db, investment_id, user_id)
            .await?
        else {
            return Ok(false);
        };

        let current_value_minor = model.current_value_minor + delta_minor;
        let performance = Performance::from_values(model.initial_value_minor, current_value_minor);
        let investment_model = investments::ActiveModel {
            id: ActiveValue::Set(model.id),
            current_value_minor: ActiveValue::Set(current_value_minor),
            absolute_return_minor: ActiveValue::Set(performance.absolute_return_minor),
            percentage_return: ActiveValue::Set(performance.percentage_return),
            ..Default::default()
        };
        investment_model.update(db).await?;
        Ok(true)
    }

    /// Applies `delta_minor` to a credit card's charged amount.
    pub(super) async fn apply_credit_card_delta(
        &self,
        db: &DatabaseTransaction,
        credit_card_id: Uuid,
        user_id: &str,
        delta_minor: i64,
    ) -> ResultEngine<()> {
        let model = self.require_credit_card(db, credit_card_id, user_id).await?;

        let card_model = credit_cards::ActiveModel {
            id: ActiveValue::Set(model.id),
            used_minor: ActiveValue::Set(model.used_minor + delta_minor),
            ..Default::default()
        };
        card_model.update(db).await?;
        Ok(())
    }

    /// Recomputes denormalized balances for a user's accounts, credit cards,
    /// and investments by replaying the transaction ledger in chronological
    /// order.
    ///
    /// Accounts restart from their `initial_balance_minor`, investments from
    /// `initial_value_minor`, cards from zero. A transaction referencing a
    /// vanished investment is logged and skipped, matching the write ops'
    /// "if found" semantics.
    pub async fn recompute_balances(&self, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let account_models: Vec<accounts::Model> = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;
            let investment_models: Vec<investments::Model> = investments::Entity::find()
                .filter(investments::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;
            let card_models: Vec<credit_cards::Model> = credit_cards::Entity::find()
                .filter(credit_cards::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;

            let mut account_balances: HashMap<String, i64> = account_models
                .iter()
                .map(|m| (m.id.clone(), m.initial_balance_minor))
                .collect();
            let mut investment_values: HashMap<String, (i64, i64)> = investment_models
                .iter()
                .map(|m| (m.id.clone(), (m.initial_value_minor, m.initial_value_minor)))
                .collect();
            let mut card_charges: HashMap<String, i64> =
                card_models.iter().map(|m| (m.id.clone(), 0)).collect();

            let tx_models: Vec<transactions::Model> = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(transactions::Column::OccurredAt)
                .order_by_asc(transactions::Column::Id)
                .all(&db_tx)
                .await?;

            for model in tx_models {
                let kind = TransactionKind::try_from(model.kind.as_str())?;

                if kind == TransactionKind::Expense
                    && let Some(card_id) = &model.credit_card_id
                {
                    let used = card_charges.get_mut(card_id).ok_or_else(|| {
                        EngineError::KeyNotFound("credit card not exists".to_string())
                    })?;
                    *used += model.amount_minor;
                    continue;
                }

                let balance = account_balances.get_mut(&model.account_id).ok_or_else(|| {
                    EngineError::KeyNotFound("account not exists".to_string())
                })?;
                *balance += signed_account_delta(kind, model.amount_minor);

                if kind == TransactionKind::Investment
                    && let Some(investment_id) = &model.investment_id
                {
                    match investment_values.get_mut(investment_id) {
                        Some((_, current)) => *current += model.amount_minor,
                        None => {
                            tracing::warn!(
                                transaction_id = %model.id,
                                investment_id = %investment_id,
                                "skipping transaction for missing investment"
                            );
                        }
                    }
                }
            }

            for (id, balance_minor) in account_balances {
                let account_model = accounts::ActiveModel {
                    id: ActiveValue::Set(id),
                    balance_minor: ActiveValue::Set(balance_minor),
                    ..Default::default()
                };
                account_model.update(&db_tx).await?;
            }

            for (id, (initial, current)) in investment_values {
                let performance = Performance::from_values(initial, current);
                let investment_model = investments::ActiveModel {
                    id: ActiveValue::Set(id),
                    current_value_minor: ActiveValue::Set(current),
                    absolute_return_minor: ActiveValue::Set(performance.absolute_return_minor),
                    percentage_return: ActiveValue::Set(performance.percentage_return),
                    ..Default::default()
                };
                investment_model.update(&db_tx).await?;
            }

            for (id, used_minor) in card_charges {
                let card_model = credit_cards::ActiveModel {
                    id: ActiveValue::Set(id),
                    used_minor: ActiveValue::Set(used_minor),
                    ..Default::default()
                };
                card_model.update(&db_tx).await?;
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::signed_account_delta;
    use crate::TransactionKind;

    #[test]
    fn income_credits_the_account() {
        assert_eq!(signed_account_delta(TransactionKind::Income, 250), 250);
    }

    #[test]
    fn expense_and_investment_debit_the_account() {
        assert_eq!(signed_account_delta(TransactionKind::Expense, 250), -250);
        assert_eq!(signed_account_delta(TransactionKind::Investment, 250), -250);
    }

    #[test]
    fn zero_amount_is_a_no_op() {
        assert_eq!(signed_account_delta(TransactionKind::Expense, 0), 0);
    }
}

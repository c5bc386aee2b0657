use sea_orm::{TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, Transaction, TransactionKind, transactions};

use super::super::super::{Engine, balances::signed_account_delta, with_tx};

impl Engine {
    /// Deletes a transaction, reversing its balance effect first.
    ///
    /// Card charges are refunded to the card; other transactions reverse the
    /// account effect, and investment transactions also reverse the valuation
    /// (when the investment still exists). Attachments go with the row via
    /// the FK cascade.
    ///
    /// Returns whether the store reported a deleted row.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            let tx = Transaction::try_from(model)?;

            match (tx.kind, tx.credit_card_id) {
                (TransactionKind::Expense, Some(card_id)) => {
                    self.apply_credit_card_delta(&db_tx, card_id, user_id, -tx.amount_minor)
                        .await?;
                }
                _ => {
                    if tx.kind == TransactionKind::Investment
                        && let Some(investment_id) = tx.investment_id
                    {
                        self.apply_investment_delta(
                            &db_tx,
                            investment_id,
                            user_id,
                            -tx.amount_minor,
                        )
                        .await?;
                    }

                    self.apply_account_delta(
                        &db_tx,
                        tx.account_id,
                        user_id,
                        -signed_account_delta(tx.kind, tx.amount_minor),
                        "account not exists",
                    )
                    .await?;
                }
            }

            let result = transactions::Entity::delete_by_id(tx.id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(result.rows_affected > 0)
        })
    }
}

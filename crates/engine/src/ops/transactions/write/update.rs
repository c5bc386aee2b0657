use sea_orm::{ActiveValue, DbErr, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, UpdateTransactionCmd, transactions,
};

use super::super::super::{Engine, balances::signed_account_delta, normalize_optional_text, with_tx};

impl Engine {
    /// Updates an existing transaction, reconciling balances when the patch
    /// changes the financial shape (amount, kind, account, or card).
    ///
    /// The original effect is fully reversed before the new effect is
    /// applied, so moving a transaction between accounts debits and credits
    /// both correctly. Patches touching only metadata (category, note, date)
    /// skip the balance writes entirely.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let original_model = self
                .require_transaction(&db_tx, cmd.transaction_id, &cmd.user_id)
                .await?;
            let original = Transaction::try_from(original_model)?;

            let new_kind = cmd.kind.unwrap_or(original.kind);
            let new_amount_minor = cmd.amount_minor.unwrap_or(original.amount_minor);
            if new_amount_minor < 0 {
                return Err(EngineError::InvalidAmount(
                    "amount_minor must be >= 0".to_string(),
                ));
            }
            let new_account_id = cmd.account_id.unwrap_or(original.account_id);

            if cmd.credit_card_id.is_some() && new_kind != TransactionKind::Expense {
                return Err(EngineError::InvalidKind(
                    "credit_card_id requires an expense transaction".to_string(),
                ));
            }
            if cmd.investment_id.is_some() && new_kind != TransactionKind::Investment {
                return Err(EngineError::InvalidKind(
                    "investment_id requires an investment transaction".to_string(),
                ));
            }

            // Inherited references are dropped when the kind moves away from
            // the shape that owns them.
            let new_credit_card_id = if new_kind == TransactionKind::Expense {
                cmd.credit_card_id.or(original.credit_card_id)
            } else {
                None
            };
            let new_investment_id = if new_kind == TransactionKind::Investment {
                cmd.investment_id.or(original.investment_id)
            } else {
                None
            };

            let new_category_id = cmd.category_id.or(original.category_id);
            if let Some(category_id) = cmd.category_id {
                self.require_category(&db_tx, category_id, &cmd.user_id)
                    .await?;
            }
            let new_occurred_at = cmd.occurred_at.unwrap_or(original.occurred_at);
            let new_note = match cmd.note.as_deref() {
                Some(note) => normalize_optional_text(Some(note)),
                None => original.note.clone(),
            };

            let needs_account_update = cmd.amount_minor.is_some_and(|a| a != original.amount_minor)
                || cmd.kind.is_some_and(|k| k != original.kind)
                || cmd.account_id.is_some_and(|a| a != original.account_id)
                || cmd
                    .credit_card_id
                    .is_some_and(|c| Some(c) != original.credit_card_id);

            let needs_investment_update = original.kind == TransactionKind::Investment
                && (cmd.amount_minor.is_some_and(|a| a != original.amount_minor)
                    || (cmd.investment_id.is_some()
                        && original.investment_id.is_some()
                        && cmd.investment_id != original.investment_id));

            if needs_account_update {
                // Reverse the original effect on its original target.
                match (original.kind, original.credit_card_id) {
                    (TransactionKind::Expense, Some(card_id)) => {
                        self.apply_credit_card_delta(
                            &db_tx,
                            card_id,
                            &cmd.user_id,
                            -original.amount_minor,
                        )
                        .await?;
                    }
                    _ => {
                        self.apply_account_delta(
                            &db_tx,
                            original.account_id,
                            &cmd.user_id,
                            -signed_account_delta(original.kind, original.amount_minor),
                            "original account not exists",
                        )
                        .await?;
                    }
                }

                // Apply the new effect on the (possibly different) target.
                match (new_kind, new_credit_card_id) {
                    (TransactionKind::Expense, Some(card_id)) => {
                        self.apply_credit_card_delta(&db_tx, card_id, &cmd.user_id, new_amount_minor)
                            .await?;
                    }
                    _ => {
                        self.apply_account_delta(
                            &db_tx,
                            new_account_id,
                            &cmd.user_id,
                            signed_account_delta(new_kind, new_amount_minor),
                            "target account not exists",
                        )
                        .await?;
                    }
                }
            }

            if needs_investment_update {
                if let Some(original_investment_id) = original.investment_id {
                    // Reversed only if the investment still exists.
                    self.apply_investment_delta(
                        &db_tx,
                        original_investment_id,
                        &cmd.user_id,
                        -original.amount_minor,
                    )
                    .await?;
                }

                if let Some(target_investment_id) = cmd.investment_id.or(original.investment_id) {
                    self.apply_investment_delta(
                        &db_tx,
                        target_investment_id,
                        &cmd.user_id,
                        new_amount_minor,
                    )
                    .await?;
                }
            }

            let tx_active = transactions::ActiveModel {
                id: ActiveValue::Set(cmd.transaction_id.to_string()),
                kind: ActiveValue::Set(new_kind.as_str().to_string()),
                occurred_at: ActiveValue::Set(new_occurred_at),
                amount_minor: ActiveValue::Set(new_amount_minor),
                account_id: ActiveValue::Set(new_account_id.to_string()),
                category_id: ActiveValue::Set(new_category_id.map(|id| id.to_string())),
                credit_card_id: ActiveValue::Set(new_credit_card_id.map(|id| id.to_string())),
                investment_id: ActiveValue::Set(new_investment_id.map(|id| id.to_string())),
                note: ActiveValue::Set(new_note),
                ..Default::default()
            };
            let updated_model = match tx_active.update(&db_tx).await {
                Ok(model) => model,
                Err(DbErr::RecordNotUpdated) => {
                    return Err(EngineError::UpdateFailed(
                        "failed to update transaction".to_string(),
                    ));
                }
                Err(err) => return Err(err.into()),
            };

            self.populate_attachments(&db_tx, updated_model).await
        })
    }
}

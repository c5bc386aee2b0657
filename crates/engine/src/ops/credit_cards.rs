use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{CreditCard, EngineError, ResultEngine, credit_cards};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Add a new credit card for a user.
    pub async fn new_credit_card(&self, name: &str, user_id: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "credit card")?;
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let duplicate = credit_cards::Entity::find()
                .filter(credit_cards::Column::UserId.eq(user_id.to_string()))
                .filter(credit_cards::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if duplicate.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let card = CreditCard::new(name, user_id.to_string());
            let card_id = card.id;
            credit_cards::ActiveModel::from(&card).insert(&db_tx).await?;
            Ok(card_id)
        })
    }

    /// Return a credit card owned by the user.
    pub async fn credit_card(&self, card_id: Uuid, user_id: &str) -> ResultEngine<CreditCard> {
        with_tx!(self, |db_tx| {
            let model = self.require_credit_card(&db_tx, card_id, user_id).await?;
            CreditCard::try_from(model)
        })
    }

    /// List the user's credit cards, sorted by name.
    pub async fn credit_cards(&self, user_id: &str) -> ResultEngine<Vec<CreditCard>> {
        let models: Vec<credit_cards::Model> = credit_cards::Entity::find()
            .filter(credit_cards::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(credit_cards::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(CreditCard::try_from).collect()
    }
}

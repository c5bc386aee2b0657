use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Investment, ResultEngine, investments};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Add a new investment for a user. The valuation starts at
    /// `initial_value_minor`.
    pub async fn new_investment(
        &self,
        name: &str,
        user_id: &str,
        kind: Option<&str>,
        initial_value_minor: i64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "investment")?;
        let kind = normalize_optional_text(kind);
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let duplicate = investments::Entity::find()
                .filter(investments::Column::UserId.eq(user_id.to_string()))
                .filter(investments::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if duplicate.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let investment =
                Investment::new(name, user_id.to_string(), kind, initial_value_minor)?;
            let investment_id = investment.id;
            investments::ActiveModel::from(&investment)
                .insert(&db_tx)
                .await?;
            Ok(investment_id)
        })
    }

    /// Return an investment owned by the user.
    pub async fn investment(&self, investment_id: Uuid, user_id: &str) -> ResultEngine<Investment> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_investment(&db_tx, investment_id, user_id)
                .await?;
            Investment::try_from(model)
        })
    }

    /// List the user's investments, sorted by name.
    pub async fn investments(&self, user_id: &str) -> ResultEngine<Vec<Investment>> {
        let models: Vec<investments::Model> = investments::Entity::find()
            .filter(investments::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(investments::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Investment::try_from).collect()
    }
}

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine, categories};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Add a new category for a user.
    pub async fn new_category(&self, name: &str, user_id: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let duplicate = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .filter(categories::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if duplicate.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let category = Category::new(name, user_id.to_string());
            let category_id = category.id;
            categories::ActiveModel::from(&category).insert(&db_tx).await?;
            Ok(category_id)
        })
    }

    /// List the user's categories, sorted by name.
    pub async fn categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let models: Vec<categories::Model> = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Category::try_from).collect()
    }
}

//! Investment primitives.
//!
//! An `Investment` carries a valuation (`current_value_minor`) and a derived
//! [`Performance`] pair. The pair is never stored independently: every
//! valuation change recomputes it from `initial_value_minor` and
//! `current_value_minor`.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Derived return figures for an investment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub absolute_return_minor: i64,
    pub percentage_return: f64,
}

impl Performance {
    /// Recomputes the pair from the invariant:
    /// `absolute = current - initial`, `percentage = absolute / initial * 100`
    /// (0 when `initial` is 0).
    #[must_use]
    pub fn from_values(initial_value_minor: i64, current_value_minor: i64) -> Self {
        let absolute_return_minor = current_value_minor - initial_value_minor;
        let percentage_return = if initial_value_minor > 0 {
            absolute_return_minor as f64 / initial_value_minor as f64 * 100.0
        } else {
            0.0
        };
        Self {
            absolute_return_minor,
            percentage_return,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    /// Free-form label ("stocks", "crypto", ...) used by the statistics
    /// breakdown.
    pub kind: Option<String>,
    pub initial_value_minor: i64,
    pub current_value_minor: i64,
    pub performance: Performance,
}

impl Investment {
    pub fn new(
        name: String,
        user_id: String,
        kind: Option<String>,
        initial_value_minor: i64,
    ) -> ResultEngine<Self> {
        if initial_value_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "initial_value_minor must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            kind,
            initial_value_minor,
            current_value_minor: initial_value_minor,
            performance: Performance::from_values(initial_value_minor, initial_value_minor),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: Option<String>,
    pub initial_value_minor: i64,
    pub current_value_minor: i64,
    pub absolute_return_minor: i64,
    #[sea_orm(column_type = "Double")]
    pub percentage_return: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Investment> for ActiveModel {
    fn from(investment: &Investment) -> Self {
        Self {
            id: ActiveValue::Set(investment.id.to_string()),
            user_id: ActiveValue::Set(investment.user_id.clone()),
            name: ActiveValue::Set(investment.name.clone()),
            kind: ActiveValue::Set(investment.kind.clone()),
            initial_value_minor: ActiveValue::Set(investment.initial_value_minor),
            current_value_minor: ActiveValue::Set(investment.current_value_minor),
            absolute_return_minor: ActiveValue::Set(investment.performance.absolute_return_minor),
            percentage_return: ActiveValue::Set(investment.performance.percentage_return),
        }
    }
}

impl TryFrom<Model> for Investment {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid investment id".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            kind: model.kind,
            initial_value_minor: model.initial_value_minor,
            current_value_minor: model.current_value_minor,
            performance: Performance {
                absolute_return_minor: model.absolute_return_minor,
                percentage_return: model.percentage_return,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Performance;

    #[test]
    fn performance_recomputes_from_values() {
        let perf = Performance::from_values(1000, 1150);
        assert_eq!(perf.absolute_return_minor, 150);
        assert!((perf.percentage_return - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn performance_with_zero_initial_is_zero_percent() {
        let perf = Performance::from_values(0, 500);
        assert_eq!(perf.absolute_return_minor, 500);
        assert_eq!(perf.percentage_return, 0.0);
    }

    #[test]
    fn performance_negative_return() {
        let perf = Performance::from_values(1000, 900);
        assert_eq!(perf.absolute_return_minor, -100);
        assert!((perf.percentage_return + 10.0).abs() < f64::EPSILON);
    }
}

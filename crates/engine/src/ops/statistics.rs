use std::collections::HashMap;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use sea_orm::{QueryFilter, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, TransactionKind, categories, investments, transactions,
};

use super::Engine;

const UNCATEGORIZED_LABEL: &str = "Uncategorized";
const OTHER_INVESTMENT_LABEL: &str = "Other";

/// Aggregation window, counted back from "now".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsPeriod {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl StatsPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Window start: one day/week back by duration, one month/year back
    /// calendar-aware.
    fn start_from(self, now: DateTime<Utc>) -> ResultEngine<DateTime<Utc>> {
        let start = match self {
            Self::Day => now.checked_sub_signed(Duration::days(1)),
            Self::Week => now.checked_sub_signed(Duration::days(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::Year => now.checked_sub_months(Months::new(12)),
        };
        start.ok_or_else(|| EngineError::InvalidAmount("invalid statistics window".to_string()))
    }
}

impl TryFrom<&str> for StatsPeriod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(EngineError::InvalidKind(format!(
                "invalid statistics period: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsOverview {
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
    pub total_investment_minor: i64,
    /// `income - expenses - investment` over the window.
    pub balance_minor: i64,
    pub period: StatsPeriod,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub amount_minor: i64,
    /// Share of the kind's total, 0 when the total is 0.
    pub percentage: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub income_minor: i64,
    pub expense_minor: i64,
    pub investment_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionStats {
    pub overview: StatsOverview,
    pub expenses_by_category: Vec<CategoryBreakdown>,
    pub income_by_category: Vec<CategoryBreakdown>,
    pub investments_by_kind: Vec<CategoryBreakdown>,
    pub chart_data: Vec<DailyPoint>,
}

fn breakdowns(
    sums: HashMap<String, i64>,
    total_minor: i64,
    top: Option<usize>,
) -> Vec<CategoryBreakdown> {
    let mut out: Vec<CategoryBreakdown> = sums
        .into_iter()
        .map(|(category, amount_minor)| CategoryBreakdown {
            category,
            amount_minor,
            percentage: if total_minor > 0 {
                amount_minor as f64 / total_minor as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    out.sort_by(|a, b| {
        b.amount_minor
            .cmp(&a.amount_minor)
            .then_with(|| a.category.cmp(&b.category))
    });
    if let Some(top) = top {
        out.truncate(top);
    }
    out
}

impl Engine {
    /// Aggregates a user's transactions over `[now - period, now]`.
    ///
    /// Read-only: totals per kind, per-category income/expense sums,
    /// per-kind investment sums, and a zero-filled daily series covering
    /// every calendar day of the window. Records that cannot be bucketed are
    /// logged and skipped rather than failing the whole aggregation.
    pub async fn transaction_statistics(
        &self,
        user_id: &str,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> ResultEngine<TransactionStats> {
        let start = period.start_from(now)?;

        let tx_models: Vec<transactions::Model> = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::OccurredAt.gte(start))
            .filter(transactions::Column::OccurredAt.lte(now))
            .all(&self.database)
            .await?;

        let category_names: HashMap<String, String> = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();
        let investment_kinds: HashMap<String, Option<String>> = investments::Entity::find()
            .filter(investments::Column::UserId.eq(user_id.to_string()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|m| (m.id, m.kind))
            .collect();

        let mut total_income_minor = 0i64;
        let mut total_expenses_minor = 0i64;
        let mut total_investment_minor = 0i64;
        let mut income_by_category: HashMap<String, i64> = HashMap::new();
        let mut expenses_by_category: HashMap<String, i64> = HashMap::new();
        let mut investments_by_kind: HashMap<String, i64> = HashMap::new();

        // Pre-populate every calendar day of the window with zeroed buckets.
        let mut by_day: HashMap<NaiveDate, (i64, i64, i64)> = HashMap::new();
        let last_day = now.date_naive();
        let mut day = start.date_naive();
        while day <= last_day {
            by_day.insert(day, (0, 0, 0));
            day = day.succ_opt().ok_or_else(|| {
                EngineError::InvalidAmount("invalid statistics window".to_string())
            })?;
        }

        for model in &tx_models {
            let kind = match TransactionKind::try_from(model.kind.as_str()) {
                Ok(kind) => kind,
                Err(err) => {
                    tracing::warn!(transaction_id = %model.id, %err, "skipping unreadable transaction");
                    continue;
                }
            };
            let amount_minor = model.amount_minor;

            let category_label = || {
                model
                    .category_id
                    .as_ref()
                    .and_then(|id| category_names.get(id))
                    .cloned()
                    .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string())
            };

            match kind {
                TransactionKind::Income => {
                    total_income_minor += amount_minor;
                    *income_by_category.entry(category_label()).or_insert(0) += amount_minor;
                }
                TransactionKind::Expense => {
                    total_expenses_minor += amount_minor;
                    *expenses_by_category.entry(category_label()).or_insert(0) += amount_minor;
                }
                TransactionKind::Investment => {
                    total_investment_minor += amount_minor;
                    let label = model
                        .investment_id
                        .as_ref()
                        .and_then(|id| investment_kinds.get(id))
                        .and_then(|kind| kind.clone())
                        .or_else(|| {
                            model
                                .category_id
                                .as_ref()
                                .and_then(|id| category_names.get(id))
                                .cloned()
                        })
                        .unwrap_or_else(|| OTHER_INVESTMENT_LABEL.to_string());
                    *investments_by_kind.entry(label).or_insert(0) += amount_minor;
                }
            }

            match by_day.get_mut(&model.occurred_at.date_naive()) {
                Some((income, expense, investment)) => match kind {
                    TransactionKind::Income => *income += amount_minor,
                    TransactionKind::Expense => *expense += amount_minor,
                    TransactionKind::Investment => *investment += amount_minor,
                },
                None => {
                    tracing::warn!(
                        transaction_id = %model.id,
                        occurred_at = %model.occurred_at,
                        "skipping transaction outside the daily series"
                    );
                }
            }
        }

        let balance_minor = total_income_minor - total_expenses_minor - total_investment_minor;

        let mut chart_data: Vec<DailyPoint> = by_day
            .into_iter()
            .map(|(date, (income_minor, expense_minor, investment_minor))| DailyPoint {
                date,
                income_minor,
                expense_minor,
                investment_minor,
            })
            .collect();
        chart_data.sort_by_key(|point| point.date);

        Ok(TransactionStats {
            overview: StatsOverview {
                total_income_minor,
                total_expenses_minor,
                total_investment_minor,
                balance_minor,
                period,
            },
            expenses_by_category: breakdowns(expenses_by_category, total_expenses_minor, Some(5)),
            income_by_category: breakdowns(income_by_category, total_income_minor, Some(5)),
            investments_by_kind: breakdowns(investments_by_kind, total_investment_minor, None),
            chart_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::breakdowns;

    #[test]
    fn breakdowns_sort_desc_and_truncate() {
        let mut sums = HashMap::new();
        for (name, amount) in [("a", 10), ("b", 50), ("c", 30), ("d", 5), ("e", 40), ("f", 20)] {
            sums.insert(name.to_string(), amount);
        }
        let out = breakdowns(sums, 155, Some(5));
        assert_eq!(out.len(), 5);
        let names: Vec<&str> = out.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(names, vec!["b", "e", "c", "f", "a"]);
    }

    #[test]
    fn breakdowns_percentage_of_total() {
        let mut sums = HashMap::new();
        sums.insert("food".to_string(), 25);
        sums.insert("rent".to_string(), 75);
        let out = breakdowns(sums, 100, None);
        assert_eq!(out[0].category, "rent");
        assert!((out[0].percentage - 75.0).abs() < f64::EPSILON);
        assert!((out[1].percentage - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn breakdowns_zero_total_means_zero_percent() {
        let mut sums = HashMap::new();
        sums.insert("food".to_string(), 0);
        let out = breakdowns(sums, 0, Some(5));
        assert_eq!(out[0].percentage, 0.0);
    }
}

//! Statistics API endpoints

use api_types::stats::{
    CategoryBreakdown, DailyPoint, StatsOverview, StatsPeriod as ApiPeriod, StatsQuery, Statistic,
};
use axum::{Extension, Json, extract::Query, extract::State};
use chrono::Utc;

use crate::{ServerError, server::ServerState, user};

fn map_period(period: ApiPeriod) -> engine::StatsPeriod {
    match period {
        ApiPeriod::Day => engine::StatsPeriod::Day,
        ApiPeriod::Week => engine::StatsPeriod::Week,
        ApiPeriod::Month => engine::StatsPeriod::Month,
        ApiPeriod::Year => engine::StatsPeriod::Year,
    }
}

fn map_engine_period(period: engine::StatsPeriod) -> ApiPeriod {
    match period {
        engine::StatsPeriod::Day => ApiPeriod::Day,
        engine::StatsPeriod::Week => ApiPeriod::Week,
        engine::StatsPeriod::Month => ApiPeriod::Month,
        engine::StatsPeriod::Year => ApiPeriod::Year,
    }
}

fn map_breakdowns(breakdowns: Vec<engine::CategoryBreakdown>) -> Vec<CategoryBreakdown> {
    breakdowns
        .into_iter()
        .map(|b| CategoryBreakdown {
            category: b.category,
            amount_minor: b.amount_minor,
            percentage: b.percentage,
        })
        .collect()
}

/// Handle requests for user transaction statistics
pub async fn get_stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Statistic>, ServerError> {
    let period = map_period(query.period.unwrap_or_default());

    let stats = state
        .engine
        .transaction_statistics(&user.username, period, Utc::now())
        .await?;

    Ok(Json(Statistic {
        overview: StatsOverview {
            total_income_minor: stats.overview.total_income_minor,
            total_expenses_minor: stats.overview.total_expenses_minor,
            total_investment_minor: stats.overview.total_investment_minor,
            balance_minor: stats.overview.balance_minor,
            period: map_engine_period(stats.overview.period),
        },
        expenses_by_category: map_breakdowns(stats.expenses_by_category),
        income_by_category: map_breakdowns(stats.income_by_category),
        investments_by_kind: map_breakdowns(stats.investments_by_kind),
        chart_data: stats
            .chart_data
            .into_iter()
            .map(|point| DailyPoint {
                date: point.date,
                income_minor: point.income_minor,
                expense_minor: point.expense_minor,
                investment_minor: point.investment_minor,
            })
            .collect(),
    }))
}

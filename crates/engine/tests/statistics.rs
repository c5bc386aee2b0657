use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{CreateTransactionCmd, Engine, StatsPeriod, TransactionKind};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn weekly_series_is_zero_filled_and_sorted() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 10000).await.unwrap();
    let investment_id = engine
        .new_investment("Index fund", "alice", Some("stocks"), 1000)
        .await
        .unwrap();
    let now = Utc::now();

    // Transactions on three different days of the window.
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            1000,
            account_id,
            now - Duration::days(6),
        ))
        .await
        .unwrap();
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            account_id,
            now - Duration::days(4),
        ))
        .await
        .unwrap();
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Investment,
                150,
                account_id,
                now,
            )
            .investment_id(investment_id),
        )
        .await
        .unwrap();

    let stats = engine
        .transaction_statistics("alice", StatsPeriod::Week, now)
        .await
        .unwrap();

    // 7 days back, both endpoints' calendar days included.
    assert_eq!(stats.chart_data.len(), 8);
    assert!(
        stats
            .chart_data
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date)
    );

    let income_day = (now - Duration::days(6)).date_naive();
    let expense_day = (now - Duration::days(4)).date_naive();
    let investment_day = now.date_naive();
    for point in &stats.chart_data {
        let expected = (
            if point.date == income_day { 1000 } else { 0 },
            if point.date == expense_day { 200 } else { 0 },
            if point.date == investment_day { 150 } else { 0 },
        );
        assert_eq!(
            (point.income_minor, point.expense_minor, point.investment_minor),
            expected,
            "unexpected bucket on {}",
            point.date
        );
    }

    assert_eq!(stats.overview.total_income_minor, 1000);
    assert_eq!(stats.overview.total_expenses_minor, 200);
    assert_eq!(stats.overview.total_investment_minor, 150);
    assert_eq!(stats.overview.balance_minor, 650);
    assert_eq!(stats.overview.period, StatsPeriod::Week);
}

#[tokio::test]
async fn category_breakdowns_use_labels_and_percentages() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 10000).await.unwrap();
    let food = engine.new_category("Food", "alice").await.unwrap();
    let rent = engine.new_category("Rent", "alice").await.unwrap();
    let now = Utc::now();

    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Expense,
                250,
                account_id,
                now,
            )
            .category_id(food),
        )
        .await
        .unwrap();
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Expense,
                750,
                account_id,
                now,
            )
            .category_id(rent),
        )
        .await
        .unwrap();
    // No category: grouped under the fixed label.
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            500,
            account_id,
            now,
        ))
        .await
        .unwrap();

    let stats = engine
        .transaction_statistics("alice", StatsPeriod::Month, now)
        .await
        .unwrap();

    assert_eq!(stats.expenses_by_category.len(), 2);
    assert_eq!(stats.expenses_by_category[0].category, "Rent");
    assert_eq!(stats.expenses_by_category[0].amount_minor, 750);
    assert!((stats.expenses_by_category[0].percentage - 75.0).abs() < f64::EPSILON);
    assert_eq!(stats.expenses_by_category[1].category, "Food");
    assert!((stats.expenses_by_category[1].percentage - 25.0).abs() < f64::EPSILON);

    assert_eq!(stats.income_by_category.len(), 1);
    assert_eq!(stats.income_by_category[0].category, "Uncategorized");
    assert!((stats.income_by_category[0].percentage - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn expense_categories_are_capped_at_five() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 100000).await.unwrap();
    let now = Utc::now();

    for (name, amount) in [
        ("A", 100),
        ("B", 600),
        ("C", 300),
        ("D", 400),
        ("E", 500),
        ("F", 200),
    ] {
        let category_id = engine.new_category(name, "alice").await.unwrap();
        engine
            .create_transaction(
                CreateTransactionCmd::new(
                    "alice",
                    TransactionKind::Expense,
                    amount,
                    account_id,
                    now,
                )
                .category_id(category_id),
            )
            .await
            .unwrap();
    }

    let stats = engine
        .transaction_statistics("alice", StatsPeriod::Month, now)
        .await
        .unwrap();

    assert_eq!(stats.expenses_by_category.len(), 5);
    let names: Vec<&str> = stats
        .expenses_by_category
        .iter()
        .map(|b| b.category.as_str())
        .collect();
    assert_eq!(names, vec!["B", "E", "D", "C", "F"]);
}

#[tokio::test]
async fn investment_breakdown_label_fallbacks() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 100000).await.unwrap();
    let stocks = engine
        .new_investment("Index fund", "alice", Some("stocks"), 1000)
        .await
        .unwrap();
    let unlabeled = engine
        .new_investment("Mystery", "alice", None, 1000)
        .await
        .unwrap();
    let retirement = engine.new_category("Retirement", "alice").await.unwrap();
    let now = Utc::now();

    // Investment kind label wins.
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Investment,
                100,
                account_id,
                now,
            )
            .investment_id(stocks),
        )
        .await
        .unwrap();
    // No investment kind: falls back to the category name.
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Investment,
                200,
                account_id,
                now,
            )
            .investment_id(unlabeled)
            .category_id(retirement),
        )
        .await
        .unwrap();
    // Neither: the fixed label.
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Investment,
            300,
            account_id,
            now,
        ))
        .await
        .unwrap();

    let stats = engine
        .transaction_statistics("alice", StatsPeriod::Month, now)
        .await
        .unwrap();

    let labels: Vec<&str> = stats
        .investments_by_kind
        .iter()
        .map(|b| b.category.as_str())
        .collect();
    assert_eq!(labels, vec!["Other", "Retirement", "stocks"]);
    assert_eq!(stats.investments_by_kind[0].amount_minor, 300);
    assert_eq!(stats.investments_by_kind[1].amount_minor, 200);
    assert_eq!(stats.investments_by_kind[2].amount_minor, 100);
}

#[tokio::test]
async fn window_excludes_old_and_foreign_transactions() {
    let (engine, _db) = engine_with_db().await;
    let alice_account = engine.new_account("Checking", "alice", 10000).await.unwrap();
    let bob_account = engine.new_account("Checking", "bob", 10000).await.unwrap();
    let now = Utc::now();

    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            100,
            alice_account,
            now,
        ))
        .await
        .unwrap();
    // Outside the month window.
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            999,
            alice_account,
            now - Duration::days(60),
        ))
        .await
        .unwrap();
    // Someone else's money.
    engine
        .create_transaction(CreateTransactionCmd::new(
            "bob",
            TransactionKind::Expense,
            500,
            bob_account,
            now,
        ))
        .await
        .unwrap();

    let stats = engine
        .transaction_statistics("alice", StatsPeriod::Month, now)
        .await
        .unwrap();

    assert_eq!(stats.overview.total_expenses_minor, 100);
    assert_eq!(stats.overview.balance_minor, -100);
}

#[tokio::test]
async fn empty_window_has_zero_totals_and_full_series() {
    let (engine, _db) = engine_with_db().await;
    let now = Utc::now();

    let stats = engine
        .transaction_statistics("alice", StatsPeriod::Day, now)
        .await
        .unwrap();

    assert_eq!(stats.overview.total_income_minor, 0);
    assert_eq!(stats.overview.total_expenses_minor, 0);
    assert_eq!(stats.overview.total_investment_minor, 0);
    assert_eq!(stats.overview.balance_minor, 0);
    assert!(stats.expenses_by_category.is_empty());
    assert!(stats.income_by_category.is_empty());
    assert!(stats.investments_by_kind.is_empty());
    assert_eq!(stats.chart_data.len(), 2);
    assert!(
        stats
            .chart_data
            .iter()
            .all(|p| p.income_minor == 0 && p.expense_minor == 0 && p.investment_minor == 0)
    );
}

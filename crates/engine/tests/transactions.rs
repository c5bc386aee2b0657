use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{CreateTransactionCmd, Engine, EngineError, TransactionKind, UpdateTransactionCmd};
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

async fn balance_of(engine: &Engine, account_id: Uuid) -> i64 {
    engine.account(account_id, "alice").await.unwrap().balance_minor
}

#[tokio::test]
async fn expense_update_delete_round_trip_restores_balance() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id).await, 800);

    engine
        .update_transaction(UpdateTransactionCmd::new(tx.id, "alice").amount_minor(300))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id).await, 700);

    let success = engine.delete_transaction(tx.id, "alice").await.unwrap();
    assert!(success);
    assert_eq!(balance_of(&engine, account_id).await, 1000);
}

#[tokio::test]
async fn income_credits_the_account() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 0).await.unwrap();

    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            1500,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap();

    assert_eq!(balance_of(&engine, account_id).await, 1500);
}

#[tokio::test]
async fn investment_transaction_moves_account_and_valuation() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 500).await.unwrap();
    let investment_id = engine
        .new_investment("Index fund", "alice", Some("stocks"), 1000)
        .await
        .unwrap();

    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Investment,
                150,
                account_id,
                Utc::now(),
            )
            .investment_id(investment_id),
        )
        .await
        .unwrap();

    assert_eq!(balance_of(&engine, account_id).await, 350);

    let investment = engine.investment(investment_id, "alice").await.unwrap();
    assert_eq!(investment.current_value_minor, 1150);
    assert_eq!(investment.performance.absolute_return_minor, 150);
    assert!((investment.performance.percentage_return - 15.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn delete_then_recreate_restores_state_exactly() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 500).await.unwrap();
    let investment_id = engine
        .new_investment("Index fund", "alice", Some("stocks"), 1000)
        .await
        .unwrap();

    let cmd = CreateTransactionCmd::new(
        "alice",
        TransactionKind::Investment,
        150,
        account_id,
        Utc::now(),
    )
    .investment_id(investment_id);

    let tx = engine.create_transaction(cmd.clone()).await.unwrap();
    let balance_before = balance_of(&engine, account_id).await;
    let investment_before = engine.investment(investment_id, "alice").await.unwrap();

    engine.delete_transaction(tx.id, "alice").await.unwrap();
    assert_eq!(balance_of(&engine, account_id).await, 500);
    let reverted = engine.investment(investment_id, "alice").await.unwrap();
    assert_eq!(reverted.current_value_minor, 1000);

    engine.create_transaction(cmd).await.unwrap();
    assert_eq!(balance_of(&engine, account_id).await, balance_before);
    let investment_after = engine.investment(investment_id, "alice").await.unwrap();
    assert_eq!(
        investment_after.current_value_minor,
        investment_before.current_value_minor
    );
    assert_eq!(investment_after.performance, investment_before.performance);
}

#[tokio::test]
async fn update_moves_transaction_between_accounts() {
    let (engine, _db) = engine_with_db().await;
    let checking = engine.new_account("Checking", "alice", 1000).await.unwrap();
    let savings = engine.new_account("Savings", "alice", 1000).await.unwrap();

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            checking,
            Utc::now(),
        ))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, checking).await, 800);

    engine
        .update_transaction(UpdateTransactionCmd::new(tx.id, "alice").account_id(savings))
        .await
        .unwrap();

    assert_eq!(balance_of(&engine, checking).await, 1000);
    assert_eq!(balance_of(&engine, savings).await, 800);
}

#[tokio::test]
async fn update_kind_flips_the_sign() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id).await, 800);

    engine
        .update_transaction(UpdateTransactionCmd::new(tx.id, "alice").kind(TransactionKind::Income))
        .await
        .unwrap();

    assert_eq!(balance_of(&engine, account_id).await, 1200);
}

#[tokio::test]
async fn metadata_only_update_skips_balance_writes() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();
    let category_id = engine.new_category("Groceries", "alice").await.unwrap();

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            UpdateTransactionCmd::new(tx.id, "alice")
                .category_id(category_id)
                .note("weekly groceries"),
        )
        .await
        .unwrap();

    assert_eq!(updated.category_id, Some(category_id));
    assert_eq!(updated.note.as_deref(), Some("weekly groceries"));
    assert_eq!(balance_of(&engine, account_id).await, 800);
}

#[tokio::test]
async fn credit_card_expense_charges_card_not_account() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();
    let card_id = engine.new_credit_card("Visa", "alice").await.unwrap();

    let tx = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Expense,
                200,
                account_id,
                Utc::now(),
            )
            .credit_card_id(card_id),
        )
        .await
        .unwrap();

    assert_eq!(balance_of(&engine, account_id).await, 1000);
    let card = engine.credit_card(card_id, "alice").await.unwrap();
    assert_eq!(card.used_minor, 200);

    engine
        .update_transaction(UpdateTransactionCmd::new(tx.id, "alice").amount_minor(350))
        .await
        .unwrap();
    let card = engine.credit_card(card_id, "alice").await.unwrap();
    assert_eq!(card.used_minor, 350);

    engine.delete_transaction(tx.id, "alice").await.unwrap();
    assert_eq!(balance_of(&engine, account_id).await, 1000);
    let card = engine.credit_card(card_id, "alice").await.unwrap();
    assert_eq!(card.used_minor, 0);
}

#[tokio::test]
async fn create_on_missing_account_rolls_back_the_transaction() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            Uuid::new_v4(),
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("account not exists".to_string()));

    let page = engine
        .list_transactions("alice", &engine::TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn create_with_missing_investment_rolls_back_the_account_debit() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 500).await.unwrap();

    let err = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Investment,
                150,
                account_id,
                Utc::now(),
            )
            .investment_id(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("investment not exists".to_string())
    );

    assert_eq!(balance_of(&engine, account_id).await, 500);
    let page = engine
        .list_transactions("alice", &engine::TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn update_to_missing_target_account_aborts_the_whole_unit() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap();

    let err = engine
        .update_transaction(UpdateTransactionCmd::new(tx.id, "alice").account_id(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("target account not exists".to_string())
    );

    // The reversal inside the failed unit must not be visible.
    assert_eq!(balance_of(&engine, account_id).await, 800);
}

#[tokio::test]
async fn delete_missing_transaction_fails() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .delete_transaction(Uuid::new_v4(), "alice")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("transaction not exists".to_string())
    );
}

#[tokio::test]
async fn transactions_are_scoped_to_their_owner() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap();

    let err = engine.transaction(tx.id, "bob").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("transaction not exists".to_string())
    );

    let err = engine.delete_transaction(tx.id, "bob").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("transaction not exists".to_string())
    );
}

#[tokio::test]
async fn attachment_removal_boundaries() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();

    let bare = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            50,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap();

    let err = engine
        .remove_attachment(bare.id, "alice", Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("transaction has no attachments".to_string())
    );

    let with_files = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::Expense,
                50,
                account_id,
                Utc::now(),
            )
            .attachment("receipt.pdf")
            .attachment("warranty.pdf"),
        )
        .await
        .unwrap();
    assert_eq!(with_files.attachments.len(), 2);

    let err = engine
        .remove_attachment(with_files.id, "alice", Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("attachment not exists".to_string())
    );

    let removed_id = with_files.attachments[0].id;
    let updated = engine
        .remove_attachment(with_files.id, "alice", removed_id)
        .await
        .unwrap();
    assert_eq!(updated.attachments.len(), 1);
    assert!(updated.attachments.iter().all(|a| a.id != removed_id));
}

#[tokio::test]
async fn list_transactions_paginates_and_filters() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();

    for (kind, amount) in [
        (TransactionKind::Income, 1000),
        (TransactionKind::Expense, 200),
        (TransactionKind::Expense, 300),
    ] {
        engine
            .create_transaction(CreateTransactionCmd::new(
                "alice",
                kind,
                amount,
                account_id,
                Utc::now(),
            ))
            .await
            .unwrap();
    }

    let filter = engine::TransactionListFilter {
        limit: Some(2),
        ..Default::default()
    };
    let page = engine.list_transactions("alice", &filter).await.unwrap();
    assert_eq!(page.transactions.len(), 2);
    assert_eq!(page.total, 3);
    assert_eq!(page.pages, 2);
    assert_eq!(page.page, 1);

    let filter = engine::TransactionListFilter {
        kinds: Some(vec![TransactionKind::Income]),
        ..Default::default()
    };
    let page = engine.list_transactions("alice", &filter).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.transactions[0].kind, TransactionKind::Income);

    let page = engine
        .list_transactions("bob", &engine::TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn transactions_for_investment_are_scoped() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 5000).await.unwrap();
    let fund = engine
        .new_investment("Index fund", "alice", Some("stocks"), 1000)
        .await
        .unwrap();
    let crypto = engine
        .new_investment("Crypto", "alice", Some("crypto"), 1000)
        .await
        .unwrap();

    for (investment_id, amount) in [(fund, 100), (fund, 200), (crypto, 300)] {
        engine
            .create_transaction(
                CreateTransactionCmd::new(
                    "alice",
                    TransactionKind::Investment,
                    amount,
                    account_id,
                    Utc::now(),
                )
                .investment_id(investment_id),
            )
            .await
            .unwrap();
    }

    let txs = engine
        .transactions_for_investment("alice", fund)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
    assert!(txs.iter().all(|tx| tx.investment_id == Some(fund)));

    let err = engine
        .transactions_for_investment("bob", fund)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("investment not exists".to_string())
    );
}

#[tokio::test]
async fn recompute_balances_repairs_corrupted_denormalized_state() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();
    let investment_id = engine
        .new_investment("Index fund", "alice", Some("stocks"), 1000)
        .await
        .unwrap();

    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            200,
            account_id,
            Utc::now(),
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
                Utc::now(),
            )
            .investment_id(investment_id),
        )
        .await
        .unwrap();

    // Corrupt denormalized values directly in DB.
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE accounts SET balance_minor = ? WHERE id = ?;",
        vec![999i64.into(), account_id.to_string().into()],
    ))
    .await
    .unwrap();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE investments SET current_value_minor = ?, absolute_return_minor = ?, percentage_return = ? WHERE id = ?;",
        vec![
            999i64.into(),
            0i64.into(),
            0f64.into(),
            investment_id.to_string().into(),
        ],
    ))
    .await
    .unwrap();

    engine.recompute_balances("alice").await.unwrap();

    assert_eq!(balance_of(&engine, account_id).await, 650);
    let investment = engine.investment(investment_id, "alice").await.unwrap();
    assert_eq!(investment.current_value_minor, 1150);
    assert_eq!(investment.performance.absolute_return_minor, 150);
    assert!((investment.performance.percentage_return - 15.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Checking", "alice", 1000).await.unwrap();

    let err = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            -10,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("amount_minor must be >= 0".to_string())
    );

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            10,
            account_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    let err = engine
        .update_transaction(UpdateTransactionCmd::new(tx.id, "alice").amount_minor(-5))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("amount_minor must be >= 0".to_string())
    );
}

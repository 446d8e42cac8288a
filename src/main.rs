use dotenvy::dotenv;
use recurring_expenses::{
    config,
    core::{
        RolloverEngine, Session, SystemClock, format_batch_summary, schedule::pending_occurrences,
        seed::seed_from_config,
    },
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::settings::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    let session = Session::authenticated(app_config.user_id.clone());

    // 4. Connect and make sure the schema exists
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed configured categories and recurring expenses
    seed_from_config(&db, &session, &app_config)
        .await
        .inspect_err(|e| error!("Failed to seed configuration: {}", e))?;

    // 6. Roll over everything that is due and allowed to auto-add
    let engine = RolloverEngine::new(db.clone(), db, SystemClock);
    let report = engine.process_due_expenses(&session).await?;
    info!("{}", format_batch_summary(&report));

    // 7. Point out due expenses that wait for manual confirmation
    for expense in engine.list_due(&session, false).await? {
        if expense.auto_add {
            continue;
        }
        let pending = pending_occurrences(expense.next_due, report.run_date, expense.frequency);
        warn!(
            "'{}' needs confirmation: {} occurrence(s) pending since {}",
            expense.name,
            pending,
            expense
                .next_due
                .map_or_else(String::new, |d| d.to_string())
        );
    }

    Ok(())
}

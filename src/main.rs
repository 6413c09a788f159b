use dotenvy::dotenv;
use goal_buddy::{
    config::{database, goals},
    core::{goal, report, rollover, time},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Initialize database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 4. Seed goals from config.toml (if present)
    if let Some(config) = goals::load_default_config()? {
        let created = goal::seed_goals(&db, &config.goals)
            .await
            .inspect_err(|e| error!("Failed to seed goals: {}", e))?;
        info!("Seeded {} goal(s) from configuration", created);
    }

    // 5. Move every goal onto its current interval
    let now = time::now();
    let rollover_result = rollover::process_interval_rollovers(&db, now).await?;
    if !rollover_result.rolled_goals.is_empty() {
        info!("{}", rollover::format_rollover_summary(&rollover_result));
    }

    // 6. Print the goal listing, then a report per goal
    let summaries = report::summarize_goals(&db, now).await?;
    if summaries.is_empty() {
        println!("No goals configured.");
        return Ok(());
    }
    println!("{}\n", report::format_goal_summaries(&summaries));
    for summary in &summaries {
        let goal_report = report::generate_goal_report(&db, summary.goal.id, now).await?;
        println!("{}\n", report::format_goal_report(&goal_report));
    }

    Ok(())
}

// bls-console/examples/console_demo.rs
// Headless console session against a running Gateway.
//
// Usage: BLS_GATEWAY_URL=http://localhost:8000 cargo run --example console_demo

use bls_console::{ChannelState, ConsoleSession, SubmitOutcome};
use bls_client::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bls_console=info,bls_client=info".into()),
        )
        .init();

    let gateway_url =
        std::env::var("BLS_GATEWAY_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

    tracing::info!("Connecting to Gateway at {gateway_url}");
    let mut session = ConsoleSession::init(GatewayConfig::new(&gateway_url)).await?;

    let rules = session.rules();
    println!("Locations:");
    for location in rules.locations() {
        println!("  {location}: {}", rules.categories_for(location).join(", "));
    }
    println!(
        "Applicants: {}, credentials: {}, bookings: {}",
        session.applicants().await.len(),
        session.credentials().await.len(),
        session.bookings().await.len(),
    );
    if let Some(status) = session.system_status().await {
        println!(
            "Automation running: {} (task: {})",
            status.is_running,
            status.current_task.as_deref().unwrap_or("-"),
        );
    }

    // Print notices as they arrive
    let mut notices = session.subscribe_notices();
    tokio::spawn(async move {
        while let Ok(notice) = notices.recv().await {
            println!("[{}] {}: {}", notice.level, notice.title, notice.message);
        }
    });

    // Log push channel transitions
    let mut channel_state = session.channel_state();
    tokio::spawn(async move {
        while channel_state.changed().await.is_ok() {
            let state = *channel_state.borrow();
            tracing::info!("push channel: {state:?}");
            if state == ChannelState::Connected {
                println!("Push channel connected, caches are live.");
            }
        }
    });

    // Walk a draft through validation. Nothing is submitted: an invalid
    // draft without an override never reaches the Gateway.
    let draft = session.new_draft()?;
    let verdict = draft.set_schengen_history("after_2020_6months").await;
    println!(
        "Draft {} / {}: {}",
        draft.draft().await.location,
        draft.draft().await.category,
        verdict.message,
    );
    match draft.submit(false).await? {
        SubmitOutcome::ConfirmationRequired(verdict) => {
            println!("Submission held for confirmation: {}", verdict.message);
            if let Some(recommended) = verdict.recommended_categories.first() {
                let verdict = draft.set_category(recommended.clone()).await?;
                println!("After switching category: {}", verdict.message);
            }
        }
        SubmitOutcome::Booked { booking_id } => {
            println!("Booked appointment {booking_id}");
        }
    }

    println!("Watching for push events, Ctrl-C to exit.");
    tokio::signal::ctrl_c().await?;

    session.teardown().await;
    Ok(())
}

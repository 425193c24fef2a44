use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use linkedin_pilot::action::commenter::LinkedInCommenter;
use linkedin_pilot::browser::{self, Driver};
use linkedin_pilot::config::{Config, Credentials};
use linkedin_pilot::engine::{FileCursorStore, TraversalEngine};
use linkedin_pilot::feed::linkedin::LinkedInFeed;
use linkedin_pilot::linkedin::session::Session;
use linkedin_pilot::llm::gemini::GeminiClient;

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("linkedin-pilot.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("linkedin_pilot=info")
        .with_writer(log_file)
        .init();

    let dry_run_flag = std::env::args().any(|arg| arg == "--dry-run");

    let mut config = Config::load_or_default(Path::new("config.toml"))?;
    if dry_run_flag {
        config.run.dry_run = true;
    }

    // Load saved credentials from .env (real env vars take precedence)
    Config::load_env_file();

    // --- Startup: collect credentials (env vars, .env, or interactive prompt) ---
    println!();
    println!("  LinkedIn Pilot v0.1.0");
    println!("  =====================");
    println!();
    println!("  Loading credentials (.env / env vars / interactive prompt):");
    println!();

    if config.run.dry_run {
        println!("  ** DRY RUN ** (comments are generated but never submitted)");
        println!();
    }

    let credentials = Config::linkedin_credentials()?;
    let api_key = Config::gemini_api_key()?;

    println!();
    println!("  All credentials loaded. Starting up...");
    println!();

    // --- Phase 1: Gemini preflight ---
    let gemini = GeminiClient::new(api_key, &config.gemini.model, config.gemini.timeout_secs)?;
    match gemini.preflight().await {
        Ok(()) => println!("  Gemini API OK ({})", config.gemini.model),
        Err(e) => {
            eprintln!("  Gemini API error: {:#}", e);
            std::process::exit(1);
        }
    }

    // --- Phase 2: Launch Chrome and log in ---
    let (mut chrome, cdp_events) = browser::launch(&config.browser).await?;
    let page = chrome.new_page("about:blank").await?;
    let driver = Driver::new(page, Duration::from_millis(config.browser.wait_timeout_ms));

    if let Err(e) = start_session(&driver, &credentials).await {
        eprintln!("  LinkedIn login failed: {:#}", e);
        let _ = chrome.close().await;
        let _ = cdp_events.await;
        std::process::exit(1);
    }
    println!("  Logged in. Feed loaded.");
    println!();

    // --- Phase 3: Traverse the feed ---
    let feed = LinkedInFeed::new(driver.clone());
    let commenter = LinkedInCommenter::new(
        driver.clone(),
        Box::new(gemini),
        config.run.settle_ms,
        config.run.dry_run,
    );
    let store = FileCursorStore::new(&config.run.cursor_file);

    let mut engine = TraversalEngine::new(
        Box::new(feed),
        Box::new(commenter),
        Box::new(store),
        &config.run,
    );
    let outcome = engine.run().await;

    // Tear the browser down before reporting, even when the run failed.
    let _ = chrome.close().await;
    let _ = chrome.wait().await;
    let _ = cdp_events.await;

    let acted = outcome?;
    println!();
    println!("  Done: commented on {} post(s).", acted);
    Ok(())
}

/// Log in and wait for the feed; failures here are unrecoverable.
async fn start_session(driver: &Driver, credentials: &Credentials) -> Result<()> {
    let session = Session::new(driver.clone());
    session.login(credentials).await?;
    session.await_feed().await
}

use std::io;
use std::time::Duration;

use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod ai;
mod app;
mod config;
mod error;
mod models;
mod pipeline;
mod services;
mod store;
mod tui;

use app::App;
use config::Config;
use error::Result;
use models::{Platform, RewriteStyle};
use pipeline::{Outcome, Pipeline};
use store::Store;
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    let store = if config.seed_samples {
        Store::new(config.app_config())
    } else {
        Store::empty(config.app_config())
    };
    let pipeline = Pipeline::simulated(store);

    // Headless collect: --collect <platform> [keyword]
    if args.len() >= 2 && args[1] == "--collect" {
        let platform: Platform = args
            .get(2)
            .ok_or_else(|| anyhow::anyhow!("Usage: content-ops --collect <platform> [keyword]"))?
            .parse()?;
        let keyword = args.get(3).map(String::as_str).unwrap_or("");
        return collect_headless(&pipeline, platform, keyword).await;
    }

    // Headless run of every pipeline stage, printing the final state
    if args.len() >= 2 && args[1] == "--lifecycle" {
        return lifecycle_headless(&pipeline).await;
    }

    let mut app = App::new(pipeline);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn collect_headless(pipeline: &Pipeline, platform: Platform, keyword: &str) -> Result<()> {
    let outcome = pipeline.collect(Some(platform), keyword).await;
    if let Some(note) = outcome_note("Collect", &outcome) {
        println!("{}", note);
    }
    let Some(articles) = outcome.completed() else {
        return Ok(());
    };

    for article in &articles {
        println!("[{}] {}", article.source, article.title);
    }
    match pipeline.import(articles) {
        Outcome::Completed(count) => println!("Imported {} articles from {}", count, platform),
        other => {
            if let Some(note) = outcome_note("Import", &other) {
                println!("{}", note);
            }
        }
    }
    Ok(())
}

/// Skip/failure line for a headless stage; `None` when it completed.
fn outcome_note<T>(stage: &str, outcome: &Outcome<T>) -> Option<String> {
    match outcome {
        Outcome::Completed(_) => None,
        Outcome::Skipped(reason) => Some(format!("{} skipped: {}", stage, reason)),
        Outcome::Failed(failure) => Some(format!("{} failed: {}", stage, failure.reason)),
    }
}

// stdout carries the JSON snapshot, so stage notes go to stderr
fn report<T>(stage: &str, outcome: &Outcome<T>) {
    if let Some(note) = outcome_note(stage, outcome) {
        eprintln!("{}", note);
    }
}

async fn lifecycle_headless(pipeline: &Pipeline) -> Result<()> {
    let collect = pipeline.collect(Some(Platform::Wechat), "").await;
    report("Collect", &collect);
    let collected = collect.completed().unwrap_or_default();
    let article_id = collected.first().map(|a| a.id.clone());
    report("Import", &pipeline.import(collected));

    let article_id = article_id.as_deref();
    let rewrite = pipeline.rewrite(article_id, RewriteStyle::General, None).await;
    report("Rewrite", &rewrite);
    if let Outcome::Completed(record) = &rewrite {
        report("Apply rewrite", &pipeline.apply_rewrite(record));
    }

    report("Illustrate", &pipeline.illustrate(article_id, None, None).await);

    let account_id = pipeline
        .store()
        .snapshot()
        .connected_accounts()
        .first()
        .map(|a| a.id.clone());
    report(
        "Publish",
        &pipeline.publish(article_id, account_id.as_deref()).await,
    );

    let snapshot = pipeline.store().snapshot();
    println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.refresh_state();

        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Poll for finished pipeline tasks
        app.poll_events();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) =
                        handle_key_event(key, app.input_active(), app.show_help, app.module())
                    {
                        if app.handle_action(action).await {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

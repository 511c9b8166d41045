use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use ticketbot_core::{Config, Latency, MockAssistant, Playground, TicketTag, TICKET_OPTIONS};
use tracing_subscriber::EnvFilter;

mod app;
mod clipboard;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, TICK_RATE};

const LOG_ENV: &str = "TICKETBOT_LOG";
// Target matching is by prefix, so this covers both crates
const DEFAULT_LOG_FILTER: &str = "ticketbot=info";

#[derive(Parser)]
#[command(name = "ticketbot")]
#[command(version, about = "Simulated AI ticket booking assistant (no real bookings are made)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal UI (default)
    Tui,
    /// Ask the assistant a single question
    Ask {
        /// Your message
        prompt: String,
        /// System instructions to send along with the prompt
        #[arg(short, long)]
        instructions: Option<String>,
        /// Ask for a verbose response
        #[arg(short, long)]
        verbose: bool,
        /// Reply immediately instead of simulating model latency
        #[arg(long)]
        no_delay: bool,
    },
    /// List the sample ticket options
    Tickets {
        /// Print the options as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the config file location and current settings
    Config {
        /// Write the default config if no file exists yet
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            init_file_logging()?;
            let config = load_config();
            run_tui(&config).await?
        }
        Commands::Ask {
            prompt,
            instructions,
            verbose,
            no_delay,
        } => {
            init_stderr_logging();
            let config = load_config();
            let latency = if no_delay { Latency::NONE } else { config.latency() };
            ask(&config, prompt, instructions, verbose, latency).await?
        }
        Commands::Tickets { json } => list_tickets(json)?,
        Commands::Config { init } => {
            init_stderr_logging();
            show_config(init)?
        }
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

fn log_path() -> Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .context("Could not determine data directory")?
        .join("ticketbot");
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir.join("ticketbot.log"))
}

/// The terminal belongs to the UI, so logs go to a file instead
fn init_file_logging() -> Result<()> {
    let path = log_path()?;
    let file = File::create(&path).with_context(|| format!("Failed to open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "using default config");
            Config::default()
        }
    }
}

async fn run_tui(config: &Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut app = App::new(config);
    let mut events = EventHandler::new(TICK_RATE);

    tracing::info!("starting ticketbot ui");

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!("ticketbot ui closed");
    result
}

/// One-shot run through the same path as the playground screen
async fn ask(config: &Config, prompt: String, instructions: Option<String>, verbose: bool, latency: Latency) -> Result<()> {
    let mut playground = Playground::new(&config.system_instructions);
    playground.prompt = prompt;
    if let Some(instructions) = instructions {
        playground.instructions = instructions;
    }
    playground.verbose = verbose || config.verbose;

    let request = playground.prepare()?;
    println!("{} {}", "You:".bold().cyan(), request.prompt);

    let assistant = MockAssistant::new(latency);
    let reply = assistant.reply(&request.prompt, Some(&request.instructions)).await?;

    println!("\n{}", "Assistant:".bold().yellow());
    println!("{}", reply);
    Ok(())
}

fn show_config(init: bool) -> Result<()> {
    let path = Config::config_path()?;

    if init && !path.exists() {
        Config::default().save()?;
        println!("{} {}", "Created".bold().green(), path.display());
    } else {
        println!("{} {}", "Config:".bold(), path.display());
    }

    let config = Config::load_from(&path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn list_tickets(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&TICKET_OPTIONS)?);
        return Ok(());
    }

    println!("{}", "🎫 Available Options".bold().blue());
    println!("{}", "=".repeat(60).dimmed());

    for ticket in TICKET_OPTIONS.iter() {
        let tags: Vec<String> = ticket
            .tags
            .iter()
            .map(|tag| match tag {
                TicketTag::Cheapest => tag.label().green().to_string(),
                TicketTag::Fastest => tag.label().yellow().to_string(),
                TicketTag::Recommended => tag.label().cyan().to_string(),
            })
            .collect();

        println!(
            "\n{} {} {}",
            ticket.provider.bold(),
            format!("({})", ticket.mode.display_name()).dimmed(),
            tags.join(" ")
        );
        println!(
            "   {} {} → {} {}  {}",
            ticket.origin,
            ticket.departure,
            ticket.destination,
            ticket.arrival,
            ticket.duration.dimmed()
        );
        println!(
            "   {}  ★ {:.1}",
            format!("₹{}", ticket.price).bold().green(),
            ticket.rating
        );
    }

    println!("\n{}", "=".repeat(60).dimmed());
    println!("{}", "Simulation Mode - No real bookings are made".yellow());
    Ok(())
}

mod config;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    parse_calendar_date, AppointmentViewModel, HttpAppointmentService, LoadOutcome,
    SessionContext,
};
use shared::{domain::ClientId, protocol::NewAppointment};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Day view of the appointment calendar")]
struct Cli {
    /// Config file; `calendar.toml` in the working directory is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the appointments for one day.
    Day {
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
        /// Days to move from the chosen date.
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },
    /// Book a new appointment (provider accounts only).
    Book {
        #[arg(long)]
        date: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        client_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(token) = cli.token {
        settings.api_token = Some(token);
    }

    let service = Arc::new(HttpAppointmentService::with_timeout(
        &settings.api_url,
        settings.api_token.clone(),
        settings.request_timeout(),
    )?);
    info!(api_url = %service.base_url(), "calendar: using backend");

    let session = SessionContext::resolve(service.as_ref()).await;
    let vm = AppointmentViewModel::with_system_clock(session, service.clone());

    let mounted = vm.mount().await;
    if let LoadOutcome::Failed(err) = &mounted.appointments {
        warn!(error = %err, "calendar: showing empty calendar");
    }

    match cli.command {
        Command::Day { date, offset } => {
            if let Some(date) = date {
                vm.select_str(&date).await?;
            }
            if offset != 0 {
                vm.step_days(offset).await;
            }
        }
        Command::Book {
            date,
            start,
            end,
            client_id,
        } => {
            vm.select_str(&date).await?;
            let handed_date = vm.start_create().await?;
            let created = vm
                .submit(NewAppointment {
                    client_id: ClientId(client_id),
                    date: parse_calendar_date(&handed_date)?,
                    start_time: start,
                    end_time: end,
                })
                .await;
            match created {
                Ok(created) => println!(
                    "Booked appointment {} on {} at {}",
                    created.id, created.date, created.start_time
                ),
                Err(err) => {
                    vm.cancel().await;
                    return Err(err.into());
                }
            }
        }
    }

    let selection = vm.selection().await;
    let view = vm.day_view().await;
    for line in render::render_day(&selection, &view) {
        println!("{line}");
    }
    Ok(())
}

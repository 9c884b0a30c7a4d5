use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clinic_app::{Doctor, Service};
use clinic_client::{
    views::{self, DeleteOutcome, DELETED_MESSAGE},
    BookingsClient, EditBookingForm, NewBookingForm, DEFAULT_API_URL,
};
use clinic_kernel::settings::TelemetrySettings;

/// Book and manage clinic appointments
#[derive(Debug, Parser)]
#[command(name = "clinic-cli", version)]
struct Cli {
    /// Base URL of the bookings API
    #[arg(long, global = true, env = "CLINIC_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every booking
    List,
    /// Show one booking
    Show { id: i64 },
    /// Book a new appointment
    Book(BookArgs),
    /// Replace the fields of an existing booking
    Edit(EditArgs),
    /// Delete a booking after confirmation
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct BookArgs {
    /// Appointment day, YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,
    /// Start time, HH:MM
    #[arg(long)]
    start: String,
    /// End time, HH:MM
    #[arg(long)]
    end: String,
    #[arg(long, default_value_t = Service::default())]
    service: Service,
    #[arg(long, default_value_t = Doctor::default())]
    doctor: Doctor,
    /// Use the list page's "add" wording
    #[arg(long)]
    add: bool,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: i64,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    service: Option<Service>,
    #[arg(long)]
    doctor: Option<Doctor>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let telemetry = TelemetrySettings {
        level: "warn".to_string(),
        ..TelemetrySettings::default()
    };
    clinic_telemetry::init(&telemetry).ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = BookingsClient::new(cli.api_url);

    match cli.command {
        Command::List => {
            let bookings = client.list().await.context("Failed to fetch bookings")?;
            if !bookings.is_empty() {
                println!("{}", views::render_list(&bookings));
            }
        }
        Command::Show { id } => {
            let booking = views::load_detail(&client, id).await?;
            println!("{}", views::render_detail(&booking));
        }
        Command::Book(args) => {
            let mut form = NewBookingForm {
                date: Some(args.date),
                service: args.service,
                doctor: args.doctor,
                start_time: args.start,
                end_time: args.end,
                is_add_form: args.add,
            };
            let now = chrono::Local::now().naive_local();
            println!("{}", form.submit(&client, now).await?);
        }
        Command::Edit(args) => {
            let booking = views::load_detail(&client, args.id).await?;
            let mut form = EditBookingForm::from_booking(&booking);
            if let Some(date) = args.date {
                form.date = date;
            }
            if let Some(start) = args.start {
                form.start_time = start;
            }
            if let Some(end) = args.end {
                form.end_time = end;
            }
            if let Some(service) = args.service {
                form.service = service.to_string();
            }
            if let Some(doctor) = args.doctor {
                form.doctor = doctor.to_string();
            }
            println!("{}", form.submit(&client).await?);
        }
        Command::Delete { id, yes } => {
            let outcome = views::delete_with_confirmation(&client, id, |prompt| {
                yes || confirm_on_stdin(prompt)
            })
            .await?;
            match outcome {
                DeleteOutcome::Deleted => println!("{DELETED_MESSAGE}"),
                DeleteOutcome::Cancelled => println!("Delete cancelled"),
            }
        }
    }

    Ok(())
}

/// Blocking yes/no prompt; anything but `y`/`yes` declines
fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

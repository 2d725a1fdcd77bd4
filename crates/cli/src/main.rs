use std::process::ExitCode;

use api_client::HttpGateway;
use clap::{Parser, Subcommand};
use clinic_core::config::{analytics_window_from_env_value, base_url_from_env_value};
use clinic_core::constants::{ANALYTICS_DAYS_ENV, BASE_URL_ENV};
use clinic_core::render::{AppointmentsPanel, DashboardPanel, ErrorBanner, PatientsPanel};
use clinic_core::views::risk_badge;
use clinic_core::{AnalyticsWindow, ClientConfig, ClinicResult, Controller, StatusAction};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic queue client")]
struct Cli {
    /// Gateway origin, overriding CLINIC_API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Patient roster
    Patients {
        #[command(subcommand)]
        command: PatientCommands,
    },
    /// Appointment queue
    Appointments {
        #[command(subcommand)]
        command: AppointmentCommands,
    },
    /// Summary cards and appointments per day
    Dashboard {
        /// Window in days: 7, 14 or 30
        #[arg(long)]
        days: Option<AnalyticsWindow>,
    },
}

#[derive(Subcommand)]
enum PatientCommands {
    /// List all patients
    List,
    /// Register a patient
    Create {
        /// Full name
        name: String,
    },
}

#[derive(Subcommand)]
enum AppointmentCommands {
    /// List all appointments with their actions
    List,
    /// Book an appointment
    Create {
        patient_id: u64,
        /// Local date-time, YYYY-MM-DDTHH:MM
        when: String,
    },
    /// Mark a scheduled appointment as arrived
    CheckIn { id: u64 },
    /// Close a checked-in appointment
    Complete { id: u64 },
    /// Cancel an open appointment
    Cancel { id: u64 },
    /// Estimate the no-show risk of an appointment
    Predict { id: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic=info".parse()?)
                .add_directive("clinic_core=info".parse()?)
                .add_directive("api_client=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let base_url = match cli.base_url {
        Some(url) => url,
        None => base_url_from_env_value(std::env::var(BASE_URL_ENV).ok())?,
    };
    let window = analytics_window_from_env_value(std::env::var(ANALYTICS_DAYS_ENV).ok())?;
    let cfg = ClientConfig::new(&base_url, window)?;
    tracing::debug!("using gateway at {}", cfg.base_url());

    let controller = Controller::new(HttpGateway::new(&cfg)?, cfg.analytics_window());
    let outcome = run(&controller, cli.command).await;

    let store = controller.snapshot();
    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            match store.error() {
                Some(_) => eprint!("{}", ErrorBanner(&store)),
                None => eprintln!("Error: {err}"),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(controller: &Controller<HttpGateway>, command: Commands) -> ClinicResult<()> {
    match command {
        Commands::Patients { command } => {
            match command {
                PatientCommands::List => {
                    controller.refresh_collections().await?;
                }
                PatientCommands::Create { name } => {
                    let patient = controller.create_patient(&name).await?;
                    println!("Created patient #{} {}", patient.id, patient.name);
                }
            }
            print!("{}", PatientsPanel(&controller.snapshot()));
            Ok(())
        }
        Commands::Appointments { command } => {
            match command {
                AppointmentCommands::List => {
                    controller.refresh_collections().await?;
                }
                AppointmentCommands::Create { patient_id, when } => {
                    let appt = controller.create_appointment(patient_id, &when).await?;
                    println!("Booked appointment #{} ({})", appt.id, appt.status);
                }
                AppointmentCommands::CheckIn { id } => {
                    act(controller, id, StatusAction::CheckIn).await?
                }
                AppointmentCommands::Complete { id } => {
                    act(controller, id, StatusAction::Complete).await?
                }
                AppointmentCommands::Cancel { id } => {
                    act(controller, id, StatusAction::Cancel).await?
                }
                AppointmentCommands::Predict { id } => {
                    controller.refresh_collections().await?;
                    let prediction = controller.request_prediction(id).await?;
                    println!(
                        "Appointment #{}: {}",
                        id,
                        risk_badge(prediction.no_show_probability).label
                    );
                    if let Some(model) = &prediction.model {
                        println!("  model: {model}");
                    }
                    for reason in &prediction.explanation {
                        println!("  - {reason}");
                    }
                }
            }
            print!("{}", AppointmentsPanel(&controller.snapshot()));
            Ok(())
        }
        Commands::Dashboard { days } => {
            match days {
                Some(window) => controller.change_window(window).await?,
                None => controller.refresh_analytics().await?,
            }
            print!("{}", DashboardPanel(&controller.snapshot()));
            Ok(())
        }
    }
}

/// Loads the current listing so the action is checked against fresh affordances.
async fn act(
    controller: &Controller<HttpGateway>,
    id: u64,
    action: StatusAction,
) -> ClinicResult<()> {
    controller.refresh_collections().await?;
    let appt = controller.apply_action(id, action).await?;
    println!("Appointment #{} is now {}", appt.id, appt.status);
    Ok(())
}

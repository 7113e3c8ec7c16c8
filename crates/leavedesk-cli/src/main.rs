//! Leavedesk CLI: the dashboard actions from a terminal.
//!
//! Configuration comes from the environment (or `.env`); see `Config::from_env`.
//! Without DATABASE_URL the record store is in memory and starts empty.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use leavedesk_cli::{
    connect_records, content_type_for, format_request_row, init_tracing, request_table_header,
};
use leavedesk_core::models::AttachmentUpload;
use leavedesk_core::{Config, ErrorMetadata};
use leavedesk_db::{run_migrations, EmployeeStore, LeaveRequestStore};
use leavedesk_services::{
    AgentBootstrap, AttachmentError, AttachmentOpener, AttachmentReconciler,
    AttachmentUploadService, EmailService, HttpAgentLoader,
};
use leavedesk_storage::create_store;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "leavedesk", about = "Leave request attachments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the leave requests of an employee
    List {
        /// Employee e-mail address
        #[arg(long)]
        email: String,
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Attach a file to a leave request
    Upload {
        /// Leave request ID
        #[arg(long)]
        request_id: i64,
        /// Employee identifier used in the attachment key (e.g. emp001)
        #[arg(long)]
        employee: String,
        /// Path to the file to attach
        file: PathBuf,
        /// Content type (guessed from the extension when omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Print the URL of a leave request's attachment
    Open {
        /// Leave request ID
        request_id: i64,
    },
    /// Report stored attachments no leave request references
    Reconcile {
        /// Point requests without a reference at their newest orphaned upload
        #[arg(long)]
        relink: bool,
    },
    /// E-mail an employee the current status of a leave request
    Notify {
        /// Leave request ID
        request_id: i64,
    },
    /// Send a contact message
    Contact {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
    /// Load the hosted chat agent and print its configuration
    Agent,
    /// Apply database migrations
    Migrate,
}

#[derive(Serialize)]
struct AgentOutput<'a> {
    loader_url: &'a str,
    script_bytes: usize,
    configuration: &'a leavedesk_services::AgentConfiguration,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Attach the user-facing message to workflow failures.
fn explain(err: AttachmentError) -> anyhow::Error {
    tracing::debug!(error_code = err.error_code(), error = %err, "Attachment action failed");
    let message = err.client_message();
    anyhow::Error::new(err).context(message)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::List { email, format } => {
            let records = connect_records(&config).await?;
            let employee = records
                .employees
                .find_by_email(&email)
                .await?
                .with_context(|| format!("No employee with e-mail {}", email))?;
            let requests = records.requests.list_for_employee(employee.id).await?;

            match format.as_str() {
                "json" => print_json(&requests)?,
                "table" => {
                    println!("{} ({})", employee.name, employee.initials());
                    println!("{}", request_table_header());
                    for request in &requests {
                        println!("{}", format_request_row(request));
                    }
                    println!("{} request(s)", requests.len());
                }
                other => anyhow::bail!("Unknown format {}. Use json or table", other),
            }
        }
        Commands::Upload {
            request_id,
            employee,
            file,
            content_type,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("File name is not valid UTF-8")?
                .to_string();
            let content_type =
                content_type.unwrap_or_else(|| content_type_for(&file).to_string());

            let store = create_store(&config).await?;
            let records = connect_records(&config).await?;
            let service =
                AttachmentUploadService::new(store, records.requests, config.attachments.clone());

            let updated = service
                .upload(
                    request_id,
                    &employee,
                    AttachmentUpload::new(file_name, content_type, bytes),
                )
                .await
                .map_err(explain)?;
            print_json(&updated)?;
        }
        Commands::Open { request_id } => {
            let store = create_store(&config).await?;
            let records = connect_records(&config).await?;
            let request = records
                .requests
                .get(request_id)
                .await?
                .with_context(|| format!("Leave request {} not found", request_id))?;

            let opener = AttachmentOpener::new(store, config.matching);
            let opened = opener.open_request(&request).await.map_err(explain)?;
            print_json(&opened)?;
        }
        Commands::Reconcile { relink } => {
            let store = create_store(&config).await?;
            let records = connect_records(&config).await?;
            let reconciler = AttachmentReconciler::new(
                store,
                records.requests,
                config.attachments.upload_status.clone(),
            );
            let report = reconciler.run(relink).await.map_err(explain)?;
            print_json(&report)?;
        }
        Commands::Notify { request_id } => {
            let email = EmailService::from_config(&config.email)
                .context("E-mail is disabled; set EMAIL_ENABLED, SMTP_HOST and SMTP_FROM")?;
            let records = connect_records(&config).await?;
            let request = records
                .requests
                .get(request_id)
                .await?
                .with_context(|| format!("Leave request {} not found", request_id))?;
            let employee = records
                .employees
                .get(request.employee_id)
                .await?
                .with_context(|| format!("Employee {} not found", request.employee_id))?;

            email.notify_status(&employee, &request).await?;
            println!("Notified {}", employee.email);
        }
        Commands::Contact {
            to,
            subject,
            message,
        } => {
            let email = EmailService::from_config(&config.email)
                .context("E-mail is disabled; set EMAIL_ENABLED, SMTP_HOST and SMTP_FROM")?;
            email.send_contact(&to, &subject, &message).await?;
            println!("Message sent to {}", to);
        }
        Commands::Agent => {
            let loader = HttpAgentLoader::new()?;
            let handle = AgentBootstrap::global()
                .init(&config.agent, &loader)
                .await?;
            print_json(&AgentOutput {
                loader_url: &handle.loader_url,
                script_bytes: handle.script_bytes,
                configuration: &handle.configuration,
            })?;
        }
        Commands::Migrate => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set to run migrations")?;
            let pool = leavedesk_db::connect(url, config.db_max_connections).await?;
            run_migrations(&pool).await?;
            println!("Migrations applied");
        }
    }

    Ok(())
}

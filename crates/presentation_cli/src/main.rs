//! wikireport CLI
//!
//! Looks a subject up on Wikipedia, renders the summary into a PDF report
//! and mails it to a list of recipients.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use application::{LookupService, MailerPort, ReportPipeline};
use clap::Parser;
use domain::LookupStatus;
use infrastructure::{
    AppConfig, SmtpMailerAdapter, UnconfiguredMailer, WikipediaFetchAdapter, init_logging,
};
use tracing::{debug, info};

use crate::cli::{Cli, Commands, exit_code_for, log_filter_from_verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(&config.telemetry, log_filter_from_verbosity(cli.verbose))?;
    config.validate().context("invalid configuration")?;
    debug!(config = ?config, "Configuration loaded");

    let fetch = Arc::new(WikipediaFetchAdapter::new(
        &config.wikipedia.to_wikipedia_config(),
    )?);
    let lookup = LookupService::from_config(fetch, &config.pipeline)?;
    let pipeline = ReportPipeline::from_config(lookup, &config.pipeline);

    match cli.command {
        Commands::Search { term, json } => {
            let result = pipeline.lookup().lookup(&term).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.subject_term());
                println!();
                println!("{}", result.report_body());
                println!();
                println!("Source: {}", result.source_url());
            }
            if let LookupStatus::UpstreamError(detail) = result.status() {
                eprintln!("Lookup failed: {detail}");
            }
            Ok(ExitCode::SUCCESS)
        },

        Commands::Send {
            term,
            to,
            requester,
            prefetched,
        } => {
            let prefetched =
                prefetched.into_lookup_result(&term, || pipeline.lookup().article_url(&term));

            let mailer: Box<dyn MailerPort> = match config.smtp {
                Some(ref smtp) => Box::new(SmtpMailerAdapter::from_app_config(smtp)),
                None => Box::new(UnconfiguredMailer),
            };

            let outcome = pipeline
                .run(&term, prefetched, &to, requester.as_deref(), mailer.as_ref())
                .await;
            info!(status = %outcome.status, "Report run finished");

            println!("{}", outcome.message());
            if let Some(detail) = outcome.detail() {
                eprintln!("Detail: {detail}");
            }
            Ok(ExitCode::from(exit_code_for(&outcome.status)))
        },

        Commands::Render {
            term,
            output,
            prefetched,
        } => {
            let prefetched =
                prefetched.into_lookup_result(&term, || pipeline.lookup().article_url(&term));

            let document = pipeline.render(&term, prefetched).await?;
            tokio::fs::write(&output, document.bytes())
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;

            println!(
                "Wrote {} ({} page(s), {} bytes)",
                output.display(),
                document.page_count(),
                document.len()
            );
            Ok(ExitCode::SUCCESS)
        },
    }
}

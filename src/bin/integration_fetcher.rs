use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use integration_fetcher::app::App;
use integration_fetcher::config::Settings;
use integration_fetcher::error::FetcherError;
use integration_fetcher::fetcher::build_fetcher;
use integration_fetcher::integration::HttpIntegrationResolver;
use integration_fetcher::manifest::HttpManifestRequester;
use integration_fetcher::output::{ConsoleOutput, JsonOutput};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(report) = tracing::subscriber::with_default(subscriber, run) {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<FetcherError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &FetcherError) -> u8 {
    match error {
        FetcherError::InvalidIntegrationId(_) => 2,
        err if err.is_remote() => 3,
        FetcherError::IncompleteDownload { .. } => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let settings = Settings::parse();
    tracing::info!(
        integration_id = %settings.integration_id,
        output_dir = %settings.output_dir,
        downloader = %settings.downloader,
        "starting integration fetch"
    );

    let request = settings.run_request()?;

    let resolver = HttpIntegrationResolver::new(
        settings.metadata_base(),
        settings.session_token.clone(),
        settings.api_timeout(),
    )?;
    let requester = HttpManifestRequester::new(
        settings.manifest_base(),
        settings.session_token.clone(),
        settings.api_timeout(),
    )?;
    let fetcher = build_fetcher(settings.downloader, settings.download_timeout())?;

    let app = App::new(resolver, requester, fetcher);
    let summary = app.run(&request, &ConsoleOutput)?;
    JsonOutput::print_summary(&summary).into_diagnostic()?;

    if !summary.is_complete() {
        if settings.allow_partial {
            tracing::warn!(
                failed = summary.failed,
                total = summary.total,
                "some files failed; exiting successfully because partial runs are allowed"
            );
        } else {
            return Err(FetcherError::IncompleteDownload {
                failed: summary.failed,
                total: summary.total,
            }
            .into());
        }
    }
    Ok(())
}

mod browse;
mod cli;
mod report;

use anyhow::{Context, Result};
use cli::{Command, PollArgs, ViewArgs};
use quality_report::client::{HttpReportFetcher, RemoteBackend, SubmissionClient};
use quality_report::config::{self, ClientConfig, Overrides};
use quality_report::labels::Locale;
use quality_report::poller::ReportPoller;
use quality_report::simulated::SimulatedBackend;
use quality_report::types::Language;
use quality_report::{
    AnalysisError, BackendKind, CancelToken, Report, ReportView, SourceFile, UploadWorkflow,
    WorkflowState,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli::parse();
    quality_report::logging::init(args.verbose);

    if let Command::Languages = args.command {
        report::print_languages(&Language::options());
        return Ok(());
    }

    let poll_args = match &args.command {
        Command::Submit { poll, .. } | Command::Report { poll, .. } => Some(poll.clone()),
        _ => None,
    };
    let cfg = load_settings(&args, poll_args.as_ref())?;

    match args.command {
        Command::Submit {
            file,
            language,
            simulate,
            view,
            ..
        } => submit(&cfg, &file, &language, simulate, &view, args.json).await,
        Command::Report {
            submission_id,
            view,
            ..
        } => fetch_existing(&cfg, &submission_id, &view, args.json).await,
        Command::List => {
            let digests = SubmissionClient::new(cfg.base_url.clone())
                .list_reports()
                .await
                .context("Failed to list reports")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&digests)?);
            } else {
                report::print_digests(&digests);
            }
            Ok(())
        }
        Command::Languages => Ok(()),
    }
}

fn load_settings(args: &cli::Args, poll: Option<&PollArgs>) -> Result<ClientConfig> {
    let cwd = std::env::current_dir()?;
    let file = match config::discover(&cwd, args.config.as_deref()) {
        Some(path) => Some(config::load_config(&path)?),
        None => None,
    };
    let locale = match args.locale.as_deref() {
        Some(tag) => Some(
            Locale::from_tag(tag).with_context(|| format!("Unknown locale: {} (expected en or tr)", tag))?,
        ),
        None => None,
    };
    let overrides = Overrides {
        base_url: args.base_url.clone(),
        max_attempts: poll.and_then(|p| p.max_attempts),
        interval_ms: poll.and_then(|p| p.interval_ms),
        simulated: None,
        locale,
    };
    Ok(config::resolve(file.as_ref(), &overrides)?)
}

async fn submit(
    cfg: &ClientConfig,
    path: &Path,
    language: &str,
    simulate: bool,
    view_args: &ViewArgs,
    json: bool,
) -> Result<()> {
    let language = Language::from_tag(language)
        .with_context(|| format!("Unknown language: {}", language))?;
    let simulated = simulate || cfg.simulated;

    let workflow = UploadWorkflow::new(
        Arc::new(RemoteBackend::new(cfg.base_url.clone(), cfg.poll_policy())),
        Arc::new(SimulatedBackend::new(cfg.simulated_delay)),
    );
    workflow.set_backend(if simulated {
        BackendKind::Simulated
    } else {
        BackendKind::Remote
    });
    workflow.select_language(language)?;

    let file = SourceFile::load(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    workflow.select_file(Some(file.clone()))?;

    if !json {
        report::print_banner();
        report::print_uploading(&file.name, language, simulated);
    }

    // Report the accepted submission while the poll is still running
    let progress = {
        let workflow = workflow.clone();
        async move {
            if json {
                return;
            }
            loop {
                match workflow.state() {
                    WorkflowState::AwaitingReport { submission } => {
                        report::print_submission(&submission);
                        return;
                    }
                    state if !state.is_busy() => return,
                    _ => tokio::time::sleep(std::time::Duration::from_millis(50)).await,
                }
            }
        }
    };
    let (submitted, ()) = tokio::join!(workflow.submit(), progress);
    submitted?;

    match workflow.state() {
        WorkflowState::ReportReady { report: ready, .. } => {
            workflow.open_report()?;
            show(&workflow, &ready, view_args, cfg.locale, json)
        }
        WorkflowState::Failed { error, submission } => {
            fail(&error, submission.as_ref().map(|s| s.id.as_str()), json)
        }
        _ => Ok(()),
    }
}

async fn fetch_existing(
    cfg: &ClientConfig,
    submission_id: &str,
    view_args: &ViewArgs,
    json: bool,
) -> Result<()> {
    if !json {
        report::print_banner();
        println!("\n⏳ Waiting for the report of {}...", submission_id);
    }
    let poller = ReportPoller::new(HttpReportFetcher::new(cfg.base_url.clone()), cfg.poll_policy());
    match poller.poll(submission_id, &CancelToken::new()).await {
        Ok(Some(fetched)) => {
            let fetched = Arc::new(fetched);
            if json {
                println!("{}", serde_json::to_string_pretty(&*fetched)?);
                return Ok(());
            }
            let mut view = ReportView::new(Arc::clone(&fetched));
            view.set_mode(view_args.mode.into());
            report::print_summary(&fetched, cfg.locale);
            report::print_view(&view, cfg.locale);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(error) => fail(&error, Some(submission_id), json),
    }
}

fn fail(error: &AnalysisError, submission_id: Option<&str>, json: bool) -> ! {
    if json {
        println!("{}", report::failure_json(error, submission_id));
    } else {
        report::print_failure(error, submission_id);
    }
    std::process::exit(1);
}

fn show(
    workflow: &UploadWorkflow,
    ready: &Report,
    view_args: &ViewArgs,
    locale: Locale,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(ready)?);
        return Ok(());
    }

    report::print_summary(ready, locale);
    workflow.with_view(|view| view.set_mode(view_args.mode.into()))?;
    if view_args.interactive {
        browse::run(workflow, locale)
    } else {
        workflow.with_view(|view| report::print_view(view, locale))?;
        println!("\n{}", "═".repeat(80));
        println!("\n✅ Analysis complete!");
        Ok(())
    }
}

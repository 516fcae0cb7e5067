use anyhow::Context;
use bookrun::config::{Command, ScrapeArgs, ScraperSettings};
use bookrun::core::books::write_csv;
use bookrun::utils::{logger, validation::Validate};
use bookrun::{BookScraper, CliConfig, Orchestrator, ProcessRunner, RunnerError};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let config = cli.load_settings().with_context(|| match &cli.config {
        Some(path) => format!("failed to load config file '{}'", path.display()),
        None => "failed to build default configuration".to_string(),
    })?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let result = match &cli.command {
        None | Some(Command::Run) => {
            config.runner.validate().context("invalid [runner] configuration")?;
            let orchestrator = Orchestrator::new(ProcessRunner::new(), config.runner);
            let mut stdout = std::io::stdout();
            orchestrator.run(&mut stdout).await.map(|report| {
                tracing::info!(
                    "✅ Finished {} steps in {:?} (started {})",
                    report.completed.len(),
                    report.elapsed,
                    report.started_at.to_rfc3339()
                );
            })
        }
        Some(Command::Scrape(args)) => {
            config.scraper.validate().context("invalid [scraper] configuration")?;
            scrape(config.scraper, args).await
        }
    };

    if let Err(e) = result {
        report_failure(&e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn scrape(settings: ScraperSettings, args: &ScrapeArgs) -> bookrun::Result<()> {
    let scraper = BookScraper::new(settings)?;

    if args.test {
        let books = scraper.scrape_first_page(args.test_count).await?;
        for book in &books {
            println!("{}", serde_json::to_string(book)?);
        }
        println!("\nPrinted {} books (test mode).", books.len());
    } else {
        let books = scraper.scrape_all().await?;
        write_csv(&args.output, &books)?;
        println!("Saved {} books to {}", books.len(), args.output.display());
    }

    Ok(())
}

fn report_failure(e: &RunnerError) {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

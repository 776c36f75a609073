// src/main.rs
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2report::{
    server, AppError, Cli, Command, GenerationSummary, PageId, PdfOutcome, ReportArgs,
    ReportSettings,
};

const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}";

/// Console logs go to stderr so stdout carries only the completion report.
/// The file log under the temp dir always records debug output.
fn setup_logging(verbose: bool, serving: bool) -> Result<(), Box<dyn std::error::Error>> {
    let console_level = match (verbose, serving) {
        (true, _) => LevelFilter::Debug,
        (false, true) => LevelFilter::Info,
        (false, false) => LevelFilter::Warn,
    };
    let console_pattern = if verbose || serving {
        FILE_PATTERN
    } else {
        "{m}{n}"
    };

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(console_pattern)))
        .build();

    let log_file_path = std::env::temp_dir().join("notion2report.log");
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(console_level)))
                .build("console", Box::new(console)),
        )
        .appender(Appender::builder().build("file", Box::new(file)))
        .logger(Logger::builder().build("hyper", LevelFilter::Info))
        .logger(Logger::builder().build("reqwest", LevelFilter::Info))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging to {}", log_file_path.display());
    Ok(())
}

async fn generate(page: &str, args: &ReportArgs) -> Result<(), AppError> {
    let project_id = PageId::parse(page)?;
    let settings = ReportSettings::resolve(args)?;
    let pipeline = settings.build_pipeline()?;

    let summary = pipeline.generate(&project_id).await?;
    report_completion(&summary);
    Ok(())
}

/// Prints what was produced. The last line is the report URL alone.
fn report_completion(summary: &GenerationSummary) {
    println!(
        "📄 '{}': {} task(s), {} note(s)",
        summary.project_title, summary.tasks_count, summary.notes_count
    );
    println!("✓ Markdown saved to {}", summary.export.markdown.url);

    match &summary.export.pdf {
        PdfOutcome::Skipped => {}
        PdfOutcome::Rendered {
            artifact,
            used_fallback,
        } => {
            if *used_fallback {
                println!("✓ PDF saved to {} (simplified layout)", artifact.url);
            } else {
                println!("✓ PDF saved to {}", artifact.url);
            }
        }
        PdfOutcome::Failed { reason } => {
            eprintln!("⚠️  PDF was not produced: {}", reason);
        }
    }

    if let Some(error) = &summary.url_update_error {
        eprintln!("⚠️  Report link not written back to Notion: {}", error);
    }

    println!("{}", summary.url());
}

async fn serve(host: &str, port: u16, args: &ReportArgs) -> Result<(), AppError> {
    let settings = ReportSettings::resolve(args)?;
    let pipeline = settings.build_pipeline()?;
    server::serve(host, port, server::AppState::new(pipeline)).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let serving = matches!(cli.command, Command::Serve { .. });
    setup_logging(cli.verbose, serving)?;

    match &cli.command {
        Command::Generate { page, report } => generate(page, report).await?,
        Command::Serve { host, port, report } => serve(host, *port, report).await?,
    }

    Ok(())
}

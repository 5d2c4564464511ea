//! CV evaluator: ATS compatibility checks for resume files

use clap::Parser;
use cv_evaluator::cli::{self, Cli};
use cv_evaluator::config::Config;
use cv_evaluator::error::{CvEvaluatorError, Result};
use cv_evaluator::input;
use cv_evaluator::output::formatter::{format_extracted, save_report_to_file, ReportGenerator};
use cv_evaluator::processing::evaluator::Evaluator;
use log::{debug, error};
use std::process;

/// Exit status when the score is below `--fail-under`.
const EXIT_BELOW_THRESHOLD: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_color {
        config.output.color_output = false;
    }
    let format = cli::parse_output_format(&cli.format)
        .map_err(CvEvaluatorError::InvalidInput)?;

    if cli.show_text {
        let doc = input::extract(&cli.cv_path)?;
        print!("{}", format_extracted(&doc));
        return Ok(0);
    }

    let keywords = cli::collect_keywords(cli.job.as_deref(), cli.keywords.as_deref())?;
    debug!("Checking {} keyword(s)", keywords.len());

    let evaluator = Evaluator::new(&config)?;
    let result = evaluator.evaluate(&cli.cv_path, &keywords)?;

    let report = ReportGenerator::new(&config.output).generate_report(&result, format)?;
    if report.ends_with('\n') {
        print!("{}", report);
    } else {
        println!("{}", report);
    }

    if let Some(path) = &cli.save {
        save_report_to_file(&report, path)?;
        debug!("Report saved to {}", path.display());
    }

    if result.meets(cli.fail_under) {
        Ok(0)
    } else {
        Ok(EXIT_BELOW_THRESHOLD)
    }
}

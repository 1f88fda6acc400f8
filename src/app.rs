//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and initializes logging
//! - loads CSV observations or generates synthetic ones
//! - dispatches to scoring, checks, profiles, or calibration
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{CalibrateArgs, CheckArgs, Cli, Command, ProfileArgs, ScoreArgs, SimulateArgs};
use crate::dist::Exponential;
use crate::domain::ScoreKind;
use crate::error::AppError;
use crate::scores::CensoredScore;

pub mod pipeline;

/// Entry point for the `cexp` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Simulate(args) => handle_simulate(args),
        Command::Score(args) => handle_score(args),
        Command::Check(args) => handle_check(args),
        Command::Profile(args) => handle_profile(args),
        Command::Calibrate(args) => handle_calibrate(args),
    }
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let data = crate::data::generate_sample(&args.data.synthetic())?;
    crate::io::export::write_survival_csv(&args.out, &data)?;
    info!(path = %args.out.display(), rows = data.len(), "wrote synthetic sample");

    if let Some(stats) = data.stats() {
        print!(
            "{}",
            crate::report::format_dataset_summary(&args.out.display().to_string(), &stats, 0)
        );
    }
    Ok(())
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_data(&args.data.source())?;
    let log_scale =
        pipeline::resolve_log_scale(args.at.at_scale, args.at.from_fit.as_deref(), &loaded.data)?;

    let rows = crate::report::compute_score_rows(&loaded.data, args.score, log_scale)?;
    let dist = Exponential::constant(log_scale, loaded.data.len())?;
    let total = args
        .score
        .total_score(&dist, &loaded.data, loaded.weights.as_deref())?;

    print!(
        "{}",
        crate::report::format_dataset_summary(&loaded.label, &loaded.stats, loaded.row_errors.len())
    );
    println!(
        "{} at scale={:.6} (ln={:.6})\n",
        args.score.display_name(),
        log_scale.exp(),
        log_scale
    );
    print!("{}", crate::report::format_score_table(&rows, args.top, total));

    if let Some(path) = &args.export {
        crate::io::export::write_scores_csv(path, &rows)?;
        info!(path = %path.display(), rows = rows.len(), "wrote score CSV");
    }
    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_data(&args.data.source())?;
    let log_scale =
        pipeline::resolve_log_scale(args.at.at_scale, args.at.from_fit.as_deref(), &loaded.data)?;

    print!(
        "{}",
        crate::report::format_dataset_summary(&loaded.label, &loaded.stats, loaded.row_errors.len())
    );

    let kinds: Vec<ScoreKind> = match args.score {
        Some(kind) => vec![kind],
        None => ScoreKind::ALL.to_vec(),
    };

    let mut failed = Vec::new();
    for kind in kinds {
        let check = crate::fit::gradient_check(&loaded.data, kind, log_scale, args.step)?;
        print!("{}", crate::report::format_gradient_check(&check, args.tol));
        if !check.passes(args.tol) {
            failed.push(kind.display_name());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(AppError::numeric(format!(
            "Gradient check failed for: {}",
            failed.join(", ")
        )))
    }
}

fn handle_profile(args: ProfileArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_data(&args.data.source())?;
    let profile = crate::fit::score_profile(
        &loaded.data,
        args.score,
        args.scale_min,
        args.scale_max,
        args.steps,
    )?;
    let fitted_scale = Exponential::fit(loaded.data.time())?[0].exp();

    print!(
        "{}",
        crate::report::format_dataset_summary(&loaded.label, &loaded.stats, loaded.row_errors.len())
    );
    print!("{}", crate::report::format_profile_summary(&profile));
    println!("Fitted scale (censoring ignored, marked `|`): {fitted_scale:.4}");

    if !args.no_plot {
        println!();
        print!(
            "{}",
            crate::plot::render_profile_plot(&profile, args.width, args.height, Some(fitted_scale))
        );
    }
    Ok(())
}

fn handle_calibrate(args: CalibrateArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_data(&args.data.source())?;
    let result = crate::fit::calibrate(&loaded.data, &args.options())?;
    info!(
        score = result.score.display_name(),
        iterations = result.iterations,
        converged = result.converged,
        scale = result.scale(),
        "calibration finished"
    );

    print!(
        "{}",
        crate::report::format_dataset_summary(&loaded.label, &loaded.stats, loaded.row_errors.len())
    );
    print!("{}", crate::report::format_calibration(&result));

    if let Some(path) = &args.export_fit {
        crate::io::fitfile::write_fit_json(path, &result, &loaded.stats)?;
        info!(path = %path.display(), "wrote calibration JSON");
    }
    Ok(())
}

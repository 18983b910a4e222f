//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::toml_config::AppConfig;
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::cli::{Cli, Commands};
use crate::domain::model::{DurationRange, PlanMode, PlanPreview, RemixReport, RemixRequest};
use crate::utils::time::format_seconds;

/// Build the remix request described by the command line
pub fn build_request(command: &Commands, config: &AppConfig) -> Result<RemixRequest> {
    let (mode, target) = match command {
        Commands::RandomCuts(args) => (PlanMode::RandomCuts, args.total_duration),
        Commands::Shuffle(_) => (PlanMode::PartitionShuffle, None),
    };
    let args = command.fragment_args();
    let range = DurationRange::new(args.min_duration, args.max_duration)
        .context("Invalid fragment durations")?;

    Ok(RemixRequest::new(
        mode,
        args.input_file.clone(),
        args.output_file.clone(),
        range,
    )
    .with_target_duration(target)
    .with_seed(args.seed)
    .with_video_codec(config.video_codec.clone())
    .with_overwrite(config.overwrite))
}

/// Execute the parsed command line
pub async fn execute(cli: Cli, config: AppConfig) -> Result<()> {
    let request = build_request(&cli.command, &config)?;
    let args = cli.command.fragment_args();

    let container = DefaultAppContainer::new(&config).context("Failed to set up media adapter")?;
    let interactor = container.remix_interactor();

    if args.dry_run {
        info!("Dry run: planning fragments only");
        let preview = interactor
            .plan_only(request)
            .await
            .context("Failed to plan fragments")?;
        return print_preview(&preview, args.json);
    }

    let input = request.input.display().to_string();
    let report = interactor
        .run(request)
        .await
        .with_context(|| format!("Failed to remix {}", input))?;
    print_report(&report, args.json)
}

fn print_preview(preview: &PlanPreview, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(preview)?);
        return Ok(());
    }

    let plan = &preview.plan;
    println!(
        "{} plan for {} (seed {}): {} fragments, {}",
        plan.mode,
        preview.input.display(),
        preview.seed,
        plan.len(),
        format_seconds(plan.total_duration)
    );
    for (position, interval) in plan.iter().enumerate() {
        println!(
            "{:>4}. {} - {} ({:.2}s)",
            position + 1,
            format_seconds(interval.start),
            format_seconds(interval.end),
            interval.duration()
        );
    }
    Ok(())
}

fn print_report(report: &RemixReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "Wrote {} ({} fragments, {} from {} source, seed {}) in {:.1}s",
        report.output.display(),
        report.fragments,
        format_seconds(report.output_duration),
        format_seconds(report.source_duration),
        report.seed,
        report.elapsed_seconds
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_random_cuts_request() {
        let cli = parse(&[
            "recut",
            "random-cuts",
            "in.mp4",
            "out.mp4",
            "--min-duration",
            "0.5",
            "--max-duration",
            "3",
            "--total-duration",
            "20",
            "--seed",
            "42",
        ]);
        let request = build_request(&cli.command, &AppConfig::default()).unwrap();

        assert_eq!(request.mode, PlanMode::RandomCuts);
        assert_eq!(request.range, DurationRange::new(0.5, 3.0).unwrap());
        assert_eq!(request.target_duration, Some(20.0));
        assert_eq!(request.seed, Some(42));
        assert_eq!(request.video_codec, "libx264");
    }

    #[test]
    fn test_shuffle_request_defaults() {
        let cli = parse(&["recut", "--overwrite", "shuffle", "in.mp4", "out.mp4"]);
        let mut config = AppConfig::default();
        config.overwrite = cli.overwrite;
        let request = build_request(&cli.command, &config).unwrap();

        assert_eq!(request.mode, PlanMode::PartitionShuffle);
        assert_eq!(request.range, DurationRange::default());
        assert_eq!(request.target_duration, None);
        assert!(request.overwrite);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let cli = parse(&[
            "recut",
            "shuffle",
            "in.mp4",
            "out.mp4",
            "--min-duration",
            "3",
            "--max-duration",
            "1",
        ]);
        assert!(build_request(&cli.command, &AppConfig::default()).is_err());
    }

    #[test]
    fn test_shuffle_has_no_total_duration() {
        let result = Cli::try_parse_from([
            "recut",
            "shuffle",
            "in.mp4",
            "out.mp4",
            "--total-duration",
            "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_duration_rejected_by_parser() {
        let result = Cli::try_parse_from([
            "recut",
            "random-cuts",
            "in.mp4",
            "out.mp4",
            "--min-duration",
            "0",
        ]);
        assert!(result.is_err());
    }
}

// Remix interactor - Orchestrates one remix run end to end

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};

use crate::app::materializer::Materializer;
use crate::app::resources::{OutputGuard, SourceGuard};
use crate::domain::errors::PlanError;
use crate::domain::model::*;
use crate::error::{RecutError, RecutResult};
use crate::planner::{fresh_seed, plan_partition_shuffle, plan_random_cuts, seeded_rng};
use crate::ports::*;


/// Interactor for the remix use case
pub struct RemixInteractor {
    decoder: Arc<dyn Decodable>,
    encoder: Arc<dyn Encodable>,
    reporter: Arc<dyn ProgressReporter>,
    jobs: usize,
}

impl RemixInteractor {
    /// Create new remix interactor with injected ports
    pub fn new(
        decoder: Arc<dyn Decodable>,
        encoder: Arc<dyn Encodable>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            decoder,
            encoder,
            reporter,
            jobs: 1,
        }
    }

    /// Extraction concurrency handed to the materializer
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Plan, extract, join and write one remix.
    ///
    /// Nothing is written to `request.output` unless every step before the
    /// final encode succeeded.
    pub async fn run(&self, request: RemixRequest) -> RecutResult<RemixReport> {
        let started = Instant::now();
        validate_request(&request)?;
        let seed = request.seed.unwrap_or_else(fresh_seed);

        self.reporter
            .phase(Phase::Loading, &request.input.display().to_string());
        let source = SourceGuard::open(self.decoder.as_ref(), &request.input).await?;
        let source_duration = self.decoder.duration(&source);
        info!(
            input = %request.input.display(),
            duration = source_duration,
            "Source opened"
        );

        self.reporter
            .phase(Phase::Generating, &format!("{} (seed {})", request.mode, seed));
        let plan = build_plan(&request, source_duration, seed)?;
        debug!(fragments = plan.len(), total = plan.total_duration, "Plan ready");

        let materializer = Materializer::new(
            Arc::clone(&self.decoder),
            Arc::clone(&self.encoder),
            Arc::clone(&self.reporter),
        )
        .with_jobs(self.jobs);
        let video = materializer.materialize(&source, &plan).await?;
        let video = OutputGuard::new(self.encoder.as_ref(), video);

        self.reporter
            .phase(Phase::Writing, &request.output.display().to_string());
        self.encoder
            .write(&video, &request.output, &request.video_codec)
            .await?;

        let output_duration = video.duration;
        drop(video);
        drop(source);
        self.reporter.phase(Phase::Done, "");

        Ok(RemixReport {
            mode: request.mode,
            input: request.input,
            output: request.output,
            seed,
            fragments: plan.len(),
            source_duration,
            output_duration,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            finished_at: Utc::now(),
        })
    }

    /// Open the source and compute the plan without writing anything
    pub async fn plan_only(&self, request: RemixRequest) -> RecutResult<PlanPreview> {
        if let Some(target) = request.target_duration {
            check_target(target)?;
        }
        DurationRange::new(request.range.min, request.range.max)?;
        let seed = request.seed.unwrap_or_else(fresh_seed);

        self.reporter
            .phase(Phase::Loading, &request.input.display().to_string());
        let source = SourceGuard::open(self.decoder.as_ref(), &request.input).await?;
        let source_duration = self.decoder.duration(&source);

        self.reporter
            .phase(Phase::Generating, &format!("{} (seed {})", request.mode, seed));
        let plan = build_plan(&request, source_duration, seed)?;

        Ok(PlanPreview {
            input: request.input,
            seed,
            plan,
        })
    }
}

/// Compute the plan for `request` against a source of `source_duration` seconds
pub fn build_plan(
    request: &RemixRequest,
    source_duration: f64,
    seed: u64,
) -> Result<FragmentPlan, PlanError> {
    let mut rng = seeded_rng(seed);
    match request.mode {
        PlanMode::RandomCuts => plan_random_cuts(
            &mut rng,
            source_duration,
            request.range,
            request.target_duration,
        ),
        PlanMode::PartitionShuffle => {
            plan_partition_shuffle(&mut rng, source_duration, request.range)
        }
    }
}

/// Checks that need no media access, run before the source is opened
fn validate_request(request: &RemixRequest) -> RecutResult<()> {
    DurationRange::new(request.range.min, request.range.max)?;
    if let Some(target) = request.target_duration {
        check_target(target)?;
    }

    if request.input == request.output {
        return Err(RecutError::OutputIsInput {
            path: request.output.clone(),
        });
    }
    if !request.overwrite && request.output.exists() {
        return Err(RecutError::OutputExists {
            path: request.output.clone(),
        });
    }
    Ok(())
}

fn check_target(target: f64) -> Result<(), PlanError> {
    if !target.is_finite() || target <= 0.0 {
        return Err(PlanError::invalid(format!(
            "total output duration must be positive (got {target})"
        )));
    }
    Ok(())
}

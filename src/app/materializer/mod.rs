// Materializer - Turns a fragment plan into one joined video

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::app::resources::ClipSet;
use crate::domain::errors::{MaterializationError, MediaError};
use crate::domain::model::*;
use crate::error::RecutResult;
use crate::ports::*;


/// Extracts every planned interval and joins the clips in plan order
pub struct Materializer {
    decoder: Arc<dyn Decodable>,
    encoder: Arc<dyn Encodable>,
    reporter: Arc<dyn ProgressReporter>,
    jobs: usize,
}

impl Materializer {
    /// Create a materializer that extracts one fragment at a time
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

    /// Number of extractions allowed in flight; `0` means one per CPU
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Extract and join every interval of `plan`.
    ///
    /// Clip units are released once joined, or as soon as any extraction
    /// fails. The returned video belongs to the caller, who must release it
    /// through the encoder.
    pub async fn materialize(
        &self,
        source: &SourceMedia,
        plan: &FragmentPlan,
    ) -> RecutResult<OutputVideo> {
        self.reporter.phase(
            Phase::Extracting,
            &format!("{} fragments, {:.2}s", plan.len(), plan.total_duration),
        );

        let mut clips = ClipSet::new(self.decoder.as_ref(), plan.len());
        if self.jobs <= 1 {
            self.extract_sequential(source, plan, &mut clips).await?;
        } else {
            self.extract_batched(source, plan, &mut clips).await?;
        }

        self.reporter
            .phase(Phase::Concatenating, &format!("{} clips", clips.len()));
        let video = self.encoder.concatenate(clips.as_slice()).await?;
        debug!(
            clips = clips.len(),
            duration = video.duration,
            "Clips concatenated"
        );

        Ok(video)
    }

    async fn extract_sequential(
        &self,
        source: &SourceMedia,
        plan: &FragmentPlan,
        clips: &mut ClipSet<'_>,
    ) -> Result<(), MaterializationError> {
        let mut total = 0.0;
        for (index, interval) in plan.iter().copied().enumerate() {
            let clip = self
                .decoder
                .extract(source, index, interval)
                .await
                .map_err(|source| MaterializationError {
                    index,
                    interval,
                    source,
                })?;
            clips.push(clip);

            total += interval.duration();
            self.report_fragment(index, plan.len(), interval, total);
        }
        Ok(())
    }

    async fn extract_batched(
        &self,
        source: &SourceMedia,
        plan: &FragmentPlan,
        clips: &mut ClipSet<'_>,
    ) -> Result<(), MaterializationError> {
        let mut total = 0.0;
        for (batch_number, batch) in plan.intervals.chunks(self.jobs).enumerate() {
            let first_index = batch_number * self.jobs;
            let mut tasks = JoinSet::new();
            for (offset, interval) in batch.iter().copied().enumerate() {
                let index = first_index + offset;
                let decoder = Arc::clone(&self.decoder);
                let source = source.clone();
                tasks.spawn(async move {
                    let result = decoder.extract(&source, index, interval).await;
                    (index, interval, result)
                });
            }

            let mut done = vec![false; batch.len()];
            let mut failure: Option<MaterializationError> = None;
            while let Some(joined) = tasks.join_next().await {
                let (index, interval, result) = match joined {
                    Ok(outcome) => outcome,
                    Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                    Err(_) => continue,
                };
                match result {
                    Ok(clip) => {
                        done[index - first_index] = true;
                        clips.push(clip);
                    }
                    Err(source) => {
                        // Report the earliest failing fragment in the batch.
                        if failure.as_ref().map_or(true, |f| index < f.index) {
                            failure = Some(MaterializationError {
                                index,
                                interval,
                                source,
                            });
                        }
                    }
                }
            }

            if let Some(failure) = failure {
                return Err(failure);
            }
            if let Some(offset) = done.iter().position(|finished| !finished) {
                let interval = batch[offset];
                return Err(MaterializationError {
                    index: first_index + offset,
                    interval,
                    source: MediaError::Extraction {
                        start: interval.start,
                        end: interval.end,
                        reason: "extraction task was cancelled".to_string(),
                    },
                });
            }

            for (offset, interval) in batch.iter().copied().enumerate() {
                total += interval.duration();
                self.report_fragment(first_index + offset, plan.len(), interval, total);
            }
        }

        clips.sort_by_plan();
        Ok(())
    }

    fn report_fragment(&self, index: usize, planned: usize, interval: Interval, total: f64) {
        self.reporter.fragment(&FragmentProgress {
            count: index + 1,
            planned,
            interval,
            duration: interval.duration(),
            total,
        });
    }
}

use super::Extractor;
use super::outcome::{ExtractionOutcome, ExtractionStatus};
use super::store::MetadataStore;
use crate::analyzer::MediaProber;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Extract every path with at most `max_parallel` videos in flight
///
/// Returns one outcome per input, in input order. A failing or panicking
/// video never stops the rest of the batch.
pub async fn run_batch<P, S>(
    extractor: Arc<Extractor<P, S>>,
    paths: Vec<PathBuf>,
    max_parallel: usize,
) -> Vec<ExtractionOutcome>
where
    P: MediaProber + Send + Sync + 'static,
    S: MetadataStore + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    info!(
        "Extracting {} videos ({} at a time)",
        paths.len(),
        max_parallel.max(1)
    );

    let handles: Vec<_> = paths
        .iter()
        .cloned()
        .map(|path| {
            let extractor = Arc::clone(&extractor);
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                extractor.extract(&path).await
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(paths.len());
    for (path, handle) in paths.into_iter().zip(handles) {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                error!("Extraction task for {} failed: {}", path.display(), e);
                outcomes.push(ExtractionOutcome::new(path).fail(format!("extraction task failed: {}", e)));
            }
        }
    }
    outcomes
}

/// Counts over a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub partial: usize,
    pub failed: usize,
    pub flight_points: usize,
    pub total_bytes: u64,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ExtractionOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            match outcome.status {
                ExtractionStatus::Success => summary.succeeded += 1,
                ExtractionStatus::Partial { .. } => summary.partial += 1,
                ExtractionStatus::Failed { .. } => summary.failed += 1,
            }
            summary.flight_points += outcome.flight_points;
            summary.total_bytes += outcome.size_bytes.unwrap_or(0);
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.partial + self.failed
    }
}

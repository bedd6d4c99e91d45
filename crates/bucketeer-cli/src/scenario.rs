//! The fixed demo sequence.

use std::future::Future;

use tracing::{error, info};

use crate::TRACING_TARGET_SCENARIO;
use crate::config::ScenarioConfig;
use crate::exerciser::{Exerciser, StepOutcome};
use crate::naming::{NameLog, ResourceName};

const FIRST_KEY: &str = "football.jpg";
const SECOND_KEY: &str = "code.jpg";
const RENAMED_KEY: &str = "football1.jpg";

/// Step counts of a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: StepOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Total number of steps run.
    #[inline]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Runs the create, read, update, delete and download steps in order,
/// pausing after each one.
pub struct Scenario<'a> {
    exerciser: &'a Exerciser,
    config: &'a ScenarioConfig,
}

impl<'a> Scenario<'a> {
    pub fn new(exerciser: &'a Exerciser, config: &'a ScenarioConfig) -> Self {
        Self { exerciser, config }
    }

    /// Generates a fresh container name, records it in the name log, and
    /// runs every step against it.
    ///
    /// A name log failure is logged and the run goes ahead.
    pub async fn run_fresh(&self) -> (ResourceName, RunSummary) {
        let name = ResourceName::generate();
        let name_log = NameLog::new(self.config.name_log.clone());

        match name_log.append(&name).await {
            Ok(()) => info!(
                target: TRACING_TARGET_SCENARIO,
                path = %name_log.path().display(),
                "Random bucket name \"{name}\" created"
            ),
            Err(e) => error!(
                target: TRACING_TARGET_SCENARIO,
                path = %name_log.path().display(),
                error = %e,
                "Error: failed to record bucket name"
            ),
        }

        let summary = self.run(&name).await;
        (name, summary)
    }

    /// Runs every step against the container `name`.
    ///
    /// A failed step is counted and the run moves on to the next one.
    pub async fn run(&self, name: &ResourceName) -> RunSummary {
        let ex = self.exerciser;
        let cfg = self.config;
        let bucket = name.as_str();
        let mut summary = RunSummary::default();

        let assets = [cfg.first_asset.clone(), cfg.second_asset.clone()];
        let keys = [FIRST_KEY.to_owned(), SECOND_KEY.to_owned()];
        let doomed = [RENAMED_KEY, FIRST_KEY, SECOND_KEY].map(String::from);

        self.step(&mut summary, "Creating bucket".into(), ex.create_container(bucket))
            .await;
        self.step(
            &mut summary,
            format!("Uploading image1 to {bucket}"),
            ex.upload_object(&cfg.first_asset, bucket, FIRST_KEY),
        )
        .await;
        self.step(
            &mut summary,
            format!("Uploading image2 to {bucket}"),
            ex.upload_object(&cfg.second_asset, bucket, SECOND_KEY),
        )
        .await;
        self.step(
            &mut summary,
            format!("Uploading multiple files to {bucket}"),
            ex.upload_objects(&assets, bucket, &keys),
        )
        .await;
        self.step(&mut summary, "Listing buckets".into(), ex.list_containers())
            .await;
        self.step(
            &mut summary,
            format!("Listing objects in {bucket}"),
            ex.list_objects(bucket),
        )
        .await;
        self.step(
            &mut summary,
            format!("Renaming {FIRST_KEY} in {bucket}"),
            ex.rename_object(bucket, FIRST_KEY, RENAMED_KEY),
        )
        .await;
        self.step(
            &mut summary,
            format!("Deleting {RENAMED_KEY} from {bucket}"),
            ex.delete_object(bucket, RENAMED_KEY),
        )
        .await;
        self.step(
            &mut summary,
            format!("Deleting multiple files from {bucket}"),
            ex.delete_objects(bucket, &doomed),
        )
        .await;
        self.step(
            &mut summary,
            format!("Deleting bucket {bucket}"),
            ex.delete_container(bucket),
        )
        .await;
        self.step(
            &mut summary,
            "Deleting multiple buckets".into(),
            ex.delete_containers(&cfg.extra_buckets),
        )
        .await;
        self.step(
            &mut summary,
            format!("Downloading {FIRST_KEY} from {bucket}"),
            ex.download_object(bucket, FIRST_KEY, &cfg.download_path),
        )
        .await;

        info!(
            target: TRACING_TARGET_SCENARIO,
            bucket = %bucket,
            steps = summary.total(),
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Run finished"
        );

        summary
    }

    async fn step(
        &self,
        summary: &mut RunSummary,
        banner: String,
        operation: impl Future<Output = StepOutcome>,
    ) {
        info!(target: TRACING_TARGET_SCENARIO, "{banner}");
        summary.record(operation.await);

        info!(target: TRACING_TARGET_SCENARIO, "Wait...");
        tokio::time::sleep(self.config.settle_delay()).await;
    }
}

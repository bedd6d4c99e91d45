//! The storage exerciser.
//!
//! Each operation issues its requests, waits for them to complete, and logs
//! one outcome line per request. Failures are logged and swallowed so a
//! failing step never stops the steps after it.

use std::path::{Path, PathBuf};

use bucketeer_storage::{BucketOperations, ObjectOperations, StorageClient};
use futures::future::join_all;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use crate::TRACING_TARGET_EXERCISER;

/// Whether every request of a step succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed,
}

impl StepOutcome {
    /// Succeeds only if every outcome in `outcomes` succeeded.
    pub fn all(outcomes: impl IntoIterator<Item = StepOutcome>) -> Self {
        if outcomes.into_iter().all(StepOutcome::is_success) {
            StepOutcome::Succeeded
        } else {
            StepOutcome::Failed
        }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self == StepOutcome::Succeeded
    }
}

/// Runs individual bucket and object operations with log-and-continue
/// error handling.
#[derive(Debug, Clone)]
pub struct Exerciser {
    buckets: BucketOperations,
    objects: ObjectOperations,
}

impl Exerciser {
    /// Creates an exerciser over `client`.
    pub fn new(client: &StorageClient) -> Self {
        Self {
            buckets: client.bucket_operations(),
            objects: client.object_operations(),
        }
    }

    /// Creates a container.
    pub async fn create_container(&self, name: &str) -> StepOutcome {
        match self.buckets.create_bucket(name).await {
            Ok(output) => {
                info!(target: TRACING_TARGET_EXERCISER, location = %output.location, "Success");
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }

    /// Reads `path` into memory and uploads it under `key`.
    pub async fn upload_object(&self, path: &Path, container: &str, key: &str) -> StepOutcome {
        match read_local(path).await {
            Some(body) => self.put(container, key, body).await,
            None => StepOutcome::Failed,
        }
    }

    /// Uploads each `paths[i]` under `keys[i]`.
    ///
    /// Files are read in order first, then one upload per pair is issued in
    /// input order and all of them are awaited together.
    pub async fn upload_objects(
        &self,
        paths: &[PathBuf],
        container: &str,
        keys: &[String],
    ) -> StepOutcome {
        let mut outcome = StepOutcome::Succeeded;
        if paths.len() != keys.len() {
            error!(
                target: TRACING_TARGET_EXERCISER,
                paths = paths.len(),
                keys = keys.len(),
                "Error: path and key counts differ, uploading matched pairs only"
            );
            outcome = StepOutcome::Failed;
        }

        let mut bodies = Vec::with_capacity(paths.len().min(keys.len()));
        for (path, key) in paths.iter().zip(keys) {
            match read_local(path).await {
                Some(body) => bodies.push((key.as_str(), body)),
                None => outcome = StepOutcome::Failed,
            }
        }

        let uploads = bodies
            .into_iter()
            .map(|(key, body)| self.put(container, key, body));
        let outcomes = join_all(uploads).await;

        StepOutcome::all(outcomes.into_iter().chain([outcome]))
    }

    /// Lists every container visible to the credentials.
    pub async fn list_containers(&self) -> StepOutcome {
        match self.buckets.list_buckets().await {
            Ok(buckets) => {
                let buckets: Vec<String> = buckets.iter().map(ToString::to_string).collect();
                info!(target: TRACING_TARGET_EXERCISER, buckets = ?buckets, "Success");
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }

    /// Lists the first page of objects in `container`.
    pub async fn list_objects(&self, container: &str) -> StepOutcome {
        match self.objects.list_objects(container).await {
            Ok(objects) => {
                let objects: Vec<String> = objects.iter().map(ToString::to_string).collect();
                info!(
                    target: TRACING_TARGET_EXERCISER,
                    bucket = %container,
                    objects = ?objects,
                    "Success"
                );
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }

    /// Copies `old_key` to `new_key`.
    ///
    /// `old_key` is left in place; deleting it is up to the caller.
    pub async fn rename_object(&self, container: &str, old_key: &str, new_key: &str) -> StepOutcome {
        match self.objects.copy_object(container, old_key, new_key).await {
            Ok(output) => {
                info!(
                    target: TRACING_TARGET_EXERCISER,
                    key = %output.key,
                    etag = ?output.etag,
                    "Success"
                );
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }

    /// Deletes a container. The service rejects non-empty containers.
    pub async fn delete_container(&self, name: &str) -> StepOutcome {
        match self.buckets.delete_bucket(name).await {
            Ok(()) => {
                info!(target: TRACING_TARGET_EXERCISER, bucket = %name, "Success");
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }

    /// Deletes each container in `names` with its own request.
    ///
    /// Uses the same request as [`delete_container`](Self::delete_container),
    /// so non-empty containers are rejected here too.
    pub async fn delete_containers(&self, names: &[String]) -> StepOutcome {
        let deletes = names.iter().map(|name| self.delete_container(name));
        StepOutcome::all(join_all(deletes).await)
    }

    /// Deletes one object.
    pub async fn delete_object(&self, container: &str, key: &str) -> StepOutcome {
        match self.objects.delete_object(container, key).await {
            Ok(()) => {
                info!(target: TRACING_TARGET_EXERCISER, bucket = %container, key = %key, "Success");
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }

    /// Deletes all `keys` with a single batch request.
    pub async fn delete_objects(&self, container: &str, keys: &[String]) -> StepOutcome {
        match self.objects.delete_objects(container, keys).await {
            Ok(output) => {
                info!(
                    target: TRACING_TARGET_EXERCISER,
                    bucket = %container,
                    deleted = ?output.deleted,
                    "Success"
                );
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }

    /// Streams `key` into the local file at `local_path`.
    pub async fn download_object(&self, container: &str, key: &str, local_path: &Path) -> StepOutcome {
        let mut reader = match self.objects.download_object(container, key).await {
            Ok(reader) => reader,
            Err(e) => return log_error(&e),
        };

        let written = async {
            let mut file = tokio::fs::File::create(local_path).await?;
            let written = tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await?;
            Ok::<_, std::io::Error>(written)
        }
        .await;

        match written {
            Ok(bytes) => {
                info!(
                    target: TRACING_TARGET_EXERCISER,
                    path = %local_path.display(),
                    bytes = bytes,
                    "Done"
                );
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }

    async fn put(&self, container: &str, key: &str, body: Vec<u8>) -> StepOutcome {
        match self.objects.upload_object(container, key, body).await {
            Ok(output) => {
                info!(
                    target: TRACING_TARGET_EXERCISER,
                    location = %output.location,
                    "Upload Success"
                );
                StepOutcome::Succeeded
            }
            Err(e) => log_error(&e),
        }
    }
}

/// Reads a whole local file, logging the failure if there is one.
async fn read_local(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(body) => Some(body),
        Err(e) => {
            error!(
                target: TRACING_TARGET_EXERCISER,
                path = %path.display(),
                error = %e,
                "Error"
            );
            None
        }
    }
}

fn log_error(error: &dyn std::error::Error) -> StepOutcome {
    error!(target: TRACING_TARGET_EXERCISER, error = %error, "Error");
    StepOutcome::Failed
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use bucketeer_storage::{MemoryBackend, Request};
    use tempfile::TempDir;
    use tracing::subscriber::DefaultGuard;

    use super::*;

    const BUCKET: &str = "abc-blue-fox-42";

    /// Formatted log output collected by a thread-local subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn install(&self) -> DefaultGuard {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .without_time()
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        /// Lines logged under the exerciser target, in order.
        fn exerciser_lines(&self) -> Vec<String> {
            let output = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
            output
                .lines()
                .filter(|line| line.contains(TRACING_TARGET_EXERCISER))
                .map(str::to_owned)
                .collect()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct Fixture {
        backend: Arc<MemoryBackend>,
        exerciser: Exerciser,
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let backend = Arc::new(MemoryBackend::new());
            let client = StorageClient::from_shared(backend.clone());
            Self {
                backend,
                exerciser: Exerciser::new(&client),
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn asset(&self, name: &str, contents: &[u8]) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, contents).unwrap();
            path
        }

        fn puts(&self) -> Vec<String> {
            self.backend
                .requests()
                .into_iter()
                .filter_map(|request| match request {
                    Request::PutObject { key, .. } => Some(key),
                    _ => None,
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn rename_keeps_the_old_key() {
        let fx = Fixture::new();
        let image = fx.asset("football.jpg", b"ball");
        fx.exerciser.create_container(BUCKET).await;
        fx.exerciser.upload_object(&image, BUCKET, "football.jpg").await;

        let outcome = fx
            .exerciser
            .rename_object(BUCKET, "football.jpg", "football1.jpg")
            .await;

        assert!(outcome.is_success());
        assert_eq!(fx.backend.object(BUCKET, "football.jpg").as_deref(), Some(&b"ball"[..]));
        assert_eq!(fx.backend.object(BUCKET, "football1.jpg").as_deref(), Some(&b"ball"[..]));
    }

    #[tokio::test]
    async fn upload_objects_issues_one_put_per_pair_in_order() {
        let fx = Fixture::new();
        fx.exerciser.create_container(BUCKET).await;
        let paths: Vec<PathBuf> = (0..5)
            .map(|i| fx.asset(&format!("file-{i}.bin"), format!("body {i}").as_bytes()))
            .collect();
        let keys: Vec<String> = (0..5).map(|i| format!("key-{i}")).collect();

        let outcome = fx.exerciser.upload_objects(&paths, BUCKET, &keys).await;

        assert!(outcome.is_success());
        assert_eq!(fx.puts(), keys);
        assert_eq!(fx.backend.object(BUCKET, "key-3").as_deref(), Some(&b"body 3"[..]));
    }

    #[tokio::test]
    async fn upload_objects_skips_unreadable_files() {
        let fx = Fixture::new();
        fx.exerciser.create_container(BUCKET).await;
        let paths = vec![
            fx.asset("a.bin", b"a"),
            fx.dir.path().join("missing.bin"),
            fx.asset("c.bin", b"c"),
        ];
        let keys: Vec<String> = ["a", "b", "c"].map(String::from).to_vec();

        let outcome = fx.exerciser.upload_objects(&paths, BUCKET, &keys).await;

        assert_eq!(outcome, StepOutcome::Failed);
        assert_eq!(fx.puts(), vec!["a".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn upload_objects_with_mismatched_lengths_uploads_pairs() {
        let fx = Fixture::new();
        fx.exerciser.create_container(BUCKET).await;
        let paths = vec![fx.asset("a.bin", b"a"), fx.asset("b.bin", b"b")];
        let keys = vec!["a".to_string()];

        let outcome = fx.exerciser.upload_objects(&paths, BUCKET, &keys).await;

        assert_eq!(outcome, StepOutcome::Failed);
        assert_eq!(fx.puts(), keys);
    }

    #[tokio::test]
    async fn delete_objects_is_a_single_request() {
        let fx = Fixture::new();
        let image = fx.asset("img.jpg", b"img");
        fx.exerciser.create_container(BUCKET).await;
        for key in ["football.jpg", "code.jpg"] {
            fx.exerciser.upload_object(&image, BUCKET, key).await;
        }
        let keys: Vec<String> = ["football1.jpg", "football.jpg", "code.jpg"]
            .map(String::from)
            .to_vec();

        let outcome = fx.exerciser.delete_objects(BUCKET, &keys).await;

        assert!(outcome.is_success());
        let batches = fx
            .backend
            .requests()
            .into_iter()
            .filter(|request| matches!(request, Request::DeleteObjects { .. }))
            .count();
        assert_eq!(batches, 1);
        assert!(fx.backend.object(BUCKET, "football.jpg").is_none());
        assert!(fx.backend.object(BUCKET, "code.jpg").is_none());
    }

    #[tokio::test]
    async fn delete_non_empty_container_fails_and_keeps_contents() {
        let fx = Fixture::new();
        let image = fx.asset("football.jpg", b"ball");
        fx.exerciser.create_container(BUCKET).await;
        fx.exerciser.upload_object(&image, BUCKET, "football.jpg").await;

        let outcome = fx.exerciser.delete_container(BUCKET).await;

        assert_eq!(outcome, StepOutcome::Failed);
        assert!(fx.backend.contains_bucket(BUCKET));
        assert!(fx.backend.object(BUCKET, "football.jpg").is_some());
    }

    #[tokio::test]
    async fn delete_containers_deletes_each_independently() {
        let fx = Fixture::new();
        for name in ["bucket1", "bucket3"] {
            fx.exerciser.create_container(name).await;
        }
        let names: Vec<String> = ["bucket1", "bucket2", "bucket3"].map(String::from).to_vec();

        let outcome = fx.exerciser.delete_containers(&names).await;

        assert_eq!(outcome, StepOutcome::Failed);
        assert!(!fx.backend.contains_bucket("bucket1"));
        assert!(!fx.backend.contains_bucket("bucket3"));
        let deletes = fx
            .backend
            .requests()
            .into_iter()
            .filter(|request| matches!(request, Request::DeleteBucket { .. }))
            .count();
        assert_eq!(deletes, 3);
    }

    #[tokio::test]
    async fn download_writes_local_file() {
        let fx = Fixture::new();
        let image = fx.asset("source.jpg", b"jpeg body");
        fx.exerciser.create_container(BUCKET).await;
        fx.exerciser.upload_object(&image, BUCKET, "football.jpg").await;

        let target = fx.dir.path().join("downloaded.jpg");
        let outcome = fx
            .exerciser
            .download_object(BUCKET, "football.jpg", &target)
            .await;

        assert!(outcome.is_success());
        assert_eq!(std::fs::read(&target).unwrap(), b"jpeg body");
    }

    #[tokio::test]
    async fn download_missing_object_fails_without_creating_file() {
        let fx = Fixture::new();
        fx.exerciser.create_container(BUCKET).await;

        let target = fx.dir.path().join("missing.jpg");
        let outcome = fx
            .exerciser
            .download_object(BUCKET, "missing.jpg", &target)
            .await;

        assert_eq!(outcome, StepOutcome::Failed);
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn crud_lifecycle_leaves_no_container() {
        let fx = Fixture::new();
        let image = fx.asset("football.jpg", b"ball");
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let outcomes = [
            fx.exerciser.create_container(BUCKET).await,
            fx.exerciser.upload_object(&image, BUCKET, "football.jpg").await,
            fx.exerciser.list_objects(BUCKET).await,
            fx.exerciser
                .rename_object(BUCKET, "football.jpg", "football1.jpg")
                .await,
            fx.exerciser.delete_object(BUCKET, "football1.jpg").await,
            fx.exerciser.delete_object(BUCKET, "football.jpg").await,
            fx.exerciser.delete_container(BUCKET).await,
        ];

        assert!(outcomes.iter().all(|o| o.is_success()));
        assert!(!fx.backend.contains_bucket(BUCKET));

        let lines = logs.exerciser_lines();
        assert_eq!(lines.len(), outcomes.len());
        assert!(lines.iter().all(|l| l.contains("INFO") && l.contains("Success")));
    }

    #[tokio::test]
    async fn create_logs_location() {
        let fx = Fixture::new();
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        fx.exerciser.create_container(BUCKET).await;

        let lines = logs.exerciser_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("Success location=/abc-blue-fox-42"));
    }

    #[tokio::test]
    async fn each_upload_logs_its_location() {
        let fx = Fixture::new();
        fx.exerciser.create_container(BUCKET).await;
        let paths = vec![fx.asset("a.jpg", b"a"), fx.asset("b.jpg", b"b")];
        let keys: Vec<String> = ["football.jpg", "code.jpg"].map(String::from).to_vec();
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        fx.exerciser.upload_objects(&paths, BUCKET, &keys).await;

        let lines = logs.exerciser_lines();
        assert_eq!(lines.len(), 2);
        for key in &keys {
            let location = format!("Upload Success location=memory://{BUCKET}/{key}");
            assert!(lines.iter().any(|l| l.contains(&location)), "{location}");
        }
    }

    #[tokio::test]
    async fn download_logs_done() {
        let fx = Fixture::new();
        let image = fx.asset("source.jpg", b"jpeg body");
        fx.exerciser.create_container(BUCKET).await;
        fx.exerciser.upload_object(&image, BUCKET, "football.jpg").await;
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let target = fx.dir.path().join("football.jpg");
        fx.exerciser.download_object(BUCKET, "football.jpg", &target).await;

        let lines = logs.exerciser_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("Done"));
        assert!(lines[0].contains("bytes=9"));
    }

    #[tokio::test]
    async fn failed_request_logs_error() {
        let fx = Fixture::new();
        fx.exerciser.create_container(BUCKET).await;
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let outcome = fx.exerciser.create_container(BUCKET).await;

        assert_eq!(outcome, StepOutcome::Failed);
        let lines = logs.exerciser_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("Error error=Conflict: BucketAlreadyOwnedByYou"));
    }

    #[tokio::test]
    async fn unreadable_upload_source_logs_error() {
        let fx = Fixture::new();
        fx.exerciser.create_container(BUCKET).await;
        let missing = fx.dir.path().join("missing.jpg");
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let outcome = fx.exerciser.upload_object(&missing, BUCKET, "missing.jpg").await;

        assert_eq!(outcome, StepOutcome::Failed);
        let lines = logs.exerciser_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("missing.jpg"));
        assert!(fx.puts().is_empty());
    }

    #[tokio::test]
    async fn container_delete_fails_while_renamed_source_remains() {
        let fx = Fixture::new();
        let image = fx.asset("football.jpg", b"ball");

        fx.exerciser.create_container(BUCKET).await;
        fx.exerciser.upload_object(&image, BUCKET, "football.jpg").await;
        fx.exerciser
            .rename_object(BUCKET, "football.jpg", "football1.jpg")
            .await;
        fx.exerciser.delete_object(BUCKET, "football1.jpg").await;

        assert_eq!(fx.exerciser.delete_container(BUCKET).await, StepOutcome::Failed);
        assert!(fx.backend.object(BUCKET, "football.jpg").is_some());
    }

    #[tokio::test]
    async fn failures_do_not_stop_later_steps() {
        let fx = Fixture::new();

        assert_eq!(fx.exerciser.list_objects(BUCKET).await, StepOutcome::Failed);
        assert_eq!(fx.exerciser.create_container(BUCKET).await, StepOutcome::Succeeded);
    }

    #[test]
    fn step_outcome_all() {
        use StepOutcome::{Failed, Succeeded};

        assert_eq!(StepOutcome::all([Succeeded, Succeeded]), Succeeded);
        assert_eq!(StepOutcome::all([Succeeded, Failed]), Failed);
        assert_eq!(StepOutcome::all([]), Succeeded);
    }
}

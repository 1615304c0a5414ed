//! The sync engine: one full cycle comparing local passes against the
//! remote backend and uploading anything missing.
//!
//! Passes are processed strictly one at a time. Within a pass, the image
//! link inserts and binary uploads for every selected image are issued
//! together and awaited as a single batch. Every failure is contained at
//! the pass level; the cycle itself always runs to completion.

pub mod images;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use passsync_common::{format::format_duration, Error, Result};
use passsync_db::models::DecodedPass;
use passsync_db::pool::{get_conn, DbPool};
use passsync_db::queries::passes;

use crate::remote::{PassImageLink, RemotePass, RemoteStore};

/// Which of the two per-image operations an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOpKind {
    /// Insert of the `passes_images` linking record.
    LinkInsert,
    /// Binary upload into the storage bucket.
    ObjectUpload,
}

/// Result of one image operation, with enough context to attribute the
/// failure: which pass, which image, which operation kind.
#[derive(Debug)]
pub struct ImageOutcome {
    pub pass_id: i64,
    pub image: String,
    pub kind: ImageOpKind,
    pub result: Result<()>,
}

/// How a single pass fared within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassOutcome {
    Synced,
    Skipped,
    Failed,
}

/// Summary of one completed sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration: Duration,
}

/// Orchestrates sync cycles over the local pass store, the local image
/// directory, and the remote backend.
///
/// Dependencies are constructed once at process start and passed in; the
/// engine holds no other state between cycles.
pub struct SyncEngine {
    pool: DbPool,
    remote: Arc<dyn RemoteStore>,
    images_dir: PathBuf,
}

impl SyncEngine {
    pub fn new(pool: DbPool, remote: Arc<dyn RemoteStore>, images_dir: PathBuf) -> Self {
        Self {
            pool,
            remote,
            images_dir,
        }
    }

    /// Run one full synchronization cycle.
    ///
    /// Errors reading the image directory or the pass database abort the
    /// cycle (there is nothing to iterate); everything past that point is
    /// contained per pass.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let started = Instant::now();
        tracing::info!("Syncing...");

        let all_images = images::list_images(&self.images_dir).await?;
        let local_passes = {
            let conn = get_conn(&self.pool)?;
            passes::list_passes(&conn)?
        };
        tracing::debug!(
            passes = local_passes.len(),
            images = all_images.len(),
            "local inventory read"
        );

        let mut report = CycleReport {
            synced: 0,
            skipped: 0,
            failed: 0,
            duration: Duration::ZERO,
        };

        for pass in &local_passes {
            match self.sync_pass(pass, &all_images).await {
                PassOutcome::Synced => report.synced += 1,
                PassOutcome::Skipped => report.skipped += 1,
                PassOutcome::Failed => report.failed += 1,
            }
        }

        report.duration = started.elapsed();
        tracing::info!(
            synced = report.synced,
            skipped = report.skipped,
            failed = report.failed,
            "Done in {}",
            format_duration(report.duration.as_millis() as i64)
        );

        Ok(report)
    }

    /// Sync a single pass: existence check, record insert, image batch.
    ///
    /// Never returns an error; every failure is logged and converted into
    /// the pass outcome.
    async fn sync_pass(&self, pass: &DecodedPass, all_images: &[String]) -> PassOutcome {
        tracing::info!(pass_id = pass.id, "Syncing pass");

        match self.remote.pass_exists(pass.id).await {
            Ok(true) => {
                tracing::warn!(pass_id = pass.id, "Pass already exists, skipping");
                return PassOutcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(pass_id = pass.id, error = %e, "Existence check failed");
                return PassOutcome::Failed;
            }
        }

        let remote_pass = RemotePass::from(pass);
        if let Err(e) = self.remote.insert_pass(&remote_pass).await {
            // No rollback, no retry; images are not attempted this cycle.
            tracing::warn!(pass_id = pass.id, error = %e, "Couldn't insert pass");
            return PassOutcome::Failed;
        }

        let selected = images::images_for_pass(all_images, &pass.file_path);
        tracing::info!(
            pass_id = pass.id,
            count = selected.len(),
            "Uploading images"
        );

        let outcomes = self.upload_images(pass.id, &selected).await;
        let failures: Vec<&ImageOutcome> =
            outcomes.iter().filter(|o| o.result.is_err()).collect();

        if !failures.is_empty() {
            // The pass record stays inserted; this pass is now permanently
            // partial and will be skipped by the existence check next cycle.
            tracing::warn!(pass_id = pass.id, "Couldn't upload all images");
            for outcome in &failures {
                if let Err(e) = &outcome.result {
                    tracing::warn!(
                        pass_id = outcome.pass_id,
                        image = %outcome.image,
                        kind = ?outcome.kind,
                        error = %e,
                        "image operation failed"
                    );
                }
            }
            return PassOutcome::Failed;
        }

        tracing::info!(pass_id = pass.id, "Pass synced successfully");
        PassOutcome::Synced
    }

    /// Issue both operations for every selected image concurrently and
    /// await them as one batch.
    ///
    /// Link inserts and binary uploads have no ordering relationship to
    /// each other, within or across images.
    async fn upload_images(&self, pass_id: i64, selected: &[String]) -> Vec<ImageOutcome> {
        let mut ops: Vec<BoxFuture<'_, ImageOutcome>> = Vec::with_capacity(selected.len() * 2);

        for image in selected {
            let remote = self.remote.clone();
            let image = image.clone();
            ops.push(
                async move {
                    let link = PassImageLink {
                        path: image.clone(),
                        fk_passes_id: pass_id,
                    };
                    let result = remote.insert_image_link(&link).await;
                    ImageOutcome {
                        pass_id,
                        image,
                        kind: ImageOpKind::LinkInsert,
                        result,
                    }
                }
                .boxed(),
            );
        }

        for image in selected {
            let remote = self.remote.clone();
            let path = self.images_dir.join(image);
            let image = image.clone();
            ops.push(
                async move {
                    let result = async {
                        let bytes = tokio::fs::read(&path).await.map_err(Error::from)?;
                        let content_type = images::content_type(&image);
                        remote.upload_image(&image, bytes, &content_type).await
                    }
                    .await;
                    ImageOutcome {
                        pass_id,
                        image,
                        kind: ImageOpKind::ObjectUpload,
                        result,
                    }
                }
                .boxed(),
            );
        }

        join_all(ops).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passsync_db::pool::init_memory_pool;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory remote recording every call, with per-operation failure
    /// switches.
    #[derive(Default)]
    struct MockRemote {
        existing: Mutex<HashSet<i64>>,
        inserted_passes: Mutex<Vec<RemotePass>>,
        inserted_links: Mutex<Vec<PassImageLink>>,
        uploads: Mutex<Vec<(String, usize, String)>>,
        fail_pass_insert: bool,
        fail_uploads_named: Mutex<HashSet<String>>,
    }

    impl MockRemote {
        fn with_existing(ids: &[i64]) -> Self {
            let mock = Self::default();
            mock.existing.lock().unwrap().extend(ids.iter().copied());
            mock
        }
    }

    #[async_trait::async_trait]
    impl RemoteStore for MockRemote {
        async fn pass_exists(&self, id: i64) -> Result<bool> {
            Ok(self.existing.lock().unwrap().contains(&id))
        }

        async fn insert_pass(&self, pass: &RemotePass) -> Result<()> {
            if self.fail_pass_insert {
                return Err(Error::remote("insert rejected"));
            }
            self.existing.lock().unwrap().insert(pass.id);
            self.inserted_passes.lock().unwrap().push(pass.clone());
            Ok(())
        }

        async fn insert_image_link(&self, link: &PassImageLink) -> Result<()> {
            self.inserted_links.lock().unwrap().push(link.clone());
            Ok(())
        }

        async fn upload_image(
            &self,
            name: &str,
            bytes: Vec<u8>,
            content_type: &str,
        ) -> Result<()> {
            if self.fail_uploads_named.lock().unwrap().contains(name) {
                return Err(Error::remote("storage unavailable"));
            }
            self.uploads.lock().unwrap().push((
                name.to_string(),
                bytes.len(),
                content_type.to_string(),
            ));
            Ok(())
        }
    }

    fn seeded_pool(rows: &[(i64, &str)]) -> DbPool {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        conn.execute_batch(
            "CREATE TABLE decoded_passes (
                id INTEGER PRIMARY KEY,
                gain REAL NOT NULL,
                pass_start INTEGER NOT NULL,
                daylight_pass INTEGER NOT NULL,
                has_histogram INTEGER NOT NULL,
                has_polar_az_el INTEGER NOT NULL,
                has_polar_direction INTEGER NOT NULL,
                has_pristine INTEGER NOT NULL,
                has_spectrogram INTEGER NOT NULL,
                file_path TEXT NOT NULL
            );",
        )
        .unwrap();
        for (id, file_path) in rows {
            conn.execute_batch(&format!(
                "INSERT INTO decoded_passes VALUES ({}, 30.0, 1700000000, 0, 0, 0, 0, 0, 0, '{}');",
                id, file_path
            ))
            .unwrap();
        }
        pool
    }

    fn image_dir(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("thumb")).unwrap();
        for name in files {
            std::fs::write(dir.path().join(name), b"pixels").unwrap();
            std::fs::write(dir.path().join("thumb").join(name), b"t").unwrap();
        }
        dir
    }

    fn engine(pool: DbPool, remote: Arc<MockRemote>, dir: &tempfile::TempDir) -> SyncEngine {
        SyncEngine::new(pool, remote, dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn new_pass_is_inserted_with_images() {
        // The scenario from the original deployment: one NOAA pass, two
        // images, a thumbnail copy that must be ignored.
        let pool = seeded_pool(&[(1, "NOAA_2024")]);
        let dir = image_dir(&["NOAA_2024_1.png", "NOAA_2024_2.png"]);
        let remote = Arc::new(MockRemote::default());
        let engine = engine(pool, remote.clone(), &dir);

        let report = engine.run_cycle().await.unwrap();
        assert_eq!(report.synced, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.failed, 0);

        let inserted = remote.inserted_passes.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert!(inserted[0].is_noaa);
        assert!(!inserted[0].is_meteor);

        let mut uploads: Vec<String> = remote
            .uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _, _)| name.clone())
            .collect();
        uploads.sort();
        assert_eq!(uploads, vec!["NOAA_2024_1.png", "NOAA_2024_2.png"]);

        let links = remote.inserted_links.lock().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.fk_passes_id == 1));
    }

    #[tokio::test]
    async fn existing_pass_is_skipped_entirely() {
        let pool = seeded_pool(&[(1, "NOAA_2024")]);
        let dir = image_dir(&["NOAA_2024_1.png"]);
        let remote = Arc::new(MockRemote::with_existing(&[1]));
        let engine = engine(pool, remote.clone(), &dir);

        let report = engine.run_cycle().await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.synced, 0);

        assert!(remote.inserted_passes.lock().unwrap().is_empty());
        assert!(remote.inserted_links.lock().unwrap().is_empty());
        assert!(remote.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_failure_skips_image_work() {
        let pool = seeded_pool(&[(1, "NOAA_2024")]);
        let dir = image_dir(&["NOAA_2024_1.png"]);
        let remote = Arc::new(MockRemote {
            fail_pass_insert: true,
            ..Default::default()
        });
        let engine = engine(pool, remote.clone(), &dir);

        let report = engine.run_cycle().await.unwrap();
        assert_eq!(report.failed, 1);

        assert!(remote.inserted_links.lock().unwrap().is_empty());
        assert!(remote.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_leaves_pass_permanently_partial() {
        let pool = seeded_pool(&[(1, "NOAA_2024")]);
        let dir = image_dir(&["NOAA_2024_1.png", "NOAA_2024_2.png"]);
        let remote = Arc::new(MockRemote::default());
        remote
            .fail_uploads_named
            .lock()
            .unwrap()
            .insert("NOAA_2024_2.png".to_string());
        let engine = engine(pool, remote.clone(), &dir);

        let report = engine.run_cycle().await.unwrap();
        assert_eq!(report.failed, 1);
        // The pass record was not rolled back.
        assert_eq!(remote.inserted_passes.lock().unwrap().len(), 1);

        // A second cycle treats the pass as already synced: no new inserts,
        // no retries of the failed image.
        let links_before = remote.inserted_links.lock().unwrap().len();
        let report = engine.run_cycle().await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(remote.inserted_passes.lock().unwrap().len(), 1);
        assert_eq!(remote.inserted_links.lock().unwrap().len(), links_before);
    }

    #[tokio::test]
    async fn images_attributed_by_prefix_only() {
        let pool = seeded_pool(&[(1, "NOAA-18-a"), (2, "METEOR-M2-c")]);
        let dir = image_dir(&["NOAA-18-a-msa.jpg", "METEOR-M2-c.png", "NOAA-19-b.jpg"]);
        let remote = Arc::new(MockRemote::default());
        let engine = engine(pool, remote.clone(), &dir);

        let report = engine.run_cycle().await.unwrap();
        assert_eq!(report.synced, 2);

        let links = remote.inserted_links.lock().unwrap();
        let for_pass = |id: i64| -> Vec<String> {
            links
                .iter()
                .filter(|l| l.fk_passes_id == id)
                .map(|l| l.path.clone())
                .collect()
        };
        assert_eq!(for_pass(1), vec!["NOAA-18-a-msa.jpg"]);
        assert_eq!(for_pass(2), vec!["METEOR-M2-c.png"]);
        // NOAA-19-b.jpg matches no pass and is uploaded nowhere.
        assert_eq!(remote.uploads.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn upload_carries_bytes_and_content_type() {
        let pool = seeded_pool(&[(1, "NOAA_2024")]);
        let dir = image_dir(&["NOAA_2024_1.png"]);
        let remote = Arc::new(MockRemote::default());
        let engine = engine(pool, remote.clone(), &dir);

        engine.run_cycle().await.unwrap();

        let uploads = remote.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        let (name, len, content_type) = &uploads[0];
        assert_eq!(name, "NOAA_2024_1.png");
        assert_eq!(*len, b"pixels".len());
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn pass_with_no_images_still_syncs() {
        let pool = seeded_pool(&[(1, "NOAA_2024")]);
        let dir = image_dir(&[]);
        let remote = Arc::new(MockRemote::default());
        let engine = engine(pool, remote.clone(), &dir);

        let report = engine.run_cycle().await.unwrap();
        assert_eq!(report.synced, 1);
        assert!(remote.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_images_dir_aborts_cycle() {
        let pool = seeded_pool(&[]);
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("missing");
        let remote = Arc::new(MockRemote::default());
        let engine = SyncEngine::new(pool, remote, gone);

        assert!(engine.run_cycle().await.is_err());
    }
}

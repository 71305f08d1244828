//! Folding batch result archives into per-URL click totals.

use std::sync::Arc;

use crate::application::retry::RetryingCaller;
use crate::domain::entities::{ClickJob, UrlAggregate, UrlTotals};
use crate::domain::gateways::ArchiveSource;
use crate::error::AppError;
use crate::infrastructure::archive::{
    ArchiveEntry, for_each_file_entry, parse_members, parse_operation_results,
};

/// Downloads each completed job's archive and accumulates its members.
pub struct ArchiveAggregator<A: ArchiveSource> {
    source: Arc<A>,
    caller: RetryingCaller,
}

impl<A: ArchiveSource> ArchiveAggregator<A> {
    pub fn new(source: Arc<A>, caller: RetryingCaller) -> Self {
        Self { source, caller }
    }

    /// Aggregates one URL's archive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotReady`] if the job was never polled to
    /// completion. Download and decompression failures propagate.
    pub async fn aggregate(&self, job: &ClickJob) -> Result<UrlTotals, AppError> {
        let location = job
            .result_location
            .as_deref()
            .ok_or_else(|| AppError::not_ready(format!("batch {} has no result", job.job_id)))?;

        let bytes = self.caller.call(|| self.source.fetch(location)).await?;
        let aggregate = aggregate_archive(&bytes)?;

        let totals = aggregate.finalize(job.url.clone());
        tracing::info!(
            url = %totals.url,
            total_clicks = totals.total_clicks,
            unique_recipients = totals.unique_recipients,
            "Aggregated click members"
        );
        Ok(totals)
    }

    /// Aggregates every job, one after another, preserving job order.
    ///
    /// # Errors
    ///
    /// See [`Self::aggregate`].
    pub async fn aggregate_all(&self, jobs: &[ClickJob]) -> Result<Vec<UrlTotals>, AppError> {
        let mut totals = Vec::with_capacity(jobs.len());
        for job in jobs {
            totals.push(self.aggregate(job).await?);
        }
        Ok(totals)
    }
}

/// Folds every member record of an archive into one aggregate.
///
/// Entries are decoded and folded one at a time. Entries that are not JSON
/// operation lists, operations without a `response`, and responses that are
/// not member pages are skipped: failed sub-requests and the provider's
/// bookkeeping files share the archive with real results and carry nothing
/// to count.
///
/// # Errors
///
/// Returns [`AppError::Archive`] only when the archive itself is unreadable.
pub fn aggregate_archive(bytes: &[u8]) -> Result<UrlAggregate, AppError> {
    let mut aggregate = UrlAggregate::new();
    for_each_file_entry(bytes, |entry| fold_entry(&mut aggregate, entry))?;
    Ok(aggregate)
}

fn fold_entry(aggregate: &mut UrlAggregate, entry: ArchiveEntry) {
    let results = match parse_operation_results(&entry.contents) {
        Ok(results) => results,
        Err(e) => {
            tracing::debug!(path = %entry.path, error = %e, "Skipping non-result archive entry");
            return;
        }
    };

    for result in results {
        let Some(response) = result.response else {
            tracing::debug!(path = %entry.path, "Skipping operation without response");
            continue;
        };

        match parse_members(&response) {
            Ok(page) => {
                for member in page.members {
                    aggregate.record(&member.email_address, member.clicks);
                }
            }
            Err(e) => {
                tracing::debug!(
                    path = %entry.path,
                    operation_id = ?result.operation_id,
                    status_code = ?result.status_code,
                    error = %e,
                    "Skipping operation with unexpected response"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateways::MockArchiveSource;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use serde_json::json;
    use std::time::Duration;
    use tar::{Builder, EntryType, Header};

    fn operation(link: &str, members: serde_json::Value) -> serde_json::Value {
        json!({
            "status_code": 200,
            "operation_id": link,
            "response": json!({ "members": members }).to_string(),
        })
    }

    fn archive(files: Vec<(&str, String)>) -> Vec<u8> {
        let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

        let mut dir = Header::new_gnu();
        dir.set_entry_type(EntryType::Directory);
        dir.set_size(0);
        dir.set_mode(0o755);
        builder.append_data(&mut dir, "out/", std::io::empty()).unwrap();

        for (name, body) in files {
            let mut header = Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, name, body.as_bytes()).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_aggregate_across_links_sharing_url() {
        let bytes = archive(vec![
            (
                "out/1.json",
                json!([operation(
                    "l1",
                    json!([
                        {"email_address": "a@example.com", "clicks": 3},
                        {"email_address": "b@example.com", "clicks": 1}
                    ])
                )])
                .to_string(),
            ),
            (
                "out/2.json",
                json!([operation(
                    "l2",
                    json!([{"email_address": "a@example.com", "clicks": 2}])
                )])
                .to_string(),
            ),
        ]);

        let agg = aggregate_archive(&bytes).unwrap();

        assert_eq!(agg.total_clicks(), 6);
        assert_eq!(agg.unique_recipients(), 2);
        assert!(agg.unique_recipients() <= agg.total_clicks());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let bytes = archive(vec![
            ("out/readme.txt", "not json at all".to_string()),
            ("out/meta.json", json!({"batch": "b1"}).to_string()),
            ("out/failed.json", json!([{"status_code": 404}]).to_string()),
            (
                "out/garbled.json",
                json!([{"status_code": 200, "response": "{oops"}]).to_string(),
            ),
            (
                "out/ok.json",
                json!([operation(
                    "l1",
                    json!([{"email_address": "c@example.com", "clicks": 5}])
                )])
                .to_string(),
            ),
        ]);

        let agg = aggregate_archive(&bytes).unwrap();

        assert_eq!(agg.total_clicks(), 5);
        assert_eq!(agg.unique_recipients(), 1);
    }

    #[test]
    fn test_member_without_clicks_skips_its_operation() {
        let bytes = archive(vec![
            (
                "out/1.json",
                json!([operation(
                    "l1",
                    json!([
                        {"email_address": "a@example.com"},
                        {"email_address": "b@example.com", "clicks": 2}
                    ])
                )])
                .to_string(),
            ),
            (
                "out/2.json",
                json!([operation(
                    "l2",
                    json!([
                        {"email_address": "c@example.com", "clicks": 0},
                        {"email_address": "d@example.com", "clicks": 1}
                    ])
                )])
                .to_string(),
            ),
        ]);

        let agg = aggregate_archive(&bytes).unwrap();

        assert_eq!(agg.total_clicks(), 1);
        assert_eq!(agg.unique_recipients(), 1);
        assert!(agg.unique_recipients() <= agg.total_clicks());
    }

    #[test]
    fn test_every_operation_in_a_file_counts() {
        let bytes = archive(vec![(
            "out/1.json",
            json!([
                operation("l1", json!([{"email_address": "a@example.com", "clicks": 1}])),
                operation("l2", json!([{"email_address": "b@example.com", "clicks": 1}]))
            ])
            .to_string(),
        )]);

        let agg = aggregate_archive(&bytes).unwrap();

        assert_eq!(agg.total_clicks(), 2);
        assert_eq!(agg.unique_recipients(), 2);
    }

    #[tokio::test]
    async fn test_aggregate_job() {
        let bytes = archive(vec![(
            "out/1.json",
            json!([operation(
                "l1",
                json!([{"email_address": "a@example.com", "clicks": 7}])
            )])
            .to_string(),
        )]);

        let mut mock = MockArchiveSource::new();
        mock.expect_fetch()
            .withf(|location| location == "https://archive.example/b1")
            .times(1)
            .returning(move |_| Ok(bytes.clone()));

        let aggregator =
            ArchiveAggregator::new(Arc::new(mock), RetryingCaller::new(Duration::ZERO, None));
        let mut job = ClickJob::new("https://www.youtube.com/", "b1", 1);
        job.result_location = Some("https://archive.example/b1".to_string());

        let totals = aggregator.aggregate(&job).await.unwrap();

        assert_eq!(totals.url, "https://www.youtube.com/");
        assert_eq!(totals.total_clicks, 7);
        assert_eq!(totals.unique_recipients, 1);
    }

    #[tokio::test]
    async fn test_aggregate_requires_result_location() {
        let aggregator = ArchiveAggregator::new(
            Arc::new(MockArchiveSource::new()),
            RetryingCaller::new(Duration::ZERO, None),
        );

        let result = aggregator
            .aggregate(&ClickJob::new("https://a.example/", "b1", 1))
            .await;

        assert!(matches!(result, Err(AppError::NotReady(_))));
    }
}

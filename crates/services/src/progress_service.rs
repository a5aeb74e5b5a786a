use std::sync::Arc;

use storage::repository::{ProgressRepository, ProgressUpdate};
use tutor_core::Clock;
use tutor_core::weakness::WeaknessReport;

use crate::error::ProgressError;

/// Records scoring outcomes into the longitudinal per-topic progress store
/// and reads back weak-area hints for quiz personalization.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, repo }
    }

    /// Merge one scoring pass into the topic's record.
    ///
    /// Fire-and-complete: the store unions the new tags into whatever it
    /// already holds and overwrites the score; nothing meaningful comes
    /// back beyond success.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if persistence fails.
    pub async fn record_quiz_outcome(
        &self,
        topic: &str,
        report: &WeaknessReport,
        score: u8,
    ) -> Result<(), ProgressError> {
        self.repo
            .merge_progress(ProgressUpdate {
                topic: topic.to_string(),
                report: report.clone(),
                score,
                updated_at: self.clock.now(),
            })
            .await?;
        Ok(())
    }

    /// Weak-area tags accumulated for a topic, for seeding generation
    /// requests. An untracked topic yields no hints.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the store cannot be read.
    pub async fn weak_area_hints(&self, topic: &str) -> Result<Vec<String>, ProgressError> {
        let record = self.repo.get_progress(topic).await?;
        Ok(record.map(|r| r.weak_areas).unwrap_or_default())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryProgressRepository;
    use tutor_core::time::fixed_now;

    fn report(weak: &[&str], strong: &[&str]) -> WeaknessReport {
        WeaknessReport {
            weak_areas: weak.iter().map(|s| (*s).to_string()).collect(),
            strengths: strong.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn recorded_outcome_is_stamped_by_the_service_clock() {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let service = ProgressService::new(Clock::fixed(fixed_now()), Arc::clone(&repo) as _);

        service
            .record_quiz_outcome("rust", &report(&["lifetimes"], &["ownership"]), 70)
            .await
            .unwrap();

        let record = repo.get_progress("rust").await.unwrap().unwrap();
        assert_eq!(record.updated_at, fixed_now());
        assert_eq!(record.last_score, 70);
    }

    #[tokio::test]
    async fn hints_come_from_accumulated_weak_areas() {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let service = ProgressService::new(Clock::fixed(fixed_now()), Arc::clone(&repo) as _);

        assert!(service.weak_area_hints("rust").await.unwrap().is_empty());

        service
            .record_quiz_outcome("rust", &report(&["lifetimes"], &[]), 40)
            .await
            .unwrap();
        service
            .record_quiz_outcome("rust", &report(&["traits"], &[]), 55)
            .await
            .unwrap();

        assert_eq!(
            service.weak_area_hints("rust").await.unwrap(),
            vec!["lifetimes".to_string(), "traits".to_string()]
        );
    }
}

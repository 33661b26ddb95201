use crate::{
    data::{CourseId, roster_student::RosterStudent},
    error::RosterResult,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

pub type CachedRoster = Arc<[RosterStudent]>;

#[derive(Debug, Default)]
struct CourseEntry {
    /// Bumped by every invalidation.
    generation: u64,
    /// Keyed by the caller the backend authorised, never shared between callers.
    by_caller: HashMap<Arc<str>, CachedRoster>,
}

/// Last-seen roster list per course and caller.
///
/// Entries only ever come from a successful backend fetch made with that caller's credentials,
/// and a successful mutation drops every entry for the course so the next read goes back to the
/// backend. A fetch that was already running when the course was invalidated is handed back to
/// its caller but never stored.
#[derive(Debug, Default, Clone)]
pub struct RosterCache {
    courses: Arc<RwLock<HashMap<CourseId, CourseEntry>>>,
}

impl RosterCache {
    pub async fn get(&self, course_id: CourseId, caller: &str) -> Option<CachedRoster> {
        self.courses
            .read()
            .await
            .get(&course_id)
            .and_then(|entry| entry.by_caller.get(caller))
            .cloned()
    }

    async fn generation(&self, course_id: CourseId) -> u64 {
        self.courses
            .read()
            .await
            .get(&course_id)
            .map_or(0, |entry| entry.generation)
    }

    pub async fn get_or_fetch<F, Fut>(
        &self,
        course_id: CourseId,
        caller: &str,
        fetch: F,
    ) -> RosterResult<CachedRoster>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RosterResult<Vec<RosterStudent>>>,
    {
        if let Some(cached) = self.get(course_id, caller).await {
            trace!(%course_id, caller, "roster cache hit");
            return Ok(cached);
        }

        let started_at = self.generation(course_id).await;
        // the lock is not held across the fetch
        let fetched: CachedRoster = fetch().await?.into();

        let mut courses = self.courses.write().await;
        let entry = courses.entry(course_id).or_default();
        if entry.generation == started_at {
            entry.by_caller.insert(Arc::from(caller), fetched.clone());
            debug!(%course_id, caller, len = fetched.len(), "roster cache filled");
        } else {
            debug!(%course_id, caller, "course invalidated mid-fetch, not caching");
        }

        Ok(fetched)
    }

    pub async fn invalidate(&self, course_id: CourseId) {
        let mut courses = self.courses.write().await;
        let entry = courses.entry(course_id).or_default();
        entry.generation = entry.generation.wrapping_add(1);
        if !entry.by_caller.is_empty() {
            entry.by_caller.clear();
            debug!(%course_id, "roster cache invalidated");
        }
    }
}

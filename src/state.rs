use crate::{
    auth::{CurrentUser, Roles},
    backend::RosterBackend,
    cache::{CachedRoster, RosterCache},
    config::RuntimeConfiguration,
    data::CourseId,
    error::RosterResult,
};
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;

#[derive(Clone)]
pub struct RosterState {
    backend: Arc<dyn RosterBackend>,
    cache: RosterCache,
    config: RuntimeConfiguration,
}

impl RosterState {
    pub fn new(backend: Arc<dyn RosterBackend>, config: RuntimeConfiguration) -> Self {
        Self {
            backend,
            cache: RosterCache::default(),
            config,
        }
    }

    pub fn backend(&self) -> &dyn RosterBackend {
        self.backend.as_ref()
    }

    pub const fn cache(&self) -> &RosterCache {
        &self.cache
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    /// The course's roster as the backend shows it to `user`, from the cache when we have it.
    pub async fn roster_for_course(
        &self,
        course_id: CourseId,
        user: &CurrentUser,
    ) -> RosterResult<CachedRoster> {
        let backend = self.backend.as_ref();
        let credentials = &user.credentials;
        let fetch = move || backend.list_for_course(course_id, credentials);

        match user.cache_identity() {
            Some(caller) => self.cache.get_or_fetch(course_id, caller, fetch).await,
            None => Ok(fetch().await?.into()),
        }
    }

    #[allow(clippy::unused_self)]
    pub fn render(&self, user: &CurrentUser, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Frontiers Roster" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    (render_nav(user))
                    (markup)
                }
            }
        }
    }
}

fn render_nav(user: &CurrentUser) -> Markup {
    html! {
        nav class="w-full bg-gray-800 px-8 py-4 mb-8 flex flex-row justify-between" {
            span class="font-semibold" {"Frontiers"}
            @if let Some(summary) = &user.user {
                span class="text-gray-300" title=(summary.email) {
                    (summary.full_name)
                    @if user.can(Roles::ADMIN) {
                        " (admin)"
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for RosterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterState")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

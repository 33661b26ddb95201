use crate::{
    auth::{BackendCredentials, CurrentUserResponse},
    backend::RosterBackend,
    config::BackendConfig,
    data::{
        CourseId, RosterStudentId,
        roster_student::{RosterStudent, RosterStudentPayload},
    },
    error::{
        BackendDecodeSnafu, BackendRequestSnafu, BackendStatusSnafu, BuildClientSnafu,
        RosterResult,
    },
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header::COOKIE};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct HttpRosterBackend {
    http: Client,
    config: Arc<BackendConfig>,
}

impl HttpRosterBackend {
    pub fn new(config: Arc<BackendConfig>) -> RosterResult<Self> {
        let http = Client::builder().build().context(BuildClientSnafu)?;
        Ok(Self { http, config })
    }

    async fn send(
        builder: RequestBuilder,
        credentials: &BackendCredentials,
    ) -> RosterResult<Response> {
        let builder = match credentials.cookie() {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        };

        let response = builder.send().await.context(BackendRequestSnafu)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message_from_body(&body);
            debug!(%status, ?message, "backend rejected request");
            return BackendStatusSnafu { status, message }.fail();
        }

        Ok(response)
    }

    async fn send_json<R: DeserializeOwned>(
        builder: RequestBuilder,
        credentials: &BackendCredentials,
    ) -> RosterResult<R> {
        Self::send(builder, credentials)
            .await?
            .json()
            .await
            .context(BackendDecodeSnafu)
    }
}

/// Pulls a human-readable message out of a failed response.
///
/// The backend's exception handlers answer with `{"type": ..., "message": ...}`, while some
/// endpoints use `{"error": ...}`; `error` wins when both are present. Anything else, including
/// an empty body, has no usable message.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .into_iter()
        .filter_map(|key| value.get(key)?.as_str())
        .find(|msg| !msg.trim().is_empty())
        .map(ToString::to_string)
}

#[async_trait]
impl RosterBackend for HttpRosterBackend {
    async fn current_user(
        &self,
        credentials: &BackendCredentials,
    ) -> RosterResult<CurrentUserResponse> {
        let url = self.config.endpoint("/api/currentUser");
        Self::send_json(self.http.get(url), credentials).await
    }

    async fn list_for_course(
        &self,
        course_id: CourseId,
        credentials: &BackendCredentials,
    ) -> RosterResult<Vec<RosterStudent>> {
        let url = self.config.endpoint("/api/rosterstudents/course");
        let builder = self.http.get(url).query(&[("courseId", course_id.0)]);
        Self::send_json(builder, credentials).await
    }

    async fn create(
        &self,
        payload: &RosterStudentPayload,
        credentials: &BackendCredentials,
    ) -> RosterResult<RosterStudent> {
        let url = self.config.endpoint("/api/rosterstudents/post");
        Self::send_json(self.http.post(url).json(payload), credentials).await
    }

    async fn update(
        &self,
        id: RosterStudentId,
        payload: &RosterStudentPayload,
        credentials: &BackendCredentials,
    ) -> RosterResult<RosterStudent> {
        let url = self.config.endpoint(&format!("/api/rosterstudents/post/{id}"));
        Self::send_json(self.http.put(url).json(payload), credentials).await
    }

    async fn delete(
        &self,
        id: RosterStudentId,
        credentials: &BackendCredentials,
    ) -> RosterResult<()> {
        let url = self.config.endpoint("/api/rosterstudents/delete");
        let builder = self.http.delete(url).query(&[("id", id.0)]);
        Self::send(builder, credentials).await.map(|_| ())
    }
}

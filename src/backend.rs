use crate::{
    auth::{BackendCredentials, CurrentUserResponse},
    data::{
        CourseId, RosterStudentId,
        roster_student::{RosterStudent, RosterStudentPayload},
    },
    error::RosterResult,
};
use async_trait::async_trait;

pub mod http;
#[cfg(test)]
pub mod mock;

/// The REST service that owns roster students. Every call carries the browser's credentials along.
#[async_trait]
pub trait RosterBackend: Send + Sync + 'static {
    async fn current_user(
        &self,
        credentials: &BackendCredentials,
    ) -> RosterResult<CurrentUserResponse>;

    async fn list_for_course(
        &self,
        course_id: CourseId,
        credentials: &BackendCredentials,
    ) -> RosterResult<Vec<RosterStudent>>;

    async fn create(
        &self,
        payload: &RosterStudentPayload,
        credentials: &BackendCredentials,
    ) -> RosterResult<RosterStudent>;

    async fn update(
        &self,
        id: RosterStudentId,
        payload: &RosterStudentPayload,
        credentials: &BackendCredentials,
    ) -> RosterResult<RosterStudent>;

    async fn delete(
        &self,
        id: RosterStudentId,
        credentials: &BackendCredentials,
    ) -> RosterResult<()>;
}

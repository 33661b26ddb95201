use crate::{
    auth::{BackendCredentials, CurrentUserResponse, Roles},
    backend::RosterBackend,
    data::{
        CourseId, RosterStudentId,
        roster_student::{RosterStudent, RosterStudentPayload},
    },
    error::{BackendStatusSnafu, RosterResult},
};
use async_trait::async_trait;
use axum::http::StatusCode;
use std::{collections::HashMap, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    CurrentUser,
    List(CourseId),
    Create(RosterStudentPayload),
    Update(RosterStudentId, RosterStudentPayload),
    Delete(RosterStudentId),
}

/// In-memory stand-in for the REST service.
#[derive(Debug, Default)]
pub struct MockBackend {
    students: Mutex<Vec<RosterStudent>>,
    current_user_json: Mutex<Option<String>>,
    sessions: Mutex<HashMap<String, String>>,
    staff_only_lists: Mutex<bool>,
    failure: Mutex<Option<(StatusCode, Option<String>)>>,
    list_failure: Mutex<Option<(StatusCode, Option<String>)>>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockBackend {
    pub fn with_students(students: Vec<RosterStudent>) -> Self {
        Self {
            students: Mutex::new(students),
            ..Self::default()
        }
    }

    pub fn set_current_user_json(&self, json: &str) {
        *self.current_user_json.lock().unwrap() = Some(json.to_string());
    }

    /// Answers `/api/currentUser` with `json` for requests carrying exactly this cookie.
    pub fn add_session(&self, cookie: &str, json: &str) {
        self.sessions
            .lock()
            .unwrap()
            .insert(cookie.to_string(), json.to_string());
    }

    /// Only admins and professors may list a course, as on the real service.
    pub fn restrict_lists_to_staff(&self) {
        *self.staff_only_lists.lock().unwrap() = true;
    }

    /// Every later list request answers with this status and message.
    pub fn fail_lists_with(&self, status: StatusCode, message: Option<&str>) {
        *self.list_failure.lock().unwrap() = Some((status, message.map(ToString::to_string)));
    }

    /// Every later mutation answers with this status and message.
    pub fn fail_with(&self, status: StatusCode, message: Option<&str>) {
        *self.failure.lock().unwrap() = Some((status, message.map(ToString::to_string)));
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<BackendCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    BackendCall::Create(_) | BackendCall::Update(..) | BackendCall::Delete(_)
                )
            })
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::List(_)))
            .count()
    }

    pub fn students(&self) -> Vec<RosterStudent> {
        self.students.lock().unwrap().clone()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self) -> RosterResult<()> {
        match self.failure.lock().unwrap().clone() {
            Some((status, message)) => BackendStatusSnafu { status, message }.fail(),
            None => Ok(()),
        }
    }

    fn current_user_json_for(&self, credentials: &BackendCredentials) -> Option<String> {
        credentials
            .cookie()
            .and_then(|cookie| self.sessions.lock().unwrap().get(cookie).cloned())
            .or_else(|| self.current_user_json.lock().unwrap().clone())
    }

    fn check_list_allowed(&self, credentials: &BackendCredentials) -> RosterResult<()> {
        if let Some((status, message)) = self.list_failure.lock().unwrap().clone() {
            return BackendStatusSnafu { status, message }.fail();
        }
        if !*self.staff_only_lists.lock().unwrap() {
            return Ok(());
        }

        let is_staff = self.current_user_json_for(credentials).is_some_and(|json| {
            serde_json::from_str::<CurrentUserResponse>(&json)
                .unwrap()
                .into_current_user(credentials.clone())
                .can_any(Roles::ADMIN | Roles::PROFESSOR)
        });
        snafu::ensure!(
            is_staff,
            BackendStatusSnafu {
                status: StatusCode::FORBIDDEN,
                message: Some("Access is denied".to_string()),
            }
        );
        Ok(())
    }
}

fn from_payload(id: RosterStudentId, payload: &RosterStudentPayload) -> RosterStudent {
    RosterStudent {
        id,
        course_id: payload.course_id,
        student_id: payload.student_id.clone(),
        first_name: payload.first_name.clone(),
        last_name: payload.last_name.clone(),
        email: payload.email.clone(),
        enrollment_code: None,
        user_id: None,
        user_github_id: None,
        user_github_login: None,
        roster_status: None,
        org_status: None,
    }
}

#[async_trait]
impl RosterBackend for MockBackend {
    async fn current_user(
        &self,
        credentials: &BackendCredentials,
    ) -> RosterResult<CurrentUserResponse> {
        self.record(BackendCall::CurrentUser);
        match self.current_user_json_for(credentials) {
            Some(json) => Ok(serde_json::from_str(&json).unwrap()),
            None => BackendStatusSnafu {
                status: StatusCode::UNAUTHORIZED,
                message: None::<String>,
            }
            .fail(),
        }
    }

    async fn list_for_course(
        &self,
        course_id: CourseId,
        credentials: &BackendCredentials,
    ) -> RosterResult<Vec<RosterStudent>> {
        self.record(BackendCall::List(course_id));
        self.check_list_allowed(credentials)?;
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .filter(|student| student.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        payload: &RosterStudentPayload,
        _credentials: &BackendCredentials,
    ) -> RosterResult<RosterStudent> {
        self.record(BackendCall::Create(payload.clone()));
        self.check_failure()?;

        let mut students = self.students.lock().unwrap();
        let next_id = students.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
        let created = from_payload(RosterStudentId(next_id), payload);
        students.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: RosterStudentId,
        payload: &RosterStudentPayload,
        _credentials: &BackendCredentials,
    ) -> RosterResult<RosterStudent> {
        self.record(BackendCall::Update(id, payload.clone()));
        self.check_failure()?;

        let mut students = self.students.lock().unwrap();
        let Some(existing) = students.iter_mut().find(|s| s.id == id) else {
            return BackendStatusSnafu {
                status: StatusCode::NOT_FOUND,
                message: Some(format!("RosterStudent with id {id} not found")),
            }
            .fail();
        };
        *existing = from_payload(id, payload);
        Ok(existing.clone())
    }

    async fn delete(
        &self,
        id: RosterStudentId,
        _credentials: &BackendCredentials,
    ) -> RosterResult<()> {
        self.record(BackendCall::Delete(id));
        self.check_failure()?;

        self.students.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }
}

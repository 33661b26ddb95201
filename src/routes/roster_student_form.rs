use crate::{
    auth::{CurrentUser, Roles},
    data::{
        CourseId, RosterStudentId,
        roster_student::{RosterStudent, RosterStudentFields},
    },
    error::{MissingRosterStudentSnafu, RosterResult},
    maud_conveniences::{error_banner, form_submit_button, text_form_element, title},
    routes::{
        internal_roster_student_path, internal_roster_students_path, navigate_to,
        roster_students_path,
    },
    state::RosterState,
};
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use snafu::OptionExt;

const STUDENT_ID_REQUIRED: &str = "Student ID is required";
const SAVE_FALLBACK: &str = "Error saving student";
const SAVE_NOT_ALLOWED: &str = "Only admins can change roster students";

/// Everything the form needs to draw itself, including the outcome of a previous attempt.
pub struct RosterStudentForm<'a> {
    pub course_id: CourseId,
    /// Set when editing an existing record, decides between create and update.
    pub id: Option<RosterStudentId>,
    pub fields: &'a RosterStudentFields,
    pub button_label: &'a str,
    pub student_id_error: Option<&'a str>,
    pub banner: Option<&'a str>,
}

impl RosterStudentForm<'_> {
    pub fn render(&self) -> Markup {
        let (hx_post, hx_put) = match self.id {
            Some(id) => (None, Some(internal_roster_student_path(self.course_id, id))),
            None => (Some(internal_roster_students_path(self.course_id)), None),
        };

        html! {
            form hx-post=[hx_post] hx-put=[hx_put] hx-target="this" hx-swap="outerHTML" hx-disabled-elt="find button[type='submit']" data-testid="RosterStudentForm" class="p-4" {
                (text_form_element("studentId", "Student ID", &self.fields.student_id, self.student_id_error))
                (text_form_element("firstName", "First Name", &self.fields.first_name, None))
                (text_form_element("lastName", "Last Name", &self.fields.last_name, None))
                (text_form_element("email", "Email", &self.fields.email, None))

                @if let Some(banner) = self.banner {
                    (error_banner(banner))
                }

                (form_submit_button(self.button_label))
            }
        }
    }
}

pub fn student_id_error(fields: &RosterStudentFields) -> Option<&'static str> {
    fields
        .student_id
        .trim()
        .is_empty()
        .then_some(STUDENT_ID_REQUIRED)
}

fn form_page(state: &RosterState, user: &CurrentUser, heading: &str, form: &RosterStudentForm) -> Response {
    state
        .render(
            user,
            html! {
                div class="bg-gray-800 shadow-md rounded px-8 pt-6 pb-8 mb-4 w-full max-w-md" {
                    (title(heading))
                    (form.render())
                    a href=(roster_students_path(form.course_id)) class="text-gray-400 hover:text-gray-200 text-sm" {"Back to roster"}
                }
            },
        )
        .into_response()
}

pub async fn get_new_roster_student_form(
    State(state): State<RosterState>,
    user: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> RosterResult<Response> {
    if !user.is_logged_in() {
        return Ok(Redirect::to(state.config().login_url()).into_response());
    }
    user.ensure_can(Roles::ADMIN)?;

    let fields = RosterStudentFields::default();
    Ok(form_page(
        &state,
        &user,
        "Create New Roster Student",
        &RosterStudentForm {
            course_id,
            id: None,
            fields: &fields,
            button_label: "Create",
            student_id_error: None,
            banner: None,
        },
    ))
}

pub async fn get_edit_roster_student_form(
    State(state): State<RosterState>,
    user: CurrentUser,
    Path((course_id, id)): Path<(CourseId, RosterStudentId)>,
) -> RosterResult<Response> {
    if !user.is_logged_in() {
        return Ok(Redirect::to(state.config().login_url()).into_response());
    }
    user.ensure_can(Roles::ADMIN)?;

    let students = state.roster_for_course(course_id, &user).await?;
    let student: &RosterStudent = students
        .iter()
        .find(|student| student.id == id)
        .context(MissingRosterStudentSnafu { id })?;

    let fields = RosterStudentFields::from(student);
    Ok(form_page(
        &state,
        &user,
        "Edit Roster Student",
        &RosterStudentForm {
            course_id,
            id: Some(id),
            fields: &fields,
            button_label: "Update",
            student_id_error: None,
            banner: None,
        },
    ))
}

pub async fn internal_post_roster_student(
    State(state): State<RosterState>,
    user: CurrentUser,
    Path(course_id): Path<CourseId>,
    Form(fields): Form<RosterStudentFields>,
) -> Response {
    submit(&state, &user, course_id, None, fields).await
}

pub async fn internal_put_roster_student(
    State(state): State<RosterState>,
    user: CurrentUser,
    Path((course_id, id)): Path<(CourseId, RosterStudentId)>,
    Form(fields): Form<RosterStudentFields>,
) -> Response {
    submit(&state, &user, course_id, Some(id), fields).await
}

async fn submit(
    state: &RosterState,
    user: &CurrentUser,
    course_id: CourseId,
    id: Option<RosterStudentId>,
    fields: RosterStudentFields,
) -> Response {
    let button_label = if id.is_some() { "Update" } else { "Create" };
    let rerender = |student_id_error: Option<&str>, banner: Option<&str>| {
        RosterStudentForm {
            course_id,
            id,
            fields: &fields,
            button_label,
            student_id_error,
            banner,
        }
        .render()
        .into_response()
    };

    if !user.can(Roles::ADMIN) {
        warn!(roles = ?user.roles, %course_id, ?id, "Refusing to save roster student");
        return rerender(None, Some(SAVE_NOT_ALLOWED));
    }

    if let Some(error) = student_id_error(&fields) {
        return rerender(Some(error), None);
    }

    let payload = fields.clone().into_payload(course_id);
    let saved = match id {
        Some(id) => state.backend().update(id, &payload, &user.credentials).await,
        None => state.backend().create(&payload, &user.credentials).await,
    };

    match saved {
        Ok(saved) => {
            info!(id = %saved.id, %course_id, "Saved roster student");
            state.cache().invalidate(course_id).await;
            navigate_to(roster_students_path(course_id))
        }
        Err(e) => {
            warn!(?e, %course_id, ?id, "Unable to save roster student");
            rerender(None, Some(e.backend_message().unwrap_or(SAVE_FALLBACK)))
        }
    }
}

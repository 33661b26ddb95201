use crate::{
    data::{CourseId, RosterStudentId},
    routes::{
        csv_export::get_roster_students_csv,
        roster_student_form::{
            get_edit_roster_student_form, get_new_roster_student_form,
            internal_post_roster_student, internal_put_roster_student,
        },
        roster_students::{get_roster_students_page, internal_delete_roster_student},
    },
    state::RosterState,
};
use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

pub mod csv_export;
pub mod roster_student_form;
pub mod roster_students;

pub fn router() -> Router<RosterState> {
    Router::new()
        .route(
            "/admin/courses/{course_id}/roster_students",
            get(get_roster_students_page),
        )
        .route(
            "/admin/courses/{course_id}/roster_students/new",
            get(get_new_roster_student_form),
        )
        .route(
            "/admin/courses/{course_id}/roster_students/csv",
            get(get_roster_students_csv),
        )
        .route(
            "/admin/courses/{course_id}/roster_students/{id}/edit",
            get(get_edit_roster_student_form),
        )
        .route(
            "/internal/courses/{course_id}/roster_students",
            post(internal_post_roster_student),
        )
        .route(
            "/internal/courses/{course_id}/roster_students/{id}",
            put(internal_put_roster_student).delete(internal_delete_roster_student),
        )
}

pub fn roster_students_path(course_id: CourseId) -> String {
    format!("/admin/courses/{course_id}/roster_students")
}

pub fn new_roster_student_path(course_id: CourseId) -> String {
    format!("/admin/courses/{course_id}/roster_students/new")
}

pub fn edit_roster_student_path(course_id: CourseId, id: RosterStudentId) -> String {
    format!("/admin/courses/{course_id}/roster_students/{id}/edit")
}

pub fn roster_students_csv_path(course_id: CourseId) -> String {
    format!("/admin/courses/{course_id}/roster_students/csv")
}

pub fn internal_roster_students_path(course_id: CourseId) -> String {
    format!("/internal/courses/{course_id}/roster_students")
}

pub fn internal_roster_student_path(course_id: CourseId, id: RosterStudentId) -> String {
    format!("/internal/courses/{course_id}/roster_students/{id}")
}

/// Sends the browser somewhere else after an htmx request.
pub fn navigate_to(path: String) -> Response {
    [("HX-Redirect", path)].into_response()
}

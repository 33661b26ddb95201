use crate::{
    auth::{CurrentUser, Roles},
    cache::CachedRoster,
    data::{CourseId, RosterStudentId, roster_student::RosterStudent},
    maud_conveniences::{Cell, error_banner, render_table, title},
    routes::{
        edit_roster_student_path, internal_roster_student_path, new_roster_student_path,
        roster_students_csv_path,
    },
    state::RosterState,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};

pub const TABLE_TEST_ID: &str = "RosterStudentTable";
const DELETE_FALLBACK: &str = "Error deleting student";
const DELETE_NOT_ALLOWED: &str = "Only admins can delete roster students";

/// The course's roster, or nothing if the backend would not give it to us.
async fn roster_or_empty(state: &RosterState, course_id: CourseId, user: &CurrentUser) -> CachedRoster {
    match state.roster_for_course(course_id, user).await {
        Ok(students) => students,
        Err(e) => {
            warn!(?e, %course_id, "Unable to fetch roster");
            CachedRoster::from(Vec::new())
        }
    }
}

pub async fn get_roster_students_page(
    State(state): State<RosterState>,
    user: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> Response {
    if !user.is_logged_in() {
        return Redirect::to(state.config().login_url()).into_response();
    }

    let students = roster_or_empty(&state, course_id, &user).await;

    state
        .render(
            &user,
            html! {
                div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-5xl w-full flex flex-col space-y-4" {
                    div class="flex flex-row items-center justify-between" {
                        (title("Course Roster"))
                        @if user.can_any(Roles::ADMIN | Roles::PROFESSOR) {
                            a href=(roster_students_csv_path(course_id)) class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" download {
                                "Download CSV"
                            }
                        }
                    }
                    (render_roster_students_table(&students, course_id, &user, None))
                }
            },
        )
        .into_response()
}

pub fn render_roster_students_table(
    students: &[RosterStudent],
    course_id: CourseId,
    user: &CurrentUser,
    banner: Option<&str>,
) -> Markup {
    let can_edit = user.can(Roles::ADMIN);

    let mut headers = vec![
        "id",
        "Enrollment Code",
        "Student ID",
        "First Name",
        "Last Name",
        "Email",
        "Org Status",
    ];
    if can_edit {
        headers.extend(["Edit", "Delete"]);
    }

    let rows = students
        .iter()
        .enumerate()
        .map(|(i, student)| {
            let mut row = vec![
                Cell::new("id", student.id.0),
                Cell::new(
                    "enrollmentCode",
                    student.enrollment_code.as_deref().unwrap_or_default(),
                ),
                Cell::new("studentId", &student.student_id),
                Cell::new("firstName", &student.first_name),
                Cell::new("lastName", &student.last_name),
                Cell::new("email", &student.email),
                Cell::new("orgStatus", student.org_status.unwrap_or_default()),
            ];
            if can_edit {
                row.push(Cell::new("Edit", edit_button(course_id, student.id, i)));
                row.push(Cell::new("Delete", delete_button(course_id, student, i)));
            }
            row
        })
        .collect();

    html! {
        div id="roster_students" class="container mx-auto flex flex-col space-y-4" {
            @if let Some(banner) = banner {
                (error_banner(banner))
            }
            @if can_edit {
                div {
                    a href=(new_roster_student_path(course_id)) data-testid={(TABLE_TEST_ID) "-create-button"} class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded inline-block" {
                        "New Roster Student"
                    }
                }
            }
            (render_table(TABLE_TEST_ID, &headers, rows))
        }
    }
}

fn edit_button(course_id: CourseId, id: RosterStudentId, row: usize) -> Markup {
    html! {
        a href=(edit_roster_student_path(course_id, id)) data-testid={(TABLE_TEST_ID) "-cell-row-" (row) "-col-Edit-button"} class="bg-yellow-600 hover:bg-yellow-800 font-bold py-1 px-3 rounded" {
            "Edit"
        }
    }
}

fn delete_button(course_id: CourseId, student: &RosterStudent, row: usize) -> Markup {
    html! {
        button hx-delete=(internal_roster_student_path(course_id, student.id)) hx-confirm={"Delete roster student " (student.student_id) "?"} hx-target="#roster_students" hx-swap="outerHTML" hx-disabled-elt="this" data-testid={(TABLE_TEST_ID) "-cell-row-" (row) "-col-Delete-button"} class="bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" {
            "Delete"
        }
    }
}

/// Deletes on the backend, then answers with the freshly fetched table.
///
/// Always answers 200 so htmx swaps the table in, with any failure shown in the banner.
pub async fn internal_delete_roster_student(
    State(state): State<RosterState>,
    user: CurrentUser,
    Path((course_id, id)): Path<(CourseId, RosterStudentId)>,
) -> Markup {
    let banner = if user.can(Roles::ADMIN) {
        match state.backend().delete(id, &user.credentials).await {
            Ok(()) => {
                info!(%id, %course_id, "Deleted roster student");
                state.cache().invalidate(course_id).await;
                None
            }
            Err(e) => {
                warn!(?e, %id, %course_id, "Unable to delete roster student");
                Some(e.backend_message().unwrap_or(DELETE_FALLBACK).to_string())
            }
        }
    } else {
        warn!(roles = ?user.roles, %id, %course_id, "Refusing to delete roster student");
        Some(DELETE_NOT_ALLOWED.to_string())
    };

    let students = roster_or_empty(&state, course_id, &user).await;
    render_roster_students_table(&students, course_id, &user, banner.as_deref())
}

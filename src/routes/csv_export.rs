use crate::{
    auth::{CurrentUser, Roles},
    data::{CourseId, roster_student::roster_to_csv},
    error::RosterResult,
    state::RosterState,
};
use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

pub async fn get_roster_students_csv(
    State(state): State<RosterState>,
    user: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> RosterResult<Response> {
    user.ensure_can_any(Roles::ADMIN | Roles::PROFESSOR)?;

    let students = state.roster_for_course(course_id, &user).await?;
    let csv = roster_to_csv(&students)?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"roster_students_{course_id}.csv\""),
            ),
        ],
        csv,
    )
        .into_response())
}

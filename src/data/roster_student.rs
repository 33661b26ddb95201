use crate::{
    data::{CourseId, RosterStudentId, null_as_empty},
    error::{CsvFinishSnafu, CsvSnafu, RosterResult},
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use maud::{Markup, Render, html};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgStatus {
    #[default]
    None,
    Invited,
    Member,
    Owner,
    Expired,
    /// Anything the backend sends that we don't know yet.
    #[serde(other)]
    Unknown,
}

impl OrgStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Invited => "INVITED",
            Self::Member => "MEMBER",
            Self::Owner => "OWNER",
            Self::Expired => "EXPIRED",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "Not yet requested an invitation",
            Self::Invited => "Has requested an invitation but isn't yet a member",
            Self::Member => "Is a member of the org",
            Self::Owner => "Is an admin in the org",
            Self::Expired => "Invitation has expired",
            Self::Unknown => "Unknown org status",
        }
    }
}

impl Render for OrgStatus {
    fn render(&self) -> Markup {
        html! {
            span title=(self.as_str()) {(self.description())}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudent {
    pub id: RosterStudentId,
    pub course_id: CourseId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub student_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default)]
    pub enrollment_code: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_github_id: Option<i64>,
    #[serde(default)]
    pub user_github_login: Option<String>,
    #[serde(default)]
    pub roster_status: Option<String>,
    #[serde(default)]
    pub org_status: Option<OrgStatus>,
}

/// Body of both the create and the update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudentPayload {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub course_id: CourseId,
}

/// What the form fields hold, before the course is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudentFields {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl RosterStudentFields {
    pub fn into_payload(self, course_id: CourseId) -> RosterStudentPayload {
        RosterStudentPayload {
            student_id: self.student_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            course_id,
        }
    }
}

impl From<&RosterStudent> for RosterStudentFields {
    fn from(student: &RosterStudent) -> Self {
        Self {
            student_id: student.student_id.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
        }
    }
}

pub const CSV_HEADERS: [&str; 11] = [
    "COURSEID",
    "EMAIL",
    "FIRSTNAME",
    "ID",
    "LASTNAME",
    "ORGSTATUS",
    "ROSTERSTATUS",
    "STUDENTID",
    "USERGITHUBID",
    "USERGITHUBLOGIN",
    "USERID",
];

pub fn roster_to_csv(students: &[RosterStudent]) -> RosterResult<Vec<u8>> {
    fn opt(x: Option<impl ToString>) -> String {
        x.map(|x| x.to_string()).unwrap_or_default()
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record(CSV_HEADERS).context(CsvSnafu)?;

    for student in students {
        writer
            .write_record([
                student.course_id.to_string(),
                student.email.clone(),
                student.first_name.clone(),
                student.id.to_string(),
                student.last_name.clone(),
                opt(student.org_status.map(OrgStatus::as_str)),
                opt(student.roster_status.as_deref()),
                student.student_id.clone(),
                opt(student.user_github_id),
                opt(student.user_github_login.as_deref()),
                opt(student.user_id),
            ])
            .context(CsvSnafu)?;
    }

    writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context(CsvFinishSnafu)
}

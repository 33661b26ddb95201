use crate::{auth::Roles, data::RosterStudentId};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse backend URL {:?}", original))]
    ParseBackendUrl {
        source: url::ParseError,
        original: String,
    },
    #[snafu(display("Unable to build HTTP client"))]
    BuildClient { source: reqwest::Error },
    #[snafu(display("Error talking to the backend"))]
    BackendRequest { source: reqwest::Error },
    #[snafu(display("Error decoding backend response"))]
    BackendDecode { source: reqwest::Error },
    #[snafu(display("Backend responded with {}: {}", status, message.as_deref().unwrap_or("no message")))]
    BackendStatus {
        status: StatusCode,
        message: Option<String>,
    },
    #[snafu(display("Unable to find roster student with ID: {}", id))]
    MissingRosterStudent { id: RosterStudentId },
    #[snafu(display("Tried to act as {:?}, only had {:?}", needed.iter_names().map(|(name, _)| name).collect::<Vec<_>>(), found.iter_names().map(|(name, _)| name).collect::<Vec<_>>()))]
    IncorrectPermissions { needed: Roles, found: Roles },
    #[snafu(display("Error with CSVs"))]
    Csv { source: csv::Error },
    #[snafu(display("Error finishing CSV output"))]
    CsvFinish { source: std::io::Error },
}

impl RosterError {
    /// The message the backend attached to a failed request, if there was one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::BackendStatus { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl IntoResponse for RosterError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const NA: StatusCode = StatusCode::FORBIDDEN; //not allowed
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //backend misbehaved

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Roster Error"}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::BadEnvVar { .. } | Self::ParseBackendUrl { .. } => ISE,
            Self::BuildClient { .. } => ISE,
            Self::BackendRequest { .. } | Self::BackendDecode { .. } => BG,
            Self::BackendStatus { status, .. } => match *status {
                StatusCode::NOT_FOUND => NF,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NA,
                _ => BG,
            },
            Self::MissingRosterStudent { .. } => NF,
            Self::IncorrectPermissions { .. } => NA,
            Self::Csv { .. } | Self::CsvFinish { .. } => ISE,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()))).into_response()
    }
}

//! Canned records shared by the tests.

pub mod roster_student_fixtures {
    use crate::data::{
        CourseId, RosterStudentId,
        roster_student::{OrgStatus, RosterStudent},
    };

    pub fn one_roster_student() -> RosterStudent {
        RosterStudent {
            id: RosterStudentId(1),
            course_id: CourseId(1),
            student_id: "12345".into(),
            first_name: "Chris".into(),
            last_name: "Gaucho".into(),
            email: "cg@ucsb.edu".into(),
            enrollment_code: None,
            user_id: None,
            user_github_id: None,
            user_github_login: None,
            roster_status: None,
            org_status: None,
        }
    }

    pub fn three_roster_students() -> Vec<RosterStudent> {
        let student = |id, enrollment_code: &str, student_id: &str, first: &str, last: &str, email: &str, org_status| {
            RosterStudent {
                id: RosterStudentId(id),
                course_id: CourseId(1),
                student_id: student_id.into(),
                first_name: first.into(),
                last_name: last.into(),
                email: email.into(),
                enrollment_code: Some(enrollment_code.into()),
                user_id: None,
                user_github_id: None,
                user_github_login: None,
                roster_status: Some("ROSTER".into()),
                org_status,
            }
        };

        vec![
            student(1, "12345", "A123456", "Chris", "Gaucho", "cgaucho@ucsb.edu", Some(OrgStatus::Member)),
            student(2, "23456", "A987654", "Laurel", "Storke", "lstorke@ucsb.edu", Some(OrgStatus::Invited)),
            student(3, "34567", "A555555", "Del", "Playa", "dplaya@ucsb.edu", None),
        ]
    }
}

pub mod current_user_fixtures {
    use crate::auth::{BackendCredentials, CurrentUser, Roles, UserSummary};

    fn logged_in(roles: Roles) -> CurrentUser {
        CurrentUser {
            user: Some(UserSummary {
                email: "phtcon@ucsb.edu".into(),
                full_name: "Phill Conrad".into(),
            }),
            roles,
            credentials: BackendCredentials::from_cookie("JSESSIONID=fixture"),
        }
    }

    pub fn admin_user() -> CurrentUser {
        logged_in(Roles::USER | Roles::ADMIN)
    }

    pub fn user_only() -> CurrentUser {
        logged_in(Roles::USER)
    }

    pub fn professor_user() -> CurrentUser {
        logged_in(Roles::USER | Roles::PROFESSOR)
    }

    pub fn not_logged_in() -> CurrentUser {
        CurrentUser::anonymous()
    }
}

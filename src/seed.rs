//! Bundled fixtures used to initialize an empty store on first touch.

use crate::models::{Role, User};

/// Job postings, loaded verbatim under the `jobs` key if absent.
pub const JOBS: &str = include_str!("../data/jobs.json");

/// Applications, loaded verbatim under the `applications` key if absent.
pub const APPLICATIONS: &str = include_str!("../data/applications.json");

/// The two demo accounts the board ships with.
pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "John Doe".to_string(),
            email: "candidate@demo.com".to_string(),
            password: "demo123".to_string(),
            role: Role::Candidate,
        },
        User {
            id: 2,
            name: "Jane Recruiter".to_string(),
            email: "recruiter@demo.com".to_string(),
            password: "demo123".to_string(),
            role: Role::Recruiter,
        },
    ]
}

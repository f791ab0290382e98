use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::snapshot::HasId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Recruiter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Candidate => write!(f, "candidate"),
            Role::Recruiter => write!(f, "recruiter"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "candidate" => Ok(Role::Candidate),
            "recruiter" => Ok(Role::Recruiter),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String, // plaintext demo data, not real auth
    pub role: Role,
}

impl HasId for User {
    fn id(&self) -> u64 {
        self.id
    }
}

/// The single active-login record. A snapshot of the user at login time,
/// not a live reference; profile updates propagate the name explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// The four types the board's forms offer. Stored jobs keep the raw string
/// (imported data may carry others); this is the typed vocabulary at the
/// posting and filtering boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full-time" | "fulltime" | "full" => Ok(JobType::FullTime),
            "part-time" | "parttime" | "part" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" | "intern" => Ok(JobType::Internship),
            other => Err(format!("unknown job type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub remote: bool,
    pub skills: Vec<String>,
    pub salary: String, // display text, deliberately unstructured
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(rename = "postedDate")]
    pub posted_date: NaiveDate,
    pub applicants: u64,
}

impl HasId for Job {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "Pending"),
            ApplicationStatus::Shortlisted => write!(f, "Shortlisted"),
            ApplicationStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: u64,
    #[serde(rename = "jobId")]
    pub job_id: u64,
    #[serde(rename = "candidateName")]
    pub candidate_name: String,
    #[serde(rename = "candidateEmail")]
    pub candidate_email: String,
    pub status: ApplicationStatus,
    #[serde(rename = "appliedDate")]
    pub applied_date: NaiveDate,
    pub resume: String,
}

impl HasId for Application {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Dashboard aggregates computed over the full current collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    #[serde(rename = "totalJobs")]
    pub total_jobs: u64,
    #[serde(rename = "totalApplications")]
    pub total_applications: u64,
    #[serde(rename = "activeJobs")]
    pub active_jobs: u64,
    #[serde(rename = "pendingApplications")]
    pub pending_applications: u64,
    #[serde(rename = "shortlistedApplications")]
    pub shortlisted_applications: u64,
    #[serde(rename = "rejectedApplications")]
    pub rejected_applications: u64,
}

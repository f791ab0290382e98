use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::models::{Analytics, Application, ApplicationStatus, Job};
use crate::seed;
use crate::snapshot::{self, Snapshot};
use crate::storage::{ensure_seeded, keys, Storage};

/// Jobs posted within this many days count as active on the dashboard.
const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Manages the job and application collections and their derived queries.
pub struct JobStore<'a> {
    storage: &'a dyn Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Newest postings first.
    #[default]
    Date,
    /// Most-applied-to postings first.
    Applicants,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "applicants" => Ok(SortBy::Applicants),
            other => Err(format!("unknown sort '{other}' (expected date or applicants)")),
        }
    }
}

/// Search filters, applied conjunctively. Every field is optional; the
/// literal value "all" for type or location means "no filter", matching
/// the select widgets that feed this.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub query: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub skills: Vec<String>,
    pub sort: SortBy,
}

/// What a recruiter supplies when posting. Id, posted date and the
/// applicant counter are store-assigned.
#[derive(Debug, Clone, Default)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub remote: bool,
    pub skills: Vec<String>,
    pub salary: String,
    pub description: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Applicant {
    pub name: String,
    pub email: String,
    pub resume: Option<String>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl<'a> JobStore<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    fn load_jobs(&self) -> Result<Snapshot<Job>> {
        ensure_seeded(self.storage, keys::JOBS, seed::JOBS)?;
        snapshot::load(self.storage, keys::JOBS)
    }

    fn load_applications(&self) -> Result<Snapshot<Application>> {
        ensure_seeded(self.storage, keys::APPLICATIONS, seed::APPLICATIONS)?;
        snapshot::load(self.storage, keys::APPLICATIONS)
    }

    // --- Job operations ---

    /// Full snapshot in insertion order: seed order, then posting order.
    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        Ok(self.load_jobs()?.items)
    }

    pub fn get_job(&self, id: u64) -> Result<Option<Job>> {
        Ok(self.load_jobs()?.items.into_iter().find(|j| j.id == id))
    }

    pub fn search_jobs(&self, criteria: &SearchCriteria) -> Result<Vec<Job>> {
        let mut jobs = self.load_jobs()?.items;

        if let Some(query) = criteria.query.as_deref().filter(|q| !q.is_empty()) {
            jobs.retain(|job| {
                contains_ci(&job.title, query)
                    || contains_ci(&job.company, query)
                    || job.skills.iter().any(|s| contains_ci(s, query))
            });
        }

        if let Some(job_type) = criteria.job_type.as_deref().filter(|t| *t != "all") {
            jobs.retain(|job| job.job_type == job_type);
        }

        if let Some(location) = criteria.location.as_deref().filter(|l| *l != "all") {
            jobs.retain(|job| job.location.contains(location));
        }

        if let Some(remote) = criteria.remote {
            jobs.retain(|job| job.remote == remote);
        }

        if !criteria.skills.is_empty() {
            jobs.retain(|job| {
                criteria
                    .skills
                    .iter()
                    .any(|wanted| job.skills.iter().any(|have| contains_ci(have, wanted)))
            });
        }

        // Stable sorts; ties keep their prior relative order.
        match criteria.sort {
            SortBy::Date => jobs.sort_by(|a, b| b.posted_date.cmp(&a.posted_date)),
            SortBy::Applicants => jobs.sort_by(|a, b| b.applicants.cmp(&a.applicants)),
        }

        Ok(jobs)
    }

    /// Validates the draft, assigns id/date/counter, appends and persists.
    pub fn post_job(&self, draft: JobDraft) -> Result<Job> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::Validation {
                field: "title",
                reason: "must not be empty",
            });
        }
        if draft.company.trim().is_empty() {
            return Err(StoreError::Validation {
                field: "company",
                reason: "must not be empty",
            });
        }

        let mut jobs = self.load_jobs()?;
        let job = Job {
            id: jobs.allocate_id(),
            title: draft.title,
            company: draft.company,
            location: draft.location,
            job_type: draft.job_type,
            remote: draft.remote,
            skills: draft.skills,
            salary: draft.salary,
            description: draft.description,
            requirements: draft.requirements,
            posted_date: today(),
            applicants: 0,
        };
        jobs.items.push(job.clone());
        snapshot::save(self.storage, keys::JOBS, &jobs)?;
        Ok(job)
    }

    /// Removes the job and every application that referenced it.
    pub fn delete_job(&self, id: u64) -> Result<()> {
        let mut jobs = self.load_jobs()?;
        jobs.items.retain(|job| job.id != id);
        snapshot::save(self.storage, keys::JOBS, &jobs)?;

        let mut applications = self.load_applications()?;
        applications.items.retain(|app| app.job_id != id);
        snapshot::save(self.storage, keys::APPLICATIONS, &applications)
    }

    // --- Application operations ---

    /// Records an application and bumps the job's applicant counter.
    ///
    /// The two collections are persisted one after the other with no
    /// transaction; a fault in between leaves the application recorded
    /// with the counter stale. Accepted risk of the snapshot model.
    pub fn apply_to_job(&self, job_id: u64, applicant: &Applicant) -> Result<Application> {
        let mut applications = self.load_applications()?;

        let already = applications
            .items
            .iter()
            .any(|app| app.job_id == job_id && app.candidate_email == applicant.email);
        if already {
            return Err(StoreError::DuplicateApplication);
        }

        let application = Application {
            id: applications.allocate_id(),
            job_id,
            candidate_name: applicant.name.clone(),
            candidate_email: applicant.email.clone(),
            status: ApplicationStatus::Pending,
            applied_date: today(),
            resume: applicant
                .resume
                .clone()
                .unwrap_or_else(|| "resume.pdf".to_string()),
        };
        applications.items.push(application.clone());
        snapshot::save(self.storage, keys::APPLICATIONS, &applications)?;

        let mut jobs = self.load_jobs()?;
        match jobs.items.iter_mut().find(|job| job.id == job_id) {
            Some(job) => {
                job.applicants += 1;
                snapshot::save(self.storage, keys::JOBS, &jobs)?;
            }
            // Orphaned application tolerated; the counter bump is skipped.
            None => warn!(job_id, "application recorded for a job that no longer exists"),
        }

        Ok(application)
    }

    pub fn list_applications(&self) -> Result<Vec<Application>> {
        Ok(self.load_applications()?.items)
    }

    pub fn applications_for_user(&self, email: &str) -> Result<Vec<Application>> {
        let mut applications = self.load_applications()?.items;
        applications.retain(|app| app.candidate_email == email);
        Ok(applications)
    }

    pub fn applications_for_job(&self, job_id: u64) -> Result<Vec<Application>> {
        let mut applications = self.load_applications()?.items;
        applications.retain(|app| app.job_id == job_id);
        Ok(applications)
    }

    /// Overwrites the status unconditionally; every transition is legal,
    /// including a no-op.
    pub fn update_application_status(
        &self,
        application_id: u64,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let mut applications = self.load_applications()?;
        let application = applications
            .items
            .iter_mut()
            .find(|app| app.id == application_id)
            .ok_or(StoreError::ApplicationNotFound)?;
        application.status = status;
        let updated = application.clone();
        snapshot::save(self.storage, keys::APPLICATIONS, &applications)?;
        Ok(updated)
    }

    // --- Derived queries ---

    pub fn analytics(&self) -> Result<Analytics> {
        let jobs = self.load_jobs()?.items;
        let applications = self.load_applications()?.items;
        let today = today();

        let count_status = |status: ApplicationStatus| {
            applications.iter().filter(|a| a.status == status).count() as u64
        };

        Ok(Analytics {
            total_jobs: jobs.len() as u64,
            total_applications: applications.len() as u64,
            active_jobs: jobs
                .iter()
                .filter(|job| (today - job.posted_date).num_days() <= ACTIVE_WINDOW_DAYS)
                .count() as u64,
            pending_applications: count_status(ApplicationStatus::Pending),
            shortlisted_applications: count_status(ApplicationStatus::Shortlisted),
            rejected_applications: count_status(ApplicationStatus::Rejected),
        })
    }

    /// Tally of jobs per type string. Keys are whatever the data holds,
    /// not limited to the four form values.
    pub fn job_type_distribution(&self) -> Result<BTreeMap<String, u64>> {
        let mut distribution = BTreeMap::new();
        for job in self.load_jobs()?.items {
            *distribution.entry(job.job_type).or_insert(0) += 1;
        }
        Ok(distribution)
    }

    /// Applications grouped by the exact day they arrived, ascending.
    pub fn applications_over_time(&self) -> Result<Vec<(NaiveDate, u64)>> {
        let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for app in self.load_applications()?.items {
            *by_day.entry(app.applied_date).or_insert(0) += 1;
        }
        Ok(by_day.into_iter().collect())
    }
}

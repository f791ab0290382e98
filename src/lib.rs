//! Local-first job board: a small CRUD layer over a key-value string
//! store, seeded from bundled fixtures. Two collections (jobs,
//! applications) plus a user table and a single current-session record,
//! each persisted as a whole-collection JSON snapshot.

pub mod auth;
pub mod error;
pub mod jobs;
pub mod models;
pub mod seed;
pub mod snapshot;
pub mod storage;

pub use auth::{IdentityStore, ProfileUpdate};
pub use error::{Result, StoreError};
pub use jobs::{Applicant, JobDraft, JobStore, SearchCriteria, SortBy};
pub use models::{
    Analytics, Application, ApplicationStatus, Job, JobType, Role, Session, User,
};
pub use storage::{ensure_seeded, FileStorage, MemoryStorage, Storage};

//! End-to-end flows over isolated stores: the paths the UI actually
//! drives, from registration through applying and triage.

use jobboard::storage::keys;
use jobboard::{
    Applicant, ApplicationStatus, FileStorage, IdentityStore, JobDraft, JobStore, MemoryStorage,
    Role, SearchCriteria, Storage, StoreError,
};

fn blank_board(storage: &dyn Storage) -> JobStore<'_> {
    storage.write(keys::JOBS, "[]").unwrap();
    storage.write(keys::APPLICATIONS, "[]").unwrap();
    JobStore::new(storage)
}

fn draft(title: &str, job_type: &str, remote: bool) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        company: "Globex".to_string(),
        location: "Lisbon".to_string(),
        job_type: job_type.to_string(),
        remote,
        skills: vec!["Rust".to_string()],
        salary: "competitive".to_string(),
        description: String::new(),
        requirements: vec![],
    }
}

#[test]
fn candidate_journey_register_search_apply() {
    let storage = MemoryStorage::new();
    let auth = IdentityStore::new(&storage);
    let board = blank_board(&storage);

    let recruiter = auth
        .register("Rita", "rita@globex.com", "pw", Role::Recruiter)
        .unwrap();
    assert_eq!(recruiter.role, Role::Recruiter);

    board.post_job(draft("Contract Rust Dev", "Contract", true)).unwrap();
    board.post_job(draft("Contract QA", "Contract", false)).unwrap();
    board.post_job(draft("Contract Writer", "Contract", false)).unwrap();
    board.post_job(draft("Staff Engineer", "Full-time", true)).unwrap();

    auth.logout().unwrap();
    let candidate = auth
        .register("Carl", "carl@example.com", "pw", Role::Candidate)
        .unwrap();

    // three Contract jobs on the board, exactly one remote
    let hits = board
        .search_jobs(&SearchCriteria {
            job_type: Some("Contract".to_string()),
            remote: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Contract Rust Dev");

    let application = board
        .apply_to_job(
            hits[0].id,
            &Applicant {
                name: candidate.name.clone(),
                email: candidate.email.clone(),
                resume: None,
            },
        )
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);

    let mine = board.applications_for_user(&candidate.email).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(board.get_job(hits[0].id).unwrap().unwrap().applicants, 1);
}

#[test]
fn recruiter_journey_post_triage_delete() {
    let storage = MemoryStorage::new();
    let board = blank_board(&storage);

    let a = board.post_job(draft("A", "Full-time", false)).unwrap();
    let b = board.post_job(draft("B", "Full-time", false)).unwrap();
    assert_eq!((a.id, b.id), (1, 2));

    for email in ["p1@x.com", "p2@x.com"] {
        board
            .apply_to_job(a.id, &Applicant {
                name: "P".to_string(),
                email: email.to_string(),
                resume: Some("cv.pdf".to_string()),
            })
            .unwrap();
    }

    let apps = board.applications_for_job(a.id).unwrap();
    assert_eq!(apps.len(), 2);
    board
        .update_application_status(apps[0].id, ApplicationStatus::Shortlisted)
        .unwrap();
    board
        .update_application_status(apps[1].id, ApplicationStatus::Rejected)
        .unwrap();

    let analytics = board.analytics().unwrap();
    assert_eq!(analytics.total_jobs, 2);
    assert_eq!(analytics.shortlisted_applications, 1);
    assert_eq!(analytics.rejected_applications, 1);
    assert_eq!(analytics.pending_applications, 0);

    // deleting job A takes its applications with it, job B survives
    board.delete_job(a.id).unwrap();
    let jobs = board.list_jobs().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "B");
    assert!(board.applications_for_job(a.id).unwrap().is_empty());
}

#[test]
fn duplicate_registration_and_application_are_both_rejected() {
    let storage = MemoryStorage::new();
    let auth = IdentityStore::new(&storage);
    let board = blank_board(&storage);

    auth.register("Ada", "ada@example.com", "pw", Role::Candidate)
        .unwrap();
    assert!(matches!(
        auth.register("Eve", "ada@example.com", "pw2", Role::Candidate),
        Err(StoreError::DuplicateUser)
    ));

    let job = board.post_job(draft("A", "Full-time", false)).unwrap();
    let applicant = Applicant {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        resume: None,
    };
    board.apply_to_job(job.id, &applicant).unwrap();
    assert!(matches!(
        board.apply_to_job(job.id, &applicant),
        Err(StoreError::DuplicateApplication)
    ));
    assert_eq!(board.applications_for_job(job.id).unwrap().len(), 1);
}

#[test]
fn sessions_survive_reopening_a_file_store() {
    let tmp = tempfile::tempdir().unwrap();

    {
        let storage = FileStorage::at(tmp.path()).unwrap();
        let auth = IdentityStore::new(&storage);
        let board = blank_board(&storage);
        auth.register("Rita", "rita@globex.com", "pw", Role::Recruiter)
            .unwrap();
        board.post_job(draft("Persisted", "Full-time", true)).unwrap();
    }

    // a fresh adapter over the same directory sees the same state
    let storage = FileStorage::at(tmp.path()).unwrap();
    let auth = IdentityStore::new(&storage);
    let board = JobStore::new(&storage);

    let session = auth.current_session().unwrap().unwrap();
    assert_eq!(session.email, "rita@globex.com");
    let jobs = board.list_jobs().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "Persisted");

    auth.logout().unwrap();
    assert!(auth.current_session().unwrap().is_none());
}

#[test]
fn bundled_fixtures_parse_and_seed_on_first_touch() {
    let storage = MemoryStorage::new();
    let board = JobStore::new(&storage);

    let jobs = board.list_jobs().unwrap();
    assert!(!jobs.is_empty());
    // every seeded application points at some seeded job
    let job_ids: Vec<u64> = jobs.iter().map(|j| j.id).collect();
    for app in board.list_applications().unwrap() {
        assert!(job_ids.contains(&app.job_id));
    }

    // seeding happened once; a posting afterwards does not re-seed
    let posted = board.post_job(draft("New", "Full-time", false)).unwrap();
    assert!(posted.id > jobs.len() as u64);
}

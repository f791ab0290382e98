use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jobboard::{
    Applicant, ApplicationStatus, FileStorage, IdentityStore, JobDraft, JobStore, JobType,
    ProfileUpdate, Role, SearchCriteria, Session, SortBy,
};

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Local job board - browse postings, apply, and triage applicants")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the local store and show where it lives
    Init,

    /// Create an account and log in
    Register {
        name: String,
        email: String,
        password: String,

        /// Account role (candidate, recruiter)
        #[arg(short, long, default_value = "candidate")]
        role: Role,
    },

    /// Log in with an existing account
    Login { email: String, password: String },

    /// Clear the current session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Change the display name on the current account
    Profile {
        #[arg(short, long)]
        name: String,
    },

    /// Browse and manage job postings
    Jobs {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Apply to a job as the logged-in candidate
    Apply {
        /// Job ID
        job_id: u64,

        /// Resume filename to attach
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Inspect and triage applications
    Applications {
        #[command(subcommand)]
        command: ApplicationCommands,
    },

    /// Dashboard numbers over the whole board
    Analytics,
}

#[derive(Subcommand)]
enum JobCommands {
    /// List all postings
    List,

    /// Show one posting in full
    Show {
        /// Job ID
        id: u64,
    },

    /// Filter and sort postings
    Search {
        /// Free-text match on title, company or skills
        #[arg(short, long)]
        query: Option<String>,

        /// Job type (full-time, part-time, contract, internship)
        #[arg(short = 't', long = "type")]
        job_type: Option<JobType>,

        /// Location substring
        #[arg(short, long)]
        location: Option<String>,

        /// Only remote (true) or only on-site (false) postings
        #[arg(long)]
        remote: Option<bool>,

        /// Keep postings with any of these skills
        #[arg(short, long)]
        skill: Vec<String>,

        /// Sort order (date, applicants)
        #[arg(long, default_value = "date")]
        sort: SortBy,
    },

    /// Post a new job (recruiters)
    Post {
        title: String,
        company: String,

        #[arg(short, long, default_value = "Remote")]
        location: String,

        #[arg(short = 't', long = "type", default_value = "full-time")]
        job_type: JobType,

        #[arg(long)]
        remote: bool,

        #[arg(short, long)]
        skill: Vec<String>,

        #[arg(long, default_value = "Not specified")]
        salary: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(long)]
        requirement: Vec<String>,
    },

    /// Delete a posting and its applications (recruiters)
    Delete {
        /// Job ID
        id: u64,
    },
}

#[derive(Subcommand)]
enum ApplicationCommands {
    /// List every application on the board
    List,

    /// List the logged-in user's applications
    Mine,

    /// List applications for one posting
    ForJob {
        /// Job ID
        job_id: u64,
    },

    /// Set an application's status (pending, shortlisted, rejected)
    Status {
        /// Application ID
        id: u64,
        status: ApplicationStatus,
    },
}

fn require_session(auth: &IdentityStore<'_>) -> Result<Session> {
    auth.current_session()?
        .ok_or_else(|| anyhow!("Not logged in. Run 'jobboard login' first."))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

fn print_job_table(jobs: &[jobboard::Job]) {
    if jobs.is_empty() {
        println!("No jobs found.");
        return;
    }
    println!(
        "{:<6} {:<28} {:<20} {:<16} {:<11} {:>7} {:>11}",
        "ID", "TITLE", "COMPANY", "LOCATION", "TYPE", "REMOTE", "APPLICANTS"
    );
    println!("{}", "-".repeat(104));
    for job in jobs {
        println!(
            "{:<6} {:<28} {:<20} {:<16} {:<11} {:>7} {:>11}",
            job.id,
            truncate(&job.title, 26),
            truncate(&job.company, 18),
            truncate(&job.location, 14),
            truncate(&job.job_type, 11),
            if job.remote { "yes" } else { "no" },
            job.applicants
        );
    }
}

fn print_application_table(apps: &[jobboard::Application]) {
    if apps.is_empty() {
        println!("No applications found.");
        return;
    }
    println!(
        "{:<6} {:<6} {:<24} {:<28} {:<12} {:<12}",
        "ID", "JOB", "CANDIDATE", "EMAIL", "STATUS", "APPLIED"
    );
    println!("{}", "-".repeat(92));
    for app in apps {
        println!(
            "{:<6} {:<6} {:<24} {:<28} {:<12} {:<12}",
            app.id,
            app.job_id,
            truncate(&app.candidate_name, 22),
            truncate(&app.candidate_email, 26),
            app.status.to_string(),
            app.applied_date
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = FileStorage::open()?;
    let auth = IdentityStore::new(&storage);
    let board = JobStore::new(&storage);

    match cli.command {
        Commands::Init => {
            board.list_jobs()?;
            auth.current_session()?;
            println!("Store initialized at {}", storage.dir().display());
        }

        Commands::Register { name, email, password, role } => {
            let session = auth.register(&name, &email, &password, role)?;
            println!("Registered and logged in as {} ({})", session.name, session.role);
        }

        Commands::Login { email, password } => {
            let session = auth.login(&email, &password)?;
            println!("Logged in as {} ({})", session.name, session.role);
        }

        Commands::Logout => {
            auth.logout()?;
            println!("Logged out.");
        }

        Commands::Whoami => match auth.current_session()? {
            Some(session) => {
                println!("{} <{}> - {}", session.name, session.email, session.role)
            }
            None => println!("Not logged in."),
        },

        Commands::Profile { name } => {
            let session = auth.update_profile(&ProfileUpdate { name: Some(name) })?;
            println!("Profile updated. Display name is now '{}'.", session.name);
        }

        Commands::Jobs { command } => match command {
            JobCommands::List => {
                print_job_table(&board.list_jobs()?);
            }

            JobCommands::Show { id } => match board.get_job(id)? {
                Some(job) => {
                    println!("Job #{}: {}", job.id, job.title);
                    println!("Company: {}", job.company);
                    println!("Location: {}{}", job.location, if job.remote { " (remote)" } else { "" });
                    println!("Type: {}", job.job_type);
                    println!("Salary: {}", job.salary);
                    println!("Posted: {}", job.posted_date);
                    println!("Applicants: {}", job.applicants);
                    if !job.skills.is_empty() {
                        println!("Skills: {}", job.skills.join(", "));
                    }
                    if !job.description.is_empty() {
                        println!("\n{}", job.description);
                    }
                    if !job.requirements.is_empty() {
                        println!("\nRequirements:");
                        for req in &job.requirements {
                            println!("  - {req}");
                        }
                    }
                }
                None => println!("Job #{id} not found."),
            },

            JobCommands::Search { query, job_type, location, remote, skill, sort } => {
                let criteria = SearchCriteria {
                    query,
                    job_type: job_type.map(|t| t.to_string()),
                    location,
                    remote,
                    skills: skill,
                    sort,
                };
                print_job_table(&board.search_jobs(&criteria)?);
            }

            JobCommands::Post {
                title,
                company,
                location,
                job_type,
                remote,
                skill,
                salary,
                description,
                requirement,
            } => {
                let session = require_session(&auth)?;
                if session.role != Role::Recruiter {
                    return Err(anyhow!("Only recruiters can post jobs."));
                }
                let job = board.post_job(JobDraft {
                    title,
                    company,
                    location,
                    job_type: job_type.to_string(),
                    remote,
                    skills: skill,
                    salary,
                    description,
                    requirements: requirement,
                })?;
                println!("Posted job #{}: {}", job.id, job.title);
            }

            JobCommands::Delete { id } => {
                let session = require_session(&auth)?;
                if session.role != Role::Recruiter {
                    return Err(anyhow!("Only recruiters can delete jobs."));
                }
                board.delete_job(id)?;
                println!("Deleted job #{id} and its applications.");
            }
        },

        Commands::Apply { job_id, resume } => {
            let session = require_session(&auth)?;
            let application = board.apply_to_job(
                job_id,
                &Applicant {
                    name: session.name,
                    email: session.email,
                    resume,
                },
            )?;
            println!(
                "Applied to job #{} (application #{}, status {}).",
                application.job_id, application.id, application.status
            );
        }

        Commands::Applications { command } => match command {
            ApplicationCommands::List => {
                print_application_table(&board.list_applications()?);
            }

            ApplicationCommands::Mine => {
                let session = require_session(&auth)?;
                print_application_table(&board.applications_for_user(&session.email)?);
            }

            ApplicationCommands::ForJob { job_id } => {
                print_application_table(&board.applications_for_job(job_id)?);
            }

            ApplicationCommands::Status { id, status } => {
                let session = require_session(&auth)?;
                if session.role != Role::Recruiter {
                    return Err(anyhow!("Only recruiters can triage applications."));
                }
                let application = board.update_application_status(id, status)?;
                println!("Application #{} is now {}.", application.id, application.status);
            }
        },

        Commands::Analytics => {
            let analytics = board.analytics()?;
            println!("Jobs: {} total, {} active (last 30 days)", analytics.total_jobs, analytics.active_jobs);
            println!(
                "Applications: {} total ({} pending, {} shortlisted, {} rejected)",
                analytics.total_applications,
                analytics.pending_applications,
                analytics.shortlisted_applications,
                analytics.rejected_applications
            );

            let distribution = board.job_type_distribution()?;
            if !distribution.is_empty() {
                println!("\nBy type:");
                for (job_type, count) in &distribution {
                    println!("  {:<14} {}", job_type, count);
                }
            }

            let over_time = board.applications_over_time()?;
            if !over_time.is_empty() {
                println!("\nApplications per day:");
                for (date, count) in &over_time {
                    println!("  {date}  {count}");
                }
            }
        }
    }

    Ok(())
}

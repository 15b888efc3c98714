use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use medibook::forms::{
    AppointmentForm, AvailabilityForm, DoctorForm, LoginForm, PatientRegisterForm,
    QualificationForm, ScheduleForm,
};
use medibook::guard::{RouteGuard, Surface};
use medibook::profile::{ApiConfig, Profile};
use medibook::remote::{ApiClient, ApiError, DayPlan};
use medibook::session::{RoleAccess, SessionStore};

#[derive(Parser)]
#[command(name = "medibook")]
#[command(about = "Hospital appointment booking client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure or show the API endpoint
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Register as a patient
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: String,
        #[arg(long)]
        contact_number: String,
    },

    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// One of: admin, doctor, patient
        #[arg(long)]
        role: String,
    },

    /// Log out and clear the persisted session
    Logout,

    /// Show the current session
    Whoami {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Doctor roster
    Doctors {
        #[command(subcommand)]
        command: DoctorCommands,
    },

    /// Qualification catalog
    Qualifications {
        #[command(subcommand)]
        command: QualificationCommands,
    },

    /// Doctor schedules
    Schedules {
        #[command(subcommand)]
        command: ScheduleCommands,
    },

    /// Bookable time slots within a schedule
    Availabilities {
        #[command(subcommand)]
        command: AvailabilityCommands,
    },

    /// Book an appointment against a doctor's slot
    Book {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        schedule: String,
        #[arg(long)]
        availability: String,
    },

    /// Launch the interactive shell
    Tui,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the configured endpoint
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set the API base URL
    SetUrl {
        #[arg(long)]
        url: String,
    },
}

#[derive(Subcommand)]
enum DoctorCommands {
    /// List doctors, one page at a time
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        json: bool,
    },
    /// Create a doctor (admin)
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: String,
        #[arg(long)]
        contact_number: String,
        /// Qualification ids (repeatable)
        #[arg(long = "qualification")]
        qualifications: Vec<String>,
    },
}

#[derive(Subcommand)]
enum QualificationCommands {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        json: bool,
    },
    /// Create a qualification (admin)
    Create {
        #[arg(long)]
        degree: String,
        #[arg(long)]
        description: String,
    },
}

#[derive(Subcommand)]
enum ScheduleCommands {
    /// List schedules: a doctor's own, or any doctor's via --doctor (admin)
    List {
        #[arg(long)]
        doctor: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        json: bool,
    },
    /// Create a schedule for a doctor (admin)
    Create {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        day: String,
        /// Time slots like "09:30 am" (repeatable)
        #[arg(long = "time")]
        times: Vec<String>,
    },
    /// Mark one of your schedules as a holiday (doctor)
    MarkHoliday {
        schedule_id: String,
        /// Clear the holiday flag instead of setting it
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum AvailabilityCommands {
    List {
        #[arg(long)]
        schedule: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        json: bool,
    },
    /// Publish time slots for a schedule (admin)
    Create {
        #[arg(long)]
        schedule: String,
        /// Time slots like "09:30 am" (repeatable)
        #[arg(long = "time")]
        times: Vec<String>,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = Profile::open_default()?;
    let store = SessionStore::new(profile.clone());

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Show { json } => {
                let cfg = profile.read_config()?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&cfg.api).context("serialize api json")?
                    );
                } else if let Some(api) = cfg.api {
                    println!("url: {}", api.base_url);
                } else {
                    println!("No API endpoint configured");
                }
            }
            ConfigCommands::SetUrl { url } => {
                let mut cfg = profile.read_config()?;
                cfg.api = Some(ApiConfig { base_url: url });
                profile.write_config(&cfg)?;
                println!("API endpoint configured");
            }
        },

        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            password_confirmation,
            contact_number,
        } => {
            let form = PatientRegisterForm {
                first_name,
                last_name,
                email,
                password,
                password_confirmation,
                contact_number,
            };
            form.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
            let client = open_client(&profile)?;
            let confirmation = finish(&store, client.register_patient(&form.payload()))?;
            println!("{}", confirmation.text("Patient registered"));
            println!("Log in with `medibook login --role patient`");
        }

        Commands::Login {
            email,
            password,
            role,
        } => {
            let form = LoginForm {
                email,
                password,
                role,
            };
            form.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
            let client = open_client(&profile)?;
            let session = finish(
                &store,
                client.login(&form.email, &form.password, &form.role),
            )?;
            store.save(&session)?;
            println!(
                "Logged in as {} ({})",
                session.display_name(),
                session.user.role
            );
        }

        Commands::Logout => {
            match store.load() {
                Some(session) => {
                    let client = authed_client(&profile, &session)?;
                    // The local record goes away even when the server call
                    // fails; a token the server rejects is just as logged out.
                    let result = client.logout();
                    store.clear()?;
                    match result {
                        Ok(()) | Err(ApiError::Unauthorized) => println!("Logged out"),
                        Err(err) => return Err(anyhow::anyhow!(err)).context("logout"),
                    }
                }
                None => println!("Not logged in"),
            }
        }

        Commands::Whoami { json } => match store.load() {
            Some(session) => {
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&session).context("serialize session")?
                    );
                } else {
                    println!("name: {}", session.display_name());
                    println!("email: {}", session.user.email);
                    println!("role: {}", session.user.role);
                    if let Some(expires) = session.expires_at() {
                        println!("expires_at: {}", expires);
                    }
                }
            }
            None => println!("Not logged in"),
        },

        Commands::Doctors { command } => match command {
            DoctorCommands::List { page, json } => {
                let session = RouteGuard::new(&store).require_any()?;
                let client = authed_client(&profile, &session)?;
                let out = finish(&store, client.list_doctors(page))?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&out.doctors).context("serialize doctors")?
                    );
                } else {
                    for d in &out.doctors {
                        let degrees = d
                            .qualifications
                            .iter()
                            .map(|q| q.degree.as_str())
                            .collect::<Vec<_>>()
                            .join(", ");
                        println!("{} {} <{}> {}", d.id, d.display_name(), d.email, degrees);
                    }
                    print_pagination(&out.pagination);
                }
            }
            DoctorCommands::Create {
                first_name,
                last_name,
                email,
                password,
                password_confirmation,
                contact_number,
                qualifications,
            } => {
                let session = RouteGuard::new(&store).require(Surface::AdminDashboard)?;
                let form = DoctorForm {
                    first_name,
                    last_name,
                    email,
                    password,
                    password_confirmation,
                    contact_number,
                    qualifications,
                };
                form.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
                let client = authed_client(&profile, &session)?;
                let confirmation = finish(&store, client.create_doctor(&form.payload()))?;
                println!("{}", confirmation.text("Doctor created"));
            }
        },

        Commands::Qualifications { command } => match command {
            QualificationCommands::List { page, json } => {
                let session = RouteGuard::new(&store).require(Surface::AdminDashboard)?;
                let client = authed_client(&profile, &session)?;
                let out = finish(&store, client.list_qualifications(page))?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&out.qualifications)
                            .context("serialize qualifications")?
                    );
                } else {
                    for q in &out.qualifications {
                        println!(
                            "{} {} {}",
                            q.id,
                            q.degree,
                            q.description.as_deref().unwrap_or_default()
                        );
                    }
                    print_pagination(&out.pagination);
                }
            }
            QualificationCommands::Create {
                degree,
                description,
            } => {
                let session = RouteGuard::new(&store).require(Surface::AdminDashboard)?;
                let form = QualificationForm {
                    degree,
                    description,
                };
                form.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
                let client = authed_client(&profile, &session)?;
                let confirmation =
                    finish(&store, client.create_qualification(&form.degree, &form.description))?;
                println!("{}", confirmation.text("Qualification created"));
            }
        },

        Commands::Schedules { command } => match command {
            ScheduleCommands::List { doctor, page, json } => {
                let guard = RouteGuard::new(&store);
                let (session, doctor_id) = match doctor {
                    // Browsing another doctor's schedules is an admin action.
                    Some(id) => (guard.require(Surface::AdminDashboard)?, id),
                    None => {
                        let session = guard.require(Surface::DoctorDashboard)?;
                        let id = session.user.id.clone();
                        (session, id)
                    }
                };
                let client = authed_client(&profile, &session)?;
                let out = finish(&store, client.list_doctor_schedules(&doctor_id, page))?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&out.schedules)
                            .context("serialize schedules")?
                    );
                } else {
                    for s in &out.schedules {
                        let marker = if s.is_holiday { " (holiday)" } else { "" };
                        println!("{} {}{}", s.id, s.date, marker);
                    }
                    print_pagination(&out.pagination);
                }
            }
            ScheduleCommands::Create { doctor, day, times } => {
                let session = RouteGuard::new(&store).require(Surface::AdminDashboard)?;
                let form = ScheduleForm {
                    doctor_id: doctor,
                    day,
                    times,
                };
                form.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
                let client = authed_client(&profile, &session)?;
                let days = [DayPlan {
                    day: form.day.clone(),
                    time: form.times.clone(),
                }];
                let confirmation = finish(&store, client.create_schedule(&form.doctor_id, &days))?;
                println!("{}", confirmation.text("Schedule created"));
            }
            ScheduleCommands::MarkHoliday { schedule_id, clear } => {
                let session = RouteGuard::new(&store).require(Surface::DoctorDashboard)?;
                let client = authed_client(&profile, &session)?;
                let confirmation = finish(
                    &store,
                    client.set_schedule_holiday(&session.user.id, &schedule_id, !clear),
                )?;
                println!("{}", confirmation.text("Schedule updated"));
            }
        },

        Commands::Availabilities { command } => match command {
            AvailabilityCommands::List {
                schedule,
                page,
                json,
            } => {
                let session = RouteGuard::new(&store).require_any()?;
                let client = authed_client(&profile, &session)?;
                let out = finish(&store, client.list_availabilities(&schedule, page))?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&out.schedule.availabilities)
                            .context("serialize availabilities")?
                    );
                } else {
                    for a in &out.schedule.availabilities {
                        println!("{} {}", a.id, a.time);
                    }
                    if let Some(p) = &out.pagination {
                        print_pagination(p);
                    }
                }
            }
            AvailabilityCommands::Create { schedule, times } => {
                let session = RouteGuard::new(&store).require(Surface::AdminDashboard)?;
                let form = AvailabilityForm {
                    schedule_id: schedule,
                    times,
                };
                form.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
                let client = authed_client(&profile, &session)?;
                let confirmation = finish(
                    &store,
                    client.create_availabilities(&form.schedule_id, &form.times),
                )?;
                println!("{}", confirmation.text("Availabilities created"));
            }
        },

        Commands::Book {
            doctor,
            schedule,
            availability,
        } => {
            let session = RouteGuard::new(&store).require(Surface::PatientDashboard)?;
            let form = AppointmentForm {
                schedule_id: schedule,
                availability_id: availability,
            };
            form.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
            let client = authed_client(&profile, &session)?;
            let confirmation = finish(
                &store,
                client.book_appointment(&doctor, &form.schedule_id, &form.availability_id),
            )?;
            println!("{}", confirmation.text("Appointment booked successfully"));
        }

        Commands::Tui => {
            medibook::tui::run(profile)?;
        }
    }

    Ok(())
}

fn open_client(profile: &Profile) -> Result<ApiClient> {
    let base_url = profile.require_base_url()?;
    ApiClient::new(base_url).map_err(|e| anyhow::anyhow!(e))
}

fn authed_client(profile: &Profile, session: &medibook::session::Session) -> Result<ApiClient> {
    let base_url = profile.require_base_url()?;
    ApiClient::with_session(base_url, session).map_err(|e| anyhow::anyhow!(e))
}

/// Normalize a remote outcome for the terminal: a rejected token clears the
/// persisted session so the next guard check fails closed.
fn finish<T>(store: &SessionStore, result: Result<T, ApiError>) -> Result<T> {
    match result {
        Ok(v) => Ok(v),
        Err(err) => {
            if err.is_unauthorized() && store.role() != RoleAccess::Unauthenticated {
                let _ = store.clear();
            }
            Err(anyhow::anyhow!(err))
        }
    }
}

fn print_pagination(p: &medibook::model::Pagination) {
    let mut nav = Vec::new();
    if p.has_prev() {
        nav.push("prev");
    }
    if p.has_next() {
        nav.push("next");
    }
    if nav.is_empty() {
        println!("{}", p.summary());
    } else {
        println!("{} ({} available)", p.summary(), nav.join("/"));
    }
}

//! Interactive shell: a public landing surface plus one dashboard per role,
//! each gated by the route guard on every navigation.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::forms::{
    AppointmentForm, AvailabilityForm, DoctorForm, LoginForm, PatientRegisterForm,
    QualificationForm, ScheduleForm,
};
use crate::guard::{GuardState, RouteGuard, Surface};
use crate::model::{Availability, Doctor, Schedule};
use crate::profile::Profile;
use crate::remote::{ApiClient, ApiError, DayPlan};
use crate::session::{RoleAccess, Session, SessionStore};
use crate::view::ListView;

mod draw;
mod modal;

use modal::{FormField, FormKind, FormModal, ModalAction};

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub(crate) fn run(profile: Profile) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = event_loop(&mut terminal, profile);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    profile: Profile,
) -> Result<()> {
    let mut app = App::new(profile);
    app.startup_navigation();

    loop {
        terminal.draw(|frame| draw::draw(frame, &app))?;

        if !event::poll(Duration::from_millis(200)).context("poll events")? {
            continue;
        }
        match event::read().context("read event")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    Landing,
    Admin,
    Doctor,
    Patient,
}

/// Landing menu entries, in display order.
pub(crate) const LANDING_MENU: [&str; 4] = [
    "Patient Login",
    "Admin / Doctor Login",
    "Register Patient",
    "Quit",
];

pub(crate) struct App {
    profile: Profile,
    pub(crate) store: SessionStore,
    pub(crate) screen: Screen,
    pub(crate) session: Option<Session>,
    pub(crate) notice: Option<String>,
    pub(crate) landing_cursor: usize,

    pub(crate) doctors: ListView<Doctor>,
    pub(crate) schedules: ListView<Schedule>,
    pub(crate) slots: ListView<Availability>,
    pub(crate) row: usize,

    pub(crate) modal: Option<FormModal>,
    should_quit: bool,
}

impl App {
    fn new(profile: Profile) -> Self {
        let store = SessionStore::new(profile.clone());
        Self {
            profile,
            store,
            screen: Screen::Landing,
            session: None,
            notice: None,
            landing_cursor: 0,
            doctors: ListView::new(),
            schedules: ListView::new(),
            slots: ListView::new(),
            row: 0,
            modal: None,
            should_quit: false,
        }
    }

    /// A persisted session drops the user straight onto their dashboard.
    fn startup_navigation(&mut self) {
        match self.store.role() {
            RoleAccess::Admin => self.navigate(Surface::AdminDashboard),
            RoleAccess::Doctor => self.navigate(Surface::DoctorDashboard),
            RoleAccess::Patient => self.navigate(Surface::PatientDashboard),
            RoleAccess::Unauthenticated => {}
        }
    }

    /// Guarded navigation: re-evaluates the session on every entry and
    /// falls back to the landing surface when the guard redirects.
    fn navigate(&mut self, surface: Surface) {
        match RouteGuard::new(&self.store).evaluate(surface) {
            GuardState::Authorized(session) => {
                self.session = Some(session);
                self.row = 0;
                self.screen = match surface {
                    Surface::AdminDashboard => Screen::Admin,
                    Surface::DoctorDashboard => Screen::Doctor,
                    Surface::PatientDashboard => Screen::Patient,
                };
                match self.screen {
                    Screen::Admin | Screen::Patient => {
                        self.doctors.reset();
                        self.fetch_doctors();
                    }
                    Screen::Doctor => {
                        self.schedules.reset();
                        self.slots.reset();
                        self.fetch_schedules();
                    }
                    Screen::Landing => {}
                }
            }
            GuardState::Loading | GuardState::Redirected => self.to_landing(None),
        }
    }

    fn to_landing(&mut self, notice: Option<String>) {
        self.screen = Screen::Landing;
        self.session = None;
        self.landing_cursor = 0;
        self.doctors.reset();
        self.schedules.reset();
        self.slots.reset();
        if notice.is_some() {
            self.notice = notice;
        }
    }

    fn client(&self) -> Result<ApiClient, ApiError> {
        let base_url = self
            .profile
            .require_base_url()
            .map_err(|_| ApiError::Rejected(
                "no API configured (run `medibook config set-url`)".to_string(),
            ))?;
        match &self.session {
            Some(session) => ApiClient::with_session(base_url, session),
            None => ApiClient::new(base_url),
        }
    }

    /// Show a success confirmation, unless a failure notice was already
    /// raised while finishing the action (a dependent re-fetch failing,
    /// say). The failure is the one the user needs to see.
    fn confirm(&mut self, message: String) {
        if self.notice.is_none() {
            self.notice = Some(message);
        }
    }

    /// Remote-failure policy: a rejected token clears the session and
    /// redirects to landing; everything else becomes a notice.
    fn report_failure(&mut self, err: ApiError) {
        if err.is_unauthorized() {
            let _ = self.store.clear();
            self.to_landing(Some(err.to_string()));
        } else {
            self.notice = Some(err.to_string());
        }
    }

    // --- fetches -----------------------------------------------------------

    fn fetch_doctors(&mut self) {
        let tag = self.doctors.begin_fetch();
        let page = self.doctors.page();
        match self.client().and_then(|c| c.list_doctors(page)) {
            Ok(out) => {
                if self.doctors.apply(tag, out.doctors, Some(out.pagination)) {
                    self.row = 0;
                }
            }
            Err(err) => self.report_failure(err),
        }
    }

    fn fetch_schedules(&mut self) {
        let Some(doctor_id) = self.session.as_ref().map(|s| s.user.id.clone()) else {
            return;
        };
        let tag = self.schedules.begin_fetch();
        let page = self.schedules.page();
        match self
            .client()
            .and_then(|c| c.list_doctor_schedules(&doctor_id, page))
        {
            Ok(out) => {
                if self.schedules.apply(tag, out.schedules, Some(out.pagination)) {
                    self.row = 0;
                }
            }
            Err(err) => self.report_failure(err),
        }
    }

    fn fetch_slots_for_selected_schedule(&mut self) {
        let Some(schedule) = self.schedules.items().get(self.row).cloned() else {
            return;
        };
        let tag = self.slots.begin_fetch();
        let page = self.slots.page();
        match self
            .client()
            .and_then(|c| c.list_availabilities(&schedule.id, page))
        {
            Ok(out) => {
                self.slots
                    .apply(tag, out.schedule.availabilities, out.pagination);
            }
            Err(err) => self.report_failure(err),
        }
    }

    // --- key handling ------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        self.notice = None;

        if self.modal.is_some() {
            self.handle_modal_key(key);
            return;
        }

        match self.screen {
            Screen::Landing => self.handle_landing_key(key),
            Screen::Admin => self.handle_admin_key(key),
            Screen::Doctor => self.handle_doctor_key(key),
            Screen::Patient => self.handle_patient_key(key),
        }
    }

    fn handle_landing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => {
                self.landing_cursor =
                    (self.landing_cursor + LANDING_MENU.len() - 1) % LANDING_MENU.len();
            }
            KeyCode::Down => {
                self.landing_cursor = (self.landing_cursor + 1) % LANDING_MENU.len();
            }
            KeyCode::Enter => match self.landing_cursor {
                0 => self.open_login(&[("patient", "Patient")]),
                1 => self.open_login(&[("admin", "Admin"), ("doctor", "Doctor")]),
                2 => self.open_register(),
                _ => self.should_quit = true,
            },
            _ => {}
        }
    }

    fn handle_admin_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('o') => self.logout(),
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => {
                if self.row + 1 < self.doctors.items().len() {
                    self.row += 1;
                }
            }
            KeyCode::Char('n') => {
                if self.doctors.begin_next_page().is_some() {
                    self.fetch_doctors();
                }
            }
            KeyCode::Char('p') => {
                if self.doctors.begin_prev_page().is_some() {
                    self.fetch_doctors();
                }
            }
            KeyCode::Char('d') => self.open_create_doctor(),
            KeyCode::Char('u') => self.open_create_qualification(),
            KeyCode::Char('s') => self.open_create_schedule(),
            KeyCode::Char('a') => self.open_create_availability(),
            _ => {}
        }
    }

    fn handle_doctor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('o') => self.logout(),
            KeyCode::Up => {
                self.row = self.row.saturating_sub(1);
                self.slots.reset();
            }
            KeyCode::Down => {
                if self.row + 1 < self.schedules.items().len() {
                    self.row += 1;
                    self.slots.reset();
                }
            }
            KeyCode::Char('n') => {
                if self.schedules.begin_next_page().is_some() {
                    self.slots.reset();
                    self.fetch_schedules();
                }
            }
            KeyCode::Char('p') => {
                if self.schedules.begin_prev_page().is_some() {
                    self.slots.reset();
                    self.fetch_schedules();
                }
            }
            KeyCode::Enter => self.fetch_slots_for_selected_schedule(),
            KeyCode::Char(']') => {
                if self.slots.begin_next_page().is_some() {
                    self.fetch_slots_for_selected_schedule();
                }
            }
            KeyCode::Char('[') => {
                if self.slots.begin_prev_page().is_some() {
                    self.fetch_slots_for_selected_schedule();
                }
            }
            KeyCode::Char('h') => self.toggle_selected_holiday(),
            _ => {}
        }
    }

    fn handle_patient_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('o') => self.logout(),
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => {
                if self.row + 1 < self.doctors.items().len() {
                    self.row += 1;
                }
            }
            KeyCode::Char('n') => {
                if self.doctors.begin_next_page().is_some() {
                    self.fetch_doctors();
                }
            }
            KeyCode::Char('p') => {
                if self.doctors.begin_prev_page().is_some() {
                    self.fetch_doctors();
                }
            }
            KeyCode::Enter | KeyCode::Char('b') => self.open_book_appointment(),
            _ => {}
        }
    }

    // --- session actions ---------------------------------------------------

    fn logout(&mut self) {
        let result = self.client().and_then(|c| c.logout());
        // The local record goes away regardless; a rejected token is just as
        // logged out as an accepted DELETE.
        let _ = self.store.clear();
        match result {
            Ok(()) | Err(ApiError::Unauthorized) => self.to_landing(Some("Logged out".into())),
            Err(err) => self.to_landing(Some(err.to_string())),
        }
    }

    fn toggle_selected_holiday(&mut self) {
        let Some(schedule) = self.schedules.items().get(self.row).cloned() else {
            return;
        };
        let Some(doctor_id) = self.session.as_ref().map(|s| s.user.id.clone()) else {
            return;
        };
        match self.client().and_then(|c| {
            c.set_schedule_holiday(&doctor_id, &schedule.id, !schedule.is_holiday)
        }) {
            Ok(confirmation) => {
                self.notice = Some(confirmation.text("Schedule updated"));
                self.fetch_schedules();
            }
            Err(err) => self.report_failure(err),
        }
    }

    // --- modal plumbing ----------------------------------------------------

    fn open_login(&mut self, roles: &[(&str, &str)]) {
        let options = roles
            .iter()
            .map(|(value, label)| (value.to_string(), label.to_string()))
            .collect();
        self.modal = Some(FormModal::new(
            "Login",
            FormKind::Login,
            vec![
                FormField::text("email", "Email"),
                FormField::secret("password", "Password"),
                FormField::select("role", "Role", options),
            ],
        ));
    }

    fn open_register(&mut self) {
        self.modal = Some(FormModal::new(
            "Register Patient",
            FormKind::Register,
            vec![
                FormField::text("first_name", "First name"),
                FormField::text("last_name", "Last name"),
                FormField::text("email", "Email"),
                FormField::secret("password", "Password"),
                FormField::secret("password_confirmation", "Confirm password"),
                FormField::text("contact_number", "Contact number"),
            ],
        ));
    }

    fn open_create_doctor(&mut self) {
        // The qualification picker is filled from the catalog before the
        // form opens; an empty catalog still allows creating the doctor.
        let options = match self.client().and_then(|c| c.list_qualifications(1)) {
            Ok(out) => out
                .qualifications
                .into_iter()
                .map(|q| (q.id, q.degree))
                .collect(),
            Err(err) => {
                self.report_failure(err);
                return;
            }
        };
        self.modal = Some(FormModal::new(
            "Create Doctor",
            FormKind::CreateDoctor,
            vec![
                FormField::text("first_name", "First name"),
                FormField::text("last_name", "Last name"),
                FormField::text("email", "Email"),
                FormField::secret("password", "Password"),
                FormField::secret("password_confirmation", "Confirm password"),
                FormField::text("contact_number", "Contact number"),
                FormField::select("qualifications", "Qualification", options),
            ],
        ));
    }

    fn open_create_qualification(&mut self) {
        self.modal = Some(FormModal::new(
            "Create Qualification",
            FormKind::CreateQualification,
            vec![
                FormField::text("degree", "Degree"),
                FormField::text("description", "Description"),
            ],
        ));
    }

    fn doctor_options(&mut self) -> Option<Vec<(String, String)>> {
        match self.client().and_then(|c| c.list_doctors(1)) {
            Ok(out) => Some(out.doctors.into_iter().map(doctor_option).collect()),
            Err(err) => {
                self.report_failure(err);
                None
            }
        }
    }

    fn open_create_schedule(&mut self) {
        let Some(doctors) = self.doctor_options() else {
            return;
        };
        let days = WEEKDAYS
            .iter()
            .map(|d| (d.to_string(), d.to_string()))
            .collect();
        self.modal = Some(FormModal::new(
            "Create Schedule",
            FormKind::CreateSchedule,
            vec![
                FormField::select("doctor", "Doctor", doctors),
                FormField::select("day", "Day", days),
                FormField::text("time", "Times (comma-separated, HH:MM am/pm)"),
            ],
        ));
    }

    fn open_create_availability(&mut self) {
        let Some(doctors) = self.doctor_options() else {
            return;
        };
        self.modal = Some(FormModal::new(
            "Create Availability",
            FormKind::CreateAvailability,
            vec![
                FormField::select("doctor", "Doctor", doctors),
                FormField::select("schedule", "Schedule", Vec::new()),
                FormField::text("time", "Times (comma-separated, HH:MM am/pm)"),
            ],
        ));
    }

    fn open_book_appointment(&mut self) {
        let Some(doctor) = self.doctors.items().get(self.row).cloned() else {
            return;
        };
        // Holidays are not bookable; the picker drops them up front.
        let schedules = match self
            .client()
            .and_then(|c| c.list_doctor_schedules(&doctor.id, 1))
        {
            Ok(out) => out
                .schedules
                .into_iter()
                .filter(|s| !s.is_holiday)
                .map(|s| (s.id, s.date))
                .collect(),
            Err(err) => {
                self.report_failure(err);
                return;
            }
        };
        let mut modal = FormModal::new(
            "Book Appointment",
            FormKind::BookAppointment,
            vec![
                FormField::select("doctor", "Doctor", vec![doctor_option(doctor)]),
                FormField::select("schedule", "Schedule", schedules),
                FormField::select("availability", "Availability", Vec::new()),
            ],
        );
        modal.focus = 1;
        self.modal = Some(modal);
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let Some(modal) = &mut self.modal else {
            return;
        };
        match modal.handle_key(key) {
            ModalAction::None => {}
            ModalAction::Close => self.modal = None,
            ModalAction::FieldChanged(name) => self.refresh_dependent_options(name),
            ModalAction::Submit => self.submit_modal(),
        }
    }

    /// Cascading selects: picking a doctor refreshes its schedules, picking
    /// a schedule refreshes its open slots.
    fn refresh_dependent_options(&mut self, changed: &'static str) {
        let Some(modal) = &self.modal else {
            return;
        };
        match (modal.kind, changed) {
            (FormKind::CreateAvailability, "doctor") => {
                let doctor_id = modal.value("doctor");
                let schedules = match self
                    .client()
                    .and_then(|c| c.list_doctor_schedules(&doctor_id, 1))
                {
                    Ok(out) => out
                        .schedules
                        .into_iter()
                        .map(|s| (s.id, s.date))
                        .collect(),
                    Err(err) => {
                        self.report_failure(err);
                        return;
                    }
                };
                if let Some(modal) = &mut self.modal
                    && let Some(field) = modal.field_mut("schedule")
                {
                    field.replace_options(schedules);
                }
            }
            (FormKind::BookAppointment, "schedule") => {
                let schedule_id = modal.value("schedule");
                let slots = match self.client().and_then(|c| c.list_availabilities(&schedule_id, 1))
                {
                    Ok(out) => out
                        .schedule
                        .availabilities
                        .into_iter()
                        .map(|a| (a.id, a.time))
                        .collect(),
                    Err(err) => {
                        self.report_failure(err);
                        return;
                    }
                };
                if let Some(modal) = &mut self.modal
                    && let Some(field) = modal.field_mut("availability")
                {
                    field.replace_options(slots);
                }
            }
            _ => {}
        }
    }

    fn submit_modal(&mut self) {
        let Some(modal) = &mut self.modal else {
            return;
        };
        modal.clear_errors();
        modal.submitting = true;
        let kind = modal.kind;

        let outcome = match kind {
            FormKind::Login => self.submit_login(),
            FormKind::Register => self.submit_register(),
            FormKind::CreateDoctor => self.submit_create_doctor(),
            FormKind::CreateQualification => self.submit_create_qualification(),
            FormKind::CreateSchedule => self.submit_create_schedule(),
            FormKind::CreateAvailability => self.submit_create_availability(),
            FormKind::BookAppointment => self.submit_book_appointment(),
        };

        match outcome {
            SubmitOutcome::Done(message) => {
                self.modal = None;
                self.confirm(message);
            }
            SubmitOutcome::Invalid | SubmitOutcome::Failed => {
                // Form stays populated and re-enabled for retry.
                if let Some(modal) = &mut self.modal {
                    modal.submitting = false;
                }
            }
        }
    }

    fn submit_login(&mut self) -> SubmitOutcome {
        let Some(modal) = &mut self.modal else {
            return SubmitOutcome::Failed;
        };
        let form = LoginForm {
            email: modal.value("email"),
            password: modal.value("password"),
            role: modal.value("role"),
        };
        if let Err(errs) = form.validate() {
            modal.set_errors(&errs);
            return SubmitOutcome::Invalid;
        }
        match self
            .client()
            .and_then(|c| c.login(&form.email, &form.password, &form.role))
        {
            Ok(session) => {
                if let Err(err) = self.store.save(&session) {
                    self.notice = Some(format!("{:#}", err));
                    return SubmitOutcome::Failed;
                }
                self.modal = None;
                match RoleAccess::from_session(Some(&session)) {
                    RoleAccess::Admin => self.navigate(Surface::AdminDashboard),
                    RoleAccess::Doctor => self.navigate(Surface::DoctorDashboard),
                    RoleAccess::Patient => self.navigate(Surface::PatientDashboard),
                    RoleAccess::Unauthenticated => {
                        self.to_landing(Some("Server returned an unusable session".into()))
                    }
                }
                SubmitOutcome::Done(format!("Logged in as {}", session.display_name()))
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    fn submit_register(&mut self) -> SubmitOutcome {
        let Some(modal) = &mut self.modal else {
            return SubmitOutcome::Failed;
        };
        let form = PatientRegisterForm {
            first_name: modal.value("first_name"),
            last_name: modal.value("last_name"),
            email: modal.value("email"),
            password: modal.value("password"),
            password_confirmation: modal.value("password_confirmation"),
            contact_number: modal.value("contact_number"),
        };
        if let Err(errs) = form.validate() {
            modal.set_errors(&errs);
            return SubmitOutcome::Invalid;
        }
        self.finish_mutation(
            |c| c.register_patient(&form.payload()),
            "Patient registered (log in to continue)",
            Refresh::None,
        )
    }

    fn submit_create_doctor(&mut self) -> SubmitOutcome {
        let Some(modal) = &mut self.modal else {
            return SubmitOutcome::Failed;
        };
        let selected = modal.value("qualifications");
        let form = DoctorForm {
            first_name: modal.value("first_name"),
            last_name: modal.value("last_name"),
            email: modal.value("email"),
            password: modal.value("password"),
            password_confirmation: modal.value("password_confirmation"),
            contact_number: modal.value("contact_number"),
            qualifications: if selected.is_empty() {
                Vec::new()
            } else {
                vec![selected]
            },
        };
        if let Err(errs) = form.validate() {
            modal.set_errors(&errs);
            return SubmitOutcome::Invalid;
        }
        self.finish_mutation(
            |c| c.create_doctor(&form.payload()),
            "Doctor created",
            Refresh::Doctors,
        )
    }

    fn submit_create_qualification(&mut self) -> SubmitOutcome {
        let Some(modal) = &mut self.modal else {
            return SubmitOutcome::Failed;
        };
        let form = QualificationForm {
            degree: modal.value("degree"),
            description: modal.value("description"),
        };
        if let Err(errs) = form.validate() {
            modal.set_errors(&errs);
            return SubmitOutcome::Invalid;
        }
        self.finish_mutation(
            |c| c.create_qualification(&form.degree, &form.description),
            "Qualification created",
            Refresh::None,
        )
    }

    fn submit_create_schedule(&mut self) -> SubmitOutcome {
        let Some(modal) = &mut self.modal else {
            return SubmitOutcome::Failed;
        };
        let form = ScheduleForm {
            doctor_id: modal.value("doctor"),
            day: modal.value("day"),
            times: split_times(&modal.value("time")),
        };
        if let Err(errs) = form.validate() {
            modal.set_errors(&errs);
            return SubmitOutcome::Invalid;
        }
        let days = [DayPlan {
            day: form.day.clone(),
            time: form.times.clone(),
        }];
        self.finish_mutation(
            |c| c.create_schedule(&form.doctor_id, &days),
            "Schedule created",
            Refresh::None,
        )
    }

    fn submit_create_availability(&mut self) -> SubmitOutcome {
        let Some(modal) = &mut self.modal else {
            return SubmitOutcome::Failed;
        };
        let form = AvailabilityForm {
            schedule_id: modal.value("schedule"),
            times: split_times(&modal.value("time")),
        };
        if let Err(errs) = form.validate() {
            modal.set_errors(&errs);
            return SubmitOutcome::Invalid;
        }
        self.finish_mutation(
            |c| c.create_availabilities(&form.schedule_id, &form.times),
            "Availabilities created",
            Refresh::None,
        )
    }

    fn submit_book_appointment(&mut self) -> SubmitOutcome {
        let Some(modal) = &mut self.modal else {
            return SubmitOutcome::Failed;
        };
        let doctor_id = modal.value("doctor");
        let form = AppointmentForm {
            schedule_id: modal.value("schedule"),
            availability_id: modal.value("availability"),
        };
        if let Err(errs) = form.validate() {
            modal.set_errors(&errs);
            return SubmitOutcome::Invalid;
        }
        self.finish_mutation(
            |c| c.book_appointment(&doctor_id, &form.schedule_id, &form.availability_id),
            "Appointment booked successfully",
            Refresh::None,
        )
    }

    fn finish_mutation(
        &mut self,
        call: impl FnOnce(&ApiClient) -> Result<crate::remote::Confirmation, ApiError>,
        fallback: &'static str,
        refresh: Refresh,
    ) -> SubmitOutcome {
        let result = self.client().and_then(|c| call(&c));
        match result {
            Ok(confirmation) => {
                match refresh {
                    Refresh::Doctors => self.fetch_doctors(),
                    Refresh::None => {}
                }
                SubmitOutcome::Done(confirmation.text(fallback))
            }
            Err(err) => {
                if err.is_unauthorized() {
                    self.modal = None;
                    self.report_failure(err);
                } else {
                    self.notice = Some(err.to_string());
                }
                SubmitOutcome::Failed
            }
        }
    }
}

enum SubmitOutcome {
    Done(String),
    Invalid,
    Failed,
}

enum Refresh {
    None,
    Doctors,
}

/// Select-option pair for a doctor: the id is submitted, the name shown.
fn doctor_option(doctor: Doctor) -> (String, String) {
    let label = doctor.display_name();
    (doctor.id, label)
}

fn split_times(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

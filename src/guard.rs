//! Gate each role-specific surface behind the session store.
//!
//! Per navigation the check runs `Loading -> { Authorized, Redirected }` and
//! always re-reads the store, so a logout elsewhere takes effect on the next
//! navigation rather than being cached away.

use crate::session::{RoleAccess, Session, SessionStore};

/// A protected area of the client and the role it demands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    AdminDashboard,
    DoctorDashboard,
    PatientDashboard,
}

impl Surface {
    pub fn required_role(&self) -> RoleAccess {
        match self {
            Surface::AdminDashboard => RoleAccess::Admin,
            Surface::DoctorDashboard => RoleAccess::Doctor,
            Surface::PatientDashboard => RoleAccess::Patient,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Surface::AdminDashboard => "Admin Dashboard",
            Surface::DoctorDashboard => "Doctor Dashboard",
            Surface::PatientDashboard => "Patient Dashboard",
        }
    }
}

/// Outcome of one guard evaluation. `Loading` is the state before the
/// session has been read; the check is synchronous today but kept as a
/// distinct state so a server-side token validation could suspend it.
#[derive(Clone, Debug)]
pub enum GuardState {
    Loading,
    Authorized(Session),
    Redirected,
}

impl GuardState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardState::Authorized(_))
    }
}

pub struct RouteGuard<'a> {
    store: &'a SessionStore,
}

impl<'a> RouteGuard<'a> {
    pub fn new(store: &'a SessionStore) -> Self {
        Self { store }
    }

    /// Resolve the guard for one navigation to `surface`.
    pub fn evaluate(&self, surface: Surface) -> GuardState {
        let Some(session) = self.store.load() else {
            return GuardState::Redirected;
        };
        if RoleAccess::from_session(Some(&session)) == surface.required_role() {
            GuardState::Authorized(session)
        } else {
            GuardState::Redirected
        }
    }

    /// CLI entry point: an unauthorized surface is an error naming the
    /// required role instead of a screen redirect.
    pub fn require(&self, surface: Surface) -> anyhow::Result<Session> {
        match self.evaluate(surface) {
            GuardState::Authorized(session) => Ok(session),
            _ => anyhow::bail!(
                "not authorized for the {} (log in with role `{}`)",
                surface.title(),
                surface.required_role().label()
            ),
        }
    }

    /// Operations shared by every logged-in role (doctor roster, slot
    /// lookups) need a recognized session but no particular surface.
    pub fn require_any(&self) -> anyhow::Result<Session> {
        let Some(session) = self.store.load() else {
            anyhow::bail!("not logged in (run `medibook login`)");
        };
        match RoleAccess::from_session(Some(&session)) {
            RoleAccess::Unauthenticated => {
                anyhow::bail!("not logged in (run `medibook login`)")
            }
            _ => Ok(session),
        }
    }
}

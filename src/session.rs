//! The authenticated identity held by the client, and its durable store.
//!
//! A persisted session is either fully formed (non-empty role and token) or
//! treated as absent. Loading fails closed: any missing, unreadable, or
//! malformed record reads as "not logged in", never as an error.

use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::profile::{Profile, write_atomic};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(default)]
    pub contact_number: Option<String>,

    pub role: String,
    pub authentication: AuthTokens,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthTokens {
    pub token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,

    #[serde(default)]
    pub expires_at: Option<String>,
}

impl Session {
    /// A session authenticates only when both role and token are present.
    pub fn is_well_formed(&self) -> bool {
        !self.user.role.trim().is_empty() && !self.user.authentication.token.trim().is_empty()
    }

    pub fn token(&self) -> &str {
        &self.user.authentication.token
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.user.first_name, self.user.last_name)
    }

    /// Expiry instant, if the server sent a parseable RFC 3339 timestamp.
    pub fn expires_at(&self) -> Option<time::OffsetDateTime> {
        let raw = self.user.authentication.expires_at.as_deref()?;
        time::OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339).ok()
    }
}

/// Exactly one access level holds at a time; unrecognized roles are
/// indistinguishable from being logged out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleAccess {
    Unauthenticated,
    Admin,
    Doctor,
    Patient,
}

impl RoleAccess {
    pub fn from_session(session: Option<&Session>) -> Self {
        let Some(session) = session else {
            return RoleAccess::Unauthenticated;
        };
        if !session.is_well_formed() {
            return RoleAccess::Unauthenticated;
        }
        match session.user.role.as_str() {
            "admin" => RoleAccess::Admin,
            "doctor" => RoleAccess::Doctor,
            "patient" => RoleAccess::Patient,
            _ => RoleAccess::Unauthenticated,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoleAccess::Unauthenticated => "unauthenticated",
            RoleAccess::Admin => "admin",
            RoleAccess::Doctor => "doctor",
            RoleAccess::Patient => "patient",
        }
    }
}

/// Single owner of the persisted session record. All mutation goes through
/// `save`/`clear`; reads go back to disk every time so a logout in another
/// process is observed on the next check.
#[derive(Clone)]
pub struct SessionStore {
    profile: Profile,
}

impl SessionStore {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    /// Read the persisted session. Absent, unreadable, unparsable, or
    /// partial records all load as `None`.
    pub fn load(&self) -> Option<Session> {
        let bytes = fs::read(self.profile.session_path()).ok()?;
        let session: Session = serde_json::from_slice(&bytes).ok()?;
        if !session.is_well_formed() {
            return None;
        }
        Some(session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(session).context("serialize session")?;
        write_atomic(&self.profile.session_path(), &bytes).context("write session.json")?;
        Ok(())
    }

    /// Remove the persisted record. Also called defensively whenever the
    /// server rejects the bearer token.
    pub fn clear(&self) -> Result<()> {
        let path = self.profile.session_path();
        if path.exists() {
            fs::remove_file(&path).context("remove session.json")?;
        }
        Ok(())
    }

    pub fn role(&self) -> RoleAccess {
        RoleAccess::from_session(self.load().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: &str, token: &str) -> Session {
        Session {
            user: UserProfile {
                id: "u-1".into(),
                first_name: "Asha".into(),
                last_name: "Rao".into(),
                email: "asha@example.com".into(),
                contact_number: Some("9876543210".into()),
                role: role.into(),
                authentication: AuthTokens {
                    token: token.into(),
                    refresh_token: None,
                    expires_at: None,
                },
            },
        }
    }

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let profile = Profile::open_at(dir.path().to_path_buf()).unwrap();
        (dir, SessionStore::new(profile))
    }

    #[test]
    fn absent_record_loads_as_none() {
        let (_dir, store) = store();
        assert!(store.load().is_none());
        assert_eq!(store.role(), RoleAccess::Unauthenticated);
    }

    #[test]
    fn malformed_record_loads_as_none() {
        let (dir, store) = store();
        fs::write(dir.path().join("session.json"), b"{not json").unwrap();
        assert!(store.load().is_none());

        fs::write(dir.path().join("session.json"), b"{\"user\":{}}").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn partial_session_never_authenticates() {
        let (_dir, store) = store();
        store.save(&session("doctor", "")).unwrap();
        assert!(store.load().is_none());

        store.save(&session("", "tok")).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_load_clear_round_trip() {
        let (_dir, store) = store();
        store.save(&session("patient", "tok-123")).unwrap();

        let loaded = store.load().expect("session persisted");
        assert_eq!(loaded.token(), "tok-123");
        assert_eq!(store.role(), RoleAccess::Patient);

        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn unknown_role_derives_unauthenticated() {
        for role in ["nurse", "root", "ADMIN", " "] {
            let s = session(role, "tok");
            assert_eq!(
                RoleAccess::from_session(Some(&s)),
                RoleAccess::Unauthenticated,
                "role {:?}",
                role
            );
        }
        assert_eq!(
            RoleAccess::from_session(Some(&session("admin", "tok"))),
            RoleAccess::Admin
        );
        assert_eq!(RoleAccess::from_session(None), RoleAccess::Unauthenticated);
    }
}

use anyhow::Result;

use crate::profile::Profile;

/// Entry point for `medibook tui`.
pub fn run(profile: Profile) -> Result<()> {
    crate::tui_shell::run(profile)
}

//! Interfaces command implementation.

use netaudio_core::netif;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::get_formatter;

/// List the candidate interfaces and mark the one selection would pick.
pub fn run_interfaces(globals: &GlobalOpts) -> Result<(), CliError> {
    let candidates = netif::list_candidates();
    let selected = netif::select_interface(globals.interface.as_deref()).ok();

    let formatter = get_formatter(globals.json);
    println!(
        "{}",
        formatter.format_interfaces(&candidates, selected.as_ref().map(|s| s.name.as_str()))
    );

    if candidates.is_empty() {
        return Err(CliError::Other(
            "No usable network interfaces found".to_string(),
        ));
    }

    Ok(())
}

mod reset;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `chalk auth <subcommand>`.
pub fn handle(action: &AuthCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Reset => reset::handle(flags),
    }
}

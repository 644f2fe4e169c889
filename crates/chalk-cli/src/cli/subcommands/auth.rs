use clap::Subcommand;

/// Sign-in commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Forget the anonymous user id; the next run signs in as a new user.
    Reset,
}

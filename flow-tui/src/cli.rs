use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "flow-tui")]
#[command(about = "Terminal dashboard for freelance projects, clients and time tracking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the configured record API
    Run,
    /// Run in dev mode with in-memory seed data
    Dev,
    /// Store an API session token after checking it
    Login,
    /// Remove the stored session
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_subcommands() {
        let cli = Cli::try_parse_from(["flow-tui", "config-path"]).unwrap();
        assert!(matches!(cli.command, Commands::ConfigPath));
        assert!(Cli::try_parse_from(["flow-tui"]).is_err());
    }
}

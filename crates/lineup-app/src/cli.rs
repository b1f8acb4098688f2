// Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "lineup-watch",
    version,
    about = "Flags empty, injured, inactive and bye-week starters in a Sleeper league and posts them to GroupMe"
)]
pub struct Cli {
    #[arg(long, global = true, env = "LINEUP_LEAGUE_ID", help = "Sleeper league ID")]
    pub league_id: Option<String>,

    #[arg(long, global = true, env = "LINEUP_BOT_ID", help = "GroupMe bot ID")]
    pub bot_id: Option<String>,

    #[arg(long, global = true, env = "LINEUP_USER_ID", help = "Your Sleeper user ID")]
    pub user_id: Option<String>,

    #[arg(long, global = true, env = "LINEUP_CONFIG", help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(about = "Check lineups once and post alerts (default)")]
    Check {
        #[arg(long, help = "Print alerts instead of posting them")]
        dry_run: bool,
    },

    #[command(about = "Check lineups now and then on a fixed interval")]
    Watch {
        #[arg(long, help = "Minutes between checks")]
        every: Option<u64>,
    },

    #[command(about = "Serve the HTTP health/check endpoints")]
    Serve {
        #[arg(long, help = "Port to listen on")]
        port: Option<u16>,

        #[arg(long, help = "Also run scheduled checks")]
        schedule: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Check { dry_run: false })
    }

    pub fn overrides(&self) -> Overrides {
        let (interval_minutes, port) = match &self.command {
            Some(Command::Watch { every }) => (*every, None),
            Some(Command::Serve { port, .. }) => (None, *port),
            _ => (None, None),
        };
        Overrides {
            league_id: self.league_id.clone(),
            bot_id: self.bot_id.clone(),
            user_id: self.user_id.clone(),
            interval_minutes,
            port,
        }
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[arg(
        long,
        help = "Folder with the configuration files [default: ./configuration]"
    )]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Log in and store the returned token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "STUDYGATE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Keep the token after this process exits
        #[arg(short, long, action)]
        remember_me: bool,
    },
    /// Clear the stored credentials and notify the server
    Logout,
    /// Check the stored token against the server
    Status,
    /// Same as status but offers to log in if not authenticated
    Require {
        #[arg(long, action)]
        no_redirect: bool,
    },
    /// Show the permissions of the logged in user
    Permissions,
    /// Delete an entity if permitted
    Delete {
        /// Plural entity name as used by the API (eg. studies)
        entity_type: String,
        entity_id: String,
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Send an authenticated request and print the response
    Fetch {
        path: String,
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Show who is logged in
    Whoami,
}

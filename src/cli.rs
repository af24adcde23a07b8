// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "idlestamp",
    version = env!("CARGO_PKG_VERSION"),
    about = "Stamps the time you stopped typing"
)]
pub struct Args {
    /// Settings data file (defaults to the user config dir)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    /// Plain output, no ANSI colors
    #[arg(long, action)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Watch stdin and stamp the time typing stops (default)")]
    Run,

    #[command(about = "Print the effective settings as JSON")]
    Show,

    #[command(about = "Change one setting, e.g. `set color-mode gradient`")]
    Set {
        field: String,

        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 1..)]
        value: Vec<String>,
    },

    #[command(about = "Print the settings file path")]
    Path,
}

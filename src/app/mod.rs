// Author: Dustin Pilgrim
// License: MIT

pub mod command;
pub mod run_mode;

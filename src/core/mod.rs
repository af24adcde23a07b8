// Author: Dustin Pilgrim
// License: MIT

pub mod events;
pub mod fonts;
pub mod host;
pub mod overlay;
pub mod theme;
pub mod timer;
pub mod tracker;

#[cfg(test)]
mod tracker_tests;

// Author: Dustin Pilgrim
// License: MIT

pub mod catalog;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod detector;
pub mod display;
pub mod error;
pub mod events;
pub mod info;
pub mod input;
pub mod manager_msg;
pub mod session;
pub mod utils;
pub mod warning;

#[cfg(test)]
mod coordinator_tests;
#[cfg(test)]
mod session_tests;

// Library root for the lineup-watch binary, exposed so integration tests can
// drive the runner, scheduler and HTTP surface directly.

pub mod cli;
pub mod config;
pub mod runner;
pub mod schedule;
pub mod server;

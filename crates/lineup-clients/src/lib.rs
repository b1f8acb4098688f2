// HTTP implementations of the lineup-core collaborator traits.

pub mod groupme;
pub mod sleeper;

#[cfg(test)]
mod test_server;

pub use groupme::GroupMeClient;
pub use sleeper::SleeperClient;

pub(crate) const USER_AGENT: &str = concat!("lineup-watch/", env!("CARGO_PKG_VERSION"));

//! Announcement destinations, owned and enumerated by the host.

use announcer_config_and_utils::DestinationConfig;

/// A delivery target such as a chat channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub name: String,
    /// Only subscribed destinations receive scheduled announcements.
    pub subscribed: bool,
}

impl Destination {
    pub fn new(name: impl Into<String>, subscribed: bool) -> Self {
        Self {
            name: name.into(),
            subscribed,
        }
    }
}

impl From<&DestinationConfig> for Destination {
    fn from(config: &DestinationConfig) -> Self {
        Self::new(config.name.clone(), config.announce)
    }
}

/// Host capability for enumerating and delivering to destinations.
///
/// The announcer snapshots the list once per cycle.
pub trait DestinationDirectory: Send + Sync {
    /// Current destinations with their subscription flags.
    fn list_active_destinations(&self) -> Vec<Destination>;

    /// Fire-and-forget send of one line; failures are the host's concern.
    fn deliver(&self, destination: &Destination, line: &str);
}

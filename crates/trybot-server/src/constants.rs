//! Webhook constants.

/// GitHub event header.
pub const GITHUB_EVENT_HEADER: &str = "X-GitHub-Event";
/// GitHub delivery header.
pub const GITHUB_DELIVERY_HEADER: &str = "X-GitHub-Delivery";
/// Remembered webhook deliveries.
pub const DELIVERY_WINDOW_SIZE: usize = 1024;
/// Seen builds are remembered over this many polls worth of builds.
pub const SEEN_BUILDS_POLL_FACTOR: usize = 10;

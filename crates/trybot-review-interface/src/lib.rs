//! Review system interface.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod errors;
mod interface;
mod types;

pub use errors::{Result, ReviewError};
#[cfg(any(test, feature = "testkit"))]
pub use interface::MockReviewService;
pub use interface::ReviewService;
pub use types::PullRequestHead;

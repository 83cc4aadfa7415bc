//! CI system interface.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod errors;
mod interface;
pub mod types;

pub use errors::{CiError, Result};
#[cfg(any(test, feature = "testkit"))]
pub use interface::MockCiService;
pub use interface::CiService;

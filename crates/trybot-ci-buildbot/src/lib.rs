//! Buildbot CI driver.
//!
//! Submits changes through the base change hook and reads finished builds
//! from the REST API.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod buildbot;
mod errors;

pub use buildbot::BuildbotCiService;
pub use errors::BuildbotError;

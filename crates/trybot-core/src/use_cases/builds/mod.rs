pub(crate) mod handle_build_completed_event;
pub(crate) mod utils;

pub use handle_build_completed_event::{CompletionOutcome, HandleBuildCompletedEventInterface};
pub use utils::{CommentFields, CommentRenderer, RenderedComment};

#[cfg(any(test, feature = "testkit"))]
pub use self::handle_build_completed_event::MockHandleBuildCompletedEventInterface;

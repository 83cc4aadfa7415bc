mod comment_renderer;

pub use comment_renderer::{result_url, CommentFields, CommentRenderer, RenderedComment};

pub mod draft;
pub mod format;
pub mod prompt;

pub use draft::extract_draft;
pub use format::{FormattedReply, format_reply, reply_subject};
pub use prompt::{ServiceType, Templates, build_request};

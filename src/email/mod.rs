//! The host mailbox boundary: reading the open message, exporting it
//! and handing a draft back as a reply-all form.
pub mod export;
pub mod file;
pub mod host;
pub mod memory;
mod models;

pub use export::{DirectorySaver, FileSaver, export_email, export_filename};
pub use file::FileMailbox;
pub use host::{MailItem, Mailbox, compose_reply, extract_email};
pub use memory::MemoryMailbox;
pub use models::{EmailRecord, ReplyAllForm};

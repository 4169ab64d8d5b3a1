mod core;

pub use core::{CompletionRequest, CompletionResult, Message, Role, completion};

mod config;
mod error;

pub use config::{
    API_KEY_PLACEHOLDER, AppConfig, DEFAULT_MEETING_OPTIONS, RuntimeEnv, SamplingParams,
    resolve_api_key,
};
pub use error::{DraftError, HostError};

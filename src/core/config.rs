use std::{env, fs, time::Duration};

use serde::Deserialize;

/// Value shipped in the sample `.env` which is treated as "not
/// configured".
pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

const DEFAULT_ENDPOINT: &str = "https://epmfl.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-15-preview";

pub const DEFAULT_MEETING_OPTIONS: [&str; 3] = [
    "Thursday, 27 March 2025 at 10:30am",
    "Thursday, 27 March 2025 at 1:30pm",
    "Thursday, 27 March 2025 at 2:30pm",
];

/// Sampling parameters sent with every completion request.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.2,
            top_p: 0.95,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Configuration injected at runtime by whoever deploys the task
/// pane, read from a JSON file. Every field is optional and wins over
/// the environment when present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RuntimeEnv {
    pub azure_openai_api_key: Option<String>,
    pub azure_openai_endpoint: Option<String>,
    pub meeting_options: Option<Vec<String>>,
}

impl RuntimeEnv {
    /// Load the runtime config from `path`. A missing file is not an
    /// error, it just means nothing was injected.
    pub fn load(path: &str) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                tracing::debug!("No runtime config found at {}", path);
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(runtime) => {
                tracing::debug!("Loaded runtime config from {}", path);
                runtime
            }
            Err(e) => {
                tracing::warn!("Ignoring invalid runtime config {}: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Resolve the API key, first match wins: runtime config, then the
/// environment. The placeholder value resolves to `None`.
pub fn resolve_api_key(runtime: Option<String>, env: Option<String>) -> Option<String> {
    runtime
        .filter(|k| !k.trim().is_empty())
        .or(env.filter(|k| !k.trim().is_empty()))
        .filter(|k| k != API_KEY_PLACEHOLDER)
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub export_path: String,
    pub drafts_path: String,
    pub openai_endpoint: String,
    pub openai_api_key: Option<String>,
    pub meeting_options: Vec<String>,
    pub sampling: SamplingParams,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Build the config from an already loaded runtime config and a
    /// variable lookup so that resolution can be tested without
    /// touching the process environment.
    pub fn resolve<F>(runtime: RuntimeEnv, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_path = var("DRAFTPANE_STORAGE_PATH").unwrap_or("./".to_string());
        let export_path = format!("{}/exports", storage_path.trim_end_matches('/'));
        let drafts_path = format!("{}/drafts", storage_path.trim_end_matches('/'));

        let openai_endpoint = runtime
            .azure_openai_endpoint
            .or_else(|| var("AZURE_OPENAI_ENDPOINT"))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let openai_api_key =
            resolve_api_key(runtime.azure_openai_api_key, var("AZURE_OPENAI_API_KEY"));
        if openai_api_key.is_none() {
            tracing::warn!("No API key found in runtime config or environment");
        }

        let meeting_options = runtime
            .meeting_options
            .or_else(|| {
                var("DRAFTPANE_MEETING_OPTIONS").map(|opts| {
                    opts.split(';')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
            })
            .filter(|opts: &Vec<String>| !opts.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_MEETING_OPTIONS
                    .iter()
                    .map(|o| o.to_string())
                    .collect()
            });

        let request_timeout = var("DRAFTPANE_REQUEST_TIMEOUT_SECS")
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60 * 10));

        Self {
            storage_path,
            export_path,
            drafts_path,
            openai_endpoint,
            openai_api_key,
            meeting_options,
            sampling: SamplingParams::default(),
            request_timeout,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime_path = env::var("DRAFTPANE_RUNTIME_CONFIG")
            .unwrap_or_else(|_| "./runtime-config.json".to_string());
        Self::resolve(RuntimeEnv::load(&runtime_path), |k| env::var(k).ok())
    }
}

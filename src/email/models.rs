use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Snapshot of the active message. The body is always plain text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmailRecord {
    pub subject: Option<String>,
    #[serde(default = "unknown_sender")]
    pub sender: String,
    #[serde(rename = "receivedTime", default, with = "iso_millis")]
    pub received_time: Option<DateTime<Utc>>,
    #[serde(rename = "bodyContent", default)]
    pub body: String,
}

fn unknown_sender() -> String {
    String::from("Unknown")
}

impl EmailRecord {
    /// Received time as an ISO-8601 UTC string with milliseconds, the
    /// format used both in exports and in the prompt.
    pub fn received_time_iso(&self) -> Option<String> {
        self.received_time.map(to_iso_millis)
    }
}

fn to_iso_millis(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod iso_millis {
    use super::*;

    pub fn serialize<S>(time: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.serialize_str(&to_iso_millis(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}

/// What gets handed to the host to open a pre-filled reply-all draft.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplyAllForm {
    pub html_body: String,
    pub subject: String,
}

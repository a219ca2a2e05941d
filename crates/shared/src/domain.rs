use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(SessionId);
id_newtype!(MessageId);

/// Author of a transcript entry. Anything the backend sends that is not
/// `user` or `assistant` decodes as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn is_user(self) -> bool {
        self == Role::User
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    #[serde(rename = "time_created")]
    pub created_at_raw: String,
}

impl ChatMessage {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at_raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTranscript {
    pub id: SessionId,
    #[serde(rename = "message_list")]
    pub messages: Vec<ChatMessage>,
    #[serde(rename = "time_created")]
    pub created_at_raw: String,
    pub vector_store_id: Option<String>,
}

impl SessionTranscript {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at_raw)
    }
}

/// Accepts RFC 3339 as well as the zone-less ISO-8601 form some backends
/// emit; zone-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

pub const DEFAULT_DEBUG_TAG: &str = "ALERT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub model: String,
    pub agent: String,
    pub api_key: String,
    pub content: String,
    pub debug_tag: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            model: String::new(),
            agent: String::new(),
            api_key: String::new(),
            content: String::new(),
            debug_tag: DEFAULT_DEBUG_TAG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Model,
    Agent,
    ApiKey,
    Content,
    DebugTag,
}

impl FormState {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Model => self.model = value,
            FormField::Agent => self.agent = value,
            FormField::ApiKey => self.api_key = value,
            FormField::Content => self.content = value,
            FormField::DebugTag => self.debug_tag = value,
        }
    }
}

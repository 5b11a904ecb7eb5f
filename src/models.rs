use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One named URL in the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub url: String,
    pub name: String,
    /// Creation time, ISO-8601 UTC with millisecond precision
    #[serde(with = "iso_millis")]
    #[schema(value_type = String, format = DateTime, example = "2024-05-01T08:30:00.000Z")]
    pub added_at: DateTime<Utc>,
}

impl Entry {
    /// Stamped with the current time at the precision the record stores.
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            added_at: Utc::now().trunc_subsecs(3),
        }
    }
}

/// The persisted record, also returned verbatim by `GET /api/{code}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UrlList {
    #[serde(default)]
    pub urls: Vec<Entry>,
}

/// Body of `POST /api/{code}`
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct AddEntryRequest {
    pub url: Option<String>,
    pub name: Option<String>,
}

/// Body of `DELETE /api/{code}`
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct RemoveEntryRequest {
    pub url: Option<String>,
}

/// Response type for a successful append
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AddEntryResponse {
    pub success: bool,
    pub data: Entry,
}

/// Response type for a successful removal
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RemoveEntryResponse {
    pub success: bool,
    pub message: String,
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ` on the way out, any RFC 3339 form on the way in.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

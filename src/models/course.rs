use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    #[serde(rename = "heure_debut", with = "hour_minute")]
    pub start_time: NaiveTime,
    #[serde(rename = "heure_fin", with = "hour_minute")]
    pub end_time: NaiveTime,
    pub date: NaiveDate,
    #[serde(rename = "statut", default)]
    pub status: CourseStatus,
    #[serde(rename = "salle")]
    pub room: Named,
    #[serde(rename = "matiere")]
    pub subject: Named,
    pub filiere: Reference,
    pub niveau: Reference,
}

impl Course {
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseStatus {
    #[serde(rename = "en attente", alias = "pending")]
    Pending,
    #[serde(rename = "accepte", alias = "accepté", alias = "accepted")]
    Accepted,
    #[serde(rename = "annule", alias = "annulé", alias = "cancelled")]
    Cancelled,
    #[serde(rename = "effectue", alias = "effectué", alias = "completed")]
    Completed,
    /// Missing or unrecognized `statut`; the week endpoint omits it.
    #[default]
    #[serde(other)]
    Unknown,
}

/// `{ "nom": ... }` wrapper used for rooms and subjects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Named {
    #[serde(rename = "nom")]
    pub name: String,
}

/// `{ "nom": ..., "id": ... }` reference to a filière or niveau.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: u64,
    #[serde(rename = "nom")]
    pub name: String,
}

/// Times travel as `HH:MM`; some endpoints append seconds.
pub mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid time of day: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, FORMAT))
            .ok()
    }
}

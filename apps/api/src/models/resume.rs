use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Raw `resumes` row. Every section column is nullable JSONB, and may also
/// hold the JSON literal `null`.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub intro: Option<Json<Option<Intro>>>,
    pub edu: Option<Json<Option<Vec<Education>>>>,
    pub exp: Option<Json<Option<Vec<Experience>>>>,
    pub projects: Option<Json<Option<Vec<Project>>>>,
    pub ach: Option<Json<Option<Vec<Achievement>>>>,
    pub skills: Option<Json<Option<Vec<SkillGroup>>>>,
    pub profiles: Option<Json<Option<Vec<Profile>>>>,
    pub updated_at: DateTime<Utc>,
}

/// Structured resume data, with absent sections normalized to empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    pub id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub intro: Intro,
    #[serde(deserialize_with = "null_as_default")]
    pub edu: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub exp: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub ach: Vec<Achievement>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<SkillGroup>,
    #[serde(deserialize_with = "null_as_default")]
    pub profiles: Vec<Profile>,
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        ResumeRecord {
            id: row.id,
            intro: section(row.intro),
            edu: section(row.edu),
            exp: section(row.exp),
            projects: section(row.projects),
            ach: section(row.ach),
            skills: section(row.skills),
            profiles: section(row.profiles),
        }
    }
}

/// SQL NULL and JSON `null` both read as an empty section.
fn section<T: Default>(column: Option<Json<Option<T>>>) -> T {
    column.and_then(|j| j.0).unwrap_or_default()
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intro {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

impl Intro {
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && [
                &self.email,
                &self.phone,
                &self.location,
                &self.linkedin,
                &self.github,
                &self.website,
            ]
            .iter()
            .all(|f| f.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tech: Vec<String>,
    pub link: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub description: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub handle: Option<String>,
}

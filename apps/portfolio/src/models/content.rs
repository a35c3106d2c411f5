use serde::{Deserialize, Deserializer, Serialize};

/// Highest skill level rendered; larger values are clamped.
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Label shown for timeline entries without an end date.
pub const OPEN_END_LABEL: &str = "Heute";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_level")]
    pub level: Option<u8>,
}

impl Skill {
    /// Level to render as filled pips, or `None` when the skill carries no level.
    pub fn display_level(&self) -> Option<u8> {
        self.level
            .filter(|&l| l > 0)
            .map(|l| l.min(MAX_SKILL_LEVEL))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
}

impl Project {
    pub fn display_title(&self) -> &str {
        first_present(&[&self.title, &self.name]).unwrap_or("")
    }

    pub fn href(&self) -> &str {
        first_present(&[&self.link, &self.demo, &self.repo]).unwrap_or("#")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    Experience,
    Education,
}

/// One row of the work or education history. Experience records carry
/// `role`/`company`/`summary`; education records `degree`/`school`/`details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub end: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl TimelineEntry {
    pub fn kind(&self) -> TimelineKind {
        if self.degree.is_some() || self.school.is_some() {
            TimelineKind::Education
        } else {
            TimelineKind::Experience
        }
    }

    /// Organisation line: company, else school.
    pub fn heading(&self) -> &str {
        first_present(&[&self.company, &self.school]).unwrap_or("")
    }

    /// Position line: role, else degree.
    pub fn subheading(&self) -> &str {
        first_present(&[&self.role, &self.degree]).unwrap_or("")
    }

    pub fn period(&self) -> String {
        let start = self.start.as_deref().unwrap_or("");
        let end = first_present(&[&self.end]).unwrap_or(OPEN_END_LABEL);
        format!("{start} – {end}")
    }

    pub fn description(&self) -> Option<&str> {
        first_present(&[&self.summary, &self.details])
    }
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.trim().is_empty())
}

/// Backends serialize absent values as `null`; treat those like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Null entries inside the list are skipped.
fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(tags.unwrap_or_default().into_iter().flatten().collect())
}

/// Levels may arrive as fractions (4.5) or numeric strings ("3"). They are
/// rounded; anything unreadable drops the level, not the skill.
fn lenient_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let level = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(level
        .filter(|l| l.is_finite() && *l >= 0.0)
        .map(|l| l.round().min(f64::from(u8::MAX)) as u8))
}

/// Dates arrive as strings ("2019-04") or bare years (2019).
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

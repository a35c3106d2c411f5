use serde::{Deserialize, Serialize};

pub const FALLBACK_NAME: &str = "Elektroniker & IT-Techniker";
pub const FALLBACK_TITLE: &str = "Elektronik • IT • Automation";
pub const FALLBACK_HERO_BIO: &str =
    "Ich verbinde Hardware, Software und UX – robust, effizient und ästhetisch.";
pub const FALLBACK_ABOUT_BIO: &str = "Ich konzipiere, baue und betreue Systeme, die zuverlässig funktionieren – von Leiterplatten über Embedded-Software bis hin zu Cloud-Services und modernen UIs.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// The `/profile` endpoint answers with either a bare object or a collection
/// whose first element is the profile.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProfilePayload {
    Many(Vec<Profile>),
    One(Profile),
}

/// Loaded profile resource. `None` until a profile arrives, and also when the
/// service returns an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "ProfilePayload")]
pub struct ProfileDocument(pub Option<Profile>);

impl From<ProfilePayload> for ProfileDocument {
    fn from(payload: ProfilePayload) -> Self {
        match payload {
            ProfilePayload::Many(list) => ProfileDocument(list.into_iter().next()),
            ProfilePayload::One(profile) => ProfileDocument(Some(profile)),
        }
    }
}

impl ProfileDocument {
    pub fn profile(&self) -> Option<&Profile> {
        self.0.as_ref()
    }

    pub fn display_name(&self) -> &str {
        self.field(|p| p.name.as_deref()).unwrap_or(FALLBACK_NAME)
    }

    pub fn display_title(&self) -> &str {
        self.field(|p| p.title.as_deref()).unwrap_or(FALLBACK_TITLE)
    }

    pub fn hero_bio(&self) -> &str {
        self.field(|p| p.bio.as_deref()).unwrap_or(FALLBACK_HERO_BIO)
    }

    pub fn about_bio(&self) -> &str {
        self.field(|p| p.bio.as_deref()).unwrap_or(FALLBACK_ABOUT_BIO)
    }

    // Empty strings count as absent.
    fn field<'a>(&'a self, get: impl Fn(&'a Profile) -> Option<&'a str>) -> Option<&'a str> {
        self.0.as_ref().and_then(get).filter(|s| !s.trim().is_empty())
    }
}

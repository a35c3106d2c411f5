pub mod contact;
pub mod content;
pub mod profile;

pub use contact::{ContactField, ContactMessage};
pub use content::{Project, Skill, TimelineEntry, TimelineKind};
pub use profile::{Profile, ProfileDocument};

//! Page composition: turns loader snapshots into the sections of the
//! portfolio page and renders them as plain text.

use std::fmt;

use chrono::Datelike;

use crate::api::Resource;
use crate::loader::ResourceState;
use crate::models::{Project, ProfileDocument, Skill, TimelineEntry, TimelineKind};
use crate::normalize::{group_by_category, merge_timeline, SkillGroup};

/// Loading/error flags of one section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readiness {
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> From<&ResourceState<T>> for Readiness {
    fn from(state: &ResourceState<T>) -> Self {
        Self {
            loading: state.loading,
            error: state.error.clone(),
        }
    }
}

/// Everything the page shows at one instant. Sections render independently,
/// so a view built while some loads are pending is still complete.
#[derive(Debug, Clone)]
pub struct PortfolioView {
    pub profile: ProfileDocument,
    pub skill_groups: Vec<SkillGroup>,
    pub projects: Vec<Project>,
    pub timeline: Vec<TimelineEntry>,
    pub readiness: Vec<(Resource, Readiness)>,
    pub year: i32,
}

impl PortfolioView {
    pub fn build(
        profile: &ResourceState<ProfileDocument>,
        skills: &ResourceState<Vec<Skill>>,
        projects: &ResourceState<Vec<Project>>,
        experience: &ResourceState<Vec<TimelineEntry>>,
        education: &ResourceState<Vec<TimelineEntry>>,
    ) -> Self {
        Self {
            profile: profile.data.clone(),
            skill_groups: group_by_category(&skills.data),
            projects: projects.data.clone(),
            timeline: merge_timeline(&experience.data, &education.data),
            readiness: vec![
                (Resource::Profile, profile.into()),
                (Resource::Skills, skills.into()),
                (Resource::Projects, projects.into()),
                (Resource::Experience, experience.into()),
                (Resource::Education, education.into()),
            ],
            year: chrono::Local::now().year(),
        }
    }

    pub fn readiness(&self, resource: Resource) -> Readiness {
        self.readiness
            .iter()
            .find(|(r, _)| *r == resource)
            .map(|(_, s)| s.clone())
            .unwrap_or_default()
    }

    pub fn is_settled(&self) -> bool {
        self.readiness.iter().all(|(_, s)| !s.loading)
    }

    fn write_notice(&self, f: &mut fmt::Formatter<'_>, resources: &[Resource]) -> fmt::Result {
        for resource in resources {
            let state = self.readiness(*resource);
            if state.loading {
                writeln!(f, "  (lädt {} …)", resource.path())?;
            } else if let Some(error) = state.error {
                writeln!(f, "  ({} nicht verfügbar: {error})", resource.path())?;
            }
        }
        Ok(())
    }
}

fn pips(level: u8) -> String {
    (0..crate::models::content::MAX_SKILL_LEVEL)
        .map(|i| if i < level { '●' } else { '○' })
        .collect()
}

impl fmt::Display for PortfolioView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.profile.display_name())?;
        writeln!(f, "{}", self.profile.display_title())?;
        writeln!(f, "{}", self.profile.hero_bio())?;
        self.write_notice(f, &[Resource::Profile])?;

        writeln!(f, "\n== Über mich ==")?;
        writeln!(f, "{}", self.profile.about_bio())?;

        writeln!(f, "\n== Skills ==")?;
        self.write_notice(f, &[Resource::Skills])?;
        for group in &self.skill_groups {
            writeln!(f, "[{}]", group.category)?;
            for skill in &group.skills {
                match skill.display_level() {
                    Some(level) => writeln!(f, "  {:<24} {}", skill.name, pips(level))?,
                    None => writeln!(f, "  {}", skill.name)?,
                }
            }
        }

        writeln!(f, "\n== Projekte ==")?;
        self.write_notice(f, &[Resource::Projects])?;
        for project in &self.projects {
            writeln!(f, "* {} <{}>", project.display_title(), project.href())?;
            if let Some(description) = project.description.as_deref() {
                writeln!(f, "  {description}")?;
            }
            if !project.tags.is_empty() {
                writeln!(f, "  [{}]", project.tags.join("] ["))?;
            }
        }

        writeln!(f, "\n== Ausbildung & Erfahrung ==")?;
        self.write_notice(f, &[Resource::Experience, Resource::Education])?;
        for entry in &self.timeline {
            let label = match entry.kind() {
                TimelineKind::Experience => "Erfahrung",
                TimelineKind::Education => "Ausbildung",
            };
            writeln!(f, "| {} ({label})", entry.heading())?;
            writeln!(f, "|   {}", entry.subheading())?;
            writeln!(f, "|   {}", entry.period())?;
            if let Some(description) = entry.description() {
                writeln!(f, "|   {description}")?;
            }
        }

        writeln!(f, "\n== Kontakt ==")?;
        writeln!(f, "Lass uns sprechen: Name, E-Mail, Betreff, Nachricht")?;

        write!(
            f,
            "\n© {} – Elektroniker & IT-Techniker Portfolio",
            self.year
        )
    }
}

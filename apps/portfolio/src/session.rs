use std::sync::Arc;

use tracing::info;

use crate::api::{ContentSource, Resource};
use crate::contact::ContactFlow;
use crate::loader::ResourceLoader;
use crate::models::{Project, ProfileDocument, Skill, TimelineEntry};
use crate::seed::SeedCoordinator;
use crate::shell::PortfolioView;

/// One mounted portfolio page: the seed call plus one loader per resource,
/// all started together and settling independently.
pub struct PortfolioSession {
    source: Arc<dyn ContentSource>,
    seed: SeedCoordinator,
    profile: ResourceLoader<ProfileDocument>,
    skills: ResourceLoader<Vec<Skill>>,
    projects: ResourceLoader<Vec<Project>>,
    experience: ResourceLoader<Vec<TimelineEntry>>,
    education: ResourceLoader<Vec<TimelineEntry>>,
}

impl PortfolioSession {
    /// Fires the seed request and all five loads without waiting for any of
    /// them. Must be called inside a tokio runtime.
    pub fn mount(source: Arc<dyn ContentSource>) -> Self {
        let seed = SeedCoordinator::new();
        // Detached: seeding never gates the page.
        let _ = seed.fire(source.clone());

        let mut session = Self {
            profile: ResourceLoader::new(source.clone(), ProfileDocument::default()),
            skills: ResourceLoader::new(source.clone(), Vec::new()),
            projects: ResourceLoader::new(source.clone(), Vec::new()),
            experience: ResourceLoader::new(source.clone(), Vec::new()),
            education: ResourceLoader::new(source.clone(), Vec::new()),
            source,
            seed,
        };

        session.profile.load(Resource::Profile.path());
        session.skills.load(Resource::Skills.path());
        session.projects.load(Resource::Projects.path());
        session.experience.load(Resource::Experience.path());
        session.education.load(Resource::Education.path());

        info!("Portfolio session mounted");
        session
    }

    pub fn profile(&self) -> &ResourceLoader<ProfileDocument> {
        &self.profile
    }

    pub fn skills(&self) -> &ResourceLoader<Vec<Skill>> {
        &self.skills
    }

    pub fn projects(&self) -> &ResourceLoader<Vec<Project>> {
        &self.projects
    }

    pub fn experience(&self) -> &ResourceLoader<Vec<TimelineEntry>> {
        &self.experience
    }

    pub fn education(&self) -> &ResourceLoader<Vec<TimelineEntry>> {
        &self.education
    }

    pub fn seed(&self) -> &SeedCoordinator {
        &self.seed
    }

    /// Snapshot of the page as it stands now.
    pub fn view(&self) -> PortfolioView {
        PortfolioView::build(
            &self.profile.state(),
            &self.skills.state(),
            &self.projects.state(),
            &self.experience.state(),
            &self.education.state(),
        )
    }

    /// Waits for every loader to leave the loading state, then snapshots.
    pub async fn settled(&self) -> PortfolioView {
        let (profile, skills, projects, experience, education) = tokio::join!(
            self.profile.settled(),
            self.skills.settled(),
            self.projects.settled(),
            self.experience.settled(),
            self.education.settled(),
        );
        PortfolioView::build(&profile, &skills, &projects, &experience, &education)
    }

    /// A fresh contact form talking to the same content service.
    pub fn contact_form(&self) -> ContactFlow {
        ContactFlow::new(self.source.clone())
    }

    /// Cancels every pending load. Dropping the session does the same.
    pub fn unmount(self) {
        self.profile.cancel();
        self.skills.cancel();
        self.projects.cancel();
        self.experience.cancel();
        self.education.cancel();
        info!("Portfolio session unmounted");
    }
}

//! Pure reshaping of loaded collections into what the page renders.

use crate::models::{Skill, TimelineEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<Skill>,
}

/// Buckets skills by category. Categories appear in the order they are first
/// seen; skills keep their input order inside each bucket. Nothing is sorted.
pub fn group_by_category(skills: &[Skill]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();

    for skill in skills {
        match groups.iter_mut().find(|g| g.category == skill.category) {
            Some(group) => group.skills.push(skill.clone()),
            None => groups.push(SkillGroup {
                category: skill.category.clone(),
                skills: vec![skill.clone()],
            }),
        }
    }

    groups
}

/// Concatenates groups back into a flat skill list.
pub fn flatten_groups(groups: &[SkillGroup]) -> Vec<Skill> {
    groups.iter().flat_map(|g| g.skills.iter().cloned()).collect()
}

/// Experience entries followed by education entries. No deduplication and no
/// date-based reordering.
pub fn merge_timeline(
    experience: &[TimelineEntry],
    education: &[TimelineEntry],
) -> Vec<TimelineEntry> {
    experience.iter().chain(education.iter()).cloned().collect()
}

//! Skill list helpers.
//!
//! The store replaces the skill list wholesale and trusts its caller. These
//! helpers are the caller side: they decide what the new list should be.
//! Matching is exact and case-sensitive ("go" and "Go" are different skills).

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillRejection {
    Empty,
    Duplicate,
}

/// Single-skill add: trims the candidate and rejects it when empty or when an
/// identical trimmed string is already present.
pub fn add_skill(existing: &[String], candidate: &str) -> Result<Vec<String>, SkillRejection> {
    let skill = candidate.trim();
    if skill.is_empty() {
        return Err(SkillRejection::Empty);
    }
    if existing.iter().any(|s| s == skill) {
        return Err(SkillRejection::Duplicate);
    }
    let mut skills = existing.to_vec();
    skills.push(skill.to_string());
    Ok(skills)
}

/// Bulk import from comma-separated text.
///
/// Existing skills keep their order; new tokens are appended in first-seen
/// order. Tokens are trimmed and empties dropped.
pub fn import_skills(existing: &[String], text: &str) -> Vec<String> {
    let mut skills: Vec<String> = Vec::with_capacity(existing.len());
    let tokens = text.split(',').map(str::trim).filter(|t| !t.is_empty());
    for skill in existing.iter().map(String::as_str).chain(tokens) {
        if !skills.iter().any(|s| s == skill) {
            skills.push(skill.to_string());
        }
    }
    skills
}

/// Drops every exact occurrence of `skill`.
pub fn remove_skill(existing: &[String], skill: &str) -> Vec<String> {
    existing.iter().filter(|s| *s != skill).cloned().collect()
}

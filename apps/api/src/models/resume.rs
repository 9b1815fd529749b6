use serde::{Deserialize, Serialize};

/// The complete resume as entered by the user.
///
/// Every field carries `#[serde(default)]` so a partially stored document
/// still hydrates to a fully defined one: absence is an empty string or an
/// empty list, never a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
}

impl ResumeDocument {
    /// True when there is nothing worth previewing yet.
    pub fn is_blank(&self) -> bool {
        self.personal_info.name.is_empty()
            && self.education.is_empty()
            && self.experience.is_empty()
            && self.skills.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub summary: String,
}

/// Partial update for [`PersonalInfo`]. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalInfoPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub summary: Option<String>,
}

impl PersonalInfo {
    pub fn apply(&mut self, patch: PersonalInfoPatch) -> bool {
        let before = self.clone();
        merge(&mut self.name, patch.name);
        merge(&mut self.email, patch.email);
        merge(&mut self.phone, patch.phone);
        merge(&mut self.address, patch.address);
        merge(&mut self.summary, patch.summary);
        *self != before
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub field: String,
    pub graduation_year: String,
}

/// An education entry before the store assigns it an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub graduation_year: String,
}

impl NewEducation {
    pub fn with_id(self, id: String) -> EducationEntry {
        EducationEntry {
            id,
            school: self.school,
            degree: self.degree,
            field: self.field,
            graduation_year: self.graduation_year,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub graduation_year: Option<String>,
}

impl EducationEntry {
    /// Merges the patch in place. The id is never touched.
    pub fn apply(&mut self, patch: EducationPatch) -> bool {
        let before = self.clone();
        merge(&mut self.school, patch.school);
        merge(&mut self.degree, patch.degree);
        merge(&mut self.field, patch.field);
        merge(&mut self.graduation_year, patch.graduation_year);
        *self != before
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub position: String,
    /// `YYYY-MM`, free text.
    pub start_date: String,
    /// `YYYY-MM`; empty means the position is current.
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl NewExperience {
    pub fn with_id(self, id: String) -> ExperienceEntry {
        ExperienceEntry {
            id,
            company: self.company,
            position: self.position,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

impl ExperienceEntry {
    pub fn apply(&mut self, patch: ExperiencePatch) -> bool {
        let before = self.clone();
        merge(&mut self.company, patch.company);
        merge(&mut self.position, patch.position);
        merge(&mut self.start_date, patch.start_date);
        merge(&mut self.end_date, patch.end_date);
        merge(&mut self.description, patch.description);
        *self != before
    }
}

fn merge(slot: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *slot = v;
    }
}

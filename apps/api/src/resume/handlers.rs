use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::{
    EducationEntry, EducationPatch, ExperienceEntry, ExperiencePatch, NewEducation, NewExperience,
    PersonalInfoPatch, ResumeDocument,
};
use crate::resume::{validate_new_education, validate_new_experience};
use crate::state::AppState;
use crate::store::skills::{add_skill, import_skills, remove_skill, SkillRejection};

#[derive(Deserialize)]
pub struct ClearQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Outcome of an explicit save or clear. The in-memory operation always
/// succeeds; `persisted` reports whether durable storage kept up.
#[derive(Serialize)]
pub struct PersistResponse {
    pub persisted: bool,
}

#[derive(Deserialize)]
pub struct SkillsRequest {
    pub skills: Vec<String>,
}

#[derive(Deserialize)]
pub struct AddSkillRequest {
    pub skill: String,
}

#[derive(Deserialize)]
pub struct ImportSkillsRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<SkillRejection>,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.store.snapshot())
}

/// DELETE /api/v1/resume?confirm=true
pub async fn handle_clear_resume(
    State(state): State<AppState>,
    Query(params): Query<ClearQuery>,
) -> Result<Json<PersistResponse>, AppError> {
    if !params.confirm {
        return Err(AppError::ConfirmationRequired);
    }
    let persisted = state.store.clear_resume().await.is_ok();
    Ok(Json(PersistResponse { persisted }))
}

/// POST /api/v1/resume/save
pub async fn handle_save_resume(State(state): State<AppState>) -> Json<PersistResponse> {
    let persisted = state.store.save_resume().await.is_ok();
    Json(PersistResponse { persisted })
}

/// PATCH /api/v1/resume/personal
pub async fn handle_update_personal(
    State(state): State<AppState>,
    Json(patch): Json<PersonalInfoPatch>,
) -> Json<ResumeDocument> {
    state.store.update_personal_info(patch);
    Json(state.store.snapshot())
}

// ── Education ───────────────────────────────────────────────────────────────

/// POST /api/v1/resume/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Json(entry): Json<NewEducation>,
) -> Result<(StatusCode, Json<EducationEntry>), AppError> {
    let errors = validate_new_education(&entry);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok((StatusCode::CREATED, Json(state.store.add_education(entry))))
}

/// PATCH /api/v1/resume/education/:id
///
/// Unknown ids are a no-op; the current document is returned either way.
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EducationPatch>,
) -> Json<ResumeDocument> {
    state.store.update_education(&id, patch);
    Json(state.store.snapshot())
}

/// DELETE /api/v1/resume/education/:id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    state.store.remove_education(&id);
    StatusCode::NO_CONTENT
}

// ── Experience ──────────────────────────────────────────────────────────────

/// POST /api/v1/resume/experience
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Json(entry): Json<NewExperience>,
) -> Result<(StatusCode, Json<ExperienceEntry>), AppError> {
    let errors = validate_new_experience(&entry);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok((StatusCode::CREATED, Json(state.store.add_experience(entry))))
}

/// PATCH /api/v1/resume/experience/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ExperiencePatch>,
) -> Json<ResumeDocument> {
    state.store.update_experience(&id, patch);
    Json(state.store.snapshot())
}

/// DELETE /api/v1/resume/experience/:id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    state.store.remove_experience(&id);
    StatusCode::NO_CONTENT
}

// ── Skills ──────────────────────────────────────────────────────────────────

/// PUT /api/v1/resume/skills
pub async fn handle_replace_skills(
    State(state): State<AppState>,
    Json(req): Json<SkillsRequest>,
) -> Json<SkillsResponse> {
    state.store.update_skills(req.skills);
    Json(SkillsResponse {
        skills: state.store.skills(),
        rejected: None,
    })
}

/// POST /api/v1/resume/skills
///
/// A blank or duplicate skill is not an error: the list comes back unchanged
/// with the reason attached.
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(req): Json<AddSkillRequest>,
) -> Json<SkillsResponse> {
    let response = match state.store.edit_skills(|current| add_skill(current, &req.skill)) {
        Ok(skills) => SkillsResponse {
            skills,
            rejected: None,
        },
        Err(reason) => SkillsResponse {
            skills: state.store.skills(),
            rejected: Some(reason),
        },
    };
    Json(response)
}

/// POST /api/v1/resume/skills/import
pub async fn handle_import_skills(
    State(state): State<AppState>,
    Json(req): Json<ImportSkillsRequest>,
) -> Json<SkillsResponse> {
    let skills = state
        .store
        .edit_skills(|current| Ok::<_, Infallible>(import_skills(current, &req.text)))
        .unwrap_or_else(|never| match never {});
    Json(SkillsResponse {
        skills,
        rejected: None,
    })
}

/// DELETE /api/v1/resume/skills/:skill
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path(skill): Path<String>,
) -> Json<SkillsResponse> {
    let skills = state
        .store
        .edit_skills(|current| Ok::<_, Infallible>(remove_skill(current, &skill)))
        .unwrap_or_else(|never| match never {});
    Json(SkillsResponse {
        skills,
        rejected: None,
    })
}

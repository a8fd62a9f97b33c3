use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::compose::sessions::{CompositionView, Session};
use crate::curation::assembler::CoverLetterInput;
use crate::curation::catalog::{GroupKey, ItemId, ItemKey, Source};
use crate::curation::load::build_state;
use crate::curation::reorder::Direction;
use crate::curation::session::Action;
use crate::curation::CurationError;
use crate::errors::AppError;
use crate::generation::GenerationOutcome;
use crate::persistence::create_item;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub source: Source,
    pub id: ItemId,
}

#[derive(Deserialize)]
pub struct SelectionRequest {
    pub source: Source,
    pub selected: bool,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub source: Source,
    pub id: ItemId,
    pub direction: Direction,
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub source: Source,
    pub group: GroupKey,
    pub text: String,
}

#[derive(Deserialize)]
pub struct EditItemRequest {
    pub text: String,
}

fn find_session(sessions: &mut HashMap<i64, Session>, job_id: i64) -> Result<&mut Session, AppError> {
    sessions
        .get_mut(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("No open composition for job {job_id}")))
}

fn require_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Text must not be blank".to_string()));
    }
    Ok(())
}

/// Applies one action to the job's session and returns the new view.
async fn apply_action(state: &AppState, job_id: i64, action: Action) -> Result<Json<CompositionView>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, job_id)?;
    session.apply(action)?;
    Ok(Json(session.view()))
}

/// POST /api/v1/compositions/:job_id
pub async fn handle_open(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<CompositionView>, AppError> {
    let (job, experiences) = tokio::try_join!(
        state.items.load_job(job_id),
        state.items.load_work_experiences()
    )?;
    let curation = build_state(&job, &experiences)?;
    let session = Session::new(
        curation,
        job.job_title,
        job.company_name,
        state.config.save_debounce,
    );
    info!(
        "Opened composition {} for job {job_id} ({} work experiences)",
        session.id,
        experiences.len()
    );
    Ok(Json(state.sessions.open(session).await))
}

/// GET /api/v1/compositions/:job_id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<CompositionView>, AppError> {
    let mut sessions = state.sessions.lock().await;
    Ok(Json(find_session(&mut sessions, job_id)?.view()))
}

/// DELETE /api/v1/compositions/:job_id
pub async fn handle_close(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let dropped = state
        .sessions
        .close(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No open composition for job {job_id}")))?;
    info!("Closed composition for job {job_id} ({dropped} pending saves dropped)");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/compositions/:job_id/toggle
pub async fn handle_toggle(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<CompositionView>, AppError> {
    apply_action(
        &state,
        job_id,
        Action::Toggle {
            source: req.source,
            id: req.id,
        },
    )
    .await
}

/// POST /api/v1/compositions/:job_id/selection
pub async fn handle_selection(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<CompositionView>, AppError> {
    let action = if req.selected {
        Action::SelectAll { source: req.source }
    } else {
        Action::DeselectAll { source: req.source }
    };
    apply_action(&state, job_id, action).await
}

/// POST /api/v1/compositions/:job_id/move
pub async fn handle_move(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<CompositionView>, AppError> {
    apply_action(
        &state,
        job_id,
        Action::Move {
            source: req.source,
            id: req.id,
            direction: req.direction,
        },
    )
    .await
}

/// POST /api/v1/compositions/:job_id/items
///
/// The tracker call happens outside the registry lock. If the session was replaced
/// meanwhile, the created item is not appended to the new one.
pub async fn handle_add_item(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CompositionView>, AppError> {
    require_text(&req.text)?;
    if req.source == Source::Insight {
        return Err(CurationError::ReadOnlySource(req.source).into());
    }
    if req.group.source() != req.source {
        return Err(CurationError::WrongSource {
            expected: req.source,
            group: req.group,
        }
        .into());
    }

    let session_id = {
        let mut sessions = state.sessions.lock().await;
        let session = find_session(&mut sessions, job_id)?;
        if session.state.source(req.source).catalog.group(&req.group).is_none() {
            return Err(CurationError::UnknownGroup {
                origin: req.source,
                group: req.group,
            }
            .into());
        }
        session.id
    };

    let item = create_item(state.items.as_ref(), job_id, req.group, &req.text).await?;
    info!("Added {} item {} to {} for job {job_id}", req.source, item.id, item.group);

    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, job_id)?;
    if session.id != session_id {
        return Err(AppError::NotFound(format!(
            "Composition for job {job_id} was reopened while adding the item"
        )));
    }
    session.apply(Action::Append { item })?;
    Ok(Json(session.view()))
}

/// PATCH /api/v1/compositions/:job_id/items/:source/:id
///
/// The edit is applied immediately; the tracker save runs after the quiet window.
/// Text the tracker refuses (blank, for one) shows up as the item's save error.
pub async fn handle_edit_item(
    State(state): State<AppState>,
    Path((job_id, source, id)): Path<(i64, Source, ItemId)>,
    Json(req): Json<EditItemRequest>,
) -> Result<Json<CompositionView>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, job_id)?;
    session.apply(Action::ReplaceText {
        source,
        id,
        text: req.text.clone(),
    })?;
    session.schedule_save(
        &state.sessions,
        state.items.clone(),
        ItemKey { source, id },
        req.text,
    );
    Ok(Json(session.view()))
}

/// GET /api/v1/compositions/:job_id/payload
pub async fn handle_payload(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<CoverLetterInput>, AppError> {
    let mut sessions = state.sessions.lock().await;
    Ok(Json(find_session(&mut sessions, job_id)?.state.payload()))
}

/// POST /api/v1/compositions/:job_id/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<GenerationOutcome>, AppError> {
    let payload = {
        let mut sessions = state.sessions.lock().await;
        find_session(&mut sessions, job_id)?.state.payload()
    };
    if payload.is_empty() {
        return Err(AppError::Validation(
            "Select at least one item before generating a cover letter".to_string(),
        ));
    }

    info!(
        "Submitting job {job_id}: {} experience, {} research, {} responsibilities, {} requirements",
        payload.candidate_experience.len(),
        payload.company_research.len(),
        payload.job_responsibilities.len(),
        payload.job_requirements.len()
    );
    let outcome = state.generator.generate(job_id, &payload).await?;
    info!("Generation for job {job_id}: {}", outcome.message);
    Ok(Json(outcome))
}

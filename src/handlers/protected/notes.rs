// handlers/protected/notes.rs - /api/projects/:projectId/tasks/:taskId/notes[/:noteId]

use axum::extract::State;
use serde::Deserialize;

use crate::database::models::Note;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Credential, PathIds, Validate, ValidationErrors, ValidJson};
use crate::state::AppState;

use super::{READ_NOTE, READ_TASK};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoteRequest {
    pub content: String,
}

impl Validate for NoteRequest {
    fn normalize(&mut self) {
        self.content = self.content.trim().to_string();
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        errors.required("content", &self.content, "The content of the note is required");
    }
}

/// POST .../notes - any project participant may comment
pub async fn create_note(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
    ValidJson(body): ValidJson<NoteRequest>,
) -> ApiResult<Note> {
    let ctx = READ_TASK.run(&state, &credential, &ids).await?;
    let note = Note::new(body.content, ctx.principal()?.id, ctx.task()?.id);

    state.store.create_note(&note).await?;

    Ok(ApiResponse::created(note))
}

/// GET .../notes
pub async fn list_notes(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<Vec<Note>> {
    let ctx = READ_TASK.run(&state, &credential, &ids).await?;
    let notes = state.store.notes_for_task(ctx.task()?.id).await?;
    Ok(ApiResponse::success(notes))
}

/// DELETE .../notes/:noteId - only the author may delete
pub async fn delete_note(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<String> {
    let ctx = READ_NOTE.run(&state, &credential, &ids).await?;
    let note = ctx.note()?;

    if note.created_by != ctx.principal()?.id {
        return Err(ApiError::forbidden("Invalid action"));
    }

    state.store.delete_note(note).await?;

    Ok(ApiResponse::message("The note was successfully deleted"))
}

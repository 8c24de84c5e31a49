use crate::database::models::{Note, Principal, Project, Task};
use crate::gate::error::GateError;

/// Per-request slots filled by the gate chain.
///
/// Each slot is written at most once by the gate that owns it. Handlers read
/// slots through the accessors, which fail with `MissingSlot` instead of
/// panicking when a route is wired with too few gates.
#[derive(Debug, Default)]
pub struct RequestContext {
    principal: Option<Principal>,
    project: Option<Project>,
    task: Option<Task>,
    note: Option<Note>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(&self) -> Result<&Principal, GateError> {
        self.principal.as_ref().ok_or(GateError::MissingSlot("principal"))
    }

    pub fn project(&self) -> Result<&Project, GateError> {
        self.project.as_ref().ok_or(GateError::MissingSlot("project"))
    }

    pub fn task(&self) -> Result<&Task, GateError> {
        self.task.as_ref().ok_or(GateError::MissingSlot("task"))
    }

    pub fn note(&self) -> Result<&Note, GateError> {
        self.note.as_ref().ok_or(GateError::MissingSlot("note"))
    }

    pub(crate) fn set_principal(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }

    pub(crate) fn set_project(&mut self, project: Project) {
        self.project = Some(project);
    }

    pub(crate) fn set_task(&mut self, task: Task) {
        self.task = Some(task);
    }

    pub(crate) fn set_note(&mut self, note: Note) {
        self.note = Some(note);
    }

    /// Take ownership of the loaded project, e.g. to hand it to the response
    pub fn into_project(self) -> Result<Project, GateError> {
        self.project.ok_or(GateError::MissingSlot("project"))
    }

    pub fn into_task(self) -> Result<Task, GateError> {
        self.task.ok_or(GateError::MissingSlot("task"))
    }
}

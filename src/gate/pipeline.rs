use std::time::Instant;

use crate::auth;
use crate::gate::{Gate, GateError, RequestContext};
use crate::middleware::{Credential, PathIds};
use crate::state::AppState;
use crate::types::{Access, Resource};

/// Ordered gate list declared once per route.
///
/// `new` is a `const fn` that rejects malformed chains: a gate reading a slot
/// no earlier gate fills, a loader ahead of its parent's loader, a slot filled
/// twice, or phases out of identity/load/scope/authorize order. Declaring the
/// pipeline as a `const` turns those mistakes into build failures.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    gates: &'static [Gate],
}

impl Pipeline {
    pub const fn new(gates: &'static [Gate]) -> Self {
        let mut filled = 0u8;
        let mut phase = 0u8;
        let mut i = 0;

        while i < gates.len() {
            let gate = &gates[i];
            if gate.phase() < phase {
                panic!("gates must run in identity, load, scope, authorize order");
            }
            if gate.reads() & !filled != 0 {
                panic!("gate reads a context slot that no earlier gate fills");
            }
            if gate.writes() & filled != 0 {
                panic!("context slot is filled twice");
            }
            filled |= gate.writes();
            phase = gate.phase();
            i += 1;
        }

        Self { gates }
    }

    /// Run every gate in order, stopping at the first failure
    pub async fn run(
        &self,
        state: &AppState,
        credential: &Credential,
        ids: &PathIds,
    ) -> Result<RequestContext, GateError> {
        let mut ctx = RequestContext::new();

        for gate in self.gates {
            let started = Instant::now();
            match apply(*gate, state, credential, ids, &mut ctx).await {
                Ok(()) => {
                    tracing::debug!("Gate {:?} passed in {:?}", gate, started.elapsed());
                }
                Err(GateError::Store(e)) => return Err(GateError::Store(e)),
                Err(error) => {
                    tracing::warn!("Gate {:?} rejected request: {}", gate, error);
                    return Err(error);
                }
            }
        }

        Ok(ctx)
    }
}

async fn apply(
    gate: Gate,
    state: &AppState,
    credential: &Credential,
    ids: &PathIds,
    ctx: &mut RequestContext,
) -> Result<(), GateError> {
    match gate {
        Gate::Authenticate => {
            let token = credential.bearer().ok_or(GateError::Unauthenticated)?;
            let claims = auth::verify_jwt(token, &state.config.security.jwt_secret)
                .map_err(|_| GateError::InvalidCredential)?;
            let principal = state
                .store
                .find_principal(claims.id)
                .await?
                .ok_or(GateError::InvalidCredential)?;
            ctx.set_principal(principal);
        }
        Gate::Load(resource) => {
            let id = ids.get(resource).ok_or(GateError::MissingPathId(resource))?;
            match resource {
                Resource::Project => {
                    let project = state.store.find_project(id).await?.ok_or(GateError::NotFound(resource))?;
                    ctx.set_project(project);
                }
                Resource::Task => {
                    let task = state.store.find_task(id).await?.ok_or(GateError::NotFound(resource))?;
                    ctx.set_task(task);
                }
                Resource::Note => {
                    let note = state.store.find_note(id).await?.ok_or(GateError::NotFound(resource))?;
                    ctx.set_note(note);
                }
            }
        }
        Gate::Scope(resource) => {
            let in_scope = match resource {
                Resource::Task => ctx.task()?.project == ctx.project()?.id,
                Resource::Note => ctx.note()?.task == ctx.task()?.id,
                Resource::Project => true,
            };
            if !in_scope {
                return Err(GateError::InvalidScope);
            }
        }
        Gate::Authorize(access) => {
            let user_id = ctx.principal()?.id;
            let project = ctx.project()?;
            if project.is_manager(user_id) {
                return Ok(());
            }
            if !project.is_member(user_id) {
                // Outsiders cannot learn that the project exists
                return Err(GateError::NotFound(Resource::Project));
            }
            if access == Access::Mutate {
                return Err(GateError::Forbidden);
            }
        }
    }

    Ok(())
}

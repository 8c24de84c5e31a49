// Protected tier: each handler runs its route's pipeline before touching the store.
// Pipelines are consts, so a malformed gate order fails the build.

pub mod notes;
pub mod projects;
pub mod tasks;
pub mod team;
pub mod user;

use crate::gate::{Gate, Pipeline};
use crate::types::{Access, Resource};

pub const AUTHENTICATED: Pipeline = Pipeline::new(&[Gate::Authenticate]);

pub const READ_PROJECT: Pipeline = Pipeline::new(&[
    Gate::Authenticate,
    Gate::Load(Resource::Project),
    Gate::Authorize(Access::Read),
]);

pub const MUTATE_PROJECT: Pipeline = Pipeline::new(&[
    Gate::Authenticate,
    Gate::Load(Resource::Project),
    Gate::Authorize(Access::Mutate),
]);

pub const READ_TASK: Pipeline = Pipeline::new(&[
    Gate::Authenticate,
    Gate::Load(Resource::Project),
    Gate::Load(Resource::Task),
    Gate::Scope(Resource::Task),
    Gate::Authorize(Access::Read),
]);

pub const MUTATE_TASK: Pipeline = Pipeline::new(&[
    Gate::Authenticate,
    Gate::Load(Resource::Project),
    Gate::Load(Resource::Task),
    Gate::Scope(Resource::Task),
    Gate::Authorize(Access::Mutate),
]);

pub const READ_NOTE: Pipeline = Pipeline::new(&[
    Gate::Authenticate,
    Gate::Load(Resource::Project),
    Gate::Load(Resource::Task),
    Gate::Load(Resource::Note),
    Gate::Scope(Resource::Task),
    Gate::Scope(Resource::Note),
    Gate::Authorize(Access::Read),
]);

// Request gates: the ordered checks every protected route runs before its handler.
// Identity first, then loaders in path order, then scope checks, then authorization.

pub mod context;
pub mod error;
pub mod pipeline;

pub use context::RequestContext;
pub use error::GateError;
pub use pipeline::Pipeline;

use crate::types::{Access, Resource};

/// Context slot bits used to check gate ordering at compile time
pub(crate) mod slot {
    pub const PRINCIPAL: u8 = 1 << 0;
    pub const PROJECT: u8 = 1 << 1;
    pub const TASK: u8 = 1 << 2;
    pub const NOTE: u8 = 1 << 3;
}

/// One step of a route's pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Bearer credential to principal
    Authenticate,
    /// Path id to stored entity
    Load(Resource),
    /// Loaded child must reference the loaded parent
    Scope(Resource),
    /// Principal must hold the relation on the loaded project
    Authorize(Access),
}

impl Gate {
    pub const fn phase(&self) -> u8 {
        match self {
            Gate::Authenticate => 0,
            Gate::Load(_) => 1,
            Gate::Scope(_) => 2,
            Gate::Authorize(_) => 3,
        }
    }

    /// Slots that must already be filled when this gate runs
    pub const fn reads(&self) -> u8 {
        match self {
            Gate::Authenticate => 0,
            Gate::Load(Resource::Project) => 0,
            Gate::Load(Resource::Task) => slot::PROJECT,
            Gate::Load(Resource::Note) => slot::TASK,
            Gate::Scope(Resource::Project) => panic!("a project has no parent to scope against"),
            Gate::Scope(Resource::Task) => slot::PROJECT | slot::TASK,
            Gate::Scope(Resource::Note) => slot::TASK | slot::NOTE,
            Gate::Authorize(_) => slot::PRINCIPAL | slot::PROJECT,
        }
    }

    /// Slots this gate fills
    pub const fn writes(&self) -> u8 {
        match self {
            Gate::Authenticate => slot::PRINCIPAL,
            Gate::Load(Resource::Project) => slot::PROJECT,
            Gate::Load(Resource::Task) => slot::TASK,
            Gate::Load(Resource::Note) => slot::NOTE,
            Gate::Scope(_) | Gate::Authorize(_) => 0,
        }
    }
}

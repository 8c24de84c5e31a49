//! Shared types used across the gate chain and the HTTP error layer
use std::fmt;

/// Entities that a route can address by path id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Project,
    Task,
    Note,
}

impl Resource {
    pub const fn name(&self) -> &'static str {
        match self {
            Resource::Project => "Project",
            Resource::Task => "Task",
            Resource::Note => "Note",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relation a principal must hold on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Manager or any team member
    Read,
    /// Manager only
    Mutate,
}

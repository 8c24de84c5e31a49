// handlers/mod.rs - two tiers
//
// Public (no credential) → Protected (every route declares a gate pipeline)
pub mod protected;
pub mod public;

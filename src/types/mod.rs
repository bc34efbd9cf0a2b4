// ABOUTME: Validated domain types shared by the resolver and the orchestrator.
// ABOUTME: Slot covers blue/green alternation, DeployId addresses phase calls.

mod deploy_id;
mod slot;

pub use deploy_id::DeployId;
pub use slot::{Slot, SlotParseError};

// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Zero-sized types make it impossible to call phases out of order.

/// Slot resolved, nothing sent yet.
/// Available actions: `begin()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved;

/// Target notified that a deployment to the slot is starting.
/// Available actions: `deploy_secrets()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Begun;

/// Every secret accepted.
/// Available actions: `deploy_function()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretsDeployed;

/// Function bundle accepted.
/// Available actions: `deploy_statics()`
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionDeployed;

/// Every static asset accepted (or none configured).
/// Available actions: `activate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticsDeployed;

/// Live traffic switched to the slot.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Activated;

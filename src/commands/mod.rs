// ABOUTME: Command module aggregator for the atroctl CLI.
// ABOUTME: Re-exports the deploy and init command handlers.

mod deploy;
mod init;

pub use deploy::deploy;
pub use init::init;

// ABOUTME: Init command implementation.
// ABOUTME: Scaffolds an atroctl.yml in the working directory.

use atroctl::config::{self, CONFIG_FILENAME};
use atroctl::error::Result;
use atroctl::output::Output;
use std::path::Path;

pub fn init(dir: &Path, url: Option<&str>, force: bool, output: &Output) -> Result<()> {
    config::init_config(dir, url, force)?;
    output.success(&format!("wrote {}", dir.join(CONFIG_FILENAME).display()));
    Ok(())
}

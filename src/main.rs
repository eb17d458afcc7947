//! rtn-settings - command line front end.
//!
//! # Execution Flow
//!
//! 1. Parse arguments (`--config-dir`, subcommand)
//! 2. Load layered settings from `<config-dir>/rtn-settings.yaml` and `RTN_*` variables
//! 3. Initialize logging → `<log_dir>/<log_prefix>.<date>`
//! 4. Open the session from the blob file, bootstrapping defaults if needed
//! 5. Run the subcommand, then log the session metrics

mod cli;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run()
}

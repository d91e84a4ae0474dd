//! calibrate-config command-line entry point

use anyhow::Result;

fn main() -> Result<()> {
    calibrate_config::cli::run()
}

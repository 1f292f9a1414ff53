//! Convert command implementation

use super::output;
use crate::config::ConvertConfig;
use crate::pipeline;
use anyhow::Result;

/// Run a conversion and report the written file
pub fn run(config: ConvertConfig) -> Result<()> {
    log::debug!("Converting with {config:?}");

    let summary = pipeline::convert(&config)?;

    println!(
        "{}",
        output::format_success(&format!(
            "Xray report generated: {} ({} test cases, {} failed)",
            summary.output.display(),
            summary.cases,
            summary.failed
        ))
    );
    Ok(())
}

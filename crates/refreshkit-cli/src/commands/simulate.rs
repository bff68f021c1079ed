use std::path::Path;

use anyhow::{Context, Result};

use refreshkit_core::{
    trace::{self, ReplayReport, ScrollTrace},
    AppConfig,
};

pub fn run(config: &AppConfig, path: &Path, json: bool) -> Result<()> {
    let session = ScrollTrace::load(path)
        .with_context(|| format!("reading trace {}", path.display()))?;
    tracing::info!(steps = session.steps.len(), "Replaying {}", path.display());

    let report = trace::replay(&session, config.refresh.clone())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report)?;
    }
    Ok(())
}

fn print_report(report: &ReplayReport) -> Result<()> {
    for step in &report.steps {
        println!("[{}] {}", step.index, step.label);
        if step.effects.is_empty() {
            println!("      (no effect)");
        }
        for effect in &step.effects {
            println!("      {}", serde_json::to_string(effect)?);
        }
    }

    println!();
    println!("Header phase: {}", report.header_phase);
    println!("Older load outstanding: {}", if report.loading { "yes" } else { "no" });
    if report.outstanding > 0 {
        println!("Requests never completed: {}", report.outstanding);
    }
    Ok(())
}

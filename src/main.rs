use anyhow::{Context, Result};
use clap::Parser;

use inkpad::cli::CliArgs;
use inkpad::config::EditorConfig;
use inkpad::model::AppModel;
use inkpad::runtime::Runtime;

fn main() -> Result<()> {
    let startup = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    inkpad::tracing::init();

    let mut config = EditorConfig::load();
    startup.apply(&mut config);

    let mut runtime = Runtime::new(AppModel::new(config));
    runtime.run_startup(&startup);

    let summary = runtime.summary();
    if startup.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
        println!("{}", json);
    } else {
        println!("{}", summary.html);
        println!("{}", summary.counter);
        for message in &summary.notifications {
            eprintln!("{}", message);
        }
    }

    Ok(())
}

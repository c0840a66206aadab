use std::io;

use clahe_inspect::{fetch_image, inspect, InspectConfig, PlotSink};

#[cfg(feature = "window")]
fn viewer() -> impl PlotSink {
    clahe_inspect::window::WindowSink::new()
}

#[cfg(not(feature = "window"))]
fn viewer() -> impl PlotSink {
    clahe_inspect::TerminalSink::stdio()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = InspectConfig::default();
    let Some(image) = fetch_image(&config.url, &config.user_agent) else {
        return Ok(());
    };

    let mut sink = viewer();
    inspect(&image, &config, &mut sink, &mut io::stdout())?;
    Ok(())
}

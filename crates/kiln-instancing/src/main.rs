//! `instance-grid`: a 50×50×50 grid of spheres drawn with one instanced draw call.
//!
//! Left-drag orbits, middle-drag pans, right-drag or the wheel dollies.
//! `Escape` quits.

mod app;
mod grid;
mod shader;

use anyhow::Result;
use kiln_engine::device::GpuInit;
use kiln_engine::logging::{init_logging, LoggingConfig};
use kiln_engine::window::{LogicalSize, Runtime, RuntimeConfig};

use crate::app::InstanceApp;
use crate::grid::GridConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "InstanceBP".to_string(),
        initial_size: LogicalSize::new(1000.0, 1000.0),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), InstanceApp::new(GridConfig::default()))
}

//! Glint demo application.
//!
//! Clears the screen to a fixed color and draws the info/controls overlay
//! (device name, feature tier, frame timing, vsync toggle). Fork this crate
//! and fill in `render_frame` to build a new demo.
//!
//! ```bash
//! cargo run -p glint-demo
//! ```
//!
//! Press Escape to quit. Set `RUST_LOG` to adjust log output.

mod app;
mod stats;

use glint_app::{run_app, AppConfig};

use crate::app::GlintDemo;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn main() -> anyhow::Result<()> {
    run_app(
        GlintDemo::new(),
        AppConfig::new("New fancy Vulkan demo").with_size(WIDTH, HEIGHT),
    )
}

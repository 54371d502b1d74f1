//! violonist - play a bowed string ensemble from the terminal
//!
//! Run with: cargo run --release

mod app;
mod ui;

use app::Violonist;
use sfdsp::instrument::VIOLIN_TUNING;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    Violonist::new()
        .tuning(VIOLIN_TUNING)
        .velocity(0.6)
        .force(0.5)
        .master_gain(0.4)
        .run()
}

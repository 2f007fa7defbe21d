//! Photometric normalization of a planetary image cube.
//!
//! Resolves the photometric, normalization and (when needed) atmospheric
//! models from `--frompvl`, the per-parameter flags and `--chngpar`, then
//! writes the corrected cube to `--to`. Set `RUST_LOG=info` to see the
//! parameters used.

use clap::Parser;
use photomet::args::PhotometArgs;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = PhotometArgs::parse();
    photomet::app::run(&args)
}

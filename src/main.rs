use std::process::ExitCode;

use anyhow::Result;

use ptviz::commands::{build_cli, visualize};

fn main() -> Result<ExitCode> {
    let matches = build_cli().get_matches();
    visualize::execute(&matches)
}

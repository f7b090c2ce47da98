// Command handlers module

pub mod visualize;

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

const KEY_TABLE: &str = "\
KEYS:
    c    Toggle comment visibility
    s    Toggle summarized view
    y    Copy the current view to the clipboard
    q    Quit and print the report
    r    Quit, print the report and copy worst cases as JSON";

/// Command-line definition of the visualizer
pub fn build_cli() -> Command {
    Command::new("ptviz")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live terminal dashboard for processing time trees")
        .after_help(KEY_TABLE)
        .arg(
            Arg::new("topic")
                .short('t')
                .long("topic")
                .value_name("TOPIC")
                .help("Specify the topic name to subscribe to"),
        )
        .arg(
            Arg::new("waiting-sec")
                .short('w')
                .long("waiting-sec")
                .value_name("SECONDS")
                .help("Waiting time for topic discovery")
                .value_parser(clap::value_parser!(f64))
                .allow_negative_numbers(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::new("source-dir")
                .short('d')
                .long("source-dir")
                .value_name("DIR")
                .help("Directory whose *.jsonl files are the available topics")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("."),
        )
        .arg(
            Arg::new("interval-ms")
                .short('i')
                .long("interval-ms")
                .value_name("MS")
                .help("Screen refresh interval in milliseconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("100"),
        )
        .arg(
            Arg::new("no-total")
                .long("no-total")
                .help("Do not accumulate or print the total processing time tree")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("node-name")
                .long("node-name")
                .value_name("NAME")
                .help("Name of this visualizer instance (default: generated from the process id)"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write logs to this file while the dashboard is running")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

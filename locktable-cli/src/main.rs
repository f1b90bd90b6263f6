mod scenario;

use std::fmt::Write as _;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use locktable::column::flatten;
use locktable::{
    DecoratedTable, Dom, HeadlessTable, LockSide, LockTable, MemoryDom, NodeRole, Px, TableEvent,
};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::scenario::{Scenario, ScenarioError};

#[derive(Parser, Debug)]
#[command(name = "locktable-cli")]
#[command(version)]
#[command(about = "Lay out a locked-column table scenario in memory and print the synced result")]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Write debug logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Resize the container to this width after mounting
    #[arg(long = "resize", value_name = "WIDTH")]
    resize: Option<Px>,

    /// Scroll the center body vertically after mounting
    #[arg(long = "scroll-top", value_name = "PX")]
    scroll_top: Option<Px>,

    /// Scroll the center body horizontally after mounting
    #[arg(long = "scroll-left", value_name = "PX")]
    scroll_left: Option<Px>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        match File::create(path) {
            Ok(file) => {
                if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), file) {
                    eprintln!("Failed to initialize logger: {e}");
                }
            }
            Err(e) => eprintln!("Failed to create log file {}: {e}", path.display()),
        }
    }

    match run(&args) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, ScenarioError> {
    let scenario = Scenario::load(&args.scenario)?;
    let mut dom = scenario.dom();
    let mut table = scenario.build();

    table.mount(&mut dom);
    settle(&mut table, &mut dom);

    if let Some(width) = args.resize {
        table.base_mut().resize(&mut dom, width);
        table.dispatch(&mut dom, TableEvent::Resize);
        settle(&mut table, &mut dom);
    }

    if args.scroll_top.is_some() || args.scroll_left.is_some() {
        if let Ok(body) = table.context().node(NodeRole::Body, LockSide::Center) {
            if let Some(top) = args.scroll_top {
                dom.set_scroll_top(body, top);
            }
            if let Some(left) = args.scroll_left {
                dom.set_scroll_left(body, left);
            }
        }
        settle(&mut table, &mut dom);
    }

    Ok(report(&table, &dom))
}

/// Deliver pending scroll events and deferred work.
fn settle(table: &mut DecoratedTable<HeadlessTable>, dom: &mut MemoryDom) {
    let events = table.settle(dom);
    let tasks = table.tick(dom);
    log::debug!("Settled {events} scroll events, {tasks} deferred tasks");
}

fn report(table: &DecoratedTable<HeadlessTable>, dom: &MemoryDom) -> String {
    let mut out = String::new();

    if let Some(lock) = table.layer::<LockTable>() {
        let _ = writeln!(out, "mode: {:?}", lock.mode());
        for side in [LockSide::Left, LockSide::Center, LockSide::Right] {
            let columns: Vec<String> = flatten(lock.partition().side(side))
                .into_iter()
                .map(|leaf| leaf.data_index)
                .collect();
            let _ = writeln!(out, "{side}: [{}]", columns.join(", "));
        }
    }

    for props in table.rendered() {
        let _ = writeln!(
            out,
            "instance {}: {} columns, class \"{}\"",
            props.lock_type,
            flatten(&props.columns).len(),
            props.class_name.as_deref().unwrap_or_default()
        );
    }

    out.push('\n');
    out.push_str(&dom.dump());
    out
}

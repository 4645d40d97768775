//! CLI tool for tablegrid - loads a JSON table, applies commands, prints JSON
//!
//! Usage:
//!   tablegrid_cli <table.json> [commands...]            # Result rows to stdout
//!   tablegrid_cli <table.json> merge -o out.json        # Result rows to file
//!   tablegrid_cli <table.json> extend:last:last merge --view
//!   tablegrid_cli --keys                                # List key bindings
//!
//! Commands are `insertRow:<start|before|after|end>`, `insertColumn:<...>`,
//! `deleteRows`, `deleteColumns`, `merge`, `separate`, `toggleHeader`,
//! `selectAll`, `move:<row>:<column>`, `extend:<row>:<column>` (steps are
//! `first|prev|stay|next|last`), plus `undo` and `redo`.
//!
//! Options:
//!   -o <file>         Write output to a file
//!   --config <file>   Editor config JSON (`historyLimit`, `keymap`)
//!   --view            Print the render view instead of rows
//!   -v, -vv           Log edits to stderr (debug, trace)

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use tablegrid::{
    parse_json_table, table_to_json, EditorConfig, TableCommand, TableEditor, TableKind, TableView,
};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Options {
    input: Option<String>,
    output: Option<String>,
    config: Option<String>,
    commands: Vec<String>,
    view: bool,
    keys: bool,
    verbosity: u8,
}

fn usage() -> ! {
    eprintln!("Usage: tablegrid_cli <table.json> [commands...] [-o out.json] [--config cfg.json] [--view] [-v]");
    eprintln!("       tablegrid_cli --keys [--config cfg.json]");
    std::process::exit(1);
}

fn parse_args() -> Options {
    let mut options = Options::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => options.output = Some(args.next().unwrap_or_else(|| usage())),
            "--config" => options.config = Some(args.next().unwrap_or_else(|| usage())),
            "--view" => options.view = true,
            "--keys" => options.keys = true,
            "-v" => options.verbosity = options.verbosity.max(1),
            "-vv" => options.verbosity = 2,
            "-h" | "--help" => usage(),
            _ if options.input.is_none() && !options.keys => options.input = Some(arg),
            _ => options.commands.push(arg),
        }
    }
    options
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn load_config(path: Option<&str>) -> EditorConfig {
    let Some(path) = path else {
        return EditorConfig::default();
    };
    let json = match fs::read_to_string(path) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match EditorConfig::from_json(&json) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error parsing config {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let options = parse_args();
    init_logging(options.verbosity);
    let config = load_config(options.config.as_deref());
    let kind = TableKind::json();

    if options.keys {
        let editor = TableEditor::with_config(kind.new_table(), kind, config);
        for binding in editor.keymap().bindings() {
            let command = serde_json::to_string(&binding.command).unwrap();
            println!("{:<24} {}", binding.to_string(), command);
        }
        return;
    }

    let Some(input_path) = options.input else {
        usage();
    };

    // Read input file
    let json = match fs::read_to_string(&input_path) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Parse table
    let table = match parse_json_table(&json) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error parsing table: {}", e);
            std::process::exit(1);
        }
    };

    // Apply commands in order
    let mut editor = TableEditor::with_config(table, kind, config);
    for name in &options.commands {
        let changed = match name.as_str() {
            "undo" => editor.undo(),
            "redo" => editor.redo(),
            _ => {
                let command: TableCommand = match name.parse() {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                };
                match editor.apply(command) {
                    Ok(changed) => changed,
                    Err(e) => {
                        eprintln!("Error applying {}: {}", name, e);
                        std::process::exit(1);
                    }
                }
            }
        };
        if !changed {
            eprintln!("{}: no change", name);
        }
    }

    // Serialize to JSON
    let result = if options.view {
        TableView::new(editor.table())
            .and_then(|view| serde_json::to_string_pretty(&view).map_err(Into::into))
    } else {
        table_to_json(editor.table())
    };
    let json = match result {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match options.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}

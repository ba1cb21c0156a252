//! Process entry point: no-argument and `help`/`usage` banners, config
//! rewriting, unambiguous-prefix command dispatch, and the single top-level
//! error handler. Grounded on `csved_cli.cpp`'s `main`.

use csvfix::config::Config;
use csvfix::error::{self, CsvFixError, CsvFixResult};
use csvfix::log::Log;
use csvfix::registry::{self, CommandEntry};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    let table = registry::commands();

    if args.len() < 2 {
        print_banner();
        return 0;
    }

    match args[1].as_str() {
        "help" | "usage" if args.len() == 2 => {
            print_command_list(&table);
            return 0;
        }
        "help" | "usage" => {
            return match registry::resolve(&table, &args[2]) {
                Ok(entry) => {
                    print_help(entry);
                    0
                }
                Err(e) => error::report_and_exit_code(&e),
            };
        }
        _ => {}
    }

    match dispatch(&table, &args[1..]) {
        Ok(()) => 0,
        Err(e) => error::report_and_exit_code(&e),
    }
}

/// Rewrite `argv` through the config file's `alias`/`defaults` directives,
/// then resolve the (possibly alias-expanded) leading token against the
/// registry by unambiguous prefix and run it.
fn dispatch(table: &[CommandEntry], argv: &[String]) -> CsvFixResult<()> {
    let log = Log::new("csvfix");
    let known_names: Vec<&str> = table.iter().map(|c| c.name).collect();
    let cfg = Config::load(&known_names)?;
    log.print("config loaded");

    let rewritten = cfg.rewrite_argv(argv);
    if rewritten.is_empty() {
        return Err(CsvFixError::dispatch("No command given"));
    }
    if rewritten != argv {
        log.print(&format!("argv rewritten to: {}", rewritten.join(" ")));
    }

    let entry = registry::resolve(table, &rewritten[0])?;
    log.print(&format!("dispatching to '{}'", entry.name));
    (entry.run)(&rewritten[1..])
}

fn print_banner() {
    println!("csvfix {} - a CSV stream editor", env!("CARGO_PKG_VERSION"));
    println!("usage: csvfix SUBCOMMAND [FLAGS] [FILES...]");
    println!("       csvfix help            (list subcommands)");
    println!("       csvfix help SUBCOMMAND  (describe one subcommand)");
}

fn print_command_list(table: &[CommandEntry]) {
    let mut names: Vec<&CommandEntry> = table.iter().collect();
    names.sort_by_key(|c| c.name);
    println!("Available subcommands:");
    for entry in names {
        println!("  {:<14} {}", entry.name, entry.summary);
    }
}

fn print_help(entry: &CommandEntry) {
    println!("{}", entry.summary);
}

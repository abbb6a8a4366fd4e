use std::{env, fs, path::{Path, PathBuf}, process::ExitCode, rc::Rc, sync::Once, time::Instant};

use boink::{
    compile_source, display_error,
    errors::{diagnostics::Diagnostics, errors::RunError},
    interpreter::console::StdConsole,
    modules::resolver::ModuleResolver,
    parse_source, run_file,
};

static TRACING_INIT: Once = Once::new();

/// Installs the log subscriber when `RUST_LOG` is set or `--verbose` is given.
fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if verbose {
            EnvFilter::new("boink=debug")
        } else if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    });
}

enum Command {
    Run,
    Check,
    Parse,
}

const USAGE: &str = "Usage: boink <run|check|parse> <file> [--verbose]";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let verbose = args.iter().any(|arg| arg == "--verbose");
    let positional: Vec<&String> = args.iter().filter(|arg| !arg.starts_with("--")).collect();

    let (command, file) = match positional.as_slice() {
        [command, file] => {
            let command = match command.as_str() {
                "run" => Command::Run,
                "check" => Command::Check,
                "parse" => Command::Parse,
                _ => {
                    eprintln!("{}", USAGE);
                    return ExitCode::FAILURE;
                }
            };
            (command, PathBuf::from(file))
        }
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(verbose);

    let start = Instant::now();
    let succeeded = match command {
        Command::Run => run(&file),
        Command::Check => check(&file),
        Command::Parse => print_tree(&file),
    };
    tracing::debug!("finished in {:?}", start.elapsed());

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        display_error(diagnostic);
    }
    eprintln!("{} error(s) found", diagnostics.len());
}

fn read(file: &Path) -> Option<String> {
    match fs::read_to_string(file) {
        Ok(source) => Some(source),
        Err(error) => {
            eprintln!("Failed to read '{}': {}", file.display(), error);
            None
        }
    }
}

fn run(file: &Path) -> bool {
    match run_file(file, StdConsole::shared()) {
        Ok(_) => true,
        Err(RunError::Diagnostics(diagnostics)) => {
            report(&diagnostics);
            false
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            false
        }
    }
}

fn check(file: &Path) -> bool {
    let Some(source) = read(file) else {
        return false;
    };

    let mut resolver = ModuleResolver::for_file(file, StdConsole::shared());
    match compile_source(&source, &file.display().to_string(), &mut resolver) {
        Ok(_) => {
            println!("No errors found");
            true
        }
        Err(diagnostics) => {
            report(&diagnostics);
            false
        }
    }
}

fn print_tree(file: &Path) -> bool {
    let Some(source) = read(file) else {
        return false;
    };

    match parse_source(&source, &file.display().to_string()) {
        Ok(program) => {
            println!("{}", pretty_print(format!("{:?}", program.statements)));
            true
        }
        Err(error) => {
            let mut diagnostics = Diagnostics::new(Rc::from(source.as_str()));
            diagnostics.report(error);
            report(&diagnostics);
            false
        }
    }
}

fn pretty_print(string: String) -> String {
    let mut result = String::new();
    let mut indent: usize = 0;
    let mut ignore_next_space = false;

    for c in string.chars() {
        match c {
            '{' => {
                indent += 1;
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                ignore_next_space = true;
            }
            '(' | '[' => {
                indent += 1;
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
            }
            '}' | ')' | ']' => {
                indent = indent.saturating_sub(1);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                result.push(c);
            }
            ',' => {
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                ignore_next_space = true;
            }
            ' ' if ignore_next_space => {
                ignore_next_space = false;
            }
            _ => result.push(c),
        }
    }

    result
}

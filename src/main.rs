use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    thread,
};

use anyhow::{Context as _, Result};
use clap::Parser;
use phlite::{
    Config,
    interpreter::{config::DEFAULT_MAX_CALL_DEPTH, evaluator::Context, host::Host, value::Value},
    repl, run_in,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status for input files that cannot be read (`EX_IOERR`).
const EXIT_IO_ERROR: u8 = 74;
/// Exit status when the interpreter thread dies unexpectedly (`EX_SOFTWARE`).
const EXIT_INTERNAL: u8 = 70;

/// phlite runs programs written in a small, brace-delimited PHP dialect.
///
/// With neither a script nor `--eval`, an interactive prompt starts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the script to run.
    script: Option<PathBuf>,

    /// Runs the given source text instead of a script file.
    #[arg(short, long, conflicts_with = "script")]
    eval: Option<String>,

    /// Pipe mode prints the last value produced by the program's top-level
    /// statements once it finishes.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Maximum depth of nested function calls.
    #[arg(long, env = "PHLITE_MAX_DEPTH", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Arguments made available to the program through `args()`.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    install_tracing();

    let worker = thread::Builder::new().name("interpreter".into()).spawn(move || run(args));

    match worker.map(thread::JoinHandle::join) {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => ExitCode::from(EXIT_INTERNAL),
        Err(e) => {
            eprintln!("failed to start the interpreter thread: {e}");
            ExitCode::from(EXIT_INTERNAL)
        },
    }
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter)
                                     .with_writer(io::stderr)
                                     .compact()
                                     .try_init();
}

fn run(args: Args) -> ExitCode {
    let config = Config::default().with_max_call_depth(args.max_depth);

    let source = match (&args.script, args.eval) {
        (Some(path), _) => match read_script(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{e:#}");
                return ExitCode::from(EXIT_IO_ERROR);
            },
        },
        (None, Some(code)) => code,
        (None, None) => {
            return match repl::run(args.args, config) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::from(EXIT_IO_ERROR)
                },
            };
        },
    };

    let mut context = Context::new(Host::stdout(args.args), config);
    let outcome = run_in(&mut context, &source);
    let _ = io::stdout().flush();

    match outcome {
        Ok(value) => {
            if args.pipe_mode {
                print_result(&value);
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            debug!(exit_code = e.exit_code(), "program failed");
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        },
    }
}

fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| {
                                format!("Failed to read the input file '{}'. Perhaps this file \
                                         does not exist?",
                                        path.display())
                            })
}

fn print_result(value: &Value) {
    if matches!(value, Value::Void) {
        return;
    }
    match value.render() {
        Ok(text) => println!("{text}"),
        Err(type_name) => eprintln!("pipe mode: the final value is a {type_name} and has no \
                                     textual form"),
    }
}

// ChipOS: tiny-memory scripting runtime with a character display

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use chipos::config::RuntimeConfig;
use chipos::interpreter::{Interpreter, Outcome};
use chipos::storage::{FileError, FileSlots, MemoryStorage, FILE_NAME_MAXIMUM_LENGTH};
use chipos::symbols::encode;
use chipos::terminal::StdioConsole;
use chipos::ui::DisplayConsole;

/// Options of the `run` subcommand
struct RunOptions {
    program: PathBuf,
    image: Option<PathBuf>,
    plain: bool,
    config: RuntimeConfig,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage:");
    eprintln!("  {} run <program> [options]", program_name);
    eprintln!("  {} files --image <path>", program_name);
    eprintln!();
    eprintln!("Options for run:");
    eprintln!("  --image <path>    Load and save the file store image");
    eprintln!("  --region <bytes>  Size of the scope/heap region");
    eprintln!("  --depth <n>       Deepest expression and call nesting");
    eprintln!("  --seed <n>        Seed for rand and randInt");
    eprintln!("  --plain           Use standard input/output instead of the display");
    eprintln!();
    eprintln!("Examples:");
    eprintln!(
        "  {} run demos/guess.chp                  # Run on the display",
        program_name
    );
    eprintln!(
        "  {} run demos/fizzbuzz.chp --plain       # Run on standard output",
        program_name
    );
}

fn option_value<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, String> {
    let value = args
        .next()
        .ok_or_else(|| format!("Missing value for {}", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value '{}' for {}", value, flag))
}

fn parse_run_options(mut args: impl Iterator<Item = String>) -> Result<RunOptions, String> {
    let program = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| "No program file provided".to_string())?;
    let mut options = RunOptions {
        program,
        image: None,
        plain: false,
        config: RuntimeConfig::default(),
    };
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--image" => {
                let path: String = option_value(&mut args, &flag)?;
                options.image = Some(PathBuf::from(path));
            }
            "--region" => options.config.region_size = option_value(&mut args, &flag)?,
            "--depth" => options.config.max_depth = option_value(&mut args, &flag)?,
            "--seed" => options.config.seed = Some(option_value(&mut args, &flag)?),
            "--plain" => options.plain = true,
            _ => return Err(format!("Unknown option '{}'", flag)),
        }
    }
    Ok(options)
}

fn load_storage(image: Option<&Path>) -> io::Result<MemoryStorage> {
    match image {
        Some(path) => MemoryStorage::load(path),
        None => Ok(MemoryStorage::new()),
    }
}

/// Run `name` on the full-screen display, restoring the terminal afterwards.
fn run_on_display(
    storage: MemoryStorage,
    config: RuntimeConfig,
    name: &str,
) -> io::Result<(MemoryStorage, Result<Outcome, FileError>)> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let mut interpreter = Interpreter::with_config(storage, DisplayConsole::new(terminal), config);
    let outcome = interpreter.run_program(name);
    let (storage, mut console) = interpreter.into_parts();

    let closing = match &outcome {
        Ok(Outcome::Finished) => "Finished, press any key",
        Ok(Outcome::Quit) => "Stopped, press any key",
        Ok(Outcome::Failed(_)) => "Failed, press any key",
        Err(_) => "Could not start, press any key",
    };
    let waited = console.wait_for_key(closing);

    // Restore terminal
    disable_raw_mode()?;
    execute!(console.terminal_mut().backend_mut(), LeaveAlternateScreen)?;
    console.terminal_mut().show_cursor()?;
    waited?;

    Ok((storage, outcome))
}

fn run_command(options: RunOptions) -> Result<i32, Box<dyn std::error::Error>> {
    if !options.program.exists() {
        eprintln!("Error: File '{}' not found", options.program.display());
        return Ok(1);
    }
    let name = options
        .program
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.is_empty() || name.len() > FILE_NAME_MAXIMUM_LENGTH {
        eprintln!(
            "Error: Program name '{}' must be 1 to {} characters",
            name, FILE_NAME_MAXIMUM_LENGTH
        );
        return Ok(1);
    }

    let source = fs::read_to_string(&options.program)?;
    let code = match encode(&source) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Encode error: {}", e);
            return Ok(1);
        }
    };

    let mut storage = load_storage(options.image.as_deref())?;
    if let Err(e) = storage.install_program(name.as_bytes(), &code) {
        eprintln!("Error: Cannot store program: {}", e);
        return Ok(1);
    }
    log::info!("installed {} ({} bytes)", name, code.len());

    let (storage, outcome) = if options.plain {
        let mut interpreter =
            Interpreter::with_config(storage, StdioConsole::new(), options.config);
        let outcome = interpreter.run_program(&name);
        (interpreter.into_parts().0, outcome)
    } else {
        run_on_display(storage, options.config, &name)?
    };

    if let Some(path) = &options.image {
        storage.save(path)?;
    }

    match outcome? {
        Outcome::Finished | Outcome::Quit => Ok(0),
        Outcome::Failed(error) => {
            eprintln!("Runtime error: {}", error);
            Ok(1)
        }
    }
}

fn files_command(mut args: impl Iterator<Item = String>) -> Result<i32, Box<dyn std::error::Error>> {
    let image = match (args.next().as_deref(), args.next()) {
        (Some("--image"), Some(path)) => PathBuf::from(path),
        _ => {
            eprintln!("Error: files needs --image <path>");
            return Ok(1);
        }
    };
    let storage = MemoryStorage::load(&image)?;
    let entries = storage.list_files();
    if entries.is_empty() {
        println!("No files in {}", image.display());
    }
    for entry in entries {
        println!(
            "{:<16} {:>5} bytes  (slot {})",
            entry.name_lossy(),
            entry.size,
            entry.address
        );
    }
    Ok(0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "chipos".to_string());

    let code = match args.next().as_deref() {
        Some("run") => match parse_run_options(args) {
            Ok(options) => run_command(options)?,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!();
                print_usage(&program_name);
                1
            }
        },
        Some("files") => files_command(args)?,
        _ => {
            eprintln!("Error: No command provided");
            eprintln!();
            print_usage(&program_name);
            1
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

mod logging;

use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use tmsim::{
    Program, ProgramLoader, ProgramManager, RunConfig, Simulator, Status, Step,
    TuringMachineError,
};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tmsim-cli --list
  tmsim-cli --list binary
  tmsim-cli --dir machines/ --list
  tmsim-cli --dir machines/ -p \"My machine\"
  tmsim-cli -p \"Binary increment\" -i 1011 -d
  tmsim-cli -p machine.json -i 0011
  cat machine.json | tmsim-cli")]
struct Cli {
    /// A program name, or the path to a JSON definition.
    /// Piped stdin is read as a JSON definition when omitted.
    #[clap(short, long)]
    program: Option<String>,

    /// A directory of JSON definitions to pick programs from instead of the built-ins
    #[clap(long)]
    dir: Option<PathBuf>,

    /// The input written to the tape. Defaults to the program's suggested input.
    #[clap(short, long)]
    input: Option<String>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Milliseconds to pause between printed steps (debug mode only)
    #[clap(long)]
    delay: Option<u64>,

    /// Give up after this many steps
    #[clap(long)]
    max_steps: Option<usize>,

    /// A TOML file with run settings
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// List the available programs whose names contain QUERY, then exit
    #[clap(short, long, value_name = "QUERY", num_args = 0..=1, default_missing_value = "")]
    list: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let result = match &cli.list {
        Some(query) => list_programs(&cli, query).map(|()| ExitCode::SUCCESS),
        None => run(&cli),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn list_programs(cli: &Cli, query: &str) -> Result<(), TuringMachineError> {
    if let Some(dir) = &cli.dir {
        let query = query.to_lowercase();
        for (path, program) in load_directory(dir)? {
            if program.name.to_lowercase().contains(&query) {
                println!("{:<20} {}", program.name, path.display());
            }
        }
        return Ok(());
    }

    for index in ProgramManager::search_programs(query) {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{:<20} states: {}, symbols: {}, rules: {}, input: {}",
            info.name, info.state_count, info.symbol_count, info.transition_count, info.input
        );
    }
    Ok(())
}

/// Loads every definition in `dir`. Files that fail to load are reported and skipped.
fn load_directory(dir: &Path) -> Result<Vec<(PathBuf, Program)>, TuringMachineError> {
    let programs: Vec<_> = ProgramLoader::load_programs(dir)
        .into_iter()
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping definition");
                None
            }
        })
        .collect();

    if programs.is_empty() {
        return Err(TuringMachineError::FileError(format!(
            "No definitions found in {}",
            dir.display()
        )));
    }
    Ok(programs)
}

/// Picks a program from `dir` by name, ignoring case, or the first one when no name is given.
fn pick_from_directory(dir: &Path, name: Option<&str>) -> Result<Program, TuringMachineError> {
    let mut programs = load_directory(dir)?.into_iter().map(|(_, program)| program);
    match name {
        Some(name) => programs
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TuringMachineError::ProgramNotFound(name.to_string())),
        None => programs.next().ok_or_else(|| {
            TuringMachineError::FileError(format!("No definitions found in {}", dir.display()))
        }),
    }
}

fn load_program(cli: &Cli) -> Result<Program, TuringMachineError> {
    if let Some(dir) = &cli.dir {
        return pick_from_directory(dir, cli.program.as_deref());
    }

    match &cli.program {
        Some(source) if Path::new(source).is_file() => {
            ProgramLoader::load_program(Path::new(source))
        }
        Some(name) => ProgramManager::get_program_by_name(name),
        None if atty::isnt(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(|e| {
                TuringMachineError::FileError(format!("Failed to read from stdin: {}", e))
            })?;
            ProgramLoader::load_program_from_string(&buffer)
        }
        None => ProgramManager::get_program_by_index(0),
    }
}

fn load_config(cli: &Cli) -> Result<RunConfig, TuringMachineError> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(delay) = cli.delay {
        config.set_step_delay_ms(delay);
    }
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<ExitCode, TuringMachineError> {
    let program = load_program(cli)?;
    let config = load_config(cli)?;
    info!(program = %program.name, "loaded program");

    let mut simulator = Simulator::with_config(program, config)?;
    if let Some(input) = &cli.input {
        simulator.prepare(input)?;
    }

    if let Err(failure) = simulator.run()? {
        eprintln!("Validation failed: {}", failure);
        return Ok(ExitCode::from(2));
    }

    if cli.debug {
        print_state(&simulator);
        for _ in 0..simulator.config().max_steps {
            match simulator.step() {
                Step::Continue => {
                    print_state(&simulator);
                    thread::sleep(simulator.config().step_delay());
                }
                Step::Halt(halt) => {
                    debug!(?halt, "machine halted");
                    break;
                }
            }
        }
        println!("\nFinal tape:");
    } else {
        simulator.run_to_completion();
    }

    println!("{}", simulator.tape());
    println!("{}^", " ".repeat(simulator.head()));

    let machine = simulator.machine();
    let summary = machine
        .message()
        .unwrap_or_else(|| format!("Step limit of {} reached", simulator.config().max_steps));
    println!(
        "{} after {} steps: {}",
        simulator.status(),
        machine.step_count(),
        summary
    );

    Ok(match simulator.status() {
        Status::Accepted => ExitCode::SUCCESS,
        Status::Rejected(_) => ExitCode::from(1),
        Status::Errored(_) => ExitCode::from(2),
        _ => ExitCode::from(3),
    })
}

fn print_state(simulator: &Simulator) {
    println!(
        "Step: {}, State: {}, Tape: {}, Head: {}",
        simulator.machine().step_count(),
        simulator.state(),
        simulator.tape(),
        simulator.head()
    );
}

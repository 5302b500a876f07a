use ll1_frontend::config::build_info;
use ll1_frontend::config::runtime::{LoggingPreferences, RuntimeConfig};
use ll1_frontend::grammar::{demo_acceptors, micro_haskell_acceptors, EvenAndGrammar};
use ll1_frontend::input::StrSource;
use ll1_frontend::lexical::{SharedAcceptor, Tokenizer};
use ll1_frontend::syntax::{Grammar, ParseTable};
use ll1_frontend::tokens::{LookaheadStream, TokenStream};
use ll1_frontend::utils::SourceMap;
use ll1_frontend::{logging, pipeline};
use std::env;
use std::io::{self, BufRead, Write};

const LEXER_PROMPT: &str = "Lexer> ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Version,
    Lex {
        micro_haskell: bool,
    },
    Parse {
        path: String,
        micro_haskell: bool,
        table: Option<String>,
        json: bool,
        indented: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    command: Command,
    config: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("ll1");

    let invocation = match parse_args(&args[1.min(args.len())..]) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} lex [--mh] | parse <file> [options] | --help", program_name);
            std::process::exit(2);
        }
    };

    let loaded = match &invocation.config {
        Some(path) => RuntimeConfig::from_toml_file(path),
        None => RuntimeConfig::from_env(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {}", error);
            eprintln!("  [{}]", error.error_code());
            std::process::exit(2);
        }
    };
    logging::config::init_runtime_preferences(logging_preferences_for(
        &invocation.command,
        &config,
    ))?;
    logging::init_global_logging()?;

    match invocation.command {
        Command::Help => print_help(program_name),
        Command::Version => {
            println!("ll1 v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", build_info::source_info());
            println!("{}", logging::config::get_config_summary());
        }
        Command::Lex { micro_haskell } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_lexer_repl(stdin.lock(), stdout.lock(), || select_acceptors(micro_haskell))?;
        }
        Command::Parse {
            path,
            micro_haskell,
            table,
            json,
            indented,
        } => {
            let acceptors = select_acceptors(micro_haskell);
            let format = OutputFormat::from_flags(json, indented);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let outcome = match table {
                Some(table_path) => {
                    let table = ParseTable::from_json(&std::fs::read_to_string(&table_path)?)?;
                    parse_and_report(&path, acceptors, table, &config, format, &mut out)
                }
                None => parse_and_report(&path, acceptors, EvenAndGrammar, &config, format, &mut out),
            };
            if let Err(error) = outcome {
                eprintln!("\nFAILED: {}", error);
                if let (Some(span), Ok(text)) = (error.span(), std::fs::read_to_string(&path)) {
                    eprint!("{}", SourceMap::new(&text).format_error(&span, &error.to_string()));
                }
                eprintln!(
                    "  [{}] {} ({})",
                    error.error_code(),
                    error.category(),
                    error.severity()
                );
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut config = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let path = args.get(i + 1).ok_or("--config requires a file path")?;
                config = Some(path.clone());
                i += 1;
            }
            other => rest.push(other),
        }
        i += 1;
    }

    let command = match rest.first().copied() {
        None | Some("--help") | Some("-h") | Some("help") => Command::Help,
        Some("--version") | Some("version") => Command::Version,
        Some("lex") => {
            let mut micro_haskell = false;
            for option in &rest[1..] {
                match *option {
                    "--mh" => micro_haskell = true,
                    other => return Err(format!("Unknown lex option '{}'", other)),
                }
            }
            Command::Lex { micro_haskell }
        }
        Some("parse") => {
            let mut path = None;
            let mut micro_haskell = false;
            let mut table = None;
            let mut json = false;
            let mut indented = false;

            let mut j = 1;
            while j < rest.len() {
                match rest[j] {
                    "--mh" => micro_haskell = true,
                    "--json" => json = true,
                    "--tree" => indented = true,
                    "--table" => {
                        let table_path = rest.get(j + 1).ok_or("--table requires a file path")?;
                        table = Some(table_path.to_string());
                        j += 1;
                    }
                    option if option.starts_with("--") => {
                        return Err(format!("Unknown parse option '{}'", option))
                    }
                    file if path.is_none() => path = Some(file.to_string()),
                    extra => return Err(format!("Unexpected argument '{}'", extra)),
                }
                j += 1;
            }

            Command::Parse {
                path: path.ok_or("parse requires an input file")?,
                micro_haskell,
                table,
                json,
                indented,
            }
        }
        Some(other) => return Err(format!("Unknown command '{}'", other)),
    };

    Ok(Invocation { command, config })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Bracketed,
    Indented,
    Json,
}

impl OutputFormat {
    fn from_flags(json: bool, indented: bool) -> Self {
        if json {
            Self::Json
        } else if indented {
            Self::Indented
        } else {
            Self::Bracketed
        }
    }
}

/// The REPL reports lexical errors itself, so console logging is muted there
fn logging_preferences_for(command: &Command, config: &RuntimeConfig) -> LoggingPreferences {
    let mut preferences = config.logging.clone();
    if matches!(command, Command::Lex { .. }) {
        preferences.enable_console_logging = false;
    }
    preferences
}

fn select_acceptors(micro_haskell: bool) -> Vec<SharedAcceptor> {
    if micro_haskell {
        micro_haskell_acceptors()
    } else {
        demo_acceptors()
    }
}

/// Read lines until end of input, printing the proper tokens of each line
///
/// Each line is lexed from scratch; a lexical error abandons the rest of the
/// line after the tokens already printed.
fn run_lexer_repl<R, W, F>(mut input: R, mut output: W, acceptors: F) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    F: Fn() -> Vec<SharedAcceptor>,
{
    let mut line = String::new();
    loop {
        write!(output, "{}", LEXER_PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }
        let text = line.trim_end_matches(&['\n', '\r'][..]);

        let mut stream = LookaheadStream::new(Tokenizer::new(StrSource::new(text), acceptors()));
        logging::with_session_context("<stdin>", || -> io::Result<()> {
            loop {
                match stream.pull_proper() {
                    Ok(Some(token)) => writeln!(output, "{}", token)?,
                    Ok(None) => return Ok(()),
                    Err(error) => {
                        writeln!(output, "Error: {}", error)?;
                        return Ok(());
                    }
                }
            }
        })?;
    }
}

fn parse_and_report<G: Grammar, W: Write>(
    path: &str,
    acceptors: Vec<SharedAcceptor>,
    grammar: G,
    config: &RuntimeConfig,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), pipeline::PipelineError> {
    let result = pipeline::parse_file_with_config(path, acceptors, grammar, config)?;

    match format {
        OutputFormat::Json => writeln!(out, "{}", pipeline::PipelineOutput::new(&result).to_json()?)?,
        OutputFormat::Indented => write!(out, "{}", result.tree.render_indented())?,
        OutputFormat::Bracketed => writeln!(out, "{}", result.tree)?,
    }

    Ok(())
}

fn print_help(program_name: &str) {
    println!("ll1 v{}", env!("CARGO_PKG_VERSION"));
    println!("Maximal-munch lexer and table-driven LL(1) parser");
    println!();
    println!("USAGE:");
    println!(
        "    {} lex [--mh]                   # Interactive lexer on stdin",
        program_name
    );
    println!(
        "    {} parse <file> [options]       # Parse a file and print its tree",
        program_name
    );
    println!();
    println!("LEX OPTIONS:");
    println!("    --mh                Use the Micro-Haskell lexer instead of the demo lexer");
    println!();
    println!("PARSE OPTIONS:");
    println!("    --mh                Lex the file with the Micro-Haskell lexer");
    println!("    --table <file>      Load the parse table from JSON (default: #S -> ε | EVEN #S && #S)");
    println!("    --tree              Print the tree one node per line");
    println!("    --json              Print the tree and run summary as JSON");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    --config <file>     Load runtime preferences from TOML");
    println!("    --version           Show version and build configuration");
    println!("    --help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    echo 'ab cd && &&' > input.txt");
    println!("    {} parse input.txt", program_name);
    println!("    {} parse prog.mh --mh --table mh_table.json --tree", program_name);
}

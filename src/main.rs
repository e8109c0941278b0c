use anyhow::Result;
use clap::Parser;
use pfs::config::Config;
use pfs::correction::{get_correction, OllamaClient};
use pfs::handoff::{self, DEFAULT_HANDOFF_FILE};
use pfs::spinner::{print_status, spin_while};
use pfs::telemetry::init_tracing;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "pfs",
    about = "Suggest a fix for your last failed shell command using a local model",
    version
)]
struct Args {
    /// Print token usage, timing and raw model output for each attempt
    #[arg(short, long)]
    verbose: bool,

    /// Env file with OLLAMA_BASE_URL and OLLAMA_MODEL (defaults to ~/.pfs.env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// File the shell wrapper reads the accepted command from
    #[arg(long, default_value = DEFAULT_HANDOFF_FILE)]
    handoff_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(if args.verbose { Level::DEBUG } else { Level::WARN });

    let request = handoff::read_request(io::stdin().lock())?;
    let config = Config::load(args.env_file.as_deref())?;

    let client = spin_while("Connecting to Ollama...", OllamaClient::connect(&config)).await?;
    print_status(&format!("Connected to Ollama model: {}", client.model_name()));

    let correction = match spin_while(
        "Asking the llm for your last failed command...",
        get_correction(&client, &request, args.verbose),
    )
    .await
    {
        Ok(correction) => correction,
        Err(err) => {
            eprintln!("Error: Failed to get correction from LLM: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    if !handoff::is_command_available(&correction.corrected_command) {
        if args.verbose {
            eprintln!(
                "Error: Corrected command is not valid or not in PATH: {}",
                correction.corrected_command
            );
        }
        println!("\n🧠 Explanation: The LLM returned a command that is not valid or not in your PATH. No action will be taken.");
        return Ok(ExitCode::FAILURE);
    }

    println!("\n🧠 Explanation: {}", correction.explanation);
    println!(
        "🔧 Corrected: \x1b[1;32m{}\x1b[0m\n",
        correction.corrected_command
    );

    if handoff::confirm_on_tty("> Execute this command?")? {
        handoff::write_handoff(&args.handoff_file, &correction.corrected_command)?;
    } else {
        println!("Aborted.");
    }

    Ok(ExitCode::SUCCESS)
}

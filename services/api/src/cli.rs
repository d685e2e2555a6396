use crate::report::{
    run_evaluate, run_normalize, run_transcribe, EvaluateArgs, NormalizeArgs, TranscribeArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pitch_coach::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Pitch Coach",
    about = "Score short spoken pitches against the call-to-action rubric",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Normalize a saved rubric response without calling any provider
    Normalize(NormalizeArgs),
    /// Transcribe an audio file with the configured speech provider
    Transcribe(TranscribeArgs),
    /// Score a transcript file with the configured language model
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Normalize(args) => run_normalize(args),
        Command::Transcribe(args) => blocking(move || run_transcribe(args)).await,
        Command::Evaluate(args) => blocking(move || run_evaluate(args)).await,
    }
}

// Provider clients block; keep them off the async worker threads.
async fn blocking<F>(task: F) -> Result<(), AppError>
where
    F: FnOnce() -> Result<(), AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(task).await?
}

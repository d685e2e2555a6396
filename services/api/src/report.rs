use crate::infra::build_service;
use clap::Args;
use pitch_coach::config::AppConfig;
use pitch_coach::error::AppError;
use pitch_coach::evaluation::{Category, NormalizedEvaluation};
use pitch_coach::normalize;
use pitch_coach::providers::AudioUpload;
use pitch_coach::service::EvaluationRequest;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Rubric response as JSON (`-` reads stdin)
    pub(crate) input: PathBuf,
    /// Print the normalized evaluation as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TranscribeArgs {
    /// Recorded pitch (webm, wav, mp3, m4a, ...)
    pub(crate) audio: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Plain-text transcript of the pitch
    pub(crate) transcript: PathBuf,
    /// Target pitch length in seconds (45 or 60)
    #[arg(long, default_value_t = 60)]
    pub(crate) duration: u32,
    /// Print the normalized evaluation as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let raw: serde_json::Value = serde_json::from_str(&read_input(&args.input)?)?;
    let evaluation = normalize(&raw)?;
    print_evaluation(&evaluation, args.json)
}

pub(crate) fn run_transcribe(args: TranscribeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.providers)?;

    let audio = AudioUpload {
        file_name: file_name(&args.audio),
        content_type: mime_guess::from_path(&args.audio).first_or_octet_stream(),
        bytes: fs::read(&args.audio)?,
    };
    let response = service.transcribe(audio)?;

    println!("{}", response.transcript);
    eprintln!(
        "language: {}, processed in {} ms",
        response.language, response.duration_ms
    );
    Ok(())
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.providers)?;

    let evaluation = service.evaluate(EvaluationRequest {
        transcript: read_input(&args.transcript)?,
        duration: args.duration,
    })?;
    print_evaluation(&evaluation, args.json)
}

fn read_input(path: &Path) -> Result<String, AppError> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(fs::read_to_string(path)?)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("recording")
        .to_string()
}

fn print_evaluation(evaluation: &NormalizedEvaluation, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(evaluation)?);
    } else {
        print!("{}", render_evaluation(evaluation));
    }
    Ok(())
}

pub(crate) fn render_evaluation(evaluation: &NormalizedEvaluation) -> String {
    let mut out = String::new();
    out.push_str(&format!("Gesamtpunktzahl: {:.1}/100\n", evaluation.overall_score));
    out.push_str(&format!("{}\n", evaluation.summary));

    out.push_str("\nKategorien\n");
    for category in Category::ALL {
        out.push_str(&format!(
            "- {} ({:.0}%): {:.1}\n",
            category.label(),
            category.weight() * 100.0,
            evaluation.category_scores.get(category)
        ));
        for (criterion, score) in evaluation.kpis.get(category) {
            out.push_str(&format!("    {criterion}: {score:.0}\n"));
        }
    }

    if evaluation.proposals.is_empty() {
        out.push_str("\nVerbesserungsvorschläge: keine\n");
    } else {
        out.push_str("\nVerbesserungsvorschläge\n");
        for proposal in &evaluation.proposals {
            out.push_str(&format!(
                "- [{}] {} ({}): {}\n",
                proposal.priority.as_str(),
                proposal.title,
                proposal.kind,
                proposal.description
            ));
        }
    }

    out.push_str(&format!("\nWörter: {}\n", evaluation.word_count));
    out
}

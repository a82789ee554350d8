use std::io::Write;
use std::{
    env,
    fs::{self, OpenOptions},
};

use anyhow::{anyhow, Context};
use env_logger::Env;
use quiztopia::{api::HttpBackend, listing::QuizList, PersistedQuiz};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const DEFAULT_OUTPUT_DIR: &str = "output/quizzes";

pub struct ExportArgs {
    pub output_dir: String,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> ExportArgs {
    ExportArgs {
        output_dir: args.next().unwrap_or(DEFAULT_OUTPUT_DIR.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = parse_args(env::args().skip(1));
    let config = quiztopia::Config::from_env().context("failed to load configuration")?;
    let token = config
        .token_store()
        .load()
        .context("failed to read saved token")?;
    if token.is_none() {
        eprintln!("no saved token, run `quiztopia login` first; trying anyway");
    }

    let backend = HttpBackend::new(&config.api_url, config.timeout);
    let mut list = QuizList::default();
    list.refresh(&backend, token.as_ref())
        .map_err(|e| anyhow!("{}", e.advisory()))
        .context(format!("could not fetch quizzes from {}", backend.base_url()))?;

    create_output_dir(&args.output_dir).context("failed to create output directory")?;

    for quiz in list.quizzes() {
        if let Err(e) = write_quiz(quiz, &args.output_dir) {
            eprintln!("Error writing quiz {}: {}", quiz.quiz_id, e);
            return Err(e);
        }
    }

    println!(
        "exported {BOLD}{}{RESET} quizzes to {BOLD}{}{RESET}",
        list.quizzes().len(),
        &args.output_dir
    );

    Ok(())
}

fn write_quiz(quiz: &PersistedQuiz, output_dir: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(format!("{}/{}.yaml", output_dir, quiz.quiz_id))
        .context(format!("failed to open file for {}", quiz.quiz_id))?;

    let content = serde_yaml_ng::to_string(quiz).context("failed to serialize quiz")?;
    write!(file, "{}", content).context("failed to write quiz")?;

    Ok(())
}

fn create_output_dir(output_dir: &str) -> anyhow::Result<()> {
    if fs::metadata(output_dir).is_ok() {
        fs::remove_dir_all(output_dir)?;
    }

    fs::create_dir_all(output_dir)?;
    Ok(())
}

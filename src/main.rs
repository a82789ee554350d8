use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use quiztopia::{
    api::HttpBackend,
    authoring::AuthoringSession,
    listing::QuizList,
    model::{Coordinate, PersistedQuiz},
    Config,
};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

#[derive(Parser, Debug)]
#[command(name = "quiztopia", version, about = "Author and manage geolocation quizzes")]
struct Args {
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Signup {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in and remember the token
    Login {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the saved token
    Logout,
    /// List every quiz
    List,
    /// Print one quiz as YAML
    Show { quiz_id: String },
    /// Delete a quiz
    Delete { quiz_id: String },
    /// Author a new quiz interactively
    Create {
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let config = Config::from_env().context("failed to load configuration")?;
    debug!("using API at {}", config.api_url);
    let backend = HttpBackend::new(&config.api_url, config.timeout);
    let store = config.token_store();

    match args.command {
        Command::Signup { username, password } => {
            let (username, password) = credentials(username, password)?;
            backend
                .signup(&username, &password)
                .context("signup failed")?;
            println!("Signup successful! Please log in.");
        }
        Command::Login { username, password } => {
            let (username, password) = credentials(username, password)?;
            let token = backend.login(&username, &password).context("login failed")?;
            store.save(&token).context("failed to remember token")?;
            println!("Logged in as {BOLD}{}{RESET}", username);
        }
        Command::Logout => {
            store.clear().context("failed to forget token")?;
            println!("Logged out");
        }
        Command::List => {
            let token = store.load()?;
            let mut list = QuizList::default();
            list.refresh(&backend, token.as_ref())
                .map_err(|e| advise(e.advisory(), &e))?;
            print_list(&list);
        }
        Command::Show { quiz_id } => {
            let token = store.load()?;
            let mut list = QuizList::default();
            list.refresh(&backend, token.as_ref())
                .map_err(|e| advise(e.advisory(), &e))?;
            let quiz = list
                .get(&quiz_id)
                .context(format!("no quiz with id {}", quiz_id))?;
            println!("{}", map_line(quiz));
            print!("{}", quiz_yaml(quiz)?);
        }
        Command::Delete { quiz_id } => {
            let token = store.load()?;
            let mut list = QuizList::default();
            list.delete(&backend, token.as_ref(), &quiz_id)
                .map_err(|e| advise(format!("Error deleting quiz: {}", e.advisory()), &e))?;
            println!("Quiz deleted successfully.");
        }
        Command::Create { name } => {
            let token = store.load()?;
            let mut session = AuthoringSession::new(backend, token);
            if let Err(e) = session.locate_device(&mut config.locator()) {
                println!("{}", e);
            }
            session.quiz.set_name(name.unwrap_or_default());
            author(&mut session, io::stdin().lock())?;
        }
    }

    Ok(())
}

// show the user-facing text, keep the full chain in the log
fn advise(advisory: String, err: &dyn std::error::Error) -> anyhow::Error {
    debug!("{}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        debug!("  caused by: {}", cause);
        source = cause.source();
    }
    anyhow!(advisory)
}

fn credentials(username: Option<String>, password: Option<String>) -> Result<(String, String)> {
    let mut stdin = io::stdin().lock();
    let username = match username {
        Some(u) => u,
        None => prompt(&mut stdin, "Username: ")?.context("username is required")?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt(&mut stdin, "Password: ")?.context("password is required")?,
    };
    Ok((username, password))
}

fn prompt(input: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// One line typed at the `create` prompt.
#[derive(Debug, PartialEq)]
enum AuthorCommand {
    Name(String),
    Question(String),
    Answer(String),
    At(Coordinate),
    Add,
    Show,
    Submit,
    Quit,
    Help,
}

impl FromStr for AuthorCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let (word, rest) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));
        let rest = rest.trim();
        Ok(match word {
            "name" => AuthorCommand::Name(rest.to_string()),
            "q" => AuthorCommand::Question(rest.to_string()),
            "a" => AuthorCommand::Answer(rest.to_string()),
            "at" => AuthorCommand::At(rest.parse().context("expected 'at <lat>,<lng>'")?),
            "add" => AuthorCommand::Add,
            "list" => AuthorCommand::Show,
            "submit" => AuthorCommand::Submit,
            "quit" | "exit" => AuthorCommand::Quit,
            "help" | "" => AuthorCommand::Help,
            other => return Err(anyhow!("unknown command '{}', try 'help'", other)),
        })
    }
}

const AUTHOR_HELP: &str = "\
  name <text>       set the quiz name
  q <text>          set the question
  a <text>          set the answer
  at <lat>,<lng>    pick the location
  add               add the question to the quiz
  list              show the quiz so far
  submit            save the quiz
  quit              leave without saving";

fn author(session: &mut AuthoringSession<HttpBackend>, mut input: impl BufRead) -> Result<()> {
    println!("{}", AUTHOR_HELP);
    match session.draft.location.candidate() {
        Some(at) => println!("Current location {}", at),
        None => println!("No location yet, use 'at <lat>,<lng>'"),
    }

    while let Some(line) = prompt(&mut input, "> ")? {
        let command = match line.parse::<AuthorCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{:#}", e);
                continue;
            }
        };

        match command {
            AuthorCommand::Name(name) => session.quiz.set_name(name),
            AuthorCommand::Question(q) => session.draft.question = q,
            AuthorCommand::Answer(a) => session.draft.answer = a,
            AuthorCommand::At(at) => {
                println!("Selected location {}", at);
                session.pick_on_map(at);
            }
            AuthorCommand::Add => {
                if let Ok(entry) = session.add_question() {
                    println!("Added '{}' at {}", entry.question(), entry.location());
                }
            }
            AuthorCommand::Show => {
                println!("{BOLD}{}{RESET}", session.quiz.name());
                for entry in session.quiz.entries() {
                    println!("  Question: {}", entry.question());
                    println!("  Answer: {}", entry.answer());
                    println!("  Location: {}", entry.location());
                }
            }
            AuthorCommand::Submit => {
                if let Ok(report) = session.submit() {
                    println!(
                        "created quiz {BOLD}{}{RESET} with {BOLD}{}{RESET} questions",
                        report.quiz_name, report.submitted
                    );
                    return Ok(());
                }
            }
            AuthorCommand::Quit => {
                session.abandon();
                return Ok(());
            }
            AuthorCommand::Help => println!("{}", AUTHOR_HELP),
        }

        if let Some(advisory) = session.advisory() {
            println!("{}", advisory);
        }
    }

    Ok(())
}

fn print_list(list: &QuizList) {
    for quiz in list.quizzes() {
        println!("Quiz ID: {BOLD}{}{RESET}", quiz.quiz_id);
        println!("  Created by: {} (User ID: {})", quiz.username, quiz.user_id);
        println!("  {} questions", quiz.questions.len());
        println!("  {}", map_line(quiz));
    }
    println!("{} quizzes", list.quizzes().len());
}

fn map_line(quiz: &PersistedQuiz) -> String {
    match quiz.map_center() {
        Some((lat, lng)) => format!("Map centre: {}, {}", lat, lng),
        None => "Map centre: none (no questions with a location)".to_string(),
    }
}

fn quiz_yaml(quiz: &PersistedQuiz) -> Result<String> {
    serde_yaml_ng::to_string(quiz).context("failed to serialize quiz")
}

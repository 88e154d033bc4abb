use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rand::Rng;
use std::fs;
use std::io::{BufRead, Write, stdin, stdout};
use std::path::PathBuf;
use thiserror::Error;

use fateline_game::{
    DataError, DataLoader, DecisionRecord, Event, EventData, GameEngine, PassengerTable, Role,
    VoyageSession, VoyageSummary, class_name,
};

const RULE: &str = "==========================================";

#[derive(Debug, Parser)]
#[command(name = "fateline", version)]
#[command(about = "Fateline - a data-seeded maritime disaster narrative")]
struct Args {
    /// Path to a passenger table CSV (defaults to the embedded sample)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Path to an event catalog JSON (defaults to the embedded catalog)
    #[arg(long)]
    events: Option<PathBuf>,

    /// Seed for deterministic replays (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Cabin class 1-3; skips the difficulty prompt
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    class: Option<u8>,
}

#[derive(Debug, Error)]
enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Loads from files when paths were given, embedded assets otherwise.
struct FileLoader {
    data: Option<PathBuf>,
    events: Option<PathBuf>,
}

impl FileLoader {
    fn read(path: &PathBuf) -> Result<String, LoadError> {
        fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl DataLoader for FileLoader {
    type Error = LoadError;

    fn load_passenger_table(&self) -> Result<PassengerTable, Self::Error> {
        match &self.data {
            Some(path) => Ok(PassengerTable::from_csv(&Self::read(path)?)?),
            None => Ok(PassengerTable::load_from_static()?),
        }
    }

    fn load_event_data(&self) -> Result<EventData, Self::Error> {
        match &self.events {
            Some(path) => Ok(EventData::from_json(&Self::read(path)?).map_err(DataError::from)?),
            None => Ok(EventData::load_from_static()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut input = stdin().lock();
    run(&args, &mut input)
}

fn run(args: &Args, input: &mut impl BufRead) -> Result<()> {
    announce_banner();
    wait_for_enter(input, "Press Enter to begin...")?;

    let loader = FileLoader {
        data: args.data.clone(),
        events: args.events.clone(),
    };
    let engine = GameEngine::new(loader);

    let class = match args.class {
        Some(class) => class,
        None => prompt_difficulty(input)?,
    };
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    log::info!("starting voyage: class {class}, seed {seed}");

    let mut session = engine
        .create_session(class, seed)
        .context("could not load game data")?
        .with_context(|| format!("no passengers found in {}", class_name(class)))?;

    introduce_role(session.role());
    wait_for_enter(input, "Press Enter to continue...")?;

    println!(
        "The record books give you a base survival rate of about {}.",
        format_percent(session.base_prob()).bold()
    );
    println!("Whether fate can be rewritten comes down to ten decisions...\n");
    wait_for_enter(input, "Press Enter for the first round...")?;

    while !session.is_over() {
        let round = session.current_round();
        match session.next_event() {
            Some(event) => {
                play_round(&mut session, &event, round, input)?;
            }
            None => {
                println!(
                    "{}",
                    format!("Round {round}: no event left to play; the round slips by.").dimmed()
                );
                session.skip_round();
            }
        }
    }

    print_final_screen(&session);
    wait_for_enter(input, "Thanks for playing. Press Enter to leave.")?;
    Ok(())
}

fn announce_banner() {
    println!("{RULE}");
    println!("  {}", "FATELINE: The Night the Ship Went Down".bright_cyan().bold());
    println!("{RULE}\n");
}

fn wait_for_enter(input: &mut impl BufRead, prompt: &str) -> Result<()> {
    println!("{}", prompt.dimmed());
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

fn prompt_difficulty(input: &mut impl BufRead) -> Result<u8> {
    println!("Choose your difficulty (your starting cabin class):");
    println!("  1. First Class  (Easy)");
    println!("  2. Second Class (Normal)");
    println!("  3. Third Class  (Hard)");

    // Re-prompt forever; bad input is never fatal.
    loop {
        print!("Enter a number 1-3: ");
        stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("input closed before a difficulty was chosen");
        }
        if let Some(class) = parse_difficulty(&line) {
            return Ok(class);
        }
    }
}

fn parse_difficulty(line: &str) -> Option<u8> {
    match line.trim() {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        _ => None,
    }
}

fn introduce_role(role: &Role) {
    println!("\n{RULE}");
    println!("{}", "[ Your Role ]".bold());
    println!("Name:     passenger no. {}", role.name);
    println!("Sex:      {}", role.sex);
    println!("Age:      {}", role.age.round() as i64);
    println!("Cabin:    {}", class_name(role.class));
    println!("Fare:     {:.2}", role.fare);
    println!("Embarked: {}", role.embarked.as_deref().unwrap_or("unknown"));
    println!("{RULE}\n");
}

fn play_round(
    session: &mut VoyageSession,
    event: &Event,
    round: u32,
    input: &mut impl BufRead,
) -> Result<()> {
    println!("\n{}", format!("Round {round}").bright_yellow().bold());
    println!("{}", event.title);
    for choice in &event.choices {
        println!("  {}. {}", choice.key.bold(), choice.label);
    }

    let keys = event.keys();
    let key = prompt_choice(input, &keys)?;
    let outcome = session
        .choose(event, &key)
        .context("validated choice was rejected")?;

    println!("-> You showed your \"{}\" side.", outcome.tag.italic());
    wait_for_enter(input, "Press Enter to continue...")?;
    Ok(())
}

fn prompt_choice(input: &mut impl BufRead, keys: &[&str]) -> Result<String> {
    let menu = keys.join("/");
    loop {
        print!("Your choice ({menu}): ");
        stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("input closed mid-round");
        }
        if let Some(key) = parse_choice(&line, keys) {
            return Ok(key);
        }
    }
}

fn parse_choice(line: &str, keys: &[&str]) -> Option<String> {
    let entered = line.trim();
    keys.iter()
        .find(|key| key.eq_ignore_ascii_case(entered))
        .map(|key| (*key).to_uppercase())
}

fn format_percent(prob: f64) -> String {
    format!("{:.1}%", prob * 100.0)
}

fn review_line(record: &DecisionRecord) -> String {
    match record {
        DecisionRecord::Played {
            round,
            title,
            choice,
            text,
            tag,
            ..
        } => format!("Round {round} | {title} -> you chose {choice}. {text} (trait: {tag})"),
        DecisionRecord::Skipped { round } => {
            format!("Round {round} | skipped: no event was available.")
        }
    }
}

fn print_final_screen(session: &VoyageSession) {
    let summary = session.finish();

    println!("\n{RULE}");
    println!("  {}", "Final Reckoning".bright_cyan().bold());
    println!("{RULE}");
    println!(
        "Your final survival chance: {}",
        format_percent(summary.final_prob).bold()
    );
    println!("Your final moral score:     {}", summary.moral_score);
    println!("\n{}", summary.ending.bold());

    println!("\n{}", "Your ten decisions".bold());
    for record in session.decisions() {
        println!("  {}", review_line(record));
    }

    print_personality(&summary);
}

fn print_personality(summary: &VoyageSummary) {
    println!("\n{RULE}");
    println!("  {}", "Your Disaster Journal".bold());
    println!("{RULE}");
    println!("{}", summary.tone);
    if summary.tag_phrase.is_empty() {
        println!("Across ten rounds, no trait of yours stood out.");
    } else {
        println!(
            "Across ten rounds, the traits you showed most were: {}.",
            summary.tag_phrase
        );
    }
    println!("{}", summary.personality);
    println!("The voyage is over, but the face you showed it is on the record for good.\n");
}

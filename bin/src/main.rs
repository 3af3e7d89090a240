use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use rand::seq::SliceRandom;
use rs_wordle_trie::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufWriter};
use std::path::Path;
use std::time::Instant;

const MAX_NUM_GUESSES: usize = 128;

/// Finds the words that can be made from a set of letters, or works out a Wordle answer from the
/// feedback for each guess.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to a file that contains a list of words, with one word on each line, or to a trie
    /// snapshot ending in `.ron`.
    #[clap(short = 'f', long)]
    words_file: String,

    /// Saves the loaded trie to this path as a RON snapshot, which is faster to load next time.
    #[clap(long)]
    save_snapshot: Option<String>,

    /// The number of ranked candidates to show after each guess.
    #[clap(long, default_value = "5")]
    top: usize,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every word that can be spelled from the given letters, longest first.
    Words {
        letters: String,
        /// Allow each letter to be used any number of times.
        #[clap(long)]
        repeat: bool,
    },
    /// Solve a puzzle by entering the feedback for each of your guesses.
    Interactive,
    /// Run a single game against the given word.
    Single { word: String },
    /// Benchmark the solver against every five-letter word in the words file.
    Benchmark {
        /// Only play against this many randomly chosen words.
        #[clap(long)]
        sample: Option<usize>,
    },
    /// Print the trie, one node per line.
    Dump {
        /// Skip nodes deeper than this zero-based letter position.
        #[clap(long)]
        max_depth: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let start_time = Instant::now();
    let args = Args::parse();
    println!("File: {}", args.words_file);

    let trie = load_trie(&args.words_file)?;
    println!("There are {} words.", trie.len());
    if let Some(path) = &args.save_snapshot {
        save_snapshot(&trie, path)?;
        println!("Trie saved to {}.", path);
    }

    match args.command {
        Command::Words { letters, repeat } => list_words(&trie, &letters, repeat),
        Command::Interactive => play_interactive_game(trie, args.top)?,
        Command::Single { word } => play_single_game(&word, trie)?,
        Command::Benchmark { sample } => run_benchmark(trie, sample),
        Command::Dump { max_depth } => dump_trie(&trie, max_depth)?,
    }

    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn load_trie(path: &str) -> Result<Trie> {
    let file = File::open(path).with_context(|| format!("Couldn't open {}", path))?;
    if Path::new(path).extension().map_or(false, |ext| ext == "ron") {
        let trie: Trie = ron::de::from_reader(file)
            .with_context(|| format!("Couldn't read the trie snapshot in {}", path))?;
        info!("Loaded a trie snapshot of {} nodes.", trie.node_count());
        return Ok(trie);
    }

    let mut words = Vec::new();
    for line in io::BufReader::new(file).lines() {
        let word = normalize(&line?);
        if !word.is_empty() {
            words.push(word);
        }
    }
    info!("Read {} words from {}.", words.len(), path);
    Ok(Trie::from_words(words))
}

/// Lowercases the line and drops everything that isn't a letter.
fn normalize(line: &str) -> String {
    line.chars()
        .filter(|letter| letter.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

fn save_snapshot(trie: &Trie, path: &str) -> Result<()> {
    let writer = BufWriter::new(
        File::create(path).with_context(|| format!("Couldn't create {}", path))?,
    );
    ron::ser::to_writer(writer, trie).with_context(|| format!("Couldn't write {}", path))?;
    Ok(())
}

fn list_words(trie: &Trie, letters: &str, repeat: bool) {
    let words = SubsetSearch::new(trie).query(letters, repeat);
    println!("Found {} words:", words.len());
    for word in words.iter() {
        println!("\t{}", word);
    }
}

fn print_candidates(solver: &WordleSolver, top: usize) {
    let candidates = solver.candidates();
    if candidates.is_empty() {
        println!("No words match the feedback so far.");
        return;
    }
    println!(
        "Top {} of {} possible words:",
        top.min(candidates.len()),
        candidates.len()
    );
    for candidate in candidates.iter().take(top) {
        println!("\t{} Score: {}", candidate.word, candidate.score);
    }
}

fn play_interactive_game(trie: Trie, top: usize) -> Result<()> {
    let mut solver = WordleSolver::new(trie);
    println!(
        "After each guess, enter the result for each letter of the guess as:\n\n\
           * 'A' (uppercase) = this letter is in the word and in the right location\n\
           * 'a' (lowercase) = this letter is in the word, but not in this location\n\
           * '.a' or ' a'    = this letter is not in the word.\n\n\
         For example, if your word was \"spade\" and the guess was \"soapy\", you would enter \"S.oAp.y\".\n\
         Enter an empty line to start over."
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print_candidates(&solver, top);
        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };
        if line.is_empty() {
            solver.reset();
            println!("Restarting...");
            continue;
        }
        if let Err(error) = solver.update(&line) {
            println!("{}. Try again.", error);
        }
    }
}

fn play_single_game(word: &str, trie: Trie) -> Result<()> {
    let mut solver = WordleSolver::new(trie);
    match play_game(word, MAX_NUM_GUESSES, &mut solver) {
        GameResult::Success(guesses) => {
            println!("Solved it! It took me {} guesses.", guesses.len());
            for guess in guesses.iter() {
                println!("\t{}", guess);
            }
        }
        GameResult::Failure(guesses) => {
            println!(
                "I still couldn't solve it after {} guesses :(",
                guesses.len()
            );
            for guess in guesses.iter() {
                println!("\t{}", guess);
            }
        }
        GameResult::UnknownWord => bail!("{} is not a five-letter word in the word list.", word),
    }
    Ok(())
}

fn run_benchmark(trie: Trie, sample: Option<usize>) {
    let mut solver = WordleSolver::new(trie);
    let mut words = solver.trie().words();
    if let Some(sample) = sample {
        words.shuffle(&mut rand::thread_rng());
        words.truncate(sample);
    }

    let mut num_guesses_per_game: Vec<usize> = Vec::new();
    let mut unsolved: Vec<&str> = Vec::new();
    for word in words.iter() {
        match play_game(word, MAX_NUM_GUESSES, &mut solver) {
            GameResult::Success(guesses) => num_guesses_per_game.push(guesses.len()),
            _ => unsolved.push(word),
        }
    }
    println!(
        "Solved {} of {} words. Results:",
        num_guesses_per_game.len(),
        words.len()
    );
    if !unsolved.is_empty() {
        println!("Couldn't solve: {}", unsolved.join(", "));
    }
    if num_guesses_per_game.is_empty() {
        return;
    }

    let mut num_games_per_round: BTreeMap<usize, usize> = BTreeMap::new();
    for num_guesses in num_guesses_per_game.iter() {
        *(num_games_per_round.entry(*num_guesses).or_insert(0)) += 1;
    }

    println!("|Num guesses|Num games|");
    println!("|-----------|---------|");
    for (num_guesses, num_games) in num_games_per_round.iter() {
        println!("|{}|{}|", num_guesses, num_games);
    }

    let average: f64 = num_guesses_per_game.iter().sum::<usize>() as f64
        / num_guesses_per_game.len() as f64;
    let std_dev: f64 = (num_guesses_per_game
        .iter()
        .map(|num_guesses| (*num_guesses as f64 - average).powi(2))
        .sum::<f64>()
        / num_guesses_per_game.len() as f64)
        .sqrt();

    println!(
        "\n**Average number of guesses:** {:.2} +/- {:.2}",
        average, std_dev
    );
}

fn dump_trie(trie: &Trie, max_depth: Option<usize>) -> Result<()> {
    let mut out = String::new();
    trie.write_tree(&mut out, max_depth.map(|depth| depth + 1))?;
    print!("{}", out);
    Ok(())
}

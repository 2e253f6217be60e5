//! # Word Tiles
//!
//! Word Tiles is a single-player puzzle that combines polyomino placement with
//! word formation. The player places lettered pieces from a tray onto a 10×10
//! board; every row or column run that spells a dictionary word of three or
//! more letters is cleared for points. Wildcard pieces stand in for any letter,
//! and a bomb piece, earned by a streak of clears, blasts a 3×3 hole.
//!
//! Via command line options, the user chooses the dictionary directory and
//! tunes the special pieces. Subcommands precompile the dictionary, check
//! words, suggest words, or open the text-based user interface (TUI) to play.

mod app;
mod tui;

use clap::{Parser, Subcommand};
use log::{debug, trace, warn};

use app::App;
use tui::tui;
use word_tiles::{
	game::{Game, GameConfig},
	lexicon::{BucketKey, DirectoryLoader, Lexicon, DEFAULT_HINT_LIMIT},
	piece::WILDCARD_SYMBOL
};

////////////////////////////////////////////////////////////////////////////////
//                           Command line options.                            //
////////////////////////////////////////////////////////////////////////////////

/// CLI for playing Word Tiles.
#[derive(Clone, Debug, Parser)]
#[command(version = "1.0", author = "Todd L Smith")]
struct Opts
{
	/// The path to the directory containing the dictionary files: one text
	/// file per leading-consonant bucket (e.g., `g.txt`), plus
	/// `bootstrap.txt`.
	#[arg(short = 'd', long, default_value = "dict")]
	directory: String,

	/// The seed of the random number generator. Omit for a fresh game every
	/// time.
	#[arg(short = 's', long)]
	seed: Option<u64>,

	/// The number of consecutive word clears that earns a bomb. 0 disables
	/// bombs.
	#[arg(short = 'b', long, default_value = "3")]
	bomb_every: u32,

	/// The number of generated pieces per wildcard. 0 disables wildcards.
	#[arg(short = 'w', long, default_value = "3")]
	wildcard_every: u32,

	#[command(subcommand)]
	command: Command
}

/// The subcommands of the CLI.
#[derive(Clone, Debug, Subcommand)]
enum Command
{
	/// Just compile every text dictionary into its binary form and exit.
	Generate,

	/// Check whether words are valid. Words containing ★ are resolved as
	/// patterns.
	Check {
		/// The words to check.
		#[arg(required = true)]
		words: Vec<String>
	},

	/// Suggest words that start with the given prefix.
	Hint {
		/// The prefix.
		prefix: String,

		/// The maximum number of suggestions.
		#[arg(short = 'l', long, default_value_t = DEFAULT_HINT_LIMIT)]
		limit: usize
	},

	/// Open the text-based user interface (TUI) to play. The final score will
	/// be written to standard output.
	Play {
		/// Suppress emission of the final score to standard output.
		#[arg(short = 'q', long)]
		quiet: bool
	}
}

////////////////////////////////////////////////////////////////////////////////
//                               Main program.                                //
////////////////////////////////////////////////////////////////////////////////

/// Parse the command line options and execute the appropriate subcommand.
fn main()
{
	env_logger::init();

	// Parse the command line options.
	let opts = Opts::parse();
	debug!("Command line options: {:?}", opts);

	let loader = DirectoryLoader::new(&opts.directory);
	match opts.command
	{
		Command::Generate =>
		{
			for (stem, outcome) in loader.compile_all()
			{
				match outcome
				{
					Ok(count) => println!("{}: {} words", stem, count),
					Err(e) => warn!("{}", e)
				}
			}
			trace!("Exiting after generating binary dictionaries");
		},
		Command::Check { words } =>
		{
			let mut lexicon = Lexicon::new(loader);
			for word in words
			{
				print_check(&mut lexicon, &word);
			}
		},
		Command::Hint { prefix, limit } =>
		{
			let mut lexicon = Lexicon::new(loader);
			lexicon.warm();
			if let Some(key) = BucketKey::for_word(&prefix)
			{
				lexicon.ensure_bucket(key);
			}
			for word in lexicon.prefix_search(&prefix, limit)
			{
				println!("{}", word);
			}
		},
		Command::Play { quiet } =>
		{
			let config = GameConfig {
				seed: opts.seed,
				bomb_every: opts.bomb_every,
				wildcard_every: opts.wildcard_every,
				..GameConfig::default()
			};
			let game = Game::new(config, Lexicon::new(loader));
			trace!("Opening TUI");
			let score = tui(|tui| App::new(game).run(tui))
				.unwrap_or_else(|e| panic!("Failed to drive TUI: {}", e));
			if !quiet
			{
				println!("{}", score);
			}
		}
	}
}

/// Print the verdict on a single word to standard output. Patterns print the
/// word they resolve to.
///
/// # Arguments
///
/// * `lexicon` - The lexicon.
/// * `word` - The word or pattern to check.
fn print_check(lexicon: &mut Lexicon, word: &str)
{
	if word.contains(WILDCARD_SYMBOL)
	{
		match lexicon.is_valid_fuzzy(word)
		{
			Some(resolved) => println!("{}: {}", word, resolved),
			None => println!("{}: -", word)
		}
	}
	else
	{
		let verdict = if lexicon.is_valid(word) { "valid" } else { "invalid" };
		println!("{}: {}", word, verdict);
	}
}

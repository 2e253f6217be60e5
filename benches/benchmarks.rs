use std::time::Duration;

use const_format::concatcp;
use criterion::{measurement::Measurement, BenchmarkGroup, Criterion};
use word_tiles::{
	board::{Board, Position, BOARD_COLS, BOARD_ROWS},
	lexicon::{Dictionary, Lexicon, MemoryLoader},
	matcher::find_words,
	piece::{Piece, PieceId, Tint}
};

/// The path of the directory containing the dictionaries.
#[inline]
#[must_use]
const fn dir() -> &'static str
{
	"dict"
}

/// The stem of the benchmarked bucket.
#[inline]
#[must_use]
const fn name() -> &'static str
{
	"g"
}

/// The path to the text file.
#[inline]
#[must_use]
const fn path_txt() -> &'static str
{
	concatcp!(dir(), "/", name(), ".txt")
}

/// The path to the binary file.
#[inline]
#[must_use]
const fn path_dict() -> &'static str
{
	concatcp!(dir(), "/", name(), ".dict")
}

/// Answer a completely filled board, cycling through a short syllable
/// sequence so that every row contains several words.
fn full_board() -> Board
{
	let syllables = ['가', '나', '다', '라', '마'];
	let mut board = Board::new();
	let mut id = 0;
	for row in 0..BOARD_ROWS as i16
	{
		for col in 0..BOARD_COLS as i16
		{
			let letter = syllables[(row + col) as usize % syllables.len()];
			let piece = Piece::single(PieceId(id), letter, Tint(0));
			board.place(&piece, &[Position::new(col, row)]).unwrap();
			id += 1;
		}
	}
	board
}

/// Benchmark reading a bucket from its text file.
///
/// # Arguments
///
/// * `g` - The benchmark group.
fn bench_read_from_file<M: Measurement>(g: &mut BenchmarkGroup<M>)
{
	g.bench_function("read_from_file", |b| {
		b.iter(|| Dictionary::read_from_file(path_txt()).unwrap());
	});
}

/// Benchmark deserializing a bucket from its binary file.
///
/// # Arguments
///
/// * `g` - The benchmark group.
fn bench_deserialize_from_file<M: Measurement>(g: &mut BenchmarkGroup<M>)
{
	g.bench_function("deserialize_from_file", |b| {
		b.iter(|| Dictionary::deserialize_from_file(path_dict()).unwrap());
	});
}

/// Benchmark scanning a full board for candidates.
///
/// # Arguments
///
/// * `g` - The benchmark group.
fn bench_scan_words<M: Measurement>(g: &mut BenchmarkGroup<M>)
{
	let board = full_board();
	g.bench_function("scan_words", |b| {
		b.iter(|| board.scan_words());
	});
}

/// Benchmark a complete match pass over a full board, starting from a cold
/// lexicon every time.
///
/// # Arguments
///
/// * `g` - The benchmark group.
fn bench_find_words<M: Measurement>(g: &mut BenchmarkGroup<M>)
{
	let board = full_board();
	g.bench_function("find_words", |b| {
		b.iter(|| {
			let loader = MemoryLoader::new()
				.with_words(&["가나다", "나다라", "다라마", "마가나"]);
			let mut lexicon = Lexicon::new(loader).with_fallback::<&str>(&[]);
			let found = find_words(&board, &mut lexicon, 1);
			assert!(!found.is_empty());
		});
	});
}

/// Run all benchmarks.
///
/// The main purpose of the benchmarking is to ensure that
/// [`deserialize_from_file`](Dictionary::deserialize_from_file) is faster than
/// [`read_from_file`](Dictionary::read_from_file), and that a match pass stays
/// well within a frame.
fn main()
{
	// Ensure that both the text and binary files exist.
	let _ = Dictionary::open(dir(), name()).unwrap();

	// Run the benchmarks.
	let mut criterion = Criterion::default().configure_from_args();
	let mut group = criterion.benchmark_group("benchmarks");
	group.measurement_time(Duration::from_secs(10));
	bench_read_from_file(&mut group);
	bench_deserialize_from_file(&mut group);
	bench_scan_words(&mut group);
	bench_find_words(&mut group);
	group.finish();

	// Generate the final summary.
	criterion.final_summary();
}

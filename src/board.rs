//! # Board
//!
//! Herein is the fixed 10×10 grid that accumulates placed letters. The board
//! validates and commits placements, scans its rows and columns for candidate
//! words, and clears cells, either individually or in the 3×3 blast of a bomb.

use std::{
	collections::HashSet,
	error::Error,
	fmt::{self, Display, Formatter}
};

use fixedstr::str64;
use log::trace;
use serde::Serialize;

use crate::piece::{Piece, PieceId, Tint, WILDCARD_SYMBOL};

////////////////////////////////////////////////////////////////////////////////
//                                 Constants.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The number of rows on the board.
pub const BOARD_ROWS: usize = 10;

/// The number of columns on the board.
pub const BOARD_COLS: usize = 10;

/// The minimum length, in letters, of a scannable word.
pub const MIN_WORD_LEN: usize = 3;

////////////////////////////////////////////////////////////////////////////////
//                                Definitions.                                //
////////////////////////////////////////////////////////////////////////////////

/// A board coordinate. Signed, so that callers can describe (invalid)
/// positions beyond the top and left edges.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize
)]
pub struct Position
{
	/// The column, counting from the left edge.
	pub col: i16,

	/// The row, counting from the top edge.
	pub row: i16
}

impl Position
{
	#[inline]
	pub const fn new(col: i16, row: i16) -> Self { Self { col, row } }

	/// Offset the position by the given deltas, saturating at the limits of
	/// the coordinate type.
	#[inline]
	#[must_use]
	pub fn offset(self, dc: i16, dr: i16) -> Self
	{
		Self::new(self.col.saturating_add(dc), self.row.saturating_add(dr))
	}

	/// Check whether the position lies on the board.
	#[inline]
	#[must_use]
	pub fn is_in_bounds(self) -> bool
	{
		(0..BOARD_COLS as i16).contains(&self.col)
			&& (0..BOARD_ROWS as i16).contains(&self.row)
	}
}

impl Display for Position
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		write!(f, "({}, {})", self.col, self.row)
	}
}

/// The content of an occupied cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tile
{
	/// The letter. Wildcard cells hold [`WILDCARD_SYMBOL`].
	pub letter: char,

	/// The piece that put the letter here.
	pub owner: PieceId,

	/// The cosmetic tag inherited from the owner.
	pub tint: Tint
}

/// A board cell: empty, or occupied by a [`Tile`].
pub type Cell = Option<Tile>;

/// A cell that was removed from the board, reported for optional animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RemovedCell
{
	/// Where the cell was.
	pub position: Position,

	/// The letter it held.
	pub letter: char,

	/// Its cosmetic tag.
	pub tint: Tint
}

/// The axis along which a [`Candidate`] was read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Axis
{
	/// Read left to right.
	Row,

	/// Read top to bottom.
	Column
}

/// A candidate word: a window of at least [`MIN_WORD_LEN`] letters within a
/// maximal run of occupied cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate
{
	/// The letters of the window, with wildcard cells as [`WILDCARD_SYMBOL`].
	pub text: str64,

	/// The coordinates of the window, in reading order.
	pub cells: Vec<Position>,

	/// The axis along which the window was read.
	pub axis: Axis,

	/// Whether any cell of the window is a wildcard, i.e., whether the text
	/// requires fuzzy resolution.
	pub has_wildcard: bool
}

////////////////////////////////////////////////////////////////////////////////
//                                   Board.                                   //
////////////////////////////////////////////////////////////////////////////////

/// The game board: a fixed grid of cells, stored as rows of columns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Board
{
	cells: [[Cell; BOARD_COLS]; BOARD_ROWS]
}

impl Default for Board
{
	fn default() -> Self { Self::new() }
}

impl Board
{
	/// Construct an empty board.
	#[inline]
	pub fn new() -> Self
	{
		Self { cells: [[None; BOARD_COLS]; BOARD_ROWS] }
	}

	/// Get the cell at the given position.
	///
	/// # Arguments
	///
	/// * `position` - The position.
	///
	/// # Returns
	///
	/// The cell, or `None` if the position is off the board.
	#[inline]
	#[must_use]
	pub fn get(&self, position: Position) -> Option<Cell>
	{
		if position.is_in_bounds()
		{
			Some(self.cells[position.row as usize][position.col as usize])
		}
		else
		{
			None
		}
	}

	/// Get a mutable reference to the cell at the given position, which must
	/// be on the board.
	#[inline]
	fn cell_mut(&mut self, position: Position) -> &mut Cell
	{
		debug_assert!(position.is_in_bounds());
		&mut self.cells[position.row as usize][position.col as usize]
	}

	/// Check whether the given position is on the board and empty.
	#[inline]
	#[must_use]
	pub fn is_vacant(&self, position: Position) -> bool
	{
		matches!(self.get(position), Some(None))
	}

	/// Compute the absolute cells that the given piece would cover. The
	/// piece's relative offsets are anchored at the first target minus the
	/// piece's first offset, and every resulting cell must be on the board and
	/// empty. The targets must describe the same set of cells.
	///
	/// # Arguments
	///
	/// * `piece` - The piece to place.
	/// * `targets` - The requested cells, one per occupied cell of the piece.
	///
	/// # Returns
	///
	/// The absolute cells, in the piece's row-major order.
	///
	/// # Errors
	///
	/// * [`PlacementError::CountMismatch`] if the number of targets differs
	///   from the number of occupied cells.
	/// * [`PlacementError::FootprintMismatch`] if the targets do not coincide
	///   with the anchored footprint of the piece.
	/// * [`PlacementError::OutOfBounds`] if any cell is off the board.
	/// * [`PlacementError::Occupied`] if any cell is already occupied.
	pub fn footprint(
		&self,
		piece: &Piece,
		targets: &[Position]
	) -> Result<Vec<Position>, PlacementError>
	{
		let offsets = piece.relative_cells();
		if targets.len() != offsets.len()
		{
			return Err(PlacementError::CountMismatch {
				expected: offsets.len(),
				actual: targets.len()
			})
		}
		let (first_col, first_row) = offsets[0];
		let anchor = targets[0].offset(-(first_col as i16), -(first_row as i16));
		let cells = offsets.iter()
			.map(|&(col, row)| anchor.offset(col as i16, row as i16))
			.collect::<Vec<_>>();
		let mut expected = cells.clone();
		let mut actual = targets.to_vec();
		expected.sort();
		actual.sort();
		if expected != actual
		{
			return Err(PlacementError::FootprintMismatch)
		}
		for &cell in &cells
		{
			match self.get(cell)
			{
				None => return Err(PlacementError::OutOfBounds(cell)),
				Some(Some(_)) => return Err(PlacementError::Occupied(cell)),
				Some(None) => {}
			}
		}
		Ok(cells)
	}

	/// Check whether the given piece could be placed on the given cells.
	#[inline]
	#[must_use]
	pub fn is_valid_placement(&self, piece: &Piece, targets: &[Position]) -> bool
	{
		self.footprint(piece, targets).is_ok()
	}

	/// Place the given piece. Validation completes before anything is written,
	/// so a failed placement leaves the board untouched.
	///
	/// # Arguments
	///
	/// * `piece` - The piece to place.
	/// * `targets` - The requested cells, one per occupied cell of the piece.
	///
	/// # Returns
	///
	/// The cells that were written.
	///
	/// # Errors
	///
	/// See [`footprint`](Self::footprint).
	pub fn place(
		&mut self,
		piece: &Piece,
		targets: &[Position]
	) -> Result<Vec<Position>, PlacementError>
	{
		let cells = self.footprint(piece, targets)?;
		for (&cell, letter) in cells.iter().zip(piece.letters())
		{
			*self.cell_mut(cell) = Some(Tile {
				letter,
				owner: piece.id(),
				tint: piece.tint()
			});
		}
		trace!("placed {} at {:?}", piece.id(), cells);
		Ok(cells)
	}

	/// Scan every row and every column for candidate words. Each axis line is
	/// split into maximal runs of occupied cells, and every window of at least
	/// [`MIN_WORD_LEN`] letters within a run becomes a candidate. Overlapping
	/// candidates are all reported.
	///
	/// # Returns
	///
	/// The candidates, in no particular order.
	#[must_use]
	pub fn scan_words(&self) -> Vec<Candidate>
	{
		let mut candidates = Vec::new();
		for row in 0..BOARD_ROWS as i16
		{
			let line = (0..BOARD_COLS as i16)
				.map(|col| Position::new(col, row))
				.collect::<Vec<_>>();
			self.scan_line(&line, Axis::Row, &mut candidates);
		}
		for col in 0..BOARD_COLS as i16
		{
			let line = (0..BOARD_ROWS as i16)
				.map(|row| Position::new(col, row))
				.collect::<Vec<_>>();
			self.scan_line(&line, Axis::Column, &mut candidates);
		}
		candidates
	}

	/// Scan a single axis line, appending its candidates.
	///
	/// # Arguments
	///
	/// * `line` - The positions of the line, in reading order.
	/// * `axis` - The axis of the line.
	/// * `candidates` - The accumulator.
	fn scan_line(
		&self,
		line: &[Position],
		axis: Axis,
		candidates: &mut Vec<Candidate>
	) {
		let mut run = Vec::<(Position, char)>::new();
		// Chain a sentinel vacancy so that the final run is flushed too.
		let cells = line.iter()
			.map(|&p| (p, self.get(p).flatten()))
			.chain(std::iter::once((Position::default(), None)));
		for (position, tile) in cells
		{
			match tile
			{
				Some(tile) => run.push((position, tile.letter)),
				None =>
				{
					Self::emit_windows(&run, axis, candidates);
					run.clear();
				}
			}
		}
	}

	/// Emit every window of at least [`MIN_WORD_LEN`] letters of a run.
	fn emit_windows(
		run: &[(Position, char)],
		axis: Axis,
		candidates: &mut Vec<Candidate>
	) {
		for start in 0..run.len()
		{
			for end in start + MIN_WORD_LEN..=run.len()
			{
				let window = &run[start..end];
				let mut text = str64::new();
				for &(_, letter) in window
				{
					text.push_char(letter);
				}
				trace!("candidate: {} along {:?}", text, axis);
				candidates.push(Candidate {
					text,
					cells: window.iter().map(|&(p, _)| p).collect(),
					axis,
					has_wildcard: window.iter().any(|&(_, c)| c == WILDCARD_SYMBOL)
				});
			}
		}
	}

	/// Clear the 3×3 neighborhood of the given center, clipped to the board.
	/// Occupied cells are cleared unconditionally.
	///
	/// # Arguments
	///
	/// * `center` - The center of the blast.
	///
	/// # Returns
	///
	/// The cells that were removed.
	pub fn explode(&mut self, center: Position) -> Vec<RemovedCell>
	{
		let blast = (-1..=1)
			.flat_map(|dr| (-1..=1).map(move |dc| center.offset(dc, dr)))
			.collect::<Vec<_>>();
		self.clear_cells(&blast)
	}

	/// Clear the given cells in a single pass. Positions that are off the
	/// board, empty, or repeated are skipped.
	///
	/// # Arguments
	///
	/// * `positions` - The cells to clear.
	///
	/// # Returns
	///
	/// The cells that were removed.
	pub fn clear_cells(&mut self, positions: &[Position]) -> Vec<RemovedCell>
	{
		let mut seen = HashSet::new();
		let mut removed = Vec::new();
		for &position in positions
		{
			if !position.is_in_bounds() || !seen.insert(position)
			{
				continue
			}
			if let Some(tile) = self.cell_mut(position).take()
			{
				removed.push(RemovedCell {
					position,
					letter: tile.letter,
					tint: tile.tint
				});
			}
		}
		removed
	}

	/// Check whether no empty cell remains.
	#[inline]
	#[must_use]
	pub fn is_full(&self) -> bool
	{
		self.cells.iter().flatten().all(Option::is_some)
	}

	/// The number of occupied cells.
	#[inline]
	#[must_use]
	pub fn occupied_count(&self) -> usize
	{
		self.cells.iter().flatten().filter(|c| c.is_some()).count()
	}

	/// The letters on the board, as rows of columns.
	#[must_use]
	pub fn letters(&self) -> [[Option<char>; BOARD_COLS]; BOARD_ROWS]
	{
		self.cells.map(|row| row.map(|cell| cell.map(|tile| tile.letter)))
	}
}

/// The complete enumeration of placement failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementError
{
	/// The number of targets differs from the number of occupied cells.
	CountMismatch
	{
		/// The number of occupied cells of the piece.
		expected: usize,

		/// The number of targets supplied.
		actual: usize
	},

	/// The targets do not match the shape of the piece.
	FootprintMismatch,

	/// The cell is off the board.
	OutOfBounds(Position),

	/// The cell is already occupied.
	Occupied(Position)
}

impl Display for PlacementError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::CountMismatch { expected, actual } => write!(
				f,
				"invalid placement: expected {} cells, got {}",
				expected,
				actual
			),
			Self::FootprintMismatch =>
				write!(f, "invalid placement: cells do not match piece shape"),
			Self::OutOfBounds(p) =>
				write!(f, "invalid placement: {} is off the board", p),
			Self::Occupied(p) =>
				write!(f, "invalid placement: {} is occupied", p)
		}
	}
}

impl Error for PlacementError {}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

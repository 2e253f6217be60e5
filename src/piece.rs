//! # Pieces
//!
//! Herein is the geometry of placeable pieces. A [`Piece`] is a small
//! occupancy matrix of optional letters, together with the [`Shape`] it was
//! built from and its rotation state. Rotation is a single generic algorithm
//! (transpose and reverse) for every shape, and the reported [`ShapeTag`] is a
//! pure function of the base shape and the rotation state.

use std::{
	error::Error,
	fmt::{self, Display, Formatter}
};

use log::trace;
use rand::Rng;
use serde::Serialize;

////////////////////////////////////////////////////////////////////////////////
//                                 Constants.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The marker letter carried by a bomb piece. Never valid in any lexicon.
pub const BOMB_SYMBOL: char = '💣';

/// The marker letter carried by a wildcard piece. On the board, it stands in
/// for any letter when words are scanned. Never valid in any lexicon.
pub const WILDCARD_SYMBOL: char = '★';

/// The number of distinct cosmetic [tints](Tint).
pub const TINT_COUNT: u8 = 6;

/// Check whether the given character is one of the special-piece markers.
///
/// # Arguments
///
/// * `c` - The character to check.
///
/// # Returns
///
/// `true` if `c` is the bomb or the wildcard marker, `false` otherwise.
#[inline]
#[must_use]
pub fn is_marker(c: char) -> bool
{
	c == BOMB_SYMBOL || c == WILDCARD_SYMBOL
}

////////////////////////////////////////////////////////////////////////////////
//                                Definitions.                                //
////////////////////////////////////////////////////////////////////////////////

/// The session-unique identifier of a piece.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize
)]
pub struct PieceId(pub u32);

impl Display for PieceId
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		write!(f, "#{}", self.0)
	}
}

/// An opaque cosmetic tag. The engine never interprets it; it only carries it
/// from the piece onto the board and into removal events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Tint(pub u8);

/// The kind of a piece. Bombs and wildcards are always single-cell and never
/// rotate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind
{
	/// An ordinary lettered piece.
	Regular,

	/// Clears the 3×3 neighborhood of its target instead of placing a letter.
	Bomb,

	/// Places a cell that matches any letter during scanning.
	Wildcard
}

/// The base shape of a piece, independent of its rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Shape
{
	/// 1×1.
	Single,

	/// 1×2 domino.
	Line2,

	/// 1×3 straight tromino.
	Line3,

	/// The L-shaped tromino.
	Corner3,

	/// 1×4 straight tetromino.
	Line4,

	/// 2×2 square tetromino.
	Square
}

impl Shape
{
	/// The number of cells occupied by the shape.
	#[inline]
	#[must_use]
	pub const fn size(self) -> usize
	{
		match self
		{
			Shape::Single => 1,
			Shape::Line2 => 2,
			Shape::Line3 | Shape::Corner3 => 3,
			Shape::Line4 | Shape::Square => 4
		}
	}

	/// Check whether rotating the shape changes anything at all.
	#[inline]
	#[must_use]
	pub const fn is_rotatable(self) -> bool
	{
		!matches!(self, Shape::Single)
	}

	/// The occupancy template of the shape in its unrotated state, as rows of
	/// columns.
	fn template(self) -> Vec<Vec<bool>>
	{
		match self
		{
			Shape::Single => vec![vec![true]],
			Shape::Line2 => vec![vec![true; 2]],
			Shape::Line3 => vec![vec![true; 3]],
			Shape::Corner3 => vec![vec![true, false], vec![true, true]],
			Shape::Line4 => vec![vec![true; 4]],
			Shape::Square => vec![vec![true; 2]; 2]
		}
	}

	/// Get the [tag](ShapeTag) that a piece of this shape reports in the given
	/// rotation state.
	///
	/// # Arguments
	///
	/// * `rotation` - The rotation state, in quarter turns clockwise.
	///
	/// # Returns
	///
	/// The shape tag.
	#[must_use]
	pub fn tag(self, rotation: u8) -> ShapeTag
	{
		let orientation = match self
		{
			Shape::Single | Shape::Square => Orientation::Fixed,
			Shape::Line2 | Shape::Line3 | Shape::Line4 =>
				if rotation % 2 == 0 { Orientation::Horizontal }
				else { Orientation::Vertical },
			Shape::Corner3 => Orientation::Quarter(rotation % 4)
		};
		ShapeTag { shape: self, orientation }
	}

	/// Choose a random shape and initial rotation for a piece of the given
	/// size. Size 1 is always [single](Shape::Single), size 2 is a domino that
	/// is horizontal or vertical with equal probability, and sizes 3 and 4
	/// favor the straight shapes over the cornered and square ones.
	///
	/// # Arguments
	///
	/// * `size` - The number of cells, clamped to `1..=4`.
	/// * `rng` - The source of randomness.
	///
	/// # Returns
	///
	/// A 2-tuple comprising the shape and its initial rotation state.
	pub fn random_for_size<R: Rng + ?Sized>(size: usize, rng: &mut R) -> (Shape, u8)
	{
		// Straight shapes carry twice the weight of their siblings.
		let straight = rng.random_range(0..3) < 2;
		match size
		{
			0 | 1 => (Shape::Single, 0),
			2 => (Shape::Line2, rng.random_range(0..2)),
			3 if straight => (Shape::Line3, rng.random_range(0..2)),
			3 => (Shape::Corner3, rng.random_range(0..4)),
			_ if straight => (Shape::Line4, rng.random_range(0..2)),
			_ => (Shape::Square, 0)
		}
	}
}

/// The orientation component of a [`ShapeTag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation
{
	/// The shape looks the same in every rotation state.
	Fixed,

	/// A straight shape lying along a row.
	Horizontal,

	/// A straight shape lying along a column.
	Vertical,

	/// A cornered shape, turned the given number of quarter turns clockwise.
	Quarter(u8)
}

/// The shape identity that a piece reports to the outside world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ShapeTag
{
	/// The base shape.
	pub shape: Shape,

	/// The orientation of the base shape.
	pub orientation: Orientation
}

impl Display for ShapeTag
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		let base = match self.shape
		{
			Shape::Single => "single",
			Shape::Line2 => "line2",
			Shape::Line3 => "line3",
			Shape::Corner3 => "corner3",
			Shape::Line4 => "line4",
			Shape::Square => "square"
		};
		match self.orientation
		{
			Orientation::Fixed => write!(f, "{}", base),
			Orientation::Horizontal => write!(f, "{}-horizontal", base),
			Orientation::Vertical => write!(f, "{}-vertical", base),
			Orientation::Quarter(q) => write!(f, "{}-q{}", base, q)
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                  Pieces.                                   //
////////////////////////////////////////////////////////////////////////////////

/// A placeable piece: an occupancy matrix of optional letters. The number of
/// occupied cells always equals the number of letters, because every occupied
/// cell holds exactly one letter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Piece
{
	/// The identifier of the piece.
	id: PieceId,

	/// The base shape.
	shape: Shape,

	/// The rotation state, in quarter turns clockwise (`0..4`).
	rotation: u8,

	/// What the piece does when placed.
	kind: PieceKind,

	/// The cosmetic tag.
	tint: Tint,

	/// The occupancy matrix, as rows of columns.
	cells: Vec<Vec<Option<char>>>
}

impl Piece
{
	/// Construct a regular piece. The shape's template is turned into the
	/// requested rotation state, and then the letters are assigned to the
	/// occupied cells in row-major order.
	///
	/// # Arguments
	///
	/// * `id` - The identifier of the piece.
	/// * `shape` - The base shape.
	/// * `rotation` - The rotation state, in quarter turns clockwise.
	/// * `letters` - One letter per occupied cell.
	/// * `tint` - The cosmetic tag.
	///
	/// # Returns
	///
	/// The new piece.
	///
	/// # Errors
	///
	/// [`PieceError::Malformed`] if the number of letters differs from the
	/// number of cells occupied by the shape.
	pub fn new(
		id: PieceId,
		shape: Shape,
		rotation: u8,
		letters: &[char],
		tint: Tint
	) -> Result<Self, PieceError>
	{
		if letters.len() != shape.size()
		{
			return Err(PieceError::Malformed {
				occupied: shape.size(),
				letters: letters.len()
			})
		}
		let rotation = if shape.is_rotatable() { rotation % 4 } else { 0 };
		let mut template = shape.template();
		for _ in 0..rotation
		{
			template = rotate_matrix(&template);
		}
		let mut letters = letters.iter().copied();
		let cells = template.into_iter()
			.map(|row| {
				row.into_iter()
					.map(|occupied| if occupied { letters.next() } else { None })
					.collect()
			})
			.collect();
		Ok(Self { id, shape, rotation, kind: PieceKind::Regular, tint, cells })
	}

	/// Construct a regular single-cell piece. Unlike [`new`](Self::new), this
	/// cannot fail.
	#[inline]
	pub fn single(id: PieceId, letter: char, tint: Tint) -> Self
	{
		Self {
			id,
			shape: Shape::Single,
			rotation: 0,
			kind: PieceKind::Regular,
			tint,
			cells: vec![vec![Some(letter)]]
		}
	}

	/// Construct a bomb piece.
	#[inline]
	pub fn bomb(id: PieceId, tint: Tint) -> Self
	{
		Self::special(id, PieceKind::Bomb, BOMB_SYMBOL, tint)
	}

	/// Construct a wildcard piece.
	#[inline]
	pub fn wildcard(id: PieceId, tint: Tint) -> Self
	{
		Self::special(id, PieceKind::Wildcard, WILDCARD_SYMBOL, tint)
	}

	/// Construct a single-cell special piece carrying the given marker.
	fn special(id: PieceId, kind: PieceKind, marker: char, tint: Tint) -> Self
	{
		Self {
			id,
			shape: Shape::Single,
			rotation: 0,
			kind,
			tint,
			cells: vec![vec![Some(marker)]]
		}
	}

	/// The identifier of the piece.
	#[inline]
	#[must_use]
	pub fn id(&self) -> PieceId { self.id }

	/// The base shape.
	#[inline]
	#[must_use]
	pub fn shape(&self) -> Shape { self.shape }

	/// The rotation state, in quarter turns clockwise.
	#[inline]
	#[must_use]
	pub fn rotation(&self) -> u8 { self.rotation }

	/// What the piece does when placed.
	#[inline]
	#[must_use]
	pub fn kind(&self) -> PieceKind { self.kind }

	/// The cosmetic tag.
	#[inline]
	#[must_use]
	pub fn tint(&self) -> Tint { self.tint }

	/// Check whether the piece is a bomb.
	#[inline]
	#[must_use]
	pub fn is_bomb(&self) -> bool { self.kind == PieceKind::Bomb }

	/// Check whether the piece is a wildcard.
	#[inline]
	#[must_use]
	pub fn is_wildcard(&self) -> bool { self.kind == PieceKind::Wildcard }

	/// The width of the occupancy matrix, in columns.
	#[inline]
	#[must_use]
	pub fn width(&self) -> usize
	{
		self.cells.first().map_or(0, Vec::len)
	}

	/// The height of the occupancy matrix, in rows.
	#[inline]
	#[must_use]
	pub fn height(&self) -> usize { self.cells.len() }

	/// The occupancy matrix, as rows of columns.
	#[inline]
	#[must_use]
	pub fn rows(&self) -> &[Vec<Option<char>>] { &self.cells }

	/// The tag this piece reports, derived from its shape and rotation.
	#[inline]
	#[must_use]
	pub fn shape_tag(&self) -> ShapeTag
	{
		self.shape.tag(self.rotation)
	}

	/// Answer a copy of the piece turned 90° clockwise. Single-cell pieces,
	/// which includes every bomb and wildcard, are returned unchanged.
	///
	/// # Returns
	///
	/// The rotated piece.
	pub fn rotate(&self) -> Self
	{
		if self.kind != PieceKind::Regular || !self.shape.is_rotatable()
		{
			return self.clone()
		}
		let rotated = Self {
			rotation: (self.rotation + 1) % 4,
			cells: rotate_matrix(&self.cells),
			..self.clone()
		};
		trace!(
			"rotated {}: {} => {}",
			self.id,
			self.shape_tag(),
			rotated.shape_tag()
		);
		rotated
	}

	/// Get the offsets of the occupied cells, as `(column, row)` pairs in
	/// row-major order. The first offset is the placement anchor.
	///
	/// # Returns
	///
	/// The occupied offsets.
	#[must_use]
	pub fn relative_cells(&self) -> Vec<(usize, usize)>
	{
		self.cells.iter().enumerate()
			.flat_map(|(row, columns)| {
				columns.iter().enumerate()
					.filter(|(_, cell)| cell.is_some())
					.map(move |(col, _)| (col, row))
			})
			.collect()
	}

	/// Get the letter at the given offset.
	///
	/// # Arguments
	///
	/// * `col` - The column offset.
	/// * `row` - The row offset.
	///
	/// # Returns
	///
	/// The letter, or `None` if the offset is out of range or unoccupied.
	#[inline]
	#[must_use]
	pub fn letter_at(&self, col: usize, row: usize) -> Option<char>
	{
		self.cells.get(row).and_then(|columns| columns.get(col)).copied().flatten()
	}

	/// Get the letters of the occupied cells in row-major order, i.e., in the
	/// same order as [`relative_cells`](Self::relative_cells).
	#[must_use]
	pub fn letters(&self) -> Vec<char>
	{
		self.cells.iter().flatten().flatten().copied().collect()
	}

	/// The number of occupied cells.
	#[inline]
	#[must_use]
	pub fn cell_count(&self) -> usize
	{
		self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
	}
}

/// Rotate a matrix 90° clockwise: the transpose with each row reversed.
fn rotate_matrix<T: Copy>(matrix: &[Vec<T>]) -> Vec<Vec<T>>
{
	let height = matrix.len();
	let width = matrix.first().map_or(0, Vec::len);
	(0..width)
		.map(|col| (0..height).rev().map(|row| matrix[row][col]).collect())
		.collect()
}

/// The complete enumeration of [`Piece`] construction errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceError
{
	/// The number of letters does not match the number of occupied cells.
	Malformed
	{
		/// The number of cells occupied by the shape.
		occupied: usize,

		/// The number of letters supplied.
		letters: usize
	}
}

impl Display for PieceError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::Malformed { occupied, letters } => write!(
				f,
				"malformed piece: {} occupied cells but {} letters",
				occupied,
				letters
			)
		}
	}
}

impl Error for PieceError {}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use rand::{rngs::StdRng, SeedableRng};

	use crate::piece::{
		Orientation, Piece, PieceError, PieceId, PieceKind, Shape, Tint,
		BOMB_SYMBOL, WILDCARD_SYMBOL
	};

	/// Build a regular piece with letters `a`, `b`, … for the given shape.
	fn piece(shape: Shape, rotation: u8) -> Piece
	{
		let letters = ('a'..).take(shape.size()).collect::<Vec<_>>();
		Piece::new(PieceId(1), shape, rotation, &letters, Tint(0)).unwrap()
	}

	/// Ensure that four quarter turns bring every shape back to where it
	/// started, in every rotation state.
	#[test]
	fn test_rotation_has_order_four()
	{
		let shapes = [
			Shape::Single,
			Shape::Line2,
			Shape::Line3,
			Shape::Corner3,
			Shape::Line4,
			Shape::Square
		];
		for shape in shapes
		{
			for rotation in 0..4
			{
				let original = piece(shape, rotation);
				let turned = original.rotate().rotate().rotate().rotate();
				assert_eq!(turned, original, "{:?} @ {}", shape, rotation);
			}
		}
	}

	/// Ensure that single-cell pieces, bombs and wildcards never rotate.
	#[test]
	fn test_rotate_single_and_specials()
	{
		let single = piece(Shape::Single, 0);
		assert_eq!(single.rotate(), single);
		let bomb = Piece::bomb(PieceId(2), Tint(1));
		assert_eq!(bomb.rotate(), bomb);
		assert!(bomb.is_bomb());
		assert_eq!(bomb.letters(), vec![BOMB_SYMBOL]);
		let wildcard = Piece::wildcard(PieceId(3), Tint(1));
		assert_eq!(wildcard.rotate(), wildcard);
		assert!(wildcard.is_wildcard());
		assert_eq!(wildcard.kind(), PieceKind::Wildcard);
		assert_eq!(wildcard.letters(), vec![WILDCARD_SYMBOL]);
	}

	/// Ensure that straight pieces flip between their horizontal and vertical
	/// variants, and that the letters follow the clockwise turn.
	#[test]
	fn test_rotate_line()
	{
		let line = piece(Shape::Line3, 0);
		assert_eq!(line.shape_tag().orientation, Orientation::Horizontal);
		assert_eq!((line.width(), line.height()), (3, 1));
		assert_eq!(line.letters(), vec!['a', 'b', 'c']);

		let line = line.rotate();
		assert_eq!(line.rotation(), 1);
		assert_eq!(line.shape_tag().orientation, Orientation::Vertical);
		assert_eq!((line.width(), line.height()), (1, 3));
		assert_eq!(line.relative_cells(), vec![(0, 0), (0, 1), (0, 2)]);
		assert_eq!(line.letters(), vec!['a', 'b', 'c']);

		let line = line.rotate();
		assert_eq!(line.shape_tag().orientation, Orientation::Horizontal);
		assert_eq!(line.letters(), vec!['c', 'b', 'a']);
		assert_eq!(line.shape_tag().to_string(), "line3-horizontal");
	}

	/// Ensure that the corner tromino reports its quarter turn and occupies the
	/// expected cells in every rotation state.
	#[test]
	fn test_rotate_corner()
	{
		let corner = piece(Shape::Corner3, 0);
		assert_eq!(corner.relative_cells(), vec![(0, 0), (0, 1), (1, 1)]);
		let corner = corner.rotate();
		assert_eq!(corner.shape_tag().orientation, Orientation::Quarter(1));
		assert_eq!(corner.relative_cells(), vec![(0, 0), (1, 0), (0, 1)]);
		let corner = corner.rotate();
		assert_eq!(corner.relative_cells(), vec![(0, 0), (1, 0), (1, 1)]);
		let corner = corner.rotate();
		assert_eq!(corner.relative_cells(), vec![(1, 0), (0, 1), (1, 1)]);
		assert_eq!(corner.shape_tag().to_string(), "corner3-q3");
		// Constructing directly in a rotation state agrees with turning.
		assert_eq!(piece(Shape::Corner3, 3).relative_cells(), corner.relative_cells());
	}

	/// Ensure that letter lookup is bounds-checked.
	#[test]
	fn test_letter_at()
	{
		let corner = piece(Shape::Corner3, 0);
		assert_eq!(corner.letter_at(0, 0), Some('a'));
		assert_eq!(corner.letter_at(1, 0), None);
		assert_eq!(corner.letter_at(0, 1), Some('b'));
		assert_eq!(corner.letter_at(1, 1), Some('c'));
		assert_eq!(corner.letter_at(2, 0), None);
		assert_eq!(corner.letter_at(0, 7), None);
		assert_eq!(corner.cell_count(), 3);
	}

	/// Ensure that a letter count mismatch is rejected.
	#[test]
	fn test_malformed()
	{
		assert_eq!(
			Piece::new(PieceId(1), Shape::Square, 0, &['a'], Tint(0)),
			Err(PieceError::Malformed { occupied: 4, letters: 1 })
		);
	}

	/// Ensure that random shapes always have the requested size, and that the
	/// straight shapes are favored.
	#[test]
	fn test_random_for_size()
	{
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(Shape::random_for_size(1, &mut rng), (Shape::Single, 0));
		let mut straight = 0;
		for _ in 0..600
		{
			for size in 2..=4
			{
				let (shape, rotation) = Shape::random_for_size(size, &mut rng);
				assert_eq!(shape.size(), size);
				assert!(rotation < 4);
				if matches!(shape, Shape::Line3 | Shape::Line4)
				{
					straight += 1;
				}
			}
		}
		// 1200 draws at sizes 3 and 4, two thirds of which should be straight.
		assert!(straight > 700, "straight shapes: {}", straight);
	}
}

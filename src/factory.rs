//! # Piece factory
//!
//! Herein is the construction of new pieces: random lettered pieces, whose
//! letters come from the [`WordCurator`], and the special bomb and wildcard
//! pieces. The [`Cadence`] counters that decide when a special piece replaces
//! a regular one belong to the game, not to the factory.

use log::{debug, warn};
use rand::Rng;
use serde::Serialize;

use crate::{
	curator::WordCurator,
	piece::{Piece, PieceId, Shape, Tint, TINT_COUNT}
};

////////////////////////////////////////////////////////////////////////////////
//                                  Cadence.                                  //
////////////////////////////////////////////////////////////////////////////////

/// The counters that drive special-piece issuance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Cadence
{
	/// The number of word-clearing passes since the last bomb was consumed.
	pub clear_streak: u32,

	/// Whether a bomb is live in the tray. At most one bomb is ever armed.
	pub bomb_armed: bool,

	/// The number of pieces generated since the last wildcard.
	pub since_wildcard: u32
}

////////////////////////////////////////////////////////////////////////////////
//                                  Factory.                                  //
////////////////////////////////////////////////////////////////////////////////

/// The factory of pieces. It hands out session-unique identifiers.
#[derive(Clone, Debug)]
#[must_use]
pub struct PieceFactory
{
	/// The identifier of the next piece.
	next_id: u32,

	/// The relative weights of the piece sizes 1 through 4.
	size_weights: [u32; 4],

	/// A bomb is issued once the clear streak reaches this. `0` disables
	/// bombs.
	bomb_every: u32,

	/// A wildcard is issued once this many pieces have been generated since
	/// the last one. `0` disables wildcards.
	wildcard_every: u32
}

impl PieceFactory
{
	/// Construct a factory.
	///
	/// # Arguments
	///
	/// * `size_weights` - The relative weights of the piece sizes 1 through 4.
	///   If every weight is zero, sizes are drawn uniformly.
	/// * `bomb_every` - The clear streak that triggers a bomb; `0` disables
	///   bombs.
	/// * `wildcard_every` - The number of generated pieces per wildcard; `0`
	///   disables wildcards.
	///
	/// # Returns
	///
	/// The new factory.
	pub fn new(size_weights: [u32; 4], bomb_every: u32, wildcard_every: u32) -> Self
	{
		Self { next_id: 1, size_weights, bomb_every, wildcard_every }
	}

	/// Allocate the next piece identifier.
	#[inline]
	fn allocate_id(&mut self) -> PieceId
	{
		let id = PieceId(self.next_id);
		self.next_id += 1;
		id
	}

	/// Draw a random tint.
	#[inline]
	fn random_tint<R: Rng + ?Sized>(rng: &mut R) -> Tint
	{
		Tint(rng.random_range(0..TINT_COUNT))
	}

	/// Draw a piece size according to the configured weights.
	fn random_size<R: Rng + ?Sized>(&self, rng: &mut R) -> usize
	{
		let total = self.size_weights.iter().sum::<u32>();
		if total == 0
		{
			return rng.random_range(1..=4)
		}
		let mut pick = rng.random_range(0..total);
		for (index, &weight) in self.size_weights.iter().enumerate()
		{
			if pick < weight
			{
				return index + 1
			}
			pick -= weight;
		}
		self.size_weights.len()
	}

	/// Generate the next piece for the tray, honoring the special-piece
	/// cadence. A bomb is issued when none is armed and the clear streak has
	/// reached its threshold; otherwise a wildcard is issued when enough pieces
	/// have been generated since the last one; otherwise a random lettered
	/// piece is issued.
	///
	/// # Arguments
	///
	/// * `cadence` - The special-piece counters, updated in place.
	/// * `curator` - The source of letters.
	/// * `rng` - The source of randomness.
	///
	/// # Returns
	///
	/// The new piece.
	pub fn next_piece<R: Rng + ?Sized>(
		&mut self,
		cadence: &mut Cadence,
		curator: &mut WordCurator,
		rng: &mut R
	) -> Piece
	{
		cadence.since_wildcard += 1;
		if self.bomb_every > 0
			&& !cadence.bomb_armed
			&& cadence.clear_streak >= self.bomb_every
		{
			cadence.bomb_armed = true;
			let piece = self.create_bomb_piece(rng);
			debug!("armed bomb {} at clear streak {}", piece.id(), cadence.clear_streak);
			return piece
		}
		if self.wildcard_every > 0 && cadence.since_wildcard >= self.wildcard_every
		{
			cadence.since_wildcard = 0;
			let piece = self.create_wildcard_piece(rng);
			debug!("issued wildcard {}", piece.id());
			return piece
		}
		self.create_random_piece(curator, rng)
	}

	/// Create a random lettered piece: a weighted size, a shape and rotation
	/// for that size, a tint, and one curated letter per occupied cell.
	///
	/// # Arguments
	///
	/// * `curator` - The source of letters.
	/// * `rng` - The source of randomness.
	///
	/// # Returns
	///
	/// The new piece.
	pub fn create_random_piece<R: Rng + ?Sized>(
		&mut self,
		curator: &mut WordCurator,
		rng: &mut R
	) -> Piece
	{
		let id = self.allocate_id();
		let size = self.random_size(rng);
		let (shape, rotation) = Shape::random_for_size(size, rng);
		let tint = Self::random_tint(rng);
		let letters = (0..shape.size())
			.map(|_| curator.sample_letter(rng))
			.collect::<Vec<_>>();
		match Piece::new(id, shape, rotation, &letters, tint)
		{
			Ok(piece) => piece,
			Err(e) =>
			{
				debug_assert!(false, "{}", e);
				warn!("{}; clamping {} to a single cell", e, id);
				let letter = match letters.first()
				{
					Some(&letter) => letter,
					None => curator.sample_letter(rng)
				};
				Piece::single(id, letter, tint)
			}
		}
	}

	/// Create a bomb piece.
	pub fn create_bomb_piece<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Piece
	{
		let id = self.allocate_id();
		Piece::bomb(id, Self::random_tint(rng))
	}

	/// Create a wildcard piece.
	pub fn create_wildcard_piece<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Piece
	{
		let id = self.allocate_id();
		Piece::wildcard(id, Self::random_tint(rng))
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

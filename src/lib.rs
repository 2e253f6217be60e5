//! # Word Tiles
//!
//! The game engine behind Word Tiles, a puzzle that combines polyomino
//! placement with word formation on a 10×10 board.
//!
//! * [`piece`] describes the lettered polyominoes and the special pieces.
//! * [`board`] owns the grid: placement, word scanning, and clearing.
//! * [`lexicon`] validates words against lazily loaded dictionary buckets.
//! * [`curator`] keeps the rotating set of target words that seeds letters.
//! * [`factory`] generates pieces, including the bomb and wildcard cadence.
//! * [`matcher`] finds words on the board, scores them, and clears them.
//! * [`game`] ties everything together as a state machine with an event log.

pub mod board;
pub mod curator;
pub mod factory;
pub mod game;
pub mod lexicon;
pub mod matcher;
pub mod piece;

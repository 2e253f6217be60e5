//! # Application
//!
//! The application state and logic of the terminal front end: a cursor over
//! the board, a selected tray piece, and a status panel. All game rules live
//! in the [`Game`]; the application merely translates key presses into game
//! operations and renders snapshots.

use std::{io, time::Duration};

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
	buffer::Buffer,
	layout::{Constraint, Direction, Layout, Rect},
	style::{Color, Style, Stylize},
	text::{Line, Span},
	widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
	Frame
};
use word_tiles::{
	board::{Position, BOARD_COLS, BOARD_ROWS},
	game::{Game, GameEvent, GameSnapshot, GameStatus},
	piece::{Piece, PieceKind, Tint}
};

use crate::tui::Tui;

/// The colors of the cosmetic tints.
const TINT_COLORS: [Color; 6] = [
	Color::Red,
	Color::Green,
	Color::Yellow,
	Color::Blue,
	Color::Magenta,
	Color::Cyan
];

/// How many messages the log panel keeps.
const MESSAGE_CAP: usize = 6;

////////////////////////////////////////////////////////////////////////////////
//                                Application.                                //
////////////////////////////////////////////////////////////////////////////////

/// The application state.
#[must_use]
pub struct App
{
	/// Whether the application is running.
	state: ExecutionState,

	/// The game session.
	game: Game,

	/// The coordinates of the cursor. The first element is X, which
	/// corresponds to the column, and the second element is Y, which
	/// corresponds to the row. The origin is the top-left corner.
	cursor: (u8, u8),

	/// The tray index of the selected piece.
	selected: usize,

	/// Recent messages, newest last.
	messages: Vec<String>
}

// Public interface.
impl App
{
	/// Create a new application state, starting the given game.
	///
	/// # Arguments
	///
	/// * `game` - The game session, in any state.
	///
	/// # Returns
	///
	/// The new application state.
	pub fn new(mut game: Game) -> Self
	{
		game.start();
		let mut app = Self {
			state: ExecutionState::Running,
			game,
			cursor: (BOARD_COLS as u8 / 2, BOARD_ROWS as u8 / 2),
			selected: 0,
			messages: Vec::new()
		};
		app.absorb_events();
		app
	}

	/// Run the application until the user exits: render the frame, then
	/// process events.
	///
	/// # Arguments
	///
	/// * `tui` - The text-based user interface (TUI).
	///
	/// # Returns
	///
	/// The final score.
	///
	/// # Errors
	///
	/// Any error that occurs while running the application.
	pub fn run(mut self, tui: &mut Tui) -> io::Result<u32>
	{
		while self.is_running()
		{
			tui.draw(|frame| self.render_frame(frame))?;
			self.process_event()?;
		}
		Ok(self.game.score())
	}

	/// Check if the application is running.
	#[inline]
	#[must_use]
	pub fn is_running(&self) -> bool
	{
		matches!(self.state, ExecutionState::Running)
	}
}

// Private implementation details.
impl App
{
	/// Move the cursor by the given deltas, saturating at the edges of the
	/// board.
	///
	/// # Arguments
	///
	/// * `dx` - The change in the X-coordinate.
	/// * `dy` - The change in the Y-coordinate.
	fn move_cursor(&mut self, dx: i8, dy: i8)
	{
		let x = self.cursor.0 as i8 + dx;
		let y = self.cursor.1 as i8 + dy;
		if (0..BOARD_COLS as i8).contains(&x) && (0..BOARD_ROWS as i8).contains(&y)
		{
			self.cursor = (x as u8, y as u8);
		}
	}

	/// Select the tray piece at the given index, if there is one.
	fn select(&mut self, index: usize)
	{
		if index < self.game.tray().len()
		{
			self.selected = index;
		}
	}

	/// The selected piece, if any.
	fn selected_piece(&self) -> Option<&Piece>
	{
		self.game.tray().get(self.selected)
	}

	/// Compute the cells that the given piece would cover if anchored at the
	/// cursor: its first occupied cell lands on the cursor.
	fn targets(&self, piece: &Piece) -> Vec<Position>
	{
		let offsets = piece.relative_cells();
		let (first_col, first_row) = offsets.first().copied().unwrap_or((0, 0));
		let cursor = Position::new(self.cursor.0 as i16, self.cursor.1 as i16);
		offsets.iter()
			.map(|&(col, row)| {
				cursor.offset(
					col as i16 - first_col as i16,
					row as i16 - first_row as i16
				)
			})
			.collect()
	}

	/// Rotate the selected piece.
	fn rotate(&mut self)
	{
		if let Some(id) = self.selected_piece().map(Piece::id)
		{
			if let Err(e) = self.game.rotate_piece(id)
			{
				self.say(e.to_string());
			}
		}
	}

	/// Place the selected piece at the cursor.
	fn place(&mut self)
	{
		let Some(piece) = self.selected_piece() else { return };
		let id = piece.id();
		let targets = self.targets(piece);
		match self.game.place_piece(id, &targets)
		{
			Ok(_) => self.absorb_events(),
			Err(e) => self.say(e.to_string())
		}
		self.selected = self.selected.min(self.game.tray().len().saturating_sub(1));
	}

	/// Toggle between playing and paused.
	fn toggle_pause(&mut self)
	{
		match self.game.status()
		{
			GameStatus::Playing => self.game.pause(),
			GameStatus::Paused => self.game.resume(),
			_ => {}
		}
		self.absorb_events();
	}

	/// Begin a new game.
	fn restart(&mut self)
	{
		self.game.restart();
		self.selected = 0;
		self.messages.clear();
		self.absorb_events();
	}

	/// Append a message to the log panel.
	fn say(&mut self, message: String)
	{
		self.messages.push(message);
		if self.messages.len() > MESSAGE_CAP
		{
			self.messages.remove(0);
		}
	}

	/// Turn the pending game events into messages.
	fn absorb_events(&mut self)
	{
		for event in self.game.drain_events()
		{
			let message = match event
			{
				GameEvent::PiecePlaced { .. } => continue,
				GameEvent::BombExploded { removed, .. } =>
					format!("💣 cleared {} cells", removed.len()),
				GameEvent::WordsCleared { words, points, .. } =>
					format!("{} +{}", words.join(", "), points),
				GameEvent::LevelChanged { to, .. } => format!("level {}", to),
				GameEvent::StatusChanged { to: GameStatus::GameOver, .. } =>
					"game over – press n to restart".to_string(),
				GameEvent::StatusChanged { to, .. } => to.to_string()
			};
			self.say(message);
		}
	}

	/// Render the application frame.
	///
	/// # Arguments
	///
	/// * `frame` - The target frame.
	fn render_frame(&self, frame: &mut Frame)
	{
		frame.render_widget(self, frame.area());
	}

	/// Render the board, with the cursor and the prospective footprint of the
	/// selected piece.
	fn render_board(&self, area: Rect, buf: &mut Buffer, snapshot: &GameSnapshot)
	{
		let footprint = self.selected_piece()
			.map(|piece| (self.targets(piece), self.fits(piece)))
			.unwrap_or_default();
		let board = self.game.board();
		let lines = (0..BOARD_ROWS)
			.map(|row| {
				let spans = (0..BOARD_COLS)
					.map(|col| {
						let position = Position::new(col as i16, row as i16);
						let tile = board.get(position).flatten();
						let text = match snapshot.board[row][col]
						{
							Some(c) => cell_text(c),
							None => "··".to_string()
						};
						let mut style = match tile
						{
							Some(tile) => Style::default().fg(tint_color(tile.tint)),
							None => Style::default().fg(Color::DarkGray)
						};
						if footprint.0.contains(&position)
						{
							style = style.bg(if footprint.1 { Color::Green } else { Color::Red });
						}
						if (col as u8, row as u8) == self.cursor
						{
							style = style.fg(Color::Black).bg(Color::Cyan);
						}
						Span::styled(text, style)
					})
					.collect::<Vec<_>>();
				Line::from(spans)
			})
			.collect::<Vec<_>>();
		let block = Block::default()
			.borders(Borders::ALL)
			.border_type(BorderType::Rounded)
			.title_top(Line::from("Board").centered())
			.title_top(Line::from("⎋ – exit".yellow().bold()).left_aligned())
			.title_bottom(
				Line::from("←↑↓→ move  1-5 select  r rotate  ↵ place  p pause  n new".cyan())
					.centered()
			);
		Paragraph::new(lines).block(block).render(area, buf);
	}

	/// Check whether the given piece fits at the cursor.
	fn fits(&self, piece: &Piece) -> bool
	{
		let targets = self.targets(piece);
		match piece.kind()
		{
			PieceKind::Bomb => targets.iter().all(|p| p.is_in_bounds()),
			_ => self.game.board().is_valid_placement(piece, &targets)
		}
	}

	/// Render the tray: a preview of every piece, the selected one
	/// highlighted.
	fn render_tray(&self, area: Rect, buf: &mut Buffer, snapshot: &GameSnapshot)
	{
		let mut lines = Vec::new();
		for (index, view) in snapshot.tray.iter().enumerate()
		{
			let header_style =
				if index == self.selected
				{
					Style::default().fg(Color::Black).bg(Color::Cyan)
				}
				else
				{
					Style::default().fg(Color::White)
				};
			lines.push(Line::from(Span::styled(
				format!("{} {}", index + 1, view.shape),
				header_style
			)));
			for row in &view.rows
			{
				let text = row.iter()
					.map(|cell| cell.map_or("  ".to_string(), cell_text))
					.collect::<String>();
				lines.push(Line::from(Span::styled(
					format!("  {}", text),
					Style::default().fg(tint_color(view.tint))
				)));
			}
		}
		let block = Block::default()
			.borders(Borders::ALL)
			.title_top(Line::from("Tray").centered());
		Paragraph::new(lines).block(block).render(area, buf);
	}

	/// Render the status panel: score, level, streak, status, the curated
	/// words, and the recent messages.
	fn render_status(&self, area: Rect, buf: &mut Buffer, snapshot: &GameSnapshot)
	{
		let status_color = match snapshot.status
		{
			GameStatus::Playing => Color::Green,
			GameStatus::Paused => Color::Yellow,
			GameStatus::GameOver => Color::Red,
			GameStatus::Loading => Color::DarkGray
		};
		let mut lines = vec![
			Line::from(vec!["Score  ".into(), snapshot.score.to_string().bold()]),
			Line::from(vec!["Level  ".into(), snapshot.level.to_string().bold()]),
			Line::from(vec![
				"Streak ".into(),
				snapshot.clear_streak.to_string().bold(),
				if snapshot.bomb_armed { "  💣".into() } else { "".into() }
			]),
			Line::from(Span::styled(
				snapshot.status.to_string(),
				Style::default().fg(status_color).bold()
			)),
			Line::from(""),
			Line::from("Words".underlined()),
			Line::from(snapshot.active_words.join(" ")),
			Line::from(""),
		];
		lines.extend(
			self.messages.iter().map(|m| Line::from(m.as_str().italic()))
		);
		let block = Block::default()
			.borders(Borders::ALL)
			.title_top(Line::from("Status").centered());
		Paragraph::new(lines)
			.block(block)
			.wrap(Wrap { trim: true })
			.render(area, buf);
	}

	/// Process events. Block for only half a millisecond, so as not to stall
	/// rendering.
	///
	/// # Errors
	///
	/// Any error that occurs while processing events.
	fn process_event(&mut self) -> io::Result<()>
	{
		if poll(Duration::from_micros(500))?
		{
			match read()?
			{
				Event::Key(event) if event.kind == KeyEventKind::Press =>
					self.process_key_event(event),
				_ => {}
			}
		}
		Ok(())
	}

	/// Process a key event:
	///
	/// * Escape - Exit the application.
	/// * Up, Down, Left, Right - Move the cursor.
	/// * 1-5 - Select a tray piece.
	/// * r - Rotate the selected piece.
	/// * Enter - Place the selected piece at the cursor.
	/// * p - Pause or resume.
	/// * n - Start a new game.
	///
	/// # Arguments
	///
	/// * `event` - The key event to process.
	fn process_key_event(&mut self, event: KeyEvent)
	{
		match event.code
		{
			KeyCode::Esc => self.exit(),
			KeyCode::Up => self.move_cursor(0, -1),
			KeyCode::Down => self.move_cursor(0, 1),
			KeyCode::Left => self.move_cursor(-1, 0),
			KeyCode::Right => self.move_cursor(1, 0),
			KeyCode::Char(c @ '1'..='5') => self.select(c as usize - '1' as usize),
			KeyCode::Char('r') => self.rotate(),
			KeyCode::Enter => self.place(),
			KeyCode::Char('p') => self.toggle_pause(),
			KeyCode::Char('n') => self.restart(),
			_ => {}
		}
	}

	/// Mark the application for exit. The application will exit after the next
	/// iteration of the main loop.
	fn exit(&mut self)
	{
		self.state = ExecutionState::Exiting;
	}
}

impl Widget for &App
{
	fn render(self, area: Rect, buf: &mut Buffer)
	{
		if !self.is_running()
		{
			return
		}
		let snapshot = self.game.snapshot();
		// The board is 10 cells of 2 columns each, plus borders.
		let outer = Layout::default()
			.direction(Direction::Horizontal)
			.margin(1)
			.constraints([
				Constraint::Length(BOARD_COLS as u16 * 2 + 2),
				Constraint::Length(16),
				Constraint::Min(24)
			])
			.split(area);
		let left = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(BOARD_ROWS as u16 + 2),
				Constraint::Min(0)
			])
			.split(outer[0]);
		self.render_board(left[0], buf, &snapshot);
		self.render_tray(outer[1], buf, &snapshot);
		self.render_status(outer[2], buf, &snapshot);
	}
}

/// Render a letter as two terminal columns. Hangul syllables and emoji are
/// already double-width.
fn cell_text(c: char) -> String
{
	if c.is_ascii() { format!("{} ", c) } else { c.to_string() }
}

/// The color of a cosmetic tint.
#[inline]
fn tint_color(tint: Tint) -> Color
{
	TINT_COLORS[tint.0 as usize % TINT_COLORS.len()]
}

/// The execution state of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExecutionState
{
	/// The application is accepting input.
	Running,

	/// The application is exiting.
	Exiting
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use word_tiles::{
		game::GameConfig,
		lexicon::{Lexicon, NullLoader}
	};

	use super::*;

	/// Build an application around a deterministic game in which no word is
	/// ever valid.
	fn app() -> App
	{
		let config = GameConfig {
			seed: Some(7),
			wildcard_every: 0,
			..GameConfig::default()
		};
		let lexicon = Lexicon::new(NullLoader).with_fallback::<&str>(&[]);
		App::new(Game::new(config, lexicon))
	}

	/// Ensure that the application exits when the escape key is pressed.
	#[test]
	fn test_handle_exit()
	{
		let mut app = app();
		assert!(app.is_running());
		app.process_key_event(KeyCode::Esc.into());
		assert!(!app.is_running());
	}

	/// Ensure that the cursor moves with the arrow keys and stops at the
	/// edges of the board.
	#[test]
	fn test_handle_arrows()
	{
		let mut app = app();
		assert_eq!(app.cursor, (5, 5));
		// Each case is a tuple of the initial cursor position and the expected
		// cursor position after moving up, right, down, and left,
		// respectively.
		let cases = vec![
			((0, 0), [(0, 0), (1, 0), (0, 1), (0, 0)]),
			((9, 0), [(9, 0), (9, 0), (9, 1), (8, 0)]),
			((0, 9), [(0, 8), (1, 9), (0, 9), (0, 9)]),
			((9, 9), [(9, 8), (9, 9), (9, 9), (8, 9)]),
			((4, 6), [(4, 5), (5, 6), (4, 7), (3, 6)])
		];
		for (initial, expected) in cases
		{
			app.cursor = initial;
			app.process_key_event(KeyCode::Up.into());
			assert_eq!(app.cursor, expected[0], "up");
			app.cursor = initial;
			app.process_key_event(KeyCode::Right.into());
			assert_eq!(app.cursor, expected[1], "right");
			app.cursor = initial;
			app.process_key_event(KeyCode::Down.into());
			assert_eq!(app.cursor, expected[2], "down");
			app.cursor = initial;
			app.process_key_event(KeyCode::Left.into());
			assert_eq!(app.cursor, expected[3], "left");
		}
	}

	/// Ensure that the digit keys select tray pieces that exist.
	#[test]
	fn test_handle_select()
	{
		let mut app = app();
		assert_eq!(app.game.tray().len(), 4);
		app.process_key_event(KeyCode::Char('3').into());
		assert_eq!(app.selected, 2);
		app.process_key_event(KeyCode::Char('5').into());
		assert_eq!(app.selected, 2);
		app.process_key_event(KeyCode::Char('1').into());
		assert_eq!(app.selected, 0);
	}

	/// Ensure that Enter places the selected piece at the cursor.
	#[test]
	fn test_handle_place()
	{
		let mut app = app();
		let piece = app.game.tray()[0].clone();
		app.process_key_event(KeyCode::Enter.into());
		assert!(app.game.tray().iter().all(|p| p.id() != piece.id()));
		assert_eq!(app.game.board().occupied_count(), piece.cell_count());
		assert_eq!(app.game.board().get(Position::new(5, 5)).flatten().map(|t| t.owner), Some(piece.id()));
	}

	/// Ensure that rotation, pausing, and restarting reach the game.
	#[test]
	fn test_handle_controls()
	{
		let mut app = app();
		let before = app.game.tray()[0].rotation();
		app.process_key_event(KeyCode::Char('r').into());
		let piece = &app.game.tray()[0];
		if piece.shape().is_rotatable()
		{
			assert_eq!(piece.rotation(), (before + 1) % 4);
		}
		app.process_key_event(KeyCode::Char('p').into());
		assert_eq!(app.game.status(), GameStatus::Paused);
		app.process_key_event(KeyCode::Enter.into());
		assert_eq!(app.game.board().occupied_count(), 0);
		app.process_key_event(KeyCode::Char('p').into());
		assert_eq!(app.game.status(), GameStatus::Playing);
		app.process_key_event(KeyCode::Enter.into());
		assert!(app.game.board().occupied_count() > 0);
		app.process_key_event(KeyCode::Char('n').into());
		assert_eq!(app.game.board().occupied_count(), 0);
		assert_eq!(app.game.status(), GameStatus::Playing);
	}
}

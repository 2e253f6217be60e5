//! # Text-based user interface (TUI)
//!
//! Terminal setup and teardown for the front end. The terminal is switched to
//! the alternate screen and raw mode for the duration of a session, and it is
//! restored when the session ends, whether normally, by error, or by panic.

use std::{
	io::{self, stdout, Stdout},
	panic::{self, PanicHookInfo},
	sync::{Arc, Mutex, PoisonError},
	thread
};

use crossterm::{
	cursor::Show,
	execute,
	terminal::{
		disable_raw_mode, enable_raw_mode,
		EnterAlternateScreen, LeaveAlternateScreen
	}
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// The text-based user interface (TUI) type.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Open the text-based user interface (TUI), apply `f` to it, and restore the
/// terminal afterward.
///
/// # Arguments
///
/// * `f` - The function to apply to the TUI.
///
/// # Returns
///
/// The result of applying `f` to the TUI.
///
/// # Errors
///
/// Any error that occurs while driving the TUI, or while restoring the
/// terminal.
pub fn tui<F, T>(f: F) -> io::Result<T>
	where F: FnOnce(&mut Tui) -> io::Result<T>
{
	with_panic_hook(
		|| {
			// Nothing sensible remains to be done if this fails.
			let _ = restore();
		},
		|| {
			let mut session = Session::enter()?;
			let result = f(&mut session.terminal);
			session.leave().and(result)
		}
	)
}

/// The panic hook that was installed before [`with_panic_hook`] replaced it.
type SavedHook = Arc<Mutex<Option<Box<dyn Fn(&PanicHookInfo) + Sync + Send>>>>;

/// Apply `f` while a panic hook runs `on_panic` ahead of the original hook.
/// `on_panic` runs only for panics on the calling thread, so that the
/// terminal is restored before the panic message is printed. The original
/// hook is reinstalled when `f` finishes, even if it unwinds.
///
/// # Arguments
///
/// * `on_panic` - The action to take when the calling thread panics.
/// * `f` - The function to apply.
///
/// # Returns
///
/// The result of `f`.
fn with_panic_hook<P, F, T>(on_panic: P, f: F) -> T
where
	P: Fn() + Send + Sync + 'static,
	F: FnOnce() -> T
{
	let original: SavedHook = Arc::new(Mutex::new(Some(panic::take_hook())));
	let chained = original.clone();
	let owner = thread::current().id();
	panic::set_hook(Box::new(move |info| {
		if thread::current().id() == owner
		{
			on_panic();
		}
		let hook = chained.lock().unwrap_or_else(PoisonError::into_inner);
		if let Some(hook) = hook.as_ref()
		{
			hook(info);
		}
	}));
	let _guard = HookGuard(original);
	f()
}

/// Reinstalls the saved panic hook when dropped.
struct HookGuard(SavedHook);

impl Drop for HookGuard
{
	fn drop(&mut self)
	{
		let saved = self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
		if let Some(hook) = saved
		{
			panic::set_hook(hook);
		}
	}
}

/// An open terminal session. Dropping an active session restores the
/// terminal.
struct Session
{
	/// The terminal.
	terminal: Tui,

	/// Whether the terminal still needs to be restored.
	active: bool
}

impl Session
{
	/// Switch the terminal to the alternate screen and raw mode.
	///
	/// # Errors
	///
	/// Any error that occurs while preparing the terminal. Partial
	/// preparation is undone.
	fn enter() -> io::Result<Self>
	{
		let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
		let mut session = Self { terminal, active: true };
		execute!(session.terminal.backend_mut(), EnterAlternateScreen)?;
		enable_raw_mode()?;
		session.terminal.clear()?;
		Ok(session)
	}

	/// Restore the terminal, reporting any failure.
	fn leave(mut self) -> io::Result<()>
	{
		self.active = false;
		restore()
	}
}

impl Drop for Session
{
	fn drop(&mut self)
	{
		if self.active
		{
			let _ = restore();
		}
	}
}

/// Restore the terminal to its original state, including the cursor.
///
/// # Errors
///
/// Any error that occurs while restoring the terminal.
fn restore() -> io::Result<()>
{
	disable_raw_mode()?;
	execute!(stdout(), LeaveAlternateScreen, Show)
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

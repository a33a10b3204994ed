//! # Keypad calculator engine
//!
//! The engine of a pocket-style calculator: it turns button presses into an
//! expression string, evaluates the string with standard operator precedence,
//! and keeps finished calculations in a SQLite history log. There is no UI
//! here - a frontend feeds [`keypad::Key`] presses in and renders the
//! display and preview strings it gets back.
//!
//! The expression text uses the glyphs a calculator keypad produces:
//! * `÷` for division (translated to `/` before evaluation)
//! * `√` for the square root prefix. Roots chain: `√√16` is
//!   sqrt(sqrt(16)) = 2, and a digit right before a root multiplies:
//!   `2√9` is 2*3 = 6
//! * a `'\n'` separator when a calculation continues from the previous
//!   result or a numeric segment hits its length cap
//!
//! Input rules enforced by the builder:
//! * no two adjacent binary operators
//! * a single decimal point per numeric segment
//! * at most 16 characters per numeric segment
//! * the placeholder `0` is replaced by the first non-operator key
//!
//! Evaluation never panics and never escapes its boundary: every outcome is
//! either a finite number or one of two displayable errors - `Error` for
//! malformed text (including a root marker with nothing to bind to) and
//! `Can't divide by zero` for non-finite arithmetic results.
//!
//! A minimal session:
//!
//! ```
//! use pcalc_lib::history::HistoryLog;
//! use pcalc_lib::keypad::{Key, Keypad};
//!
//! let log = HistoryLog::open_in_memory().unwrap();
//! let mut pad = Keypad::new();
//! for key in [Key::Digit(2), Key::Root, Key::Digit(9)] {
//!     pad.press(key);
//! }
//! assert_eq!(pad.display(), "2√9");
//! if let Some(commit) = pad.press(Key::Equals) {
//!     log.append(&commit);
//! }
//! assert_eq!(pad.display(), "6");
//! ```

#[macro_use]
extern crate pest_derive;

pub mod errors;
pub mod history;
pub mod keypad;
pub mod parse;
pub mod stack;

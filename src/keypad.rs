use log::debug;

use crate::parse::{eval, format_number, DIVIDE, ROOT};

/// the expression shown before any input and after a clear
pub const PLACEHOLDER: &str = "0";
/// maximal number of characters in one numeric segment
pub const MAX_SEGMENT: usize = 16;

const OPERATORS: [char; 4] = ['+', '-', '*', DIVIDE];

/// A single key of the calculator keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Dot,
    Add,
    Subtract,
    Multiply,
    Divide,
    Root,
    Percent,
    Equals,
    Clear,
    Backspace,
}

impl Key {
    fn is_operator(self) -> bool {
        matches!(self, Key::Add | Key::Subtract | Key::Multiply | Key::Divide)
    }

    // the character the key appends to the expression text
    fn glyph(self) -> Option<char> {
        match self {
            Key::Digit(d) => char::from_digit(u32::from(d), 10),
            Key::Add => Some('+'),
            Key::Subtract => Some('-'),
            Key::Multiply => Some('*'),
            Key::Divide => Some(DIVIDE),
            _ => None,
        }
    }
}

/// A finished calculation that the caller should append to the history log.
/// Produced only by a successful press of the equals key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub expression: String,
    pub result: String,
}

/// Holds the current state of the keypad: the expression being edited,
/// the speculative preview of its value, a transient error message, and
/// whether the text on the display is a finished result
pub struct Keypad {
    expression: String,
    preview: Option<String>,
    message: Option<&'static str>,
    final_result: bool,
}

impl Default for Keypad {
    fn default() -> Keypad {
        Keypad {
            expression: PLACEHOLDER.to_string(),
            preview: None,
            message: None,
            final_result: false,
        }
    }
}

impl Keypad {
    pub fn new() -> Self {
        Default::default()
    }

    /// The expression under edit
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The text the main display line shows: a transient error message
    /// right after a failed evaluation, the expression otherwise
    pub fn display(&self) -> &str {
        self.message.unwrap_or(&self.expression)
    }

    /// Speculative value of the expression for the auxiliary display line
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// True right after a successful evaluation, false after any edit
    pub fn final_result_shown(&self) -> bool {
        self.final_result
    }

    /// Replaces the whole expression with one recalled from the history
    pub fn recall(&mut self, expression: &str) {
        self.expression = expression.to_string();
        self.message = None;
        self.final_result = false;
        self.refresh_preview();
    }

    /// Applies one key press and returns the calculation to store in the
    /// history log when the press finished an evaluation
    pub fn press(&mut self, key: Key) -> Option<Commit> {
        // an error message is shown only until the next key press;
        // editing after it starts from scratch, and equals stays inert
        // so the untouched placeholder is not committed to the history
        if self.message.take().is_some() {
            self.expression = PLACEHOLDER.to_string();
            self.preview = None;
            if key == Key::Equals {
                return None;
            }
        }

        match key {
            Key::Clear => {
                self.clear();
                None
            }
            Key::Equals => self.equals(),
            Key::Percent => {
                self.percent();
                None
            }
            Key::Backspace => {
                self.backspace();
                None
            }
            Key::Root => {
                self.root();
                None
            }
            Key::Dot => {
                self.dot();
                None
            }
            _ => {
                self.push_glyph(key);
                None
            }
        }
    }

    /// Resets the keypad to its start state
    pub fn clear(&mut self) {
        self.expression = PLACEHOLDER.to_string();
        self.preview = None;
        self.message = None;
        self.final_result = false;
    }

    fn equals(&mut self) -> Option<Commit> {
        if self.final_result {
            return None;
        }
        match eval(&self.expression) {
            Ok(v) => {
                let result = format_number(v);
                let expression = std::mem::replace(&mut self.expression, result.clone());
                self.preview = None;
                self.final_result = true;
                Some(Commit { expression, result })
            }
            Err(e) => {
                debug!("evaluation of '{}' failed: {}", self.expression, e);
                self.message = Some(e.ui_message());
                if !e.is_undefined() {
                    // malformed input is dropped, an undefined result keeps
                    // the expression around until the next key press
                    self.expression = PLACEHOLDER.to_string();
                }
                self.preview = None;
                self.final_result = false;
                None
            }
        }
    }

    fn percent(&mut self) {
        if self.expression == PLACEHOLDER {
            return;
        }
        // only a single numeric literal can be divided by a hundred
        let v: f64 = match self.expression.parse() {
            Ok(v) => v,
            Err(..) => return,
        };
        let text = format_number(v / 100.0);
        self.expression = text.clone();
        self.preview = Some(text);
    }

    fn backspace(&mut self) {
        if self.expression.chars().count() > 1 {
            self.expression.pop();
            // partial expressions preview as empty, never as an error
            self.preview = eval(&self.expression).ok().map(format_number);
        } else {
            self.expression = PLACEHOLDER.to_string();
            self.preview = None;
        }
        self.final_result = false;
    }

    fn root(&mut self) {
        if self.expression == PLACEHOLDER {
            self.expression = ROOT.to_string();
        } else {
            self.expression.push(ROOT);
        }
        self.final_result = false;
    }

    fn dot(&mut self) {
        if self.final_result {
            self.expression = "0.".to_string();
            self.final_result = false;
            return;
        }
        if self.expression == PLACEHOLDER {
            self.expression.push('.');
            return;
        }
        if last_segment(&self.expression).contains('.') {
            return;
        }
        self.expression.push('.');
    }

    // digits and binary operators
    fn push_glyph(&mut self, key: Key) {
        let glyph = match key.glyph() {
            Some(g) => g,
            None => return,
        };

        if key.is_operator() && self.ends_with_operator() {
            return;
        }

        if self.final_result {
            if key.is_operator() {
                // continue calculating from the displayed result
                self.expression.push('\n');
                self.expression.push(glyph);
            } else {
                self.expression = glyph.to_string();
            }
            self.final_result = false;
            return;
        }

        let seg_len = last_segment(&self.expression).chars().count();
        if seg_len >= MAX_SEGMENT && !key.is_operator() {
            return;
        }

        if self.expression == PLACEHOLDER && !key.is_operator() {
            self.expression = glyph.to_string();
            self.preview = Some(self.expression.clone());
            return;
        }
        if key == Key::Subtract && self.expression == PLACEHOLDER {
            // leading unary minus
            self.expression = "-".to_string();
            return;
        }

        if seg_len >= MAX_SEGMENT && key.is_operator() {
            self.expression.push('\n');
            self.expression.push(glyph);
        } else {
            self.expression.push(glyph);
        }
        self.refresh_preview();
    }

    fn ends_with_operator(&self) -> bool {
        self.expression
            .chars()
            .last()
            .map_or(false, |c| OPERATORS.contains(&c))
    }

    fn refresh_preview(&mut self) {
        if self.ends_with_operator() {
            // the previous preview stays while an operand is pending
            return;
        }
        if self.expression == PLACEHOLDER {
            self.preview = None;
            return;
        }
        self.preview = eval(&self.expression).ok().map(format_number);
    }
}

// the last maximal run of non-operator characters
fn last_segment(expr: &str) -> &str {
    expr.rsplit(|c| OPERATORS.contains(&c)).next().unwrap_or("")
}

use lazy_static::lazy_static;
use pest::Parser;
use regex::Regex;

use crate::errors::*;
use crate::stack::{Stack, UNARY_MINUS};

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// the root (square root) marker a keypad produces
pub const ROOT: char = '√';
/// the division glyph a keypad produces
pub const DIVIDE: char = '÷';

lazy_static! {
    // a digit directly followed by a root marker: implicit multiplication
    static ref COEF_ROOT: Regex = Regex::new(r"(\d)√").unwrap();
    // leftmost run of consecutive root markers
    static ref ROOT_RUN: Regex = Regex::new("√+").unwrap();
}

/// Formats a calculation result the way the display shows it:
/// plain decimal notation, no trailing zero fraction
pub fn format_number(v: f64) -> String {
    format!("{}", v)
}

// Replaces every root run and the numeric literal it binds to with the
// computed value. A run of k markers applies the square root k times,
// so `√√16` is sqrt(sqrt(16)). Scanning restarts from the beginning after
// every replacement because the spliced-in value may stand after another
// root marker. A run not followed by a digit has no operand to bind to.
fn resolve_roots(expr: &str) -> Result<String, CalcError> {
    let mut text = COEF_ROOT.replace_all(expr, "${1}*√").into_owned();

    while let Some(m) = ROOT_RUN.find(&text) {
        let depth = m.as_str().chars().count();
        let tail = &text[m.end()..];

        if !tail.chars().next().map_or(false, |c| c.is_ascii_digit()) {
            return Err(CalcError::UnboundRoot);
        }

        let mut lit_end = 0;
        for (i, c) in tail.char_indices() {
            if !c.is_ascii_digit() && c != '.' {
                break;
            }
            lit_end = i + c.len_utf8();
        }
        let lit = &tail[..lit_end];
        let mut v: f64 = lit.parse().map_err(|_| CalcError::StrToNumber(lit.to_string()))?;
        for _ in 0..depth {
            v = v.sqrt();
        }

        let mut replaced = String::with_capacity(text.len());
        replaced.push_str(&text[..m.start()]);
        replaced.push_str(&format_number(v));
        replaced.push_str(&tail[lit_end..]);
        text = replaced;
    }

    Ok(text)
}

/// Evaluates a raw keypad expression and returns either its value or an error.
///
/// The text goes through the rewrite passes first: implicit multiplication
/// before root markers, root resolution, and translation of the division
/// glyph. What remains is tokenized and calculated with standard operator
/// precedence over IEEE doubles. A non-finite outcome (division by zero and
/// friends) is reported as [`CalcError::Undefined`].
pub fn eval(expr: &str) -> CalcResult {
    let text = resolve_roots(expr)?;
    let text = text.replace(DIVIDE, "/");

    let pairs = match CalcParser::parse(Rule::expr, &text) {
        Ok(p) => p,
        Err(..) => return Err(CalcError::ParseFailed),
    };

    let mut is_last_value = false;
    let mut stk = Stack::new();
    for pair in pairs {
        let rule = pair.as_rule();
        let val = pair.as_span().as_str();
        match rule {
            Rule::num => {
                if is_last_value {
                    stk.push("*", None)?;
                }
                let v: f64 = val.parse().map_err(|_| CalcError::StrToNumber(val.to_string()))?;
                stk.push("", Some(v))?;
                is_last_value = true;
            }
            Rule::open_b => {
                if is_last_value {
                    stk.push("*", None)?;
                }
                stk.push("(", None)?;
                is_last_value = false;
            }
            Rule::close_b => {
                stk.push(")", None)?;
                is_last_value = true;
            }
            Rule::operator => {
                if val == "+" && !is_last_value {
                    // unary plus changes nothing
                } else if val == "-" && !is_last_value {
                    stk.push(UNARY_MINUS, None)?;
                } else {
                    stk.push(val, None)?;
                    is_last_value = false;
                }
            }
            Rule::EOI => {}
            _ => return Err(CalcError::Unreachable),
        }
    }

    let v = stk.calculate()?;
    if v.is_infinite() || v.is_nan() {
        return Err(CalcError::Undefined);
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr() {
        assert_eq!(eval("2+3"), Ok(5.0));
        assert_eq!(eval("2+3*2+5"), Ok(13.0));
        assert_eq!(eval("10-2-3"), Ok(5.0));
        assert_eq!(eval("5÷2"), Ok(2.5));
        assert_eq!(eval("-5+3"), Ok(-2.0));
        assert_eq!(eval("2.5*2"), Ok(5.0));
        assert_eq!(eval("0.1+0.2"), Ok(0.30000000000000004));
        assert_eq!(eval("(3+2)(4-9)"), Ok(-25.0));
        // the builder's continuation marker is plain whitespace
        assert_eq!(eval("6\n+3"), Ok(9.0));
        assert_eq!(eval("5."), Ok(5.0));
    }

    #[test]
    fn test_roots() {
        assert_eq!(eval("√9"), Ok(3.0));
        assert_eq!(eval("√√16"), Ok(2.0));
        assert_eq!(eval("2√9"), Ok(6.0));
        assert_eq!(eval("√9+√4"), Ok(5.0));
        assert_eq!(eval("√2"), Ok(std::f64::consts::SQRT_2));
        assert_eq!(eval("3√√16"), Ok(6.0));
        assert_eq!(eval("√6.25"), Ok(2.5));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(eval("√"), Err(CalcError::UnboundRoot));
        assert_eq!(eval("√+3"), Err(CalcError::UnboundRoot));
        assert_eq!(eval("2√"), Err(CalcError::UnboundRoot));
        assert_eq!(eval("5+"), Err(CalcError::TooManyOps));
        assert_eq!(eval(""), Err(CalcError::ParseFailed));
        assert_eq!(eval("-"), Err(CalcError::TooManyOps));
        assert!(eval("abc").is_err());
    }

    #[test]
    fn test_undefined() {
        assert_eq!(eval("5÷0"), Err(CalcError::Undefined));
        assert_eq!(eval("0÷0"), Err(CalcError::Undefined));
        assert_eq!(eval("1÷0-1÷0"), Err(CalcError::Undefined));
        assert_eq!(eval("5÷0").unwrap_err().ui_message(), "Can't divide by zero");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.05), "-0.05");
    }

    #[test]
    fn test_root_resolution_text() {
        assert_eq!(resolve_roots("2√9"), Ok("2*3".to_string()));
        assert_eq!(resolve_roots("√√81"), Ok("3".to_string()));
        assert_eq!(resolve_roots("1+2"), Ok("1+2".to_string()));
        assert_eq!(resolve_roots("√4√4"), Ok("2*2".to_string()));
    }
}

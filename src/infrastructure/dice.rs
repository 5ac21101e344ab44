//! # Standard Dice
//!
//! The built-in `DiceRoller`. An expression is a run of terms joined by `+` or `-`, each term
//! a constant, `NdM`, `NdF` (fudge, -1..=1) or `Nd%` (d100). Whitespace is ignored.
//!
//! The rendered result reads `expr ➔ groups ➔ **sum**`; the group breakdown only shows when
//! more than one value was involved.

use crate::domain::errors::RollError;
use crate::domain::traits::DiceRoller;
use crate::strings::messages;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::sync::{LazyLock, Mutex};

/// Rolled when the expression is empty.
pub const DEFAULT_EXPRESSION: &str = "1d20";

pub const MAX_EXPRESSION_LEN: usize = 200;
pub const MAX_TERMS: usize = 20;
pub const MAX_DICE_PER_TERM: u64 = 100;
pub const MAX_DIE_SIZE: u64 = 1000;
/// Dice thrown across all terms of one expression.
pub const ROLL_BUDGET: u64 = 1000;
/// Rendered results are cut after this many characters.
pub const MAX_OUTPUT_CHARS: usize = 1500;

static DICE_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([0-9]*)d([0-9]+|%|f)$").expect("valid dice pattern"));
static CONSTANT_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid constant pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Die {
    Sided(u64),
    Fudge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Constant(i64),
    Dice { count: u64, die: Die },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    /// `1` or `-1`.
    pub sign: i64,
    pub kind: TermKind,
}

/// Outcome of one term: a group of die faces or a single constant, sign applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rolled {
    Group(Vec<i64>),
    Constant(i64),
}

impl Rolled {
    fn values(&self) -> &[i64] {
        match self {
            Self::Group(values) => values,
            Self::Constant(value) => std::slice::from_ref(value),
        }
    }
}

pub struct StandardDice {
    rng: Mutex<StdRng>,
}

impl Default for StandardDice {
    fn default() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl StandardDice {
    /// Deterministic roller for reproducible sequences.
    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn throw(&self, terms: &[Term]) -> Result<Vec<Rolled>, RollError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| RollError::Internal(format!("dice lock poisoned: {e}")))?;
        Ok(terms
            .iter()
            .map(|term| match term.kind {
                TermKind::Constant(value) => Rolled::Constant(term.sign * value),
                TermKind::Dice { count, die } => Rolled::Group(
                    (0..count)
                        .map(|_| {
                            let face = match die {
                                Die::Sided(sides) => rng.gen_range(1..=sides as i64),
                                Die::Fudge => rng.gen_range(-1..=1),
                            };
                            term.sign * face
                        })
                        .collect(),
                ),
            })
            .collect())
    }
}

impl DiceRoller for StandardDice {
    fn roll(&self, expr: &str) -> Result<String, RollError> {
        let compact: String = expr.split_whitespace().collect();
        let compact = if compact.is_empty() {
            DEFAULT_EXPRESSION.to_string()
        } else {
            compact
        };
        let terms = parse_expression(&compact)?;
        let rolled = self.throw(&terms)?;
        render(&compact, &rolled)
    }
}

/// Split a whitespace-free expression into signed terms and validate every limit.
pub fn parse_expression(expr: &str) -> Result<Vec<Term>, RollError> {
    if expr.chars().count() > MAX_EXPRESSION_LEN {
        return Err(RollError::ResourceExhausted(format!(
            "expression longer than {MAX_EXPRESSION_LEN} characters"
        )));
    }

    let chunks = split_terms(expr);
    if chunks.len() > MAX_TERMS {
        return Err(RollError::ResourceExhausted(format!(
            "{} terms, at most {MAX_TERMS} allowed",
            chunks.len()
        )));
    }

    let terms = chunks
        .into_iter()
        .map(|(sign, chunk)| parse_term(chunk).map(|kind| Term { sign, kind }))
        .collect::<Result<Vec<_>, _>>()?;

    let thrown: u64 = terms
        .iter()
        .map(|term| match term.kind {
            TermKind::Dice { count, .. } => count,
            TermKind::Constant(_) => 0,
        })
        .sum();
    if thrown > ROLL_BUDGET {
        return Err(RollError::Timeout(format!(
            "{thrown} dice in one roll, budget is {ROLL_BUDGET}"
        )));
    }
    Ok(terms)
}

fn split_terms(expr: &str) -> Vec<(i64, &str)> {
    let mut chunks = Vec::new();
    let mut sign = 1;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        if c == '+' || c == '-' {
            if i > 0 {
                chunks.push((sign, &expr[start..i]));
            }
            sign = if c == '-' { -1 } else { 1 };
            start = i + 1;
        }
    }
    chunks.push((sign, &expr[start..]));
    chunks
}

fn parse_term(chunk: &str) -> Result<TermKind, RollError> {
    if CONSTANT_TERM.is_match(chunk) {
        let value = chunk
            .parse()
            .map_err(|_| RollError::ResourceExhausted(format!("constant too large: {chunk}")))?;
        return Ok(TermKind::Constant(value));
    }

    let Some(caps) = DICE_TERM.captures(chunk) else {
        return Err(RollError::InvalidInput(chunk.to_string()));
    };
    let count = match &caps[1] {
        "" => 1,
        digits => digits.parse().unwrap_or(u64::MAX),
    };
    if count == 0 {
        return Err(RollError::InvalidInput(chunk.to_string()));
    }
    if count > MAX_DICE_PER_TERM {
        return Err(RollError::ResourceExhausted(format!(
            "{chunk}: at most {MAX_DICE_PER_TERM} dice per term"
        )));
    }

    let die = match &caps[2] {
        "%" => Die::Sided(100),
        "f" | "F" => Die::Fudge,
        digits => {
            let sides = digits.parse().unwrap_or(u64::MAX);
            if sides == 0 {
                return Err(RollError::InvalidInput(chunk.to_string()));
            }
            if sides > MAX_DIE_SIZE {
                return Err(RollError::ResourceExhausted(format!(
                    "{chunk}: dice have at most {MAX_DIE_SIZE} sides"
                )));
            }
            Die::Sided(sides)
        }
    };
    Ok(TermKind::Dice { count, die })
}

/// `expr ➔ groups ➔ **sum**`, truncated past the output limit.
pub fn render(expr: &str, rolled: &[Rolled]) -> Result<String, RollError> {
    let flat: Vec<i64> = rolled.iter().flat_map(|r| r.values().iter().copied()).collect();
    let sum = flat
        .iter()
        .try_fold(0i64, |acc, value| acc.checked_add(*value))
        .ok_or_else(|| RollError::Internal(format!("sum overflow in {expr}")))?;

    let mut parts = vec![expr.to_string()];
    if flat.len() > 1 {
        parts.push(
            rolled
                .iter()
                .map(|r| match r {
                    Rolled::Group(values) => values
                        .iter()
                        .map(i64::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                    Rolled::Constant(value) => value.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        );
    }
    parts.push(format!("**{sum}**"));

    let text = parts.join(" ➔ ");
    if text.chars().count() < MAX_OUTPUT_CHARS {
        Ok(text)
    } else {
        let mut cut: String = text.chars().take(MAX_OUTPUT_CHARS).collect();
        cut.push_str(messages::ROLL_TRUNCATED);
        Ok(cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(sign: i64, count: u64, die: Die) -> Term {
        Term {
            sign,
            kind: TermKind::Dice { count, die },
        }
    }

    fn constant(sign: i64, value: i64) -> Term {
        Term {
            sign,
            kind: TermKind::Constant(value),
        }
    }

    #[test]
    fn test_parse_expression() {
        assert_eq!(
            parse_expression("4d8-2").unwrap(),
            vec![dice(1, 4, Die::Sided(8)), constant(-1, 2)]
        );
        assert_eq!(
            parse_expression("-d%+dF+3D6").unwrap(),
            vec![dice(-1, 1, Die::Sided(100)), dice(1, 1, Die::Fudge), dice(1, 3, Die::Sided(6))]
        );
        assert_eq!(parse_expression("7").unwrap(), vec![constant(1, 7)]);
    }

    #[test]
    fn test_invalid_input_is_quiet() {
        for bad in ["zz", "1d", "d", "1d6+", "1d6++2", "0d6", "1d0", "2x3", "+", "٣", "d٣", "٣d6"] {
            let err = parse_expression(bad).unwrap_err();
            assert!(matches!(err, RollError::InvalidInput(_)), "{bad}: {err:?}");
            assert!(err.is_quiet());
        }
    }

    #[test]
    fn test_limits() {
        let excessive = |expr: &str| matches!(parse_expression(expr), Err(RollError::ResourceExhausted(_)));
        assert!(excessive("101d6"));
        assert!(excessive("1d1001"));
        assert!(excessive("99999999999999999999999d6"));
        assert!(excessive(&vec!["1"; 21].join("+")));
        assert!(excessive(&"1".repeat(201)));

        assert!(parse_expression("100d1000").is_ok());
        assert!(parse_expression(&vec!["1"; 20].join("+")).is_ok());
        assert!(matches!(
            parse_expression(&vec!["100d6"; 11].join("+")),
            Err(RollError::Timeout(_))
        ));
    }

    #[test]
    fn test_render() {
        let rolled = vec![Rolled::Group(vec![3, 5, 1, 7]), Rolled::Constant(-2)];
        assert_eq!(render("4d8-2", &rolled).unwrap(), "4d8-2 ➔ 3, 5, 1, 7; -2 ➔ **14**");
        assert_eq!(render("d20", &[Rolled::Group(vec![17])]).unwrap(), "d20 ➔ **17**");
    }

    #[test]
    fn test_render_truncates() {
        let rolled = vec![Rolled::Group(vec![1000; 400])];
        let text = render("400d1000", &rolled).unwrap();
        assert!(text.ends_with(" ... I ... can't ... :boom:"));
        assert_eq!(
            text.chars().count(),
            MAX_OUTPUT_CHARS + " ... I ... can't ... :boom:".chars().count()
        );
    }

    #[test]
    fn test_render_overflow_is_internal() {
        let rolled = vec![Rolled::Constant(i64::MAX), Rolled::Constant(1)];
        assert!(matches!(render("x", &rolled), Err(RollError::Internal(_))));
    }

    #[test]
    fn test_empty_expression_rolls_d20() {
        let dice = StandardDice::seeded(7);
        for _ in 0..50 {
            let text = dice.roll("   ").unwrap();
            let (expr, sum) = text.split_once(" ➔ ").unwrap();
            assert_eq!(expr, "1d20");
            let value: i64 = sum.trim_matches('*').parse().unwrap();
            assert!((1..=20).contains(&value));
        }
    }

    #[test]
    fn test_roll_strips_whitespace_and_stays_in_range() {
        let dice = StandardDice::seeded(42);
        for _ in 0..50 {
            let text = dice.roll("2d6 + 1").unwrap();
            let parts: Vec<&str> = text.split(" ➔ ").collect();
            assert_eq!(parts[0], "2d6+1");
            let sum: i64 = parts[2].trim_matches('*').parse().unwrap();
            assert!((3..=13).contains(&sum), "{text}");
        }
        for _ in 0..50 {
            let text = dice.roll("4dF").unwrap();
            let sum: i64 = text.rsplit(" ➔ ").next().unwrap().trim_matches('*').parse().unwrap();
            assert!((-4..=4).contains(&sum), "{text}");
        }
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let a = StandardDice::seeded(3);
        let b = StandardDice::seeded(3);
        assert_eq!(a.roll("10d10").unwrap(), b.roll("10d10").unwrap());
    }
}

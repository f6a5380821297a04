//! Forgiving scanners for bracketed numeric payloads.
//!
//! Payloads such as `[1,2,3]` or `[(1,2,3),(4,5,6)]` are printed by the
//! checking tools with `print`-style formatting and are not guaranteed to be
//! valid JSON: lines can be truncated, carry ANSI colour codes or have
//! unrelated output interleaved. The scanner therefore works character by
//! character:
//!
//! - everything before the first `[` is ignored;
//! - digits and `.` accumulate into the current token (a `-` only when it
//!   starts a token);
//! - `,` commits the current token as one field;
//! - `)` commits the last field and emits a tuple;
//! - for bare lists (arity 1) `,` and `]` emit directly;
//! - the first `]` ends the scan;
//! - every other character is skipped.
//!
//! A token that is never terminated is dropped, as is a tuple with the wrong
//! number of fields. Tokens that fail to convert are reported in
//! [`Scan::rejected`] and their tuple is dropped.

use std::str::FromStr;

use crate::metrics::METRICS;
use crate::obs;

/// Items decoded from one payload plus the fragments that failed to convert.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan<T> {
    pub items: Vec<T>,
    pub rejected: Vec<String>,
}

impl<T> Scan<T> {
    /// Convert every decoded item, keeping the rejected fragments.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Scan<U> {
        Scan {
            items: self.items.into_iter().map(f).collect(),
            rejected: self.rejected,
        }
    }

    /// Log each rejected fragment on behalf of `parser` and return the items.
    pub fn report(self, parser: &str) -> Vec<T> {
        for fragment in &self.rejected {
            obs::emit_parse_error(parser, fragment, &"not a number");
            METRICS.inc_parse_errors();
        }
        self.items
    }
}

/// Scan `payload` for a bracketed list of `N`-tuples of `T`.
///
/// `N == 1` decodes a bare list such as `[1,2,3]`.
pub fn scan_tuples<T: FromStr, const N: usize>(payload: &str) -> Scan<[T; N]> {
    let mut items: Vec<[T; N]> = Vec::new();
    let mut rejected = Vec::new();
    let mut token = String::new();
    let mut fields: Vec<T> = Vec::with_capacity(N);
    let mut poisoned = false;
    let mut opened = false;

    for c in payload.chars() {
        if !opened {
            opened = c == '[';
            continue;
        }
        match c {
            '0'..='9' | '.' => token.push(c),
            '-' if token.is_empty() => token.push(c),
            ',' if !token.is_empty() => {
                commit(&mut token, &mut fields, &mut poisoned, &mut rejected);
                if N == 1 {
                    emit(&mut fields, &mut poisoned, &mut items);
                }
            }
            ')' if N > 1 => {
                if !token.is_empty() {
                    commit(&mut token, &mut fields, &mut poisoned, &mut rejected);
                }
                emit(&mut fields, &mut poisoned, &mut items);
            }
            ']' => {
                if N == 1 && !token.is_empty() {
                    commit(&mut token, &mut fields, &mut poisoned, &mut rejected);
                    emit(&mut fields, &mut poisoned, &mut items);
                }
                break;
            }
            _ => {}
        }
    }

    Scan { items, rejected }
}

fn commit<T: FromStr>(
    token: &mut String,
    fields: &mut Vec<T>,
    poisoned: &mut bool,
    rejected: &mut Vec<String>,
) {
    // a lone sign is stray text, not a number
    if token != "-" {
        match token.parse::<T>() {
            Ok(value) => fields.push(value),
            Err(_) => {
                *poisoned = true;
                rejected.push(token.clone());
            }
        }
    }
    token.clear();
}

fn emit<T, const N: usize>(fields: &mut Vec<T>, poisoned: &mut bool, items: &mut Vec<[T; N]>) {
    let taken = std::mem::take(fields);
    if !*poisoned {
        if let Ok(tuple) = <[T; N]>::try_from(taken) {
            items.push(tuple);
        }
    }
    *poisoned = false;
}

/// Decode a bare list of integers, e.g. `[1,2,3]`.
pub fn parse_int_list(payload: &str) -> Scan<i64> {
    scan_tuples::<i64, 1>(payload).map(|[v]| v)
}

/// Decode a bare list of floats, e.g. `[0.5,1.25]`.
pub fn parse_float_list(payload: &str) -> Scan<f64> {
    scan_tuples::<f64, 1>(payload).map(|[v]| v)
}

/// Decode a list of float pairs, e.g. `[(0.1,0.2),(0.3,0.4)]`.
pub fn parse_pairs(payload: &str) -> Scan<(f64, f64)> {
    scan_tuples::<f64, 2>(payload).map(|[a, b]| (a, b))
}

/// Decode a list of triples, e.g. `[(1,2,3),(4,5,6)]`.
pub fn parse_triples<T: FromStr>(payload: &str) -> Scan<(T, T, T)> {
    scan_tuples::<T, 3>(payload).map(|[a, b, c]| (a, b, c))
}

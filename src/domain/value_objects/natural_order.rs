//! Natural ("alphanumeric") ordering
//!
//! Runs of ASCII digits compare by numeric value, everything else compares
//! character by character. Used both to pick the newest tag and to order
//! release directories.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two strings in natural order
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(l: &str, r: &str) -> Ordering {
    let l_trimmed = l.trim_start_matches('0');
    let r_trimmed = r.trim_start_matches('0');
    l_trimmed
        .len()
        .cmp(&r_trimmed.len())
        .then_with(|| l_trimmed.cmp(r_trimmed))
}

/// Sort in place using [`natural_cmp`]
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

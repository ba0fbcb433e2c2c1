//! Duration text grammar: `300ms`, `1.5s`, `1h30m`, `2us` / `2µs`, `10ns`.
//!
//! A duration is a sequence of decimal numbers, each with an optional
//! fraction and a required unit. `0` on its own is also accepted. [`Display`]
//! renders in the same grammar (`1h30m0s`, `1.5s`, `250ms`, `0s`) so that a
//! rendered default can be parsed back.

use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

pub fn parse(text: &str) -> Result<Duration, &'static str> {
    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("invalid duration");
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after) = rest.split_at(int_len);
        let (frac_part, after) = match after.strip_prefix('.') {
            Some(tail) => {
                let len = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
                tail.split_at(len)
            }
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err("invalid duration");
        }

        let unit_len = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, tail) = after.split_at(unit_len);
        if unit.is_empty() {
            return Err("missing unit in duration");
        }
        let scale = unit_nanos(unit).ok_or("unknown unit in duration")?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| "invalid duration")?
        };
        let mut nanos = whole.checked_mul(scale).ok_or("invalid duration")?;

        // Digits past 20 cannot change the result at nanosecond precision.
        let frac_digits = &frac_part[..frac_part.len().min(20)];
        if !frac_digits.is_empty() {
            let frac: u128 = frac_digits.parse().map_err(|_| "invalid duration")?;
            nanos += frac * scale / 10u128.pow(frac_digits.len() as u32);
        }

        total = total.checked_add(nanos).ok_or("invalid duration")?;
        rest = tail;
    }

    if negative && total != 0 {
        return Err("negative duration");
    }
    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| "invalid duration")?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Formats a [`Duration`] in the grammar [`parse`] accepts.
#[derive(Debug, Clone, Copy)]
pub struct Display(pub Duration);

fn write_fraction(f: &mut fmt::Formatter<'_>, value: u128, digits: u32) -> fmt::Result {
    let unit = 10u128.pow(digits);
    write!(f, "{}", value / unit)?;
    let rem = value % unit;
    if rem != 0 {
        let padded = format!("{rem:0width$}", width = digits as usize);
        write!(f, ".{}", padded.trim_end_matches('0'))?;
    }
    Ok(())
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0s");
        }
        if nanos < 1_000 {
            return write!(f, "{nanos}ns");
        }
        if nanos < 1_000_000 {
            write_fraction(f, nanos, 3)?;
            return f.write_str("µs");
        }
        if nanos < NANOS_PER_SEC {
            write_fraction(f, nanos, 6)?;
            return f.write_str("ms");
        }

        let secs = self.0.as_secs();
        if secs >= 3_600 {
            write!(f, "{}h", secs / 3_600)?;
        }
        if secs >= 60 {
            write!(f, "{}m", (secs / 60) % 60)?;
        }
        let within_minute = u128::from(secs % 60) * NANOS_PER_SEC + u128::from(self.0.subsec_nanos());
        write_fraction(f, within_minute, 9)?;
        f.write_str("s")
    }
}

//! Day 01: depth readings, one per line, on stdin.
//!
//! Usage: `cargo run --bin day01 < input.txt`

use std::io;
use std::io::prelude::*;
use std::num::ParseIntError;

use thiserror::Error;
use tracing::{event, Level};
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::prelude::*;

#[derive(Debug, Error)]
enum InputError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: expected a number, got '{text}': {source}")]
    BadNumber {
        line: usize,
        text: String,
        source: ParseIntError,
    },
}

fn parse_depths<I, S>(lines: I) -> Result<Vec<i64>, InputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let text = s.as_ref().trim();
            text.parse::<i64>().map_err(|e| InputError::BadNumber {
                line: i + 1,
                text: text.to_string(),
                source: e,
            })
        })
        .collect()
}

#[test]
fn test_parse_depths() {
    assert_eq!(parse_depths(["199", " 200", "208\r"]).unwrap(), vec![199, 200, 208]);
    match parse_depths(["199", "two hundred"]) {
        Err(InputError::BadNumber { line, text, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(text, "two hundred");
        }
        other => panic!("expected BadNumber, got {:?}", other),
    }
    assert!(parse_depths(["1", ""]).is_err());
}

/// Counts the readings which are larger than the one before.
fn count_increases<I: IntoIterator<Item = i64>>(depths: I) -> usize {
    let mut previous: Option<i64> = None;
    let mut increases = 0;
    for depth in depths {
        if matches!(previous, Some(p) if depth > p) {
            increases += 1;
        }
        previous = Some(depth);
    }
    increases
}

/// Counts how often the sum of a three-reading window is larger than
/// the sum of the window starting one reading earlier.  The two windows
/// share two readings, so only the reading entering and the one leaving
/// need comparing.
fn count_window_increases<I: IntoIterator<Item = i64>>(depths: I) -> usize {
    let mut window = [0_i64; 3];
    let mut seen: usize = 0;
    let mut increases = 0;
    for depth in depths {
        let slot = seen % 3;
        if seen >= 3 && depth > window[slot] {
            increases += 1;
        }
        window[slot] = depth;
        seen += 1;
    }
    increases
}

#[cfg(test)]
const EXAMPLE: [i64; 10] = [199, 200, 208, 210, 200, 207, 240, 269, 260, 263];

#[test]
fn test_example() {
    assert_eq!(count_increases(EXAMPLE), 7);
    assert_eq!(count_window_increases(EXAMPLE), 5);
}

#[test]
fn test_short_sequences() {
    assert_eq!(count_increases([]), 0);
    assert_eq!(count_increases([5]), 0);
    assert_eq!(count_increases([5, 6]), 1);
    assert_eq!(count_window_increases([]), 0);
    assert_eq!(count_window_increases([1, 2, 3]), 0);
    assert_eq!(count_window_increases([1, 2, 3, 4]), 1);
    assert_eq!(count_window_increases([4, 2, 3, 4]), 0);
}

#[test]
fn test_window_increases_near_limits() {
    let depths = parse_depths(["9223372036854775807", "1", "0", "0"]).unwrap();
    assert_eq!(count_window_increases(depths.iter().copied()), 0);
    assert_eq!(count_window_increases([i64::MIN, i64::MAX, i64::MAX, i64::MAX]), 1);
}

#[cfg(test)]
fn all_sequences(max_len: usize, values: &[i64]) -> Vec<Vec<i64>> {
    let mut result: Vec<Vec<i64>> = vec![Vec::new()];
    let mut frontier: Vec<Vec<i64>> = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for seq in frontier.iter() {
            for v in values {
                let mut longer = seq.clone();
                longer.push(*v);
                next.push(longer);
            }
        }
        result.extend(next.iter().cloned());
        frontier = next;
    }
    result
}

#[test]
fn test_increases_match_pairwise_count() {
    for seq in all_sequences(6, &[-3, 0, 1, 7]) {
        let naive = (1..seq.len())
            .filter(|&i| (0..seq.len()).any(|j| j + 1 == i && seq[i] > seq[j]))
            .count();
        assert_eq!(count_increases(seq.iter().copied()), naive, "{:?}", seq);
    }
}

#[test]
fn test_window_increases_match_lagged_comparison() {
    for seq in all_sequences(7, &[-2, 0, 5]) {
        let lagged = (3..seq.len()).filter(|&i| seq[i] > seq[i - 3]).count();
        let sums: Vec<i64> = seq.windows(3).map(|w| w.iter().sum()).collect();
        let windowed = sums.windows(2).filter(|w| w[1] > w[0]).count();
        let got = count_window_increases(seq.iter().copied());
        assert_eq!(got, lagged, "{:?}", seq);
        assert_eq!(got, windowed, "{:?}", seq);
    }
}

fn part1(depths: &[i64]) {
    println!("a) {}", count_increases(depths.iter().copied()));
}

fn part2(depths: &[i64]) {
    println!("b) {}", count_window_increases(depths.iter().copied()));
}

fn run() -> Result<(), InputError> {
    let lines: Vec<String> = io::BufReader::new(io::stdin())
        .lines()
        .collect::<Result<_, _>>()?;
    let depths = parse_depths(&lines)?;
    event!(Level::INFO, "read {} depth readings", depths.len());
    part1(&depths);
    part2(&depths);
    Ok(())
}

fn log_filter() -> Result<EnvFilter, ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))
}

#[test]
fn test_log_filter() {
    assert!(log_filter().is_ok());
    assert!(EnvFilter::try_new("info").is_ok());
}

fn main() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);
    let filter_layer = match log_filter() {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

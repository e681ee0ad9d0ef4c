//! Day 17: a single `target area: x=..., y=...` line on stdin.
//!
//! Usage: `cargo run --bin day17 < input.txt`

use std::io;
use std::io::prelude::*;
use std::ops::RangeInclusive;
use std::str::FromStr;

use nom::{
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    sequence::{preceded, tuple},
    IResult,
};
use thiserror::Error;
use tracing::{event, span, Level};
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::prelude::*;

/// Candidates below this are always reported by part 1.
const APEX_CANDIDATES: i64 = 250;

#[derive(Debug, Error)]
enum TargetError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse target: {0}")]
    Parse(String),
    #[error("unexpected trailing junk: '{0}'")]
    TrailingJunk(String),
    #[error("target x={xmin}..{xmax}, y={ymin}..{ymax} is not right of and below the launch point")]
    WrongQuadrant {
        xmin: i32,
        xmax: i32,
        ymin: i32,
        ymax: i32,
    },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Position {
    x: i64,
    y: i64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Velocity {
    x: i64,
    y: i64,
}

/// Bounds are read as `i32` but held as `i64`, so apex heights and probe
/// positions for any readable target fit.
#[derive(Debug, Eq, PartialEq)]
struct Target {
    x: RangeInclusive<i64>,
    y: RangeInclusive<i64>,
}

impl Target {
    fn contains(&self, p: &Position) -> bool {
        self.x.contains(&p.x) && self.y.contains(&p.y)
    }

    /// True once the probe can no longer come back into the target.
    fn passed(&self, p: &Position) -> bool {
        p.x >= *self.x.end() || p.y <= *self.y.start()
    }
}

fn i32_parser(input: &str) -> IResult<&str, i32> {
    map_res(recognize(tuple((opt(char('-')), digit1))), FromStr::from_str)(input)
}

fn parse_range(input: &str) -> IResult<&str, (i32, i32)> {
    tuple((i32_parser, preceded(tag(".."), i32_parser)))(input)
}

fn parse_target(input: &str) -> IResult<&str, ((i32, i32), (i32, i32))> {
    preceded(
        tag("target area: x="),
        tuple((parse_range, preceded(tag(", y="), parse_range))),
    )(input)
}

fn maybe_swap(lesser: i32, greater: i32) -> (i32, i32) {
    if lesser <= greater {
        (lesser, greater)
    } else {
        (greater, lesser)
    }
}

impl TryFrom<&str> for Target {
    type Error = TargetError;
    fn try_from(s: &str) -> Result<Target, TargetError> {
        let s = s.trim_end();
        match parse_target(s) {
            Ok((unparsed, ((x0, x1), (y0, y1)))) => {
                if !unparsed.is_empty() {
                    return Err(TargetError::TrailingJunk(unparsed.to_string()));
                }
                let (xmin, xmax) = maybe_swap(x0, x1);
                let (ymin, ymax) = maybe_swap(y0, y1);
                if xmin <= 0 || ymax >= 0 {
                    return Err(TargetError::WrongQuadrant {
                        xmin,
                        xmax,
                        ymin,
                        ymax,
                    });
                }
                Ok(Target {
                    x: i64::from(xmin)..=i64::from(xmax),
                    y: i64::from(ymin)..=i64::from(ymax),
                })
            }
            Err(e) => Err(TargetError::Parse(format!("'{}': {}", s, e))),
        }
    }
}

#[cfg(test)]
fn example_target() -> Target {
    Target {
        x: 20..=30,
        y: -10..=-5,
    }
}

#[test]
fn test_parse_target() {
    assert_eq!(
        Target::try_from("target area: x=20..30, y=-10..-5\n").unwrap(),
        example_target()
    );
    assert_eq!(
        Target::try_from("target area: x=174..124, y=-86..-123").unwrap(),
        Target {
            x: 124..=174,
            y: -123..=-86,
        }
    );
    assert!(matches!(
        Target::try_from("target area: x=20..30, y=-10..-5 please"),
        Err(TargetError::TrailingJunk(_))
    ));
    assert!(matches!(
        Target::try_from("target area: x=20..30"),
        Err(TargetError::Parse(_))
    ));
    assert!(matches!(
        Target::try_from("target area: x=-30..-20, y=-10..-5"),
        Err(TargetError::WrongQuadrant { .. })
    ));
    assert!(matches!(
        Target::try_from("target area: x=20..30, y=-10..5"),
        Err(TargetError::WrongQuadrant { .. })
    ));
}

fn apex_height(v0: i64) -> i64 {
    v0 * (v0 + 1) / 2
}

/// Heights visited after the apex of a launch with vertical velocity
/// `v0`: the first step falls by 1, the next by 2, and so on.
fn descent(v0: i64) -> impl Iterator<Item = i64> {
    let mut height = apex_height(v0);
    let mut fall = 0;
    std::iter::from_fn(move || {
        fall += 1;
        height -= fall;
        Some(height)
    })
}

/// Does some height on the way down from the apex land within `range`?
fn lands_in(v0: i64, range: &RangeInclusive<i64>) -> bool {
    let floor = *range.start();
    let mut height = apex_height(v0);
    for next in descent(v0) {
        if height <= floor {
            break;
        }
        if range.contains(&next) {
            return true;
        }
        height = next;
    }
    false
}

#[test]
fn test_apex_height() {
    assert_eq!(apex_height(0), 0);
    assert_eq!(apex_height(1), 1);
    assert_eq!(apex_height(9), 45);
    assert_eq!(apex_height(122), 7503);
    assert_eq!(apex_height(46341), 1_073_767_311);
    assert_eq!(apex_height(i64::from(i32::MAX)), 2_305_843_008_139_952_128);
}

#[test]
fn test_descent() {
    assert_eq!(descent(3).take(5).collect::<Vec<_>>(), vec![5, 3, 0, -4, -9]);
    assert_eq!(descent(0).take(3).collect::<Vec<_>>(), vec![-1, -3, -6]);
}

#[test]
fn test_lands_in() {
    let target = example_target();
    assert!(lands_in(9, &target.y));
    assert!(!lands_in(10, &target.y));
    assert!(lands_in(2, &target.y));
    assert!(!lands_in(0, &(-5..=-4)));
    // Only heights on the way down count, never the apex.
    assert!(!lands_in(3, &(6..=6)));
}

fn apex_candidates(target: &Target) -> std::ops::Range<i64> {
    0..APEX_CANDIDATES.max(1 - *target.y.start())
}

#[test]
fn test_apex_candidates() {
    assert_eq!(apex_candidates(&example_target()), 0..250);
    let deep = Target {
        x: 1..=2,
        y: -400..=-300,
    };
    assert_eq!(apex_candidates(&deep), 0..401);
}

#[test]
fn test_deep_targets() {
    let target = Target::try_from("target area: x=1..2, y=-50000..-49000").unwrap();
    assert_eq!(apex_candidates(&target), 0..50001);
    assert!(lands_in(49999, &target.y));
    assert!(!lands_in(50000, &target.y));
    assert!(hits(Velocity { x: 1, y: 49999 }, &target));
    assert!(!hits(Velocity { x: 1, y: 50000 }, &target));

    let deepest = Target::try_from("target area: x=1..2147483647, y=-2147483648..-1").unwrap();
    assert_eq!(apex_candidates(&deepest).end, 2_147_483_649);
    assert_eq!(
        search_bounds(&deepest).next(),
        Some(Velocity {
            x: 1,
            y: -2_147_483_648
        })
    );
    assert_eq!(apex_height(2_147_483_648), 2_305_843_010_287_435_776);
    assert!(hits(Velocity { x: 1, y: -2_147_483_648 }, &deepest));
}

#[derive(Debug, Clone)]
struct Probe {
    position: Position,
    velocity: Velocity,
}

impl Probe {
    fn launch(velocity: Velocity) -> Probe {
        Probe {
            position: Position { x: 0, y: 0 },
            velocity,
        }
    }

    fn step(&mut self) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.velocity.y -= 1;
        if self.velocity.x > 0 {
            self.velocity.x -= 1;
        }
    }
}

#[test]
fn test_step() {
    let mut probe = Probe::launch(Velocity { x: 2, y: 1 });
    probe.step();
    assert_eq!(probe.position, Position { x: 2, y: 1 });
    assert_eq!(probe.velocity, Velocity { x: 1, y: 0 });
    probe.step();
    probe.step();
    assert_eq!(probe.position, Position { x: 3, y: 0 });
    assert_eq!(probe.velocity, Velocity { x: 0, y: -2 });
    probe.step();
    assert_eq!(probe.position, Position { x: 3, y: -2 });
    assert_eq!(probe.velocity, Velocity { x: 0, y: -3 });
}

/// Positions of a probe after each step, until it has passed the target.
fn flight(velocity: Velocity, target: &Target) -> impl Iterator<Item = Position> + '_ {
    let mut probe = Probe::launch(velocity);
    std::iter::from_fn(move || {
        if target.passed(&probe.position) {
            None
        } else {
            probe.step();
            event!(
                Level::TRACE,
                "flight: v={:?}: x={:>4}, y={:>5}",
                velocity,
                probe.position.x,
                probe.position.y,
            );
            Some(probe.position)
        }
    })
}

fn hits(velocity: Velocity, target: &Target) -> bool {
    flight(velocity, target).any(|p| target.contains(&p))
}

#[test]
fn test_flight() {
    let target = example_target();
    let positions: Vec<(i64, i64)> = flight(Velocity { x: 7, y: 2 }, &target)
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(
        positions,
        vec![
            (7, 2),
            (13, 3),
            (18, 3),
            (22, 2),
            (25, 0),
            (27, -3),
            (28, -7),
            (28, -12),
        ]
    );
}

#[test]
fn test_flight_is_deterministic() {
    let target = example_target();
    for v in [Velocity { x: 6, y: 9 }, Velocity { x: 17, y: -4 }] {
        let first: Vec<Position> = flight(v, &target).collect();
        let second: Vec<Position> = flight(v, &target).collect();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}

#[test]
fn test_hits() {
    let target = example_target();
    assert!(hits(Velocity { x: 7, y: 2 }, &target));
    assert!(hits(Velocity { x: 6, y: 3 }, &target));
    assert!(hits(Velocity { x: 9, y: 0 }, &target));
    assert!(hits(Velocity { x: 6, y: 9 }, &target));
    assert!(!hits(Velocity { x: 17, y: -4 }, &target));
    assert!(!hits(Velocity { x: 1000, y: 2 }, &target));
}

/// Every velocity worth trying: anything faster sideways than the far
/// edge overshoots on the first step, and anything steeper than the
/// deepest edge skips over the target on the way down.
fn search_bounds(target: &Target) -> impl Iterator<Item = Velocity> {
    let vx_max = *target.x.end();
    let vy_max = target.y.start().abs().max(target.y.end().abs());
    (1..=vx_max).flat_map(move |x| (-vy_max..=vy_max).map(move |y| Velocity { x, y }))
}

fn hitting_velocities(target: &Target) -> Vec<Velocity> {
    let span = span!(Level::ERROR, "search", target=?target);
    let _enter = span.enter();
    search_bounds(target)
        .filter(|v| {
            let hit = hits(*v, target);
            if hit {
                event!(Level::DEBUG, "velocity {:?} hits the target", v);
            }
            hit
        })
        .collect()
}

#[test]
fn test_search_bounds() {
    let target = example_target();
    let velocities: Vec<Velocity> = search_bounds(&target).collect();
    assert_eq!(velocities.len(), 30 * 21);
    assert_eq!(velocities.first(), Some(&Velocity { x: 1, y: -10 }));
    assert_eq!(velocities.last(), Some(&Velocity { x: 30, y: 10 }));
}

#[test]
fn test_hitting_velocities() {
    let target = example_target();
    let velocities = hitting_velocities(&target);
    assert_eq!(velocities.len(), 112);
    assert!(velocities.contains(&Velocity { x: 7, y: 2 }));
    assert!(velocities.contains(&Velocity { x: 30, y: -10 }));
    assert!(!velocities.contains(&Velocity { x: 17, y: -4 }));
    // The search leaves the target untouched.
    assert_eq!(target, example_target());
}

/// Reports every apex candidate and returns the highest apex which lands.
fn part1(target: &Target) -> Option<i64> {
    let mut highest: Option<i64> = None;
    for v0 in apex_candidates(target) {
        if lands_in(v0, &target.y) {
            let apex = apex_height(v0);
            highest = Some(highest.map_or(apex, |h| h.max(apex)));
            println!("{} - 'jo' - {}", v0, apex);
        } else {
            println!("{} - ne", v0);
        }
    }
    event!(Level::INFO, "highest apex which lands in the target: {:?}", highest);
    highest
}

#[test]
fn test_part1() {
    assert_eq!(part1(&example_target()), Some(45));
    let shallow = Target {
        x: 1..=2,
        y: -5..=-4,
    };
    // 4 falls through 9, 7, 4, 0, -5; anything faster drops from 0 past -5.
    assert_eq!(part1(&shallow), Some(10));
}

fn part2(target: &Target) {
    println!("{}", hitting_velocities(target).len());
}

fn run() -> Result<(), TargetError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let target = Target::try_from(input.as_str())?;
    event!(Level::INFO, "target is {:?}", target);
    part1(&target);
    part2(&target);
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

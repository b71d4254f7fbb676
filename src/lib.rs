use std::{fmt, num::ParseIntError};

use itertools::Itertools;
use nom::{character::complete::digit1, combinator::all_consuming, Finish, IResult};
use tracing::{debug, trace};

mod error;

pub use error::CalorieError;

pub type Result<T> = std::result::Result<T, CalorieError>;

pub type ElfId = usize;

pub const MIN_TOP_N: usize = 1;
pub const MAX_TOP_N: usize = 99;

/// One group of calorie values. Id 0 is reserved for the sentinels that
/// pre-fill a [`TopN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elf {
    pub id: ElfId,
    pub total_cals: u64,
    pub num_items: usize,
}

impl Elf {
    pub fn new(id: ElfId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn sentinel() -> Self {
        Self::default()
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == 0
    }

    /// Returns the new total, or `None` if it would overflow. The elf is left
    /// untouched on overflow.
    pub fn add_calories(&mut self, cals: u64) -> Option<u64> {
        self.total_cals = self.total_cals.checked_add(cals)?;
        self.num_items += 1;
        Some(self.total_cals)
    }

    pub fn next(&self) -> Self {
        Self::new(self.id + 1)
    }
}

impl fmt::Display for Elf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(f, "(no elf): {} calories", self.total_cals)
        } else {
            write!(f, "elf #{}: {} calories", self.id, self.total_cals)
        }
    }
}

/// The N largest elves seen so far, descending by total. Always holds
/// exactly N entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopN {
    items: Vec<Elf>,
}

impl TopN {
    pub fn new(n: usize) -> Result<Self> {
        if !(MIN_TOP_N..=MAX_TOP_N).contains(&n) {
            return Err(CalorieError::InvalidTopN {
                n,
                min: MIN_TOP_N,
                max: MAX_TOP_N,
            });
        }

        Ok(Self {
            items: vec![Elf::sentinel(); n],
        })
    }

    /// Inserts `candidate` before the first entry it strictly beats and drops
    /// the smallest entry. Returns whether the candidate made it in.
    pub fn consider(&mut self, candidate: Elf) -> bool {
        match self
            .items
            .iter()
            .position(|item| item.total_cals < candidate.total_cals)
        {
            Some(i) => {
                self.items.insert(i, candidate);
                self.items.pop();
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[Elf] {
        &self.items
    }

    pub fn totals(&self) -> Vec<u64> {
        self.items.iter().map(|elf| elf.total_cals).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn combined(&self) -> Result<Combined> {
        self.items
            .iter()
            .try_fold(Combined::default(), |mut acc, elf| {
                acc.total_cals = acc.total_cals.checked_add(elf.total_cals)?;
                if !elf.is_sentinel() {
                    acc.ids.push(elf.id);
                }
                Some(acc)
            })
            .ok_or(CalorieError::CombinedOverflow)
    }
}

/// Sum over a [`TopN`] together with the ids of the real elves behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Combined {
    pub ids: Vec<ElfId>,
    pub total_cals: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Calories(u64),
    Separator,
}

fn parse_calories(i: &str) -> IResult<&str, &str> {
    all_consuming(digit1)(i)
}

/// Anything that isn't a run of digits (after trimming) ends the current
/// elf. Only a digit run too long for u64 is an error.
pub fn classify_line(line: &str) -> std::result::Result<Line, ParseIntError> {
    match parse_calories(line.trim()).finish() {
        Ok((_, digits)) => digits.parse().map(Line::Calories),
        Err(_) => Ok(Line::Separator),
    }
}

fn close_elf(top_n: &mut TopN, elf: Elf) {
    let kept = top_n.consider(elf);
    debug!(
        elf = elf.id,
        total = elf.total_cals,
        items = elf.num_items,
        kept,
        "elf closed"
    );
}

pub fn process_list(input: impl Iterator<Item = impl Into<String>>, n: usize) -> Result<TopN> {
    let mut top_n = TopN::new(n)?;
    let mut elf = Elf::new(1);

    for (i, line) in input.enumerate() {
        let line: String = line.into();
        let line_no = i + 1;

        let line_kind = classify_line(&line).map_err(|_| CalorieError::ValueTooLarge {
            line: line_no,
            value: line.trim().to_string(),
        })?;

        match line_kind {
            Line::Calories(cals) => {
                elf.add_calories(cals)
                    .ok_or(CalorieError::TotalOverflow {
                        line: line_no,
                        elf: elf.id,
                    })?;
            }
            Line::Separator => {
                trace!(line = line_no, "separator");
                close_elf(&mut top_n, elf);
                elf = elf.next();
            }
        }
    }

    // Input without a trailing blank line still has a pending elf.
    if elf.num_items > 0 {
        close_elf(&mut top_n, elf);
    }

    debug!(totals = %top_n.totals().iter().join(", "), "scan finished");

    Ok(top_n)
}

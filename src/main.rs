use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use calorie_counting::{process_list, TopN, MAX_TOP_N, MIN_TOP_N};
use clap::Parser;
use itertools::Itertools;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Find the elves holding the most calories (Advent of Code: Day 1)
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File holding zero or more calorie lists, one value per line. A blank
    /// line ends an elf's list. Use `-` to read standard input.
    #[arg(value_name = "FILE")]
    calories_file: PathBuf,

    /// Report the combined calories held by the top N elves.
    #[arg(
        value_name = "N",
        value_parser = clap::value_parser!(u8).range((MIN_TOP_N as i64)..=(MAX_TOP_N as i64))
    )]
    top_n: u8,
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file = File::open(path).with_context(|| {
        format!(
            "The FILE {} is not available or can't be opened",
            path.display()
        )
    })?;

    Ok(Box::new(BufReader::new(file)))
}

fn write_report(out: &mut impl Write, top_n: &TopN) -> Result<()> {
    let combined = top_n.combined()?;

    writeln!(out, "Top {} elves:", top_n.len())?;
    for elf in top_n.items() {
        writeln!(out, "    {elf}")?;
    }
    writeln!(out)?;
    if combined.ids.is_empty() {
        writeln!(out, "Combined: {}", combined.total_cals)?;
    } else {
        writeln!(
            out,
            "Combined: {} (elves {})",
            combined.total_cals,
            combined.ids.iter().map(|id| format!("#{id}")).join(", ")
        )?;
    }

    info!(ids = ?combined.ids, total = combined.total_cals, "combined");

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!(file = %args.calories_file.display(), n = args.top_n, "reading calories");

    let lines = open_input(&args.calories_file)?
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read {}", args.calories_file.display()))?;

    let top_n = process_list(lines.into_iter(), args.top_n.into())?;

    let stdout = io::stdout();
    write_report(&mut stdout.lock(), &top_n)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn args_definition() {
        Args::command().debug_assert();
    }

    #[rstest]
    #[case("1", 1)]
    #[case("3", 3)]
    #[case("99", 99)]
    fn args_top_n_ok(#[case] n: &str, #[case] expected: u8) {
        let args = Args::try_parse_from(["calorie-counting", "input.txt", n]);

        assert!(args.is_ok());

        let args = args.unwrap();
        assert_eq!(args.top_n, expected);
        assert_eq!(args.calories_file, PathBuf::from("input.txt"));
    }

    #[rstest]
    #[case(&["calorie-counting", "input.txt", "0"])]
    #[case(&["calorie-counting", "input.txt", "100"])]
    #[case(&["calorie-counting", "input.txt", "-1"])]
    #[case(&["calorie-counting", "input.txt", "three"])]
    #[case(&["calorie-counting", "input.txt"])]
    #[case(&["calorie-counting"])]
    fn args_rejected(#[case] argv: &[&str]) {
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let res = open_input(Path::new("this/file/does/not/exist.txt"));

        assert!(res.is_err());
        assert!(res
            .err()
            .unwrap()
            .to_string()
            .contains("this/file/does/not/exist.txt"));
    }

    #[test]
    fn report_without_elves() {
        let top_n = process_list(std::iter::empty::<String>(), 1).unwrap();
        let mut out = Vec::new();

        write_report(&mut out, &top_n).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Top 1 elves:\n    (no elf): 0 calories\n\nCombined: 0\n"
        );
    }

    #[test]
    fn open_input_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("calories.txt");
        std::fs::write(
            &path,
            "1000\n2000\n3000\n\n4000\n\n5000\n6000\n\n7000\n8000\n9000\n\n10000\n",
        )
        .unwrap();

        let reader = open_input(&path);

        assert!(reader.is_ok());

        let lines = reader
            .unwrap()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .unwrap();
        let top_n = process_list(lines.into_iter(), 3).unwrap();
        assert_eq!(top_n.totals(), vec![24000, 11000, 10000]);
    }

    #[test]
    fn open_input_dash_is_stdin() {
        assert!(open_input(Path::new("-")).is_ok());
    }

    #[test]
    fn report_example() {
        let input = "1000\n2000\n3000\n\n4000\n\n5000\n6000\n\n7000\n8000\n9000\n\n10000";
        let top_n = process_list(input.lines(), 3).unwrap();
        let mut out = Vec::new();

        let res = write_report(&mut out, &top_n);

        assert!(res.is_ok());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r"Top 3 elves:
    elf #4: 24000 calories
    elf #3: 11000 calories
    elf #5: 10000 calories

Combined: 45000 (elves #4, #3, #5)
"
        );
    }

    #[test]
    fn report_pads_with_sentinels() {
        let top_n = process_list("7".lines(), 2).unwrap();
        let mut out = Vec::new();

        write_report(&mut out, &top_n).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Top 2 elves:\n    elf #1: 7 calories\n    (no elf): 0 calories\n\nCombined: 7 (elves #1)\n"
        );
    }
}

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use peaktree::{BoxDrawing, Hierarchy, IndentedList, Orientation, Riverflow, Tree};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "peaktree",
    about = "Print a tree of peak regions. Regions are written in slice notation."
)]
struct Cli {
    /// File to read data from (stdin when absent or `-`).
    input: Option<PathBuf>,
    /// Column delimiter (default: any whitespace).
    #[arg(short, long)]
    delimiter: Option<String>,
    /// Column number (count from 1) holding the data.
    #[arg(short, long, default_value_t = 1)]
    field: usize,
    /// Print valley regions instead of peak regions.
    #[arg(short, long)]
    valleys: bool,
    /// Tree layout.
    #[arg(long, value_enum, default_value_t = Format::Box)]
    format: Format,
    /// Print only the outermost regions smaller than this size.
    #[arg(long, conflicts_with = "fraction")]
    maxsize: Option<f64>,
    /// Like --maxsize, as a fraction of the root size. Pass the value as
    /// `--fraction=<F>`; a bare `--fraction` uses 0.2.
    #[arg(long, value_name = "F", require_equals = true, num_args = 0..=1)]
    fraction: Option<Option<f64>>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    /// Box-drawing characters
    Box,
    /// Indented list
    Indent,
    /// Main paths from tip to full node
    Riverflow,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if cli.field == 0 {
        bail!("field numbers count from 1");
    }

    let values = match &cli.input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input file {}", path.display()))?;
            read_values(BufReader::new(file), cli.delimiter.as_deref(), cli.field)
                .with_context(|| format!("failed to read data from {}", path.display()))?
        }
        _ => read_values(io::stdin().lock(), cli.delimiter.as_deref(), cli.field)
            .context("failed to read data from stdin")?,
    };

    let orientation = if cli.valleys {
        Orientation::Valley
    } else {
        Orientation::Peak
    };
    tracing::info!(values = values.len(), %orientation, "building tree");
    let tree = Tree::from_values(&values, orientation).context("failed to build tree")?;

    let maxsize = cli.maxsize.or_else(|| match cli.fraction {
        Some(Some(fraction)) => Some(fraction * tree.size(tree.root())),
        Some(None) => Some(tree.default_maxsize()),
        None => None,
    });
    match maxsize {
        Some(maxsize) => {
            tracing::info!(maxsize, "size filter");
            for node in tree.size_filter(tree.root(), maxsize) {
                println!("{}", tree.label(node));
            }
        }
        None => match cli.format {
            Format::Box => println!("{}", BoxDrawing::new(&tree)),
            Format::Indent => println!("{}", IndentedList::new(&tree)),
            Format::Riverflow => print!("{}", Riverflow::new(&tree)),
        },
    }

    Ok(())
}

/// One value per line from column `field` (1-based)
fn read_values<R: BufRead>(reader: R, delimiter: Option<&str>, field: usize) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let column = match delimiter {
            Some(delimiter) => line.split(delimiter).nth(field - 1),
            None => line.split_whitespace().nth(field - 1),
        }
        .ok_or_else(|| anyhow::anyhow!("missing field {} on line {}", field, line_no + 1))?;

        let value: f64 = column.trim().parse().with_context(|| {
            format!("invalid number '{}' on line {}", column, line_no + 1)
        })?;
        values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_fraction_leaves_the_input_alone() {
        let cli = Cli::try_parse_from(["peaktree", "--fraction", "data.txt"]).unwrap();
        assert_eq!(cli.fraction, Some(None));
        assert_eq!(cli.input, Some(PathBuf::from("data.txt")));

        let cli = Cli::try_parse_from(["peaktree", "--fraction=0.3", "data.txt"]).unwrap();
        assert_eq!(cli.fraction, Some(Some(0.3)));
        assert!(Cli::try_parse_from(["peaktree", "--maxsize", "3", "--fraction"]).is_err());
    }

    #[test]
    fn test_read_values_by_column() {
        let input = "1,10\n2,30\n\n3,20\n";
        let values = read_values(input.as_bytes(), Some(","), 2).unwrap();
        assert_eq!(values, vec![10.0, 30.0, 20.0]);
    }

    #[test]
    fn test_read_values_whitespace() {
        let values = read_values("  4.5 \n-1\n".as_bytes(), None, 1).unwrap();
        assert_eq!(values, vec![4.5, -1.0]);
    }

    #[test]
    fn test_read_values_reports_bad_lines() {
        let err = read_values("1\nabc\n".as_bytes(), None, 1).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(read_values("1 2\n".as_bytes(), None, 3).is_err());
    }
}

use std::fmt::{Debug, Display};
use std::ops::AddAssign;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use tetra_core::{Shape, Tensor};

mod cases;

use cases::CaseFile;

#[derive(Parser)]
#[command(
    name = "tetra",
    about = "Tetra 4-D tensor harness",
    long_about = "Builds rank-4 tensors from literals, adds them with one-directional\nbroadcasting, and checks the results.",
    version
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the built-in example cases
    Demo,
    /// Add one tensor into another and print the result
    Add {
        /// Shape of the tensor being added into (comma-separated, 4 axes)
        #[arg(long, value_delimiter = ',', required = true)]
        shape: Vec<usize>,
        /// Elements of the tensor being added into (comma-separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        data: Vec<String>,
        /// Shape of the broadcast operand
        #[arg(long, value_delimiter = ',', required = true)]
        other_shape: Vec<usize>,
        /// Elements of the broadcast operand
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        other_data: Vec<String>,
        /// Element type
        #[arg(long, value_enum, default_value_t = DType::F64)]
        dtype: DType,
    },
    /// Run every case in a JSON case file
    Run {
        /// Path to the case file
        path: PathBuf,
    },
}

/// Element types the harness can instantiate tensors with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    F32,
    #[default]
    F64,
    I32,
    I64,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Demo => {
            let file = CaseFile::parse(cases::DEMO_CASES)?;
            run_cases(&file)
        }
        Commands::Run { path } => {
            let file = CaseFile::load(&path)?;
            run_cases(&file)
        }
        Commands::Add {
            shape,
            data,
            other_shape,
            other_data,
            dtype,
        } => {
            let this_dims = parse_dims(&shape).context("--shape")?;
            let other_dims = parse_dims(&other_shape).context("--other-shape")?;
            let rendered = match dtype {
                DType::F32 => cmd_add::<f32>(this_dims, &data, other_dims, &other_data)?,
                DType::F64 => cmd_add::<f64>(this_dims, &data, other_dims, &other_data)?,
                DType::I32 => cmd_add::<i32>(this_dims, &data, other_dims, &other_data)?,
                DType::I64 => cmd_add::<i64>(this_dims, &data, other_dims, &other_data)?,
            };
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .unwrap_or_else(|err| {
            eprintln!("Failed to init logger: {}", err);
        });
}

fn parse_dims(dims: &[usize]) -> anyhow::Result<[usize; 4]> {
    Ok(Shape::try_from(dims)?.dims())
}

fn parse_elements<T>(raw: &[String]) -> anyhow::Result<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    raw.iter()
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|e| anyhow!("bad element {:?}: {}", s, e))
        })
        .collect()
}

fn cmd_add<T>(
    this_dims: [usize; 4],
    this_data: &[String],
    other_dims: [usize; 4],
    other_data: &[String],
) -> anyhow::Result<String>
where
    T: FromStr + AddAssign + Clone + Debug,
    T::Err: Display,
{
    let this_data: Vec<T> = parse_elements(this_data).context("--data")?;
    let other_data: Vec<T> = parse_elements(other_data).context("--other-data")?;

    let mut this = Tensor::new(this_dims, &this_data)?;
    let other = Tensor::new(other_dims, &other_data)?;
    this.add_(&other)?;
    Ok(this.to_string())
}

fn run_cases(file: &CaseFile) -> anyhow::Result<ExitCode> {
    let mut failed = 0usize;
    for case in &file.cases {
        let outcome = case.evaluate();
        let (cases::Outcome::Pass(detail) | cases::Outcome::Fail(detail)) = &outcome;
        if outcome.passed() {
            println!("[pass] {}: {}", case.name, detail);
        } else {
            failed += 1;
            println!("[FAIL] {}: {}", case.name, detail);
        }
    }
    println!(
        "\n{} passed, {} failed",
        file.cases.len() - failed,
        failed
    );
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::try_parse_from([
            "tetra",
            "add",
            "--shape",
            "1,1,1,3",
            "--data",
            "1,-2,3",
            "--other-shape",
            "1,1,1,1",
            "--other-data",
            "-1",
            "--dtype",
            "i32",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                shape,
                data,
                other_shape,
                other_data,
                dtype,
            } => {
                assert_eq!(shape, vec![1, 1, 1, 3]);
                assert_eq!(data, vec!["1", "-2", "3"]);
                assert_eq!(other_shape, vec![1, 1, 1, 1]);
                assert_eq!(other_data, vec!["-1"]);
                assert_eq!(dtype, DType::I32);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["tetra", "demo", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cmd_add_broadcasts() {
        let data: Vec<String> = ["1", "2", "3", "4"].iter().map(|s| s.to_string()).collect();
        let other: Vec<String> = vec!["10".into(), "20".into()];
        let out = cmd_add::<i64>([1, 1, 2, 2], &data, [1, 1, 2, 1], &other).unwrap();
        assert_eq!(out, "tensor([11, 12, 23, 24], shape=[1, 1, 2, 2])");
    }

    #[test]
    fn test_cmd_add_rejects_reverse_broadcast() {
        let data: Vec<String> = vec!["1".into(), "2".into()];
        let other: Vec<String> = vec!["1".into(), "2".into(), "3".into(), "4".into()];
        let err = cmd_add::<f32>([1, 1, 2, 1], &data, [1, 1, 2, 2], &other).unwrap_err();
        assert!(err.to_string().contains("Cannot broadcast"));
    }

    #[test]
    fn test_parse_dims_rank() {
        assert_eq!(parse_dims(&[1, 2, 3, 4]).unwrap(), [1, 2, 3, 4]);
        assert!(parse_dims(&[1, 2, 3]).is_err());
        assert!(parse_dims(&[1, 0, 3, 4]).is_err());
        assert!(parse_dims(&[usize::MAX, 2, 1, 1]).is_err());
    }

    #[test]
    fn test_bad_element() {
        let err = parse_elements::<i32>(&["1".into(), "x".into()]).unwrap_err();
        assert!(err.to_string().contains("bad element"));
    }
}

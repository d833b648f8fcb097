//! Command-line interface for pycritic.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use crate::analyze::Runner;
use crate::delegate::AstComplexityOracle;
use crate::report;
use crate::security::PatternScanner;

/// Exit codes.
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Static analysis for Python code review.
///
/// Analyzes one Python source file for syntax problems, estimated
/// algorithmic complexity, semantic issues, and code smells, and
/// prints a combined report.
#[derive(Parser)]
#[command(name = "pycritic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Python file to analyze ("-" reads stdin)
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Skip the built-in security scan
    #[arg(long)]
    pub no_security: bool,
}

/// Run an analysis and return the process exit code.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let source = read_source(cli)?;

    let oracle = AstComplexityOracle;
    let scanner = PatternScanner;
    let mut runner = Runner::new().with_complexity_oracle(&oracle);
    if !cli.no_security {
        runner = runner.with_security_scanner(&scanner);
    }

    let report = runner.run(&source);

    match cli.format.as_str() {
        "json" => report::write_json(&report)?,
        "pretty" => report::write_pretty(&cli.path.display().to_string(), &report),
        other => anyhow::bail!("unknown format {:?} (expected pretty or json)", other),
    }

    if report.fatal || report.has_high_findings() {
        Ok(EXIT_FINDINGS)
    } else {
        Ok(EXIT_CLEAN)
    }
}

fn read_source(cli: &Cli) -> anyhow::Result<String> {
    if cli.path.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(&cli.path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", cli.path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_for(path: PathBuf, format: &str) -> Cli {
        Cli {
            path,
            format: format.to_string(),
            no_security: false,
        }
    }

    #[test]
    fn test_run_clean_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "def add(a, b):\n    return a + b\n").unwrap();
        let code = run(&cli_for(file.path().to_path_buf(), "json")).unwrap();
        assert_eq!(code, EXIT_CLEAN);
    }

    #[test]
    fn test_run_fatal_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "def f(:\n").unwrap();
        let code = run(&cli_for(file.path().to_path_buf(), "json")).unwrap();
        assert_eq!(code, EXIT_FINDINGS);
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "x = 1\n").unwrap();
        assert!(run(&cli_for(file.path().to_path_buf(), "yaml")).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cli = cli_for(PathBuf::from("/nonexistent/file.py"), "json");
        assert!(run(&cli).is_err());
    }
}

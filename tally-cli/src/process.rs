use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Command, Stdio};

use tally_core::Ledger;
use tally_ingest::{SourceFormat, read_statement};
use tally_report::{ReportOptions, write_report};
use tracing::{info, warn};

/// Read a statement into a ledger. Missing files, structural defects and
/// statements with no usable rows are all errors.
pub fn load_ledger(input: &Path) -> Result<(SourceFormat, Ledger)> {
    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    let format = SourceFormat::from_path(input)?;
    let rows = read_statement(input).with_context(|| format!("reading {}", input.display()))?;
    let ledger = Ledger::from_rows(&rows);

    if ledger.is_empty() {
        bail!(
            "No transactions found in {} ({} rows read)",
            input.display(),
            rows.len()
        );
    }

    Ok((format, ledger))
}

pub fn render(ledger: &Ledger, output: &Path, options: &ReportOptions) -> Result<()> {
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    write_report(ledger, output, options)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(output = %output.display(), "report complete");
    Ok(())
}

pub fn print_summary(format: SourceFormat, ledger: &Ledger) {
    let s = ledger.summary();
    println!("Source: {}", format.label());
    println!("Found {} transactions", s.total_count);
    println!("  incoming: {:>5}  total {:>14.2}", s.incoming_count, s.incoming_total);
    println!("  outgoing: {:>5}  total {:>14.2}", s.outgoing_count, s.outgoing_total);
    println!("  net:             {:>14.2}", s.net());
}

/// Open the finished report. A missing or failing opener is reported and
/// otherwise ignored: the report is already on disk.
pub fn open_or_warn(path: &Path) -> bool {
    let target = path.display().to_string();
    launch_or_warn(&system_opener(&target))
}

fn system_opener(target: &str) -> Vec<&str> {
    if cfg!(target_os = "macos") {
        vec!["open", target]
    } else if cfg!(target_os = "windows") {
        vec!["cmd", "/C", "start", "", target]
    } else {
        vec!["xdg-open", target]
    }
}

fn launch_or_warn(argv: &[&str]) -> bool {
    match launch(argv) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "opener failed");
            eprintln!("Could not open file automatically: {e:#}");
            false
        }
    }
}

fn launch(argv: &[&str]) -> Result<()> {
    let (bin, args) = argv.split_first().context("empty argv")?;
    let status = Command::new(bin)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("running {bin}"))?;

    if !status.success() {
        bail!("{bin} failed with status: {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_input() {
        let err = load_ledger(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_empty_statement_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "Transaction History\nDate,Detail,Amount\n").unwrap();
        let err = load_ledger(&path).unwrap_err();
        assert!(err.to_string().contains("No transactions"));
    }

    #[test]
    fn test_missing_opener_is_only_a_warning() {
        assert!(!launch_or_warn(&["tally-opener-that-does-not-exist", "report.xlsx"]));
        assert!(!launch_or_warn(&[]));
    }

    #[test]
    fn test_opener_targets_the_report() {
        let argv = system_opener("out/report.xlsx");
        assert_eq!(argv.last(), Some(&"out/report.xlsx"));
    }

    #[test]
    fn test_process_csv_to_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("september.csv");
        fs::write(
            &input,
            "Transaction History\nDate,Detail,Amount\n2025/09/30,SALARY PAYMENT ABC LTD,\"1,500.00\"\n",
        )
        .unwrap();

        let (format, ledger) = load_ledger(&input).unwrap();
        assert_eq!(format, SourceFormat::Csv);

        let output = dir.path().join("out").join("report.xlsx");
        render(&ledger, &output, &ReportOptions::default()).unwrap();
        assert!(output.exists());
    }
}

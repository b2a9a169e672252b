use anyhow::{Result, bail};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tally_ingest::SourceFormat;

use crate::config::Config;
use crate::process::{load_ledger, open_or_warn, print_summary, render};

const OPEN_BY_DEFAULT: bool = true;

/// Line-oriented prompts over any reader/writer pair.
struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.out, "{label}: ")?;
        self.out.flush().ok();
        let mut s = String::new();
        if self.input.read_line(&mut s)? == 0 {
            bail!("input closed");
        }
        Ok(s.trim().to_string())
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.prompt(&format!("{label} [{hint}]"))?;
            match answer.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.out, "Please answer y or n.")?,
            }
        }
    }

    /// Ask until the answer names an existing file we know how to read.
    fn statement_path(&mut self) -> Result<(PathBuf, SourceFormat)> {
        loop {
            let raw = self.prompt("Path to bank statement (.csv or .pdf)")?;
            if raw.is_empty() {
                continue;
            }
            let path = PathBuf::from(unquote(&raw));
            if !path.is_file() {
                writeln!(self.out, "File not found: {}", path.display())?;
                continue;
            }
            match SourceFormat::from_path(&path) {
                Ok(format) => return Ok((path, format)),
                Err(e) => writeln!(self.out, "{e}")?,
            }
        }
    }

    fn output_path(&mut self, default: &Path) -> Result<PathBuf> {
        let answer = self.prompt(&format!("Output file [{}]", default.display()))?;
        Ok(with_xlsx_extension(unquote(&answer), default))
    }
}

/// Paths dragged into a terminal arrive wrapped in quotes.
fn unquote(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '"' || c == '\'')
}

fn with_xlsx_extension(answer: &str, default: &Path) -> PathBuf {
    if answer.is_empty() {
        return default.to_path_buf();
    }
    let has_xlsx = Path::new(answer)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    if has_xlsx {
        PathBuf::from(answer)
    } else {
        PathBuf::from(format!("{answer}.xlsx"))
    }
}

pub fn run_interactive(cfg: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut p = Prompter {
        input: stdin.lock(),
        out: io::stdout(),
    };

    println!("Tally: bank statement categorizer\n");

    let (input, format) = p.statement_path()?;
    println!("Detected {}", format.label());

    let output = p.output_path(&cfg.default_output(&input))?;

    let (format, ledger) = load_ledger(&input)?;
    println!();
    print_summary(format, &ledger);
    println!("\nReport: {}", output.display());

    if !p.confirm("Write the report?", true)? {
        println!("Cancelled.");
        return Ok(());
    }

    render(&ledger, &output, &cfg.report_options(format, None))?;
    println!("Wrote {}", output.display());

    if p.confirm("Open it now?", OPEN_BY_DEFAULT)? {
        open_or_warn(&output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter {
            input: Cursor::new(script.as_bytes().to_vec()),
            out: Vec::new(),
        }
    }

    #[test]
    fn test_statement_path_retries_until_valid() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        let csv = dir.path().join("sept.csv");
        fs::write(&txt, "x").unwrap();
        fs::write(&csv, "x").unwrap();

        let script = format!(
            "/nope.csv\n{}\n\"{}\"\n",
            txt.display(),
            csv.display()
        );
        let mut p = prompter(&script);
        let (path, format) = p.statement_path().unwrap();
        assert_eq!(path, csv);
        assert_eq!(format, SourceFormat::Csv);

        let shown = String::from_utf8(p.out).unwrap();
        assert!(shown.contains("File not found"));
        assert!(shown.contains("unsupported file type"));
    }

    #[test]
    fn test_output_name_gets_extension() {
        let default = Path::new("categorized_sept.xlsx");
        assert_eq!(with_xlsx_extension("", default), default);
        assert_eq!(with_xlsx_extension("march", default), Path::new("march.xlsx"));
        assert_eq!(with_xlsx_extension("march.XLSX", default), Path::new("march.XLSX"));
    }

    #[test]
    fn test_confirm() {
        let mut p = prompter("maybe\nY\n\n");
        assert!(p.confirm("Go?", false).unwrap());
        assert!(!p.confirm("Go?", false).unwrap());
    }

    #[test]
    fn test_blank_answer_opens_the_report() {
        let mut p = prompter("\n");
        assert!(p.confirm("Open it now?", OPEN_BY_DEFAULT).unwrap());
    }

    #[test]
    fn test_closed_input_stops() {
        let mut p = prompter("");
        assert!(p.statement_path().is_err());
    }
}

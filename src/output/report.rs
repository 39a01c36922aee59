//! Console report for batch rewrites

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::OutputConfig;
use crate::batch::FileReport;

/// Totals over a set of file reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub changed: usize,
    pub written: usize,
    pub errors: usize,
    pub edits: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Summary {
            files: reports.len(),
            ..Default::default()
        };
        for report in reports {
            if report.is_error() {
                summary.errors += 1;
            } else if !report.changes.is_empty() {
                summary.changed += 1;
                summary.edits += report.changes.edits;
            }
            if report.written {
                summary.written += 1;
            }
        }
        summary
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Write one line per file and a closing summary line.
pub fn write_reports<W: WriteColor>(
    out: &mut W,
    reports: &[FileReport],
    config: &OutputConfig,
) -> io::Result<()> {
    let width = reports
        .iter()
        .map(|r| r.path.display().to_string().chars().count())
        .max()
        .unwrap_or(0);

    for report in reports {
        if report.changes.is_empty() && !report.is_error() && !config.show_unchanged {
            continue;
        }

        let path = report.path.display().to_string();
        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        write!(out, "{:<width$}", path, width = width)?;
        out.reset()?;
        write!(out, "  ")?;

        if let Some(error) = &report.error {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(out, "error: {}", error)?;
            out.reset()?;
        } else if report.changes.is_empty() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
            write!(out, "no changes")?;
            out.reset()?;
        } else {
            write!(
                out,
                "{} in {}",
                plural(report.changes.edits, "edit"),
                plural(report.changes.cells_changed, "cell")
            )?;
            if report.written {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                write!(out, "  written")?;
                out.reset()?;
            }
        }
        writeln!(out)?;
    }

    let summary = Summary::from_reports(reports);
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    out.set_color(&bold)?;
    write!(
        out,
        "{}, {} changed",
        plural(summary.files, "file"),
        summary.changed
    )?;
    out.reset()?;
    if summary.written > 0 {
        write!(out, ", {} written", summary.written)?;
    }
    if summary.errors > 0 {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(out, ", {}", plural(summary.errors, "error"))?;
        out.reset()?;
    }
    writeln!(out)?;

    Ok(())
}

/// Print reports to stdout with optional color.
pub fn print_reports(reports: &[FileReport], config: &OutputConfig) -> io::Result<()> {
    let color_choice = if config.use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);
    write_reports(&mut stdout, reports, config)?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Changes;
    use crate::file_utils::SourceKind;
    use std::path::PathBuf;
    use termcolor::Buffer;

    fn report(path: &str, edits: usize, written: bool, error: Option<&str>) -> FileReport {
        FileReport {
            path: PathBuf::from(path),
            kind: SourceKind::from_path(std::path::Path::new(path)),
            changes: Changes {
                cells_changed: usize::from(edits > 0),
                edits,
            },
            written,
            error: error.map(str::to_string),
        }
    }

    fn render(reports: &[FileReport], show_unchanged: bool) -> String {
        let mut buf = Buffer::no_color();
        let config = OutputConfig {
            use_color: false,
            show_unchanged,
        };
        write_reports(&mut buf, reports, &config).unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let reports = vec![
            report("a.py", 2, true, None),
            report("b.py", 0, false, None),
            report("c.ipynb", 0, false, Some("invalid JSON")),
        ];
        assert_eq!(
            Summary::from_reports(&reports),
            Summary {
                files: 3,
                changed: 1,
                written: 1,
                errors: 1,
                edits: 2,
            }
        );
    }

    #[test]
    fn test_unchanged_hidden_by_default() {
        let reports = vec![report("a.py", 2, true, None), report("b.py", 0, false, None)];
        let out = render(&reports, false);
        assert_eq!(out, "a.py  2 edits in 1 cell  written\n2 files, 1 changed, 1 written\n");
    }

    #[test]
    fn test_unchanged_shown_on_request() {
        let reports = vec![report("a.py", 1, false, None), report("bb.py", 0, false, None)];
        let out = render(&reports, true);
        assert_eq!(
            out,
            "a.py   1 edit in 1 cell\nbb.py  no changes\n2 files, 1 changed\n"
        );
    }

    #[test]
    fn test_errors_always_listed() {
        let reports = vec![report("x.ipynb", 0, false, Some("not a notebook: missing 'cells'"))];
        let out = render(&reports, false);
        assert_eq!(
            out,
            "x.ipynb  error: not a notebook: missing 'cells'\n1 file, 0 changed, 1 error\n"
        );
    }
}

//! Directory traversal and per-file rewriting.
//!
//! Files are visited in file-name order so the report is deterministic. A
//! file that cannot be read, parsed or written is reported and skipped; the
//! walk always continues.

use std::fmt;
use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use remock_syntax::{Rewriter, SyntaxError};

/// Errors that stop a batch run.
#[derive(Debug, Error)]
pub(crate) enum BatchError {
    #[error("`{path}` is not a directory")]
    NotADirectory { path: Utf8PathBuf },
    #[error("failed to write the report: {0}")]
    Report(#[from] io::Error),
    #[error("failed to prepare the rewriter: {0}")]
    Rewriter(#[from] SyntaxError),
}

/// Settings for one batch run.
#[derive(Debug, Clone, Default)]
pub(crate) struct BatchOptions {
    pub(crate) dry_run: bool,
    /// Lower-cased extensions without leading dots.
    pub(crate) extensions: Vec<String>,
}

impl BatchOptions {
    fn accepts(&self, path: &Utf8Path) -> bool {
        path.extension().is_some_and(|extension| {
            self.extensions
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(extension))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Converted { conversions: usize },
    Unchanged,
    Skipped,
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BatchSummary {
    pub(crate) converted: usize,
    pub(crate) unchanged: usize,
    pub(crate) skipped: usize,
    pub(crate) conversions: usize,
}

impl BatchSummary {
    const fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Converted { conversions } => {
                self.converted = self.converted.saturating_add(1);
                self.conversions = self.conversions.saturating_add(conversions);
            }
            FileOutcome::Unchanged => self.unchanged = self.unchanged.saturating_add(1),
            FileOutcome::Skipped => self.skipped = self.skipped.saturating_add(1),
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted ({} constructs), {} unchanged, {} skipped",
            self.converted, self.conversions, self.unchanged, self.skipped
        )
    }
}

/// Rewrites every candidate file below `directory`, reporting to `report`.
pub(crate) fn process_directory<W: Write>(
    directory: &Utf8Path,
    options: &BatchOptions,
    report: &mut W,
) -> Result<BatchSummary, BatchError> {
    if !directory.is_dir() {
        return Err(BatchError::NotADirectory {
            path: directory.to_owned(),
        });
    }

    info!(%directory, dry_run = options.dry_run, "processing directory");
    let mut rewriter = Rewriter::new()?;
    let mut summary = BatchSummary::default();

    for entry in WalkDir::new(directory).sort_by_file_name() {
        let raw_path = match entry {
            Ok(found) if found.file_type().is_file() => found.into_path(),
            Ok(_) => continue,
            Err(error) => {
                warn!(%error, "failed to walk directory entry");
                if let Some(unreadable) = error.path() {
                    writeln!(report, "couldn't read {} skipped", unreadable.display())?;
                    summary.record(FileOutcome::Skipped);
                }
                continue;
            }
        };
        let path = match Utf8PathBuf::from_path_buf(raw_path) {
            Ok(utf8) => utf8,
            Err(raw) => {
                warn!(path = %raw.display(), "skipping non UTF-8 path");
                continue;
            }
        };
        if !options.accepts(&path) {
            continue;
        }

        writeln!(report, "Processing file: {path}")?;
        let outcome = process_file(&mut rewriter, &path, options.dry_run);
        match outcome {
            FileOutcome::Converted { .. } if options.dry_run => {
                writeln!(report, "would convert {path}")?;
            }
            FileOutcome::Converted { .. } => writeln!(report, "converted {path}")?,
            FileOutcome::Unchanged => writeln!(report, "unchanged {path}")?,
            FileOutcome::Skipped => writeln!(report, "couldn't read {path} skipped")?,
        }
        summary.record(outcome);
    }

    writeln!(report, "Done!")?;
    writeln!(report, "{summary}")?;
    Ok(summary)
}

fn process_file(rewriter: &mut Rewriter, path: &Utf8Path, dry_run: bool) -> FileOutcome {
    let source = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            warn!(%path, %error, "failed to read file");
            return FileOutcome::Skipped;
        }
    };

    let result = match rewriter.rewrite(&source) {
        Ok(rewritten) => rewritten,
        Err(error) => {
            warn!(%path, %error, "failed to rewrite file");
            return FileOutcome::Skipped;
        }
    };
    if result.output() == source {
        debug!(%path, "no constructs converted");
        return FileOutcome::Unchanged;
    }

    if !dry_run && let Err(error) = fs::write(path, result.output()) {
        warn!(%path, %error, "failed to write file");
        return FileOutcome::Skipped;
    }
    debug!(%path, conversions = result.conversions(), "file converted");
    FileOutcome::Converted {
        conversions: result.conversions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Tree {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    impl Tree {
        fn write(&self, relative: &str, contents: &str) -> Utf8PathBuf {
            let path = self.root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent");
            }
            fs::write(&path, contents).expect("write fixture");
            path
        }

        fn run(&self, dry_run: bool) -> (BatchSummary, String) {
            let options = BatchOptions {
                dry_run,
                extensions: vec!["rb".to_owned()],
            };
            let mut report = Vec::new();
            let summary =
                process_directory(&self.root, &options, &mut report).expect("batch run");
            let text = String::from_utf8(report).expect("utf-8 report");
            (summary, text.replace(self.root.as_str(), "<root>"))
        }
    }

    #[fixture]
    fn tree() -> Tree {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        Tree { _dir: dir, root }
    }

    #[rstest]
    fn converts_and_reports_in_order(tree: Tree) {
        let stubbed = tree.write("b/model_spec.rb", "subject.stubs(:valid?)\n");
        let untouched = tree.write("a_spec.rb", "expect(1).to eq(1)\n");
        tree.write("notes.txt", "subject.stubs(:valid?)\n");
        tree.write("broken_spec.rb", "foo.stubs(:bar\n");

        let (summary, report) = tree.run(false);

        assert_snapshot!(report.trim_end(), @r"
Processing file: <root>/a_spec.rb
unchanged <root>/a_spec.rb
Processing file: <root>/b/model_spec.rb
converted <root>/b/model_spec.rb
Processing file: <root>/broken_spec.rb
couldn't read <root>/broken_spec.rb skipped
Done!
1 converted (1 constructs), 1 unchanged, 1 skipped
");
        assert_eq!(summary.converted, 1);
        assert_eq!(
            fs::read_to_string(stubbed).expect("read"),
            "allow(subject).to receive(:valid?)\n"
        );
        assert_eq!(
            fs::read_to_string(untouched).expect("read"),
            "expect(1).to eq(1)\n"
        );
    }

    #[rstest]
    fn dry_run_leaves_files_alone(tree: Tree) {
        let path = tree.write("model_spec.rb", "subject.expects(:save).never\n");

        let (summary, report) = tree.run(true);

        assert!(report.contains("would convert <root>/model_spec.rb"));
        assert_eq!(summary.converted, 1);
        assert_eq!(
            fs::read_to_string(path).expect("read"),
            "subject.expects(:save).never\n"
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let options = BatchOptions::default();
        let mut report = Vec::new();

        let error = process_directory(Utf8Path::new("/nonexistent/remock"), &options, &mut report)
            .expect_err("should fail");

        assert!(matches!(error, BatchError::NotADirectory { .. }));
        assert!(report.is_empty());
    }

    #[rstest]
    #[case("spec/a_spec.rb", true)]
    #[case("Rakefile.RB", true)]
    #[case("spec/a_spec.py", false)]
    #[case("Gemfile", false)]
    fn options_filter_by_extension(#[case] path: &str, #[case] expected: bool) {
        let options = BatchOptions {
            dry_run: false,
            extensions: vec!["rb".to_owned()],
        };
        assert_eq!(options.accepts(Utf8Path::new(path)), expected);
    }
}

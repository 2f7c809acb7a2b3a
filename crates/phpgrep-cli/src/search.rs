//! Walking input paths and searching each PHP file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use phpgrep::{Matcher, Parser};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::AppError;
use crate::output::{MatchRecord, OutputFormat};

const SEARCH_TARGET: &str = "phpgrep_cli::search";

/// Options controlling how matches are reported.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchOptions {
    pub(crate) limit: Option<usize>,
    pub(crate) format: OutputFormat,
    pub(crate) captures: bool,
}

/// Searches files with one compiled matcher, counting printed matches.
pub(crate) struct Searcher {
    matcher: Matcher,
    parser: Parser,
    options: SearchOptions,
    printed: usize,
}

impl Searcher {
    pub(crate) fn new(matcher: Matcher, options: SearchOptions) -> Result<Self, AppError> {
        let parser = Parser::new().map_err(AppError::Parser)?;
        Ok(Self {
            matcher,
            parser,
            options,
            printed: 0,
        })
    }

    pub(crate) const fn printed(&self) -> usize {
        self.printed
    }

    pub(crate) fn limit_reached(&self) -> bool {
        self.options
            .limit
            .is_some_and(|limit| self.printed >= limit)
    }

    /// Searches a file, or every `*.php` file below a directory.
    ///
    /// Files named explicitly are searched whatever their extension.
    pub(crate) fn search_path<W: Write>(&mut self, path: &Path, out: &mut W) -> Result<(), AppError> {
        let metadata = fs::metadata(path).map_err(|source| read_error(path, source))?;
        if !metadata.is_dir() {
            return self.search_file(path, out);
        }

        let files = collect_php_files(path).map_err(|source| read_error(path, source))?;
        debug!(
            target: SEARCH_TARGET,
            dir = %path.display(),
            files = files.len(),
            "collected php files"
        );
        for file in files {
            if self.limit_reached() {
                break;
            }
            self.search_file(&file, out)?;
        }
        Ok(())
    }

    fn search_file<W: Write>(&mut self, path: &Path, out: &mut W) -> Result<(), AppError> {
        if self.limit_reached() {
            return Ok(());
        }
        let bytes = fs::read(path).map_err(|source| read_error(path, source))?;
        let source = String::from_utf8_lossy(&bytes);
        let file = match self.parser.parse(&source) {
            Ok(file) => file,
            Err(error) => {
                warn!(
                    target: SEARCH_TARGET,
                    path = %path.display(),
                    %error,
                    "skipping file that failed to parse"
                );
                return Ok(());
            }
        };

        let shown = path.display().to_string();
        let remaining = self
            .options
            .limit
            .map(|limit| limit.saturating_sub(self.printed));
        let mut records = Vec::new();
        let mut done = false;
        self.matcher.find(file.root(), |data| {
            if done {
                return false;
            }
            if let Some(record) = MatchRecord::new(&shown, &file, &data) {
                records.push(record);
            }
            done = remaining.is_some_and(|left| records.len() >= left);
            true
        });

        for record in &records {
            record.write(out, self.options.format, self.options.captures)?;
        }
        self.printed += records.len();
        debug!(
            target: SEARCH_TARGET,
            path = %shown,
            matches = records.len(),
            "searched file"
        );
        Ok(())
    }
}

fn read_error(path: &Path, source: io::Error) -> AppError {
    AppError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Collects `*.php` files below `dir`, sorted by name within each
/// directory. Symbolic links to directories are not followed.
fn collect_php_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for item in WalkDir::new(dir).sort_by_file_name() {
        let entry = item?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "php") && path.is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpgrep::Compiler;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn tree() -> TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        let nested = dir.path().join("src/nested");
        fs::create_dir_all(&nested).expect("create dirs");
        fs::write(dir.path().join("src/a.php"), "<?php f(1); f(2);\n").expect("write a");
        fs::write(nested.join("b.php"), "<?php f(3);\n").expect("write b");
        fs::write(nested.join("notes.txt"), "f(4);\n").expect("write txt");
        fs::write(dir.path().join("broken.php"), "<?php f(;\n").expect("write broken");
        dir
    }

    fn searcher(limit: Option<usize>) -> Searcher {
        let matcher = Compiler::new().compile("f($x)").expect("pattern compiles");
        Searcher::new(
            matcher,
            SearchOptions {
                limit,
                format: OutputFormat::Human,
                captures: false,
            },
        )
        .expect("searcher")
    }

    #[rstest]
    fn collects_php_files_recursively_in_order(tree: TempDir) {
        let files = collect_php_files(tree.path()).expect("walk");

        let names: Vec<_> = files
            .iter()
            .filter_map(|path| path.strip_prefix(tree.path()).ok())
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["broken.php", "src/a.php", "src/nested/b.php"]);
    }

    #[rstest]
    fn skips_unparseable_files(tree: TempDir) {
        let mut searcher = searcher(None);
        let mut out = Vec::new();

        searcher
            .search_path(tree.path(), &mut out)
            .expect("search succeeds");

        assert_eq!(searcher.printed(), 3);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(10, 3)]
    fn stops_at_the_limit(tree: TempDir, #[case] limit: usize, #[case] expected: usize) {
        let mut searcher = searcher(Some(limit));
        let mut out = Vec::new();

        searcher
            .search_path(tree.path(), &mut out)
            .expect("search succeeds");

        assert_eq!(searcher.printed(), expected);
        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(text.lines().count(), expected);
    }

    #[cfg(unix)]
    #[rstest]
    fn symlinked_directories_are_not_followed(tree: TempDir) {
        std::os::unix::fs::symlink(tree.path(), tree.path().join("src/loop")).expect("symlink");
        let mut searcher = searcher(None);
        let mut out = Vec::new();

        searcher
            .search_path(tree.path(), &mut out)
            .expect("search succeeds");

        assert_eq!(searcher.printed(), 3);
        let text = String::from_utf8(out).expect("utf-8");
        assert!(!text.contains("loop"), "walked into the link: {text}");
    }

    #[rstest]
    fn missing_paths_are_read_errors(tree: TempDir) {
        let mut searcher = searcher(None);
        let mut out = Vec::new();

        let err = searcher
            .search_path(&tree.path().join("missing.php"), &mut out)
            .expect_err("missing file");

        assert!(err.is_per_path());
    }
}

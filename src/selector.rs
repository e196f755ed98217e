//! File selection service shared by the batch commands.
//!
//! Every batch starts from the same bounded, ordered file list: enumerate a
//! source directory (optionally recursive), narrow by a case-insensitive
//! substring, and finally narrow by an allow-list file. Each command owns one
//! selector instance; selection itself never mutates anything.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::FilekitError;

/// An allow-list source: a plain text file with one name per line, or a CSV
/// from which a single named column is read.
#[derive(Debug, Clone)]
pub struct FilterList {
    pub path: PathBuf,
    /// Column header to extract. Without it every line is a file name.
    pub header: Option<String>,
    pub separator: String,
}

impl FilterList {
    pub fn new(path: PathBuf, header: Option<String>, separator: String) -> Self {
        Self {
            path,
            header,
            separator,
        }
    }

    /// Read the allow-listed names. A header that the first row does not
    /// contain aborts the whole batch; the error lists the headers found.
    fn load(&self) -> Result<HashSet<String>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read filter list {}", self.path.display()))?;

        let Some(header) = &self.header else {
            return Ok(content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect());
        };

        let mut lines = content.lines();
        let first = lines.next().unwrap_or_default();
        let headers: Vec<String> = first
            .split(self.separator.as_str())
            .map(|h| h.trim().to_string())
            .collect();
        let idx = headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| FilekitError::FilterHeaderMissing {
                header: header.clone(),
                found: headers.clone(),
            })?;

        Ok(lines
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| l.split(self.separator.as_str()).nth(idx))
            .map(|v| v.trim().to_string())
            .collect())
    }
}

/// Enumerates candidate files from a source directory.
#[derive(Debug, Clone)]
pub struct FileSelector {
    pub dir_source: PathBuf,
    pub recursive: bool,
    /// Case-insensitive substring the file name must contain.
    pub filterstring: Option<String>,
    pub filterlist: Option<FilterList>,
}

impl FileSelector {
    /// Collect the files to process, in stable (name-sorted) enumeration
    /// order. Directories are never selected.
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let needle = self.filterstring.as_deref().map(str::to_lowercase);

        let mut files: Vec<PathBuf> = WalkDir::new(&self.dir_source)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| match &needle {
                Some(n) => p
                    .file_name()
                    .map(|s| s.to_string_lossy().to_lowercase().contains(n))
                    .unwrap_or(false),
                None => true,
            })
            .collect();

        if let Some(list) = &self.filterlist {
            let names = list.load()?;
            files.retain(|p| {
                p.file_name()
                    .map(|n| names.contains(n.to_string_lossy().as_ref()))
                    .unwrap_or(false)
            });
        }

        debug!(count = files.len(), dir = %self.dir_source.display(), "selected files");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn selector(dir: &std::path::Path) -> FileSelector {
        FileSelector {
            dir_source: dir.to_path_buf(),
            recursive: false,
            filterstring: None,
            filterlist: None,
        }
    }

    #[test]
    fn non_recursive_skips_subdirectories() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("top.txt"), b"x").unwrap();
        fs::create_dir(td.path().join("sub")).unwrap();
        fs::write(td.path().join("sub").join("deep.txt"), b"x").unwrap();

        let files = selector(td.path()).collect().unwrap();
        assert_eq!(files, vec![td.path().join("top.txt")]);

        let mut sel = selector(td.path());
        sel.recursive = true;
        assert_eq!(sel.collect().unwrap().len(), 2);
    }

    #[test]
    fn filterstring_is_case_insensitive() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("Report.TXT"), b"x").unwrap();
        fs::write(td.path().join("other.dat"), b"x").unwrap();

        let mut sel = selector(td.path());
        sel.filterstring = Some("report".into());
        let files = sel.collect().unwrap();
        assert_eq!(files, vec![td.path().join("Report.TXT")]);
    }

    #[test]
    fn filterlist_plain_lines() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"x").unwrap();
        fs::write(td.path().join("b.txt"), b"x").unwrap();
        let list = td.path().join("names.txt");
        fs::write(&list, "a.txt\n").unwrap();

        let mut sel = selector(td.path());
        sel.filterlist = Some(FilterList::new(list, None, ",".into()));
        let files = sel.collect().unwrap();
        assert_eq!(files, vec![td.path().join("a.txt")]);
    }

    #[test]
    fn filterlist_csv_column() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"x").unwrap();
        fs::write(td.path().join("b.txt"), b"x").unwrap();
        let list = td.path().join("names.csv");
        fs::write(&list, "id;name\n1;b.txt\n2;missing.txt\n").unwrap();

        let mut sel = selector(td.path());
        sel.filterlist = Some(FilterList::new(list, Some("name".into()), ";".into()));
        let files = sel.collect().unwrap();
        assert_eq!(files, vec![td.path().join("b.txt")]);
    }

    #[test]
    fn missing_csv_header_is_fatal_and_lists_headers() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"x").unwrap();
        let list = td.path().join("names.csv");
        fs::write(&list, "id,label\n1,a.txt\n").unwrap();

        let mut sel = selector(td.path());
        sel.filterlist = Some(FilterList::new(list, Some("name".into()), ",".into()));
        let err = sel.collect().unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("no column 'name'"), "got: {msg}");
        assert!(msg.contains("id, label"), "got: {msg}");
    }
}

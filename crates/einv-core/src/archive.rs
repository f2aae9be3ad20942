//! Extraction of the consolidated PDF from e-invoice ZIP archives.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, glob_with};
use tracing::{debug, info, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::ArchiveError;
use crate::models::report::ArchiveReport;

/// Read the member named `member` out of the archive at `archive_path`.
pub fn extract_single_file(archive_path: &Path, member: &str) -> Result<Vec<u8>, ArchiveError> {
    let file = File::open(archive_path).map_err(|source| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;

    let mut archive = ZipArchive::new(file).map_err(|e| ArchiveError::Invalid {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut entry = match archive.by_name(member) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(ArchiveError::MemberNotFound {
                path: archive_path.to_path_buf(),
                member: member.to_string(),
            });
        }
        Err(e) => {
            return Err(ArchiveError::Invalid {
                path: archive_path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let mut data = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut data).map_err(|source| ArchiveError::Extract {
        path: archive_path.to_path_buf(),
        member: member.to_string(),
        source,
    })?;

    debug!("Read {} bytes of {} from {}", data.len(), member, archive_path.display());
    Ok(data)
}

/// Extract `member` into `staging_dir`, then rename it to `<archive stem>.pdf`.
pub fn extract_to_staging(
    archive_path: &Path,
    member: &str,
    staging_dir: &Path,
) -> Result<PathBuf, ArchiveError> {
    let data = extract_single_file(archive_path, member)?;

    let extract_err = |source: io::Error| ArchiveError::Extract {
        path: archive_path.to_path_buf(),
        member: member.to_string(),
        source,
    };

    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| extract_err(io::Error::new(io::ErrorKind::InvalidInput, "archive has no file stem")))?;

    // The member name may carry directories; only its file name lands in staging
    let member_file = Path::new(member).file_name().unwrap_or(OsStr::new(member));
    let extracted = staging_dir.join(member_file);
    fs::write(&extracted, &data).map_err(extract_err)?;

    let target = staging_dir.join(format!("{}.pdf", stem));
    fs::rename(&extracted, &target).map_err(extract_err)?;

    info!("Extracted {} -> {}", archive_path.display(), target.display());
    Ok(target)
}

/// List files with `extension` directly inside `dir`, sorted by name.
///
/// The extension is matched case-insensitively.
pub fn list_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(extension)
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files: Vec<PathBuf> = glob_with(&pattern, options)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Extract every archive in `archives_dir` into `staging_dir`.
///
/// A failing archive is logged and reported; the rest are still processed.
pub fn extract_archives(
    archives_dir: &Path,
    extension: &str,
    member: &str,
    staging_dir: &Path,
) -> io::Result<Vec<ArchiveReport>> {
    let archives = list_files(archives_dir, extension)?;
    info!("Found {} archives in {}", archives.len(), archives_dir.display());

    Ok(archives
        .into_iter()
        .map(|archive| {
            let result = extract_to_staging(&archive, member, staging_dir);
            if let Err(e) = &result {
                warn!("{}", e);
            }
            ArchiveReport { archive, result }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("a.zip");
        write_zip(&zip_path, &[("readme.txt", b"hi"), ("einv1.pdf", b"%PDF-1.5 body")]);

        let data = extract_single_file(&zip_path, "einv1.pdf").unwrap();
        assert_eq!(data, b"%PDF-1.5 body");
    }

    #[test]
    fn test_missing_member() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("a.zip");
        write_zip(&zip_path, &[("other.pdf", b"x")]);

        let err = extract_single_file(&zip_path, "einv1.pdf").unwrap_err();
        assert!(matches!(err, ArchiveError::MemberNotFound { .. }));
        assert_eq!(err.to_string(), format!("einv1.pdf not found in {}", zip_path.display()));
    }

    #[test]
    fn test_invalid_archive() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("bad.zip");
        fs::write(&zip_path, b"definitely not a zip").unwrap();

        let err = extract_single_file(&zip_path, "einv1.pdf").unwrap_err();
        assert!(matches!(err, ArchiveError::Invalid { .. }));
    }

    #[test]
    fn test_extract_to_staging_renames_to_stem() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        fs::create_dir(&staging).unwrap();
        let zip_path = dir.path().join("GSTIN_0042.zip");
        write_zip(&zip_path, &[("einv1.pdf", b"pdf")]);

        let target = extract_to_staging(&zip_path, "einv1.pdf", &staging).unwrap();

        assert_eq!(target, staging.join("GSTIN_0042.pdf"));
        assert_eq!(fs::read(&target).unwrap(), b"pdf");
        assert!(!staging.join("einv1.pdf").exists());
    }

    #[test]
    fn test_list_files_matches_extension_only() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("in [2024]");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("b.zip"), b"").unwrap();
        fs::write(folder.join("a.ZIP"), b"").unwrap();
        fs::write(folder.join("c.zip.txt"), b"").unwrap();
        fs::create_dir(folder.join("nested.zip")).unwrap();

        let files = list_files(&folder, "zip").unwrap();

        assert_eq!(files, vec![folder.join("a.ZIP"), folder.join("b.zip")]);
    }

    #[test]
    fn test_list_files_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(dir.path(), "pdf").unwrap().is_empty());
    }

    #[test]
    fn test_extract_archives_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let archives = dir.path().join("archives");
        let staging = dir.path().join("staging");
        fs::create_dir(&archives).unwrap();
        fs::create_dir(&staging).unwrap();

        fs::write(archives.join("a.zip"), b"broken").unwrap();
        write_zip(&archives.join("b.zip"), &[("einv1.pdf", b"b")]);
        fs::write(archives.join("notes.txt"), b"ignored").unwrap();

        let reports = extract_archives(&archives, "zip", "einv1.pdf", &staging).unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports[0].result.is_err());
        assert_eq!(reports[1].result.as_ref().unwrap(), &staging.join("b.pdf"));
    }
}

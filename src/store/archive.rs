//! # Theme Archives
//!
//! Export and import of Theme Directories as zip files.
//!
//! ## Layout
//!
//! ```text
//! nord.zip
//! └── nord/
//!     ├── theme.json
//!     ├── alacritty.toml
//!     ├── ...
//!     └── wallpapers/        (optional)
//! ```
//!
//! Import requires exactly one top-level directory containing a valid
//! `theme.json`. On a name collision the theme is imported as `<slug>-1`,
//! `<slug>-2`, ... instead of overwriting. Generated files missing from the
//! archive are rendered from its `theme.json`.

use super::directory::write_missing;
use super::fs::staging_dir;
use crate::error::{Result, ThemeError};
use crate::theme::{slugify, ThemeMetadata, THEME_FILE};
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Prefix of a local zip file header.
pub(crate) const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Metadata some archivers add at the top level; ignored on import.
const IGNORED_TOP_LEVEL: &[&str] = &["__MACOSX", ".DS_Store"];

/// Write the Theme Directory at `dir` to a zip at `dest`, rooted at `slug/`.
pub fn export(dir: &Path, slug: &str, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(ThemeError::io(parent))?;
    let tmp = tempfile::NamedTempFile::new_in(parent).map_err(ThemeError::io(parent))?;

    let mut writer = ZipWriter::new(tmp.reopen().map_err(ThemeError::io(dest))?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.add_directory(format!("{slug}/"), options)?;
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ThemeError::from_io(dir, e.into()))?;
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| ThemeError::Archive(format!("bad path {}", entry.path().display())))?;
        let name = format!("{slug}/{}", zip_name(rel));
        if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut file = File::open(entry.path()).map_err(ThemeError::io(entry.path()))?;
            io::copy(&mut file, &mut writer).map_err(ThemeError::io(entry.path()))?;
        }
    }
    writer.finish()?;

    tmp.persist(dest)
        .map_err(|e| ThemeError::from_io(dest, e.error))?;
    tracing::info!(theme = slug, path = %dest.display(), "Exported theme archive");
    Ok(())
}

fn zip_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The first free slug among `base`, `base-1`, `base-2`, ... for which
/// `taken` returns false.
pub fn unique_slug(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1u32..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// What an archive contains, after validation.
struct ArchivePlan {
    top: String,
    metadata: ThemeMetadata,
}

fn inspect<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<ArchivePlan> {
    if archive.len() == 0 {
        return Err(ThemeError::Archive("archive is empty".to_string()));
    }

    let mut top: Option<String> = None;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        let path = entry
            .enclosed_name()
            .ok_or_else(|| ThemeError::Archive(format!("unsafe path '{}'", entry.name())))?;
        let Some(Component::Normal(first)) = path.components().next() else {
            continue;
        };
        let first = first.to_string_lossy().into_owned();
        if IGNORED_TOP_LEVEL.contains(&first.as_str()) {
            continue;
        }
        if path.components().count() == 1 && !entry.is_dir() {
            return Err(ThemeError::Archive(format!(
                "file '{first}' is outside the theme directory"
            )));
        }
        match &top {
            None => top = Some(first),
            Some(existing) if *existing != first => {
                return Err(ThemeError::Archive(format!(
                    "expected one top-level directory, found '{existing}' and '{first}'"
                )))
            }
            Some(_) => {}
        }
    }

    let top = top.ok_or_else(|| ThemeError::Archive("archive has no theme directory".to_string()))?;
    let mut text = String::new();
    archive
        .by_name(&format!("{top}/{THEME_FILE}"))
        .map_err(|_| ThemeError::Archive(format!("'{top}/{THEME_FILE}' is missing")))?
        .read_to_string(&mut text)
        .map_err(|e| ThemeError::Archive(format!("unreadable {THEME_FILE}: {e}")))?;
    let metadata = ThemeMetadata::from_json(&text)?;
    Ok(ArchivePlan { top, metadata })
}

/// Import the archive at `archive_path` into `custom_root`.
///
/// `taken` reports slugs already in use (in either root). Returns the slug
/// the theme was imported under.
pub fn import(archive_path: &Path, custom_root: &Path, taken: impl Fn(&str) -> bool) -> Result<String> {
    let size = fs::metadata(archive_path)
        .map_err(ThemeError::io(archive_path))?
        .len();
    if size == 0 {
        return Err(ThemeError::Archive("file is empty".to_string()));
    }

    let mut magic = [0u8; 4];
    let mut file = File::open(archive_path).map_err(ThemeError::io(archive_path))?;
    file.read_exact(&mut magic)
        .map_err(|_| ThemeError::Archive("file is not a zip archive".to_string()))?;
    if &magic != ZIP_MAGIC {
        return Err(ThemeError::Archive("file is not a zip archive".to_string()));
    }
    file.rewind().map_err(ThemeError::io(archive_path))?;

    let mut archive = ZipArchive::new(file)
        .map_err(|e| ThemeError::Archive(format!("file is not a zip archive: {e}")))?;
    let plan = inspect(&mut archive)?;

    let base = match slugify(&plan.top) {
        s if s.is_empty() => plan.metadata.slug(),
        s => s,
    };
    let slug = unique_slug(&base, taken);
    if slug != base {
        tracing::info!(requested = %base, imported = %slug, "Theme name taken; importing under new name");
    }

    let staging = staging_dir(custom_root, &slug)?;
    let prefix = PathBuf::from(&plan.top);
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(path) = entry.enclosed_name() else {
            continue;
        };
        let Ok(rel) = path.strip_prefix(&prefix) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = staging.path().join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(ThemeError::io(&target))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(ThemeError::io(parent))?;
        }
        let mut out = File::create(&target).map_err(ThemeError::io(&target))?;
        io::copy(&mut entry, &mut out).map_err(ThemeError::io(&target))?;
    }

    write_missing(staging.path(), &plan.metadata)?;
    staging.commit(&custom_root.join(&slug))?;
    tracing::info!(theme = %slug, path = %archive_path.display(), "Imported theme archive");
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::directory::create_at;
    use std::io::Write;
    use tempfile::TempDir;

    fn fixture() -> ThemeMetadata {
        ThemeMetadata::from_json(include_str!("../../tests/fixtures/midnight.json"))
            .expect("fixture parses")
    }

    #[test]
    fn test_unique_slug() {
        assert_eq!(unique_slug("t", |_| false), "t");
        assert_eq!(unique_slug("t", |s| s == "t"), "t-1");
        assert_eq!(unique_slug("t", |s| s == "t" || s == "t-1"), "t-2");
    }

    #[test]
    fn test_export_layout() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("custom").join("midnight");
        create_at(&temp.path().join("custom"), &dir, &fixture()).unwrap();
        let zip_path = temp.path().join("out").join("midnight.zip");
        export(&dir, "midnight", &zip_path).unwrap();

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert!(archive.by_name("midnight/theme.json").is_ok());
        assert!(archive.by_name("midnight/kitty.conf").is_ok());
    }

    #[test]
    fn test_import_rejects_non_zip_and_empty() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty.zip");
        File::create(&empty).unwrap();
        let err = import(&empty, temp.path(), |_| false).unwrap_err();
        assert!(matches!(err, ThemeError::Archive(_)));

        let text = temp.path().join("text.zip");
        fs::write(&text, "hello, not a zip").unwrap();
        let err = import(&text, temp.path(), |_| false).unwrap_err();
        assert!(matches!(err, ThemeError::Archive(_)));
    }

    #[test]
    fn test_import_rejects_path_traversal() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("evil.zip");
        let mut writer = ZipWriter::new(File::create(&zip_path).unwrap());
        let options = SimpleFileOptions::default();
        writer.start_file("../evil/theme.json", options).unwrap();
        writer.write_all(b"{}").unwrap();
        writer.finish().unwrap();

        let custom = temp.path().join("custom");
        let err = import(&zip_path, &custom, |_| false).unwrap_err();
        assert!(matches!(err, ThemeError::Archive(_)));
        assert!(!temp.path().join("evil").exists());
    }

    #[test]
    fn test_import_fills_missing_generated_files() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("bare.zip");
        let mut writer = ZipWriter::new(File::create(&zip_path).unwrap());
        let options = SimpleFileOptions::default();
        writer.start_file("Bare Theme/theme.json", options).unwrap();
        writer
            .write_all(fixture().to_json().unwrap().as_bytes())
            .unwrap();
        writer.finish().unwrap();

        let custom = temp.path().join("custom");
        let slug = import(&zip_path, &custom, |_| false).unwrap();
        assert_eq!(slug, "bare-theme");
        assert!(custom.join("bare-theme").join("alacritty.toml").is_file());
    }
}

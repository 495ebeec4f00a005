use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

/// Filename suffixes of the pictures a batch picks up. Matched case-sensitively against
/// the whole filename.
pub const IMAGE_SUFFIXES: [&str; 4] = [".jpg", ".jpeg", ".png", ".tiff"];

/// Creates the directory and all of its parents, does nothing if it already exists.
pub fn ensure_dir(dir: impl AsRef<Path>) -> io::Result<()> {
    let dir = dir.as_ref();
    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        // NOTE: symlinks to directories are fine too
        Ok(_) if dir.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "exists but is not a dir",
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dir),
        Err(e) => Err(e),
    }
}

/// Whether the filename ends with one of [`IMAGE_SUFFIXES`].
pub fn has_image_suffix(path: impl AsRef<Path>) -> bool {
    let Some(name) = path.as_ref().file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    IMAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Collects all entries in `folder` that look like pictures, does not walk it
/// recursively. The result is sorted on the filename. Only failing to open the folder is
/// an error, entries that can't be read are logged and left out.
pub fn image_files(folder: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    let entries = fs::read_dir(folder)?.map(|entry| entry.map(|entry| entry.path()));
    Ok(keep_images(folder, entries))
}

fn keep_images<I>(folder: &Path, entries: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut files: Vec<_> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Could not read an entry in {folder:?}: {e}");
                None
            }
        })
        .filter(|path| has_image_suffix(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

/// Inserts `suffix` between the stem and the extension of the filename in `path`, i.e.,
/// `dir/a.png` with `_cropped` becomes `a_cropped.png`. Only the filename is returned.
pub fn suffixed_file_name(path: impl AsRef<Path>, suffix: &str) -> OsString {
    let path = path.as_ref();
    let mut name = path.file_stem().unwrap_or_default().to_owned();
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Replaces the extension of the filename in `path` with `suffix` followed by
/// `extension`, i.e., `a_cropped.png` with `_otsu` and `png` becomes
/// `a_cropped_otsu.png`.
pub fn replaced_file_name(
    path: impl AsRef<Path>,
    suffix: &str,
    extension: &str,
) -> OsString {
    let mut name = path.as_ref().file_stem().unwrap_or_default().to_owned();
    name.push(suffix);
    name.push(".");
    name.push(extension);
    name
}

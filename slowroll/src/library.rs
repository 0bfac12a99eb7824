//! The MIDI library: every .mid/.midi file directly inside one directory

use std::path::{Path, PathBuf};

pub fn is_midi(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                e == "mid" || e == "midi"
            })
            .unwrap_or(false)
}

/// Display name for a file: the file name, or the whole path if there is none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct Library {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl Library {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, files: Vec::new() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files from the last scan, sorted by path.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Re-read the directory. On error the previous listing is cleared.
    pub fn rescan(&mut self) -> std::io::Result<usize> {
        self.files.clear();
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .flatten()
            .map(|e| e.path())
            .filter(|p| is_midi(p))
            .collect();
        files.sort();
        self.files = files;
        Ok(self.files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("slowroll-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_rescan_lists_midi_files_sorted() {
        let dir = scratch_dir("library");
        for name in ["b.mid", "a.MIDI", "notes.txt", "c.mid.bak"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.join("folder.mid")).unwrap();

        let mut library = Library::new(dir.clone());
        assert_eq!(library.rescan().unwrap(), 2);
        let names: Vec<String> = library.files().iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.MIDI", "b.mid"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_dir_clears_listing() {
        let dir = scratch_dir("library-gone");
        std::fs::write(dir.join("a.mid"), b"").unwrap();
        let mut library = Library::new(dir.clone());
        library.rescan().unwrap();
        assert_eq!(library.files().len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
        assert!(library.rescan().is_err());
        assert!(library.files().is_empty());
    }
}

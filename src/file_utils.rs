use anyhow::{Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a re-timed subtitle, next to the source
    // @params: source_file, suffix
    // `movie.srt` with suffix `autofixed` becomes `movie.autofixed.srt`
    pub fn alignment_output_path<P: AsRef<Path>>(source_file: P, suffix: &str) -> PathBuf {
        let source_file = source_file.as_ref();

        // Get the file stem (filename without extension)
        let stem = source_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);
        output_filename.push_str(".srt");

        source_file.with_file_name(output_filename)
    }

    /// Check that `input` exists and is a regular file
    pub fn require_input<P: AsRef<Path>>(input: P) -> Result<()> {
        let input = input.as_ref();
        if !Self::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }
        Ok(())
    }

    /// Prepare `output` for writing: refuse to clobber unless forced, create the parent directory
    pub fn prepare_output<P: AsRef<Path>>(output: P, force_overwrite: bool) -> Result<()> {
        let output = output.as_ref();
        if output.exists() && !force_overwrite {
            return Err(anyhow!(
                "Output file already exists: {:?} (use --force to overwrite)",
                output
            ));
        }
        if let Some(parent) = output.parent() {
            Self::ensure_dir(parent)?;
        }
        Ok(())
    }
}

//! Cached PDF-to-DOCX conversion through an external converter command.
//!
//! Conversion is a one-time side effect: an existing artifact is reused, and
//! a fresh one is written to a temporary file and renamed into place so
//! concurrent workers never observe a partial document. Failure degrades to
//! PDF-only extraction.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::models::config::PipelineConfig;

/// Handle on the conversion cache for one pipeline run.
pub struct Converter<'a> {
    command: Option<&'a str>,
    converted_dir: &'a Path,
}

impl<'a> Converter<'a> {
    pub fn from_config(config: &'a PipelineConfig) -> Self {
        Self {
            command: config.convert_command.as_deref(),
            converted_dir: &config.converted_dir,
        }
    }

    /// Returns the path of the converted artifact for `key`, converting if
    /// needed. `None` means no artifact is available and the caller should
    /// proceed with PDF-only extraction.
    pub fn ensure_converted(&self, key: &str, pdf_path: &Path) -> Option<PathBuf> {
        let dest = self.converted_dir.join(format!("{key}.docx"));
        if dest.is_file() {
            debug!("reusing converted document {}", dest.display());
            return Some(dest);
        }

        let command = self.command?;
        if let Err(e) = fs::create_dir_all(self.converted_dir) {
            warn!(
                "cannot create {}: {e}; skipping conversion",
                self.converted_dir.display()
            );
            return None;
        }

        match self.run_converter(command, pdf_path, &dest) {
            Ok(()) => {
                debug!("{key} - file converted successfully");
                Some(dest)
            }
            Err(e) => {
                warn!("conversion failed for {key}: {e}");
                None
            }
        }
    }

    fn run_converter(&self, template: &str, input: &Path, dest: &Path) -> io::Result<()> {
        let staging = tempfile::Builder::new()
            .prefix(".convert-")
            .suffix(".docx")
            .tempfile_in(self.converted_dir)?;
        let staging_path = staging.path().to_path_buf();

        let mut parts = template.split_whitespace().map(|part| match part {
            "{input}" => input.display().to_string(),
            "{output}" => staging_path.display().to_string(),
            other => other.to_string(),
        });
        let program = parts
            .next()
            .ok_or_else(|| io::Error::other("empty converter command"))?;

        let status = Command::new(program).args(parts).status()?;
        if !status.success() {
            return Err(io::Error::other(format!(
                "converter exited with {status}"
            )));
        }

        // Atomic rename into place; concurrent workers either see the full
        // artifact or none.
        staging.persist(dest).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::PipelineConfig;

    fn config_in(dir: &Path, command: Option<&str>) -> PipelineConfig {
        PipelineConfig {
            converted_dir: dir.to_path_buf(),
            convert_command: command.map(String::from),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_cache_hit_skips_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let cached = dir.path().join("inv-1.docx");
        fs::write(&cached, b"cached").unwrap();

        // No converter configured: only the cache can answer.
        let config = config_in(dir.path(), None);
        let converter = Converter::from_config(&config);

        assert_eq!(
            converter.ensure_converted("inv-1", Path::new("inv-1.pdf")),
            Some(cached)
        );
    }

    #[test]
    fn test_no_command_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), None);
        let converter = Converter::from_config(&config);

        assert_eq!(
            converter.ensure_converted("inv-2", Path::new("inv-2.pdf")),
            None
        );
    }

    #[test]
    fn test_failing_command_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), Some("false {input} {output}"));
        let converter = Converter::from_config(&config);

        assert_eq!(
            converter.ensure_converted("inv-3", Path::new("inv-3.pdf")),
            None
        );
        // No partial artifact left behind.
        assert!(!dir.path().join("inv-3.docx").exists());
    }

    #[test]
    fn test_successful_command_persists_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), Some("true {input} {output}"));
        let converter = Converter::from_config(&config);

        let dest = converter.ensure_converted("inv-4", Path::new("inv-4.pdf"));
        assert_eq!(dest, Some(dir.path().join("inv-4.docx")));
        assert!(dir.path().join("inv-4.docx").exists());
    }
}

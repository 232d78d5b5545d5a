//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::error::SizeAnalyzerError;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .size-analyzer.toml in the given directory
    ///
    /// A missing file yields [`ConfigFile::default`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use size_analyzer::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("Snapshots live in {}", config.data_dir.display());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(project_root: &Path) -> Result<ConfigFile> {
        Self::load_with_fs(project_root, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(project_root: &Path, fs: &FS) -> Result<ConfigFile> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(ConfigFile::default());
            }
            Err(source) => {
                return Err(SizeAnalyzerError::Io {
                    context: config_path.display().to_string(),
                    source,
                }
                .into());
            }
        };

        let config: ConfigFile =
            toml_edit::de::from_str(&contents).context("Failed to parse .size-analyzer.toml")?;

        config
            .validate()
            .context("Invalid .size-analyzer.toml")?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorFormatter;
    use std::io;

    struct MockFileSystem {
        file_content: Option<String>,
        read_error: Option<io::ErrorKind>,
    }

    impl MockFileSystem {
        fn empty() -> Self {
            Self {
                file_content: None,
                read_error: None,
            }
        }

        fn with_content(content: &str) -> Self {
            Self {
                file_content: Some(content.to_string()),
                ..Self::empty()
            }
        }

        fn with_read_error(kind: io::ErrorKind) -> Self {
            Self {
                read_error: Some(kind),
                ..Self::empty()
            }
        }
    }

    impl FileSystem for MockFileSystem {
        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            if let Some(kind) = self.read_error {
                return Err(io::Error::new(kind, "mock failure"));
            }
            self.file_content
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "file not found"))
        }
    }

    #[test]
    fn test_missing_file_returns_default() {
        let config = ConfigLoader::load_with_fs(Path::new("."), &MockFileSystem::empty()).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_read_error_other_than_not_found_propagates() {
        let fs = MockFileSystem::with_read_error(io::ErrorKind::PermissionDenied);
        let err = ConfigLoader::load_with_fs(Path::new("."), &fs).unwrap_err();
        assert!(err.to_string().starts_with("I/O error"));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
        assert_eq!(ErrorFormatter::exit_code(&err), 74);
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let fs = MockFileSystem::with_content("threshold = \"lots\"");
        let err = ConfigLoader::load_with_fs(Path::new("."), &fs).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_out_of_range_values_surface_typed_error() {
        let fs = MockFileSystem::with_content("recent-versions = 1\n");
        let err = ConfigLoader::load_with_fs(Path::new("."), &fs).unwrap_err();
        assert!(err
            .chain()
            .any(|c| c.downcast_ref::<SizeAnalyzerError>().is_some()));
        assert_eq!(ErrorFormatter::exit_code(&err), 78);
    }

    #[test]
    fn test_loader_reads_real_file() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "data-dir = \"artifacts\"\nmove-tolerance = 0.25\n",
        )
        .unwrap();

        let config = ConfigLoader::load(temp.path()).unwrap();
        assert_eq!(config.data_dir, Path::new("artifacts"));
        assert!((config.move_tolerance - 0.25).abs() < f64::EPSILON);
    }
}

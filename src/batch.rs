use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{ConfigError, RunConfig};
use crate::error::ProsailError;
use crate::kernel::ReflectanceKernel;
use crate::model::run;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("input directory {0} does not exist")]
    MissingInput(PathBuf),

    #[error("failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("{path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ProsailError,
    },

    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs every `*.json` run configuration found under `input_dir` and writes
/// one `<stem>_spectrum.json` per config into `output_dir`, keeping the
/// sub-directory layout of the input.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl BatchRunner {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input_dir: P, output_dir: Q) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Run configuration files under the input directory, recursively, in
    /// path order. Paths are returned canonicalized.
    pub fn discover(&self) -> Result<Vec<PathBuf>, BatchError> {
        let input_dir = self.canonical_input()?;
        // Only an existing output directory can hold earlier spectra.
        let output_dir = self.output_dir.canonicalize().ok();

        let mut configs = Vec::new();
        for entry in WalkDir::new(&input_dir).sort_by_file_name() {
            let entry = entry.map_err(|source| BatchError::Walk {
                path: input_dir.clone(),
                source,
            })?;

            if output_dir
                .as_ref()
                .is_some_and(|out| entry.path().starts_with(out))
            {
                continue;
            }

            if entry.file_type().is_file() && is_run_config(entry.path()) {
                configs.push(entry.into_path());
            }
        }

        Ok(configs)
    }

    /// Stops at the first failing configuration; spectra already written stay
    /// on disk.
    pub fn process<K>(&self, kernel: &K) -> Result<Vec<PathBuf>, BatchError>
    where
        K: ReflectanceKernel + ?Sized,
    {
        let input_dir = self.canonical_input()?;
        let configs = self.discover()?;
        if configs.is_empty() {
            warn!(dir = %self.input_dir.display(), "no run configurations found");
            return Ok(Vec::new());
        }
        info!(count = configs.len(), dir = %self.input_dir.display(), "running PROSAIL batch");

        let mut output_files = Vec::with_capacity(configs.len());
        for path in configs {
            let config = RunConfig::from_file(&path).map_err(|source| BatchError::Config {
                path: path.clone(),
                source,
            })?;

            let spectrum =
                run(config.parameters(), kernel).map_err(|source| BatchError::Model {
                    path: path.clone(),
                    source,
                })?;

            let output = self.output_path(&input_dir, &path);
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).map_err(|source| BatchError::Output {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            spectrum
                .to_json_file(&output, config.wavelength_unit())
                .map_err(|source| BatchError::Output {
                    path: output.clone(),
                    source,
                })?;

            info!(config = %path.display(), output = %output.display(), "saved spectrum");
            output_files.push(output);
        }

        Ok(output_files)
    }

    fn canonical_input(&self) -> Result<PathBuf, BatchError> {
        if !self.input_dir.is_dir() {
            return Err(BatchError::MissingInput(self.input_dir.clone()));
        }
        self.input_dir
            .canonicalize()
            .map_err(|_| BatchError::MissingInput(self.input_dir.clone()))
    }

    /// `<input>/a/b/run.json` maps to `<output>/a/b/run_spectrum.json`.
    fn output_path(&self, input_dir: &Path, config: &Path) -> PathBuf {
        let stem = config
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "run".to_string());
        let sub_dir = config
            .strip_prefix(input_dir)
            .ok()
            .and_then(Path::parent)
            .unwrap_or(Path::new(""));
        self.output_dir
            .join(sub_dir)
            .join(format!("{stem}_spectrum.json"))
    }
}

pub fn is_run_config(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("json"))
}

//! Output specifier resolution
//!
//! Turns the strings found in `outputPaths` / `errorOutputPaths` into sinks:
//! `stdout` and `stderr` map to the process streams, anything else is a file
//! path handled by a [`RotatingFileSink`].

use super::console::StdStreamSink;
use super::fanout::FanoutSink;
use super::rotating_file::{RotatingFileSink, RotationPolicy};
use crate::core::config::{RotationConfig, STDERR, STDOUT};
use crate::core::{LoggerError, Result, Sink};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const FILE_SCHEME: &str = "file://";

/// A parsed output specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSpec {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl OutputSpec {
    /// Parse one specifier; `file://` URLs are accepted as plain paths
    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = spec.trim();
        match trimmed {
            "" => Err(LoggerError::unsupported_output(spec, "empty output path")),
            STDOUT => Ok(OutputSpec::Stdout),
            STDERR => Ok(OutputSpec::Stderr),
            _ => {
                if let Some(path) = trimmed.strip_prefix(FILE_SCHEME) {
                    if path.is_empty() {
                        return Err(LoggerError::unsupported_output(spec, "empty file path"));
                    }
                    return Ok(OutputSpec::File(PathBuf::from(path)));
                }
                if let Some((scheme, _)) = trimmed.split_once("://") {
                    return Err(LoggerError::unsupported_output(
                        spec,
                        format!("unsupported scheme '{}'", scheme),
                    ));
                }
                Ok(OutputSpec::File(PathBuf::from(trimmed)))
            }
        }
    }
}

/// Create every missing parent directory of `path` (mode 0755 on Unix)
///
/// # Errors
///
/// Fails when a parent exists but is not a directory, or cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };

    match fs::metadata(parent) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(LoggerError::rotation_setup(
                path.display().to_string(),
                format!("{} exists and is not a directory", parent.display()),
                None,
            ))
        }
        Err(_) => {}
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(parent).map_err(|e| {
        LoggerError::rotation_setup(
            path.display().to_string(),
            format!("cannot create directory {}", parent.display()),
            Some(e),
        )
    })
}

/// Resolves specifiers for a single logger construction
///
/// The same file named in several places (for example in both the output
/// and the error output list) shares one sink, so its rotation state is not
/// split between two handles.
pub struct SinkResolver {
    rotation: RotationPolicy,
    files: HashMap<PathBuf, Arc<RotatingFileSink>>,
}

impl SinkResolver {
    pub fn new(rotation: &RotationConfig) -> Self {
        Self {
            rotation: RotationPolicy::from_config(rotation),
            files: HashMap::new(),
        }
    }

    /// Resolve one specifier to a sink
    pub fn resolve(&mut self, spec: &str) -> Result<Arc<dyn Sink>> {
        match OutputSpec::parse(spec)? {
            OutputSpec::Stdout => Ok(Arc::new(StdStreamSink::stdout())),
            OutputSpec::Stderr => Ok(Arc::new(StdStreamSink::stderr())),
            OutputSpec::File(path) => {
                if let Some(existing) = self.files.get(&path) {
                    return Ok(existing.clone());
                }
                let sink = Arc::new(RotatingFileSink::open(&path, self.rotation.clone())?);
                self.files.insert(path, sink.clone());
                Ok(sink)
            }
        }
    }

    /// Resolve a list of specifiers into one fan-out sink, in order
    ///
    /// An empty list resolves to stderr.
    pub fn resolve_all(&mut self, specs: &[String]) -> Result<FanoutSink> {
        if specs.is_empty() {
            return Ok(FanoutSink::new(vec![Arc::new(StdStreamSink::stderr())]));
        }
        let sinks = specs
            .iter()
            .map(|spec| self.resolve(spec))
            .collect::<Result<Vec<_>>>()?;
        Ok(FanoutSink::new(sinks))
    }
}

/// Resolve `specs` with a fresh resolver
pub fn resolve_outputs(specs: &[String], rotation: &RotationConfig) -> Result<FanoutSink> {
    SinkResolver::new(rotation).resolve_all(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_specifiers() {
        assert_eq!(OutputSpec::parse("stdout").unwrap(), OutputSpec::Stdout);
        assert_eq!(OutputSpec::parse(" stderr ").unwrap(), OutputSpec::Stderr);
        assert_eq!(
            OutputSpec::parse("/var/log/app.log").unwrap(),
            OutputSpec::File(PathBuf::from("/var/log/app.log"))
        );
        assert_eq!(
            OutputSpec::parse("file:///var/log/app.log").unwrap(),
            OutputSpec::File(PathBuf::from("/var/log/app.log"))
        );
        assert_eq!(
            OutputSpec::parse("logs/app.log").unwrap(),
            OutputSpec::File(PathBuf::from("logs/app.log"))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_schemes() {
        assert!(matches!(
            OutputSpec::parse("tcp://collector:514"),
            Err(LoggerError::UnsupportedOutput { .. })
        ));
        assert!(matches!(
            OutputSpec::parse(""),
            Err(LoggerError::UnsupportedOutput { .. })
        ));
        assert!(OutputSpec::parse("file://").is_err());
    }

    #[test]
    fn test_ensure_parent_dir_creates_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c/app.log");

        ensure_parent_dir(&path).unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
        // Idempotent
        ensure_parent_dir(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_created_directories_use_0755() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        ensure_parent_dir(&dir.path().join("perm/app.log")).unwrap();

        let mode = fs::metadata(dir.path().join("perm")).unwrap().permissions().mode();
        // umask may clear bits but never adds them
        assert_eq!(mode & 0o022, 0);
        assert_eq!(mode & 0o700, 0o700);
    }

    #[test]
    fn test_same_file_shares_one_sink() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shared.log").display().to_string();
        let mut resolver = SinkResolver::new(&RotationConfig::default());

        let first = resolver.resolve(&path).unwrap();
        let second = resolver.resolve(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log").display().to_string();

        let fanout = resolve_outputs(
            &["stdout".to_string(), path.clone(), "stderr".to_string()],
            &RotationConfig::default(),
        )
        .unwrap();

        assert_eq!(fanout.sink_names(), vec!["stdout", path.as_str(), "stderr"]);
    }

    #[test]
    fn test_empty_list_falls_back_to_stderr() {
        let fanout = resolve_outputs(&[], &RotationConfig::default()).unwrap();
        assert_eq!(fanout.sink_names(), vec!["stderr"]);
    }

    #[test]
    fn test_unsupported_output_fails_whole_list() {
        let result = resolve_outputs(
            &["stdout".to_string(), "udp://127.0.0.1:9".to_string()],
            &RotationConfig::default(),
        );
        assert!(matches!(result, Err(LoggerError::UnsupportedOutput { .. })));
    }
}

//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

/// Load configuration from a TOML file.
///
/// Relative paths in the file resolve against the file's directory unless
/// `root` is set explicitly. Validation happens in `App::new`.
pub fn load_config(path: &Path) -> Result<AppConfig, LoadError> {
    let content = fs::read_to_string(path).map_err(LoadError::Io)?;
    let mut config: AppConfig = toml::from_str(&content).map_err(LoadError::Parse)?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    config.root = Some(match config.root.take() {
        Some(root) => dir.join(root),
        None => dir.to_path_buf(),
    });

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Protocol;
    use std::io::Write;

    #[test]
    fn loads_routes_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journey.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
port = 8001
views = "views"
ga_tag_id = "G-123"

[app_config]
foo = "bar"

[[routes]]
name = "app_1"
base_url = "/app_1"
params = "/:action?"

[routes.steps."/one"]
[routes.steps."/two"]
template = "second"
"#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.port, 8001);
        assert_eq!(config.protocol, Protocol::Http);
        assert_eq!(config.root.as_deref(), Some(dir.path()));
        assert_eq!(config.app_config["foo"], "bar");
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].base_url.as_deref(), Some("/app_1"));
        assert_eq!(config.routes[0].steps.len(), 2);
    }

    #[test]
    fn reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "routes = 3").unwrap();
        assert!(matches!(load_config(&path), Err(LoadError::Parse(_))));
        assert!(matches!(
            load_config(&dir.path().join("missing.toml")),
            Err(LoadError::Io(_))
        ));
    }
}

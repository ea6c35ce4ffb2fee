use crate::config::VIEWER_CONFIG_FILE;
use crate::fetch::Fetcher;
use crate::Result;
use crawlview_types::ViewerConfig;
use std::path::Path;
use url::Url;

/// Load the viewer configuration for this session.
///
/// `source` is a path or an http(s) URL. Without one, `viewer_config.json`
/// in the data directory is used when present. A document that cannot be
/// read, parsed or validated is logged and replaced by the empty default,
/// so detail views still show the base rows.
pub async fn load_viewer_config(
    source: Option<&str>,
    data_dir: &Path,
    fetcher: &dyn Fetcher,
) -> ViewerConfig {
    let source = match source.map(str::trim).filter(|s| !s.is_empty()) {
        Some(source) => source.to_string(),
        None => {
            let local = data_dir.join(VIEWER_CONFIG_FILE);
            if !local.exists() {
                return ViewerConfig::default();
            }
            local.to_string_lossy().into_owned()
        }
    };

    match read_viewer_config(&source, fetcher).await {
        Ok(config) => {
            tracing::debug!(
                source = %source,
                sources = config.sources.len(),
                "viewer config loaded"
            );
            config
        }
        Err(err) => {
            tracing::warn!(source = %source, error = %err, "viewer config unavailable; using defaults");
            ViewerConfig::default()
        }
    }
}

async fn read_viewer_config(source: &str, fetcher: &dyn Fetcher) -> Result<ViewerConfig> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let url = Url::parse(source)?;
        let value = fetcher.get_json(&url).await?;
        return Ok(ViewerConfig::from_value(value)?);
    }

    let text = tokio::fs::read_to_string(source).await?;
    Ok(ViewerConfig::from_json(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFetcher;
    use serde_json::json;
    use tempfile::TempDir;

    const DOC: &str = r#"{"version": 1, "defaults": {"fields": [{"label": "File type", "key": "file_ext"}]}}"#;

    #[tokio::test]
    async fn test_data_dir_document_is_picked_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(VIEWER_CONFIG_FILE), DOC).unwrap();

        let config = load_viewer_config(None, dir.path(), &MemoryFetcher::new()).await;
        assert_eq!(config.version, 1);
        assert_eq!(config.defaults.fields.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_document_yields_default() {
        let dir = TempDir::new().unwrap();
        let config = load_viewer_config(None, dir.path(), &MemoryFetcher::new()).await;
        assert_eq!(config, ViewerConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_document_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"defaults": {"fields": [{"label": "", "key": "x"}]}}"#).unwrap();

        let config =
            load_viewer_config(path.to_str(), dir.path(), &MemoryFetcher::new()).await;
        assert_eq!(config, ViewerConfig::default());
    }

    #[tokio::test]
    async fn test_remote_document() {
        let dir = TempDir::new().unwrap();
        let fetcher = MemoryFetcher::new();
        let url = Url::parse("https://example.org/viewer_config.json").unwrap();
        fetcher.insert_json(
            &url,
            json!({"sources": {"tel_directory": {"fields": [{"label": "Email", "key": "email", "format": "email"}]}}}),
        );

        let config = load_viewer_config(Some(url.as_str()), dir.path(), &fetcher).await;
        assert_eq!(config.fields_for("tel_directory").len(), 1);
    }
}

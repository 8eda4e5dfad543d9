//! Reads API declarations from a configuration file

use anyhow::{Context, Result, bail};
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::models::Api;

/// Load the declarations in `config_path`, stamping each with its location
pub fn load_apis(config_path: &Path) -> Result<Vec<Api>> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let file_name = config_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| config_path.display().to_string());

    parse_apis(&content, &file_name)
}

/// Parse a YAML list of declarations; `file_name` is recorded for error messages
pub fn parse_apis(content: &str, file_name: &str) -> Result<Vec<Api>> {
    let document: Value =
        serde_yaml::from_str(content).with_context(|| format!("Failed to parse {file_name}"))?;

    let entries = match document {
        Value::Sequence(entries) => entries,
        // An empty file is an empty batch; validation decides what that means
        Value::Null => Vec::new(),
        _ => bail!("{file_name}: expected a list of apis at the top level"),
    };

    let mut apis = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let mut api: Api = serde_yaml::from_value(entry)
            .with_context(|| format!("{file_name}: api at index {index} is invalid"))?;
        api.file_path = Some(file_name.to_string());
        api.index = Some(index);
        apis.push(api);
    }

    debug!("Loaded {} apis from {file_name}", apis.len());
    Ok(apis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_apis_records_location() {
        let content = r#"
- name: iris
  local_port: 8890
  predictor:
    type: python
    path: predictor.py
- name: text
  predictor:
    type: onnx
    path: handler.py
    model: models/text.onnx
"#;
        let apis = parse_apis(content, "cortex.yaml").unwrap();

        assert_eq!(apis.len(), 2);
        assert_eq!(apis[0].identify(), "iris (api at index 0 in cortex.yaml)");
        assert_eq!(apis[1].index, Some(1));
        assert_eq!(apis[1].predictor.model.as_deref(), Some("models/text.onnx"));
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_apis("", "cortex.yaml").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_mapping_document() {
        let err = parse_apis("name: iris\n", "cortex.yaml").unwrap_err();
        assert!(err.to_string().contains("expected a list of apis"));
    }

    #[test]
    fn test_parse_reports_bad_entry_index() {
        let content = r#"
- name: iris
  predictor:
    type: python
    path: predictor.py
- name: broken
"#;
        let err = parse_apis(content, "cortex.yaml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cortex.yaml: api at index 1 is invalid"
        );
    }

    #[test]
    fn test_load_apis_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("apis.yaml");
        fs::write(
            &config_path,
            "- name: iris\n  predictor:\n    type: python\n    path: predictor.py\n",
        )
        .unwrap();

        let apis = load_apis(&config_path).unwrap();
        assert_eq!(apis[0].file_path.as_deref(), Some("apis.yaml"));
    }

    #[test]
    fn test_load_apis_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_apis(&temp_dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }
}

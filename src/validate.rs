//! Pre-flight content checks
//!
//! Both checks run before any network call for a file; a failure skips
//! that file only and never aborts the run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SyncError};

/// Declarative parameter description carried inside tool metadata.
/// Opaque to the engine except for pass-through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub arg_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub required: bool,
}

/// Metadata sidecar for a tool; `name` and `description` are mandatory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub arguments: Vec<ToolArgument>,
}

/// Check a metadata sidecar: must parse as YAML and carry a non-empty
/// name and description
pub fn validate_metadata(content: &str) -> Result<()> {
    let meta: ToolMetadata = serde_yaml::from_str(content)
        .map_err(|e| SyncError::Validation(format!("invalid YAML syntax: {e}")))?;

    if meta.name.is_empty() {
        return Err(SyncError::Validation("missing 'name' field".to_string()));
    }
    if meta.description.is_empty() {
        return Err(SyncError::Validation("missing 'description' field".to_string()));
    }
    Ok(())
}

/// Check a script: must not be empty (whitespace-only counts as empty).
/// The conventional entry-point marker is recognized but not enforced.
pub fn validate_script(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(SyncError::Validation("script is empty".to_string()));
    }
    if !content.contains("def main(") && !content.contains("def handler(") {
        log::debug!("script has no conventional entry-point marker");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_valid() {
        let yaml = r#"
name: nmap
description: Network scanner
arguments:
  - name: target
    type: string
    description: Host or network to scan
    required: true
"#;
        assert!(validate_metadata(yaml).is_ok());
    }

    #[test]
    fn test_metadata_minimal() {
        let yaml = "name: t\ndescription: d\n";
        assert!(validate_metadata(yaml).is_ok());
    }

    #[test]
    fn test_metadata_missing_name() {
        let yaml = "description: something\n";
        let err = validate_metadata(yaml).unwrap_err();
        assert!(err.to_string().contains("missing 'name' field"));
    }

    #[test]
    fn test_metadata_empty_name() {
        let yaml = "name: ''\ndescription: something\n";
        let err = validate_metadata(yaml).unwrap_err();
        assert!(err.to_string().contains("missing 'name' field"));
    }

    #[test]
    fn test_metadata_missing_description() {
        let yaml = "name: nmap\n";
        let err = validate_metadata(yaml).unwrap_err();
        assert!(err.to_string().contains("missing 'description' field"));
    }

    #[test]
    fn test_metadata_invalid_yaml() {
        let yaml = "name: [unclosed\n";
        let err = validate_metadata(yaml).unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
        assert!(err.to_string().contains("invalid YAML syntax"));
    }

    #[test]
    fn test_metadata_arguments_parse() {
        let yaml = r#"
name: hydra
description: Login cracker
arguments:
  - name: wordlist
    type: string
    description: Path to wordlist
    default: rockyou.txt
    required: false
  - name: threads
    type: integer
    description: Parallel tasks
    default: 4
    required: false
"#;
        let meta: ToolMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(meta.arguments.len(), 2);
        assert_eq!(meta.arguments[0].arg_type, "string");
        assert_eq!(meta.arguments[0].default, Some(Value::from("rockyou.txt")));
        assert_eq!(meta.arguments[1].default, Some(Value::from(4)));
        assert!(!meta.arguments[1].required);
    }

    #[test]
    fn test_script_valid() {
        assert!(validate_script("def main():\n    pass\n").is_ok());
    }

    #[test]
    fn test_script_without_entry_point_still_passes() {
        // The marker check is deliberately a no-op
        assert!(validate_script("print('hello')\n").is_ok());
    }

    #[test]
    fn test_script_empty() {
        let err = validate_script("").unwrap_err();
        assert!(err.to_string().contains("script is empty"));
    }

    #[test]
    fn test_script_whitespace_only() {
        let err = validate_script("  \n\t\n").unwrap_err();
        assert!(err.to_string().contains("script is empty"));
    }
}

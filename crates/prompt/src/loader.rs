//! Prompt loader for built-in and workspace YAML prompt definitions.

use crate::types::PromptDefinition;
use docqa_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Prompt definitions compiled into the binary, keyed by ID.
const BUILTIN_PROMPTS: &[(&str, &str)] = &[
    ("draft", include_str!("../prompts/draft.yml")),
    ("condense", include_str!("../prompts/condense.yml")),
    ("final-answer", include_str!("../prompts/final-answer.yml")),
    ("groundedness", include_str!("../prompts/groundedness.yml")),
    ("accuracy", include_str!("../prompts/accuracy.yml")),
    ("relevance", include_str!("../prompts/relevance.yml")),
];

/// Directory holding workspace prompt overrides.
pub fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".docqa").join("prompts")
}

/// Load a prompt definition by ID.
///
/// A file named `<id>.yml` in the workspace's `.docqa/prompts/` directory
/// takes precedence over the built-in definition with the same ID.
///
/// # Example
/// ```no_run
/// use docqa_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "groundedness")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let override_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    let (contents, origin) = if override_file.exists() {
        tracing::debug!("Loading prompt override from: {:?}", override_file);
        let contents = std::fs::read_to_string(&override_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                override_file, e
            ))
        })?;
        (contents, override_file.display().to_string())
    } else {
        let builtin = builtin_source(prompt_id)
            .ok_or_else(|| AppError::Prompt(format!("Prompt not found: {}", prompt_id)))?;
        (builtin.to_string(), format!("builtin:{}", prompt_id))
    };

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e))
    })?;

    validate_prompt(&definition)?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt {} declares id '{}', expected '{}'",
            origin, definition.id, prompt_id
        )));
    }

    tracing::debug!("Loaded prompt: {} ({})", definition.id, origin);

    Ok(definition)
}

/// List all available prompt IDs: built-ins plus workspace overrides.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let mut prompt_ids: Vec<String> = BUILTIN_PROMPTS
        .iter()
        .map(|(id, _)| id.to_string())
        .collect();

    let dir = prompts_dir(workspace_path);
    if dir.exists() {
        for entry in walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    prompt_ids.push(stem.to_string());
                }
            }
        }
    }

    prompt_ids.sort();
    prompt_ids.dedup();
    Ok(prompt_ids)
}

/// IDs of the built-in prompts, in pipeline order.
pub fn builtin_ids() -> impl Iterator<Item = &'static str> {
    BUILTIN_PROMPTS.iter().map(|(id, _)| *id)
}

fn builtin_source(prompt_id: &str) -> Option<&'static str> {
    BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .map(|(_, source)| *source)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if def.system.trim().is_empty() || def.template.trim().is_empty() {
        return Err(AppError::Prompt(format!(
            "Prompt {} needs both a system instruction and a template",
            def.id
        )));
    }

    if !(0.0..=1.0).contains(&def.temperature) {
        return Err(AppError::Prompt(format!(
            "Prompt {} temperature {} is outside [0, 1]",
            def.id, def.temperature
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_override(dir: &Path, id: &str, content: &str) {
        let prompts = prompts_dir(dir);
        fs::create_dir_all(&prompts).unwrap();
        fs::write(prompts.join(format!("{}.yml", id)), content).unwrap();
    }

    #[test]
    fn test_every_builtin_prompt_is_valid() {
        let temp_dir = TempDir::new().unwrap();
        for id in builtin_ids() {
            let prompt = load_prompt(temp_dir.path(), id).unwrap();
            assert_eq!(prompt.id, id);
        }
    }

    #[test]
    fn test_builtin_temperatures() {
        let temp_dir = TempDir::new().unwrap();
        let draft = load_prompt(temp_dir.path(), "draft").unwrap();
        let condense = load_prompt(temp_dir.path(), "condense").unwrap();
        let relevance = load_prompt(temp_dir.path(), "relevance").unwrap();

        assert!((draft.temperature - 0.3).abs() < 1e-6);
        assert!((condense.temperature - 0.5).abs() < 1e-6);
        assert!((relevance.temperature - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_workspace_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        write_override(
            temp_dir.path(),
            "relevance",
            r#"
id: relevance
title: "Strict relevance"
apiVersion: "1.1"
temperature: 0.0
system: "Score relevance harshly."
template: "Q: {{question}} A: {{answer}}"
"#,
        );

        let prompt = load_prompt(temp_dir.path(), "relevance").unwrap();
        assert_eq!(prompt.title, "Strict relevance");
        assert_eq!(prompt.temperature, 0.0);
    }

    #[test]
    fn test_override_with_mismatched_id_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_override(
            temp_dir.path(),
            "draft",
            r#"
id: something-else
title: "Wrong"
apiVersion: "1.0"
temperature: 0.3
system: "x"
template: "y"
"#,
        );

        assert!(load_prompt(temp_dir.path(), "draft").is_err());
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_prompt(temp_dir.path(), "nonexistent").is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_override(temp_dir.path(), "accuracy", "invalid: yaml: content:");
        assert!(load_prompt(temp_dir.path(), "accuracy").is_err());
    }

    #[test]
    fn test_temperature_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        write_override(
            temp_dir.path(),
            "condense",
            r#"
id: condense
title: "Hot"
apiVersion: "1.0"
temperature: 1.7
system: "x"
template: "y"
"#,
        );

        assert!(load_prompt(temp_dir.path(), "condense").is_err());
    }

    #[test]
    fn test_list_prompts_merges_overrides() {
        let temp_dir = TempDir::new().unwrap();
        write_override(
            temp_dir.path(),
            "custom",
            "id: custom\ntitle: c\napiVersion: \"1.0\"\ntemperature: 0.1\nsystem: s\ntemplate: t\n",
        );
        write_override(
            temp_dir.path(),
            "draft",
            "id: draft\ntitle: d\napiVersion: \"1.0\"\ntemperature: 0.1\nsystem: s\ntemplate: t\n",
        );

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(prompts.len(), 7);
        assert!(prompts.contains(&"custom".to_string()));
        assert!(prompts.contains(&"groundedness".to_string()));
    }
}

//! Prompt builder for rendering stage templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use docqa_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Both the system instruction and the user template are rendered with
/// Handlebars in strict mode, so a template referring to a variable the
/// pipeline does not supply fails loudly instead of rendering blank.
///
/// # Example
/// ```no_run
/// use docqa_prompt::{build_prompt, load_prompt};
/// use std::collections::HashMap;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = load_prompt(Path::new("."), "relevance")?;
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "How many complaints?".to_string());
/// vars.insert("answer".to_string(), "Two.".to_string());
///
/// let built = build_prompt(&def, &vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: &HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::trace!("Building prompt: {}", definition.id);

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    let system = render_template(&mut handlebars, "system", &definition.system, variables)
        .map_err(|e| AppError::Prompt(format!("{} (system): {}", definition.id, e)))?;
    let user = render_template(&mut handlebars, "user", &definition.template, variables)
        .map_err(|e| AppError::Prompt(format!("{} (template): {}", definition.id, e)))?;

    Ok(BuiltPrompt {
        system,
        user,
        temperature: definition.temperature,
        source_prompt_id: definition.id.clone(),
    })
}

/// Render a Handlebars template with variables.
fn render_template(
    handlebars: &mut Handlebars<'_>,
    name: &str,
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, String> {
    handlebars
        .register_template_string(name, template)
        .map_err(|e| format!("Failed to register template: {}", e))?;

    handlebars
        .render(name, variables)
        .map_err(|e| format!("Failed to render template: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(system: &str, template: &str) -> PromptDefinition {
        PromptDefinition {
            id: "test.prompt".to_string(),
            title: "Test".to_string(),
            api_version: "1.0".to_string(),
            temperature: 0.2,
            system: system.to_string(),
            template: template.to_string(),
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_build_prompt_renders_both_parts() {
        let def = definition("Judge: {{axis}}", "Question: {{question}}");
        let built = build_prompt(&def, &vars(&[("axis", "relevance"), ("question", "Why?")])).unwrap();

        assert_eq!(built.system, "Judge: relevance");
        assert_eq!(built.user, "Question: Why?");
        assert_eq!(built.source_prompt_id, "test.prompt");
        assert!((built.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_no_html_escaping() {
        let def = definition("s", "{{answer}}");
        let built = build_prompt(&def, &vars(&[("answer", "a < b & \"c\"")])).unwrap();
        assert_eq!(built.user, "a < b & \"c\"");
    }

    #[test]
    fn test_single_braces_pass_through() {
        let def = definition("Return JSON:\n{\n    \"score\": 0.95\n}", "x");
        let built = build_prompt(&def, &HashMap::new()).unwrap();
        assert!(built.system.contains("\"score\": 0.95"));
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let def = definition("s", "Question: {{missing}}");
        let result = build_prompt(&def, &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}

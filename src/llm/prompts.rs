//! Prompt templates for the postal assistant

use std::collections::HashMap;

/// Template for generating prompts
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template with variables
    ///
    /// Placeholders are substituted in a single pass, so values are never
    /// re-expanded. Unknown placeholders are left as written.
    #[must_use]
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                rest = &rest[start..];
                break;
            };
            let name = &after[..end];
            match values.get(name) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }
        result.push_str(rest);
        result
    }

    /// Render from borrowed pairs
    #[must_use]
    pub fn render_pairs(&self, pairs: &[(&str, &str)]) -> String {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.render(&values)
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next(); // skip second '{'
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '}' {
                    chars.next();
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        break;
                    }
                } else {
                    var_name.push(ch);
                    chars.next();
                }
            }
            if !var_name.is_empty() && !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}

/// Standard prompts
pub struct PostalPrompts;

impl PostalPrompts {
    /// Natural-language query to `{query, detectedType, explanation}`
    #[must_use]
    pub fn query_normalization() -> PromptTemplate {
        PromptTemplate::new(
            r#"You are an Indian Postal Intelligence expert. Analyze the user's natural language input: "{{input}}".

Your goal is to:
1. Extract the core search term (e.g., if user says "what is the pincode of Ameerpet", extract "Ameerpet").
2. Detect if the intent refers to a 'pincode' (6-digit number) or an 'area' (location name).
3. Provide a brief, professional 1-sentence insight that adds value or confirms the context (e.g., "Analyzing postal records for the prominent residential and commercial hub of Ameerpet").

Return the result in valid JSON."#,
        )
    }

    /// Grounded locality summary for one post office
    #[must_use]
    pub fn locality_insight() -> PromptTemplate {
        PromptTemplate::new(
            r"Provide detailed geographical and cultural insights about the locality: {{area}}, Pincode: {{pincode}}, {{state}}, India.
Focus on local infrastructure. List 3 Government Hospitals, 3 major Landmarks, 3 Schools, and recent local news or development updates.
Return data in structured JSON.",
        )
    }

    /// System instruction for the support chat
    #[must_use]
    pub fn support_system() -> &'static str {
        "You are a helpful customer support agent for PincodePro, an Indian postal directory app. \
         You help users find pincodes, explain what post office types are (H.O, S.O, B.O, G.P.O), \
         and provide guidance on how to use the app. Be concise and professional."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_variables() {
        let template = PromptTemplate::new("Hello {{name}}, you are {{age}} years old.");
        assert_eq!(template.variables(), &["name", "age"]);
    }

    #[test]
    fn test_template_render() {
        let template = PromptTemplate::new("Hello {{name}}!");
        let mut values = HashMap::new();
        values.insert("name".to_string(), "Alice".to_string());
        assert_eq!(template.render(&values), "Hello Alice!");
    }

    #[test]
    fn test_render_does_not_expand_values() {
        let template = PostalPrompts::locality_insight();
        let prompt = template.render_pairs(&[
            ("area", "{{state}} Nagar"),
            ("pincode", "500016"),
            ("state", "Telangana"),
        ]);
        assert!(prompt.contains("locality: {{state}} Nagar, Pincode: 500016, Telangana, India"));
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed_placeholders() {
        let template = PromptTemplate::new("{{a}} {{b}} {{c");
        assert_eq!(template.render_pairs(&[("a", "1")]), "1 {{b}} {{c");
    }

    #[test]
    fn test_normalization_prompt_embeds_input() {
        let prompt = PostalPrompts::query_normalization().render_pairs(&[("input", "find pincode near Ameerpet")]);
        assert!(prompt.contains("\"find pincode near Ameerpet\""));
        assert!(!prompt.contains("{{input}}"));
    }

    #[test]
    fn test_insight_prompt_variables() {
        let template = PostalPrompts::locality_insight();
        assert_eq!(template.variables(), &["area", "pincode", "state"]);
        let prompt = template.render_pairs(&[("area", "Ameerpet"), ("pincode", "500016"), ("state", "Telangana")]);
        assert!(prompt.contains("Ameerpet, Pincode: 500016, Telangana, India"));
    }
}

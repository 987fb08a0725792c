//! Boundary to an external text-generation service.

use thiserror::Error;

use crate::config::Config;
use crate::html::Mode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Prompt template references `{0}` but no value was supplied")]
    MissingVariable(String),

    #[error("Malformed prompt template: {0}")]
    MalformedTemplate(String),

    #[error("Text generation failed: {0}")]
    Provider(String),
}

/// Anything that turns a fully rendered prompt into text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// A prompt with `{name}` placeholders. `{{` and `}}` are literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, GenerationError> {
        let mut out = String::with_capacity(self.source.len());
        let mut chars = self.source.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            match c {
                '{' if chars.next_if(|&(_, next)| next == '{').is_some() => out.push('{'),
                '}' if chars.next_if(|&(_, next)| next == '}').is_some() => out.push('}'),
                '{' => {
                    let name_start = at + 1;
                    let Some(len) = self.source[name_start..].find('}') else {
                        return Err(GenerationError::MalformedTemplate(format!(
                            "unclosed `{{` at byte {at}"
                        )));
                    };
                    let name = &self.source[name_start..name_start + len];
                    let value = vars
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| GenerationError::MissingVariable(name.to_string()))?;
                    out.push_str(value);
                    // Skip the name and the closing brace
                    while chars.next_if(|&(i, _)| i <= name_start + len).is_some() {}
                }
                '}' => {
                    return Err(GenerationError::MalformedTemplate(format!(
                        "single `}}` at byte {at}"
                    )));
                }
                _ => out.push(c),
            }
        }

        Ok(out)
    }
}

/// Fill a template, ask the generator for text, and render the result.
pub fn generate_section<G: TextGenerator + ?Sized>(
    generator: &G,
    template: &PromptTemplate,
    vars: &[(&str, &str)],
    mode: Mode,
    config: &Config,
) -> Result<String, GenerationError> {
    let prompt = template.render(vars)?;
    log::debug!("requesting generation for a {} byte prompt", prompt.len());
    let text = generator.generate(&prompt)?;
    Ok(crate::render_with_config(&text, mode, config))
}

//! Named-slot prompt templates.
//!
//! Slots are written `{name}`. Doubled braces (`{{`, `}}`) produce literal
//! braces, so JSON examples can be embedded in a prompt. Slot names are
//! matched exactly, surrounding whitespace included.

use super::error::ConfigError;

/// Substitute every `{name}` slot in `template` with the matching value.
pub fn render(template: &str, vars: &[(&str, &str)]) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                output.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => {
                            return Err(ConfigError::MalformedTemplate {
                                reason: format!("unexpected '{{' inside slot '{name}'"),
                            });
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(ConfigError::MalformedTemplate {
                                reason: format!("unterminated slot '{{{name}'"),
                            });
                        }
                    }
                }
                let value = vars
                    .iter()
                    .find(|(slot, _)| *slot == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| ConfigError::MissingPromptVariable {
                        variable: name.clone(),
                    })?;
                output.push_str(value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                output.push('}');
            }
            '}' => {
                return Err(ConfigError::MalformedTemplate {
                    reason: "single '}' encountered".to_string(),
                });
            }
            other => output.push(other),
        }
    }

    Ok(output)
}

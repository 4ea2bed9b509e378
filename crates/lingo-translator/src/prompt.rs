use crate::language::language_name;

/// Render the instruction sent to the model.
pub fn build_prompt(text: &str, source_locale: &str, target_locale: &str) -> String {
    let source = language_name(source_locale);
    let target = language_name(target_locale);

    format!("Translate this from {source} to {target}:\n{source}: {text}\n{target}:")
}

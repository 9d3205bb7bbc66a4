use serde::Deserialize;

/// Target used when a request leaves the language blank.
pub const DEFAULT_TARGET_LANGUAGE: &str = "English";

/// Selects what the language model does with the text.
#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    #[default]
    Translate,
    Summarize,
}

/// Builds the exact prompt sent to the language model. The model is told to
/// answer with the translation or summary alone, no preamble.
pub fn build_prompt(task: Task, text: &str, target_language: &str) -> String {
    let target = target_language.trim();
    let target = if target.is_empty() {
        DEFAULT_TARGET_LANGUAGE
    } else {
        target
    };

    match task {
        Task::Translate => {
            format!("Translate to {target}. Output ONLY the translation:\n\n\"\"\"{text}\"\"\"")
        }
        Task::Summarize => {
            format!("Summarize in 3-5 sentences. Output ONLY the summary:\n\n\"\"\"{text}\"\"\"")
        }
    }
}

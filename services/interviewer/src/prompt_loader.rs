use anyhow::{Context, Result};
use interview_core::prompts::Prompts;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Reads every `*.md` file in `dir_path`, keyed by file stem.
///
/// The stem is the prompt's name, so `interviewer.md` overrides the
/// question prompt and `feedback.md` the evaluation prompt; a deployment can
/// swap either without rebuilding.
pub fn load_prompts(dir_path: &Path) -> Result<HashMap<String, String>> {
    let mut prompts = HashMap::new();

    for entry in fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read prompts directory: {}", dir_path.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
            let prompt_key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem for prompt file")?
                .to_string();

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt file: {}", path.display()))?;

            prompts.insert(prompt_key, content);
        }
    }

    Ok(prompts)
}

/// Prompt overrides from `dir_path`, or the built-in prompts when the
/// directory does not exist.
pub fn prompts_from_dir(dir_path: &Path) -> Result<Prompts> {
    if !dir_path.exists() {
        tracing::warn!(
            "Prompts directory {} not found; using built-in prompts",
            dir_path.display()
        );
        return Ok(Prompts::default());
    }
    let loaded = load_prompts(dir_path)?;
    tracing::info!("Loaded {} prompts from {}", loaded.len(), dir_path.display());
    Ok(Prompts::from_map(loaded))
}

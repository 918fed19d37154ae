//! Load prompt assets from a directory of YAML files, with embedded defaults.
//!
//! **Canonical source**: default prompt text lives in `weft/prompts/*.yaml`; the
//! files are embedded at compile time and used when no `WEFT_PROMPTS_DIR` or
//! directory override is present. See [`load`], [`load_or_default`],
//! [`default_from_embedded`], and [`LoadError`].

use std::path::Path;

use serde::Deserialize;

/// Embedded default YAML (canonical source: `weft/prompts/*.yaml`).
macro_rules! embed_prompt_yaml {
    ($name:literal) => {
        include_str!(concat!("../../prompts/", $name))
    };
}
const EMBED_QA: &str = embed_prompt_yaml!("qa.yaml");
const EMBED_MATH: &str = embed_prompt_yaml!("math.yaml");
const EMBED_CODE: &str = embed_prompt_yaml!("code.yaml");
const EMBED_COT: &str = embed_prompt_yaml!("cot.yaml");

/// Names of YAML files under the prompts directory (one per family).
const QA_FILE: &str = "qa.yaml";
const MATH_FILE: &str = "math.yaml";
const CODE_FILE: &str = "code.yaml";
const COT_FILE: &str = "cot.yaml";

/// Error when loading prompts from a directory (unreadable file, invalid YAML).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read prompts file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
}

/// One prompt asset: the agent template and its few-shot examples.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptFile {
    pub template: Option<String>,
    pub examples: Option<String>,
}

/// Prompt assets for every strategy the crate ships.
#[derive(Debug, Clone, Default)]
pub struct PromptSet {
    pub qa: PromptFile,
    pub math: PromptFile,
    pub code: PromptFile,
    pub cot: PromptFile,
}

fn parse_embedded(name: &str, yaml: &str) -> PromptFile {
    // Embedded files ship inside the crate; failing to parse one is a build defect.
    serde_yaml::from_str(yaml).unwrap_or_else(|e| panic!("embedded prompts {name}: {e}"))
}

/// Prompt set built from the YAML embedded at compile time.
pub fn default_from_embedded() -> PromptSet {
    PromptSet {
        qa: parse_embedded(QA_FILE, EMBED_QA),
        math: parse_embedded(MATH_FILE, EMBED_MATH),
        code: parse_embedded(CODE_FILE, EMBED_CODE),
        cot: parse_embedded(COT_FILE, EMBED_COT),
    }
}

/// Tries to read and parse one YAML file. Missing file returns `None`.
fn read_yaml_file(dir: &Path, name: &str) -> Result<Option<PromptFile>, LoadError> {
    let path = dir.join(name);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LoadError::ReadFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };
    let file = serde_yaml::from_str(&content).map_err(|e| LoadError::ParseYaml {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(file))
}

fn merge(over: Option<PromptFile>, default: PromptFile) -> PromptFile {
    match over {
        Some(o) => PromptFile {
            template: o.template.or(default.template),
            examples: o.examples.or(default.examples),
        },
        None => default,
    }
}

/// Loads prompt assets from `dir`, falling back per-file and per-field to the
/// embedded defaults.
pub fn load(dir: &Path) -> Result<PromptSet, LoadError> {
    let defaults = default_from_embedded();
    Ok(PromptSet {
        qa: merge(read_yaml_file(dir, QA_FILE)?, defaults.qa),
        math: merge(read_yaml_file(dir, MATH_FILE)?, defaults.math),
        code: merge(read_yaml_file(dir, CODE_FILE)?, defaults.code),
        cot: merge(read_yaml_file(dir, COT_FILE)?, defaults.cot),
    })
}

/// Loads from `WEFT_PROMPTS_DIR` when set and readable, else the embedded defaults.
pub fn load_or_default() -> PromptSet {
    match std::env::var("WEFT_PROMPTS_DIR") {
        Ok(dir) => load(Path::new(&dir)).unwrap_or_else(|e| {
            tracing::warn!("prompt load failed, using embedded defaults: {e}");
            default_from_embedded()
        }),
        Err(_) => default_from_embedded(),
    }
}

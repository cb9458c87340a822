//! Declaration file loading.

use camino::Utf8Path;
use serde::Deserialize;
use tracing::debug;
use value_synth::Declaration;

use crate::error::CliError;

/// Contents of one input file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Batch { declarations: Vec<Declaration> },
    Single(Declaration),
}

impl InputDocument {
    fn into_declarations(self) -> Vec<Declaration> {
        match self {
            Self::Batch { declarations } => declarations,
            Self::Single(declaration) => vec![declaration],
        }
    }
}

fn parse(path: &Utf8Path, text: &str) -> Result<InputDocument, CliError> {
    match path.extension() {
        Some("json") => serde_json::from_str(text).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some("toml") => toml::from_str(text).map_err(|source| CliError::Toml {
            path: path.to_path_buf(),
            source: Box::new(source),
        }),
        _ => Err(CliError::UnsupportedInput(path.to_path_buf())),
    }
}

/// Reads one input file.
pub fn load_file(path: &Utf8Path) -> Result<Vec<Declaration>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let declarations = parse(path, &text)?.into_declarations();
    debug!(%path, count = declarations.len(), "loaded declarations");
    Ok(declarations)
}

/// Reads every input, keeping declarations in argument order.
pub fn load_all<P: AsRef<Utf8Path>>(paths: &[P]) -> Result<Vec<Declaration>, CliError> {
    let mut all = Vec::new();
    for path in paths {
        all.extend(load_file(path.as_ref())?);
    }
    Ok(all)
}

//! JSON documents for baked mesh records.

use meshbake_bake::OutputRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How baked records are split into documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One document per record, in record order.
    #[default]
    PerMesh,
    /// A single document holding an array of all records.
    Indexed,
    /// A single document holding the first record only.
    FirstMesh,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    pub pretty: bool,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no mesh nodes found in the scene graph")]
    EmptyScene,
    #[error("failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializes `records` into the documents selected by `mode`.
pub fn write_documents(
    records: &[OutputRecord],
    mode: OutputMode,
    options: &DocumentOptions,
) -> Result<Vec<String>, DocumentError> {
    puffin::profile_function!();

    let Some(first) = records.first() else {
        return Err(DocumentError::EmptyScene);
    };

    let documents = match mode {
        OutputMode::PerMesh => records
            .iter()
            .map(|record| to_json(record, options))
            .collect::<Result<Vec<_>, _>>()?,
        OutputMode::Indexed => vec![to_json(records, options)?],
        OutputMode::FirstMesh => {
            if records.len() > 1 {
                log::warn!(
                    "Writing '{}' only, {} more meshes are dropped",
                    first.name,
                    records.len() - 1
                );
            }
            vec![to_json(first, options)?]
        }
    };

    log::debug!("Serialized {} records into {} documents", records.len(), documents.len());
    Ok(documents)
}

fn to_json<T: Serialize + ?Sized>(value: &T, options: &DocumentOptions) -> serde_json::Result<String> {
    if options.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

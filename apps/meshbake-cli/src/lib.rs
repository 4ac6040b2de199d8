use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use meshbake::meshbake_bake::{bake_scene, BakeConfig};
use meshbake::meshbake_document::{write_documents, DocumentOptions, OutputMode};
use meshbake::meshbake_scene::Scene;
use meshbake::MeshBake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One file per mesh, named `<stem>_<n>.<ext>`
    PerMesh,
    /// One file holding an array of all meshes
    Indexed,
    /// One file holding the first mesh only
    FirstMesh,
}

impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::PerMesh => OutputMode::PerMesh,
            Mode::Indexed => OutputMode::Indexed,
            Mode::FirstMesh => OutputMode::FirstMesh,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Bakes the meshes of a scene into flat JSON buffers", long_about = None)]
struct Args {
    /// Scene file to read
    input: PathBuf,

    /// Document to write
    output: PathBuf,

    /// How meshes are split into documents
    #[arg(long, value_enum, default_value_t = Mode::PerMesh)]
    mode: Mode,

    /// Time in seconds at which animated transforms are sampled
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Index of the stored pose to resolve transforms through
    #[arg(long)]
    pose: Option<usize>,

    /// Keep positions and normals in the space of each mesh node
    #[arg(long, default_value_t = false)]
    local_space: bool,

    /// Write documents without indentation
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Record puffin scopes while baking
    #[arg(long, default_value_t = false)]
    profile: bool,
}

pub fn internal_main() -> Result<()> {
    let args = Args::parse();
    let meshbake = MeshBake::new("meshbake-cli").with_profiling(args.profile);

    let data = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let scene = Scene::from_json_slice(&data)
        .with_context(|| format!("failed to load scene {}", args.input.display()))?;

    let config = BakeConfig {
        time: args.time,
        pose_index: args.pose,
        bake_world_transform: !args.local_space,
    };
    let records = bake_scene(&scene, &config)?;

    let mode = OutputMode::from(args.mode);
    let options = DocumentOptions {
        pretty: !args.compact,
    };
    let documents = write_documents(&records, mode, &options)?;

    for (path, document) in document_paths(&args.output, mode, documents.len())
        .iter()
        .zip(&documents)
    {
        std::fs::write(path, document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote {}", path.display());
    }

    meshbake.finish_frame();
    Ok(())
}

/// Output file of every document. Per mesh documents are numbered after the stem of `output`.
fn document_paths(output: &Path, mode: OutputMode, count: usize) -> Vec<PathBuf> {
    if mode != OutputMode::PerMesh {
        return vec![output.to_path_buf()];
    }

    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = output.extension().map(|ext| ext.to_string_lossy().into_owned());

    (0..count)
        .map(|index| {
            let file_name = match &extension {
                Some(extension) => format!("{}_{}.{}", stem, index, extension),
                None => format!("{}_{}", stem, index),
            };
            output.with_file_name(file_name)
        })
        .collect()
}

use thiserror::Error;

/// Errors raised by the viewer core.
#[derive(Debug, Error)]
pub enum FolioError {
    /// The detail overlay was asked for a part that is not in the catalog.
    #[error("unknown part id: {0}")]
    UnknownPart(String),

    /// The bytes for an asset could not be parsed as binary glTF.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: gltf::Error,
    },

    /// The glTF parsed but contained no triangle geometry we can draw.
    #[error("asset {0} has no triangle meshes")]
    EmptyAsset(String),

    /// A primitive referenced data we cannot read (external buffers, missing positions).
    #[error("asset {path}: {reason}")]
    Unsupported { path: String, reason: String },

    /// The platform layer failed to fetch or read the asset bytes.
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, FolioError>;

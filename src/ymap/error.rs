use std::io;

/// Map export error types
#[derive(Debug)]
pub enum MapExportError {
    /// IO error occurred
    Io(io::Error),

    /// Writing the finished document failed
    Serialization(String),

    /// Scene snapshot could not be parsed
    Snapshot(String),

    /// A scene node could not be turned into a record
    MalformedNode { object: String, reason: String },
}

impl std::fmt::Display for MapExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapExportError::Io(e) => write!(f, "IO error: {}", e),
            MapExportError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            MapExportError::Snapshot(msg) => write!(f, "Invalid scene snapshot: {}", msg),
            MapExportError::MalformedNode { object, reason } => {
                write!(f, "Malformed object {}: {}", object, reason)
            }
        }
    }
}

impl std::error::Error for MapExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapExportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MapExportError {
    fn from(err: io::Error) -> Self {
        MapExportError::Io(err)
    }
}

impl From<serde_json::Error> for MapExportError {
    fn from(err: serde_json::Error) -> Self {
        MapExportError::Serialization(err.to_string())
    }
}

impl From<binrw::Error> for MapExportError {
    fn from(err: binrw::Error) -> Self {
        MapExportError::Serialization(err.to_string())
    }
}

/// Result type for map export operations
pub type Result<T> = std::result::Result<T, MapExportError>;

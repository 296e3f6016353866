use crate::{crs::CrsWarning, kernel::KernelError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Malformed GeoJSON input: {0}")]
    MalformedInput(String),

    #[error("Unsupported geometry type `{0}`, only Polygon and MultiPolygon are accepted.")]
    UnsupportedGeometry(String),

    #[error("GeometryCollection nesting exceeds the limit of {0} levels.")]
    NestingTooDeep(usize),

    #[error("Geometry kernel failure.")]
    GeometryKernel(#[from] KernelError),

    #[error(transparent)]
    Crs(#[from] CrsWarning),

    #[error("Serde error.")]
    Serde(#[from] serde_json::Error),

    #[error("Could not read the GeoJSON file.")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

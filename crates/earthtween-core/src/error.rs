use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Failed to decode source raster for {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Malformed capture record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Degenerate longitude span ({span}°) between {previous} and {current}")]
    DegenerateSpan {
        previous: String,
        current: String,
        span: f64,
    },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Metadata parse error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Pair {previous} -> {current} failed: {source}")]
    Pair {
        previous: String,
        current: String,
        #[source]
        source: Box<InterpError>,
    },

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl InterpError {
    /// Identifier of the single record this error is about, if any.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::Decode { id, .. } | Self::MalformedRecord { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Attach the identifiers of the two records a failure belongs to.
    pub fn for_pair(self, previous: &str, current: &str) -> Self {
        match self {
            err @ Self::Pair { .. } => err,
            err => Self::Pair {
                previous: previous.to_string(),
                current: current.to_string(),
                source: Box::new(err),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, InterpError>;

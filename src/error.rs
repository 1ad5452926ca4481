use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Projection error: {0}")]
    Projection(#[from] ProjError),

    #[error("No candidate footprint larger than {min_fragment_sqkm} sqkm; widen the search or lower the threshold")]
    EmptyCandidateSet { min_fragment_sqkm: f64 },

    #[error("Invalid geometry operation: {0}")]
    InvalidGeometry(String),

    #[error("Scene {scene}: ranking attribute '{attribute}' is missing or not numeric")]
    MissingAttribute { scene: String, attribute: String },

    #[error("AOI has zero area in the working CRS")]
    DegenerateAoi,

    #[error("Invalid selection config: {0}")]
    InvalidConfig(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{dropped} of {expected} sections vanished when clipped to the AOI")]
    SectionsDropped { expected: usize, dropped: usize },
}

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),

    #[error("Transform failed: {0}")]
    TransformFailed(String),
}

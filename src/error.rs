//! Error types shared by the lookup, recommendation and classifier paths.

use thiserror::Error;

use crate::geo::DistanceError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("soil dataset is empty")]
    EmptyDataset,

    #[error("no distance could be computed for any of the {excluded} soil records")]
    DistanceComputationFailed { excluded: usize },

    #[error("soil record {index} has unusable coordinates: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: DistanceError,
    },

    #[error("missing expected column in soil data: {0}")]
    MissingColumn(String),

    #[error("unable to geocode the provided location: {0}")]
    LocationNotResolved(String),

    #[error("geocoding service is unavailable ({0}); please enter coordinates manually")]
    GeocodingUnavailable(String),

    #[error("invalid latitude or longitude values: {0}")]
    InvalidCoordinates(String),

    #[error("please provide a location or coordinates")]
    MissingInput,

    #[error("unknown soil type: {0}")]
    UnknownSoilType(String),

    #[error("unknown month: {0}")]
    UnknownMonth(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("soil classifier is unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("unexpected classifier output: {0}")]
    ClassifierOutput(String),

    #[error("background task failed: {0}")]
    BackgroundTask(String),

    #[error("failed to read soil dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse soil dataset: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether the user can fix the problem by changing their input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::LocationNotResolved(_)
                | Error::InvalidCoordinates(_)
                | Error::MissingInput
                | Error::UnknownSoilType(_)
                | Error::UnknownMonth(_)
                | Error::InvalidImage(_)
        )
    }

    /// Whether an external collaborator was down rather than the request being wrong
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Error::GeocodingUnavailable(_) | Error::ClassifierUnavailable(_)
        )
    }
}

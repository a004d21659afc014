use std::fmt::Display;

use crate::huffman::CodingError;

#[derive(Debug)]
pub enum Error {
    UnableToOpenInputFileForReading(String, std::io::Error),
    FailedToReadInputFile(String, std::io::Error),
    HuffmanCodeConstructionFailed(String, CodingError),
    RoundTripFailed(String, CodingError),
    RoundTripMismatch(String),
    AnalysisAborted(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::FailedToReadInputFile(path, error) => {
                write!(f, "Failed to read input file '{}': {}", path, error)
            }
            Self::HuffmanCodeConstructionFailed(path, error) => {
                write!(f, "Unable to build huffman code for '{}': {}", path, error)
            }
            Self::RoundTripFailed(path, error) => {
                write!(f, "Round trip of '{}' failed: {}", path, error)
            }
            Self::RoundTripMismatch(path) => {
                write!(f, "Decoded content of '{}' differs from the input", path)
            }
            Self::AnalysisAborted(path) => {
                write!(f, "Analysis of '{}' was aborted", path)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::FailedToReadInputFile(_, error) => Some(error),
            Self::HuffmanCodeConstructionFailed(_, error) | Self::RoundTripFailed(_, error) => {
                Some(error)
            }
            Self::RoundTripMismatch(_) | Self::AnalysisAborted(_) => None,
        }
    }
}

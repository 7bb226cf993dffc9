use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::common::SpeciesLookupError;
use crate::kernels::ZeemanError;
use crate::numerics::{AxisError, ConvolutionError};
use crate::stark::StarkTableError;

pub type LineShapeResult<T> = Result<T, LineShapeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineShapeErrorCategory {
    InvalidAxis,
    InvalidParameter,
    MissingData,
    IoSystem,
    UnsupportedLine,
    Computation,
    Internal,
}

impl LineShapeErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InvalidAxis | Self::InvalidParameter => 2,
            Self::MissingData | Self::IoSystem => 3,
            Self::UnsupportedLine | Self::Computation => 4,
            Self::Internal => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidAxis => "InvalidAxisError",
            Self::InvalidParameter => "InvalidParameterError",
            Self::MissingData => "MissingDataError",
            Self::IoSystem => "IoSystemError",
            Self::UnsupportedLine => "UnsupportedLineError",
            Self::Computation => "ComputationError",
            Self::Internal => "InternalError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineShapeError {
    category: LineShapeErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl LineShapeError {
    pub fn new(
        category: LineShapeErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn invalid_axis(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LineShapeErrorCategory::InvalidAxis, placeholder, message)
    }

    pub fn invalid_parameter(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LineShapeErrorCategory::InvalidParameter, placeholder, message)
    }

    pub fn missing_data(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LineShapeErrorCategory::MissingData, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LineShapeErrorCategory::IoSystem, placeholder, message)
    }

    pub fn unsupported_line(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LineShapeErrorCategory::UnsupportedLine, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LineShapeErrorCategory::Computation, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LineShapeErrorCategory::Internal, placeholder, message)
    }

    pub const fn category(&self) -> LineShapeErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }
}

impl Display for LineShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for LineShapeError {}

impl From<AxisError> for LineShapeError {
    fn from(error: AxisError) -> Self {
        Self::invalid_axis("INPUT.AXIS", error.to_string())
    }
}

impl From<ConvolutionError> for LineShapeError {
    fn from(error: ConvolutionError) -> Self {
        Self::computation("RUN.CONVOLUTION", error.to_string())
    }
}

impl From<ZeemanError> for LineShapeError {
    fn from(error: ZeemanError) -> Self {
        Self::invalid_parameter("INPUT.ZEEMAN", error.to_string())
    }
}

impl From<SpeciesLookupError> for LineShapeError {
    fn from(error: SpeciesLookupError) -> Self {
        Self::invalid_parameter("INPUT.SPECIES", error.to_string())
    }
}

impl From<StarkTableError> for LineShapeError {
    fn from(error: StarkTableError) -> Self {
        match error {
            StarkTableError::MissingFile { .. } => {
                Self::missing_data("DATA.STARK_TABLE_MISSING", error.to_string())
            }
            StarkTableError::Read { .. } => {
                Self::missing_data("DATA.STARK_TABLE_READ", error.to_string())
            }
            StarkTableError::Format { .. } | StarkTableError::MissingColumn { .. } => {
                Self::computation("DATA.STARK_TABLE_FORMAT", error.to_string())
            }
            StarkTableError::Interpolation { .. } => {
                Self::computation("RUN.STARK_INTERPOLATION", error.to_string())
            }
            StarkTableError::EmptyStock { .. } | StarkTableError::InvalidQuery { .. } => {
                Self::invalid_parameter("INPUT.STARK_QUERY", error.to_string())
            }
            StarkTableError::CachePoisoned => {
                Self::internal("SYS.STARK_CACHE", error.to_string())
            }
        }
    }
}

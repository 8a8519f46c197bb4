use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Outcome category of an action.
///
/// Every failure the library reports maps onto exactly one status, which callers
/// translate into their own presentation (exit codes, HTTP codes, colors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
    NotFound,
    AlreadyExists,
    MaxDepthReached,
    InvalidOperation,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
            Status::NotFound => "not_found",
            Status::AlreadyExists => "already_exists",
            Status::MaxDepthReached => "max_depth_reached",
            Status::InvalidOperation => "invalid_operation",
        }
    }

    /// HTTP status code an HTTP front end should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Status::Success => 200,
            Status::NotFound => 404,
            Status::MaxDepthReached => 403,
            Status::InvalidOperation | Status::AlreadyExists => 409,
            Status::Error => 500,
        }
    }

    /// Like [`Status::http_status`], but answers 201 for successful creations.
    pub fn created_status(&self) -> u16 {
        match self {
            Status::Success => 201,
            other => other.http_status(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum MindmapError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MaxDepthReached(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid map data: {0}")]
    Format(String),

    #[error("No mind map loaded. Use 'new' or 'load'.")]
    NoMap,

    #[error("Config error: {0}")]
    Config(String),
}

impl MindmapError {
    pub fn status(&self) -> Status {
        match self {
            MindmapError::NotFound(_) => Status::NotFound,
            MindmapError::MaxDepthReached(_) => Status::MaxDepthReached,
            MindmapError::InvalidOperation(_) => Status::InvalidOperation,
            MindmapError::AlreadyExists(_) => Status::AlreadyExists,
            MindmapError::Io(_)
            | MindmapError::Serialization(_)
            | MindmapError::Format(_)
            | MindmapError::NoMap
            | MindmapError::Config(_) => Status::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, MindmapError>;

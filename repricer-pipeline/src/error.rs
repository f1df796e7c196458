use thiserror::Error;

/// Failure to read one of the collaborator files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON feed must be an array of objects, found {0}")]
    JsonShape(String),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML feed: {0}")]
    XmlShape(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Invalid run configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: String, value: String },

    #[error("{0}")]
    Inconsistent(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

use thiserror::Error;

/// I/O errors that can occur when reading metadata files or writing outputs
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// File or container stream does not exist
    #[error("Can't find file: {0}")]
    NotFound(String),

    /// Reading a file or stream failed
    #[error("Error reading {path}: {message}")]
    Read { path: String, message: String },

    /// Writing an output file failed
    #[error("Error writing {path}: {message}")]
    Write { path: String, message: String },

    /// Text could not be decoded
    #[error("Unexpected encoding: {0}")]
    Decode(String),
}

impl IoError {
    /// Build a read error from a `std::io::Error`, mapping "not found" separately.
    pub fn read(path: impl Into<String>, err: &std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            IoError::NotFound(path)
        } else {
            IoError::Read {
                path,
                message: err.to_string(),
            }
        }
    }

    /// Build a write error from a `std::io::Error`.
    pub fn write(path: impl Into<String>, err: &std::io::Error) -> Self {
        IoError::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors raised while parsing INI or XML metadata
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// An option appeared before any `[section]` header
    #[error("File contains no section headers (line {line}): {content}")]
    MissingSectionHeader { line: usize, content: String },

    /// A line that is neither a header, an option nor a comment
    #[error("Parsing error at line {line}: {content}")]
    MalformedLine { line: usize, content: String },

    /// Requested section does not exist
    #[error("No section: '{0}'")]
    MissingSection(String),

    /// Requested option does not exist in the section
    #[error("No option '{option}' in section: '{section}'")]
    MissingOption { section: String, option: String },

    /// A value could not be converted to the expected type
    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: String, value: String },

    /// The XML document is not well-formed
    #[error("XML error: {0}")]
    Xml(String),

    /// An expected XML element is missing
    #[error("Missing XML element: {0}")]
    MissingElement(String),

    /// An expected XML attribute is missing
    #[error("Missing XML attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        ParseError::Xml(err.to_string())
    }
}

/// Errors related to the dataset model
#[derive(Debug, Clone, Error)]
pub enum DatasetError {
    #[error("Illegal dataset type: {0}.")]
    InvalidDatasetType(String),

    #[error("Illegal storage type: {0}.")]
    InvalidStorageType(String),

    #[error("File name missing for storage type 'single'.")]
    MissingFileName,

    #[error("Unknown overlap unit: {0}")]
    UnknownOverlapUnit(String),

    /// Overlap is stored in a different unit than the one requested
    #[error("Unit conversion not implemented ({from} to {to})!")]
    UnitConversion { from: String, to: String },

    /// Relative position requested before the tile grid indices are known
    #[error("Tile numbers are not set for {0}")]
    MissingTileNumbers(String),
}

/// Errors related to format detection and reading vendor files
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// INI or XML parsing error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Dataset model error
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// File format is not supported
    #[error("Unsupported format: {reason}")]
    UnsupportedFormat { reason: String },

    /// Required metadata is missing or malformed
    #[error("Error parsing dimensions from {path}: {reason}")]
    InvalidMetadata { path: String, reason: String },

    /// The project file is not a valid (or supported) experiment description
    #[error("Invalid project: {reason}")]
    InvalidProject { reason: String },

    /// The OLE2 compound container could not be read
    #[error("Container error: {0}")]
    Container(String),

    /// OIR scan reached EOF before all XML blocks were found
    #[error("Couldn't find all requested XML blocks in {path} (missing: {missing})")]
    MissingXmlBlocks { path: String, missing: String },
}

/// Errors raised while generating tile configurations and macros
#[derive(Debug, Clone, Error)]
pub enum MacroError {
    /// I/O error while reading a template or writing outputs
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    #[error("Unknown macro template: {0}")]
    UnknownTemplate(String),

    /// Template refers to a variable that is not provided
    #[error("Unknown placeholder '${{{name}}}' at byte {offset}")]
    UnknownPlaceholder { name: String, offset: usize },

    /// A `${` without a matching `}`
    #[error("Unclosed placeholder at byte {0}")]
    UnclosedPlaceholder(usize),

    #[error("Experiment contains no mosaics")]
    EmptyExperiment,

    /// A tile has no relative position yet
    #[error("Tile has no relative position: {0}")]
    MissingPosition(String),

    #[error("Invalid stitching options: {0}")]
    InvalidOptions(String),
}

use thiserror::Error;

/// Main error type for the pipeline.
/// Aggregates errors from the standard library, dependencies, and the
/// crate's own modules.
#[derive(Error, Debug)]
pub enum ContourGridError {
    // Standard library errors
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    // Third-party library errors
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    // Crate module errors
    #[error("{0}")]
    XmlHelper(#[from] crate::source::xml::XmlError),

    #[error("{0}")]
    Source(#[from] crate::source::SourceError),

    #[error("{0}")]
    Table(#[from] crate::table::TableError),

    #[error("{0}")]
    Group(#[from] crate::group::GroupError),

    #[error("{0}")]
    Plot(#[from] crate::plot::PlotError),
}

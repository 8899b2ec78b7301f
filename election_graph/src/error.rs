use snafu::Snafu;

use crate::convert::ConvertError;

/// Errors that abort a load.
///
/// Every variant names the kind of entity being loaded and, when it is
/// already known, the id of the offending record.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoadError {
    #[snafu(display("{entity} {}: missing required field {attr:?}", show_id(id)))]
    MissingRequiredField {
        entity: &'static str,
        id: Option<String>,
        attr: &'static str,
    },

    /// A binding ran before the registry it depends on was published.
    #[snafu(display(
        "{entity} {}: field {attr:?} depends on {dependency:?}, which is not loaded yet",
        show_id(id)
    ))]
    MissingDependency {
        entity: &'static str,
        id: Option<String>,
        attr: &'static str,
        dependency: &'static str,
    },

    #[snafu(display("registry {name:?} was already published"))]
    AlreadyPublished { name: &'static str },

    #[snafu(display(
        "{entity} {}: invalid value for field {attr:?}: {raw}: {source}",
        show_id(id)
    ))]
    InvalidValueFormat {
        entity: &'static str,
        id: Option<String>,
        attr: &'static str,
        raw: String,
        source: ConvertError,
    },

    #[snafu(display("{entity}: duplicate id {id:?}"))]
    DuplicateId { entity: &'static str, id: String },

    #[snafu(display(
        "{entity} {}: field {attr:?} refers to unknown id {missing:?}",
        show_id(id)
    ))]
    DanglingReference {
        entity: &'static str,
        id: Option<String>,
        attr: &'static str,
        missing: String,
    },

    /// `raw` holds the leftover values, in the order of `keys`, shortened
    /// to a few dozen characters.
    #[snafu(display(
        "{entity} {}: unrecognized fields {keys:?} with values {raw:?}",
        show_id(id)
    ))]
    UnrecognizedField {
        entity: &'static str,
        id: Option<String>,
        keys: Vec<String>,
        raw: Vec<String>,
    },

    #[snafu(display("header {id:?} is its own ancestor"))]
    HeaderCycle { id: String },

    #[snafu(display("{entity} {id:?}: {message}"))]
    StructuralMismatch {
        entity: &'static str,
        id: String,
        message: String,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

fn show_id(id: &Option<String>) -> String {
    match id {
        Some(x) => format!("{:?}", x),
        None => "(no id)".to_string(),
    }
}

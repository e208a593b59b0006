use crate::prelude::*;

use super::event_summary::EventSummary;

use quick_xml::name::QName;

#[derive(Debug, thiserror::Error, From)]
pub enum ReadError {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    InvalidValue(InvalidValue),
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml element: {xml_err}")]
pub struct MalformedXml {
    xml_err: quick_xml::Error,
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml attribute: {att_err}")]
pub struct MalformedAttribute {
    att_err: quick_xml::events::attributes::AttrError,
}

#[derive(Display, Debug)]
#[display(fmt = "unexpected element. Expected `{expected_name}`, got {actual_element}")]
pub struct UnexpectedElement {
    expected_name: String,
    actual_element: EventSummary,
}

impl UnexpectedElement {
    pub(crate) fn new<T: Into<String>>(expected_name: T, actual_element: EventSummary) -> Self {
        Self {
            expected_name: expected_name.into(),
            actual_element,
        }
    }
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "missing attribute `{attribute_name}` in {element_name} element")]
pub struct MissingAttribute {
    element_name: String,
    attribute_name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "invalid value for {attribute_name} in {element_name} element: {value}")]
pub struct InvalidValue {
    element_name: String,
    attribute_name: String,
    value: ParsedNameOrBytes,
}

#[derive(From, Display, Debug)]
pub enum ParsedNameOrBytes {
    #[display(fmt = "{_0}")]
    Utf8(String),
    #[display(fmt = "{_0:?} (cannot convert to UTF8 string)")]
    Bytes(Vec<u8>),
}

impl ParsedNameOrBytes {
    pub(crate) fn new(bytes: &[u8]) -> Self {
        let vec = Vec::from(bytes);
        match String::from_utf8(vec) {
            Ok(string) => Self::Utf8(string),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

impl<'a> From<QName<'a>> for ParsedNameOrBytes {
    fn from(x: QName) -> Self {
        Self::new(x.as_ref())
    }
}

impl<'a> From<&'a str> for ParsedNameOrBytes {
    fn from(x: &str) -> Self {
        Self::Utf8(x.into())
    }
}

/// failures while turning a [`Document`](super::Document) back into a grid
#[derive(Debug, thiserror::Error, From)]
pub enum GridError {
    #[error("{0}")]
    UnknownCellType(UnknownCellType),
    #[error("{0}")]
    ConstructFailed(ConstructFailed),
    #[error("{0}")]
    UnknownAttribute(UnknownAttribute),
    #[error("{0}")]
    ArrayShape(ArrayShape),
    #[error("{0}")]
    DuplicateCellType(DuplicateCellType),
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "cell type `{name}` is not registered")]
pub struct UnknownCellType {
    name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "the factory for cell type `{name}` did not produce metadata")]
pub struct ConstructFailed {
    name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "cell type `{cell_type}` has values for undeclared attribute `{attribute}`")]
pub struct UnknownAttribute {
    attribute: String,
    cell_type: String,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "values of `{attribute}` on `{cell_type}` have {rows} rows (expected {cells}) \
           or a column count that does not match its components"
)]
pub struct ArrayShape {
    attribute: String,
    cell_type: String,
    rows: usize,
    cells: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "cell type `{name}` appears more than once")]
pub struct DuplicateCellType {
    name: String,
}

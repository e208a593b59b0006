use super::error::{self, ReadError};
use super::event_summary::EventSummary;
use super::write::{Encoding, FORMAT_VERSION};
use super::{ArrayRecord, AttributeRecord, CellTypeRecord, Document};
use crate::prelude::*;
use crate::utils;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use std::io::BufRead;

/// parse a document written by [`write_document`](super::write_document)
pub fn read_document<R: BufRead>(reader: R) -> Result<Document, ReadError> {
    let mut reader = Reader::from_reader(reader);
    reader.trim_text(true);

    let mut buffer = Vec::new();
    let mut inner_buffer = Vec::new();

    read_to_root(&mut reader, &mut buffer)?;

    let mut document = Document::default();

    loop {
        buffer.clear();
        let event = reader
            .read_event_into(&mut buffer)
            .map_err(error::MalformedXml::from)?;

        match event {
            Event::Empty(element) if element.name().as_ref() == b"Attribute" => {
                document.attributes.push(parse_attribute(&element)?);
            }
            Event::Empty(element) if element.name().as_ref() == b"CellType" => {
                document.cell_types.push(parse_cell_type(&element)?);
            }
            Event::Start(element) if element.name().as_ref() == b"CellType" => {
                let mut record = parse_cell_type(&element)?;
                read_arrays(&mut reader, &mut inner_buffer, &mut record)?;
                document.cell_types.push(record);
            }
            Event::End(element) if element.name().as_ref() == b"CellGrid" => break,
            Event::Comment(_) => continue,
            Event::Eof => {
                let mismatch = error::UnexpectedElement::new("/CellGrid", EventSummary::eof());
                return Err(mismatch.into());
            }
            other => {
                let expected = "Attribute, CellType or /CellGrid";
                let mismatch = error::UnexpectedElement::new(expected, EventSummary::new(&other));
                return Err(mismatch.into());
            }
        }
    }

    Ok(document)
}

pub fn read_document_from_str(xml: &str) -> Result<Document, ReadError> {
    read_document(xml.as_bytes())
}

/// skip the declaration and open the `CellGrid` element
fn read_to_root<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<(), ReadError> {
    loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        match event {
            // sometimes there are headers for type of file, we just continue
            Event::Decl(_) | Event::Comment(_) | Event::DocType(_) => continue,
            Event::Start(element) if element.name().as_ref() == b"CellGrid" => {
                if let Some(version) = attribute_value(&element, "version")? {
                    if version != FORMAT_VERSION {
                        return Err(error::InvalidValue::new(
                            "CellGrid".into(),
                            "version".into(),
                            version.as_str().into(),
                        )
                        .into());
                    }
                }
                return Ok(());
            }
            Event::Eof => {
                return Err(error::UnexpectedElement::new("CellGrid", EventSummary::eof()).into());
            }
            other => {
                let mismatch = error::UnexpectedElement::new("CellGrid", EventSummary::new(&other));
                return Err(mismatch.into());
            }
        }
    }
}

fn read_arrays<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    record: &mut CellTypeRecord,
) -> Result<(), ReadError> {
    let mut values_buffer = Vec::new();

    loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        match event {
            Event::Empty(element) if element.name().as_ref() == b"DataArray" => {
                let header = parse_array_header(&element)?;
                record.arrays.push(header.into_record(Vec::new())?);
            }
            Event::Start(element) if element.name().as_ref() == b"DataArray" => {
                let header = parse_array_header(&element)?;
                let values = read_array_values(reader, &mut values_buffer, &header)?;
                record.arrays.push(header.into_record(values)?);
            }
            Event::End(element) if element.name().as_ref() == b"CellType" => return Ok(()),
            Event::Comment(_) => continue,
            Event::Eof => {
                return Err(error::UnexpectedElement::new("/CellType", EventSummary::eof()).into());
            }
            other => {
                let expected = "DataArray or /CellType";
                let mismatch = error::UnexpectedElement::new(expected, EventSummary::new(&other));
                return Err(mismatch.into());
            }
        }
    }
}

/// read the text of an open `DataArray` up to and including its end tag
fn read_array_values<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    header: &ArrayHeader,
) -> Result<Vec<f64>, ReadError> {
    let mut values = Vec::new();

    loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        match event {
            Event::Text(text) => {
                let text = text.unescape().map_err(error::MalformedXml::from)?;
                values = header.decode(&text)?;
            }
            Event::End(element) if element.name().as_ref() == b"DataArray" => return Ok(values),
            Event::Eof => {
                return Err(error::UnexpectedElement::new("/DataArray", EventSummary::eof()).into());
            }
            other => {
                let actual = EventSummary::new(&other);
                return Err(error::UnexpectedElement::new("/DataArray", actual).into());
            }
        }
    }
}

fn parse_attribute(element: &BytesStart) -> Result<AttributeRecord, ReadError> {
    let name = required_value(element, "Attribute", "Name")?;
    let tags = attribute_value(element, "Tags")?
        .map(|tags| TagSet::parse(&tags))
        .unwrap_or_default();
    let components = parse_usize(element, "Attribute", "NumberOfComponents")?;

    Ok(AttributeRecord::new(name, tags, components))
}

fn parse_cell_type(element: &BytesStart) -> Result<CellTypeRecord, ReadError> {
    let name = required_value(element, "CellType", "Name")?;
    let cells = parse_usize(element, "CellType", "NumberOfCells")?;

    Ok(CellTypeRecord::new(name, cells, Vec::new()))
}

struct ArrayHeader {
    attribute: String,
    columns: usize,
    encoding: Encoding,
}

impl ArrayHeader {
    fn invalid(&self, attribute_name: &str, value: error::ParsedNameOrBytes) -> ReadError {
        error::InvalidValue::new("DataArray".into(), attribute_name.into(), value).into()
    }

    fn decode(&self, text: &str) -> Result<Vec<f64>, ReadError> {
        match self.encoding {
            Encoding::Ascii => text
                .split_whitespace()
                .map(|number| {
                    number
                        .parse::<f64>()
                        .map_err(|_| self.invalid("values", number.into()))
                })
                .collect(),
            Encoding::Base64 => {
                let bytes = base64::decode(text.trim())
                    .map_err(|_| self.invalid("values", text.into()))?;
                utils::bytes_to_floats(&bytes).ok_or_else(|| self.invalid("values", text.into()))
            }
        }
    }

    fn into_record(self, values: Vec<f64>) -> Result<ArrayRecord, ReadError> {
        if self.columns == 0 || values.len() % self.columns != 0 {
            let columns = self.columns.to_string();
            return Err(self.invalid("NumberOfColumns", columns.as_str().into()));
        }

        let rows = values.len() / self.columns;
        let values = Array2::from_shape_vec((rows, self.columns), values)
            .map_err(|_| self.invalid("values", "array shape".into()))?;

        Ok(ArrayRecord::new(self.attribute, values))
    }
}

fn parse_array_header(element: &BytesStart) -> Result<ArrayHeader, ReadError> {
    let attribute = required_value(element, "DataArray", "Attribute")?;
    let columns = parse_usize(element, "DataArray", "NumberOfColumns")?;

    let encoding = match attribute_value(element, "format")?.as_deref() {
        None | Some("ascii") => Encoding::Ascii,
        Some("base64") => Encoding::Base64,
        Some(other) => {
            let value = other.into();
            let invalid = error::InvalidValue::new("DataArray".into(), "format".into(), value);
            return Err(invalid.into());
        }
    };

    Ok(ArrayHeader {
        attribute,
        columns,
        encoding,
    })
}

/// the value of `attribute_name` on `element`, if present
fn attribute_value(
    element: &BytesStart,
    attribute_name: &str,
) -> Result<Option<String>, ReadError> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(error::MalformedAttribute::from)?;

        if attribute.key.as_ref() == attribute_name.as_bytes() {
            // entities written by the writer are turned back into characters here
            let value = attribute.unescape_value().map_err(error::MalformedXml::from)?;
            return Ok(Some(value.into_owned()));
        }
    }

    Ok(None)
}

fn required_value(
    element: &BytesStart,
    element_name: &str,
    attribute_name: &str,
) -> Result<String, ReadError> {
    attribute_value(element, attribute_name)?.ok_or_else(|| {
        error::MissingAttribute::new(element_name.into(), attribute_name.into()).into()
    })
}

fn parse_usize(
    element: &BytesStart,
    element_name: &str,
    attribute_name: &str,
) -> Result<usize, ReadError> {
    let value = required_value(element, element_name, attribute_name)?;
    value.parse().map_err(|_| {
        let found = value.as_str().into();
        error::InvalidValue::new(element_name.into(), attribute_name.into(), found).into()
    })
}

use super::{ArrayRecord, AttributeRecord, CellTypeRecord, Document};
use crate::prelude::*;
use crate::utils;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub(crate) const FORMAT_VERSION: &str = "1.0";

/// how the values of a `DataArray` are stored inline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// space separated decimal numbers
    #[default]
    Ascii,
    /// base64 of the little endian bytes
    Base64,
}

impl Encoding {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::Base64 => "base64",
        }
    }
}

/// Write a document as xml to `writer`.
pub fn write_document<W: Write>(
    writer: W,
    document: &Document,
    encoding: Encoding,
) -> Result<(), Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let root = BytesStart::new("CellGrid").with_attributes([("version", FORMAT_VERSION)]);
    writer.write_event(Event::Start(root))?;

    for attribute in &document.attributes {
        write_attribute(&mut writer, attribute)?;
    }

    for cell_type in &document.cell_types {
        write_cell_type(&mut writer, cell_type, encoding)?;
    }

    writer.write_event(Event::End(BytesEnd::new("CellGrid")))?;

    Ok(())
}

fn write_attribute<W: Write>(
    writer: &mut Writer<W>,
    attribute: &AttributeRecord,
) -> Result<(), Error> {
    let tags = attribute.tags.to_string();
    let components = attribute.components.to_string();

    let element = BytesStart::new("Attribute").with_attributes([
        ("Name", attribute.name.as_str()),
        ("Tags", tags.as_str()),
        ("NumberOfComponents", components.as_str()),
    ]);
    writer.write_event(Event::Empty(element))?;

    Ok(())
}

fn write_cell_type<W: Write>(
    writer: &mut Writer<W>,
    cell_type: &CellTypeRecord,
    encoding: Encoding,
) -> Result<(), Error> {
    let cells = cell_type.cells.to_string();

    let element = BytesStart::new("CellType")
        .with_attributes([("Name", cell_type.name.as_str()), ("NumberOfCells", cells.as_str())]);

    if cell_type.arrays.is_empty() {
        writer.write_event(Event::Empty(element))?;
        return Ok(());
    }

    writer.write_event(Event::Start(element))?;

    for array in &cell_type.arrays {
        write_array(writer, array, encoding)?;
    }

    writer.write_event(Event::End(BytesEnd::new("CellType")))?;

    Ok(())
}

fn write_array<W: Write>(
    writer: &mut Writer<W>,
    array: &ArrayRecord,
    encoding: Encoding,
) -> Result<(), Error> {
    let columns = array.values.ncols().to_string();

    let element = BytesStart::new("DataArray").with_attributes([
        ("Attribute", array.attribute.as_str()),
        ("NumberOfColumns", columns.as_str()),
        ("format", encoding.as_str()),
    ]);

    let data = match encoding {
        Encoding::Ascii => {
            // row major, every number followed by a space
            array
                .values
                .iter()
                .map(|x| {
                    let mut buffer = ryu::Buffer::new();
                    let mut num = buffer.format(*x).to_string();
                    num.push(' ');
                    num
                })
                .collect::<String>()
        }
        Encoding::Base64 => base64::encode(utils::floats_to_bytes(array.values.iter())),
    };

    writer.write_event(Event::Start(element))?;
    writer.write_event(Event::Text(BytesText::new(&data)))?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;

    Ok(())
}

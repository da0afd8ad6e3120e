//! XML codec backed by `quick-xml`'s serde support
//!
//! The root element is named after the Rust type (or its `#[serde(rename)]`).
//! Fields map to child elements; `@name` fields map to attributes.
//!
//! The deserializer trims whitespace around text content. Text that starts
//! or ends with whitespace is therefore written as CDATA, which is kept
//! verbatim, so saved documents load back unchanged. Padding in hand-written
//! plain text is still trimmed.

use std::io::{BufReader, Read, Write};

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Codec, CodecError, Decoded};

#[derive(Debug, Clone, Copy, Default)]
pub struct Xml;

impl Codec for Xml {
    const NAME: &'static str = "xml";
    const EXTENSION: &'static str = "xml";

    fn encode<T>(value: &T, writer: &mut dyn Write) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        let rendered = keep_padding(&quick_xml::se::to_string(value)?)?;
        writer.write_all(rendered.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn decode<T>(reader: &mut dyn Read) -> Result<Decoded<T>, CodecError>
    where
        T: DeserializeOwned,
    {
        let value = quick_xml::de::from_reader(BufReader::new(reader))?;
        Ok(Decoded::lenient(value))
    }
}

/// Rewrites text nodes with leading or trailing whitespace as CDATA
fn keep_padding(rendered: &str) -> Result<String, CodecError> {
    let mut reader = Reader::from_str(rendered);
    let mut out = String::with_capacity(rendered.len());

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let end = reader.buffer_position() as usize;

        match event {
            Event::Eof => break,
            Event::Text(text) => {
                let text = text.unescape().map_err(quick_xml::Error::from)?;
                if text.trim().len() == text.len() {
                    out.push_str(&rendered[start..end]);
                } else {
                    // A `]]>` inside the text closes one section and opens the next
                    out.push_str("<![CDATA[");
                    out.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
                    out.push_str("]]>");
                }
            }
            _ => out.push_str(&rendered[start..end]),
        }
    }

    Ok(out)
}

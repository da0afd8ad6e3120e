//! JSON codec backed by `serde_json`

use std::io::{BufReader, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Codec, CodecError, Decoded};

/// Pretty-printed JSON; unknown keys are ignored on decode
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Codec for Json {
    const NAME: &'static str = "json";
    const EXTENSION: &'static str = "json";

    fn encode<T>(value: &T, writer: &mut dyn Write) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn decode<T>(reader: &mut dyn Read) -> Result<Decoded<T>, CodecError>
    where
        T: DeserializeOwned,
    {
        let value = serde_json::from_reader(BufReader::new(reader))?;
        Ok(Decoded::lenient(value))
    }
}

//! YAML codec backed by `serde_yaml`

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Codec, CodecError, Decoded};

/// YAML with a `.yml` temp suffix; unknown keys are ignored on decode
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Codec for Yaml {
    const NAME: &'static str = "yaml";
    const EXTENSION: &'static str = "yml";

    fn encode<T>(value: &T, writer: &mut dyn Write) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        serde_yaml::to_writer(&mut *writer, value)?;
        Ok(())
    }

    fn decode<T>(reader: &mut dyn Read) -> Result<Decoded<T>, CodecError>
    where
        T: DeserializeOwned,
    {
        // serde_yaml refuses streams with more than one document
        let value = serde_yaml::from_reader(reader)?;
        Ok(Decoded::lenient(value))
    }
}

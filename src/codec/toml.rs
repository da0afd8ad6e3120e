//! Strict TOML codec
//!
//! Decoding goes through `serde_ignored` so every key the target type did
//! not consume is recorded as a dotted path (`server.tls.cert`,
//! `servers.0.extra` for array elements).
//!
//! Keys that land in a `#[serde(flatten)]` field are buffered by serde
//! before the target sees them, so extras next to a flattened field are
//! not reported. Types that need strict checking should avoid flatten.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Codec, CodecError, Decoded, StrictnessReport};

#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

impl Codec for Toml {
    const NAME: &'static str = "toml";
    const EXTENSION: &'static str = "toml";

    fn encode<T>(value: &T, writer: &mut dyn Write) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        let rendered = ::toml::to_string_pretty(value)?;
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    }

    fn decode<T>(reader: &mut dyn Read) -> Result<Decoded<T>, CodecError>
    where
        T: DeserializeOwned,
    {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let mut unknown = Vec::new();
        let value = serde_ignored::deserialize(::toml::Deserializer::new(&content), |path| {
            let mut key = String::new();
            stringify(&mut key, &path);
            unknown.push(key);
        })?;

        Ok(Decoded {
            value,
            report: StrictnessReport::from_keys(unknown),
        })
    }
}

/// Renders an ignored-key path in dotted notation
fn stringify(dst: &mut String, path: &serde_ignored::Path<'_>) {
    use serde_ignored::Path;

    match path {
        Path::Root => {}
        Path::Seq { parent, index } => {
            stringify(dst, parent);
            if !dst.is_empty() {
                dst.push('.');
            }
            dst.push_str(&index.to_string());
        }
        Path::Map { parent, key } => {
            stringify(dst, parent);
            if !dst.is_empty() {
                dst.push('.');
            }
            dst.push_str(key);
        }
        Path::Some { parent }
        | Path::NewtypeStruct { parent }
        | Path::NewtypeVariant { parent } => stringify(dst, parent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Server {
        name: String,
        port: u16,
    }

    #[derive(Debug, Deserialize)]
    struct Nested {
        #[allow(dead_code)]
        server: Server,
        #[serde(default)]
        #[allow(dead_code)]
        replicas: Vec<Server>,
    }

    fn decode<T: DeserializeOwned>(input: &str) -> Decoded<T> {
        Toml::decode(&mut input.as_bytes()).unwrap()
    }

    #[test]
    fn clean_report_when_all_keys_map() {
        let decoded: Decoded<Server> = decode("name = \"example\"\nport = 8080\n");

        assert_eq!(decoded.value.port, 8080);
        assert!(decoded.report.is_clean());
    }

    #[test]
    fn reports_top_level_extra() {
        let decoded: Decoded<Server> =
            decode("name = \"example\"\nport = 8080\nextra = \"unexpected\"\n");

        assert_eq!(decoded.report.keys(), ["extra"]);
    }

    #[test]
    fn reports_nested_keys_in_dotted_order() {
        let input = r#"
zeta = 1

[server]
name = "a"
port = 1
debug = true

[server.tls]
cert = "x.pem"

[[replicas]]
name = "b"
port = 2
weight = 3
"#;
        let decoded: Decoded<Nested> = decode(input);

        assert_eq!(
            decoded.report.keys(),
            ["replicas.0.weight", "server.debug", "server.tls", "zeta"]
        );
    }

    #[test]
    fn flattened_fields_do_not_report_extras() {
        #[derive(Debug, Deserialize)]
        struct Flat {
            #[allow(dead_code)]
            name: String,
            #[serde(flatten)]
            #[allow(dead_code)]
            inner: Port,
        }

        #[derive(Debug, Deserialize)]
        struct Port {
            #[allow(dead_code)]
            port: u16,
        }

        let decoded: Decoded<Flat> = decode("name = \"a\"\nport = 1\nextra = 2\n");

        assert!(decoded.report.is_clean());
    }

    #[test]
    fn syntax_error_is_toml_decode_error() {
        let result: Result<Decoded<Server>, _> = Toml::decode(&mut &b"= invalid toml ="[..]);
        assert!(matches!(result, Err(CodecError::TomlDecode(_))));
    }

    #[test]
    fn encodes_table() {
        let mut out = Vec::new();
        Toml::encode(
            &Server {
                name: "example".to_string(),
                port: 8080,
            },
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("name = \"example\""));
        assert!(text.contains("port = 8080"));
    }
}

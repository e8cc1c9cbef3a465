use crate::error::FakeApiError;
use crate::registry::Resolution;
use crate::verbs::Method;
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::io;

/// One request as handed to the engine.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub method: Method,
    pub url: &'a str,
    pub params: Option<&'a Value>,
    pub body: Option<&'a Value>,
}

/// Fake HTTP response. Every call gets its own value; history keeps a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeResponse {
    pub status_code: u16,
    /// `status_code < 400`.
    pub ok: bool,
    /// Encoded URL with params merged in, whichever key actually matched.
    pub url: String,
    pub method: Method,
    pub params: Option<Value>,
    pub payload: Option<Value>,
    /// Resolved body.
    pub data: Value,
    pub text: String,
    pub content: Vec<u8>,
    pub reason: Option<String>,
}

impl FakeResponse {
    /// Parses `content` back into JSON.
    pub fn json(&self) -> Result<Value, FakeApiError> {
        serde_json::from_slice(&self.content).map_err(FakeApiError::BodyDecode)
    }
}

/// What a verb call hands back, depending on [`Returns`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Response(FakeResponse),
    Data(Value),
}

impl Reply {
    pub fn response(&self) -> Option<&FakeResponse> {
        match self {
            Reply::Response(response) => Some(response),
            Reply::Data(_) => None,
        }
    }

    pub fn into_response(self) -> Option<FakeResponse> {
        match self {
            Reply::Response(response) => Some(response),
            Reply::Data(_) => None,
        }
    }

    /// The resolved body in either mode.
    pub fn data(&self) -> &Value {
        match self {
            Reply::Response(response) => &response.data,
            Reply::Data(data) => data,
        }
    }
}

/// Reply mode of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Returns {
    /// Full [`FakeResponse`].
    #[default]
    Response,
    /// The resolved body only.
    Data,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSynthesizer {
    /// Status of unmatched calls; the verb default when unset.
    nourl_status: Option<u16>,
}

impl ResponseSynthesizer {
    pub fn new(nourl_status: Option<u16>) -> Self {
        Self { nourl_status }
    }

    pub fn synthesize(
        &self,
        request: &Request<'_>,
        response_url: &str,
        resolution: Resolution<'_>,
    ) -> Result<FakeResponse, FakeApiError> {
        let default_status = request.method.default_status();
        let (status_code, data) = match resolution.entry() {
            Some(entry) => (
                entry.status_code.unwrap_or(default_status),
                entry.data.clone().unwrap_or_else(empty_body),
            ),
            None => (self.nourl_status.unwrap_or(default_status), empty_body()),
        };

        let text = match &data {
            Value::String(text) => text.clone(),
            other => render_json(other)?,
        };
        let content = text.clone().into_bytes();

        Ok(FakeResponse {
            status_code,
            ok: status_code < 400,
            url: response_url.to_string(),
            method: request.method,
            params: request.params.cloned(),
            payload: request.body.cloned(),
            data,
            text,
            content,
            reason: None,
        })
    }
}

fn empty_body() -> Value {
    Value::String(String::new())
}

/// Writes `", "` between items and `": "` after keys, and escapes every
/// non-ASCII character as `\uXXXX` (UTF-16 units), the output
/// `json.dumps`-style fixtures are usually compared against.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut rest = fragment;
        while let Some(at) = rest.find(|c: char| !c.is_ascii()) {
            writer.write_all(rest[..at].as_bytes())?;
            let mut chars = rest[at..].chars();
            if let Some(c) = chars.next() {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            rest = chars.as_str();
        }
        writer.write_all(rest.as_bytes())
    }
}

/// Renders a body as response text: `{"message": "ok"}`.
pub fn render_json(value: &Value) -> Result<String, FakeApiError> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value
        .serialize(&mut serializer)
        .map_err(FakeApiError::Serialization)?;
    String::from_utf8(buf).map_err(|e| FakeApiError::Serialization(serde_json::Error::custom(e)))
}

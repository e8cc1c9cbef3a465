use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case form used as the ConfigKey prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Status code of an unmatched call.
    pub fn default_status(&self) -> u16 {
        match self {
            Method::Post => 201,
            _ => 200,
        }
    }

    /// Whether the verb carries a request body.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported method {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

/// The verb-call capability set of an HTTP client.
///
/// Code under test takes an `impl HttpVerbs` (or a generic parameter) instead of
/// a concrete client, so tests can hand it a `FakeApi` and production code a
/// real client.
pub trait HttpVerbs {
    type Output;
    type Error;

    fn get(&self, url: &str, params: Option<&Value>) -> Result<Self::Output, Self::Error>;

    fn post(
        &self,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<Self::Output, Self::Error>;

    fn put(
        &self,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<Self::Output, Self::Error>;

    fn patch(
        &self,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<Self::Output, Self::Error>;

    fn delete(&self, url: &str) -> Result<Self::Output, Self::Error>;

    /// Dispatches on `method`. `body` is dropped for verbs that carry none.
    fn call_verb(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<Self::Output, Self::Error> {
        match method {
            Method::Get => self.get(url, params),
            Method::Post => self.post(url, body, params),
            Method::Put => self.put(url, body, params),
            Method::Patch => self.patch(url, body, params),
            Method::Delete => self.delete(url),
        }
    }
}

impl<T: HttpVerbs + ?Sized> HttpVerbs for std::sync::Arc<T> {
    type Output = T::Output;
    type Error = T::Error;

    fn get(&self, url: &str, params: Option<&Value>) -> Result<Self::Output, Self::Error> {
        (**self).get(url, params)
    }

    fn post(
        &self,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<Self::Output, Self::Error> {
        (**self).post(url, body, params)
    }

    fn put(
        &self,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<Self::Output, Self::Error> {
        (**self).put(url, body, params)
    }

    fn patch(
        &self,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<Self::Output, Self::Error> {
        (**self).patch(url, body, params)
    }

    fn delete(&self, url: &str) -> Result<Self::Output, Self::Error> {
        (**self).delete(url)
    }
}

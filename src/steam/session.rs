use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://steamcommunity.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/109.0";

/// The authenticated session shared by every market request.
///
/// Built once at startup and only read afterwards. The credential is the value
/// of the `steamLoginSecure` cookie and is treated as opaque.
#[derive(Clone)]
pub struct SessionContext {
    base_url: String,
    headers: HeaderMap,
}

impl SessionContext {
    pub fn new(credential: Option<String>) -> Result<Self> {
        let credential = credential
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(Error::MissingCredential)?;

        let base_url = DEFAULT_BASE_URL.to_string();
        let headers = fixed_headers(&credential, &base_url)?;

        Ok(Self {
            base_url,
            headers,
        })
    }

    /// Points the session at another host, mostly useful for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();

        let referer = format!("{}/market/", self.base_url);
        self.insert("Referer", &referer)?;

        Ok(self)
    }

    /// Adds or overrides headers on top of the fixed set.
    pub fn with_headers<'h, I>(mut self, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'h str, &'h str)>,
    {
        for (name, value) in headers {
            self.insert(name, value)?;
        }

        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn insert(&mut self, name: &str, value: &str) -> Result<()> {
        let (name, value) = header(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("credential", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.len())
            .finish()
    }
}

fn fixed_headers(credential: &str, base_url: &str) -> Result<HeaderMap> {
    let referer = format!("{base_url}/market/");
    let cookie = format!("steamLoginSecure={credential}");

    let entries = [
        ("User-Agent", USER_AGENT),
        ("Accept", "*/*"),
        ("Accept-Language", "ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3"),
        ("Referer", referer.as_str()),
        ("Connection", "keep-alive"),
        ("Sec-Fetch-Dest", "empty"),
        ("Sec-Fetch-Mode", "cors"),
        ("Sec-Fetch-Site", "same-origin"),
        ("Pragma", "no-cache"),
        ("Cache-Control", "no-cache"),
    ];

    let mut headers = HeaderMap::with_capacity(entries.len() + 1);
    for (name, value) in entries {
        let (name, value) = header(name, value)?;
        headers.insert(name, value);
    }

    let (name, mut value) = header("Cookie", &cookie)?;
    value.set_sensitive(true);
    headers.insert(name, value);

    Ok(headers)
}

fn header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| Error::InvalidConfig(format!("invalid header name {name:?}")))?;
    let header_value = HeaderValue::from_str(value).map_err(|source| Error::InvalidHeader {
        name: name.to_string(),
        source,
    })?;

    Ok((header_name, header_value))
}

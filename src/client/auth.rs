use base64::Engine;
use eyre::{Result, eyre};
use hmac::{Hmac, Mac};
use reqwest::Method;
use reqwest::header::{self, HeaderMap, HeaderValue};
use sha2::Sha256;
use std::collections::BTreeMap;
use url::Url;

/// Standard headers covered by a SharedKey signature, in signing order
const SIGNED_HEADERS: [header::HeaderName; 11] = [
    header::CONTENT_ENCODING,
    header::CONTENT_LANGUAGE,
    header::CONTENT_LENGTH,
    header::HeaderName::from_static("content-md5"),
    header::CONTENT_TYPE,
    header::DATE,
    header::IF_MODIFIED_SINCE,
    header::IF_MATCH,
    header::IF_NONE_MATCH,
    header::IF_UNMODIFIED_SINCE,
    header::RANGE,
];

#[derive(Clone)]
pub enum Auth {
    /// Sign every request with the storage account key
    SharedKey { account: String, key: Vec<u8> },
    /// Append a shared access signature token to every request URL
    Sas(String),
}

impl Auth {
    /// Build SharedKey credentials from an account name and base64 account key
    pub fn shared_key(account: impl Into<String>, key: &str) -> Result<Self> {
        let key = base64::engine::general_purpose::STANDARD
            .decode(key.trim())
            .map_err(|_| eyre!("AccountKey is not valid base64"))?;
        Ok(Self::SharedKey {
            account: account.into(),
            key,
        })
    }

    pub fn sas(token: &str) -> Self {
        Self::Sas(token.trim().trim_start_matches('?').to_string())
    }

    /// Authorize a request in place
    ///
    /// `headers` must already hold `x-ms-date` and `x-ms-version`.
    /// `content_length` is the body length reqwest will send.
    pub fn apply(
        &self,
        method: &Method,
        url: &mut Url,
        headers: &mut HeaderMap,
        content_length: usize,
    ) -> Result<()> {
        match self {
            Self::SharedKey { account, key } => {
                let string_to_sign = string_to_sign(method, url, headers, account, content_length);
                log::trace!("SharedKey string to sign: {:?}", string_to_sign);
                let signature = sign(key, &string_to_sign)?;
                headers.insert(
                    header::AUTHORIZATION,
                    HeaderValue::from_str(&format!("SharedKey {}:{}", account, signature))?,
                );
            }
            Self::Sas(token) => {
                let query = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{}&{}", existing, token),
                    _ => token.clone(),
                };
                url.set_query(Some(&query));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SharedKey { account, .. } => write!(f, "SharedKey ({})", account),
            Self::Sas(_) => write!(f, "SAS"),
        }
    }
}

// Never print key material
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .finish_non_exhaustive(),
            Self::Sas(_) => f.debug_tuple("Sas").field(&"<redacted>").finish(),
        }
    }
}

/// Canonical string for the Blob service SharedKey scheme
pub(crate) fn string_to_sign(
    method: &Method,
    url: &Url,
    headers: &HeaderMap,
    account: &str,
    content_length: usize,
) -> String {
    let mut out = format!("{}\n", method.as_str());

    for name in SIGNED_HEADERS.iter() {
        let value = if *name == header::CONTENT_LENGTH {
            match content_length {
                0 => String::new(),
                n => n.to_string(),
            }
        } else {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        out.push_str(&value);
        out.push('\n');
    }

    let mut ms_headers: Vec<(&str, &str)> = headers
        .iter()
        .filter(|(name, _)| name.as_str().starts_with("x-ms-"))
        .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or_default().trim()))
        .collect();
    ms_headers.sort();
    for (name, value) in ms_headers {
        out.push_str(&format!("{}:{}\n", name, value));
    }

    out.push_str(&format!("/{}{}", account, url.path()));
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in url.query_pairs() {
        params
            .entry(name.to_lowercase())
            .or_default()
            .push(value.into_owned());
    }
    for (name, mut values) in params {
        values.sort();
        out.push_str(&format!("\n{}:{}", name, values.join(",")));
    }

    out
}

fn sign(key: &[u8], string_to_sign: &str) -> Result<String> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).map_err(|e| eyre!("Invalid account key: {}", e))?;
    mac.update(string_to_sign.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DEVELOPMENT_ACCOUNT_KEY;

    fn dated_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-ms-date",
            HeaderValue::from_static("Mon, 02 Jan 2023 03:04:05 GMT"),
        );
        headers.insert("x-ms-version", HeaderValue::from_static("2021-08-06"));
        headers
    }

    #[test]
    fn test_string_to_sign_for_create_container() {
        let url =
            Url::parse("http://127.0.0.1:10000/devstoreaccount1/wikipedia-raw?restype=container")
                .unwrap();
        let signed = string_to_sign(
            &Method::PUT,
            &url,
            &dated_headers(),
            "devstoreaccount1",
            0,
        );

        assert_eq!(
            signed,
            "PUT\n\n\n\n\n\n\n\n\n\n\n\n\
             x-ms-date:Mon, 02 Jan 2023 03:04:05 GMT\n\
             x-ms-version:2021-08-06\n\
             /devstoreaccount1/devstoreaccount1/wikipedia-raw\n\
             restype:container"
        );
    }

    #[test]
    fn test_string_to_sign_for_upload() {
        let url = Url::parse("https://acct.blob.core.windows.net/wiki/1-A.json").unwrap();
        let mut headers = dated_headers();
        headers.insert("x-ms-blob-type", HeaderValue::from_static("BlockBlob"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        let signed = string_to_sign(&Method::PUT, &url, &headers, "acct", 42);
        let lines: Vec<&str> = signed.lines().collect();

        assert_eq!(lines[0], "PUT");
        assert_eq!(lines[3], "42");
        assert_eq!(lines[5], "application/json; charset=utf-8");
        assert_eq!(lines[12], "x-ms-blob-type:BlockBlob");
        assert_eq!(lines[13], "x-ms-date:Mon, 02 Jan 2023 03:04:05 GMT");
        assert_eq!(lines[15], "/acct/wiki/1-A.json");
    }

    #[test]
    fn test_shared_key_signature() {
        let auth = Auth::shared_key("devstoreaccount1", DEVELOPMENT_ACCOUNT_KEY).unwrap();
        let mut url =
            Url::parse("http://127.0.0.1:10000/devstoreaccount1/wikipedia-raw?restype=container")
                .unwrap();
        let mut headers = dated_headers();

        auth.apply(&Method::PUT, &mut url, &mut headers, 0).unwrap();

        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "SharedKey devstoreaccount1:EiU+H7ya8noAc4Js8XSSERHn19JWNUFEA2eNUXqG0ps="
        );
        assert_eq!(url.query(), Some("restype=container"));
    }

    #[test]
    fn test_sas_appends_token() {
        let auth = Auth::sas("?sv=2022-11-02&sig=abc%2Bdef");
        let mut url = Url::parse("https://acct.blob.core.windows.net/wiki?restype=container").unwrap();
        let mut headers = dated_headers();

        auth.apply(&Method::HEAD, &mut url, &mut headers, 0).unwrap();

        assert_eq!(
            url.query(),
            Some("restype=container&sv=2022-11-02&sig=abc%2Bdef")
        );
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_account_key() {
        let result = Auth::shared_key("acct", "not base64!");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_hides_secrets() {
        let auth = Auth::shared_key("acct", DEVELOPMENT_ACCOUNT_KEY).unwrap();
        assert_eq!(auth.to_string(), "SharedKey (acct)");
        assert!(!format!("{:?}", auth).contains("Eby8"));
        assert_eq!(Auth::sas("sig=secret").to_string(), "SAS");
        assert!(!format!("{:?}", Auth::sas("sig=secret")).contains("secret"));
    }
}

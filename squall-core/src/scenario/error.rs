use std::path::PathBuf;

use super::param::ParamType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("form parameter `{name}` has type `{kind}`; only string parameters can be encoded")]
    UnsupportedParamType { name: String, kind: ParamType },

    #[error("body encoding `{0}` is not implemented")]
    UnimplementedEncoding(String),
}

/// Anything that prevents a scenario document from becoming a [`super::Scenario`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read scenario file `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed scenario XML: {0}")]
    Malformed(String),

    #[error("unexpected root element `{0}`, expecting `testScenario`")]
    UnexpectedRoot(String),

    #[error("missing required attribute `{attribute}` on `{element}` element")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("invalid header `{name}: {value}`: {reason}")]
    InvalidHeader {
        name: String,
        value: String,
        reason: &'static str,
    },

    #[error("invalid `baseUrl` option `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request #{request}: invalid url `{url}`: {source}")]
    InvalidUrl {
        request: usize,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request #{request}: url `{url}` is relative and no `baseUrl` option is set")]
    RelativeUrlWithoutBase { request: usize, url: String },

    #[error("request #{request}: no url declared and no `baseUrl` option is set")]
    MissingUrl { request: usize },

    #[error("request #{request}: only http and https urls are supported, got `{url}`")]
    UnsupportedScheme { request: usize, url: String },

    #[error("request #{request}: invalid method `{method}`")]
    InvalidMethod { request: usize, method: String },

    #[error("request #{request}: `repeat` must be a positive integer, got `{value}`")]
    InvalidRepeat { request: usize, value: String },

    #[error("request #{request}: at most one of `rawData` or `formData` may be declared")]
    ConflictingBody { request: usize },

    #[error("request #{request}: `rawData` cannot be both base64-decoded and trimmed")]
    ConflictingRawDataTransforms { request: usize },

    #[error("request #{request}: invalid base64 in `rawData`: {source}")]
    InvalidBase64 {
        request: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("request #{request}: unknown form parameter type `{kind}`")]
    UnknownParamType { request: usize, kind: String },

    #[error("request #{request}: form parameter `{name}` is not a valid {kind}: `{value}`")]
    InvalidParamValue {
        request: usize,
        name: String,
        kind: ParamType,
        value: String,
    },

    #[error("request #{request}: {source}")]
    Encoding {
        request: usize,
        #[source]
        source: EncodingError,
    },
}

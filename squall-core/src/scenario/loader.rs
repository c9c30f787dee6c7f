use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use url::Url;

use super::document::{self, Element};
use super::encode::{FORM_URLENCODED, OCTET_STREAM, encode_form};
use super::error::LoadError;
use super::header::{Header, Headers};
use super::param::{Param, ParamType, ParamValue};
use super::request::{Body, Request};
use super::{FailurePolicy, Scenario};

const ROOT: &str = "testScenario";

/// Read and load a scenario file.
pub fn load_file(path: &Path) -> Result<Scenario, LoadError> {
    let xml = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&xml)
}

/// Load a scenario from an XML document.
///
/// All `clientSetup` sections are read before any request is resolved, so options may appear
/// anywhere under the root element.
pub fn load_str(xml: &str) -> Result<Scenario, LoadError> {
    let root = document::parse(xml)?;
    if root.name != ROOT {
        return Err(LoadError::UnexpectedRoot(root.name));
    }

    let mut setup = ClientSetup::default();
    for node in &root.children {
        match node.name.as_str() {
            "clientSetup" => setup.read(node)?,
            "request" => {}
            other => tracing::warn!(element = other, "ignoring unknown scenario element"),
        }
    }

    let mut requests = Vec::new();
    for (i, node) in root.children_named("request").enumerate() {
        requests.push(read_request(node, i + 1, &setup)?);
    }

    tracing::debug!(requests = requests.len(), "scenario loaded");

    Ok(Scenario {
        requests,
        base_url: setup.base_url,
        persist_cookies: setup.persist_cookies,
        policy: setup.policy,
    })
}

#[derive(Debug, Default)]
struct ClientSetup {
    base_url: Option<Url>,
    persist_cookies: bool,
    policy: FailurePolicy,
    default_headers: Vec<Header>,
}

impl ClientSetup {
    fn read(&mut self, node: &Element) -> Result<(), LoadError> {
        for section in &node.children {
            match section.name.as_str() {
                "options" => self.read_options(section)?,
                "headers" => self.default_headers.extend(read_headers(section)?),
                other => tracing::warn!(element = other, "ignoring unknown clientSetup element"),
            }
        }
        Ok(())
    }

    fn read_options(&mut self, node: &Element) -> Result<(), LoadError> {
        for opt in &node.children {
            if opt.name != "option" {
                tracing::warn!(element = %opt.name, "ignoring unknown options element");
                continue;
            }

            let name = opt.require_attr("option", "name")?;
            let value = opt.require_attr("option", "value")?;

            match name {
                "persistCookies" => self.persist_cookies = parse_flag(value),
                "failOnHttpError" => self.policy.on_http_error = parse_flag(value),
                "failOnTcpError" => self.policy.on_tcp_error = parse_flag(value),
                "failOnHttpRedirect" => self.policy.on_http_redirect = parse_flag(value),
                "baseUrl" => {
                    let url = Url::parse(value).map_err(|source| LoadError::InvalidBaseUrl {
                        url: value.to_string(),
                        source,
                    })?;
                    self.base_url = Some(url);
                }
                other => tracing::warn!(option = other, "ignoring unknown option"),
            }
        }
        Ok(())
    }
}

/// `yes` and `true` (any case) are true; everything else is false.
fn parse_flag(value: &str) -> bool {
    let v = value.trim();
    v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true")
}

fn read_headers(node: &Element) -> Result<Vec<Header>, LoadError> {
    let mut out = Vec::new();
    for h in &node.children {
        if h.name != "header" {
            tracing::warn!(element = %h.name, "ignoring unknown headers element");
            continue;
        }
        let name = h.require_attr("header", "name")?;
        let value = h.attr("value").unwrap_or_default();
        check_header(name, value)?;
        let replace = h.attr("replace").is_some_and(parse_flag);
        out.push(Header::new(name, value, replace));
    }
    Ok(out)
}

/// Rejects names and values the transport could never put on the wire.
fn check_header(name: &str, value: &str) -> Result<(), LoadError> {
    let reason = if http::HeaderName::from_bytes(name.as_bytes()).is_err() {
        "not a valid header name"
    } else if http::HeaderValue::from_str(value).is_err() {
        "value has characters not allowed in a header"
    } else {
        return Ok(());
    };
    Err(LoadError::InvalidHeader {
        name: name.to_string(),
        value: value.to_string(),
        reason,
    })
}

fn read_request(node: &Element, index: usize, setup: &ClientSetup) -> Result<Request, LoadError> {
    let url = resolve_url(node.attr("url"), setup.base_url.as_ref(), index)?;

    let method = match node.attr("method") {
        Some(m) => http::Method::from_bytes(m.trim().as_bytes()).map_err(|_| {
            LoadError::InvalidMethod {
                request: index,
                method: m.to_string(),
            }
        })?,
        None => http::Method::GET,
    };

    let repeat = match node.attr("repeat") {
        Some(raw) => raw
            .trim()
            .parse::<NonZeroU32>()
            .map_err(|_| LoadError::InvalidRepeat {
                request: index,
                value: raw.to_string(),
            })?,
        None => NonZeroU32::MIN,
    };

    let mut headers = Headers::new();
    headers.apply_all(&setup.default_headers);

    let mut body: Option<Body> = None;
    for child in &node.children {
        match child.name.as_str() {
            "headers" => headers.apply_all(&read_headers(child)?),
            "rawData" | "formData" => {
                if body.is_some() {
                    return Err(LoadError::ConflictingBody { request: index });
                }
                body = Some(if child.name == "rawData" {
                    read_raw_data(child, index)?
                } else {
                    read_form_data(child, index)?
                });
            }
            other => tracing::warn!(
                request = index,
                element = other,
                "ignoring unknown request element"
            ),
        }
    }

    let mut request = Request::new(method, url)
        .with_headers(headers)
        .with_repeat(repeat);
    if let Some(body) = body {
        request = request.with_body(body);
    }
    Ok(request)
}

fn resolve_url(declared: Option<&str>, base: Option<&Url>, index: usize) -> Result<Url, LoadError> {
    let url = match (declared, base) {
        (None, Some(base)) => base.clone(),
        (None, None) => return Err(LoadError::MissingUrl { request: index }),
        (Some(raw), Some(base)) => base.join(raw).map_err(|source| LoadError::InvalidUrl {
            request: index,
            url: raw.to_string(),
            source,
        })?,
        (Some(raw), None) => Url::parse(raw).map_err(|source| match source {
            url::ParseError::RelativeUrlWithoutBase => LoadError::RelativeUrlWithoutBase {
                request: index,
                url: raw.to_string(),
            },
            source => LoadError::InvalidUrl {
                request: index,
                url: raw.to_string(),
                source,
            },
        })?,
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(LoadError::UnsupportedScheme {
            request: index,
            url: url.to_string(),
        });
    }
    Ok(url)
}

fn read_raw_data(node: &Element, index: usize) -> Result<Body, LoadError> {
    let base64 = node.attr("base64").is_some_and(parse_flag);
    let trim = node.attr("trim").is_some_and(parse_flag);
    let content_type = node.attr("contentType").unwrap_or(OCTET_STREAM);
    check_header("Content-Type", content_type)?;

    let bytes = match (base64, trim) {
        (true, true) => {
            return Err(LoadError::ConflictingRawDataTransforms { request: index });
        }
        (true, false) => {
            let compact: String = node
                .text
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|source| LoadError::InvalidBase64 {
                    request: index,
                    source,
                })?
        }
        (false, true) => node.text.trim().as_bytes().to_vec(),
        (false, false) => node.text.as_bytes().to_vec(),
    };

    Ok(Body::new(content_type, bytes))
}

fn read_form_data(node: &Element, index: usize) -> Result<Body, LoadError> {
    let enctype = node.attr("enctype").unwrap_or(FORM_URLENCODED);

    let mut params = Vec::new();
    for p in &node.children {
        if p.name != "formParam" {
            tracing::warn!(request = index, element = %p.name, "ignoring unknown formData element");
            continue;
        }
        let name = p.require_attr("formParam", "name")?;
        params.push(read_param(p, name, index)?);
    }

    let bytes = encode_form(&params, enctype).map_err(|source| LoadError::Encoding {
        request: index,
        source,
    })?;
    Ok(Body::new(enctype, bytes))
}

fn read_param(node: &Element, name: &str, index: usize) -> Result<Param, LoadError> {
    let kind = match node.attr("type") {
        None => ParamType::String,
        Some(raw) => raw
            .parse::<ParamType>()
            .ok()
            .filter(|k| !matches!(k, ParamType::Array | ParamType::Object))
            .ok_or_else(|| LoadError::UnknownParamType {
                request: index,
                kind: raw.to_string(),
            })?,
    };

    let raw = node.text.as_str();
    let invalid = || LoadError::InvalidParamValue {
        request: index,
        name: name.to_string(),
        kind,
        value: raw.to_string(),
    };

    let value = match kind {
        ParamType::String => ParamValue::String(raw.to_string()),
        ParamType::Int => ParamValue::Int(raw.trim().parse().map_err(|_| invalid())?),
        ParamType::Float => ParamValue::Float(raw.trim().parse().map_err(|_| invalid())?),
        ParamType::Bool => ParamValue::Bool(raw.trim().parse().map_err(|_| invalid())?),
        ParamType::Null => ParamValue::Null,
        ParamType::File => ParamValue::File(PathBuf::from(raw.trim())),
        ParamType::Array | ParamType::Object => return Err(invalid()),
    };

    Ok(Param::new(name, value))
}

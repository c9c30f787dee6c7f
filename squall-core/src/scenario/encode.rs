use bytes::Bytes;

use super::error::EncodingError;
use super::param::{Param, ParamValue};

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Encode form parameters as a request body for `encoding`.
///
/// Only `application/x-www-form-urlencoded` with string parameters is supported.
pub fn encode_form(params: &[Param], encoding: &str) -> Result<Bytes, EncodingError> {
    if !encoding.eq_ignore_ascii_case(FORM_URLENCODED) {
        return Err(EncodingError::UnimplementedEncoding(encoding.to_string()));
    }

    let mut out = String::new();
    for (i, param) in params.iter().enumerate() {
        let ParamValue::String(value) = &param.value else {
            return Err(EncodingError::UnsupportedParamType {
                name: param.name.clone(),
                kind: param.kind(),
            });
        };

        if i > 0 {
            out.push('&');
        }
        out.push_str(&urlencoding::encode(&param.name));
        out.push('=');
        out.push_str(&urlencoding::encode(value));
    }

    Ok(Bytes::from(out))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::scenario::ParamType;

    #[test]
    fn urlencodes_pairs_in_order() {
        let params = [Param::string("a", "b c"), Param::string("d", "e")];
        let body = encode_form(&params, FORM_URLENCODED).unwrap();
        assert_eq!(body.as_ref(), b"a=b%20c&d=e");
    }

    #[test]
    fn reserved_characters_are_escaped_on_both_sides() {
        let params = [Param::string("q&x", "1+1=2/ü")];
        let body = encode_form(&params, FORM_URLENCODED).unwrap();
        assert_eq!(body.as_ref(), b"q%26x=1%2B1%3D2%2F%C3%BC");
    }

    #[test]
    fn empty_param_list_is_empty_body() {
        assert!(encode_form(&[], FORM_URLENCODED).unwrap().is_empty());
    }

    #[test]
    fn non_string_param_aborts() {
        let params = [
            Param::string("ok", "1"),
            Param::new("count", ParamValue::Int(3)),
        ];
        let err = encode_form(&params, FORM_URLENCODED).unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnsupportedParamType {
                name: "count".to_string(),
                kind: ParamType::Int,
            }
        );
    }

    #[test]
    fn other_encodings_are_unimplemented() {
        let err = encode_form(&[Param::string("a", "b")], "multipart/form-data").unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnimplementedEncoding("multipart/form-data".to_string())
        );
    }
}

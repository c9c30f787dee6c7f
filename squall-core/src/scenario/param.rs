use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ParamType {
    Int,
    Float,
    Bool,
    Null,
    String,
    Array,
    Object,
    File,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    String(String),
    Array(Vec<ParamValue>),
    Object(Vec<(String, ParamValue)>),
    File(PathBuf),
}

impl ParamValue {
    #[must_use]
    pub fn kind(&self) -> ParamType {
        match self {
            Self::Int(_) => ParamType::Int,
            Self::Float(_) => ParamType::Float,
            Self::Bool(_) => ParamType::Bool,
            Self::Null => ParamType::Null,
            Self::String(_) => ParamType::String,
            Self::Array(_) => ParamType::Array,
            Self::Object(_) => ParamType::Object,
            Self::File(_) => ParamType::File,
        }
    }
}

/// One form parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
}

impl Param {
    pub fn new(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ParamValue::String(value.into()))
    }

    #[must_use]
    pub fn kind(&self) -> ParamType {
        self.value.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_type_parses_from_declared_names() {
        assert_eq!("int".parse::<ParamType>(), Ok(ParamType::Int));
        assert_eq!("string".parse::<ParamType>(), Ok(ParamType::String));
        assert_eq!("file".parse::<ParamType>(), Ok(ParamType::File));
        assert!("decimal".parse::<ParamType>().is_err());
        assert_eq!(ParamType::Bool.to_string(), "bool");
    }

    #[test]
    fn kind_follows_value() {
        assert_eq!(Param::string("a", "b").kind(), ParamType::String);
        assert_eq!(Param::new("n", ParamValue::Null).kind(), ParamType::Null);
        assert_eq!(
            Param::new("xs", ParamValue::Array(vec![ParamValue::Int(1)])).kind(),
            ParamType::Array
        );
    }
}

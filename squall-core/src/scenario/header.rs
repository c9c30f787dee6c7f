/// One declared HTTP header.
///
/// `replace` decides what happens when a header of the same name was already applied: `true`
/// drops every earlier occurrence, `false` adds another occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
    pub replace: bool,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>, replace: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            replace,
        }
    }

    pub fn append(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, false)
    }

    pub fn replacing(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, true)
    }
}

/// Ordered, resolved header list of one request. Names compare ASCII case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, header: &Header) {
        if header.replace {
            self.remove(&header.name);
        }
        self.entries.push((header.name.clone(), header.value.clone()));
    }

    pub fn apply_all<'a>(&mut self, headers: impl IntoIterator<Item = &'a Header>) {
        for h in headers {
            self.apply(h);
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries.clone()
    }
}

impl<'a> FromIterator<&'a Header> for Headers {
    fn from_iter<I: IntoIterator<Item = &'a Header>>(iter: I) -> Self {
        let mut headers = Self::new();
        headers.apply_all(iter);
        headers
    }
}

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::LoadError;

/// A parsed XML element: name, attributes in document order, child elements and the
/// concatenated text content (text and CDATA, unescaped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn require_attr(
        &self,
        element: &'static str,
        attribute: &'static str,
    ) -> Result<&str, LoadError> {
        self.attr(attribute)
            .ok_or(LoadError::MissingAttribute { element, attribute })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, LoadError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

/// Parse an XML document into its root element.
pub(crate) fn parse(xml: &str) -> Result<Element, LoadError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(LoadError::Malformed(
                        "content after the root element".to_string(),
                    ));
                }
                stack.push(open_element(&start)?);
            }
            Event::Empty(start) => {
                let element = open_element(&start)?;
                close(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                // quick-xml checks that end tags match their start tags.
                let element = stack
                    .pop()
                    .ok_or_else(|| LoadError::Malformed("unbalanced end tag".to_string()))?;
                close(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(LoadError::Malformed(
                            "text outside of the root element".to_string(),
                        ));
                    }
                }
            }
            Event::CData(data) => {
                let data = data.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(LoadError::Malformed(format!(
            "unexpected end of document inside `{}`",
            open.name
        )));
    }

    root.ok_or_else(|| LoadError::Malformed("document has no root element".to_string()))
}

fn close(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), LoadError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(LoadError::Malformed(
                "more than one root element".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn builds_tree_with_attributes_text_and_cdata() {
        let root = parse(
            r#"<?xml version="1.0"?>
            <!-- scenario -->
            <testScenario>
              <request url="/a?x=1&amp;y=2" method="POST">
                <rawData>one &lt;two&gt;<![CDATA[ <three> ]]></rawData>
              </request>
              <request/>
            </testScenario>"#,
        )
        .unwrap();

        assert_eq!(root.name, "testScenario");
        let requests: Vec<_> = root.children_named("request").collect();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].attr("url"), Some("/a?x=1&y=2"));
        assert_eq!(requests[0].attr("method"), Some("POST"));
        assert_eq!(requests[1].attr("url"), None);

        let raw = requests[0].children_named("rawData").next().unwrap();
        assert_eq!(raw.text, "one <two> <three> ");
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        let err = parse("<testScenario><request></testScenario>").unwrap_err();
        assert!(matches!(err, LoadError::Xml(_)), "got {err:?}");
    }

    #[test]
    fn truncated_document_is_an_error() {
        let err = parse("<testScenario><request>").unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)), "got {err:?}");
    }

    #[test]
    fn empty_document_is_an_error() {
        let err = parse("   ").unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)), "got {err:?}");
    }

    #[test]
    fn require_attr_reports_element_and_attribute() {
        let root = parse(r#"<option value="1"/>"#).unwrap();
        let err = root.require_attr("option", "name").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingAttribute {
                element: "option",
                attribute: "name"
            }
        ));
    }
}

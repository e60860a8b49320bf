//! The nodes of the parsed tree.
use crate::vector::{DynamicArray, VectorError};

/// A `key="value"` pair from an opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub key: String,

    /// The unquoted attribute value.
    pub value: String,
}
impl Attribute {
    /// Create a new attribute.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One tag of the document, with its attributes, text and child elements:
/// `<name attr="value">text<child/></name>`
///
/// Attributes, text and children are `None` when the tag had none.
/// Duplicate attributes are kept (searches use the last attribute with the same key).
///
/// An element owns its whole subtree; dropping it releases everything below it.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attributes: Option<DynamicArray<Attribute>>,
    text: Option<String>,
    children: Option<DynamicArray<Element>>,
    offset: usize,
}
impl Element {
    /// Create an element with no attributes, text or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: None,
            text: None,
            children: None,
            offset: 0,
        }
    }

    pub(crate) fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub(crate) fn set_attribute_list(&mut self, attributes: Option<DynamicArray<Attribute>>) {
        self.attributes = attributes;
    }

    pub(crate) fn set_child_list(&mut self, children: Option<DynamicArray<Element>>) {
        self.children = children;
    }

    /// Sets the text content of the element. Empty text is stored as `None`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = (!text.is_empty()).then_some(text);
    }

    /// Adds an attribute after the existing ones.
    ///
    /// # Errors
    /// Fails if the attribute list cannot grow.
    pub fn push_attribute(&mut self, attribute: Attribute) -> Result<(), VectorError> {
        match &mut self.attributes {
            Some(attributes) => attributes.push_back(attribute),
            None => {
                let mut attributes = DynamicArray::new(0, None)?;
                attributes.push_back(attribute)?;
                self.attributes = Some(attributes);
                Ok(())
            }
        }
    }

    /// Adds a child after the existing ones.
    ///
    /// # Errors
    /// Fails if the child list cannot grow.
    pub fn push_child(&mut self, child: Element) -> Result<(), VectorError> {
        match &mut self.children {
            Some(children) => children.push_back(child),
            None => {
                let mut children = DynamicArray::new(0, None)?;
                children.push_back(child)?;
                self.children = Some(children);
                Ok(())
            }
        }
    }

    /// Get the tag name of the element.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the byte offset of the element's `<` in the flattened source.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the attributes of the element, in source order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        self.attributes.as_deref().unwrap_or_default()
    }

    /// Get the attribute list itself, if the tag had any attributes.
    #[must_use]
    pub fn attribute_list(&self) -> Option<&DynamicArray<Attribute>> {
        self.attributes.as_ref()
    }

    /// Get an attribute by key.
    ///
    /// Searches the attributes in reverse order, so the last attribute with the same key is returned.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes().iter().rev().find(|a| a.key == key)
    }

    /// Get the text between the opening tag and the first child or closing tag.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the children of the element, in source order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Get the child list itself, if the element had nested tags.
    #[must_use]
    pub fn child_list(&self) -> Option<&DynamicArray<Element>> {
        self.children.as_ref()
    }

    /// Returns true if the element has neither text nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.children().is_empty()
    }

    /// Releases the element and its whole subtree.
    pub fn release(self) {
        drop(self);
    }
}

/// Elements compare by structure; the source offset is ignored.
///
/// Both trees are walked side by side, so deep trees do not exhaust the stack.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        fn shallow(
            (depth, element): (usize, &Element),
        ) -> (usize, &str, &[Attribute], Option<&str>) {
            (depth, element.name(), element.attributes(), element.text())
        }

        self.walk().map(shallow).eq(other.walk().map(shallow))
    }
}

/// Detaches child lists level by level instead of dropping the subtree recursively.
impl Drop for Element {
    fn drop(&mut self) {
        let Some(children) = self.children.take() else {
            return;
        };

        let mut pending = vec![children];
        while let Some(mut children) = pending.pop() {
            for child in children.as_mut_slice() {
                if let Some(grandchildren) = child.children.take() {
                    pending.push(grandchildren);
                }
            }
        }
    }
}

//! Depth-first traversal of the element tree, and the indented tree dump.
//!
//! The dump writes one line per fact, prefixed by [`INDENT`] once per level:
//! ```text
//! Element: a
//! |   Element: b
//! |      Key: x; Value: 1
//! |      Text: hi
//! ```
use crate::element::Element;
use std::io::Write;

/// Prefix repeated once per nesting level in the tree dump.
pub const INDENT: &str = "|   ";

/// Extra prefix for attribute and text lines in the tree dump.
const DETAIL: &str = "   ";

/// Depth-first, pre-order iterator over an element and its descendants.
///
/// Yields each element with its depth below the starting element.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Element)>,
}
impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Element);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, element) = self.stack.pop()?;
        for child in element.children().iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, element))
    }
}

impl Element {
    /// Walks this element and all of its descendants, depth-first in source order.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Finds every element in this subtree matching the predicate, in source order.
    pub fn find_all<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Element>
    where
        P: Fn(&Element) -> bool + 'a,
    {
        self.walk()
            .map(|(_, element)| element)
            .filter(move |element| predicate(element))
    }
}

/// Returns a predicate matching elements with the given tag name.
pub fn tag_name_filter(name: &str) -> impl Fn(&Element) -> bool + '_ {
    move |element: &Element| element.name() == name
}

/// Writes the tree dump of `root` to `writer`.
///
/// If a filter is given, only elements it accepts are written, but the
/// children of rejected elements are still visited. A missing root writes nothing.
///
/// # Errors
/// Fails if the writer fails.
pub fn write_tree<W: Write + ?Sized>(
    writer: &mut W,
    root: Option<&Element>,
    filter: Option<&dyn Fn(&Element) -> bool>,
) -> std::io::Result<()> {
    let Some(root) = root else {
        return Ok(());
    };

    for (depth, element) in root.walk() {
        if filter.is_some_and(|filter| !filter(element)) {
            continue;
        }

        let indent = INDENT.repeat(depth);
        writeln!(writer, "{indent}Element: {}", element.name())?;

        for attribute in element.attributes() {
            writeln!(
                writer,
                "{indent}{DETAIL}Key: {}; Value: {}",
                attribute.key, attribute.value
            )?;
        }

        if let Some(text) = element.text() {
            writeln!(writer, "{indent}{DETAIL}Text: {text}")?;
        }
    }

    Ok(())
}

/// Returns the tree dump of `root` as a string. See [`write_tree`].
#[must_use]
pub fn dump_tree(root: Option<&Element>, filter: Option<&dyn Fn(&Element) -> bool>) -> String {
    let mut buffer = vec![];
    // Writing to a Vec cannot fail
    let _ = write_tree(&mut buffer, root, filter);
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Attribute;

    fn sample() -> Element {
        let mut b = Element::new("b");
        b.push_attribute(Attribute::new("x", "1")).unwrap();
        b.set_text("hi");

        let mut p = Element::new("p");
        p.push_child(Element::new("p")).unwrap();

        let mut root = Element::new("a");
        root.push_child(b).unwrap();
        root.push_child(p).unwrap();
        root
    }

    #[test]
    fn test_walk_order() {
        let root = sample();
        let visited: Vec<_> = root.walk().map(|(d, e)| (d, e.name())).collect();
        assert_eq!(visited, vec![(0, "a"), (1, "b"), (1, "p"), (2, "p")]);
    }

    #[test]
    fn test_find_all() {
        let root = sample();
        assert_eq!(root.find_all(tag_name_filter("p")).count(), 2);
        assert_eq!(root.find_all(|e| e.text().is_some()).count(), 1);
    }

    #[test]
    fn test_dump() {
        let dump = dump_tree(Some(&sample()), None);
        assert_eq!(
            dump,
            "Element: a\n\
             |   Element: b\n\
             |      Key: x; Value: 1\n\
             |      Text: hi\n\
             |   Element: p\n\
             |   |   Element: p\n"
        );
    }

    #[test]
    fn test_dump_filtered() {
        let filter = tag_name_filter("p");
        let dump = dump_tree(Some(&sample()), Some(&filter));
        assert_eq!(dump, "|   Element: p\n|   |   Element: p\n");
    }

    #[test]
    fn test_dump_no_root() {
        assert!(dump_tree(None, None).is_empty());
    }
}

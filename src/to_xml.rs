//! XML formatting module
//!
//! Use [`Document::to_xml`](crate::Document::to_xml) unless you need to write the XML to a file or other writer.
//!
//! Every tag starts its own line, except that an element's text is written
//! right after its opening tag and runs up to the next tag on the same line.
//! The parser trims and joins lines, so text keeps its leading and trailing
//! whitespace and parsing the output gives back an equal tree.
use crate::element::Element;

const TAB: &str = "\t";

/// Writes an element tree as formatted XML using the given writer.
///
/// `tab_char` is used to indent nested lines. If `None`, a tab is used.
///
/// # Errors
/// This function will return an error if the writer fails to write the XML string.
pub fn write_xml<W: std::io::Write + ?Sized>(
    writer: &mut W,
    root: &Element,
    tab_char: Option<&str>,
) -> std::io::Result<()> {
    let tab_char = tab_char.unwrap_or(TAB);

    let mut stack = vec![(NodeTask::Open(root), 0)];
    let mut after_text = false;
    while let Some((task, depth)) = stack.pop() {
        let tab = if after_text {
            String::new()
        } else {
            tab_char.repeat(depth)
        };
        after_text = false;

        match task {
            NodeTask::Close(name) => {
                writeln!(writer, "{tab}</{name}>")?;
            }

            NodeTask::Open(element) => {
                write!(writer, "{tab}<{}", element.name())?;

                for attribute in element.attributes() {
                    let quote = if attribute.value.contains('"') {
                        '\''
                    } else {
                        '"'
                    };
                    write!(
                        writer,
                        " {key}={quote}{value}{quote}",
                        key = attribute.key,
                        value = attribute.value
                    )?;
                }

                if element.is_empty() {
                    writeln!(writer, " />")?;
                    continue;
                }

                match element.text() {
                    Some(text) => {
                        write!(writer, ">{text}")?;
                        after_text = true;
                    }
                    None => writeln!(writer, ">")?,
                }

                stack.push((NodeTask::Close(element.name()), depth));
                for child in element.children().iter().rev() {
                    stack.push((NodeTask::Open(child), depth + 1));
                }
            }
        }
    }

    Ok(())
}

enum NodeTask<'a> {
    Open(&'a Element),
    Close(&'a str),
}

use xmlast::{Document, tag_name_filter};

const SRC: &str = include_str!("good.xml");
const DUMP: &str = include_str!("good.xml.dump");
const FILTERED: &str = include_str!("good.xml.filtered");

fn compare(got: &str, expected: &str) {
    if got == expected {
        return;
    }

    let mut got_lines = got.lines();
    for (i, line) in expected.lines().enumerate() {
        match got_lines.next() {
            None => {
                panic!("Diff at line {}: Not enough rows in dump!", i + 1);
            }

            Some(l) => {
                if line == l {
                    continue;
                } else {
                    eprintln!("Diff at line {}", i + 1);

                    eprintln!("Expected: {line}");
                    eprintln!("Got: {l}");
                    break;
                }
            }
        }
    }

    panic!("Dump does not match expected output");
}

#[test]
fn test_good() {
    let document = match Document::parse_str(SRC) {
        Ok(doc) => doc,
        Err(e) => panic!("{e}"),
    };

    compare(&document.dump(None), DUMP);
}

#[test]
fn test_good_filtered() {
    let document = Document::parse_str(SRC).unwrap();
    let filter = tag_name_filter("p");

    compare(&document.dump(Some(&filter)), FILTERED);
}

#[test]
fn test_good_round_trip() {
    let document = Document::parse_str(SRC).unwrap();

    let xml = document.to_xml(Some("  ")).unwrap();
    let document2 = Document::parse_str(&xml).expect("Could not re-parse document");

    assert_eq!(document, document2);
    compare(&document2.dump(None), DUMP);
}

#[test]
fn test_good_from_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/good.xml");
    let document = Document::open(path, Default::default()).unwrap();

    let root = document.root().unwrap();
    assert_eq!(root.name(), "html");
    assert_eq!(root.find_all(tag_name_filter("p")).count(), 3);
    assert_eq!(root.walk().count(), 12);
    document.release();
}

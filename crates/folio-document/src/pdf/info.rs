// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document information dictionary (/Info) read and write.

use folio_core::DocumentInfo;
use folio_core::error::FolioError;
use lopdf::{Dictionary, Document, Object, StringFormat};

/// Write the set fields of `info` into the document's `/Info` dictionary,
/// creating it if needed. Fields left as `None` are not touched.
pub fn apply_info(doc: &mut Document, info: &DocumentInfo) -> Result<(), FolioError> {
    let info_id = match doc.trailer.get(b"Info").and_then(Object::as_reference) {
        Ok(id) => id,
        Err(_) => {
            let id = doc.add_object(Dictionary::new());
            doc.trailer.set("Info", Object::Reference(id));
            id
        }
    };

    let dict = doc
        .get_object_mut(info_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| FolioError::Pdf(format!("/Info is not a dictionary: {}", err)))?;

    let fields = [
        ("Title", info.title.as_deref()),
        ("Author", info.author.as_deref()),
        ("Producer", info.producer.as_deref()),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            dict.set(key, text_string(value));
        }
    }
    Ok(())
}

/// Title, author and producer as recorded in `/Info`.
pub fn read_info(doc: &Document) -> DocumentInfo {
    let Some(dict) = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .ok()
    else {
        return DocumentInfo::default();
    };

    let field = |key: &[u8]| {
        dict.get(key)
            .and_then(Object::as_str)
            .ok()
            .map(decode_text_string)
    };
    DocumentInfo {
        title: field(b"Title"),
        author: field(b"Author"),
        producer: field(b"Producer"),
    }
}

/// Encode a PDF text string: a literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        // PDFDocEncoding agrees with Latin-1 for printable characters.
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::pages::fixtures::numbered_pdf;

    #[test]
    fn apply_info_creates_dictionary_and_round_trips() {
        let mut doc = numbered_pdf(1);
        let info = DocumentInfo {
            title: Some("Ledger 1894".into()),
            author: Some("Zoë Archivist".into()),
            producer: Some("folio".into()),
        };

        apply_info(&mut doc, &info).unwrap();

        assert!(doc.trailer.has(b"Info"));
        assert_eq!(read_info(&doc), info);
    }

    #[test]
    fn unset_fields_are_left_alone() {
        let mut doc = numbered_pdf(1);
        apply_info(
            &mut doc,
            &DocumentInfo {
                title: Some("Original".into()),
                ..DocumentInfo::default()
            },
        )
        .unwrap();
        apply_info(
            &mut doc,
            &DocumentInfo {
                author: Some("Second pass".into()),
                ..DocumentInfo::default()
            },
        )
        .unwrap();

        let info = read_info(&doc);
        assert_eq!(info.title.as_deref(), Some("Original"));
        assert_eq!(info.author.as_deref(), Some("Second pass"));
    }

    #[test]
    fn missing_info_reads_as_empty() {
        assert_eq!(read_info(&numbered_pdf(1)), DocumentInfo::default());
    }
}

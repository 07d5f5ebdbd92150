// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page tree helpers shared by the reader (extraction) and writer (append).

use folio_core::error::FolioError;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed trees whose `/Parent` links form a cycle.
const MAX_TREE_DEPTH: usize = 64;

/// Object id of the root `/Pages` node.
pub(crate) fn page_tree_root(doc: &Document) -> Result<ObjectId, FolioError> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|err| FolioError::Pdf(format!("no page tree root: {}", err)))
}

/// Copy of a page dictionary with every inheritable attribute materialised and
/// `/Parent` removed, ready to hang under a different page tree node.
///
/// Content streams and resources stay shared by reference, so the page is
/// not re-encoded.
pub(crate) fn detached_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, FolioError> {
    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|err| FolioError::Pdf(format!("cannot read page {:?}: {}", page_id, err)))?
        .clone();

    for key in INHERITABLE_KEYS {
        if !page.has(key) {
            if let Some(value) = inherited_attribute(doc, &page, key) {
                page.set(key.to_vec(), value);
            }
        }
    }

    page.remove(b"Parent");
    Ok(page)
}

/// Walk up `/Parent` links looking for `key`.
fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

/// Replace the root node's children with `kids`, pointing each kid back at
/// the root.
pub(crate) fn set_page_tree_kids(
    doc: &mut Document,
    root: ObjectId,
    kids: &[ObjectId],
) -> Result<(), FolioError> {
    for &kid in kids {
        doc.get_object_mut(kid)
            .and_then(Object::as_dict_mut)
            .map_err(|err| FolioError::Pdf(format!("page {:?} is not a dictionary: {}", kid, err)))?
            .set("Parent", Object::Reference(root));
    }

    let tree = doc
        .get_object_mut(root)
        .and_then(Object::as_dict_mut)
        .map_err(|err| FolioError::Pdf(format!("page tree root is not a dictionary: {}", err)))?;
    tree.set(
        "Kids",
        kids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
    );
    tree.set("Count", Object::Integer(kids.len() as i64));
    Ok(())
}

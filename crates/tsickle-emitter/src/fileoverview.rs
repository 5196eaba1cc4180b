//! The `@fileoverview` comment of annotated output.
//!
//! Closure reports several checks that tsc already performed; every annotated
//! file suppresses them and records where it came from:
//!
//! ```text
//! /**
//!  * @fileoverview added by tsickle
//!  * Generated from: src/app.ts
//!  * @suppress {checkTypes,const,extraRequire,...} checked by tsc
//!  */
//! ```

use crate::host::TsickleHost;
use crate::ir::{IRNode, JsFile};
use crate::jsdoc::{self, Tag};
use std::collections::BTreeSet;
use tracing::trace;

pub const SUPPRESSED_CHECKS: &[&str] = &[
    "checkTypes",
    "const",
    "extraRequire",
    "missingOverride",
    "missingRequire",
    "missingReturn",
    "unusedPrivateMembers",
    "uselessCode",
];

const OVERVIEW_TAGS: &[&str] = &["fileoverview", "file", "overview"];

/// Tags of `comment` (delimiters included) when it is a file overview JSDoc.
fn overview_tags(comment: &str) -> Option<Vec<Tag>> {
    let body = comment.strip_prefix("/*")?.strip_suffix("*/")?;
    if !body.starts_with('*') || body.starts_with("**") {
        return None;
    }
    let tags = jsdoc::normalize(jsdoc::parse(body));
    tags.iter()
        .any(|t| OVERVIEW_TAGS.contains(&t.tag_name.as_str()))
        .then_some(tags)
}

/// Add or extend the file overview comment of `file`.
pub fn add_fileoverview(file: &mut JsFile, host: &TsickleHost) {
    let leading = file
        .statements
        .iter()
        .position(|node| !matches!(node, IRNode::Comment(_)))
        .unwrap_or(file.statements.len());
    let existing = file.statements[..leading].iter().enumerate().find_map(|(idx, node)| match node {
        IRNode::Comment(text) => overview_tags(text).map(|tags| (idx, tags)),
        _ => None,
    });

    let (at, tags) = match existing {
        Some((idx, tags)) => {
            file.statements.remove(idx);
            (idx, tags)
        }
        None => (0, vec![Tag::new("fileoverview").with_text("added by tsickle")]),
    };

    let mut suppressions: BTreeSet<String> = SUPPRESSED_CHECKS.iter().map(|s| s.to_string()).collect();
    let mut merged = Vec::with_capacity(tags.len() + 2);
    for tag in tags {
        if tag.tag_name == "suppress" {
            if let Some(types) = &tag.type_expr {
                suppressions.extend(types.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()));
            }
            continue;
        }
        let is_overview = OVERVIEW_TAGS.contains(&tag.tag_name.as_str());
        merged.push(tag);
        if is_overview {
            merged.push(Tag::text(format!(
                "Generated from: {}",
                host.root_dirs_relative(&file.source_file_name)
            )));
        }
    }
    let suppress = suppressions.into_iter().collect::<Vec<_>>().join(",");
    merged.push(Tag::typed("suppress", suppress).with_text("checked by tsc"));

    trace!(file = %file.source_file_name, "file overview added");
    file.statements.insert(at, IRNode::comment(jsdoc::render(&merged)));
}

#[cfg(test)]
#[path = "../tests/fileoverview.rs"]
mod tests;

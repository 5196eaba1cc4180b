//! JSDoc tag model: parsing of existing comments, merging with generated
//! annotations, and rendering.
//!
//! Comments are kept as text between the `/*` and `*/` delimiters, the same
//! way the AST stores them, so a JSDoc body always starts with `*`.

use crate::diagnostics::FileDiagnostics;
use tsickle_common::Span;
use tsickle_common::diagnostics::diagnostic_codes;
use tsickle_program::ast::Comment;

/// Tags that duplicate what TypeScript already expresses. User-written
/// copies are removed.
const REDUNDANT_TAGS: &[&str] = &[
    "augments",
    "class",
    "constructs",
    "constructor",
    "enum",
    "extends",
    "field",
    "function",
    "implements",
    "interface",
    "lends",
    "namespace",
    "private",
    "protected",
    "public",
    "record",
    "static",
    "template",
    "this",
    "type",
    "typedef",
];

/// Tags rendered on one line when they are the only tag.
const SINGLE_LINE_TAGS: &[&str] = &["type", "typedef", "nocollapse", "enum", "const"];

/// Tags followed by a parameter name.
const PARAMETER_TAGS: &[&str] = &["param", "arg", "argument"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tag {
    /// Empty for free text before the first tag.
    pub tag_name: String,
    /// Closure type expression, without braces.
    pub type_expr: Option<String>,
    pub parameter_name: Option<String>,
    pub text: Option<String>,
}

impl Tag {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn typed(tag_name: impl Into<String>, type_expr: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            type_expr: Some(type_expr.into()),
            ..Self::default()
        }
    }

    pub fn param(name: impl Into<String>, type_expr: impl Into<String>) -> Self {
        Self {
            tag_name: "param".to_string(),
            type_expr: Some(type_expr.into()),
            parameter_name: Some(name.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn is_free_text(&self) -> bool {
        self.tag_name.is_empty()
    }

    fn is_parameter_tag(&self) -> bool {
        PARAMETER_TAGS.contains(&self.tag_name.as_str())
    }

    fn is_return_tag(&self) -> bool {
        self.tag_name == "return" || self.tag_name == "returns"
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if !self.tag_name.is_empty() {
            out.push('@');
            out.push_str(&self.tag_name);
        }
        if let Some(ty) = &self.type_expr {
            out.push_str(" {");
            out.push_str(ty);
            out.push('}');
        }
        if let Some(name) = &self.parameter_name {
            out.push(' ');
            out.push_str(name);
        }
        if let Some(text) = &self.text {
            if !out.is_empty() && !text.is_empty() {
                out.push(' ');
            }
            out.push_str(text);
        }
        out
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse the body of a JSDoc comment (text between the delimiters).
///
/// Parsing is lossless for line structure: the (empty) rest of the opening
/// line and the line before the closing delimiter are kept as empty lines of
/// the surrounding text. Use [`normalize`] to trim them.
pub fn parse(body: &str) -> Vec<Tag> {
    let body = body.strip_prefix('*').unwrap_or(body);
    let mut tags: Vec<Tag> = Vec::new();
    let mut free_text: Option<Vec<&str>> = None;
    let mut current: Option<(Tag, Vec<&str>)> = None;

    for raw_line in body.split('\n') {
        let line = raw_line.trim_start();
        let line = line.strip_prefix('*').unwrap_or(line);
        let line = line.strip_prefix(' ').unwrap_or(line).trim_end();

        if let Some(rest) = line.strip_prefix('@')
            && rest.starts_with(|c: char| c.is_ascii_alphabetic())
        {
            if let Some((tag, lines)) = current.take() {
                tags.push(finish_tag(tag, &lines));
            }
            let (tag, first_text) = parse_tag_line(rest);
            current = Some((tag, first_text.into_iter().collect()));
            continue;
        }

        match &mut current {
            Some((_, lines)) => lines.push(line),
            None => free_text.get_or_insert_with(Vec::new).push(line),
        }
    }

    if let Some((tag, lines)) = current.take() {
        tags.push(finish_tag(tag, &lines));
    }
    if let Some(lines) = free_text {
        tags.insert(0, Tag::text(lines.join("\n")));
    }
    tags
}

fn finish_tag(mut tag: Tag, lines: &[&str]) -> Tag {
    if !lines.is_empty() {
        tag.text = Some(lines.join("\n"));
    }
    tag
}

/// `name {type} param text` after the `@`.
fn parse_tag_line(rest: &str) -> (Tag, Option<&str>) {
    let name_end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let mut tag = Tag::new(&rest[..name_end]);
    let mut remainder = rest[name_end..].trim_start();

    if remainder.starts_with('{')
        && let Some(close) = matching_brace(remainder)
    {
        tag.type_expr = Some(remainder[1..close].trim().to_string());
        remainder = remainder[close + 1..].trim_start();
    }

    if tag.is_parameter_tag() && !remainder.is_empty() {
        let end = remainder.find(char::is_whitespace).unwrap_or(remainder.len());
        tag.parameter_name = Some(remainder[..end].to_string());
        remainder = remainder[end..].trim_start();
    }

    let text = (!remainder.is_empty()).then_some(remainder);
    (tag, text)
}

fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Trim surrounding blank lines from free text and tag texts, dropping free
/// text that becomes empty.
pub fn normalize(tags: Vec<Tag>) -> Vec<Tag> {
    tags.into_iter()
        .filter_map(|mut tag| {
            if let Some(text) = &tag.text {
                let trimmed = text.trim();
                tag.text = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            if tag.is_free_text() && tag.text.is_none() {
                return None;
            }
            Some(tag)
        })
        .collect()
}

// =============================================================================
// Filtering and merging
// =============================================================================

/// Drop user tags that TypeScript already expresses, and the type part of
/// `@param`/`@return` tags, warning for each.
pub fn filter_user_tags(tags: Vec<Tag>, diagnostics: &mut FileDiagnostics, span: Span) -> Vec<Tag> {
    let mut kept = Vec::with_capacity(tags.len());
    for mut tag in tags {
        if REDUNDANT_TAGS.contains(&tag.tag_name.as_str()) {
            diagnostics.warn(diagnostic_codes::REDUNDANT_JSDOC_TAG, span, &[&tag.tag_name]);
            continue;
        }
        if (tag.is_parameter_tag() || tag.is_return_tag()) && tag.type_expr.is_some() {
            diagnostics.warn(diagnostic_codes::REDUNDANT_JSDOC_TYPE, span, &[&tag.tag_name]);
            tag.type_expr = None;
        }
        kept.push(tag);
    }
    kept
}

/// Merge generated tags into the user's tags. User `@param`/`@return` tags
/// take the generated type and keep their description; everything else the
/// user wrote stays in place and the remaining generated tags follow.
pub fn merge(existing: Vec<Tag>, generated: Vec<Tag>) -> Vec<Tag> {
    let mut generated: Vec<Option<Tag>> = generated.into_iter().map(Some).collect();
    let mut merged = Vec::with_capacity(existing.len() + generated.len());

    for mut tag in existing {
        let slot = generated.iter_mut().find(|slot| {
            slot.as_ref().is_some_and(|g| {
                (tag.is_parameter_tag() && g.is_parameter_tag() && g.parameter_name == tag.parameter_name)
                    || (tag.is_return_tag() && g.is_return_tag())
                    || (!tag.is_free_text()
                        && tag.type_expr.is_none()
                        && tag.text.is_none()
                        && g.tag_name == tag.tag_name
                        && g.parameter_name.is_none())
            })
        });
        if let Some(generated_tag) = slot.and_then(Option::take) {
            tag.tag_name = generated_tag.tag_name;
            tag.type_expr = generated_tag.type_expr;
        }
        merged.push(tag);
    }
    merged.extend(generated.into_iter().flatten());
    merged
}

// =============================================================================
// Rendering
// =============================================================================

/// Body of the comment (text between the delimiters).
pub fn render_body(tags: &[Tag]) -> String {
    if let [tag] = tags
        && SINGLE_LINE_TAGS.contains(&tag.tag_name.as_str())
        && !tag.text.as_deref().is_some_and(|t| t.contains('\n'))
    {
        return format!("* {} ", tag.render());
    }
    let mut out = String::from("*\n");
    for tag in tags {
        for line in tag.render().split('\n') {
            out.push_str(" *");
            if !line.is_empty() {
                out.push(' ');
                out.push_str(line);
            }
            out.push('\n');
        }
    }
    out.push(' ');
    out
}

/// The whole comment, delimiters included.
pub fn render(tags: &[Tag]) -> String {
    format!("/*{}*/", render_body(tags))
}

pub fn to_comment(tags: &[Tag]) -> Comment {
    Comment::block(render_body(tags))
}

/// Remove the last JSDoc comment from `comments` and return its tags.
pub fn take_jsdoc(comments: &mut Vec<Comment>) -> Option<Vec<Tag>> {
    let idx = comments.iter().rposition(Comment::is_jsdoc)?;
    let comment = comments.remove(idx);
    Some(parse(&comment.text))
}

/// Replace the statement's JSDoc (if any) with `generated` merged into the
/// filtered user tags. Nothing is attached when both are empty.
pub fn attach(
    comments: &mut Vec<Comment>,
    generated: Vec<Tag>,
    diagnostics: &mut FileDiagnostics,
    span: Span,
) {
    let existing = take_jsdoc(comments)
        .map(|tags| filter_user_tags(normalize(tags), diagnostics, span))
        .unwrap_or_default();
    let merged = merge(existing, generated);
    if !merged.is_empty() {
        comments.push(to_comment(&merged));
    }
}

#[cfg(test)]
#[path = "../tests/jsdoc.rs"]
mod tests;

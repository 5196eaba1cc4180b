//! Helper methods for the IR printer.
//!
//! Contains function body emission, object literal and parameter lists, and
//! multiline comment formatting.

use super::*;
use std::fmt::Write as _;

impl IRPrinter {
    /// Emit a `{ ... }` body. Bodies that were single-line in the source stay
    /// single-line when they hold at most one statement.
    pub(super) fn emit_function_body(&mut self, body: &[IRNode], multi_line: bool) {
        if body.is_empty() {
            if multi_line {
                self.write("{");
                self.write_line();
                self.write_indent();
                self.write("}");
            } else {
                self.write("{ }");
            }
            return;
        }

        if !multi_line && body.len() == 1 && !matches!(body[0], IRNode::Comment(_)) {
            self.write("{ ");
            self.emit_node(&body[0]);
            self.write(" }");
            return;
        }

        self.write("{");
        self.write_line();
        self.increase_indent();
        self.emit_statements(body);
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    /// `f(item)` for each item with `", "` between them.
    fn separated<T>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            f(self, item);
        }
    }

    pub(super) fn emit_comma_separated(&mut self, nodes: &[IRNode]) {
        self.separated(nodes, Self::emit_node);
    }

    pub(super) fn emit_object_literal_multiline(&mut self, properties: &[IRProperty]) {
        if properties.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for (i, prop) in properties.iter().enumerate() {
            self.write_indent();
            self.emit_property(prop);
            if i < properties.len() - 1 {
                self.write(",");
            }
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    pub(super) fn emit_parameters(&mut self, params: &[IRParam]) {
        self.separated(params, |p, param| {
            if param.rest {
                p.write("...");
            }
            p.write(&param.name);
            if let Some(default) = &param.default_value {
                p.write(" = ");
                p.emit_node(default);
            }
        });
    }

    pub(super) fn emit_property(&mut self, prop: &IRProperty) {
        match prop.kind {
            IRPropertyKind::Spread => {
                self.write("...");
                self.emit_node(&prop.value);
                return;
            }
            IRPropertyKind::Shorthand => {
                if let IRPropertyKey::Identifier(name) = &prop.key {
                    self.write(name);
                    return;
                }
            }
            IRPropertyKind::Init => {}
        }

        match &prop.key {
            IRPropertyKey::Identifier(name) => self.write(name),
            IRPropertyKey::StringLiteral(s) => {
                self.write("\"");
                self.write_escaped(s);
                self.write("\"");
            }
            IRPropertyKey::NumericLiteral(n) => self.write(n),
            IRPropertyKey::Computed(expr) => {
                self.write("[");
                self.emit_node(expr);
                self.write("]");
            }
        }
        self.write(": ");
        self.emit_node(&prop.value);
    }

    /// `.name`, `["name"]`, `[0]` or `[expr]` after a receiver.
    pub(super) fn emit_method_name(&mut self, name: &IRMethodName) {
        match name {
            IRMethodName::Identifier(n) => {
                self.write(".");
                self.write(n);
            }
            IRMethodName::StringLiteral(s) => {
                self.write("[\"");
                self.write_escaped(s);
                self.write("\"]");
            }
            IRMethodName::NumericLiteral(n) => {
                self.write("[");
                self.write(n);
                self.write("]");
            }
            IRMethodName::Computed(expr) => {
                self.write("[");
                self.emit_node(expr);
                self.write("]");
            }
        }
    }

    /// Member name inside a class body: `name`, `"name"`, `0` or `[expr]`.
    pub(super) fn emit_member_name(&mut self, name: &IRMethodName) {
        match name {
            IRMethodName::Identifier(n) | IRMethodName::NumericLiteral(n) => self.write(n),
            IRMethodName::StringLiteral(s) => {
                self.write("\"");
                self.write_escaped(s);
                self.write("\"");
            }
            IRMethodName::Computed(expr) => {
                self.write("[");
                self.emit_node(expr);
                self.write("]");
            }
        }
    }

    pub(super) fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// `s` escaped for a double-quoted JavaScript string.
    pub(super) fn write_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '"' | '\\' => {
                    self.output.push('\\');
                    self.output.push(c);
                }
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\0' => self.output.push_str("\\0"),
                c if c.is_ascii_control() || c == '\u{2028}' || c == '\u{2029}' => {
                    let _ = write!(self.output, "\\u{:04X}", c as u32);
                }
                _ => self.output.push(c),
            }
        }
    }

    pub(super) fn write_line(&mut self) {
        self.output.push('\n');
    }

    pub(super) fn write_indent(&mut self) {
        self.output.push_str(&self.indent_str.repeat(self.indent_level as usize));
    }

    pub(super) const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(super) const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// A comment spanning several lines, re-indented to the current level.
    /// Continuation lines starting with `*` get one leading space.
    pub(super) fn emit_multiline_comment(&mut self, comment: &str) {
        let mut first = true;
        for line in comment.split('\n') {
            if !first {
                self.write_line();
                self.write_indent();
            }
            let trimmed = line.trim_start();
            if !first && (trimmed.starts_with('*') || trimmed.starts_with('/')) {
                self.write(" ");
            }
            self.write(trimmed.trim_end());
            first = false;
        }
    }
}

impl Default for IRPrinter {
    fn default() -> Self {
        Self::new()
    }
}

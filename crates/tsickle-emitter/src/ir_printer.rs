//! IR Printer - Emits IR nodes to JavaScript strings
//!
//! Statements are printed one per line with four-space indentation. Statement
//! nodes print their own `;`. Single-line blocks (`{ }`, `{ stmt; }`) are kept
//! single-line when the source had them that way (`multi_line: false`).
//!
//! # Example
//!
//! ```
//! use tsickle_emitter::ir::{IRNode, VarKeyword};
//! use tsickle_emitter::ir_printer::IRPrinter;
//!
//! let stmt = IRNode::var_decl(VarKeyword::Const, "x", Some(IRNode::number("1")));
//! assert_eq!(IRPrinter::emit_to_string(&stmt), "const x = 1;");
//! ```

use crate::ir::*;
use std::fmt::Write as _;
use tsickle_common::limits::PRINTER_INITIAL_CAPACITY;

#[path = "ir_printer_helpers.rs"]
mod helpers;

pub struct IRPrinter {
    output: String,
    indent_level: u32,
    indent_str: &'static str,
}

impl IRPrinter {
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(PRINTER_INITIAL_CAPACITY),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Print a single node (no trailing newline).
    pub fn emit_to_string(node: &IRNode) -> String {
        let mut printer = Self::new();
        printer.emit_node(node);
        printer.output
    }

    /// Print a whole file, one statement per line, ending with a newline.
    pub fn print_file(file: &JsFile) -> String {
        let mut printer = Self::new();
        printer.emit_statements(&file.statements);
        printer.output
    }

    /// Emit statements at the current indentation, one per line.
    pub fn emit_statements(&mut self, statements: &[IRNode]) {
        for stmt in statements {
            self.write_indent();
            self.emit_node(stmt);
            self.write_line();
        }
    }

    pub fn emit_node(&mut self, node: &IRNode) {
        match node {
            // =================================================================
            // Literals
            // =================================================================
            IRNode::NumericLiteral(n) => self.write(n),
            IRNode::StringLiteral {
                value,
                single_quote,
            } => self.write_string_literal(value, *single_quote),
            IRNode::BooleanLiteral(b) => self.write(if *b { "true" } else { "false" }),
            IRNode::NullLiteral => self.write("null"),
            IRNode::Undefined => self.write("void 0"),
            IRNode::TemplateLiteral(raw) => {
                self.write("`");
                self.write(raw);
                self.write("`");
            }
            IRNode::RegExpLiteral(raw) => self.write(raw),

            // =================================================================
            // Identifiers
            // =================================================================
            IRNode::Identifier(name) => self.write(name),
            IRNode::This => self.write("this"),
            IRNode::Super => self.write("super"),

            // =================================================================
            // Expressions
            // =================================================================
            IRNode::BinaryExpr {
                left,
                operator,
                right,
            } => {
                self.emit_node(left);
                if operator == "," {
                    self.write(", ");
                } else {
                    self.write(" ");
                    self.write(operator);
                    self.write(" ");
                }
                self.emit_node(right);
            }
            IRNode::PrefixUnaryExpr { operator, operand } => {
                self.write(operator);
                if operator.chars().all(|c| c.is_ascii_alphabetic()) {
                    self.write(" ");
                }
                self.emit_node(operand);
            }
            IRNode::PostfixUnaryExpr { operand, operator } => {
                self.emit_node(operand);
                self.write(operator);
            }
            IRNode::CallExpr { callee, arguments } => {
                self.emit_callee(callee);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            IRNode::NewExpr { callee, arguments } => {
                self.write("new ");
                self.emit_callee(callee);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            IRNode::PropertyAccess { object, property } => {
                self.emit_callee(object);
                self.write(".");
                self.write(property);
            }
            IRNode::ElementAccess { object, index } => {
                self.emit_callee(object);
                self.write("[");
                self.emit_node(index);
                self.write("]");
            }
            IRNode::ConditionalExpr {
                condition,
                when_true,
                when_false,
            } => {
                self.emit_node(condition);
                self.write(" ? ");
                self.emit_node(when_true);
                self.write(" : ");
                self.emit_node(when_false);
            }
            IRNode::Parenthesized(inner) => {
                self.write("(");
                self.emit_node(inner);
                self.write(")");
            }
            IRNode::ArrayLiteral(elements) => {
                self.write("[");
                self.emit_comma_separated(elements);
                self.write("]");
            }
            IRNode::SpreadElement(inner) => {
                self.write("...");
                self.emit_node(inner);
            }
            IRNode::ObjectLiteral {
                properties,
                multi_line,
            } => {
                if *multi_line {
                    self.emit_object_literal_multiline(properties);
                } else if properties.is_empty() {
                    self.write("{}");
                } else {
                    self.write("{ ");
                    for (i, prop) in properties.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.emit_property(prop);
                    }
                    self.write(" }");
                }
            }
            IRNode::FunctionExpr {
                name,
                parameters,
                body,
                multi_line,
                is_async,
                is_generator,
            } => {
                if *is_async {
                    self.write("async ");
                }
                self.write("function");
                if *is_generator {
                    self.write("*");
                }
                if let Some(name) = name {
                    self.write(" ");
                    self.write(name);
                } else {
                    self.write(" ");
                }
                self.write("(");
                self.emit_parameters(parameters);
                self.write(") ");
                self.emit_function_body(body, *multi_line);
            }
            IRNode::ArrowFunction {
                parameters,
                body,
                is_async,
            } => {
                if *is_async {
                    self.write("async ");
                }
                self.write("(");
                self.emit_parameters(parameters);
                self.write(") => ");
                match body.as_ref() {
                    IRNode::Block {
                        statements,
                        multi_line,
                    } => self.emit_function_body(statements, *multi_line),
                    IRNode::ObjectLiteral { .. } => {
                        self.write("(");
                        self.emit_node(body);
                        self.write(")");
                    }
                    _ => self.emit_node(body),
                }
            }
            IRNode::JsDocCast {
                closure_type,
                expression,
            } => {
                self.write("/** @type {");
                self.write(closure_type);
                self.write("} */ (");
                self.emit_node(expression);
                self.write(")");
            }
            IRNode::CommentedExpr {
                expression,
                comment,
            } => {
                self.emit_node(expression);
                self.write(" /* ");
                self.write(comment);
                self.write(" */");
            }

            // =================================================================
            // Statements
            // =================================================================
            IRNode::VarDecl {
                keyword,
                name,
                initializer,
            } => {
                self.write(keyword.as_str());
                self.write(" ");
                self.write(name);
                if let Some(init) = initializer {
                    self.write(" = ");
                    self.emit_node(init);
                }
                self.write(";");
            }
            IRNode::ExpressionStatement(expr) => {
                let needs_parens = matches!(
                    expr.as_ref(),
                    IRNode::FunctionExpr { .. } | IRNode::ObjectLiteral { .. }
                );
                if needs_parens {
                    self.write("(");
                    self.emit_node(expr);
                    self.write(")");
                } else {
                    self.emit_node(expr);
                }
                self.write(";");
            }
            IRNode::ReturnStatement(expr) => {
                self.write("return");
                if let Some(expr) = expr {
                    self.write(" ");
                    self.emit_node(expr);
                }
                self.write(";");
            }
            IRNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if (");
                self.emit_node(condition);
                self.write(") ");
                self.emit_node(then_branch);
                if let Some(else_branch) = else_branch {
                    self.write(" else ");
                    self.emit_node(else_branch);
                }
            }
            IRNode::Block {
                statements,
                multi_line,
            } => self.emit_function_body(statements, *multi_line),
            IRNode::EmptyStatement => self.write(";"),
            IRNode::ThrowStatement(expr) => {
                self.write("throw ");
                self.emit_node(expr);
                self.write(";");
            }

            // =================================================================
            // Declarations
            // =================================================================
            IRNode::FunctionDecl {
                name,
                parameters,
                body,
                multi_line,
                is_async,
                is_generator,
            } => {
                if *is_async {
                    self.write("async ");
                }
                self.write("function");
                if *is_generator {
                    self.write("*");
                }
                self.write(" ");
                self.write(name);
                self.write("(");
                self.emit_parameters(parameters);
                self.write(") ");
                self.emit_function_body(body, *multi_line);
            }
            IRNode::ClassDecl {
                name,
                extends,
                members,
            } => self.emit_class(name.as_deref(), extends.as_deref(), members),

            // =================================================================
            // ES5 Class Lowering
            // =================================================================
            IRNode::ES5ClassIIFE {
                name,
                base_class,
                body,
            } => {
                self.write("var ");
                self.write(name);
                self.write(" = /** @class */ (function (");
                if base_class.is_some() {
                    self.write("_super");
                }
                self.write(") {");
                self.write_line();
                self.increase_indent();
                self.emit_statements(body);
                self.write_indent();
                self.write("return ");
                self.write(name);
                self.write(";");
                self.write_line();
                self.decrease_indent();
                self.write_indent();
                self.write("}(");
                if let Some(base) = base_class {
                    self.emit_node(base);
                }
                self.write("));");
            }
            IRNode::ExtendsHelper { helper, class_name } => {
                self.write(helper);
                self.write("(");
                self.write(class_name);
                self.write(", _super);");
            }
            IRNode::PrototypeMethod {
                class_name,
                method_name,
                function,
            } => {
                self.write(class_name);
                self.write(".prototype");
                self.emit_method_name(method_name);
                self.write(" = ");
                self.emit_node(function);
                self.write(";");
            }
            IRNode::StaticMethod {
                class_name,
                method_name,
                function,
            } => {
                self.write(class_name);
                self.emit_method_name(method_name);
                self.write(" = ");
                self.emit_node(function);
                self.write(";");
            }

            // =================================================================
            // Enum / Namespace
            // =================================================================
            IRNode::EnumIIFE {
                name,
                members,
                declare,
                export_target,
            } => {
                self.emit_iife_declaration(name, *declare);
                self.write("(function (");
                self.write(name);
                self.write(") {");
                self.write_line();
                self.increase_indent();
                for member in members {
                    self.write_indent();
                    self.emit_enum_member(name, member);
                    self.write_line();
                }
                self.decrease_indent();
                self.write_indent();
                self.write("})(");
                self.emit_iife_argument(name, export_target.as_deref());
                self.write(");");
            }
            IRNode::NamespaceIIFE {
                name,
                body,
                declare,
                export_target,
            } => {
                self.emit_iife_declaration(name, *declare);
                self.write("(function (");
                self.write(name);
                self.write(") {");
                self.write_line();
                self.increase_indent();
                self.emit_statements(body);
                self.decrease_indent();
                self.write_indent();
                self.write("})(");
                self.emit_iife_argument(name, export_target.as_deref());
                self.write(");");
            }

            // =================================================================
            // ES Modules
            // =================================================================
            IRNode::ImportDecl {
                default,
                namespace,
                named,
                module_spec,
            } => {
                self.write("import ");
                let mut wrote_binding = false;
                if let Some(default) = default {
                    self.write(default);
                    wrote_binding = true;
                }
                if let Some(namespace) = namespace {
                    if wrote_binding {
                        self.write(", ");
                    }
                    self.write("* as ");
                    self.write(namespace);
                    wrote_binding = true;
                } else if !named.is_empty() {
                    if wrote_binding {
                        self.write(", ");
                    }
                    self.write("{ ");
                    for (i, spec) in named.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.write(&spec.imported);
                        if spec.imported != spec.local {
                            self.write(" as ");
                            self.write(&spec.local);
                        }
                    }
                    self.write(" }");
                    wrote_binding = true;
                }
                if wrote_binding {
                    self.write(" from ");
                }
                self.emit_module_spec(module_spec);
                self.write(";");
            }
            IRNode::ExportDecl {
                specifiers,
                module_spec,
            } => {
                self.write("export {");
                if !specifiers.is_empty() {
                    self.write(" ");
                    for (i, spec) in specifiers.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.write(&spec.local);
                        if spec.local != spec.exported {
                            self.write(" as ");
                            self.write(&spec.exported);
                        }
                    }
                    self.write(" ");
                }
                self.write("}");
                if let Some(spec) = module_spec {
                    self.write(" from ");
                    self.emit_module_spec(spec);
                }
                self.write(";");
            }
            IRNode::ExportStar { alias, module_spec } => {
                self.write("export *");
                if let Some(alias) = alias {
                    self.write(" as ");
                    self.write(alias);
                }
                self.write(" from ");
                self.emit_module_spec(module_spec);
                self.write(";");
            }
            IRNode::ExportDefault(expr) => {
                self.write("export default ");
                self.emit_node(expr);
                self.write(";");
            }
            IRNode::Exported {
                is_default,
                declaration,
            } => {
                self.write("export ");
                if *is_default {
                    self.write("default ");
                }
                self.emit_node(declaration);
            }

            // =================================================================
            // CommonJS
            // =================================================================
            IRNode::UseStrict => self.write("\"use strict\";"),
            IRNode::EsModuleMarker => {
                self.write("Object.defineProperty(exports, \"__esModule\", { value: true });")
            }
            IRNode::ExportInit { names } => {
                for name in names {
                    self.write("exports.");
                    self.write(name);
                    self.write(" = ");
                }
                self.write("void 0;");
            }
            IRNode::RequireStatement {
                keyword,
                var_name,
                module_spec,
            } => {
                if let Some(var_name) = var_name {
                    self.write(keyword.as_str());
                    self.write(" ");
                    self.write(var_name);
                    self.write(" = ");
                }
                self.write("require(");
                self.emit_module_spec(module_spec);
                self.write(");");
            }

            // =================================================================
            // Special
            // =================================================================
            IRNode::Comment(text) => self.emit_multiline_comment(text),
        }
    }

    fn emit_callee(&mut self, callee: &IRNode) {
        let needs_parens = matches!(
            callee,
            IRNode::FunctionExpr { .. }
                | IRNode::ArrowFunction { .. }
                | IRNode::BinaryExpr { .. }
                | IRNode::ConditionalExpr { .. }
                | IRNode::PrefixUnaryExpr { .. }
                | IRNode::NewExpr { .. }
        );
        if needs_parens {
            self.write("(");
            self.emit_node(callee);
            self.write(")");
        } else {
            self.emit_node(callee);
        }
    }

    fn emit_enum_member(&mut self, enum_name: &str, member: &EnumMember) {
        match &member.value {
            EnumMemberValue::String(value) => {
                self.write(enum_name);
                self.write("[\"");
                self.write_escaped(&member.name);
                self.write("\"] = ");
                self.write_string_literal(value, false);
                self.write(";");
            }
            EnumMemberValue::Numeric(_) | EnumMemberValue::Computed(_) => {
                self.write(enum_name);
                self.write("[");
                self.write(enum_name);
                self.write("[\"");
                self.write_escaped(&member.name);
                self.write("\"] = ");
                match &member.value {
                    EnumMemberValue::Numeric(n) => self.write(n),
                    EnumMemberValue::Computed(expr) => self.emit_node(expr),
                    EnumMemberValue::String(_) => {}
                }
                self.write("] = \"");
                self.write_escaped(&member.name);
                self.write("\";");
            }
        }
    }

    fn emit_iife_declaration(&mut self, name: &str, declare: Option<VarKeyword>) {
        if let Some(keyword) = declare {
            self.write(keyword.as_str());
            self.write(" ");
            self.write(name);
            self.write(";");
            self.write_line();
            self.write_indent();
        }
    }

    /// `E || (E = {})` or `E || (exports.E = E = {})`
    fn emit_iife_argument(&mut self, name: &str, export_target: Option<&str>) {
        self.write(name);
        self.write(" || (");
        if let Some(target) = export_target {
            self.write(target);
            self.write(" = ");
        }
        self.write(name);
        self.write(" = {})");
    }

    fn emit_module_spec(&mut self, spec: &IRModuleSpec) {
        self.write_string_literal(&spec.value, spec.single_quote);
    }

    fn emit_class(&mut self, name: Option<&str>, extends: Option<&IRNode>, members: &[IRClassMember]) {
        self.write("class");
        if let Some(name) = name {
            self.write(" ");
            self.write(name);
        }
        if let Some(base) = extends {
            self.write(" extends ");
            self.emit_node(base);
        }
        if members.is_empty() {
            self.write(" {");
            self.write_line();
            self.write_indent();
            self.write("}");
            return;
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();
        for member in members {
            for comment in &member.comments {
                self.write_indent();
                self.emit_multiline_comment(comment);
                self.write_line();
            }
            self.write_indent();
            self.emit_class_member(&member.kind);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_class_member(&mut self, member: &IRClassMemberKind) {
        match member {
            IRClassMemberKind::Constructor {
                parameters,
                body,
                multi_line,
            } => {
                self.write("constructor(");
                self.emit_parameters(parameters);
                self.write(") ");
                self.emit_function_body(body, *multi_line);
            }
            IRClassMemberKind::Method {
                name,
                is_static,
                is_async,
                is_generator,
                parameters,
                body,
                multi_line,
            } => {
                if *is_static {
                    self.write("static ");
                }
                if *is_async {
                    self.write("async ");
                }
                if *is_generator {
                    self.write("*");
                }
                self.emit_member_name(name);
                self.write("(");
                self.emit_parameters(parameters);
                self.write(") ");
                self.emit_function_body(body, *multi_line);
            }
            IRClassMemberKind::Getter {
                name,
                is_static,
                body,
                multi_line,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.write("get ");
                self.emit_member_name(name);
                self.write("() ");
                self.emit_function_body(body, *multi_line);
            }
            IRClassMemberKind::Setter {
                name,
                is_static,
                parameter,
                body,
                multi_line,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.write("set ");
                self.emit_member_name(name);
                self.write("(");
                self.emit_parameters(std::slice::from_ref(parameter));
                self.write(") ");
                self.emit_function_body(body, *multi_line);
            }
        }
    }

    fn write_string_literal(&mut self, value: &str, single_quote: bool) {
        let quote = if single_quote { '\'' } else { '"' };
        self.output.push(quote);
        for c in value.chars() {
            match c {
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\0' => self.output.push_str("\\0"),
                c if c == quote => {
                    self.output.push('\\');
                    self.output.push(c);
                }
                c if (c as u32) < 0x20 || c == '\x7F' => {
                    let _ = write!(self.output, "\\u{:04X}", c as u32);
                }
                c => self.output.push(c),
            }
        }
        self.output.push(quote);
    }
}

#[cfg(test)]
#[path = "../tests/ir_printer.rs"]
mod tests;

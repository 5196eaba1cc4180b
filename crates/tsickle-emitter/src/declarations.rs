//! `.d.ts` output.
//!
//! Declarations are printed from the file as it was before the internal
//! passes, with TypeScript type syntax: written annotations are kept as
//! written, missing ones are filled in from the checker. `export *` follows
//! the rewriter's expansion so the declaration file exports exactly the names
//! the JavaScript does.

use crate::type_display::TypeDisplay;
use crate::type_translator::is_identifier;
use indexmap::IndexMap;
use tracing::debug;
use tsickle_program::ast::{
    ClassDeclaration, ClassMemberKind, EnumDeclaration, ExportAssignment, ExportClause, ExportDeclaration,
    Expression, ExpressionKind, FunctionDeclaration, HeritageClause, Identifier, ImportDeclaration,
    ImportEqualsDeclaration, InterfaceDeclaration, InterfaceMemberKind, ModifierFlags, ModuleDeclaration,
    ModuleName, ModuleReference, NamedImportBindings, Parameter, PropertyName, StringLiteral, TypeNode,
    VariableStatement, escape_string,
};
use tsickle_program::{NodeId, SourceFile, Statement, StatementKind, TypeChecker, TypeData, VarKind};

const INDENT: &str = "    ";

struct DeclarationPrinter<'a> {
    checker: &'a dyn TypeChecker,
    display: TypeDisplay<'a>,
    /// `export *` specifier -> the names it was expanded to.
    expansions: &'a IndexMap<String, Vec<String>>,
    out: String,
    indent: usize,
    wrote_export: bool,
}

/// Declaration file text for `file`.
pub fn emit_declarations(
    file: &SourceFile,
    checker: &dyn TypeChecker,
    expansions: &IndexMap<String, Vec<String>>,
) -> String {
    let mut printer = DeclarationPrinter {
        checker,
        display: TypeDisplay::new(checker),
        expansions,
        out: String::new(),
        indent: 0,
        wrote_export: false,
    };
    printer.statements(&file.statements, true);
    if !printer.wrote_export && crate::lowering::is_module(file) {
        printer.line("export {};");
    }
    debug!(file = %file.file_name, bytes = printer.out.len(), "declarations printed");
    printer.out
}

fn quote(lit: &StringLiteral) -> String {
    let q = if lit.single_quote { '\'' } else { '"' };
    format!("{q}{}{q}", escape_string(&lit.value, q))
}

fn property_name(name: &PropertyName) -> Option<String> {
    Some(match name {
        PropertyName::Identifier(ident) => ident.name.clone(),
        PropertyName::String(lit) => quote(lit),
        PropertyName::Numeric(text) => text.clone(),
        PropertyName::Private(_) => return None,
        PropertyName::Computed(expr) => format!("[{}]", expr.entity_name()?),
    })
}

fn type_parameters(params: &[Identifier]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        format!("<{}>", names.join(", "))
    }
}

fn heritage(clause: &HeritageClause) -> String {
    let base = clause.expression.entity_name().unwrap_or_else(|| "any".to_string());
    if clause.type_arguments.is_empty() {
        base
    } else {
        let args: Vec<&str> = clause.type_arguments.iter().map(|t| t.text.as_str()).collect();
        format!("{base}<{}>", args.join(", "))
    }
}

fn literal_text(expr: &Expression) -> Option<String> {
    match &expr.kind {
        ExpressionKind::Numeric(text) => Some(text.clone()),
        ExpressionKind::String(lit) => Some(quote(lit)),
        ExpressionKind::Boolean(value) => Some(value.to_string()),
        ExpressionKind::Unary { operator, operand, prefix: true } if operator == "-" => {
            match &operand.kind {
                ExpressionKind::Numeric(text) => Some(format!("-{text}")),
                _ => None,
            }
        }
        _ => None,
    }
}

impl DeclarationPrinter<'_> {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// `export declare ` / `declare ` / `export ` / `` for a declaration.
    fn prefix(&mut self, modifiers: ModifierFlags, top_level: bool) -> String {
        let mut prefix = String::new();
        if modifiers.is_exported() {
            self.wrote_export = self.wrote_export || top_level;
            prefix.push_str("export ");
            if modifiers.contains(ModifierFlags::DEFAULT) {
                prefix.push_str("default ");
            }
        }
        if top_level && !modifiers.contains(ModifierFlags::DEFAULT) {
            prefix.push_str("declare ");
        }
        prefix
    }

    /// Written annotation, or the checker's type of `node`, or `any`.
    fn type_text(&mut self, annotation: Option<&TypeNode>, node: NodeId) -> String {
        if let Some(annotation) = annotation {
            return annotation.text.clone();
        }
        match self.checker.type_of_node(node) {
            Some(ty) => self.display.display(ty),
            None => "any".to_string(),
        }
    }

    /// Return type of a function-like declaration from its signature type.
    fn return_text(&mut self, annotation: Option<&TypeNode>, node: NodeId) -> String {
        if let Some(annotation) = annotation {
            return annotation.text.clone();
        }
        let checker = self.checker;
        let ret = checker.type_of_node(node).and_then(|ty| match checker.type_data(ty) {
            Some(TypeData::Object(object)) => object
                .call_signatures
                .first()
                .or(object.construct_signatures.first())
                .map(|sig| sig.return_type),
            _ => None,
        });
        match ret {
            Some(ty) => self.display.display(ty),
            None => "void".to_string(),
        }
    }

    fn parameters(&mut self, params: &[Parameter]) -> String {
        let mut parts = Vec::with_capacity(params.len());
        for param in params {
            let ty = self.type_text(param.type_annotation.as_ref(), param.name.id);
            let rest = if param.rest { "..." } else { "" };
            let optional = if param.optional || param.initializer.is_some() { "?" } else { "" };
            parts.push(format!("{rest}{}{optional}: {ty}", param.name.name));
        }
        parts.join(", ")
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn statements(&mut self, statements: &[Statement], top_level: bool) {
        for (idx, stmt) in statements.iter().enumerate() {
            match &stmt.kind {
                StatementKind::Import(decl) => self.import(decl),
                StatementKind::ImportEquals(decl) => self.import_equals(decl, top_level),
                StatementKind::Export(decl) => self.export(decl),
                StatementKind::ExportAssignment(assignment) => self.export_assignment(assignment),
                StatementKind::Variable(var) => self.variable(var, top_level),
                StatementKind::Function(func) => {
                    // Overloads stand for the implementation signature.
                    let has_overloads = func.body.is_some()
                        && idx > 0
                        && matches!(&statements[idx - 1].kind, StatementKind::Function(prev)
                            if prev.body.is_none() && prev.name.as_ref().map(|n| &n.name) == func.name.as_ref().map(|n| &n.name));
                    if !has_overloads {
                        self.function(func, top_level);
                    }
                }
                StatementKind::Class(class) => self.class(class, top_level),
                StatementKind::Interface(decl) => self.interface(decl, top_level),
                StatementKind::TypeAlias(decl) => {
                    let prefix = self.prefix(decl.modifiers, top_level);
                    let text = format!(
                        "{prefix}type {}{} = {};",
                        decl.name.name,
                        type_parameters(&decl.type_parameters),
                        decl.type_node.text
                    );
                    self.line(&text);
                }
                StatementKind::Enum(decl) => self.enumeration(decl, top_level),
                StatementKind::Module(decl) => self.namespace(decl, top_level),
                StatementKind::Expression(_)
                | StatementKind::Return(_)
                | StatementKind::If(_)
                | StatementKind::Block(_)
                | StatementKind::Throw(_)
                | StatementKind::Empty => {}
            }
        }
    }

    fn import(&mut self, decl: &ImportDeclaration) {
        let from = quote(&decl.module_specifier);
        let Some(clause) = &decl.clause else {
            self.line(&format!("import {from};"));
            return;
        };
        let mut parts = Vec::new();
        if let Some(default) = &clause.default {
            parts.push(default.name.clone());
        }
        match &clause.bindings {
            Some(NamedImportBindings::Namespace(ns)) => parts.push(format!("* as {}", ns.name)),
            Some(NamedImportBindings::Named(specs)) => {
                let names: Vec<String> = specs
                    .iter()
                    .map(|s| match &s.property_name {
                        Some(imported) => format!("{} as {}", imported.name, s.name.name),
                        None => s.name.name.clone(),
                    })
                    .collect();
                parts.push(format!("{{ {} }}", names.join(", ")));
            }
            None => {}
        }
        let type_only = if decl.is_type_only { "type " } else { "" };
        self.line(&format!("import {type_only}{} from {from};", parts.join(", ")));
    }

    fn import_equals(&mut self, decl: &ImportEqualsDeclaration, top_level: bool) {
        let export = if decl.is_exported {
            self.wrote_export = self.wrote_export || top_level;
            "export "
        } else {
            ""
        };
        let target = match &decl.reference {
            ModuleReference::External(lit) => format!("require({})", quote(lit)),
            ModuleReference::Entity(expr) => expr.entity_name().unwrap_or_else(|| "any".to_string()),
        };
        self.line(&format!("{export}import {} = {target};", decl.name.name));
    }

    fn export(&mut self, decl: &ExportDeclaration) {
        self.wrote_export = true;
        let from = decl
            .module_specifier
            .as_ref()
            .map(|spec| format!(" from {}", quote(spec)))
            .unwrap_or_default();
        let type_only = if decl.is_type_only { "type " } else { "" };
        match &decl.clause {
            ExportClause::Star => {
                let expanded = decl
                    .module_specifier
                    .as_ref()
                    .and_then(|spec| self.expansions.get(&spec.value));
                match expanded {
                    Some(names) if names.is_empty() => {}
                    Some(names) => self.line(&format!("export {{ {} }}{from};", names.join(", "))),
                    None => self.line(&format!("export *{from};")),
                }
            }
            ExportClause::Namespace(ns) => self.line(&format!("export * as {}{from};", ns.name)),
            ExportClause::Named(specs) => {
                let names: Vec<String> = specs
                    .iter()
                    .map(|s| match &s.property_name {
                        Some(local) => format!("{} as {}", local.name, s.name.name),
                        None => s.name.name.clone(),
                    })
                    .collect();
                self.line(&format!("export {type_only}{{ {} }}{from};", names.join(", ")));
            }
        }
    }

    fn export_assignment(&mut self, assignment: &ExportAssignment) {
        self.wrote_export = true;
        let keyword = if assignment.is_export_equals { "export =" } else { "export default" };
        match assignment.expression.entity_name() {
            Some(name) => self.line(&format!("{keyword} {name};")),
            None => {
                let ty = self.type_text(None, assignment.expression.id);
                self.line(&format!("declare const _default: {ty};"));
                self.line(&format!("{keyword} _default;"));
            }
        }
    }

    fn variable(&mut self, var: &VariableStatement, top_level: bool) {
        let prefix = self.prefix(var.modifiers, top_level);
        for decl in &var.declarations {
            let literal = match (var.kind, &decl.type_annotation, &decl.initializer) {
                (VarKind::Const, None, Some(init)) => literal_text(init),
                _ => None,
            };
            let text = match literal {
                Some(literal) => format!("{prefix}{} {} = {literal};", var.kind.keyword(), decl.name.name),
                None => {
                    let ty = self.type_text(decl.type_annotation.as_ref(), decl.name.id);
                    format!("{prefix}{} {}: {ty};", var.kind.keyword(), decl.name.name)
                }
            };
            self.line(&text);
        }
    }

    fn function(&mut self, func: &FunctionDeclaration, top_level: bool) {
        let prefix = self.prefix(func.modifiers, top_level);
        let name = func.name.as_ref().map_or("", |n| n.name.as_str());
        let node = func.name.as_ref().map_or(NodeId::SYNTHETIC, |n| n.id);
        let params = self.parameters(&func.parameters);
        let ret = self.return_text(func.return_type.as_ref(), node);
        let separator = if name.is_empty() { "" } else { " " };
        self.line(&format!(
            "{prefix}function{separator}{name}{}({params}): {ret};",
            type_parameters(&func.type_parameters)
        ));
    }

    fn class(&mut self, class: &ClassDeclaration, top_level: bool) {
        let prefix = self.prefix(class.modifiers, top_level);
        let abstract_kw = if class.modifiers.contains(ModifierFlags::ABSTRACT) { "abstract " } else { "" };
        let name = class.name.as_ref().map_or("", |n| n.name.as_str());
        let mut header = format!("{prefix}{abstract_kw}class");
        if !name.is_empty() {
            header.push(' ');
            header.push_str(name);
        }
        header.push_str(&type_parameters(&class.type_parameters));
        if let Some(extends) = &class.extends {
            header.push_str(" extends ");
            header.push_str(&heritage(extends));
        }
        if !class.implements.is_empty() {
            let list: Vec<String> = class.implements.iter().map(heritage).collect();
            header.push_str(" implements ");
            header.push_str(&list.join(", "));
        }
        header.push_str(" {");
        self.line(&header);
        self.indent += 1;

        for member in &class.members {
            let modifiers = member.modifiers;
            let private = modifiers.contains(ModifierFlags::PRIVATE);
            let mut mods = String::new();
            if private {
                mods.push_str("private ");
            } else if modifiers.contains(ModifierFlags::PROTECTED) {
                mods.push_str("protected ");
            }
            if member.is_static() {
                mods.push_str("static ");
            }
            if modifiers.contains(ModifierFlags::ABSTRACT) {
                mods.push_str("abstract ");
            }
            match &member.kind {
                ClassMemberKind::Constructor(ctor) => {
                    for param in ctor.parameters.iter().filter(|p| p.is_parameter_property()) {
                        let readonly = if param.modifiers.contains(ModifierFlags::READONLY) { "readonly " } else { "" };
                        let text = if param.modifiers.contains(ModifierFlags::PRIVATE) {
                            format!("private {readonly}{};", param.name.name)
                        } else {
                            let visibility = if param.modifiers.contains(ModifierFlags::PROTECTED) {
                                "protected "
                            } else {
                                ""
                            };
                            let ty = self.type_text(param.type_annotation.as_ref(), param.name.id);
                            format!("{visibility}{readonly}{}: {ty};", param.name.name)
                        };
                        self.line(&text);
                    }
                    let params = self.parameters(&ctor.parameters);
                    self.line(&format!("{mods}constructor({params});"));
                }
                ClassMemberKind::Method(method) => {
                    let Some(name) = property_name(&method.name) else { continue };
                    if private {
                        self.line(&format!("{mods}{name};"));
                        continue;
                    }
                    let optional = if method.optional { "?" } else { "" };
                    let params = self.parameters(&method.parameters);
                    let ret = self.return_text(method.return_type.as_ref(), member.id);
                    self.line(&format!(
                        "{mods}{name}{optional}{}({params}): {ret};",
                        type_parameters(&method.type_parameters)
                    ));
                }
                ClassMemberKind::Property(prop) => {
                    let Some(name) = property_name(&prop.name) else { continue };
                    let readonly = if modifiers.contains(ModifierFlags::READONLY) { "readonly " } else { "" };
                    if private {
                        self.line(&format!("{mods}{readonly}{name};"));
                        continue;
                    }
                    let optional = if prop.optional { "?" } else { "" };
                    let ty = self.type_text(prop.type_annotation.as_ref(), member.id);
                    self.line(&format!("{mods}{readonly}{name}{optional}: {ty};"));
                }
                ClassMemberKind::GetAccessor(accessor) => {
                    let Some(name) = property_name(&accessor.name) else { continue };
                    let ret = match &accessor.return_type {
                        Some(t) => t.text.clone(),
                        None => self.type_text(None, member.id),
                    };
                    self.line(&format!("{mods}get {name}(): {ret};"));
                }
                ClassMemberKind::SetAccessor(accessor) => {
                    let Some(name) = property_name(&accessor.name) else { continue };
                    let params = self.parameters(&accessor.parameters);
                    self.line(&format!("{mods}set {name}({params});"));
                }
            }
        }
        self.indent -= 1;
        self.line("}");
    }

    fn interface(&mut self, decl: &InterfaceDeclaration, top_level: bool) {
        let mut prefix = self.prefix(decl.modifiers, top_level);
        // Interfaces are never `declare`d.
        if let Some(stripped) = prefix.strip_suffix("declare ") {
            prefix = stripped.to_string();
        }
        let mut header = format!("{prefix}interface {}{}", decl.name.name, type_parameters(&decl.type_parameters));
        if !decl.extends.is_empty() {
            let list: Vec<String> = decl.extends.iter().map(heritage).collect();
            header.push_str(" extends ");
            header.push_str(&list.join(", "));
        }
        header.push_str(" {");
        self.line(&header);
        self.indent += 1;
        for member in &decl.members {
            match &member.kind {
                InterfaceMemberKind::Property {
                    name,
                    optional,
                    readonly,
                    type_annotation,
                } => {
                    let Some(name) = property_name(name) else { continue };
                    let readonly = if *readonly { "readonly " } else { "" };
                    let optional = if *optional { "?" } else { "" };
                    let ty = self.type_text(type_annotation.as_ref(), member.id);
                    self.line(&format!("{readonly}{name}{optional}: {ty};"));
                }
                InterfaceMemberKind::Method {
                    name,
                    optional,
                    type_parameters: generics,
                    parameters,
                    return_type,
                } => {
                    let Some(name) = property_name(name) else { continue };
                    let optional = if *optional { "?" } else { "" };
                    let params = self.parameters(parameters);
                    let ret = self.return_text(return_type.as_ref(), member.id);
                    self.line(&format!("{name}{optional}{}({params}): {ret};", type_parameters(generics)));
                }
                InterfaceMemberKind::Signature { text } => {
                    let text = text.trim_end_matches(';');
                    self.line(&format!("{text};"));
                }
            }
        }
        self.indent -= 1;
        self.line("}");
    }

    fn enumeration(&mut self, decl: &EnumDeclaration, top_level: bool) {
        let prefix = self.prefix(decl.modifiers, top_level);
        let const_kw = if decl.is_const() { "const " } else { "" };
        self.line(&format!("{prefix}{const_kw}enum {} {{", decl.name.name));
        self.indent += 1;
        let values = crate::enums::member_values(decl, self.checker).unwrap_or_default();
        for (name, value) in values {
            let key = if is_identifier(&name) { name } else { format!("\"{}\"", escape_string(&name, '"')) };
            let text = match value {
                crate::enums::EnumValue::Number(n) => format!("{key} = {n},"),
                crate::enums::EnumValue::String(s) => format!("{key} = \"{}\",", escape_string(&s, '"')),
                crate::enums::EnumValue::Computed(_) => format!("{key},"),
            };
            self.line(&text);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn namespace(&mut self, decl: &ModuleDeclaration, top_level: bool) {
        let prefix = self.prefix(decl.modifiers, top_level);
        let (keyword, name) = match &decl.name {
            ModuleName::Identifier(ident) => ("namespace", ident.name.clone()),
            ModuleName::String(lit) => ("module", quote(lit)),
        };
        let Some(body) = &decl.body else {
            self.line(&format!("{prefix}{keyword} {name};"));
            return;
        };
        self.line(&format!("{prefix}{keyword} {name} {{"));
        self.indent += 1;
        self.statements(body, false);
        self.indent -= 1;
        self.line("}");
    }
}

#[cfg(test)]
#[path = "../tests/declarations.rs"]
mod tests;

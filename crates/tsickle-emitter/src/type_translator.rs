//! Serialization of checker types into Closure type expressions.
//!
//! Every top-level call ([`TypeTranslator::translate`]) starts with a fresh
//! [`VisitedTypeSet`]. Anything that cannot be expressed, resolved or
//! terminated degrades to `?`; nothing here reports a diagnostic.

use crate::host::TsickleHost;
use crate::module_symbols::ModuleSymbolTable;
use crate::visited::{VisitResult, VisitedTypeSet};
use tracing::trace;
use tsickle_common::limits::MAX_QUALIFIED_NAME_DEPTH;
use tsickle_program::types::PropertySignature;
use tsickle_program::{NodeId, ObjectType, Signature, SymbolFlags, SymbolId, TypeChecker, TypeData, TypeId};

pub struct TypeTranslator<'a> {
    checker: &'a dyn TypeChecker,
    host: &'a TsickleHost,
    symbols: &'a mut ModuleSymbolTable,
    file_name: String,
    /// The alias whose `@typedef` is being emitted; it must not name itself.
    typedef_target: Option<SymbolId>,
    /// Type parameters Closure cannot see (signature generics, typedef
    /// parameters). They print as `?`.
    erased_type_parameters: Vec<String>,
    visited: VisitedTypeSet,
}

impl<'a> TypeTranslator<'a> {
    pub fn new(checker: &'a dyn TypeChecker, host: &'a TsickleHost, symbols: &'a mut ModuleSymbolTable) -> Self {
        let file_name = symbols.file_name().to_string();
        Self {
            checker,
            host,
            symbols,
            file_name,
            typedef_target: None,
            erased_type_parameters: Vec::new(),
            visited: VisitedTypeSet::new(),
        }
    }

    pub fn with_typedef_target(mut self, alias: Option<SymbolId>) -> Self {
        self.typedef_target = alias;
        self
    }

    pub fn erase_type_parameters<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.erased_type_parameters.extend(names.into_iter().map(Into::into));
    }

    /// Closure type of `ty`.
    pub fn translate(&mut self, ty: TypeId) -> String {
        self.visited = VisitedTypeSet::new();
        let text = self.translate_inner(ty);
        debug_assert!(self.visited.is_empty(), "unbalanced enter/leave translating {ty}");
        text
    }

    /// Closure type of the node's type, `?` when the checker has none.
    pub fn translate_node(&mut self, node: NodeId) -> String {
        match self.checker.type_of_node(node) {
            Some(ty) => self.translate(ty),
            None => {
                trace!(%node, "no type for node, emitting '?'");
                "?".to_string()
            }
        }
    }

    /// Union of several types with nested unions flattened and duplicate
    /// members (by translated text) removed, first occurrence first.
    pub fn translate_union_of(&mut self, types: &[TypeId]) -> String {
        self.visited = VisitedTypeSet::new();
        let mut flat = Vec::new();
        self.flatten_union(types, &mut flat, 0);
        let parts: Vec<String> = flat.into_iter().map(|ty| self.translate_inner(ty)).collect();
        union_text(parts)
    }

    /// `@param` type text: `T`, `T=` for optional, `...E` for rest.
    pub fn parameter_type(&mut self, types: &[TypeId], optional: bool, rest: bool) -> String {
        if rest {
            self.visited = VisitedTypeSet::new();
            let element = types
                .first()
                .map_or_else(|| "?".to_string(), |&ty| self.rest_element(ty));
            return format!("...{element}");
        }
        let text = self.translate_union_of(types);
        if optional { format!("{text}=") } else { text }
    }

    /// Qualified name of a symbol as seen from this file, `?` when it
    /// cannot be named.
    pub fn symbol_reference(&mut self, symbol: SymbolId) -> String {
        let checker = self.checker;
        let symbol = checker.resolve_alias(symbol);
        let mut path: Vec<(SymbolId, String)> = Vec::new();
        let mut module = None;
        let mut current = symbol;
        for _ in 0..MAX_QUALIFIED_NAME_DEPTH {
            let Some(sym) = checker.get_symbol(current) else {
                break;
            };
            if sym.flags.contains(SymbolFlags::SOURCE_FILE) {
                module = Some(current);
                break;
            }
            path.push((current, sym.name.clone()));
            match sym.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();
        let Some(((top, top_name), rest)) = path.split_first() else {
            trace!(%symbol, "unnamed symbol, emitting '?'");
            return "?".to_string();
        };
        let rest: Vec<&str> = rest.iter().map(|(_, name)| name.as_str()).collect();

        let base = match module {
            Some(module)
                if checker
                    .get_symbol(module)
                    .and_then(|m| m.declaration_file.as_deref())
                    != Some(self.file_name.as_str()) =>
            {
                match self
                    .symbols
                    .reference_to_module_export(checker, self.host, module, *top, top_name)
                {
                    Some(base) => base,
                    None => {
                        trace!(%symbol, name = %top_name, "module of symbol is not imported, emitting '?'");
                        return "?".to_string();
                    }
                }
            }
            _ => top_name.clone(),
        };
        if rest.is_empty() {
            base
        } else {
            format!("{base}.{}", rest.join("."))
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn flatten_union(&self, types: &[TypeId], out: &mut Vec<TypeId>, depth: u32) {
        for &ty in types {
            match self.checker.get_type(ty) {
                Some(t) if t.alias_symbol.is_none() && depth < MAX_QUALIFIED_NAME_DEPTH => {
                    if let TypeData::Union(members) = &t.data {
                        self.flatten_union(members, out, depth + 1);
                    } else {
                        out.push(ty);
                    }
                }
                _ => out.push(ty),
            }
        }
    }

    fn translate_inner(&mut self, ty: TypeId) -> String {
        let checker = self.checker;
        let Some(t) = checker.get_type(ty) else {
            trace!(%ty, "unresolved type, emitting '?'");
            return "?".to_string();
        };

        if let Some(alias) = t.alias_symbol
            && Some(alias) != self.typedef_target
        {
            let name = self.symbol_reference(alias);
            if name != "?" {
                return name;
            }
        }

        match &t.data {
            TypeData::Any | TypeData::Never => "?".to_string(),
            TypeData::Unknown => "*".to_string(),
            TypeData::Void => "void".to_string(),
            TypeData::Undefined => "undefined".to_string(),
            TypeData::Null => "null".to_string(),
            TypeData::String | TypeData::StringLiteral(_) => "string".to_string(),
            TypeData::Number | TypeData::NumberLiteral(_) => "number".to_string(),
            TypeData::Boolean | TypeData::BooleanLiteral(_) => "boolean".to_string(),
            TypeData::BigInt | TypeData::BigIntLiteral(_) => "bigint".to_string(),
            TypeData::ESSymbol => "symbol".to_string(),
            TypeData::NonPrimitive => "!Object".to_string(),
            TypeData::Enum { symbol } => self.symbol_reference(*symbol),
            TypeData::EnumLiteral { enum_symbol, .. } => self.symbol_reference(*enum_symbol),
            TypeData::Intersection(_) => "?".to_string(),
            TypeData::Tuple(_) => "!Array<?>".to_string(),
            TypeData::TypeParameter { name } => {
                if self.erased_type_parameters.iter().any(|erased| erased == name) {
                    "?".to_string()
                } else {
                    name.clone()
                }
            }
            TypeData::This { owner } => self.instance_name(*owner, &[]),
            TypeData::Union(members) => {
                if !self.visited.enter_nested() {
                    trace!(%ty, "type nesting too deep, emitting '?'");
                    return "?".to_string();
                }
                let mut flat = Vec::new();
                self.flatten_union(members, &mut flat, 0);
                let parts: Vec<String> = flat.into_iter().map(|m| self.translate_inner(m)).collect();
                self.visited.leave_nested();
                union_text(parts)
            }
            TypeData::Reference {
                target,
                type_arguments,
            } => {
                if !self.visited.enter_nested() {
                    trace!(%ty, "type nesting too deep, emitting '?'");
                    return "?".to_string();
                }
                let text = self.instance_name(*target, type_arguments);
                self.visited.leave_nested();
                text
            }
            TypeData::Object(object) => match self.visited.enter(ty) {
                VisitResult::Entered => {
                    let text = self.translate_object(object);
                    self.visited.leave(ty);
                    text
                }
                VisitResult::Cycle => {
                    trace!(%ty, "recursive type, emitting '?'");
                    "?".to_string()
                }
                VisitResult::DepthExceeded => {
                    trace!(%ty, "type nesting too deep, emitting '?'");
                    "?".to_string()
                }
            },
        }
    }

    /// `!Name` or `!Name<A,B>`.
    fn instance_name(&mut self, target: SymbolId, type_arguments: &[TypeId]) -> String {
        let name = self.symbol_reference(target);
        if name == "?" {
            return name;
        }
        if type_arguments.is_empty() {
            return format!("!{name}");
        }
        let args: Vec<String> = type_arguments.iter().map(|&arg| self.translate_inner(arg)).collect();
        format!("!{name}<{}>", args.join(","))
    }

    fn translate_object(&mut self, object: &ObjectType) -> String {
        let has_index = object.string_index.is_some() || object.number_index.is_some();
        let has_props = !object.properties.is_empty();
        let has_calls = !object.call_signatures.is_empty();
        let has_ctors = !object.construct_signatures.is_empty();

        match (has_calls, has_ctors, has_props, has_index) {
            (false, false, false, false) => "*".to_string(),
            (true, false, false, false) => match object.call_signatures.as_slice() {
                [sig] => self.signature_to_closure(sig, false),
                _ => "!Function".to_string(),
            },
            (false, true, false, false) => match object.construct_signatures.as_slice() {
                [sig] => self.signature_to_closure(sig, true),
                _ => "!Function".to_string(),
            },
            (false, false, true, false) => self.record(&object.properties),
            (false, false, false, true) => {
                let (key, value) = match (object.string_index, object.number_index) {
                    (Some(value), _) => ("string", value),
                    (None, Some(value)) => ("number", value),
                    (None, None) => return "?".to_string(),
                };
                let value = self.translate_inner(value);
                format!("!Object<{key},{value}>")
            }
            _ => "?".to_string(),
        }
    }

    fn record(&mut self, properties: &[PropertySignature]) -> String {
        let fields: Vec<String> = properties
            .iter()
            .map(|prop| {
                let mut value = self.translate_inner(prop.type_id);
                if prop.optional {
                    value = union_text(vec![value, "undefined".to_string()]);
                }
                if is_identifier(&prop.name) {
                    format!("{}: {value}", prop.name)
                } else {
                    format!("'{}': {value}", prop.name.replace('\'', "\\'"))
                }
            })
            .collect();
        format!("{{{}}}", fields.join(", "))
    }

    /// `function(this:T, A, B=, ...C): R` or `function(new:R, A)`.
    pub(crate) fn signature_to_closure(&mut self, sig: &Signature, construct: bool) -> String {
        let erased_before = self.erased_type_parameters.len();
        self.erased_type_parameters.extend(sig.type_parameters.iter().cloned());

        let mut parts = Vec::with_capacity(sig.parameters.len() + 1);
        if construct {
            let instance = self.translate_inner(sig.return_type);
            parts.push(format!("new:{}", instance.trim_start_matches('!')));
        } else if let Some(this_type) = sig.this_type {
            parts.push(format!("this:{}", self.translate_inner(this_type)));
        }
        for param in &sig.parameters {
            let text = if param.rest {
                format!("...{}", self.rest_element(param.type_id))
            } else if param.optional {
                format!("{}=", self.translate_inner(param.type_id))
            } else {
                self.translate_inner(param.type_id)
            };
            parts.push(text);
        }
        let mut out = format!("function({})", parts.join(", "));
        if !construct {
            out.push_str(": ");
            out.push_str(&self.translate_inner(sig.return_type));
        }

        self.erased_type_parameters.truncate(erased_before);
        out
    }

    /// Element type of a rest parameter's array type.
    fn rest_element(&mut self, ty: TypeId) -> String {
        let checker = self.checker;
        match checker.type_data(ty) {
            Some(TypeData::Reference {
                target,
                type_arguments,
            }) if type_arguments.len() == 1 && checker.symbol_name(*target) == Some("Array") => {
                self.translate_inner(type_arguments[0])
            }
            _ => "?".to_string(),
        }
    }
}

/// `(A|B)` with duplicates removed, a lone member bare, `?` when empty.
pub fn union_text(parts: Vec<String>) -> String {
    let mut unique: Vec<String> = Vec::with_capacity(parts.len());
    for part in parts {
        if !unique.contains(&part) {
            unique.push(part);
        }
    }
    match unique.len() {
        0 => "?".to_string(),
        1 => unique.swap_remove(0),
        _ => format!("({})", unique.join("|")),
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c == '$' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

#[cfg(test)]
#[path = "../tests/type_translator.rs"]
mod tests;

//! TypeScript syntax for checker types, used by declaration output where a
//! declaration has no written annotation.
//!
//! Cycles and types that cannot be named print as `any`.

use crate::type_translator::is_identifier;
use crate::visited::VisitedTypeSet;
use tracing::trace;
use tsickle_program::types::PropertySignature;
use tsickle_program::{ObjectType, Signature, TypeChecker, TypeData, TypeId};

pub struct TypeDisplay<'a> {
    checker: &'a dyn TypeChecker,
    visited: VisitedTypeSet,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(checker: &'a dyn TypeChecker) -> Self {
        Self {
            checker,
            visited: VisitedTypeSet::new(),
        }
    }

    pub fn display(&mut self, ty: TypeId) -> String {
        self.visited = VisitedTypeSet::new();
        self.display_inner(ty)
    }

    fn symbol_name(&self, symbol: tsickle_program::SymbolId) -> String {
        self.checker.symbol_name(symbol).unwrap_or("any").to_string()
    }

    fn display_inner(&mut self, ty: TypeId) -> String {
        let checker = self.checker;
        let Some(data) = checker.type_data(ty) else {
            trace!(%ty, "unknown type id, displaying 'any'");
            return "any".to_string();
        };
        if let Some(alias) = checker.get_type(ty).and_then(|t| t.alias_symbol) {
            return self.symbol_name(alias);
        }
        match data {
            TypeData::Any => "any".to_string(),
            TypeData::Unknown => "unknown".to_string(),
            TypeData::Never => "never".to_string(),
            TypeData::Void => "void".to_string(),
            TypeData::Undefined => "undefined".to_string(),
            TypeData::Null => "null".to_string(),
            TypeData::String => "string".to_string(),
            TypeData::Number => "number".to_string(),
            TypeData::Boolean => "boolean".to_string(),
            TypeData::BigInt => "bigint".to_string(),
            TypeData::ESSymbol => "symbol".to_string(),
            TypeData::NonPrimitive => "object".to_string(),
            TypeData::StringLiteral(value) => format!("\"{}\"", tsickle_program::ast::escape_string(value, '"')),
            TypeData::NumberLiteral(text) | TypeData::BigIntLiteral(text) => text.clone(),
            TypeData::BooleanLiteral(value) => value.to_string(),
            TypeData::Enum { symbol } => self.symbol_name(*symbol),
            TypeData::EnumLiteral { enum_symbol, member } => {
                format!("{}.{}", self.symbol_name(*enum_symbol), self.symbol_name(*member))
            }
            TypeData::TypeParameter { name } => name.clone(),
            TypeData::This { .. } => "this".to_string(),
            TypeData::Union(members) | TypeData::Intersection(members) => {
                let separator = if matches!(data, TypeData::Union(_)) { " | " } else { " & " };
                let members = members.clone();
                if !self.visited.enter(ty).is_entered() {
                    return "any".to_string();
                }
                let parts: Vec<String> = members.iter().map(|&m| self.parenthesized_member(m)).collect();
                self.visited.leave(ty);
                parts.join(separator)
            }
            TypeData::Reference { target, type_arguments } => {
                let name = self.symbol_name(*target);
                let type_arguments = type_arguments.clone();
                if type_arguments.is_empty() {
                    return name;
                }
                if !self.visited.enter(ty).is_entered() {
                    return name;
                }
                let args: Vec<String> = type_arguments.iter().map(|&a| self.display_inner(a)).collect();
                self.visited.leave(ty);
                if name == "Array" && args.len() == 1 {
                    return format!("{}[]", self.wrap_array_element(type_arguments[0], &args[0]));
                }
                format!("{name}<{}>", args.join(", "))
            }
            TypeData::Tuple(elements) => {
                let elements = elements.clone();
                if !self.visited.enter(ty).is_entered() {
                    return "any".to_string();
                }
                let parts: Vec<String> = elements.iter().map(|&e| self.display_inner(e)).collect();
                self.visited.leave(ty);
                format!("[{}]", parts.join(", "))
            }
            TypeData::Object(object) => {
                let object = object.clone();
                if !self.visited.enter(ty).is_entered() {
                    trace!(%ty, "recursive anonymous type, displaying 'any'");
                    return "any".to_string();
                }
                let text = self.object(&object);
                self.visited.leave(ty);
                text
            }
        }
    }

    fn parenthesized_member(&mut self, ty: TypeId) -> String {
        let text = self.display_inner(ty);
        let is_function = matches!(
            self.checker.type_data(ty),
            Some(TypeData::Object(object)) if object.single_call_signature().is_some()
        );
        if is_function { format!("({text})") } else { text }
    }

    fn wrap_array_element(&self, element: TypeId, text: &str) -> String {
        match self.checker.type_data(element) {
            Some(TypeData::Union(_) | TypeData::Intersection(_)) => format!("({text})"),
            Some(TypeData::Object(object)) if object.single_call_signature().is_some() => format!("({text})"),
            _ => text.to_string(),
        }
    }

    fn parameters(&mut self, signature: &Signature) -> String {
        signature
            .parameters
            .iter()
            .map(|p| {
                let ty = self.display_inner(p.type_id);
                let rest = if p.rest { "..." } else { "" };
                let optional = if p.optional { "?" } else { "" };
                format!("{rest}{}{optional}: {ty}", p.name)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn type_parameters(signature: &Signature) -> String {
        if signature.type_parameters.is_empty() {
            String::new()
        } else {
            format!("<{}>", signature.type_parameters.join(", "))
        }
    }

    fn object(&mut self, object: &ObjectType) -> String {
        if let Some(signature) = object.single_call_signature()
            && object.string_index.is_none()
            && object.number_index.is_none()
        {
            let params = self.parameters(signature);
            let ret = self.display_inner(signature.return_type);
            return format!("{}({params}) => {ret}", Self::type_parameters(signature));
        }
        let mut members = Vec::new();
        for signature in &object.call_signatures {
            let params = self.parameters(signature);
            let ret = self.display_inner(signature.return_type);
            members.push(format!("{}({params}): {ret};", Self::type_parameters(signature)));
        }
        for signature in &object.construct_signatures {
            let params = self.parameters(signature);
            let ret = self.display_inner(signature.return_type);
            members.push(format!("new {}({params}): {ret};", Self::type_parameters(signature)));
        }
        if let Some(index) = object.string_index {
            members.push(format!("[key: string]: {};", self.display_inner(index)));
        }
        if let Some(index) = object.number_index {
            members.push(format!("[index: number]: {};", self.display_inner(index)));
        }
        for PropertySignature { name, type_id, optional } in &object.properties {
            let key = if is_identifier(name) {
                name.clone()
            } else {
                format!("\"{}\"", tsickle_program::ast::escape_string(name, '"'))
            };
            let optional = if *optional { "?" } else { "" };
            members.push(format!("{key}{optional}: {};", self.display_inner(*type_id)));
        }
        if members.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", members.join(" "))
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_display.rs"]
mod tests;

//! Merging of overload signatures into the one signature that is emitted.
//!
//! Closure sees a single function. Its parameter at each position is typed
//! with the union of every overload's parameter at that position (overloads
//! first, then the implementation). A position some signature lacks is
//! optional; a rest parameter in any signature makes the position a rest.

use smallvec::SmallVec;
use tsickle_program::{Signature, TypeChecker, TypeData, TypeId};
use tsickle_program::ast::Parameter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedParameter {
    pub name: String,
    /// Types at this position, in signature order (not yet deduplicated).
    pub types: SmallVec<[TypeId; 2]>,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergedSignature {
    pub parameters: Vec<MergedParameter>,
    pub return_types: SmallVec<[TypeId; 2]>,
    pub type_parameters: Vec<String>,
}

/// Merge `signatures`; `names` are the implementation's parameter names,
/// used in preference to the overloads' names.
pub fn merge_signatures(signatures: &[&Signature], names: &[String]) -> MergedSignature {
    let arity = signatures
        .iter()
        .map(|sig| sig.parameters.len())
        .max()
        .unwrap_or(0)
        .max(names.len());
    let mut merged = MergedSignature::default();

    for position in 0..arity {
        let mut param = MergedParameter {
            name: names.get(position).cloned().unwrap_or_default(),
            types: SmallVec::new(),
            optional: false,
            rest: false,
        };
        for sig in signatures {
            match sig.parameters.get(position) {
                Some(p) => {
                    if param.name.is_empty() {
                        param.name = p.name.clone();
                    }
                    param.types.push(p.type_id);
                    param.optional |= p.optional;
                    param.rest |= p.rest;
                }
                None => param.optional = true,
            }
        }
        if param.name.is_empty() {
            param.name = format!("arg{position}");
        }
        merged.parameters.push(param);
    }
    // A rest parameter swallows everything after it.
    if let Some(rest_at) = merged.parameters.iter().position(|p| p.rest) {
        merged.parameters.truncate(rest_at + 1);
    }

    for sig in signatures {
        merged.return_types.push(sig.return_type);
        for type_param in &sig.type_parameters {
            if !merged.type_parameters.contains(type_param) {
                merged.type_parameters.push(type_param.clone());
            }
        }
    }
    merged
}

/// Signatures of a function-like declaration: the call (or construct)
/// signatures of the node's type.
pub fn signatures_of(checker: &dyn TypeChecker, ty: TypeId) -> Vec<&Signature> {
    match checker.type_data(ty) {
        Some(TypeData::Object(object)) => object
            .call_signatures
            .iter()
            .chain(object.construct_signatures.iter())
            .collect(),
        _ => Vec::new(),
    }
}

/// Parameter names as written.
pub fn parameter_names(parameters: &[Parameter]) -> Vec<String> {
    parameters.iter().map(|p| p.name.name.clone()).collect()
}

#[cfg(test)]
#[path = "../tests/constructors.rs"]
mod tests;

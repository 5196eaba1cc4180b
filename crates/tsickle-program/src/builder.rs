//! In-memory [`Program`] implementation.
//!
//! [`ProgramBuilder`] assembles source files, symbols and types by hand, which
//! is how hosts without a TypeScript front end (and the test suites) drive the
//! pipeline. The resulting [`InMemoryProgram`] answers every checker query
//! from tables filled in by the builder.
//!
//! # Example
//!
//! ```
//! use tsickle_program::{ProgramBuilder, SymbolFlags, StatementKind, VarKind};
//! use tsickle_program::ast::{ModifierFlags, VariableDeclaration, VariableStatement};
//! use tsickle_common::CompilerOptions;
//!
//! let mut b = ProgramBuilder::new(CompilerOptions::default());
//! let module = b.module("a.ts");
//! let x = b.declare(module, "x", SymbolFlags::VARIABLE);
//! let number = b.number();
//! let name = b.ident_for("x", x);
//! b.bind_type(name.id, number);
//! let one = b.num("1");
//! let stmt = b.stmt(StatementKind::Variable(VariableStatement {
//!     modifiers: ModifierFlags::EXPORT,
//!     kind: VarKind::Const,
//!     declarations: vec![VariableDeclaration {
//!         name,
//!         type_annotation: None,
//!         initializer: Some(one),
//!     }],
//! }));
//! b.add_file("a.ts", vec![stmt]);
//! let program = b.build();
//! # use tsickle_program::Program;
//! assert_eq!(program.source_files().len(), 1);
//! ```

use crate::ast::{
    ConstantValue, Expression, ExpressionKind, Identifier, SourceFile, Statement, StatementKind,
    StringLiteral, TypeNode,
};
use crate::checker::{Program, ResolvedModule, TypeChecker};
use crate::ids::{NodeId, SymbolId, TypeId};
use crate::symbols::{Symbol, SymbolFlags};
use crate::types::{ObjectType, Signature, SignatureParameter, Type, TypeData};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tsickle_common::limits::MAX_EXPORT_STAR_DEPTH;
use tsickle_common::path;
use tsickle_common::{CompilerOptions, Diagnostic};

// =============================================================================
// InMemoryProgram
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryProgram {
    files: Vec<SourceFile>,
    options: CompilerOptions,
    types: Vec<Type>,
    symbols: Vec<Symbol>,
    node_types: FxHashMap<NodeId, TypeId>,
    node_symbols: FxHashMap<NodeId, SymbolId>,
    value_aliases: FxHashSet<SymbolId>,
    constants: FxHashMap<NodeId, ConstantValue>,
    /// File name -> module symbol.
    modules: FxHashMap<String, SymbolId>,
    /// Module -> modules it re-exports with `export *`, in source order.
    export_stars: FxHashMap<SymbolId, Vec<SymbolId>>,
    /// Non-relative specifiers (`tslib`, `@scope/pkg`) -> file name.
    external_modules: FxHashMap<String, String>,
    diagnostics: Vec<Diagnostic>,
}

impl InMemoryProgram {
    fn module_for_file(&self, file_name: &str) -> Option<SymbolId> {
        self.modules.get(file_name).copied()
    }

    fn is_known_file(&self, file_name: &str) -> bool {
        self.modules.contains_key(file_name) || self.files.iter().any(|f| f.file_name == file_name)
    }

    fn collect_exports(
        &self,
        module: SymbolId,
        depth: u32,
        out: &mut IndexMap<String, SymbolId>,
        ambiguous: &mut FxHashSet<String>,
    ) {
        let Some(symbol) = self.get_symbol(module) else {
            return;
        };
        for (name, &sym) in &symbol.exports {
            out.entry(name.clone()).or_insert(sym);
        }
        if depth >= MAX_EXPORT_STAR_DEPTH {
            trace!(module = %module, "export * chain too deep, stopping");
            return;
        }
        let Some(stars) = self.export_stars.get(&module) else {
            return;
        };
        let own: FxHashSet<&str> = symbol.exports.keys().map(String::as_str).collect();
        let mut from_stars: IndexMap<String, SymbolId> = IndexMap::new();
        for &source in stars {
            let mut nested = IndexMap::new();
            self.collect_exports(source, depth + 1, &mut nested, ambiguous);
            for (name, sym) in nested {
                if name == "default" || own.contains(name.as_str()) {
                    continue;
                }
                match from_stars.get(&name) {
                    Some(&existing)
                        if self.resolve_alias(existing) != self.resolve_alias(sym) =>
                    {
                        ambiguous.insert(name);
                    }
                    Some(_) => {}
                    None => {
                        from_stars.insert(name, sym);
                    }
                }
            }
        }
        for (name, sym) in from_stars {
            if !ambiguous.contains(&name) {
                out.entry(name).or_insert(sym);
            }
        }
    }
}

impl TypeChecker for InMemoryProgram {
    fn type_of_node(&self, node: NodeId) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    fn symbol_of_node(&self, node: NodeId) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    fn get_type(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.index())
    }

    fn get_symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    fn resolve_module(&self, containing_file: &str, specifier: &str) -> Option<ResolvedModule> {
        let file_name = if path::is_relative_specifier(specifier) {
            let base = path::join(path::dirname(containing_file), specifier);
            let candidates = [
                base.clone(),
                format!("{base}.ts"),
                format!("{base}.tsx"),
                format!("{base}.d.ts"),
                format!("{base}/index.ts"),
                format!("{base}/index.d.ts"),
            ];
            candidates.into_iter().find(|c| self.is_known_file(c))?
        } else {
            self.external_modules.get(specifier)?.clone()
        };
        Some(ResolvedModule {
            module_symbol: self.module_for_file(&file_name),
            file_name,
        })
    }

    fn exports_of_module(&self, module: SymbolId) -> Vec<(String, SymbolId)> {
        let mut out = IndexMap::new();
        let mut ambiguous = FxHashSet::default();
        self.collect_exports(module, 0, &mut out, &mut ambiguous);
        out.into_iter().collect()
    }

    fn is_referenced_as_value(&self, alias: SymbolId) -> bool {
        self.value_aliases.contains(&alias)
    }

    fn constant_value(&self, node: NodeId) -> Option<ConstantValue> {
        self.constants.get(&node).cloned()
    }
}

impl Program for InMemoryProgram {
    fn source_files(&self) -> &[SourceFile] {
        &self.files
    }

    fn checker(&self) -> &dyn TypeChecker {
        self
    }

    fn compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    fn pre_emit_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }
}

// =============================================================================
// ProgramBuilder
// =============================================================================

/// Ids of the intrinsic types, allocated first by every builder.
#[derive(Copy, Clone, Debug)]
struct Intrinsics {
    any: TypeId,
    unknown: TypeId,
    never: TypeId,
    void: TypeId,
    undefined: TypeId,
    null: TypeId,
    string: TypeId,
    number: TypeId,
    boolean: TypeId,
}

pub struct ProgramBuilder {
    program: InMemoryProgram,
    next_node: u32,
    intrinsics: Intrinsics,
}

impl ProgramBuilder {
    pub fn new(options: CompilerOptions) -> Self {
        let mut program = InMemoryProgram {
            options,
            ..InMemoryProgram::default()
        };
        let mut intrinsic = |data: TypeData| {
            program.types.push(Type::new(data));
            TypeId((program.types.len() - 1) as u32)
        };
        let intrinsics = Intrinsics {
            any: intrinsic(TypeData::Any),
            unknown: intrinsic(TypeData::Unknown),
            never: intrinsic(TypeData::Never),
            void: intrinsic(TypeData::Void),
            undefined: intrinsic(TypeData::Undefined),
            null: intrinsic(TypeData::Null),
            string: intrinsic(TypeData::String),
            number: intrinsic(TypeData::Number),
            boolean: intrinsic(TypeData::Boolean),
        };
        Self {
            program,
            next_node: 0,
            intrinsics,
        }
    }

    pub fn build(self) -> InMemoryProgram {
        self.program
    }

    pub fn options_mut(&mut self) -> &mut CompilerOptions {
        &mut self.program.options
    }

    // --- Types ---------------------------------------------------------------

    pub fn any(&self) -> TypeId {
        self.intrinsics.any
    }

    pub fn unknown(&self) -> TypeId {
        self.intrinsics.unknown
    }

    pub fn never(&self) -> TypeId {
        self.intrinsics.never
    }

    pub fn void(&self) -> TypeId {
        self.intrinsics.void
    }

    pub fn undefined(&self) -> TypeId {
        self.intrinsics.undefined
    }

    pub fn null(&self) -> TypeId {
        self.intrinsics.null
    }

    pub fn string(&self) -> TypeId {
        self.intrinsics.string
    }

    pub fn number(&self) -> TypeId {
        self.intrinsics.number
    }

    pub fn boolean(&self) -> TypeId {
        self.intrinsics.boolean
    }

    pub fn add_type(&mut self, data: TypeData) -> TypeId {
        self.program.types.push(Type::new(data));
        TypeId((self.program.types.len() - 1) as u32)
    }

    /// Reserve a type id to be filled in later; needed for recursive types.
    pub fn reserve_type(&mut self) -> TypeId {
        self.add_type(TypeData::Any)
    }

    pub fn set_type(&mut self, id: TypeId, data: TypeData) {
        if let Some(ty) = self.program.types.get_mut(id.index()) {
            ty.data = data;
        }
    }

    pub fn set_type_alias(&mut self, id: TypeId, alias: SymbolId) {
        if let Some(ty) = self.program.types.get_mut(id.index()) {
            ty.alias_symbol = Some(alias);
        }
    }

    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add_type(TypeData::Union(members))
    }

    pub fn string_literal(&mut self, value: &str) -> TypeId {
        self.add_type(TypeData::StringLiteral(value.to_string()))
    }

    pub fn number_literal(&mut self, value: &str) -> TypeId {
        self.add_type(TypeData::NumberLiteral(value.to_string()))
    }

    pub fn reference(&mut self, target: SymbolId, type_arguments: Vec<TypeId>) -> TypeId {
        self.add_type(TypeData::Reference {
            target,
            type_arguments,
        })
    }

    pub fn object(&mut self, object: ObjectType) -> TypeId {
        self.add_type(TypeData::Object(object))
    }

    /// `(a: A, b?: B) => R` as an anonymous object type.
    pub fn function_type(&mut self, params: Vec<(&str, TypeId, bool)>, ret: TypeId) -> TypeId {
        let signature = Self::signature(params, ret);
        self.object(ObjectType {
            call_signatures: vec![signature],
            ..ObjectType::default()
        })
    }

    pub fn signature(params: Vec<(&str, TypeId, bool)>, ret: TypeId) -> Signature {
        Signature {
            this_type: None,
            type_parameters: Vec::new(),
            parameters: params
                .into_iter()
                .map(|(name, type_id, optional)| SignatureParameter {
                    name: name.to_string(),
                    type_id,
                    optional,
                    rest: false,
                })
                .collect(),
            return_type: ret,
        }
    }

    /// Create the instance type of a class or interface symbol and record it
    /// as the symbol's declared type.
    pub fn instance_type(&mut self, sym: SymbolId) -> TypeId {
        let ty = self.reference(sym, Vec::new());
        self.symbol_mut(sym).declared_type = Some(ty);
        ty
    }

    // --- Symbols -------------------------------------------------------------

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        self.program.symbols.push(symbol);
        SymbolId((self.program.symbols.len() - 1) as u32)
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.program.symbols[id.index()]
    }

    /// The module symbol of `file_name`, created on first use.
    pub fn module(&mut self, file_name: &str) -> SymbolId {
        if let Some(id) = self.program.modules.get(file_name) {
            return *id;
        }
        let mut symbol = Symbol::new(format!("\"{}\"", path::strip_script_extension(file_name)), SymbolFlags::SOURCE_FILE);
        symbol.declaration_file = Some(file_name.to_string());
        let id = self.add_symbol(symbol);
        self.program.modules.insert(file_name.to_string(), id);
        id
    }

    /// An exported declaration of `module`.
    pub fn declare(&mut self, module: SymbolId, name: &str, flags: SymbolFlags) -> SymbolId {
        let file = self.program.symbols[module.index()].declaration_file.clone();
        let mut symbol = Symbol::new(name, flags);
        symbol.parent = Some(module);
        symbol.declaration_file = file;
        let id = self.add_symbol(symbol);
        self.symbol_mut(module).exports.insert(name.to_string(), id);
        id
    }

    /// A non-exported top-level declaration of `file_name`.
    pub fn local(&mut self, file_name: &str, name: &str, flags: SymbolFlags) -> SymbolId {
        let mut symbol = Symbol::new(name, flags);
        symbol.declaration_file = Some(file_name.to_string());
        self.add_symbol(symbol)
    }

    /// A global (ambient, script-scope) declaration such as `Array`.
    pub fn global(&mut self, name: &str, flags: SymbolFlags) -> SymbolId {
        let mut symbol = Symbol::new(name, flags);
        symbol.declaration_file = Some("lib.d.ts".to_string());
        self.add_symbol(symbol)
    }

    /// A member of a namespace or class, exported from its parent.
    pub fn member(&mut self, parent: SymbolId, name: &str, flags: SymbolFlags) -> SymbolId {
        let file = self.program.symbols[parent.index()].declaration_file.clone();
        let mut symbol = Symbol::new(name, flags);
        symbol.parent = Some(parent);
        symbol.declaration_file = file;
        let id = self.add_symbol(symbol);
        self.symbol_mut(parent).exports.insert(name.to_string(), id);
        id
    }

    /// An import binding (or re-export specifier) in `file_name` aliasing
    /// `target`.
    pub fn alias(&mut self, file_name: &str, name: &str, target: SymbolId) -> SymbolId {
        let mut symbol = Symbol::new(name, SymbolFlags::ALIAS);
        symbol.declaration_file = Some(file_name.to_string());
        symbol.alias_target = Some(target);
        self.add_symbol(symbol)
    }

    pub fn mark_value_alias(&mut self, alias: SymbolId) {
        self.program.value_aliases.insert(alias);
    }

    pub fn export_star(&mut self, module: SymbolId, from: SymbolId) {
        self.program.export_stars.entry(module).or_default().push(from);
    }

    pub fn external_module(&mut self, specifier: &str, file_name: &str) -> SymbolId {
        self.program
            .external_modules
            .insert(specifier.to_string(), file_name.to_string());
        self.module(file_name)
    }

    // --- Node tables ---------------------------------------------------------

    pub fn node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn bind_type(&mut self, node: NodeId, ty: TypeId) {
        self.program.node_types.insert(node, ty);
    }

    pub fn bind_symbol(&mut self, node: NodeId, sym: SymbolId) {
        self.program.node_symbols.insert(node, sym);
    }

    pub fn set_constant(&mut self, node: NodeId, value: ConstantValue) {
        self.program.constants.insert(node, value);
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.program.diagnostics.push(diagnostic);
    }

    pub fn add_file(&mut self, file_name: &str, statements: Vec<Statement>) {
        self.program.files.push(SourceFile::new(file_name, statements));
    }

    pub fn add_source_file(&mut self, file: SourceFile) {
        self.program.files.push(file);
    }

    // --- AST helpers ---------------------------------------------------------

    pub fn ident(&mut self, name: &str) -> Identifier {
        Identifier::new(self.node(), name)
    }

    /// An identifier bound to `sym`.
    pub fn ident_for(&mut self, name: &str, sym: SymbolId) -> Identifier {
        let ident = self.ident(name);
        self.bind_symbol(ident.id, sym);
        ident
    }

    pub fn expr(&mut self, kind: ExpressionKind) -> Expression {
        Expression::new(self.node(), kind)
    }

    pub fn stmt(&mut self, kind: StatementKind) -> Statement {
        Statement::new(self.node(), kind)
    }

    /// Identifier expression referring to `sym`.
    pub fn ident_ref(&mut self, name: &str, sym: SymbolId) -> Expression {
        let expr = self.expr(ExpressionKind::Identifier(name.to_string()));
        self.bind_symbol(expr.id, sym);
        expr
    }

    pub fn num(&mut self, text: &str) -> Expression {
        self.expr(ExpressionKind::Numeric(text.to_string()))
    }

    pub fn str_lit(&mut self, value: &str) -> Expression {
        self.expr(ExpressionKind::String(StringLiteral::new(value)))
    }

    /// A type annotation node resolving to `ty`.
    pub fn type_node(&mut self, text: &str, ty: TypeId) -> TypeNode {
        let node = TypeNode::new(self.node(), text);
        self.bind_type(node.id, ty);
        node
    }
}

#[cfg(test)]
#[path = "../tests/builder.rs"]
mod tests;

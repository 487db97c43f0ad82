//! Bytecode builder: walks an AST and emits stack records.

use std::collections::HashMap;
use std::hash::BuildHasher;

use flint_lexer::TokenKind;
use flint_parse::AstNode;
use flint_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::arena::ConstArena;
use crate::error::CompileError;
use crate::literal::{parse_float_literal, parse_int_literal, IntLiteralError};
use crate::record::{encode_bytes, encode_words, Record, FLOAT_RETURN_FLAG};
use crate::registry::{OperatorEntry, OperatorRegistry};
use crate::value_type::ValueType;

/// Declared parameter kinds, by name.
pub type SymbolTypes = FxHashMap<String, TokenKind>;

/// Bytes of evaluation stack one value occupies.
const WORD_BYTES: usize = 8;

/// Longest string literal that can be embedded, exclusive.
const MAX_STRING_LEN: usize = i32::MAX as usize - 2;

/// Incremental bytecode builder.
///
/// Nodes are appended with [`IrBuilder::append`]; [`IrBuilder::finalize`]
/// seals the code and applies the float-return marker.
pub struct IrBuilder<'a> {
    registry: &'a OperatorRegistry,
    symbols: FxHashMap<String, ValueType>,
    code: Vec<Record>,
    arg_map: FxHashMap<String, usize>,
    arg_types: Vec<ValueType>,
    string_args: usize,
    /// Current and peak evaluation stack depth, in values.
    depth: usize,
    max_depth: usize,
    result: Option<ValueType>,
    constants: ConstArena,
    finalized: bool,
}

impl<'a> IrBuilder<'a> {
    /// Create a builder over the declared symbols.
    ///
    /// Every declared kind must be a value kind.
    pub fn new<S: BuildHasher>(
        symbols: &HashMap<String, TokenKind, S>,
        registry: &'a OperatorRegistry,
    ) -> Result<Self, CompileError> {
        let mut typed = FxHashMap::default();
        typed.reserve(symbols.len());
        let mut invalid: Option<(&String, TokenKind)> = None;
        for (name, &kind) in symbols {
            match ValueType::try_from(kind) {
                Ok(ty) => {
                    typed.insert(name.clone(), ty);
                }
                // Report the smallest name so the error does not depend on hash order.
                Err(kind) => {
                    if invalid.map_or(true, |(seen, _)| name < seen) {
                        invalid = Some((name, kind));
                    }
                }
            }
        }
        if let Some((name, kind)) = invalid {
            return Err(CompileError::InvalidSymbolType {
                name: name.clone(),
                kind,
            });
        }

        Ok(IrBuilder {
            registry,
            symbols: typed,
            code: Vec::new(),
            arg_map: FxHashMap::default(),
            arg_types: Vec::new(),
            string_args: 0,
            depth: 0,
            max_depth: 0,
            result: None,
            constants: ConstArena::new(),
            finalized: false,
        })
    }

    /// Append the code for `node`, returning the type it leaves on the stack.
    pub fn append(&mut self, node: &AstNode) -> Result<ValueType, CompileError> {
        if self.finalized {
            return Err(CompileError::Finalized);
        }
        let ty = self.emit(node)?;
        self.result = Some(ty);
        Ok(ty)
    }

    /// Seal the code. Calling this again has no effect.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        if self.returns_float() {
            if let Some(first) = self.code.first_mut() {
                first.tag |= FLOAT_RETURN_FLAG;
            }
        }
        self.finalized = true;
        debug!(
            records = self.code.len(),
            max_stack = self.max_stack_bytes(),
            args = self.arg_types.len(),
            "finalized"
        );
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn code(&self) -> &[Record] {
        &self.code
    }

    pub fn arg_map(&self) -> &FxHashMap<String, usize> {
        &self.arg_map
    }

    pub fn arg_types(&self) -> &[ValueType] {
        &self.arg_types
    }

    pub fn max_stack_bytes(&self) -> usize {
        self.max_depth * WORD_BYTES
    }

    pub fn string_arg_count(&self) -> usize {
        self.string_args
    }

    /// Whether the last appended expression yields a float.
    pub fn returns_float(&self) -> bool {
        self.result == Some(ValueType::Float)
    }

    /// Finalize and hand over everything the code generator needs.
    pub fn into_program(mut self) -> Program {
        self.finalize();
        Program {
            code: self.code,
            arg_map: self.arg_map,
            arg_types: self.arg_types,
            max_stack_bytes: self.max_depth * WORD_BYTES,
            returns_float: self.result == Some(ValueType::Float),
            constants: self.constants,
        }
    }

    fn emit(&mut self, node: &AstNode) -> Result<ValueType, CompileError> {
        ensure_sufficient_stack(|| match node.kind {
            TokenKind::Parenthesis => self.emit_form(node),
            TokenKind::Bool => {
                self.push_operand(Record::new(TokenKind::Bool, u64::from(node.value == "true")));
                Ok(ValueType::Bool)
            }
            TokenKind::Int => {
                let bits = parse_int_literal(&node.value).map_err(|err| match err {
                    IntLiteralError::Malformed => CompileError::InvalidInt(node.value.clone()),
                    IntLiteralError::OutOfRange => CompileError::IntOutOfRange(node.value.clone()),
                })?;
                self.push_operand(Record::new(TokenKind::Int, bits));
                Ok(ValueType::Int)
            }
            TokenKind::Float => {
                let bits = parse_float_literal(&node.value)
                    .ok_or_else(|| CompileError::InvalidFloat(node.value.clone()))?;
                self.push_operand(Record::new(TokenKind::Float, bits));
                Ok(ValueType::Float)
            }
            TokenKind::String => {
                if node.value.len() >= MAX_STRING_LEN {
                    return Err(CompileError::StringTooLarge(node.value.len()));
                }
                let address = self.constants.retain_str(&node.value);
                self.push_operand(Record::new(TokenKind::String, address));
                Ok(ValueType::String)
            }
            TokenKind::Symbol => self.emit_symbol(&node.value),
        })
    }

    fn emit_symbol(&mut self, name: &str) -> Result<ValueType, CompileError> {
        let ty = *self
            .symbols
            .get(name)
            .ok_or_else(|| CompileError::UndeclaredSymbol(name.to_owned()))?;
        let index = match self.arg_map.get(name) {
            Some(&index) => index,
            None => {
                let index = self.arg_types.len();
                self.arg_map.insert(name.to_owned(), index);
                self.arg_types.push(ty);
                if ty == ValueType::String {
                    self.string_args += 1;
                }
                trace!(name, index, %ty, "new parameter");
                index
            }
        };
        self.push_operand(Record::new(TokenKind::Symbol, index as u64));
        Ok(ty)
    }

    /// `(op c0 c1 ... cn)`: operands of the matched entry, then for a
    /// flattened binary form each remaining child followed by the operator.
    fn emit_form(&mut self, node: &AstNode) -> Result<ValueType, CompileError> {
        let argc = node.children.len();
        let entry: OperatorEntry = *self.registry.resolve(&node.value, argc).ok_or_else(|| {
            CompileError::UnknownOperator {
                name: node.value.clone(),
                arity: argc,
            }
        })?;

        let (leading, rest) = node.children.split_at(usize::from(entry.arity));
        let mut operands: SmallVec<[ValueType; 2]> = SmallVec::new();
        for child in leading {
            operands.push(self.emit(child)?);
        }
        let mut ty = self.push_operator(&entry, &operands);
        for child in rest {
            let rhs = self.emit(child)?;
            ty = self.push_operator(&entry, &[ty, rhs]);
        }
        Ok(ty)
    }

    fn push_operand(&mut self, record: Record) {
        self.code.push(record);
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn push_operator(&mut self, entry: &OperatorEntry, operands: &[ValueType]) -> ValueType {
        self.code.push(Record::operator(entry.opcode));
        // Pops `arity` values, pushes one. Arity is at least 1.
        self.depth = self.depth + 1 - usize::from(entry.arity);
        entry.result.result_type(operands)
    }
}

/// A finalized bytecode program.
#[derive(Debug)]
pub struct Program {
    pub code: Vec<Record>,
    /// Parameter name to argument slot.
    pub arg_map: FxHashMap<String, usize>,
    /// Declared type of each argument slot.
    pub arg_types: Vec<ValueType>,
    pub max_stack_bytes: usize,
    pub returns_float: bool,
    /// Storage for embedded string literals. Must outlive any code compiled
    /// from `code`.
    pub constants: ConstArena,
}

impl Program {
    /// `(tag, payload)` word pairs.
    pub fn words(&self) -> Vec<u64> {
        encode_words(&self.code)
    }

    /// Little-endian byte view, 16 bytes per record.
    pub fn bytes(&self) -> Vec<u8> {
        encode_bytes(&self.code)
    }

    /// One type tag byte per argument slot.
    pub fn arg_type_bytes(&self) -> Vec<u8> {
        self.arg_types.iter().map(|ty| ty.tag()).collect()
    }

    pub fn string_arg_count(&self) -> usize {
        self.arg_types
            .iter()
            .filter(|&&ty| ty == ValueType::String)
            .count()
    }

    /// Parameter names ordered by slot.
    pub fn arg_names(&self) -> Vec<&str> {
        let mut names: Vec<(&str, usize)> = self
            .arg_map
            .iter()
            .map(|(name, &index)| (name.as_str(), index))
            .collect();
        names.sort_unstable_by_key(|&(_, index)| index);
        names.into_iter().map(|(name, _)| name).collect()
    }
}

/// Compile `ast` against the declared symbols and an operator registry.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = ast.len(), symbols = symbols.len()))]
pub fn compile<S: BuildHasher>(
    ast: &AstNode,
    symbols: &HashMap<String, TokenKind, S>,
    registry: &OperatorRegistry,
) -> Result<Program, CompileError> {
    let mut builder = IrBuilder::new(symbols, registry)?;
    builder.append(ast)?;
    Ok(builder.into_program())
}

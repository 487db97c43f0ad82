//! Reference code generator.
//!
//! Bytecode is validated once at compile time: every opcode must resolve,
//! operand types are checked against the operator table and the stack
//! must balance to exactly one result. The checked program is boxed and
//! its address is the handle. Evaluation walks the lowered instructions
//! with a small value stack and never panics; a malformed argument buffer
//! yields 0.

mod primitive;

use std::sync::Arc;

use flint_ir::{
    decode_words, OperatorRegistry, StrDescriptor, TokenKind, ValueType, FLOAT_RETURN_FLAG,
    KIND_MASK,
};
use smallvec::SmallVec;
use tracing::debug;

use self::primitive::{Cell, Primitive};
use super::{CodeGenerator, NativeEntry, NativeHandle};

/// Interpreting backend over an operator registry.
#[derive(Debug, Default)]
pub struct Interpreter {
    registry: Option<Arc<OperatorRegistry>>,
}

impl Interpreter {
    /// Interpreter over the built-in operator table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpreter resolving opcodes through `registry`.
    pub fn with_registry(registry: Arc<OperatorRegistry>) -> Self {
        Interpreter {
            registry: Some(registry),
        }
    }

    fn registry(&self) -> &OperatorRegistry {
        match self.registry.as_deref() {
            Some(registry) => registry,
            None => OperatorRegistry::global(),
        }
    }
}

impl CodeGenerator for Interpreter {
    unsafe fn compile(&self, code: &[u64], arg_types: &[u8]) -> NativeHandle {
        let _span = tracing::debug_span!("interpreter_compile", words = code.len()).entered();
        match lower(self.registry(), code, arg_types) {
            Ok(script) => {
                let handle = Box::into_raw(Box::new(script)) as usize as u64;
                debug!(handle, "compiled");
                handle
            }
            Err(reason) => {
                debug!(reason, "rejected bytecode");
                0
            }
        }
    }

    unsafe fn free(&self, handle: NativeHandle) {
        if handle != 0 {
            drop(Box::from_raw(handle as usize as *mut Script));
        }
    }

    fn entry(&self) -> NativeEntry {
        interpreter_entry
    }

    fn is_native_backend_available(&self) -> bool {
        false
    }
}

unsafe extern "C" fn interpreter_entry(handle: NativeHandle, args: *const u64) -> u64 {
    if handle == 0 {
        return 0;
    }
    let script = &*(handle as usize as *const Script);
    script.run(args).unwrap_or(0)
}

#[derive(Clone, Copy, Debug)]
enum Instr {
    Const(Cell<'static>),
    /// Index into `Script::strings`.
    Text(usize),
    Arg { index: usize, ty: ValueType },
    Apply(Primitive),
}

#[derive(Debug)]
struct Script {
    code: Vec<Instr>,
    strings: Vec<Box<str>>,
    max_depth: usize,
    returns_float: bool,
}

/// Validate and lower bytecode.
///
/// # Safety
///
/// String payloads must point at live descriptors.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
unsafe fn lower(
    registry: &OperatorRegistry,
    code: &[u64],
    arg_types: &[u8],
) -> Result<Script, &'static str> {
    let records = decode_words(code).ok_or("odd word count")?;
    let first = records.first().ok_or("empty program")?;
    let returns_float = first.returns_float();
    let params = arg_types
        .iter()
        .map(|&tag| ValueType::from_tag(tag))
        .collect::<Option<Vec<_>>>()
        .ok_or("invalid argument type")?;

    let mut script = Script {
        code: Vec::with_capacity(records.len()),
        strings: Vec::new(),
        max_depth: 0,
        returns_float,
    };
    let mut types: SmallVec<[ValueType; 16]> = SmallVec::new();

    for (position, record) in records.iter().enumerate() {
        let tag = if position == 0 {
            record.tag & !FLOAT_RETURN_FLAG
        } else {
            record.tag
        };
        if tag > KIND_MASK {
            return Err("invalid record tag");
        }
        let kind = TokenKind::from_tag(tag as u8).ok_or("invalid record tag")?;
        let payload = record.payload;

        let (instr, ty) = match kind {
            TokenKind::Parenthesis => {
                let entry = registry.by_opcode(payload).ok_or("unknown opcode")?;
                let primitive = Primitive::from_native(entry.native).ok_or("unsupported primitive")?;
                let arity = usize::from(entry.arity);
                if primitive.arity() != arity {
                    return Err("arity mismatch");
                }
                let base = types.len().checked_sub(arity).ok_or("stack underflow")?;
                let operands = &types[base..];
                match entry.arg_hints {
                    Some(hints) if hints != operands => return Err("argument type mismatch"),
                    None if !primitive.accepts_strings()
                        && !operands.iter().all(|ty| ty.is_numeric()) =>
                    {
                        return Err("string operand")
                    }
                    _ => {}
                }
                let result = entry.result.result_type(operands);
                types.truncate(base);
                (Instr::Apply(primitive), result)
            }
            TokenKind::Bool => (Instr::Const(Cell::Bool(payload != 0)), ValueType::Bool),
            TokenKind::Int => (Instr::Const(Cell::Int(payload as i64)), ValueType::Int),
            TokenKind::Float => (
                Instr::Const(Cell::Float(f64::from_bits(payload))),
                ValueType::Float,
            ),
            TokenKind::String => {
                let text = read_str(payload).ok_or("invalid string constant")?;
                script.strings.push(Box::from(text));
                (Instr::Text(script.strings.len() - 1), ValueType::String)
            }
            TokenKind::Symbol => {
                let index = usize::try_from(payload).map_err(|_| "parameter out of range")?;
                let ty = *params.get(index).ok_or("parameter out of range")?;
                (Instr::Arg { index, ty }, ty)
            }
        };
        script.code.push(instr);
        types.push(ty);
        script.max_depth = script.max_depth.max(types.len());
    }

    match types.as_slice() {
        [ValueType::String] => Err("string result"),
        [_] => Ok(script),
        _ => Err("unbalanced stack"),
    }
}

/// Read the text behind a descriptor address.
///
/// # Safety
///
/// A nonzero `address` must point at a live `(pointer, length)` pair.
#[allow(clippy::cast_possible_truncation)]
unsafe fn read_str<'a>(address: u64) -> Option<&'a str> {
    if address == 0 {
        return None;
    }
    let descriptor = &*(address as usize as *const StrDescriptor);
    if descriptor.ptr == 0 {
        return (descriptor.len == 0).then_some("");
    }
    let len = usize::try_from(descriptor.len).ok()?;
    let bytes = std::slice::from_raw_parts(descriptor.ptr as usize as *const u8, len);
    std::str::from_utf8(bytes).ok()
}

impl Script {
    /// # Safety
    ///
    /// `args` must hold one word per parameter; string parameters must
    /// point at live `(pointer, length)` pairs.
    #[allow(clippy::cast_possible_wrap)]
    unsafe fn run(&self, args: *const u64) -> Option<u64> {
        let mut stack: SmallVec<[Cell<'_>; 16]> = SmallVec::with_capacity(self.max_depth);
        for instr in &self.code {
            let cell = match *instr {
                Instr::Const(cell) => cell,
                Instr::Text(index) => Cell::Str(self.strings.get(index)?),
                Instr::Arg { index, ty } => {
                    let word = *args.add(index);
                    match ty {
                        ValueType::Bool => Cell::Bool(word != 0),
                        ValueType::Int => Cell::Int(word as i64),
                        ValueType::Float => Cell::Float(f64::from_bits(word)),
                        ValueType::String => Cell::Str(read_str(word)?),
                    }
                }
                Instr::Apply(primitive) => {
                    let base = stack.len().checked_sub(primitive.arity())?;
                    let result = primitive.apply(&stack[base..])?;
                    stack.truncate(base);
                    result
                }
            };
            stack.push(cell);
        }
        stack.pop()?.into_word(self.returns_float)
    }
}

#[cfg(test)]
mod tests;

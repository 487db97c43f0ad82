//! Compiled, callable expressions.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

use flint_ir::{ConstArena, Program, ValueType};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::backend::{CodeGenerator, NativeHandle};
use crate::value::{lower, ReturnValue, Slot, Value};
use crate::{JitConfig, JitError};

/// A compiled expression.
///
/// Owns one code generator handle and the constant strings the compiled
/// code refers to. The handle is freed on [`release`](Self::release) or on
/// drop, always before the constants.
pub struct Function {
    handle: NativeHandle,
    generator: Arc<dyn CodeGenerator>,
    arg_map: FxHashMap<String, usize>,
    /// Parameter names by slot.
    arg_names: Vec<String>,
    arg_types: Vec<ValueType>,
    string_args: usize,
    max_stack: usize,
    /// Headroom requested from the trampoline for each call.
    required_stack: usize,
    returns_float: bool,
    constants: ConstArena,
}

impl Function {
    pub(crate) fn new(
        program: Program,
        generator: Arc<dyn CodeGenerator>,
        config: &JitConfig,
    ) -> Result<Self, JitError> {
        let words = program.words();
        let types = program.arg_type_bytes();
        // SAFETY: string records point into `program.constants`, which moves
        // into the returned function and outlives the handle. Moving the arena
        // does not move the boxed descriptors.
        let handle = unsafe { generator.compile(&words, &types) };
        if handle == 0 {
            return Err(JitError::Backend);
        }

        let mut required_stack = program.max_stack_bytes.saturating_add(config.frame_reserve);
        if !generator.is_native_backend_available() {
            required_stack = required_stack.saturating_add(config.interpreter_reserve);
        }
        let arg_names = program.arg_names().into_iter().map(str::to_owned).collect();
        let string_args = program.string_arg_count();
        debug!(
            handle,
            records = program.code.len(),
            max_stack = program.max_stack_bytes,
            "function created"
        );

        Ok(Function {
            handle,
            generator,
            arg_map: program.arg_map,
            arg_names,
            arg_types: program.arg_types,
            string_args,
            max_stack: program.max_stack_bytes,
            required_stack,
            returns_float: program.returns_float,
            constants: program.constants,
        })
    }

    /// Evaluate with named arguments.
    ///
    /// Every parameter the expression uses must be present; extra entries
    /// are ignored.
    pub fn call<S: BuildHasher>(
        &self,
        args: &HashMap<String, Value<'_>, S>,
    ) -> Result<ReturnValue, JitError> {
        self.ensure_live()?;

        let params = self.arg_types.len();
        let mut words: SmallVec<[u64; 16]> = SmallVec::from_elem(0, params + 2 * self.string_args);
        let mut pairs: SmallVec<[(usize, &str); 4]> = SmallVec::new();

        for (index, (name, &ty)) in self.arg_names.iter().zip(&self.arg_types).enumerate() {
            let value = *args
                .get(name)
                .ok_or_else(|| JitError::MissingParameter(name.clone()))?;
            match lower(name, value, ty)? {
                Slot::Word(word) => words[index] = word,
                Slot::Str(text) => pairs.push((index, text)),
            }
        }

        for (pair, &(index, text)) in pairs.iter().enumerate() {
            let base = params + 2 * pair;
            words[base] = text.as_ptr() as u64;
            words[base + 1] = text.len() as u64;
            words[index] = std::ptr::addr_of!(words[base]) as u64;
        }

        // SAFETY: the handle is live and `words` follows the argument layout
        // the generator expects, with string pairs borrowed from `args`.
        let result = unsafe { self.invoke(words.as_ptr()) };
        Ok(self.wrap(result))
    }

    /// Evaluate with a prepared argument buffer.
    ///
    /// # Safety
    ///
    /// `args` must hold one word per parameter in slot order. Each string
    /// slot must hold the address of a `(pointer, length)` pair describing
    /// valid UTF-8 that stays alive for the call.
    pub unsafe fn call_raw(&self, args: &[u64]) -> Result<ReturnValue, JitError> {
        self.ensure_live()?;
        if args.len() < self.arg_types.len() {
            return Err(JitError::NotEnoughArguments {
                expected: self.arg_types.len(),
                got: args.len(),
            });
        }
        Ok(self.wrap(self.invoke(args.as_ptr())))
    }

    /// Free the handle. Later calls fail with [`JitError::Released`].
    pub fn release(&mut self) {
        if self.handle == 0 {
            return;
        }
        // SAFETY: the handle came from this generator and is freed once.
        unsafe { self.generator.free(self.handle) };
        debug!(handle = self.handle, "function released");
        self.handle = 0;
    }

    pub fn is_released(&self) -> bool {
        self.handle == 0
    }

    /// Whether the result is a float.
    pub fn returns_float(&self) -> bool {
        self.returns_float
    }

    /// Parameter names in slot order.
    pub fn argument_names(&self) -> impl Iterator<Item = &str> {
        self.arg_names.iter().map(String::as_str)
    }

    /// Slot of a parameter.
    pub fn argument_index(&self, name: &str) -> Option<usize> {
        self.arg_map.get(name).copied()
    }

    pub fn argument_types(&self) -> &[ValueType] {
        &self.arg_types
    }

    /// Peak evaluation stack size in bytes.
    pub fn max_stack_bytes(&self) -> usize {
        self.max_stack
    }

    /// Embedded string constants.
    pub fn constants(&self) -> impl Iterator<Item = &str> {
        self.constants.texts()
    }

    fn ensure_live(&self) -> Result<(), JitError> {
        if self.handle == 0 {
            Err(JitError::Released)
        } else {
            Ok(())
        }
    }

    unsafe fn invoke(&self, args: *const u64) -> u64 {
        crate::trampoline::call(self.generator.entry(), self.handle, args, self.required_stack)
    }

    fn wrap(&self, word: u64) -> ReturnValue {
        if self.returns_float {
            ReturnValue::Float(f64::from_bits(word))
        } else {
            ReturnValue::Word(word)
        }
    }
}

impl Drop for Function {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("handle", &self.handle)
            .field("arguments", &self.arg_names)
            .field("argument_types", &self.arg_types)
            .field("max_stack", &self.max_stack)
            .field("returns_float", &self.returns_float)
            .finish_non_exhaustive()
    }
}

//! Code generator interface.
//!
//! A code generator turns finalized bytecode into something callable and
//! hands back an opaque, nonzero handle. Every handle is invoked through
//! the same C-ABI entry point:
//!
//! ```text
//! entry(handle, args) -> u64
//! ```
//!
//! `args` points at one word per parameter, followed by two words
//! `(pointer, length)` for each string parameter. A string parameter's own
//! word is the address of its pair. The result is the raw return word; a
//! float result is returned as its IEEE-754 bits.

mod interpreter;

pub use interpreter::Interpreter;

/// Opaque compiled-code handle. Zero is never a valid handle.
pub type NativeHandle = u64;

/// Shared entry point for every handle a generator produces.
pub type NativeEntry = unsafe extern "C" fn(handle: NativeHandle, args: *const u64) -> u64;

/// A backend that compiles Flint bytecode.
pub trait CodeGenerator: Send + Sync {
    /// Compile `code` (`(tag, payload)` word pairs) for parameters of the
    /// given type tags. Returns 0 on failure.
    ///
    /// # Safety
    ///
    /// Every string record's payload must be the address of a live
    /// `StrDescriptor` whose text stays valid until the returned handle is
    /// freed.
    unsafe fn compile(&self, code: &[u64], arg_types: &[u8]) -> NativeHandle;

    /// Release a handle.
    ///
    /// # Safety
    ///
    /// `handle` must come from this generator's [`compile`](Self::compile)
    /// and must not have been freed already.
    unsafe fn free(&self, handle: NativeHandle);

    /// The entry point all handles are called through.
    fn entry(&self) -> NativeEntry;

    /// Whether handles run as native machine code.
    ///
    /// Non-native backends execute on the caller's stack and get extra
    /// headroom for their own frames.
    fn is_native_backend_available(&self) -> bool;
}

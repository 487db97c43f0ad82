//! Stack safety utilities for the expression pipeline.
//!
//! Two concerns live here:
//!
//! - Deep recursion in the IR compiler and the AST printer. Wrap recursive
//!   calls in [`ensure_sufficient_stack`] and the stack is grown on demand.
//! - Headroom before a call into generated code. [`ensure_headroom`] checks
//!   that at least `required` bytes remain below the current stack pointer
//!   and, if not, moves execution onto a freshly allocated segment before
//!   running the call. The calling thread is never pinned or replaced; the
//!   new segment lives on the same OS thread.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker` tracks the thread's stack limit and
//!   allocates new segments.
//! - **WASM targets**: No-op passthrough (WASM has its own stack management).
//!
//! # Configuration
//!
//! - **Red zone**: 100KB - If less than this remains, we grow the stack
//! - **Growth size**: 1MB - Each growth allocates at least this much

/// Minimum stack space to keep available (100KB red zone).
///
/// If less than this amount remains, we'll grow the stack.
pub const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
pub const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, this will
/// allocate additional stack space before calling `f`.
///
/// # Example
///
/// ```text
/// fn append(&mut self, node: &AstNode) -> Result<(), CompileError> {
///     ensure_sufficient_stack(|| {
///         for child in node.children() {
///             self.append(child)?;
///         }
///         self.push_operator(node)
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Bytes of stack left below the current stack pointer, if known.
///
/// `None` means the thread's stack limit could not be determined.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

/// WASM version - the limit is never known.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}

/// Run `f` with at least `required` bytes of stack below the stack pointer.
///
/// The current stack pointer minus `required` (plus the red zone, which
/// covers the frames between here and the callee) is compared against the
/// thread's recorded stack limit. When the projection would cross the limit,
/// a new segment large enough for the request is allocated and the check is
/// repeated on that segment before `f` runs. `f` never starts on a stack
/// that failed the check.
///
/// When the limit is unknown the request is served from a fresh segment
/// unconditionally, which is the conservative choice.
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_headroom<R>(required: usize, f: impl FnOnce() -> R) -> R {
    let needed = required.saturating_add(RED_ZONE);
    let segment = needed.saturating_add(STACK_PER_RECURSION);
    match stacker::remaining_stack() {
        Some(remaining) if remaining >= needed => f(),
        Some(remaining) => {
            tracing::trace!(required, remaining, segment, "growing stack before call");
            stacker::grow(segment, || ensure_headroom(required, f))
        }
        None => {
            tracing::trace!(required, segment, "stack limit unknown, using fresh segment");
            stacker::grow(segment, f)
        }
    }
}

/// WASM version - there is no growable stack, so the reservation made for
/// the whole module has to cover the worst case.
#[cfg(target_arch = "wasm32")]
pub fn ensure_headroom<R>(_required: usize, f: impl FnOnce() -> R) -> R {
    f()
}

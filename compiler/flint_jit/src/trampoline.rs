//! Call into compiled code with guaranteed stack headroom.
//!
//! Generated code does not probe the stack, so the caller has to make sure
//! the current segment can hold the callee's evaluation stack before the
//! call. [`call`] checks the remaining space and, when it is short, runs
//! the call on a freshly grown segment of the same thread.

use crate::backend::{NativeEntry, NativeHandle};

/// Invoke `entry(handle, args)` with at least `required` bytes of stack.
///
/// # Safety
///
/// `handle` must be live for the generator owning `entry` and `args` must
/// satisfy that generator's argument layout.
pub(crate) unsafe fn call(
    entry: NativeEntry,
    handle: NativeHandle,
    args: *const u64,
    required: usize,
) -> u64 {
    flint_stack::ensure_headroom(required, || unsafe { invoke(entry, handle, args) })
}

/// System V call with an explicitly aligned stack pointer.
///
/// `r12` is callee-saved, so it survives the call and restores `rsp`.
#[cfg(all(target_arch = "x86_64", not(windows)))]
#[inline(never)]
unsafe fn invoke(entry: NativeEntry, handle: NativeHandle, args: *const u64) -> u64 {
    let result: u64;
    std::arch::asm!(
        "mov r12, rsp",
        "and rsp, -16",
        "call {entry}",
        "mov rsp, r12",
        entry = in(reg) entry as usize,
        in("rdi") handle,
        in("rsi") args as usize,
        out("r12") _,
        lateout("rax") result,
        clobber_abi("C"),
    );
    result
}

#[cfg(not(all(target_arch = "x86_64", not(windows))))]
#[inline(never)]
unsafe fn invoke(entry: NativeEntry, handle: NativeHandle, args: *const u64) -> u64 {
    entry(handle, args)
}

#[cfg(test)]
mod tests;

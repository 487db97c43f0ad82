use pretty_assertions::assert_eq;

use super::*;

unsafe extern "C" fn sum_args(handle: NativeHandle, args: *const u64) -> u64 {
    let count = usize::try_from(handle).unwrap_or(0);
    (0..count).map(|i| *args.add(i)).sum()
}

unsafe extern "C" fn aligned(_handle: NativeHandle, _args: *const u64) -> u64 {
    let marker = 0u128;
    u64::from(std::ptr::addr_of!(marker) as usize % std::mem::align_of::<u128>() == 0)
}

#[test]
fn passes_handle_and_arguments() {
    let args = [1u64, 2, 39];
    let result = unsafe { call(sum_args, 3, args.as_ptr(), 0) };
    assert_eq!(result, 42);
}

#[test]
fn callee_sees_aligned_stack() {
    let result = unsafe { call(aligned, 0, std::ptr::null(), 0) };
    assert_eq!(result, 1);
}

#[test]
fn large_headroom_request_is_served() {
    let args = [u64::MAX, 1];
    let result = unsafe { call(sum_args, 1, args.as_ptr(), 8 * 1024 * 1024) };
    assert_eq!(result, u64::MAX);
}

#[test]
fn works_from_deep_recursion() {
    fn recurse(depth: usize) -> u64 {
        if depth == 0 {
            let args = [7u64];
            return unsafe { call(sum_args, 1, args.as_ptr(), 256 * 1024) };
        }
        let pad = [depth as u8; 256];
        std::hint::black_box(&pad);
        flint_stack::ensure_sufficient_stack(|| recurse(depth - 1))
    }
    assert_eq!(recurse(2_000), 7);
}

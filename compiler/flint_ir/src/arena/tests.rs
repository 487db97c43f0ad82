use super::*;

#[test]
fn descriptor_points_at_retained_copy() {
    let mut arena = ConstArena::new();
    let source = String::from("Hello");
    let address = arena.retain_str(&source);
    drop(source);

    assert!(arena.owns_descriptor(address));
    let text = arena.texts().next().unwrap();
    let descriptor = StrDescriptor::of(text);
    assert_eq!(descriptor.len, 5);
    assert_eq!(text, "Hello");
}

#[test]
fn addresses_survive_growth() {
    let mut arena = ConstArena::new();
    let first = arena.retain_str("first");
    let first_text = arena.texts().next().unwrap().as_ptr() as u64;
    for i in 0..1000 {
        arena.retain_str(&i.to_string());
    }
    assert!(arena.owns_descriptor(first));
    assert_eq!(arena.texts().next().unwrap().as_ptr() as u64, first_text);
    assert_eq!(arena.len(), 1001);
}

#[test]
fn empty_arena() {
    let arena = ConstArena::new();
    assert!(arena.is_empty());
    assert!(!arena.owns_descriptor(0));
}

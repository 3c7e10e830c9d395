//! Unit tests for the environment guards.

use super::*;

fn value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn reset(key: &str) {
    // SAFETY: serialised by `with_lock`.
    with_lock(|| unsafe { env_remove_var(key) });
}

#[test]
fn set_var_restores_the_previous_value() {
    let key = "STRATUM_HELPERS_SET";
    let outer = set_var(key, "orig");
    {
        let _inner = set_var(key, "temp");
        assert_eq!(value(key).as_deref(), Some("temp"));
    }
    assert_eq!(value(key).as_deref(), Some("orig"));
    drop(outer);
    assert_eq!(value(key), None);
}

#[test]
fn remove_var_restores_the_value() {
    let key = "STRATUM_HELPERS_REMOVE";
    let _outer = set_var(key, "keep");
    {
        let _inner = remove_var(key);
        assert_eq!(value(key), None);
    }
    assert_eq!(value(key).as_deref(), Some("keep"));
}

#[test]
fn scope_restores_every_guard() {
    let (first, second) = ("STRATUM_HELPERS_SCOPE_A", "STRATUM_HELPERS_SCOPE_B");
    reset(first);
    reset(second);
    {
        let _scope = EnvScope::new_with(|lock| vec![lock.set_var(first, "1"), lock.set_var(second, "2")]);
        assert_eq!(value(first).as_deref(), Some("1"));
        assert_eq!(value(second).as_deref(), Some("2"));
    }
    assert_eq!(value(first), None);
    assert_eq!(value(second), None);
}

#[test]
fn guards_are_safe_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let key = format!("STRATUM_HELPERS_THREAD_{i}");
                for round in 0..8 {
                    let guard = set_var(&key, format!("{round}"));
                    assert_eq!(value(&key), Some(format!("{round}")));
                    drop(guard);
                    assert_eq!(value(&key), None);
                }
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().is_ok(), "worker panicked");
    }
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn value_returns_on_drop() {
    let pool: Pool<Vec<u8>> = Pool::new(4);
    {
        let mut buf = pool.take(|_| true, || Vec::with_capacity(8));
        buf.push(1);
        assert_eq!(pool.idle(), 0);
    }
    assert_eq!(pool.idle(), 1);

    let buf = pool.take(|_| true, Vec::new);
    assert_eq!(buf.as_slice(), &[1]);
}

#[test]
fn rejected_values_are_dropped() {
    let pool: Pool<Vec<u8>> = Pool::new(4);
    drop(pool.take(|_| true, || vec![0; 4]));
    let buf = pool.take(|v| v.len() == 8, || vec![0; 8]);
    assert_eq!(buf.len(), 8);
    assert_eq!(pool.idle(), 0);
}

#[test]
fn retention_is_bounded() {
    let pool: Pool<u32> = Pool::new(1);
    let a = pool.take(|_| true, || 1);
    let b = pool.take(|_| true, || 2);
    drop(a);
    drop(b);
    assert_eq!(pool.idle(), 1);
}

#[test]
fn detach_keeps_value() {
    let pool: Pool<u32> = Pool::new(4);
    let value = pool.take(|_| true, || 7).detach();
    assert_eq!(value, Some(7));
    assert_eq!(pool.idle(), 0);
}

#[test]
fn static_pool_is_shareable() {
    static POOL: Pool<String> = Pool::new(2);
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let mut text = POOL.take(|_| true, String::new);
                text.clear();
                text.push('x');
            });
        }
    });
    assert!(POOL.idle() <= 2);
}

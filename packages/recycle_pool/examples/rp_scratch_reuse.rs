//! Example demonstrating scratch array reuse with `RecyclePool`.
//!
//! A hot function that needs temporary workspace on every call acquires it from a
//! thread-local pool instead of allocating, so steady-state calls allocate nothing.

use recycle_pool::RecyclePool;

thread_local! {
    static SCRATCH: RecyclePool<u8> = const { RecyclePool::new() };
}

/// Reverses `input` using pooled scratch space.
fn reversed(input: &[u8]) -> Vec<u8> {
    SCRATCH.with(|pool| {
        let mut scratch = pool.acquire(input.len());

        for (slot, byte) in scratch.iter_mut().zip(input.iter().rev()) {
            *slot = *byte;
        }

        let result = scratch[..input.len()].to_vec();
        _ = pool.release(scratch);
        result
    })
}

fn main() {
    println!("=== RecyclePool: thread-local scratch reuse ===");

    let first = reversed(b"hello");
    println!("reversed: {}", String::from_utf8_lossy(&first));

    // The second call reuses the array the first call released.
    let second = reversed(b"world");
    println!("reversed: {}", String::from_utf8_lossy(&second));

    SCRATCH.with(|pool| {
        println!("retained scratch length: {:?}", pool.retained_len());
    });
}

//! Example combining `SegmentChain` with `recycle_pool`: a miniature append-only
//! text builder that acquires its segments from a thread-confined pool and freezes
//! them into an immutable chain when they fill up.
//!
//! Appending never copies previously written data; reading pays the linear cost
//! once, at materialization time.

use std::sync::Arc;

use recycle_pool::RecyclePool;
use segment_chain::SegmentChain;

const SEGMENT_CAPACITY: usize = 16;

struct MiniBuilder {
    pool: RecyclePool<char>,
    history: Option<Arc<SegmentChain<char>>>,
    live: Box<[char]>,
    live_used: usize,
}

impl MiniBuilder {
    fn new() -> Self {
        let pool = RecyclePool::new();
        let live = pool.acquire(SEGMENT_CAPACITY).into_inner();

        Self {
            pool,
            history: None,
            live,
            live_used: 0,
        }
    }

    fn push(&mut self, ch: char) {
        if self.live_used == self.live.len() {
            self.freeze_live();
        }

        self.live[self.live_used] = ch;
        self.live_used += 1;
    }

    fn push_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.push(ch);
        }
    }

    /// Hands the full live segment over to the chain and starts a fresh one.
    fn freeze_live(&mut self) {
        let replacement = self.pool.acquire(SEGMENT_CAPACITY).into_inner();
        let full = std::mem::replace(&mut self.live, replacement);

        self.history = Some(
            SegmentChain::freeze(full, self.live_used, self.history.take())
                .expect("a full live segment is always a valid freeze"),
        );
        self.live_used = 0;
    }

    fn contents(&self) -> String {
        let live = &self.live[..self.live_used];

        match &self.history {
            Some(chain) => chain.materialize(live).into_iter().collect(),
            None => live.iter().collect(),
        }
    }
}

fn main() {
    println!("=== SegmentChain + RecyclePool: miniature builder ===");

    let mut builder = MiniBuilder::new();

    builder.push_str("The quick brown fox ");
    builder.push_str("jumps over the lazy dog, ");
    builder.push_str("then does it again.");

    if let Some(chain) = &builder.history {
        println!("frozen segments: {}", chain.segment_count());
        println!("frozen length:   {}", chain.total_len());
    }
    println!("live length:     {}", builder.live_used);
    println!("contents:        {}", builder.contents());
}

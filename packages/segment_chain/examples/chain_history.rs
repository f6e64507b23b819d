//! Example demonstrating basic `SegmentChain` usage: freezing full segments and
//! reading the logical buffer back in append order.

use segment_chain::SegmentChain;

fn main() {
    println!("=== SegmentChain: immutable append history ===");

    // A builder filled its first segment with "AB" and froze it.
    let chain = SegmentChain::freeze(vec!['A', 'B'].into_boxed_slice(), 2, None)
        .expect("non-empty buffer with valid used length");

    // The next segment had spare capacity when it was frozen; only the used
    // prefix counts.
    let chain = SegmentChain::freeze(vec!['C', 'D', '?', '?'].into_boxed_slice(), 2, Some(chain))
        .expect("non-empty buffer with valid used length");

    println!("frozen segments: {}", chain.segment_count());
    println!("frozen length:   {}", chain.total_len());

    for (index, segment) in chain.segments().enumerate() {
        println!("segment {index}: {segment:?}");
    }

    // The live segment is still owned by the builder; reads append it last.
    let live = ['E', 'F'];
    let logical: String = chain.materialize(&live).into_iter().collect();
    println!("logical buffer:  {logical}");

    assert_eq!(logical, "ABCDEF");
}

//! Invariant checks shared by the integration tests.

#![allow(dead_code)]

use arenasim_core::{Block, BlockState, Strategy, Word};

/// Asserts that the blocks cover every address exactly once.
pub fn assert_partition<W: Word, S: Strategy<W> + ?Sized>(strategy: &S) {
    let capacity = strategy.capacity().to_usize();
    let overhead = strategy.overhead();
    let mut owner: Vec<Option<usize>> = vec![None; capacity];

    for (index, block) in strategy.blocks().iter().enumerate() {
        let start = block.address.to_usize();
        let end = block.end(overhead).to_usize();
        assert!(end <= capacity, "block {block:?} runs past the arena");

        for slot in &mut owner[start..end] {
            assert_eq!(*slot, None, "block {block:?} overlaps block {slot:?}");
            *slot = Some(index);
        }
    }

    let gaps: Vec<_> = owner
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.is_none())
        .map(|(address, _)| address)
        .collect();
    assert!(gaps.is_empty(), "addresses owned by no block: {gaps:?}");
}

/// Asserts that no two free blocks sit next to each other.
pub fn assert_no_adjacent_free<W: Word, S: Strategy<W> + ?Sized>(strategy: &S) {
    let blocks = strategy.blocks();
    for pair in blocks.windows(2) {
        assert!(
            !(pair[0].state.is_free() && pair[1].state.is_free()),
            "adjacent free blocks {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// The arena right after `init`.
pub fn pristine<W: Word, S: Strategy<W> + ?Sized>(strategy: &S) -> Vec<Block<W>> {
    let capacity = strategy.capacity();
    vec![Block::new(
        W::ZERO,
        capacity - strategy.overhead(),
        BlockState::Free,
    )]
}

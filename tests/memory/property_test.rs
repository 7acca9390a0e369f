/*!
 * Partition Property Tests
 * Structural invariants under random operation sequences
 */

use memsim::memory::{BlockHandle, MemoryManager, MemoryInfo, Strategy as Placement};
use proptest::prelude::*;

const CAPACITY: usize = 500;

#[derive(Debug, Clone)]
enum Op {
    Alloc(usize),
    Free(usize),
    Coalesce,
    Compact,
}

fn placement() -> impl Strategy<Value = Placement> {
    prop_oneof![
        Just(Placement::FirstFit),
        Just(Placement::NextFit),
        Just(Placement::BestFit),
        Just(Placement::WorstFit),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1usize..=120).prop_map(Op::Alloc),
        3 => any::<usize>().prop_map(Op::Free),
        1 => Just(Op::Coalesce),
        1 => Just(Op::Compact),
    ]
}

proptest! {
    #[test]
    fn prop_partition_tiles_capacity(
        strategy in placement(),
        ops in prop::collection::vec(op(), 1..80)
    ) {
        let mut mm = MemoryManager::new(CAPACITY, strategy).unwrap();
        let mut live: Vec<(BlockHandle, usize)> = Vec::new();

        for op in ops {
            match op {
                Op::Alloc(size) => {
                    if let Ok(handle) = mm.allocate(size, live.len() as u32) {
                        live.push((handle, size));
                    }
                }
                Op::Free(pick) => {
                    if !live.is_empty() {
                        let (handle, _) = live.swap_remove(pick % live.len());
                        prop_assert!(mm.free(handle).is_ok());
                    }
                }
                Op::Coalesce => {
                    mm.coalesce();
                    prop_assert!(mm.is_coalesced());
                }
                Op::Compact => {
                    let allocated = mm.stats().allocated;
                    mm.compact();
                    prop_assert!(mm.is_coalesced());
                    prop_assert_eq!(mm.stats().allocated, allocated);
                    let layout = mm.layout();
                    let first_free = layout
                        .iter()
                        .position(|b| b.is_free())
                        .unwrap_or(layout.len());
                    prop_assert!(first_free + 1 >= layout.len());
                }
            }

            prop_assert!(mm.check_invariants().is_ok());
            let held: usize = live.iter().map(|(_, size)| size).sum();
            prop_assert_eq!(mm.stats().allocated, held);

            // Every live handle still resolves to a block of its size
            for (handle, size) in &live {
                let extent = mm.extent_of(*handle);
                prop_assert!(extent.is_some());
                prop_assert_eq!(extent.map(|e| e.span()), Some(*size));
            }
        }
    }

    #[test]
    fn prop_defrag_passes_are_idempotent(
        strategy in placement(),
        ops in prop::collection::vec(op(), 1..40)
    ) {
        let mut mm = MemoryManager::new(CAPACITY, strategy).unwrap();
        let mut live: Vec<BlockHandle> = Vec::new();
        for op in ops {
            match op {
                Op::Alloc(size) => {
                    if let Ok(handle) = mm.allocate(size, 1) {
                        live.push(handle);
                    }
                }
                Op::Free(pick) if !live.is_empty() => {
                    let handle = live.swap_remove(pick % live.len());
                    mm.free(handle).unwrap();
                }
                _ => {}
            }
        }

        mm.coalesce();
        let once = mm.layout();
        mm.coalesce();
        prop_assert_eq!(mm.layout(), once);

        mm.compact();
        let once = mm.layout();
        mm.compact();
        prop_assert_eq!(mm.layout(), once);
        prop_assert_eq!(mm.compact_count(), 2);
    }
}

/*!
 * Partition Tests
 * Splitting, coalescing and compaction through the public allocator API
 */

use memsim::memory::{BlockIds, MemoryBlock, Owner};
use memsim::{BlockExtent, MemoryManager, MemoryInfo, Strategy};
use pretty_assertions::assert_eq;

/// (size, owner) pairs in address order
fn shape(mm: &MemoryManager) -> Vec<(usize, Option<u32>)> {
    mm.layout().iter().map(|b| (b.size, b.owner)).collect()
}

/// [p1 20][free 30][p3 20][free 30]
fn fragmented() -> MemoryManager {
    let mut mm = MemoryManager::new(100, Strategy::FirstFit).unwrap();
    mm.allocate(20, 1).unwrap();
    let hole = mm.allocate(30, 2).unwrap();
    mm.allocate(20, 3).unwrap();
    mm.free(hole).unwrap();
    mm
}

#[test]
fn test_split_sums_to_original() {
    let mut ids = BlockIds::new();
    let block = MemoryBlock::new(ids.next_id(), 80);

    let (owned, rest) = block.split(30, 5, &mut ids).unwrap();
    let rest = rest.unwrap();
    assert_eq!(owned.size() + rest.size(), 80);
    assert_eq!(owned.owner(), Owner::Process(5));
    assert_eq!(rest.owner(), Owner::Free);

    let (whole, none) = block.split(80, 5, &mut ids).unwrap();
    assert_eq!(whole.size(), 80);
    assert!(none.is_none());
}

#[test]
fn test_compaction_scenario() {
    let mut mm = fragmented();
    assert_eq!(
        shape(&mm),
        vec![(20, Some(1)), (30, None), (20, Some(3)), (30, None)]
    );

    mm.compact();

    assert_eq!(shape(&mm), vec![(20, Some(1)), (20, Some(3)), (60, None)]);
    let extents: Vec<BlockExtent> = mm.layout().iter().map(|b| b.extent).collect();
    assert_eq!(
        extents,
        vec![
            BlockExtent { start: 0, end: 19 },
            BlockExtent { start: 20, end: 39 },
            BlockExtent { start: 40, end: 99 },
        ]
    );
    assert_eq!(mm.compact_count(), 1);
}

#[test]
fn test_compact_is_idempotent() {
    let mut mm = fragmented();
    let allocated = mm.stats().allocated;

    mm.compact();
    let once = mm.layout();
    mm.compact();

    assert_eq!(mm.layout(), once);
    assert_eq!(mm.stats().allocated, allocated);
    assert_eq!(mm.compact_count(), 2);
}

#[test]
fn test_coalesce_is_idempotent() {
    let mut mm = MemoryManager::new(100, Strategy::BestFit).unwrap();
    let a = mm.allocate(10, 1).unwrap();
    let b = mm.allocate(10, 2).unwrap();
    mm.allocate(10, 3).unwrap();
    let d = mm.allocate(10, 4).unwrap();
    mm.free(a).unwrap();
    mm.free(b).unwrap();
    mm.free(d).unwrap();

    mm.coalesce();
    let once = mm.layout();
    mm.coalesce();

    assert_eq!(mm.layout(), once);
    assert_eq!(shape(&mm), vec![(20, None), (10, Some(3)), (70, None)]);
    assert!(mm.is_coalesced());
}

#[test]
fn test_handles_survive_compaction() {
    let mut mm = MemoryManager::new(100, Strategy::FirstFit).unwrap();
    let a = mm.allocate(25, 1).unwrap();
    let b = mm.allocate(25, 2).unwrap();
    mm.free(a).unwrap();

    mm.compact();

    assert_eq!(mm.extent_of(b), Some(BlockExtent { start: 0, end: 24 }));
    assert_eq!(mm.owner_of(b), Some(2));
    assert_eq!(mm.owner_of(a), None);
}

#[test]
fn test_free_capacity_counts_every_hole() {
    let mm = fragmented();
    let stats = mm.stats();
    assert_eq!(stats.free, 60);
    assert_eq!(stats.largest_free, 30);
    assert_eq!(stats.free_blocks, 2);
    assert!((stats.fragmentation() - 0.5).abs() < f64::EPSILON);
}

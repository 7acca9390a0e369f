/*!
 * Scheduler Scenario Tests
 * Admission, rejection and the coalesce/compact fallback end to end
 */

use memsim::{
    BlockExtent, BlockInfo, CapacityExceeded, DefragKind, MemoryInfo, MemoryManager, ProcessSpec,
    Quantum, Scheduler, Strategy,
};
use pretty_assertions::assert_eq;

fn layout(blocks: &[BlockInfo]) -> Vec<(usize, Option<u32>)> {
    blocks.iter().map(|b| (b.size, b.owner)).collect()
}

fn setup(capacity: usize, specs: &[(u32, usize, u64, u64)]) -> (MemoryManager, Scheduler) {
    let mm = MemoryManager::new(capacity, Strategy::FirstFit).unwrap();
    let specs = specs
        .iter()
        .map(|&(id, memory, arrival, run)| ProcessSpec::new(id, memory, arrival, run));
    let sched = Scheduler::new(Quantum::default(), specs).unwrap();
    (mm, sched)
}

fn extent_of_pid(mm: &MemoryManager, sched: &Scheduler, pid: u32) -> Option<BlockExtent> {
    sched
        .active()
        .iter()
        .find(|p| p.id() == pid)
        .and_then(|p| p.lease())
        .and_then(|h| mm.extent_of(h))
}

#[test]
fn test_two_arrivals_admitted_together() {
    let (mut mm, mut sched) = setup(100, &[(0, 40, 0, 20), (1, 30, 0, 20)]);

    let report = sched.step_once(&mut mm).unwrap();

    assert_eq!(report.admitted, vec![0, 1]);
    assert_eq!(extent_of_pid(&mm, &sched, 0), Some(BlockExtent { start: 0, end: 39 }));
    assert_eq!(extent_of_pid(&mm, &sched, 1), Some(BlockExtent { start: 40, end: 69 }));
    assert_eq!(mm.free_capacity(), 30);
}

#[test]
fn test_oversized_process_rejected_permanently() {
    let (mut mm, mut sched) = setup(50, &[(0, 60, 0, 20)]);

    let report = sched.step_once(&mut mm).unwrap();

    assert_eq!(
        report.rejected,
        vec![CapacityExceeded {
            pid: 0,
            demand: 60,
            capacity: 50
        }]
    );
    assert!(sched.active().is_empty());
    assert!(sched.pending().is_empty());
    assert!(sched.is_complete());
    assert_eq!(report.executed, None);
}

#[test]
fn test_adjacent_holes_coalesced_for_admission() {
    let (mut mm, mut sched) = setup(100, &[(0, 50, 0, 10), (1, 50, 0, 10), (2, 80, 0, 10)]);

    // t=0: 0 and 1 admitted, 2 waits on free capacity; 1 runs and completes
    let first = sched.step_once(&mut mm).unwrap();
    assert_eq!(first.admitted, vec![0, 1]);
    assert_eq!(first.completed, Some(1));

    // t=10: 0 completes, leaving two adjacent 50-unit holes
    let second = sched.step_once(&mut mm).unwrap();
    assert_eq!(second.admitted, Vec::<u32>::new());
    assert_eq!(second.completed, Some(0));
    assert_eq!(mm.blocks().len(), 2);
    assert!(mm.blocks().iter().all(|b| b.is_free()));

    // t=20: 2 only fits after the holes are merged
    let third = sched.step_once(&mut mm).unwrap();
    assert_eq!(third.admitted, vec![2]);
    assert_eq!(third.coalesced(), 1);
    assert_eq!(third.compacted(), 0);
    assert_eq!(mm.coalesce_count(), 1);
}

#[test]
fn test_scattered_holes_compacted_for_admission() {
    let (mut mm, mut sched) = setup(
        100,
        &[
            (0, 20, 0, 100),
            (1, 30, 0, 10),
            (2, 20, 0, 100),
            (3, 30, 0, 10),
            (4, 60, 20, 10),
        ],
    );

    sched.step_once(&mut mm).unwrap();
    sched.step_once(&mut mm).unwrap();
    assert_eq!(sched.completed(), &[1, 3]);

    let report = sched.step_once(&mut mm).unwrap();
    assert_eq!(report.admitted, vec![4]);
    assert_eq!(report.compacted(), 1);
    assert_eq!(mm.compact_count(), 1);

    // Coalescing cannot help (no holes touch), so compaction follows it
    let kinds: Vec<DefragKind> = report.defrag.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![DefragKind::Coalesce, DefragKind::Compact]);
    let compact = &report.defrag[1];
    assert_eq!((compact.pid, compact.demand), (4, 60));
    assert_eq!(
        layout(&compact.before),
        vec![(20, Some(0)), (30, None), (20, Some(2)), (30, None)]
    );
    assert_eq!(layout(&compact.after), vec![(20, Some(0)), (20, Some(2)), (60, None)]);
    assert_eq!(extent_of_pid(&mm, &sched, 0), Some(BlockExtent { start: 0, end: 19 }));
    assert_eq!(extent_of_pid(&mm, &sched, 2), Some(BlockExtent { start: 20, end: 39 }));
    assert_eq!(extent_of_pid(&mm, &sched, 4), Some(BlockExtent { start: 40, end: 99 }));
}

#[test]
fn test_waiting_process_admitted_once_memory_frees() {
    let (mut mm, mut sched) = setup(100, &[(0, 70, 0, 20), (1, 50, 0, 10)]);

    let reports = sched.run(&mut mm, 10).unwrap();

    let admitted: Vec<(u64, u32)> = reports
        .iter()
        .flat_map(|r| r.admitted.iter().map(move |pid| (r.time, *pid)))
        .collect();
    assert_eq!(admitted, vec![(0, 0), (20, 1)]);
    assert!(sched.is_complete());
    assert_eq!(sched.completed(), &[0, 1]);
}

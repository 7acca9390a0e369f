/*!
 * Rendering
 * Text views of the partition and the active process table
 */

use crate::memory::BlockInfo;
use crate::scheduler::DefragEvent;
use crate::simulation::Snapshot;
use std::fmt::Write as _;

const PID_WIDTH: usize = 5;
const LOCATION_WIDTH: usize = 15;
const REMAINING_WIDTH: usize = 15;
const TABLE_RULE: usize = PID_WIDTH + LOCATION_WIDTH + REMAINING_WIDTH + 2;

/// One block as bar glyphs, `scale` memory units per character
///
/// Blocks narrower than two cells collapse to `|`; otherwise the block is
/// bracketed and filled with spaces (free) or `x` (allocated).
pub fn block_glyph(block: &BlockInfo, scale: usize) -> String {
    let scale = scale.max(1);
    if block.size < scale * 2 {
        return "|".to_string();
    }
    let fill = if block.is_free() { ' ' } else { 'x' };
    let n = (block.size - scale * 2) / scale;
    let mut out = String::with_capacity(n + 2);
    out.push('[');
    out.extend(std::iter::repeat(fill).take(n));
    out.push(']');
    out
}

/// The whole partition as a bar framed by dash rules of equal width
pub fn block_bar(blocks: &[BlockInfo], scale: usize) -> String {
    let bar: String = blocks.iter().map(|b| block_glyph(b, scale)).collect();
    let rule = "-".repeat(bar.len());
    format!("{rule}\n{bar}\n{rule}")
}

/// Free/allocated totals followed by the block bar
pub fn memory_section(snapshot: &Snapshot, scale: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=====Memory=====");
    let _ = writeln!(out, "Memory Free: {}", snapshot.free);
    let _ = writeln!(out, "Memory Allocated: {}", snapshot.allocated);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", block_bar(&snapshot.blocks, scale));
    out
}

/// Clock and the active process table
pub fn system_section(snapshot: &Snapshot) -> String {
    let rule = "-".repeat(TABLE_RULE);
    let mut out = String::new();
    let _ = writeln!(out, "=====System=====");
    let _ = writeln!(out, "System Time: {}", snapshot.time);
    let _ = writeln!(out, "Active Processes:");
    let _ = writeln!(
        out,
        "{:<PID_WIDTH$}|{:<LOCATION_WIDTH$}|{:<REMAINING_WIDTH$}",
        "PID", "Memory Location", "Time Remaining"
    );
    let _ = writeln!(out, "{rule}");
    for process in &snapshot.active {
        let location = process
            .extent
            .map(|e| e.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<PID_WIDTH$}|{:<LOCATION_WIDTH$}|{:<REMAINING_WIDTH$}",
            process.pid, location, process.remaining
        );
        let _ = writeln!(out, "{rule}");
    }
    out
}

/// System section, then memory section
pub fn render_snapshot(snapshot: &Snapshot, scale: usize) -> String {
    format!("{}\n{}", system_section(snapshot), memory_section(snapshot, scale))
}

/// Partition bars before and after one coalesce or compact pass
pub fn defrag_section(event: &DefragEvent, scale: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "No block available with size {}. {} memory...",
        event.demand, event.kind
    );
    let _ = writeln!(out, "Before:");
    let _ = writeln!(out, "{}", block_bar(&event.before, scale));
    let _ = writeln!(out, "After:");
    let _ = writeln!(out, "{}", block_bar(&event.after, scale));
    out
}

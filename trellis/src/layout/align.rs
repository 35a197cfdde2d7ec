//! Center and justify passes over a container's buffered items.
//!
//! Only direct, unpinned items of the container move; a sublayout item drags
//! its descendants along. Both passes preserve item extents.

use crate::primitives::Point;

use super::descriptor::{ItemKind, LayoutDescriptor, LayoutItem};
use super::flags::Axis;

/// Translate an item and, for sublayouts, every item nested inside it.
pub(crate) fn translate_item(items: &mut [LayoutItem], idx: usize, offset: Point) {
    if offset == Point::ORIGIN {
        return;
    }
    items[idx].boxes.translate(offset);
    if let ItemKind::Sublayout { descendants, .. } = &items[idx].kind {
        for d in descendants.clone() {
            items[d].boxes.translate(offset);
        }
    }
}

/// Line index of an item along `main`.
pub(crate) fn line_of(item: &LayoutItem, main: Axis) -> usize {
    match main {
        Axis::Horizontal => item.row,
        Axis::Vertical => item.col,
    }
}

fn direct_items<'a>(
    layout: &'a LayoutDescriptor,
    items: &'a [LayoutItem],
) -> impl Iterator<Item = usize> + 'a {
    (layout.from..items.len()).filter(move |&i| items[i].depth == layout.depth && !items[i].pinned)
}

/// Redistribute main-axis slack on line `line` of `layout`.
pub fn align_line(layout: &LayoutDescriptor, items: &mut [LayoutItem], line: usize) {
    let main = layout.main_axis();
    if !layout.expands.expands(main) {
        return;
    }
    let Some(info) = layout.lines.get(line) else {
        return;
    };
    if info.count == 0 {
        return;
    }

    let avail = main.extent(&layout.bounds);
    let on_line: Vec<usize> = direct_items(layout, items)
        .filter(|&i| line_of(&items[i], main) == line)
        .collect();

    if layout.align.centers(main) {
        let slack = avail - info.extent;
        if slack > 0.0 {
            for i in on_line {
                translate_item(items, i, main.offset(slack * 0.5));
            }
        }
    } else if layout.align.justifies(main) {
        let gap = (avail - info.items_extent) / (info.count as f32 + 1.0);
        if gap > 0.0 {
            let mut pos = main.start(&layout.bounds) + gap;
            for i in on_line {
                let margin = items[i].boxes.margin;
                translate_item(items, i, main.offset(pos - main.start(&margin)));
                pos += main.extent(&margin) + gap;
            }
        }
    }
}

/// Redistribute cross-axis slack across all lines of `layout`.
pub fn align_cross(layout: &LayoutDescriptor, items: &mut [LayoutItem]) {
    let main = layout.main_axis();
    let cross = main.cross();
    if !layout.expands.expands(cross) {
        return;
    }

    let avail = cross.extent(&layout.bounds);
    let direct: Vec<usize> = direct_items(layout, items).collect();

    if layout.align.centers(cross) {
        let slack = avail - layout.used_cross();
        if slack > 0.0 {
            for i in direct {
                translate_item(items, i, cross.offset(slack * 0.5));
            }
        }
    } else if layout.align.justifies(cross) {
        let used: f32 = layout.lines.iter().map(|l| l.cross).sum();
        let gap = (avail - used) / (layout.lines.len() as f32 + 1.0);
        if gap <= 0.0 {
            return;
        }

        let mut start = gap;
        for (k, line) in layout.lines.iter().enumerate() {
            let delta = start - line.cross_start;
            for &i in &direct {
                if line_of(&items[i], main) == k {
                    translate_item(items, i, cross.offset(delta));
                }
            }
            start += line.cross + gap;
        }
    }
}

//! Property tests for the structural invariants of the layout core.

use proptest::prelude::*;

use trellis::grid::{ColumnConfig, ColumnMap, swap_columns};
use trellis::layout::{BoxLimits, BoxModel, LayoutItem, compute_box_model};
use trellis::style::{Border, Spacing, StyleDescriptor};
use trellis::{
    Align, Color, DrawCommand, LayoutSpec, LayoutStack, MonospaceBackend, Placement, Point, Rect,
    Size, SizeSpec, WidgetId, WidgetKind,
};

/// Two header levels: `counts[p]` children under parent `p`, listed grouped.
fn two_level(counts: &[usize]) -> Vec<Vec<ColumnConfig>> {
    let parents = (0..counts.len()).map(|p| ColumnConfig::new(format!("P{p}"))).collect();
    let children = counts
        .iter()
        .enumerate()
        .flat_map(|(p, &n)| (0..n).map(move |c| ColumnConfig::new(format!("c{p}.{c}")).parent(p)))
        .collect();
    vec![parents, children]
}

fn maps_for(headers: &[Vec<ColumnConfig>]) -> Vec<ColumnMap> {
    headers
        .iter()
        .map(|level| {
            let mut map = ColumnMap::new();
            map.ensure_columns(level.len());
            map
        })
        .collect()
}

/// Three header levels: `shape[p][c]` grandchildren under child `c` of parent `p`.
fn three_level(shape: &[Vec<usize>]) -> Vec<Vec<ColumnConfig>> {
    let parents = (0..shape.len()).map(|p| ColumnConfig::new(format!("P{p}"))).collect();
    let mut children = Vec::new();
    let mut grandchildren = Vec::new();
    for (p, group) in shape.iter().enumerate() {
        for (c, &n) in group.iter().enumerate() {
            let child = children.len();
            children.push(ColumnConfig::new(format!("c{p}.{c}")).parent(p));
            for g in 0..n {
                grandchildren.push(ColumnConfig::new(format!("g{p}.{c}.{g}")).parent(child));
            }
        }
    }
    vec![parents, children, grandchildren]
}

/// Columns of `level` in the order their parents are shown, each group in
/// logical order.
fn expected_children(headers: &[Vec<ColumnConfig>], level: usize, parents: &ColumnMap) -> Vec<usize> {
    parents
        .visual_order()
        .flat_map(|p| {
            headers[level]
                .iter()
                .enumerate()
                .filter(move |(_, c)| c.parent == Some(p))
                .map(|(i, _)| i)
        })
        .collect()
}

/// Parents of `level` in visual order with consecutive repeats collapsed.
fn visual_groups(headers: &[Vec<ColumnConfig>], maps: &[ColumnMap], level: usize) -> Vec<usize> {
    let mut groups: Vec<usize> = maps[level]
        .visual_order()
        .filter_map(|l| headers[level][l].parent)
        .collect();
    groups.dedup();
    groups
}

fn spacing() -> impl Strategy<Value = Spacing> {
    (0.0f32..20.0, 0.0f32..20.0, 0.0f32..20.0, 0.0f32..20.0)
        .prop_map(|(t, r, b, l)| Spacing::new(t, r, b, l))
}

proptest! {
    #[test]
    fn column_map_swaps_keep_bijection(
        count in 1usize..12,
        swaps in prop::collection::vec((0usize..12, 0usize..12), 0..32),
    ) {
        let mut map = ColumnMap::new();
        map.ensure_columns(count);
        for (a, b) in swaps {
            map.swap_visual(a % count, b % count);
            prop_assert!(map.is_bijection());
        }
        let mut order: Vec<usize> = map.visual_order().collect();
        order.sort_unstable();
        prop_assert_eq!(order, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn group_swaps_keep_children_grouped(
        counts in prop::collection::vec(1usize..4, 2..6),
        swaps in prop::collection::vec(0usize..8, 1..16),
    ) {
        let headers = two_level(&counts);
        let mut maps = maps_for(&headers);
        let parents = counts.len();

        for s in swaps {
            let left = s % (parents - 1);
            swap_columns(&mut maps, &headers, 0, left, left + 1);
            prop_assert!(maps.iter().all(ColumnMap::is_bijection));
            let expected = expected_children(&headers, 1, &maps[0]);
            prop_assert_eq!(maps[1].visual_order().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn swaps_carry_every_descendant_level(
        shape in prop::collection::vec(prop::collection::vec(1usize..3, 1..4), 2..4),
        swaps in prop::collection::vec((0usize..2, 0usize..16), 1..16),
    ) {
        let headers = three_level(&shape);
        let mut maps = maps_for(&headers);

        for (level, pick) in swaps {
            let width = headers[level].len();
            if width < 2 {
                continue;
            }
            let left = pick % (width - 1);
            let parent_of = |v: usize| maps[level].logical(v).and_then(|l| headers[level][l].parent);
            if parent_of(left) != parent_of(left + 1) {
                continue;
            }

            swap_columns(&mut maps, &headers, level, left, left + 1);
            prop_assert!(maps.iter().all(ColumnMap::is_bijection));
            for child in 1..headers.len() {
                let shown: Vec<usize> = maps[child - 1].visual_order().collect();
                prop_assert_eq!(visual_groups(&headers, &maps, child), shown);
            }
            let expected = expected_children(&headers, 2, &maps[1]);
            prop_assert_eq!(maps[2].visual_order().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn swapping_twice_restores_order(
        counts in prop::collection::vec(1usize..4, 2..6),
        pick in 0usize..8,
    ) {
        let headers = two_level(&counts);
        let mut maps = maps_for(&headers);
        let before = maps.clone();
        let left = pick % (counts.len() - 1);

        swap_columns(&mut maps, &headers, 0, left, left + 1);
        swap_columns(&mut maps, &headers, 0, left, left + 1);
        prop_assert_eq!(maps, before);
    }

    #[test]
    fn box_model_rects_nest(
        margin in spacing(),
        padding in spacing(),
        border in 0.0f32..6.0,
        text in "[a-z ]{0,24}",
        width in prop::option::of(0.0f32..300.0),
        placement in 0u8..16,
        x in -100.0f32..100.0,
        y in -100.0f32..100.0,
    ) {
        let mut style = StyleDescriptor::new(14.0, "default");
        style.margin = margin;
        style.padding = padding;
        style.border = Border::uniform(border, Color::BLACK);
        if let Some(w) = width {
            style.dimension.width = w;
            style.specified |= trellis::StyleProps::WIDTH;
        }
        let placement = Placement::from_bits_truncate(placement);
        let limits = BoxLimits {
            horizontal: trellis::layout::AxisLimit::ExpandTo(x + 400.0),
            vertical: trellis::layout::AxisLimit::ExpandTo(y + 300.0),
        };

        let boxes = compute_box_model(Point::new(x, y), &style, &text, placement, limits, &MonospaceBackend::new());
        prop_assert!(boxes.is_nested(), "{:?}", boxes);
        prop_assert!(boxes.content.width >= 0.0 && boxes.content.height >= 0.0);
    }

    #[test]
    fn centering_preserves_extents_and_gaps(
        widths in prop::collection::vec(1.0f32..60.0, 1..6),
        gap in 0.0f32..10.0,
    ) {
        let mut stack = LayoutStack::new(8, Size::new(1280.0, 720.0));
        let spec = LayoutSpec::horizontal()
            .spacing(gap)
            .align(Align::HCENTER | Align::TOP)
            .width(SizeSpec::Absolute(500.0));
        stack.begin(&spec, Point::ORIGIN).unwrap();
        for (i, w) in widths.iter().enumerate() {
            let id = WidgetId::new(WidgetKind::Label, i as u32);
            stack.add_item(LayoutItem::widget(id, BoxModel::uniform(Rect::new(0.0, 0.0, *w, 10.0)))).unwrap();
        }
        stack.end_layout(1);

        let rects: Vec<Rect> = stack
            .drain_finished()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Widget { boxes, .. } => Some(boxes.margin),
                DrawCommand::LayoutBorder { .. } => None,
            })
            .collect();
        prop_assert_eq!(rects.len(), widths.len());
        for (rect, w) in rects.iter().zip(&widths) {
            prop_assert!((rect.width - w).abs() < 1e-3);
        }
        for pair in rects.windows(2) {
            prop_assert!((pair[1].x - pair[0].right() - gap).abs() < 1e-3);
        }
        let left = rects[0].x;
        let right = 500.0 - rects[rects.len() - 1].right();
        prop_assert!((left - right).abs() < 1e-3);
    }

    #[test]
    fn inheritance_is_idempotent(size in 8.0f32..40.0, pad in 0.0f32..12.0) {
        let mut base = StyleDescriptor::new(size, "serif");
        base.padding = Spacing::all(pad);
        base.specified |= trellis::StyleProps::PADDING;

        let mut once = StyleDescriptor::new(12.0, "default");
        once.copy_from_base(&base);
        let mut twice = once.clone();
        twice.copy_from_base(&base);
        twice.copy_from_base(&StyleDescriptor::new(99.0, "other"));
        prop_assert_eq!(once, twice);
    }
}

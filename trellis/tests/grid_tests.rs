//! Item grid header interaction across frames.
//!
//! Header rows:
//!
//! ```text
//! level 0 |      G0      |  G1  |
//! level 1 |  a   |  b   |  c   |
//! ```
//!
//! Every leaf is 50px wide, so G0 spans 100px and G1 50px.

use trellis::grid::{ColumnProps, HeaderLayout};
use trellis::{
    ColumnConfig, CursorHint, EngineConfig, FrameContext, GridInteraction, GridState,
    MonospaceBackend, Point, PointerSnapshot, WidgetData, WidgetId, WidgetKind,
};

fn leaf(name: &str, parent: usize) -> ColumnConfig {
    ColumnConfig::new(name)
        .parent(parent)
        .width(50.0)
        .props(ColumnProps::RESIZABLE | ColumnProps::MOVEABLE | ColumnProps::WIDTH_ABSOLUTE)
}

fn headers() -> Vec<Vec<ColumnConfig>> {
    vec![
        vec![ColumnConfig::new("G0"), ColumnConfig::new("G1")],
        vec![leaf("a", 0), leaf("b", 0), leaf("c", 1)],
    ]
}

fn setup() -> (FrameContext, WidgetId) {
    let mut ctx = FrameContext::new(EngineConfig::default(), Box::new(MonospaceBackend::new()));
    let grid = ctx.create_widget(WidgetKind::ItemGrid);
    ctx.set_grid_headers(grid, headers()).unwrap();
    (ctx, grid)
}

fn frame(ctx: &mut FrameContext, grid: WidgetId, pointer: PointerSnapshot) {
    ctx.begin_frame(pointer);
    ctx.item_grid(grid).unwrap();
    ctx.end_frame();
    ctx.take_draw_list();
}

fn grid_data(ctx: &FrameContext, grid: WidgetId) -> (&GridState, &HeaderLayout, CursorHint) {
    match ctx.widget(grid).unwrap() {
        WidgetData::ItemGrid(data) => (&data.state, &data.header_layout, data.cursor),
        other => panic!("expected a grid, got {:?}", other.kind()),
    }
}

/// Vertical middle of a header level.
fn row_y(ctx: &FrameContext, grid: WidgetId, level: usize) -> f32 {
    let (_, layout, _) = grid_data(ctx, grid);
    let rect = layout.cell(level, 0).unwrap().rect;
    rect.y + rect.height * 0.5
}

#[test]
fn test_initial_geometry() {
    let (mut ctx, grid) = setup();
    frame(&mut ctx, grid, PointerSnapshot::default());

    let (state, layout, cursor) = grid_data(&ctx, grid);
    assert_eq!(cursor, CursorHint::Arrow);
    assert_eq!(state.levels(), 2);
    assert_eq!(layout.cell(0, 0).unwrap().rect.width, 100.0);
    assert_eq!(layout.cell(0, 1).unwrap().rect.x, 100.0);
    assert_eq!(layout.cell(1, 2).unwrap().rect.x, 100.0);
    assert_eq!(layout.size.width, 150.0);
}

#[test]
fn test_group_reorder_carries_children() {
    let (mut ctx, grid) = setup();
    frame(&mut ctx, grid, PointerSnapshot::default());
    let y = row_y(&ctx, grid, 0);

    // Grab G1 and drag it past G0.
    frame(&mut ctx, grid, PointerSnapshot::at(125.0, y).pressed());
    {
        let (state, _, cursor) = grid_data(&ctx, grid);
        assert_eq!(state.mode, GridInteraction::ReorderingColumns);
        assert!(state.drag.active);
        assert_eq!(cursor, CursorHint::Grab);
    }

    frame(&mut ctx, grid, PointerSnapshot::at(20.0, y).pressed());
    {
        let (state, layout, _) = grid_data(&ctx, grid);
        assert_eq!(state.map(0).visual_order().collect::<Vec<_>>(), vec![1, 0]);
        assert_eq!(state.map(1).visual_order().collect::<Vec<_>>(), vec![2, 0, 1]);
        assert_eq!(state.drag.column, 0);
        assert_eq!(layout.cell(0, 1).unwrap().rect.x, 0.0);
        assert_eq!(layout.cell(1, 2).unwrap().rect.x, 0.0);
        assert_eq!(layout.cell(1, 0).unwrap().rect.x, 50.0);
        assert_eq!(layout.cell(1, 1).unwrap().rect.x, 100.0);
    }

    frame(&mut ctx, grid, PointerSnapshot::at(20.0, y).released());
    let (state, _, _) = grid_data(&ctx, grid);
    assert_eq!(state.mode, GridInteraction::Default);
    assert!(!state.drag.active);
    assert!(state.maps().iter().all(|m| m.is_bijection()));
}

#[test]
fn test_short_drag_does_not_swap() {
    let (mut ctx, grid) = setup();
    frame(&mut ctx, grid, PointerSnapshot::default());
    let y = row_y(&ctx, grid, 0);

    frame(&mut ctx, grid, PointerSnapshot::at(125.0, y).pressed());
    frame(&mut ctx, grid, PointerSnapshot::at(90.0, y).pressed());
    let (state, layout, _) = grid_data(&ctx, grid);
    assert_eq!(state.map(0).visual_order().collect::<Vec<_>>(), vec![0, 1]);

    // The dragged cell follows the pointer.
    let dragged = layout.cell(0, 1).unwrap();
    assert!(dragged.dragging);
    assert_eq!(dragged.rect.x, 65.0);
}

#[test]
fn test_leaf_resize_through_handle() {
    let (mut ctx, grid) = setup();
    frame(&mut ctx, grid, PointerSnapshot::default());
    let y = row_y(&ctx, grid, 1);

    // The handle on b's left edge resizes a.
    frame(&mut ctx, grid, PointerSnapshot::at(50.0, y).pressed());
    assert_eq!(grid_data(&ctx, grid).0.mode, GridInteraction::ResizingColumns);
    assert_eq!(grid_data(&ctx, grid).2, CursorHint::ResizeHorizontal);

    frame(&mut ctx, grid, PointerSnapshot::at(70.0, y).pressed());
    frame(&mut ctx, grid, PointerSnapshot::at(70.0, y).released());

    let (state, layout, _) = grid_data(&ctx, grid);
    assert_eq!(state.mode, GridInteraction::Default);
    assert_eq!(state.modified(1, 0), 20.0);
    assert_eq!(layout.cell(1, 0).unwrap().rect.width, 70.0);
    assert_eq!(layout.cell(1, 1).unwrap().rect.x, 70.0);
    assert_eq!(layout.cell(0, 0).unwrap().rect.width, 120.0);
}

#[test]
fn test_group_resize_skips_fixed_children() {
    let mut headers = headers();
    headers[1][1] = leaf("b", 0).props(ColumnProps::MOVEABLE | ColumnProps::WIDTH_ABSOLUTE);
    headers.push(vec![
        ColumnConfig::new("a.1").parent(0),
        ColumnConfig::new("a.2").parent(0),
    ]);

    let mut state = GridState::new(8);
    state.ensure(&headers);
    state.resize_column(&headers, 0, 0, 30.0);

    assert_eq!(state.modified(0, 0), 30.0);
    assert_eq!(state.modified(1, 0), 30.0);
    assert_eq!(state.modified(1, 1), 0.0);
    assert_eq!(state.modified(2, 0), 15.0);
    assert_eq!(state.modified(2, 1), 15.0);
}

#[test]
fn test_grid_follows_its_layout_origin() {
    let (mut ctx, grid) = setup();
    let spacer = ctx.create_widget(WidgetKind::Label);

    let run = |ctx: &mut FrameContext, pointer: PointerSnapshot| {
        ctx.begin_frame(pointer);
        ctx.begin_layout(&trellis::LayoutSpec::vertical()).unwrap();
        ctx.set_next_style(trellis::InteractionState::DEFAULT, "height: 40px");
        ctx.label(spacer, "top").unwrap();
        ctx.item_grid(grid).unwrap();
        ctx.end_layout(1);
        ctx.end_frame();
        ctx.take_draw_list();
    };

    run(&mut ctx, PointerSnapshot::default());
    let origin = ctx.geometry(grid).map(|r| r.origin());
    assert_eq!(origin, None);

    // Pointer in screen space lands on G1 once shifted by the grid origin.
    run(&mut ctx, PointerSnapshot::at(125.0, 45.0).pressed());
    let (state, _, _) = grid_data(&ctx, grid);
    assert!(state.drag.active);
    assert_eq!(state.drag.level, 0);
    assert_eq!(state.drag.column, 1);
    assert_eq!(state.drag.start_pos, Point::new(125.0, 5.0));
}

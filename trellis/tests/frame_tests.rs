//! End-to-end frames driven through `FrameContext`.
//!
//! Widgets get explicit sizes from pushed styles so the expected geometry
//! does not depend on text metrics.

use trellis::style::Border;
use trellis::{
    Align, Color, DrawCommand, EngineConfig, FrameContext, InteractionState, LayoutError,
    LayoutSpec, MonospaceBackend, Overflow, Point, PointerSnapshot, Rect, SizeSpec, Sizing,
    WidgetId, WidgetKind,
};

fn context() -> FrameContext {
    FrameContext::new(EngineConfig::default(), Box::new(MonospaceBackend::new()))
}

fn sized(ctx: &mut FrameContext, w: f32, h: f32) {
    ctx.push_style(InteractionState::DEFAULT, &format!("width: {w}px; height: {h}px"));
}

fn widgets(commands: &[DrawCommand]) -> Vec<(WidgetId, Rect)> {
    commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Widget { id, boxes } => Some((*id, boxes.margin)),
            DrawCommand::LayoutBorder { .. } => None,
        })
        .collect()
}

#[test]
fn test_toolbar_row() {
    let mut ctx = context();
    let buttons: Vec<_> = (0..3).map(|_| ctx.create_widget(WidgetKind::Button)).collect();

    ctx.begin_frame(PointerSnapshot::default());
    sized(&mut ctx, 60.0, 20.0);
    ctx.begin_layout(&LayoutSpec::horizontal().spacing(10.0)).unwrap();
    for (i, id) in buttons.iter().enumerate() {
        ctx.button(*id, &format!("b{i}")).unwrap();
    }
    ctx.end_layout(1);
    ctx.pop_style(1, InteractionState::DEFAULT);

    let xs: Vec<f32> = buttons.iter().map(|id| ctx.geometry(*id).unwrap().x).collect();
    assert_eq!(xs, vec![0.0, 70.0, 140.0]);
    ctx.end_frame();
}

#[test]
fn test_wrapped_centered_flow() {
    let mut ctx = context();
    let ids: Vec<_> = (0..5).map(|_| ctx.create_widget(WidgetKind::Label)).collect();

    ctx.begin_frame(PointerSnapshot::default());
    sized(&mut ctx, 100.0, 20.0);
    let spec = LayoutSpec::horizontal()
        .spacing(10.0)
        .overflow(Overflow::Wrap)
        .align(Align::HCENTER | Align::TOP)
        .width(SizeSpec::Absolute(300.0));
    ctx.begin_layout(&spec).unwrap();
    for id in &ids {
        ctx.label(*id, "cell").unwrap();
    }
    ctx.end_layout(1);

    let list = ctx.take_draw_list();
    let rects: Vec<Rect> = widgets(&list).into_iter().map(|(_, r)| r).collect();
    assert_eq!(rects.len(), 5);
    assert_eq!((rects[0].x, rects[0].y), (45.0, 0.0));
    assert_eq!((rects[1].x, rects[1].y), (155.0, 0.0));
    assert_eq!((rects[2].x, rects[2].y), (45.0, 30.0));
    assert_eq!((rects[4].x, rects[4].y), (100.0, 60.0));
    ctx.pop_style(1, InteractionState::DEFAULT);
    ctx.end_frame();
}

#[test]
fn test_nested_row_is_centered_with_its_widgets() {
    let mut ctx = context();
    let a = ctx.create_widget(WidgetKind::Label);
    let b = ctx.create_widget(WidgetKind::Label);

    ctx.begin_frame(PointerSnapshot::default());
    sized(&mut ctx, 30.0, 10.0);
    let column = LayoutSpec::vertical()
        .align(Align::HCENTER | Align::TOP)
        .width(SizeSpec::Absolute(200.0));
    ctx.begin_layout(&column).unwrap();
    ctx.begin_layout(&LayoutSpec::horizontal()).unwrap();
    ctx.label(a, "a").unwrap();
    ctx.label(b, "b").unwrap();
    let row = ctx.end_layout(1).unwrap();
    assert_eq!(row, Rect::new(0.0, 0.0, 60.0, 10.0));
    assert!(ctx.take_draw_list().is_empty());
    ctx.end_layout(1);

    assert_eq!(ctx.geometry(a), Some(Rect::new(70.0, 0.0, 30.0, 10.0)));
    assert_eq!(ctx.geometry(b), Some(Rect::new(100.0, 0.0, 30.0, 10.0)));
    ctx.pop_style(1, InteractionState::DEFAULT);
    ctx.end_frame();
}

#[test]
fn test_pushed_sizing_sizes_the_next_child() {
    let mut ctx = context();
    let label = ctx.create_widget(WidgetKind::Label);

    ctx.begin_frame(PointerSnapshot::default());
    ctx.begin_layout(&LayoutSpec::horizontal().width(SizeSpec::Absolute(400.0))).unwrap();
    ctx.push_sizing(Sizing {
        width: SizeSpec::Relative(0.5),
        height: SizeSpec::Absolute(40.0),
    })
    .unwrap();
    let first = ctx.begin_layout(&LayoutSpec::vertical()).unwrap();
    assert_eq!((first.width, first.height), (200.0, 40.0));
    ctx.end_layout(1);
    ctx.pop_sizing(1);

    let second = ctx.begin_layout(&LayoutSpec::vertical()).unwrap();
    assert_eq!(second.width, 0.0);
    sized(&mut ctx, 10.0, 10.0);
    ctx.label(label, "x").unwrap();
    ctx.end_layout(2);
    ctx.pop_style(1, InteractionState::DEFAULT);

    assert_eq!(ctx.geometry(label).map(|r| r.x), Some(200.0));
    assert_eq!(ctx.layouts().sizing_depth(), 0);
    ctx.end_frame();
}

#[test]
fn test_bordered_layout_emits_border_and_insets_content() {
    let mut ctx = context();
    let label = ctx.create_widget(WidgetKind::Label);

    ctx.begin_frame(PointerSnapshot::default());
    sized(&mut ctx, 30.0, 10.0);
    let spec = LayoutSpec::horizontal()
        .border(Border::uniform(2.0, Color::BLACK))
        .width(SizeSpec::Absolute(100.0))
        .height(SizeSpec::Absolute(50.0));
    ctx.begin_layout(&spec).unwrap();
    ctx.label(label, "x").unwrap();
    ctx.end_layout(1);
    ctx.pop_style(1, InteractionState::DEFAULT);

    let list = ctx.take_draw_list();
    let borders: Vec<_> = list
        .iter()
        .filter_map(|c| match c {
            DrawCommand::LayoutBorder { bounds, border } => Some((*bounds, *border)),
            DrawCommand::Widget { .. } => None,
        })
        .collect();
    assert_eq!(borders.len(), 1);
    assert_eq!(borders[0].0, Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(borders[0].1.left, 2.0);
    assert_eq!(ctx.geometry(label).map(|r| (r.x, r.y)), Some((2.0, 2.0)));
    ctx.end_frame();
}

#[test]
fn test_nesting_limit_is_reported() {
    let config = EngineConfig {
        max_layout_nesting: 2,
        ..EngineConfig::default()
    };
    let mut ctx = FrameContext::new(config, Box::new(MonospaceBackend::new()));

    ctx.begin_frame(PointerSnapshot::default());
    ctx.begin_layout(&LayoutSpec::vertical()).unwrap();
    ctx.begin_layout(&LayoutSpec::horizontal()).unwrap();
    assert_eq!(
        ctx.begin_layout(&LayoutSpec::vertical()),
        Err(LayoutError::NestingExceeded { max: 2 })
    );
    ctx.end_layout(2);
    ctx.end_frame();
}

#[test]
fn test_hovered_button_uses_hovered_style() {
    let mut ctx = context();
    let plain = ctx.create_widget(WidgetKind::Button);
    let hovered = ctx.create_widget(WidgetKind::Button);
    ctx.set_interaction(hovered, InteractionState::HOVERED).unwrap();

    ctx.begin_frame(PointerSnapshot::default());
    sized(&mut ctx, 40.0, 10.0);
    ctx.push_style(InteractionState::HOVERED, "padding: 5px; color: red");
    let a = ctx.button(plain, "ok").unwrap();
    ctx.move_to(Point::new(0.0, 100.0));
    let b = ctx.button(hovered, "ok").unwrap();

    assert_eq!(a.margin.width, 40.0);
    assert_eq!(b.content.width, 40.0);
    assert_eq!(b.margin.width, 50.0);
    assert_eq!(ctx.resolve_style(InteractionState::HOVERED).fg_color, Color::rgb8(255, 0, 0));

    ctx.pop_style(1, InteractionState::HOVERED);
    ctx.pop_style(1, InteractionState::DEFAULT);
    ctx.end_frame();
}

#[test]
fn test_state_resets_between_frames() {
    let mut ctx = context();
    let label = ctx.create_widget(WidgetKind::Label);

    ctx.begin_frame(PointerSnapshot::default());
    ctx.set_next_style(InteractionState::DEFAULT, "width: 300px");
    ctx.end_frame();

    ctx.begin_frame(PointerSnapshot::default());
    let boxes = ctx.label(label, "x").unwrap();
    assert!(boxes.content.width < 300.0);
    assert_eq!(ctx.styles().depth(trellis::style::StateIndex::Default), 1);
    ctx.end_frame();
}

#[test]
fn test_next_style_reaches_only_the_next_hovered_widget() {
    let mut ctx = context();
    let first = ctx.create_widget(WidgetKind::Button);
    let second = ctx.create_widget(WidgetKind::Button);
    for id in [first, second] {
        ctx.set_interaction(id, InteractionState::HOVERED).unwrap();
    }

    ctx.begin_frame(PointerSnapshot::default());
    ctx.set_next_style(InteractionState::DEFAULT, "color: red; width: 77px");
    let a = ctx.button(first, "ok").unwrap();
    let b = ctx.button(second, "ok").unwrap();

    assert_eq!(a.content.width, 77.0);
    assert_ne!(b.content.width, 77.0);
    assert_eq!(ctx.resolve_style(InteractionState::HOVERED).fg_color, Color::BLACK);
    ctx.end_frame();
}

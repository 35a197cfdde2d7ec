//! Trellis demo: runs a few scripted frames against a monospace backend and
//! prints what the host would draw, as JSON.
//!
//! Usage: `trellis-demo [config.json]`. Set `RUST_LOG=trellis=debug` to see
//! layout and grid events.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use trellis::grid::ColumnProps;
use trellis::{
    Align, ColumnConfig, DrawCommand, EngineConfig, FrameContext, InteractionState, LayoutKind,
    LayoutSpec, MonospaceBackend, Overflow, PointerSnapshot, SizeSpec, WidgetData, WidgetId,
    WidgetKind,
};

#[derive(Serialize)]
struct FrameReport {
    frame: usize,
    pointer: PointerSnapshot,
    commands: Vec<DrawCommand>,
    /// Leaf columns of the grid in display order.
    column_order: Vec<String>,
}

struct Demo {
    ctx: FrameContext,
    toolbar: Vec<WidgetId>,
    tags: Vec<WidgetId>,
    grid: WidgetId,
}

impl Demo {
    fn new(config: EngineConfig) -> Result<Self> {
        let mut ctx = FrameContext::new(config, Box::new(MonospaceBackend::new()));
        let toolbar = (0..3).map(|_| ctx.create_widget(WidgetKind::Button)).collect();
        let tags = (0..6).map(|_| ctx.create_widget(WidgetKind::Label)).collect();
        let grid = ctx.create_widget(WidgetKind::ItemGrid);

        let leaf = |name: &str, parent: usize| {
            ColumnConfig::new(name)
                .parent(parent)
                .width(80.0)
                .props(ColumnProps::RESIZABLE | ColumnProps::MOVEABLE | ColumnProps::WIDTH_ABSOLUTE)
        };
        ctx.set_grid_headers(
            grid,
            vec![
                vec![ColumnConfig::new("Identity"), ColumnConfig::new("Status")],
                vec![leaf("Name", 0), leaf("Email", 0), leaf("State", 1)],
            ],
        )
        .context("configuring grid headers")?;

        Ok(Self {
            ctx,
            toolbar,
            tags,
            grid,
        })
    }

    fn frame(&mut self, pointer: PointerSnapshot) -> Result<Vec<DrawCommand>> {
        let ctx = &mut self.ctx;
        ctx.begin_frame(pointer);

        ctx.begin_layout(&LayoutSpec::vertical().spacing(12.0))?;

        ctx.push_style(InteractionState::DEFAULT, "padding: 4px; border: 1px solid #888");
        ctx.push_style(InteractionState::HOVERED, "background: #eef");
        ctx.begin_layout(&LayoutSpec::horizontal().spacing(8.0))?;
        for (id, text) in self.toolbar.iter().zip(["New", "Open", "Save"]) {
            ctx.button(*id, text)?;
        }
        ctx.end_layout(1);
        ctx.pop_style(1, InteractionState::DEFAULT | InteractionState::HOVERED);

        ctx.begin_layout_with(LayoutKind::Horizontal, "width: 240px; spacing: 6px; overflow: wrap; halign: center")?;
        for (i, id) in self.tags.iter().enumerate() {
            ctx.label(*id, &format!("tag-{i}"))?;
        }
        ctx.end_layout(1);

        ctx.begin_layout(
            &LayoutSpec::vertical()
                .align(Align::LEFT | Align::TOP)
                .overflow(Overflow::Clip)
                .width(SizeSpec::Absolute(400.0)),
        )?;
        ctx.item_grid(self.grid)?;
        ctx.end_layout(2);

        ctx.end_frame();
        Ok(ctx.take_draw_list())
    }

    fn report(&mut self, frame: usize, pointer: PointerSnapshot) -> Result<FrameReport> {
        let commands = self.frame(pointer)?;
        Ok(FrameReport {
            frame,
            pointer,
            commands,
            column_order: self.column_order()?,
        })
    }

    fn column_order(&self) -> Result<Vec<String>> {
        let WidgetData::ItemGrid(grid) = self.ctx.widget(self.grid)? else {
            anyhow::bail!("{} is not a grid", self.grid);
        };
        let leaves = grid.headers.len().saturating_sub(1);
        Ok(grid
            .state
            .map(leaves)
            .visual_order()
            .filter_map(|l| grid.headers.get(leaves)?.get(l).map(|c| c.name.clone()))
            .collect())
    }

    /// Screen position of the middle of a header cell.
    fn header_point(&self, level: usize, logical: usize) -> Result<(f32, f32)> {
        let WidgetData::ItemGrid(grid) = self.ctx.widget(self.grid)? else {
            anyhow::bail!("{} is not a grid", self.grid);
        };
        let cell = grid
            .header_layout
            .cell(level, logical)
            .with_context(|| format!("no header cell {level}/{logical}"))?;
        let origin = grid.content_origin;
        Ok((
            origin.x + cell.rect.x + cell.rect.width * 0.5,
            origin.y + cell.rect.y + cell.rect.height * 0.5,
        ))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            EngineConfig::from_json_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => EngineConfig::default(),
    };
    tracing::info!(viewport = ?config.viewport, "starting trellis demo");

    let mut demo = Demo::new(config)?;
    let mut reports = Vec::new();

    // Settle geometry, then drag the "Status" group across "Identity".
    let idle = PointerSnapshot::default();
    reports.push(demo.report(0, idle)?);
    let (x, y) = demo.header_point(0, 1)?;
    let script = [
        PointerSnapshot::at(x, y).pressed(),
        PointerSnapshot::at(x - 170.0, y).pressed(),
        PointerSnapshot::at(x - 170.0, y).released(),
    ];
    for (i, pointer) in script.into_iter().enumerate() {
        reports.push(demo.report(i + 1, pointer)?);
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    tracing::info!(columns = ?demo.column_order()?, "demo finished");
    Ok(())
}

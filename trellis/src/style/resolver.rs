//! Per-interaction-state style stacks.
//!
//! One stack exists per [`StateIndex`], shared by every widget under push/pop
//! discipline. The bottom entry of each stack is permanent. Non-default states
//! inherit from the Default state's current style the first time they are
//! resolved.

use bitflags::bitflags;

use crate::backend::FontResolver;
use crate::config::EngineConfig;

use super::declaration::{StyleUpdate, parse_style};
use super::descriptor::{StyleDescriptor, StyleProps};

bitflags! {
    /// Interaction state of a widget. Each bit selects one style stack.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct InteractionState: u32 {
        const DEFAULT = 1 << 0;
        const FOCUSED = 1 << 1;
        const HOVERED = 1 << 2;
        const PRESSED = 1 << 3;
        const CHECKED = 1 << 4;
        const DISABLED = 1 << 5;
        const PARTIALLY_CHECKED = 1 << 6;
        const SELECTED = 1 << 7;
    }
}

/// Stack index for an interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateIndex {
    Default = 0,
    Focused,
    Hovered,
    Pressed,
    Checked,
    Disabled,
    PartiallyChecked,
    Selected,
}

impl StateIndex {
    pub const COUNT: usize = 8;

    pub const ALL: [StateIndex; Self::COUNT] = [
        StateIndex::Default,
        StateIndex::Focused,
        StateIndex::Hovered,
        StateIndex::Pressed,
        StateIndex::Checked,
        StateIndex::Disabled,
        StateIndex::PartiallyChecked,
        StateIndex::Selected,
    ];

    /// Index of the highest set bit. An empty mask maps to Default.
    pub fn from_mask(mask: InteractionState) -> Self {
        let bits = mask.bits() & InteractionState::all().bits();
        if bits == 0 {
            return StateIndex::Default;
        }
        Self::ALL[(u32::BITS - 1 - bits.leading_zeros()) as usize]
    }

    pub fn mask(self) -> InteractionState {
        InteractionState::from_bits_truncate(1 << self as u32)
    }
}

/// Owns the style stacks and the one-shot overrides for the next widget.
#[derive(Debug, Clone)]
pub struct StyleResolver {
    stacks: [Vec<StyleDescriptor>; StateIndex::COUNT],
    overrides: [Option<StyleDescriptor>; StateIndex::COUNT],
    base: StyleDescriptor,
    /// Resolved style of a state borrowing the one-shot Default override.
    scratch: StyleDescriptor,
    em: f32,
}

impl StyleResolver {
    pub fn new(config: &EngineConfig) -> Self {
        let base = StyleDescriptor::new(config.base_font_size(), &config.default_font_family);
        Self {
            stacks: std::array::from_fn(|_| vec![base.clone()]),
            overrides: std::array::from_fn(|_| None),
            scratch: base.clone(),
            base,
            em: config.base_font_size(),
        }
    }

    /// Number of entries on a state's stack, including the permanent base.
    pub fn depth(&self, state: StateIndex) -> usize {
        self.stacks[state as usize].len()
    }

    /// Current entry for `state` without inheritance or font lookup.
    pub fn peek(&self, state: StateIndex) -> &StyleDescriptor {
        let idx = state as usize;
        match &self.overrides[idx] {
            Some(style) => style,
            None => self.stacks[idx].last().unwrap_or(&self.base),
        }
    }

    fn current_mut(&mut self, state: StateIndex) -> &mut StyleDescriptor {
        let idx = state as usize;
        if self.stacks[idx].is_empty() {
            self.stacks[idx].push(self.base.clone());
        }
        match &mut self.overrides[idx] {
            Some(style) => style,
            None => {
                let stack = &mut self.stacks[idx];
                let last = stack.len() - 1;
                &mut stack[last]
            }
        }
    }

    /// Effective style for `mask`: the override if one is active, else the
    /// top of the stack, fully inherited from Default and with a font handle.
    ///
    /// While a Default override is active, a state without its own override
    /// inherits from it into a scratch copy so the stack entry stays clean.
    /// Entries pushed for that state already carry their Default values and
    /// do not see the override.
    pub fn resolve(
        &mut self,
        mask: InteractionState,
        fonts: &mut dyn FontResolver,
    ) -> &StyleDescriptor {
        let state = StateIndex::from_mask(mask);
        let idx = state as usize;
        let borrows_override = state != StateIndex::Default
            && self.overrides[idx].is_none()
            && self.overrides[StateIndex::Default as usize].is_some();

        let style = if borrows_override {
            let mut scratch = self.stacks[idx].last().unwrap_or(&self.base).clone();
            if let Some(default) = &self.overrides[StateIndex::Default as usize] {
                scratch.copy_from_base(default);
            }
            self.scratch = scratch;
            &mut self.scratch
        } else {
            if state != StateIndex::Default {
                let default = self.peek(StateIndex::Default).clone();
                self.current_mut(state).copy_from_base(&default);
            }
            self.current_mut(state)
        };

        if style.font.handle.is_none() {
            style.font.handle =
                Some(fonts.resolve_font(&style.font.family, style.font.size, style.font.flags));
        }
        style
    }

    fn parse(&self, decl: &str) -> Vec<StyleUpdate> {
        let (updates, errors) = parse_style(decl, self.em);
        for e in errors {
            tracing::warn!("style declaration skipped: {}", e);
        }
        updates
    }

    /// Start a style for a non-default state from `default`.
    fn derived_from(default: &StyleDescriptor, updates: &[StyleUpdate]) -> StyleDescriptor {
        let mut style = default.clone();
        for update in updates {
            style.apply(update);
        }
        style.specified |= default.specified | StyleProps::UPDATED_FROM_BASE;
        style
    }

    /// Push `decl` onto every state selected by `states`.
    ///
    /// A Default push starts from the current Default top. Any other state
    /// starts from a copy of the Default top, so it inherits everything the
    /// declaration does not override.
    pub fn push(&mut self, states: InteractionState, decl: &str) {
        let updates = self.parse(decl);
        self.push_updates(states, &updates);
    }

    pub fn push_updates(&mut self, states: InteractionState, updates: &[StyleUpdate]) {
        // Default first so other states copy the new Default top.
        for state in StateIndex::ALL {
            if !states.contains(state.mask()) {
                continue;
            }

            // Pushed entries never see a pending one-shot override.
            let default = self.stacks[0].last().unwrap_or(&self.base);
            let style = if state == StateIndex::Default {
                let mut style = default.clone();
                for update in updates {
                    style.apply(update);
                }
                style
            } else {
                Self::derived_from(default, updates)
            };
            self.stacks[state as usize].push(style);

            if state == StateIndex::Default {
                self.invalidate_derived();
            }
        }
    }

    /// Pop up to `depth` entries from each selected stack. The base entry stays.
    pub fn pop(&mut self, depth: usize, states: InteractionState) {
        for state in StateIndex::ALL {
            if !states.contains(state.mask()) {
                continue;
            }

            let stack = &mut self.stacks[state as usize];
            let keep = stack.len().saturating_sub(depth).max(1);
            if stack.len() - keep < depth {
                tracing::warn!(
                    "style pop of {} exceeds {:?} stack depth {}",
                    depth,
                    state,
                    stack.len() - 1
                );
            }
            stack.truncate(keep);

            if state == StateIndex::Default {
                self.invalidate_derived();
            }
        }
    }

    /// One-shot style for the next widget only; cleared by [`clear_overrides`].
    ///
    /// [`clear_overrides`]: Self::clear_overrides
    pub fn set_next_style(&mut self, states: InteractionState, decl: &str) {
        let updates = self.parse(decl);
        for state in StateIndex::ALL {
            if !states.contains(state.mask()) {
                continue;
            }

            let default = self.peek(StateIndex::Default);
            let style = if state == StateIndex::Default {
                let mut style = default.clone();
                for update in &updates {
                    style.apply(update);
                }
                style
            } else {
                Self::derived_from(default, &updates)
            };
            self.overrides[state as usize] = Some(style);
        }
        self.invalidate_derived();
    }

    pub fn has_override(&self, state: StateIndex) -> bool {
        self.overrides[state as usize].is_some()
    }

    pub fn clear_overrides(&mut self) {
        if self.overrides.iter().any(Option::is_some) {
            self.overrides = std::array::from_fn(|_| None);
            self.invalidate_derived();
        }
    }

    /// Drop every pushed entry and override, leaving only the base entries.
    pub fn reset_frame(&mut self) {
        for stack in &mut self.stacks {
            stack.truncate(1);
        }
        self.invalidate_derived();
        self.clear_overrides();
    }

    /// Base entries of non-default states re-inherit on their next resolve.
    fn invalidate_derived(&mut self) {
        for stack in self.stacks.iter_mut().skip(1) {
            if let Some(bottom) = stack.first_mut() {
                *bottom = self.base.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MonospaceBackend;
    use crate::primitives::Color;

    fn resolver() -> (StyleResolver, MonospaceBackend) {
        (StyleResolver::new(&EngineConfig::default()), MonospaceBackend::new())
    }

    #[test]
    fn test_state_index_uses_highest_bit() {
        assert_eq!(StateIndex::from_mask(InteractionState::empty()), StateIndex::Default);
        assert_eq!(
            StateIndex::from_mask(InteractionState::HOVERED | InteractionState::PRESSED),
            StateIndex::Pressed
        );
        assert_eq!(StateIndex::from_mask(InteractionState::SELECTED), StateIndex::Selected);
        assert_eq!(StateIndex::Checked.mask(), InteractionState::CHECKED);
    }

    #[test]
    fn test_hovered_falls_back_to_default() {
        let (mut styles, mut fonts) = resolver();
        styles.push(InteractionState::DEFAULT, "color: red; padding: 3px");

        let default = styles.resolve(InteractionState::DEFAULT, &mut fonts).clone();
        let hovered = styles.resolve(InteractionState::HOVERED, &mut fonts).clone();
        assert_eq!(hovered.fg_color, default.fg_color);
        assert_eq!(hovered.padding, default.padding);
        assert!(hovered.font.handle.is_some());
    }

    #[test]
    fn test_state_specific_push_overrides_only_its_props() {
        let (mut styles, mut fonts) = resolver();
        styles.push(InteractionState::DEFAULT, "color: red; padding: 3px");
        styles.push(InteractionState::HOVERED, "color: blue");

        let hovered = styles.resolve(InteractionState::HOVERED, &mut fonts).clone();
        assert_eq!(hovered.fg_color, Color::rgb8(0, 0, 255));
        assert_eq!(hovered.padding.left, 3.0);

        let default = styles.resolve(InteractionState::DEFAULT, &mut fonts);
        assert_eq!(default.fg_color, Color::rgb8(255, 0, 0));
    }

    #[test]
    fn test_pop_never_removes_base() {
        let (mut styles, _) = resolver();
        styles.push(InteractionState::DEFAULT, "color: red");
        styles.pop(5, InteractionState::DEFAULT);
        assert_eq!(styles.depth(StateIndex::Default), 1);
        assert_eq!(styles.peek(StateIndex::Default).fg_color, Color::BLACK);
    }

    #[test]
    fn test_default_push_reaches_previously_resolved_state() {
        let (mut styles, mut fonts) = resolver();
        let _ = styles.resolve(InteractionState::HOVERED, &mut fonts);
        styles.push(InteractionState::DEFAULT, "color: red");
        let hovered = styles.resolve(InteractionState::HOVERED, &mut fonts);
        assert_eq!(hovered.fg_color, Color::rgb8(255, 0, 0));
    }

    #[test]
    fn test_next_style_is_one_shot() {
        let (mut styles, mut fonts) = resolver();
        styles.set_next_style(InteractionState::DEFAULT, "width: 40px");
        assert_eq!(styles.resolve(InteractionState::DEFAULT, &mut fonts).width(), Some(40.0));

        styles.clear_overrides();
        assert_eq!(styles.resolve(InteractionState::DEFAULT, &mut fonts).width(), None);
    }

    #[test]
    fn test_bad_declarations_do_not_fail_resolution() {
        let (mut styles, mut fonts) = resolver();
        styles.push(InteractionState::DEFAULT, "nonsense: 1; color: white");
        assert_eq!(styles.resolve(InteractionState::DEFAULT, &mut fonts).fg_color, Color::WHITE);
    }

    #[test]
    fn test_default_override_does_not_stick_to_other_states() {
        let (mut styles, mut fonts) = resolver();
        styles.set_next_style(InteractionState::DEFAULT, "color: red; width: 77px");

        let first = styles.resolve(InteractionState::HOVERED, &mut fonts).clone();
        assert_eq!(first.width(), Some(77.0));
        assert_eq!(first.fg_color, Color::rgb8(255, 0, 0));

        styles.clear_overrides();
        let second = styles.resolve(InteractionState::HOVERED, &mut fonts);
        assert_eq!(second.width(), None);
        assert_eq!(second.fg_color, Color::BLACK);
    }

    #[test]
    fn test_push_ignores_pending_default_override() {
        let (mut styles, mut fonts) = resolver();
        styles.set_next_style(InteractionState::DEFAULT, "width: 77px");
        styles.push(InteractionState::HOVERED, "color: blue");
        styles.clear_overrides();

        let hovered = styles.resolve(InteractionState::HOVERED, &mut fonts);
        assert_eq!(hovered.width(), None);
        assert_eq!(hovered.fg_color, Color::rgb8(0, 0, 255));
    }
}

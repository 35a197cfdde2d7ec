//! `name: value;` style declarations.
//!
//! Full CSS parsing belongs to the host. This reader covers the properties the
//! resolver stores, turning each declaration into a typed [`StyleUpdate`]
//! that is then applied to a [`StyleDescriptor`]. Declarations and values are
//! tokenized with `cssparser`.

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

use crate::error::StyleError;
use crate::layout::Align;
use crate::primitives::{Color, Point};

use super::descriptor::{
    BorderSide, FontFlags, Gradient, Shadow, Spacing, StyleDescriptor, StyleProps,
};

/// Which sides a spacing or border update touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    All,
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    All,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// One typed property assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleUpdate {
    FgColor(Color),
    Background(Color),
    Gradient(Gradient),
    Width(f32),
    Height(f32),
    MinWidth(f32),
    MaxWidth(f32),
    MinHeight(f32),
    MaxHeight(f32),
    Margin(Edge, f32),
    Padding(Edge, f32),
    Border(Edge, BorderSide),
    BorderWidth(f32),
    BorderColor(Color),
    BorderRadius(Corner, f32),
    FontSize(f32),
    FontFamily(String),
    FontWeight(FontFlags),
    FontStyle(FontFlags),
    HAlign(Align),
    VAlign(Align),
    TextWrap(bool),
    TextOverflow(FontFlags),
    BoxShadow(Shadow),
}

// =========================================================================
// Declarations
// =========================================================================

/// Split `text` into `(name, value)` pairs. Names are lowercased; values are
/// the trimmed source text up to the terminating `;`.
///
/// Semicolons inside strings or functions do not end a declaration. A
/// declaration without a `name:` prefix is reported and skipped up to its `;`.
pub fn split_declarations(text: &str) -> Vec<Result<(String, &str), StyleError>> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut entries = Vec::new();

    while !parser.is_exhausted() {
        let start = parser.position();
        match parser.parse_until_after(Delimiter::Semicolon, declaration) {
            Ok(Some(entry)) => entries.push(Ok(entry)),
            Ok(None) => {}
            Err(_) => {
                let raw = parser.slice_from(start).trim().trim_end_matches(';').trim_end();
                entries.push(Err(StyleError::Malformed(raw.to_string())));
            }
        }
    }
    entries
}

fn declaration<'i>(
    input: &mut Parser<'i, '_>,
) -> Result<Option<(String, &'i str)>, ParseError<'i, ()>> {
    if input.is_exhausted() {
        return Ok(None);
    }
    let name = input.expect_ident()?.to_ascii_lowercase();
    input.expect_colon()?;
    let value_start = input.position();
    while input.next().is_ok() {}
    Ok(Some((name, input.slice_from(value_start).trim())))
}

/// Run `parse` over the whole of `value`. Leftover tokens reject the value.
fn parse_value<'i, T>(
    value: &'i str,
    parse: impl for<'t> FnOnce(&mut Parser<'i, 't>) -> Result<T, ParseError<'i, ()>>,
) -> Option<T> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    parser.parse_entirely(parse).ok()
}

// =========================================================================
// Values
// =========================================================================

/// A length in pixels or a fraction of the parent's extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthOrPercent {
    Length(f32),
    /// `50%` is `Fraction(0.5)`.
    Fraction(f32),
}

/// Parse a length: bare number, `px`, `pt` or `em` (relative to `em`).
pub fn parse_length(value: &str, em: f32) -> Option<f32> {
    parse_value(value, |input| length(input, em))
}

/// Parse a length or a percentage.
pub fn parse_length_or_percent(value: &str, em: f32) -> Option<LengthOrPercent> {
    parse_value(value, |input| {
        if let Ok(fraction) = input.try_parse(percentage) {
            return Ok(LengthOrPercent::Fraction(fraction));
        }
        length(input, em).map(LengthOrPercent::Length)
    })
}

/// Parse a single identifier, lowercased.
pub fn parse_keyword(value: &str) -> Option<String> {
    parse_value(value, keyword)
}

/// Parse `#hex`, `rgb()`/`rgba()` or a named color.
pub fn parse_color(value: &str) -> Option<Color> {
    parse_value(value, color)
}

/// Parse `linear-gradient(<direction>?, <color> [<pos>%]?, ...)`.
///
/// Stops without a position are spread evenly between their neighbours.
pub fn parse_gradient(value: &str) -> Option<Gradient> {
    parse_value(value, |input| {
        input.expect_function_matching("linear-gradient")?;
        input.parse_nested_block(gradient_arguments)
    })
}

fn keyword<'i>(input: &mut Parser<'i, '_>) -> Result<String, ParseError<'i, ()>> {
    Ok(input.expect_ident()?.to_ascii_lowercase())
}

fn length<'i>(input: &mut Parser<'i, '_>, em: f32) -> Result<f32, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match *input.next()? {
        Token::Number { value, .. } => Ok(value),
        Token::Dimension { value, ref unit, .. } => {
            let scale = match unit.to_ascii_lowercase().as_str() {
                "px" => 1.0,
                "pt" => 4.0 / 3.0,
                "em" => em,
                _ => return Err(location.new_custom_error(())),
            };
            Ok(value * scale)
        }
        _ => Err(location.new_custom_error(())),
    }
}

fn percentage<'i>(input: &mut Parser<'i, '_>) -> Result<f32, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match *input.next()? {
        Token::Percentage { unit_value, .. } => Ok(unit_value),
        _ => Err(location.new_custom_error(())),
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_ascii_lowercase().as_str() {
        "transparent" => Color::TRANSPARENT,
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb8(255, 0, 0),
        "green" => Color::rgb8(0, 128, 0),
        "blue" => Color::rgb8(0, 0, 255),
        "yellow" => Color::rgb8(255, 255, 0),
        "cyan" => Color::rgb8(0, 255, 255),
        "magenta" => Color::rgb8(255, 0, 255),
        "orange" => Color::rgb8(255, 165, 0),
        "purple" => Color::rgb8(128, 0, 128),
        "gray" | "grey" => Color::rgb8(128, 128, 128),
        "lightgray" | "lightgrey" => Color::rgb8(211, 211, 211),
        "darkgray" | "darkgrey" => Color::rgb8(169, 169, 169),
        _ => return None,
    };
    Some(color)
}

fn hex_color(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgb8(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn color<'i>(input: &mut Parser<'i, '_>) -> Result<Color, ParseError<'i, ()>> {
    let location = input.current_source_location();
    let parsed = match input.next()? {
        Token::Hash(hex) | Token::IDHash(hex) => hex_color(hex),
        Token::Ident(name) => named_color(name),
        Token::Function(name)
            if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
        {
            return input.parse_nested_block(rgb_arguments);
        }
        _ => None,
    };
    parsed.ok_or_else(|| location.new_custom_error(()))
}

fn rgb_arguments<'i>(input: &mut Parser<'i, '_>) -> Result<Color, ParseError<'i, ()>> {
    // (value, written as an integer)
    let mut args: Vec<(f32, bool)> = Vec::with_capacity(4);
    loop {
        let location = input.current_source_location();
        match *input.next()? {
            Token::Number {
                value, int_value, ..
            } => args.push((value, int_value.is_some())),
            _ => return Err(location.new_custom_error(())),
        }
        if input.is_exhausted() {
            break;
        }
        input.expect_comma()?;
    }
    if !(3..=4).contains(&args.len()) {
        return Err(input.new_custom_error(()));
    }

    // All channels written as fractions means 0.0-1.0 components.
    let relative = args[..3].iter().all(|&(_, integer)| !integer);
    let channel = |v: f32| if relative { v } else { v / 255.0 };
    let alpha = match args.get(3) {
        Some(&(a, _)) if a <= 1.0 => a,
        Some(&(a, _)) => a / 255.0,
        None => 1.0,
    };
    Ok(Color::rgba(channel(args[0].0), channel(args[1].0), channel(args[2].0), alpha))
}

fn gradient_direction<'i>(input: &mut Parser<'i, '_>) -> Result<f32, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match *input.next()? {
        Token::Dimension {
            value, ref unit, ..
        } if unit.eq_ignore_ascii_case("deg") => return Ok(value),
        Token::Ident(ref word) if word.eq_ignore_ascii_case("to") => {}
        _ => return Err(location.new_custom_error(())),
    }

    let location = input.current_source_location();
    match keyword(input)?.as_str() {
        "top" => Ok(0.0),
        "right" => Ok(90.0),
        "bottom" => Ok(180.0),
        "left" => Ok(270.0),
        _ => Err(location.new_custom_error(())),
    }
}

fn gradient_arguments<'i>(input: &mut Parser<'i, '_>) -> Result<Gradient, ParseError<'i, ()>> {
    let angle = match input.try_parse(gradient_direction) {
        Ok(angle) => {
            input.expect_comma()?;
            angle
        }
        Err(_) => 180.0,
    };

    let mut stops: Vec<(Option<f32>, Color)> = Vec::new();
    loop {
        let stop = color(input)?;
        stops.push((input.try_parse(percentage).ok(), stop));
        if input.is_exhausted() {
            break;
        }
        input.expect_comma()?;
    }
    if stops.len() < 2 {
        return Err(input.new_custom_error(()));
    }

    let last = stops.len() - 1;
    let resolved = stops
        .iter()
        .enumerate()
        .map(|(i, (pos, color))| (pos.unwrap_or(i as f32 / last as f32), *color))
        .collect();
    Ok(Gradient { angle, stops: resolved })
}

fn border_style<'i>(input: &mut Parser<'i, '_>) -> Result<Option<f32>, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match keyword(input)?.as_str() {
        "none" | "hidden" => Ok(Some(0.0)),
        "solid" | "dashed" | "dotted" | "double" => Ok(None),
        _ => Err(location.new_custom_error(())),
    }
}

fn border_side<'i>(input: &mut Parser<'i, '_>, em: f32) -> Result<BorderSide, ParseError<'i, ()>> {
    let mut side = BorderSide {
        thickness: 1.0,
        color: Color::BLACK,
    };
    while !input.is_exhausted() {
        if let Ok(width) = input.try_parse(|input| length(input, em)) {
            side.thickness = width;
        } else if let Ok(style) = input.try_parse(border_style) {
            if let Some(thickness) = style {
                side.thickness = thickness;
            }
        } else {
            side.color = color(input)?;
        }
    }
    Ok(side)
}

fn shadow<'i>(input: &mut Parser<'i, '_>, em: f32) -> Result<Shadow, ParseError<'i, ()>> {
    let mut lengths = Vec::with_capacity(4);
    let mut shade = Color::BLACK;
    while !input.is_exhausted() {
        match input.try_parse(|input| length(input, em)) {
            Ok(l) => lengths.push(l),
            Err(_) => shade = color(input)?,
        }
    }
    if lengths.len() < 2 {
        return Err(input.new_custom_error(()));
    }
    Ok(Shadow {
        offset: Point::new(lengths[0], lengths[1]),
        blur: lengths.get(2).copied().unwrap_or(0.0),
        spread: lengths.get(3).copied().unwrap_or(0.0),
        color: shade,
    })
}

fn font_size<'i>(input: &mut Parser<'i, '_>, em: f32) -> Result<f32, ParseError<'i, ()>> {
    if let Ok(size) = input.try_parse(|input| length(input, em)) {
        return Ok(size);
    }
    let location = input.current_source_location();
    let ratio = match keyword(input)?.as_str() {
        "xx-small" => 0.6,
        "x-small" => 0.75,
        "small" => 0.89,
        "medium" => 1.0,
        "large" => 1.2,
        "x-large" => 1.5,
        "xx-large" => 2.0,
        "xxx-large" => 3.0,
        _ => return Err(location.new_custom_error(())),
    };
    Ok(em * ratio)
}

fn font_weight<'i>(input: &mut Parser<'i, '_>) -> Result<FontFlags, ParseError<'i, ()>> {
    let location = input.current_source_location();
    let word = match *input.next()? {
        Token::Number {
            int_value: Some(weight),
            ..
        } => {
            return Ok(if weight >= 600 {
                FontFlags::BOLD
            } else if weight < 400 {
                FontFlags::LIGHT
            } else {
                FontFlags::empty()
            });
        }
        Token::Ident(ref word) => word.to_ascii_lowercase(),
        _ => return Err(location.new_custom_error(())),
    };
    match word.as_str() {
        "bold" | "bolder" => Ok(FontFlags::BOLD),
        "light" | "lighter" => Ok(FontFlags::LIGHT),
        "normal" => Ok(FontFlags::empty()),
        _ => Err(location.new_custom_error(())),
    }
}

/// First family of a list, quoted or as bare words. Fallbacks are ignored.
fn font_family<'i>(input: &mut Parser<'i, '_>) -> Result<String, ParseError<'i, ()>> {
    let family = match input.try_parse(|input| input.expect_string_cloned()) {
        Ok(quoted) => quoted.to_string(),
        Err(_) => {
            let mut words = vec![input.expect_ident_cloned()?.to_string()];
            while let Ok(word) = input.try_parse(|input| input.expect_ident_cloned()) {
                words.push(word.to_string());
            }
            words.join(" ")
        }
    };
    if !input.is_exhausted() {
        input.expect_comma()?;
        while input.next().is_ok() {}
    }
    Ok(family)
}

fn edge_of(suffix: &str) -> Option<Edge> {
    match suffix {
        "" => Some(Edge::All),
        "-top" => Some(Edge::Top),
        "-right" => Some(Edge::Right),
        "-bottom" => Some(Edge::Bottom),
        "-left" => Some(Edge::Left),
        _ => None,
    }
}

impl StyleUpdate {
    /// Parse one declaration. `em` is the font size `em` units resolve against.
    pub fn parse(name: &str, value: &str, em: f32) -> Result<Self, StyleError> {
        let name = name.to_ascii_lowercase();
        let invalid = || StyleError::invalid(&name, value);
        let length = || parse_length(value, em).ok_or_else(invalid);
        let color = || parse_color(value).ok_or_else(invalid);
        let keyword = parse_keyword(value).unwrap_or_default();

        let update = match name.as_str() {
            "color" => StyleUpdate::FgColor(color()?),
            "background" | "background-color" => match parse_gradient(value) {
                Some(gradient) => StyleUpdate::Gradient(gradient),
                None => StyleUpdate::Background(color()?),
            },
            "width" => StyleUpdate::Width(length()?),
            "height" => StyleUpdate::Height(length()?),
            "min-width" => StyleUpdate::MinWidth(length()?),
            "max-width" => StyleUpdate::MaxWidth(length()?),
            "min-height" => StyleUpdate::MinHeight(length()?),
            "max-height" => StyleUpdate::MaxHeight(length()?),
            "border-width" => StyleUpdate::BorderWidth(length()?),
            "border-color" => StyleUpdate::BorderColor(color()?),
            "border-radius" => StyleUpdate::BorderRadius(Corner::All, length()?),
            "border-top-left-radius" => StyleUpdate::BorderRadius(Corner::TopLeft, length()?),
            "border-top-right-radius" => StyleUpdate::BorderRadius(Corner::TopRight, length()?),
            "border-bottom-right-radius" => {
                StyleUpdate::BorderRadius(Corner::BottomRight, length()?)
            }
            "border-bottom-left-radius" => {
                StyleUpdate::BorderRadius(Corner::BottomLeft, length()?)
            }
            "font-size" => StyleUpdate::FontSize(
                parse_value(value, |input| font_size(input, em)).ok_or_else(invalid)?,
            ),
            "font-family" => {
                StyleUpdate::FontFamily(parse_value(value, font_family).ok_or_else(invalid)?)
            }
            "font-weight" => {
                StyleUpdate::FontWeight(parse_value(value, font_weight).ok_or_else(invalid)?)
            }
            "font-style" => match keyword.as_str() {
                "italic" | "oblique" => StyleUpdate::FontStyle(FontFlags::ITALIC),
                "normal" => StyleUpdate::FontStyle(FontFlags::empty()),
                _ => return Err(invalid()),
            },
            "text-align" | "alignment" => match keyword.as_str() {
                "left" => StyleUpdate::HAlign(Align::LEFT),
                "right" => StyleUpdate::HAlign(Align::RIGHT),
                "center" => StyleUpdate::HAlign(Align::HCENTER),
                "justify" => StyleUpdate::HAlign(Align::JUSTIFY_H),
                _ => return Err(invalid()),
            },
            "vertical-align" => match keyword.as_str() {
                "top" => StyleUpdate::VAlign(Align::TOP),
                "bottom" => StyleUpdate::VAlign(Align::BOTTOM),
                "center" | "middle" => StyleUpdate::VAlign(Align::VCENTER),
                _ => return Err(invalid()),
            },
            "text-wrap" => match keyword.as_str() {
                "wrap" | "normal" => StyleUpdate::TextWrap(true),
                "nowrap" => StyleUpdate::TextWrap(false),
                _ => return Err(invalid()),
            },
            "text-overflow" => match keyword.as_str() {
                "clip" => StyleUpdate::TextOverflow(FontFlags::empty()),
                "ellipsis" => StyleUpdate::TextOverflow(FontFlags::ELLIPSIS),
                "marquee" => StyleUpdate::TextOverflow(FontFlags::MARQUEE),
                _ => return Err(invalid()),
            },
            "box-shadow" => StyleUpdate::BoxShadow(
                parse_value(value, |input| shadow(input, em)).ok_or_else(invalid)?,
            ),
            other => {
                if let Some(edge) = other.strip_prefix("margin").and_then(edge_of) {
                    StyleUpdate::Margin(edge, length()?)
                } else if let Some(edge) = other.strip_prefix("padding").and_then(edge_of) {
                    StyleUpdate::Padding(edge, length()?)
                } else if let Some(edge) = other.strip_prefix("border").and_then(edge_of) {
                    let side = parse_value(value, |input| border_side(input, em));
                    StyleUpdate::Border(edge, side.ok_or_else(invalid)?)
                } else {
                    return Err(StyleError::UnknownProperty(other.to_string()));
                }
            }
        };
        Ok(update)
    }

    /// The property bit this update marks as specified.
    pub fn property(&self) -> StyleProps {
        match self {
            StyleUpdate::FgColor(_) => StyleProps::FG_COLOR,
            StyleUpdate::Background(_) | StyleUpdate::Gradient(_) => StyleProps::BACKGROUND,
            StyleUpdate::Width(_) => StyleProps::WIDTH,
            StyleUpdate::Height(_) => StyleProps::HEIGHT,
            StyleUpdate::MinWidth(_) => StyleProps::MIN_WIDTH,
            StyleUpdate::MaxWidth(_) => StyleProps::MAX_WIDTH,
            StyleUpdate::MinHeight(_) => StyleProps::MIN_HEIGHT,
            StyleUpdate::MaxHeight(_) => StyleProps::MAX_HEIGHT,
            StyleUpdate::Margin(..) => StyleProps::MARGIN,
            StyleUpdate::Padding(..) => StyleProps::PADDING,
            StyleUpdate::Border(..) | StyleUpdate::BorderWidth(_) | StyleUpdate::BorderColor(_) => {
                StyleProps::BORDER
            }
            StyleUpdate::BorderRadius(..) => StyleProps::BORDER_RADIUS,
            StyleUpdate::FontSize(_) => StyleProps::FONT_SIZE,
            StyleUpdate::FontFamily(_) => StyleProps::FONT_FAMILY,
            StyleUpdate::FontWeight(_) => StyleProps::FONT_WEIGHT,
            StyleUpdate::FontStyle(_) => StyleProps::FONT_STYLE,
            StyleUpdate::HAlign(_) => StyleProps::H_ALIGNMENT,
            StyleUpdate::VAlign(_) => StyleProps::V_ALIGNMENT,
            StyleUpdate::TextWrap(_) => StyleProps::TEXT_WRAP,
            StyleUpdate::TextOverflow(_) => StyleProps::TEXT_OVERFLOW,
            StyleUpdate::BoxShadow(_) => StyleProps::BOX_SHADOW,
        }
    }
}

/// Parse every declaration in `text`, collecting failures separately.
pub fn parse_style(text: &str, em: f32) -> (Vec<StyleUpdate>, Vec<StyleError>) {
    let mut updates = Vec::new();
    let mut errors = Vec::new();
    for entry in split_declarations(text) {
        match entry.and_then(|(name, value)| StyleUpdate::parse(&name, value, em)) {
            Ok(update) => updates.push(update),
            Err(e) => errors.push(e),
        }
    }
    (updates, errors)
}

impl StyleDescriptor {
    /// Assign one property and mark it specified.
    pub fn apply(&mut self, update: &StyleUpdate) {
        match update {
            StyleUpdate::FgColor(c) => self.fg_color = *c,
            StyleUpdate::Background(c) => {
                self.background = *c;
                self.gradient = None;
            }
            StyleUpdate::Gradient(g) => self.gradient = Some(g.clone()),
            StyleUpdate::Width(w) => self.dimension.width = *w,
            StyleUpdate::Height(h) => self.dimension.height = *h,
            StyleUpdate::MinWidth(w) => self.min_dim.width = *w,
            StyleUpdate::MaxWidth(w) => self.max_dim.width = *w,
            StyleUpdate::MinHeight(h) => self.min_dim.height = *h,
            StyleUpdate::MaxHeight(h) => self.max_dim.height = *h,
            StyleUpdate::Margin(edge, v) => set_edge(&mut self.margin, *edge, *v),
            StyleUpdate::Padding(edge, v) => set_edge(&mut self.padding, *edge, *v),
            StyleUpdate::Border(edge, side) => match edge {
                Edge::All => {
                    for s in self.border.sides_mut() {
                        *s = *side;
                    }
                }
                Edge::Top => self.border.top = *side,
                Edge::Right => self.border.right = *side,
                Edge::Bottom => self.border.bottom = *side,
                Edge::Left => self.border.left = *side,
            },
            StyleUpdate::BorderWidth(w) => {
                for s in self.border.sides_mut() {
                    s.thickness = *w;
                }
            }
            StyleUpdate::BorderColor(c) => {
                for s in self.border.sides_mut() {
                    s.color = *c;
                }
            }
            StyleUpdate::BorderRadius(corner, r) => match corner {
                Corner::All => self.border.radius = [*r; 4],
                Corner::TopLeft => self.border.radius[0] = *r,
                Corner::TopRight => self.border.radius[1] = *r,
                Corner::BottomRight => self.border.radius[2] = *r,
                Corner::BottomLeft => self.border.radius[3] = *r,
            },
            StyleUpdate::FontSize(s) => self.font.size = *s,
            StyleUpdate::FontFamily(f) => self.font.family = f.clone(),
            StyleUpdate::FontWeight(w) => {
                self.font.flags = (self.font.flags - FontFlags::WEIGHT) | *w
            }
            StyleUpdate::FontStyle(s) => {
                self.font.flags = (self.font.flags - FontFlags::ITALIC) | *s
            }
            StyleUpdate::HAlign(a) => self.alignment = (self.alignment - Align::HORIZONTAL) | *a,
            StyleUpdate::VAlign(a) => self.alignment = (self.alignment - Align::VERTICAL) | *a,
            StyleUpdate::TextWrap(wrap) => self.font.flags.set(FontFlags::NO_WRAP, !wrap),
            StyleUpdate::TextOverflow(o) => {
                self.font.flags = (self.font.flags - FontFlags::OVERFLOW) | *o
            }
            StyleUpdate::BoxShadow(s) => self.shadow = *s,
        }

        if matches!(
            update,
            StyleUpdate::FontSize(_)
                | StyleUpdate::FontFamily(_)
                | StyleUpdate::FontWeight(_)
                | StyleUpdate::FontStyle(_)
        ) {
            self.font.handle = None;
        }
        self.specified |= update.property();
    }

    /// Parse and apply `text`, returning the declarations that were skipped.
    pub fn apply_declarations(&mut self, text: &str, em: f32) -> Vec<StyleError> {
        let (updates, errors) = parse_style(text, em);
        for update in &updates {
            self.apply(update);
        }
        errors
    }
}

fn set_edge(spacing: &mut Spacing, edge: Edge, v: f32) {
    match edge {
        Edge::All => *spacing = Spacing::all(v),
        Edge::Top => spacing.top = v,
        Edge::Right => spacing.right = v,
        Edge::Bottom => spacing.bottom = v,
        Edge::Left => spacing.left = v,
    }
}

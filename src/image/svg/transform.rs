//! Per-icon geometry and style transformation.
//!
//! Grows the document to fit padding, a background shield and a halo, then
//! re-centers the icon path.
//!
//! ```text
//! ┌────────────── new size ──────────────┐
//! │ padding                              │
//! │   ┌──────── shield ────────┐         │
//! │   │ (shield - size) / 2    │         │
//! │   │     ┌── icon ──┐       │         │
//! │   │     │  halo    │       │         │
//! │   │     └──────────┘       │         │
//! │   └────────────────────────┘         │
//! └──────────────────────────────────────┘
//! ```

use super::doc::{Document, Element, Node, SvgError};
use super::style::InlineStyle;
use crate::config::{Halo, Shield, Style};

/// Result of transforming one icon.
#[derive(Debug, Clone)]
pub struct TransformedIcon {
    /// Edge length of the transformed document.
    pub size: u32,
    pub markup: String,
    /// Non-fatal problems, e.g. an adjusted shield size.
    pub warnings: Vec<String>,
}

/// Apply `style` to the icon document `markup` of nominal `size`.
///
/// The document must hold a `path` with id `icon_id`, and a `rect` with id
/// `canvas` unless the style drops the canvas anyway.
pub fn transform_icon(
    style: &Style,
    icon_id: &str,
    size: u32,
    markup: &str,
) -> Result<TransformedIcon, SvgError> {
    let mut doc = Document::parse(markup)?;
    let mut warnings = Vec::new();

    if locate_icon(&doc, icon_id).is_none() {
        return Err(SvgError::Missing(icon_id.to_string()));
    }
    if style.keeps_canvas() && locate_canvas(&doc).is_none() {
        return Err(SvgError::Missing("canvas".to_string()));
    }

    let padding = style.padding();
    let shield_size = match &style.shield {
        Some(shield) => shield_size_for(shield, size, &mut warnings),
        None => size,
    };
    let halo = style.halo.as_ref().filter(|halo| halo.width != 0.0);
    let halo_width = halo.map_or(0.0, |halo| halo.width);

    let increase = shield_size - size;
    let new_size = grown_size(size, increase, halo_width, padding)?;
    let offset = (f64::from(increase) / 2.0).max(halo_width) + f64::from(padding);

    if let Some(shield) = &style.shield {
        add_shield(&mut doc, shield, shield_size, padding);
    }
    if let Some(halo) = halo {
        add_halo(&mut doc, icon_id, halo, padding)?;
    }
    resize(&mut doc, new_size);

    let path = locate_icon(&doc, icon_id)
        .and_then(|path| doc.element_mut(&path))
        .ok_or_else(|| SvgError::Missing(icon_id.to_string()))?;
    path.set_attr("transform", format!("translate({offset},{offset})"));
    if let Some(fill) = style.fill {
        restyle(path, |inline| inline.set("fill", fill));
    }
    restyle(path, |inline| inline.remove_value("stroke", "none"));

    if !style.keeps_canvas()
        && let Some(canvas) = locate_canvas(&doc)
    {
        doc.remove(&canvas);
    }

    Ok(TransformedIcon {
        size: new_size,
        markup: doc.to_markup()?,
        warnings,
    })
}

/// `size` grown by the shield or halo, whichever is larger, plus padding on
/// both sides. Fractions are truncated.
fn grown_size(size: u32, increase: u32, halo_width: f64, padding: u32) -> Result<u32, SvgError> {
    let grow = f64::from(increase).max(halo_width * 2.0) + 2.0 * f64::from(padding);
    let new_size = (f64::from(size) + grow).trunc();
    if new_size > f64::from(u32::MAX) {
        return Err(SvgError::TooLarge(new_size));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let new_size = new_size as u32;
    Ok(new_size)
}

fn locate_icon(doc: &Document, icon_id: &str) -> Option<Vec<usize>> {
    doc.locate(|element| element.local_name() == "path" && element.id() == Some(icon_id))
}

fn locate_canvas(doc: &Document) -> Option<Vec<usize>> {
    doc.locate(|element| element.local_name() == "rect" && element.id() == Some("canvas"))
}

/// Name for a new element, reusing the root's namespace prefix.
fn element_name(doc: &Document, local: &str) -> String {
    match doc.root.name.split_once(':') {
        Some((prefix, _)) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

/// Edit the `style` attribute of `element` through an [`InlineStyle`].
fn restyle(element: &mut Element, edit: impl FnOnce(&mut InlineStyle)) {
    let Some(current) = element.attr("style") else {
        let mut inline = InlineStyle::default();
        edit(&mut inline);
        let style = inline.to_string();
        if !style.is_empty() {
            element.set_attr("style", style);
        }
        return;
    };
    let mut inline = InlineStyle::parse(current);
    edit(&mut inline);
    element.set_attr("style", inline.to_string());
}

/// Shield edge length: at least the icon size, and an even distance from it
/// so the icon stays centered on whole units.
fn shield_size_for(shield: &Shield, size: u32, warnings: &mut Vec<String>) -> u32 {
    let mut shield_size = match shield.size {
        Some(requested) if requested < size => {
            warnings.push(format!(
                "shield size {requested} is smaller than the icon size, using {size}"
            ));
            size
        }
        Some(requested) => requested,
        None => size,
    };

    if (shield_size - size) % 2 != 0 {
        warnings.push(format!(
            "shield size {shield_size} would not center the icon, using {}",
            shield_size - 1
        ));
        shield_size -= 1;
    }
    shield_size
}

fn add_shield(doc: &mut Document, shield: &Shield, shield_size: u32, padding: u32) {
    let mut style = InlineStyle::default().with("fill", shield.fill);
    match &shield.stroke {
        Some(stroke) => {
            style.set("stroke", stroke.fill);
            style.set("stroke-width", stroke.width);
        }
        None => style.set("stroke", "none"),
    }

    let mut rect = Element::new(element_name(doc, "rect"))
        .with_attr("x", padding.to_string())
        .with_attr("y", padding.to_string())
        .with_attr("width", shield_size.to_string())
        .with_attr("height", shield_size.to_string());
    if shield.rounded > 0 {
        rect.set_attr("rx", shield.rounded.to_string());
        rect.set_attr("ry", shield.rounded.to_string());
    }
    let rect = rect
        .with_attr("id", "shield")
        .with_attr("style", style.to_string());

    match locate_canvas(doc) {
        Some(canvas) => {
            doc.insert_sibling(&canvas, rect, true);
        }
        None => doc.root.children.insert(0, Node::Element(rect)),
    }
}

fn add_halo(doc: &mut Document, icon_id: &str, halo: &Halo, padding: u32) -> Result<(), SvgError> {
    let missing = || SvgError::Missing(icon_id.to_string());
    let path = locate_icon(doc, icon_id).ok_or_else(missing)?;
    let icon = doc.element(&path).ok_or_else(missing)?;

    let style = InlineStyle::default()
        .with("fill", halo.fill)
        .with("stroke", halo.fill)
        .with("stroke-width", halo.width * 2.0)
        .with("opacity", halo.opacity);
    let offset = f64::from(padding) + halo.width;

    let mut outline = icon.clone();
    outline.set_attr("id", "halo");
    outline.set_attr("style", style.to_string());
    outline.set_attr("transform", format!("translate({offset},{offset})"));

    doc.insert_sibling(&path, outline, false);
    Ok(())
}

/// Set the root viewBox, root size (when present) and canvas size.
fn resize(doc: &mut Document, size: u32) {
    let size = size.to_string();
    doc.root.set_attr("viewBox", format!("0 0 {size} {size}"));
    for dimension in ["width", "height"] {
        if doc.root.attr(dimension).is_some() {
            doc.root.set_attr(dimension, size.as_str());
        }
    }

    if let Some(canvas) = locate_canvas(doc).and_then(|path| doc.element_mut(&path)) {
        canvas.set_attr("width", size.as_str());
        canvas.set_attr("height", size.as_str());
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HexColor, Stroke};

    const BANK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
  <metadata/>
  <g id="layer1">
    <rect id="canvas" width="24" height="24" x="0" y="0" style="fill:none;stroke:none"/>
    <path id="bank" d="M 12 2 L 22 8 L 2 8 Z" style="fill:#444444;stroke:none"/>
  </g>
</svg>"#;

    fn transform(style: &Style) -> (TransformedIcon, Document) {
        let icon = transform_icon(style, "bank", 24, BANK).unwrap();
        let doc = Document::parse(&icon.markup).unwrap();
        (icon, doc)
    }

    fn by_id<'a>(doc: &'a Document, id: &str) -> &'a Element {
        let path = doc.locate_id(id).unwrap();
        doc.element(&path).unwrap()
    }

    fn shield(size: Option<u32>) -> Shield {
        Shield {
            size,
            rounded: 0,
            fill: HexColor::BLACK,
            stroke: None,
        }
    }

    #[test]
    fn test_plain_style_keeps_size() {
        let (icon, doc) = transform(&Style::default());
        assert_eq!(icon.size, 24);
        assert!(icon.warnings.is_empty());
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 24 24"));
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(0,0)"));
        assert_eq!(by_id(&doc, "bank").attr("style"), Some("fill:#444444"));
    }

    #[test]
    fn test_padding() {
        let style = Style {
            padding: Some(2),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        assert_eq!(icon.size, 28);
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 28 28"));
        assert_eq!(doc.root.attr("width"), Some("28"));
        assert_eq!(doc.root.attr("height"), Some("28"));

        let canvas = by_id(&doc, "canvas");
        assert_eq!(canvas.attr("width"), Some("28"));
        assert_eq!(canvas.attr("height"), Some("28"));
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(2,2)"));
    }

    #[test]
    fn test_shield() {
        let style = Style {
            shield: Some(Shield {
                fill: HexColor::parse("#112233").unwrap(),
                ..shield(Some(32))
            }),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        assert_eq!(icon.size, 32);
        assert!(icon.warnings.is_empty());

        let rect = by_id(&doc, "shield");
        assert_eq!(rect.local_name(), "rect");
        assert_eq!(rect.attr("x"), Some("0"));
        assert_eq!(rect.attr("y"), Some("0"));
        assert_eq!(rect.attr("width"), Some("32"));
        assert_eq!(rect.attr("height"), Some("32"));
        assert_eq!(rect.attr("rx"), None);
        assert_eq!(rect.attr("style"), Some("fill:#112233;stroke:none"));
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(4,4)"));
    }

    #[test]
    fn test_shield_follows_canvas() {
        let style = Style {
            shield: Some(shield(Some(28))),
            ..Default::default()
        };
        let (_, doc) = transform(&style);
        let canvas = doc.locate_id("canvas").unwrap();
        let rect = doc.locate_id("shield").unwrap();
        let icon = doc.locate_id("bank").unwrap();
        assert_eq!(rect[..rect.len() - 1], canvas[..canvas.len() - 1]);
        assert_eq!(rect.last().unwrap(), &(canvas.last().unwrap() + 1));
        assert_eq!(icon.last().unwrap(), &(rect.last().unwrap() + 1));
    }

    #[test]
    fn test_shield_rounded_with_stroke_and_padding() {
        let style = Style {
            padding: Some(1),
            shield: Some(Shield {
                rounded: 3,
                stroke: Some(Stroke {
                    fill: HexColor::WHITE,
                    width: 1.5,
                }),
                ..shield(Some(30))
            }),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        assert_eq!(icon.size, 32);

        let rect = by_id(&doc, "shield");
        assert_eq!(rect.attr("x"), Some("1"));
        assert_eq!(rect.attr("rx"), Some("3"));
        assert_eq!(rect.attr("ry"), Some("3"));
        assert_eq!(
            rect.attr("style"),
            Some("fill:#000000;stroke:#ffffff;stroke-width:1.5")
        );
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(4,4)"));
    }

    #[test]
    fn test_odd_shield_increase_is_made_even() {
        let style = Style {
            shield: Some(shield(Some(31))),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        assert_eq!(icon.size, 30);
        assert_eq!(icon.warnings.len(), 1);
        assert_eq!(by_id(&doc, "shield").attr("width"), Some("30"));
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(3,3)"));
    }

    #[test]
    fn test_small_shield_uses_icon_size() {
        let style = Style {
            shield: Some(shield(Some(20))),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        assert_eq!(icon.size, 24);
        assert_eq!(icon.warnings.len(), 1);
        assert_eq!(by_id(&doc, "shield").attr("width"), Some("24"));
    }

    #[test]
    fn test_shield_without_size_matches_icon() {
        let style = Style {
            shield: Some(shield(None)),
            ..Default::default()
        };
        let (icon, _) = transform(&style);
        assert_eq!(icon.size, 24);
        assert!(icon.warnings.is_empty());
    }

    #[test]
    fn test_halo() {
        let style = Style {
            halo: Some(Halo {
                fill: HexColor::WHITE,
                width: 1.0,
                opacity: 0.3,
            }),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        assert_eq!(icon.size, 26);

        let halo = by_id(&doc, "halo");
        assert_eq!(halo.attr("d"), Some("M 12 2 L 22 8 L 2 8 Z"));
        assert_eq!(
            halo.attr("style"),
            Some("fill:#ffffff;stroke:#ffffff;stroke-width:2;opacity:0.3")
        );
        assert_eq!(halo.attr("transform"), Some("translate(1,1)"));
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(1,1)"));

        let halo_path = doc.locate_id("halo").unwrap();
        let icon_path = doc.locate_id("bank").unwrap();
        assert_eq!(icon_path.last().unwrap(), &(halo_path.last().unwrap() + 1));
    }

    #[test]
    fn test_zero_width_halo_is_skipped() {
        let style = Style {
            halo: Some(Halo {
                fill: HexColor::WHITE,
                width: 0.0,
                opacity: 0.3,
            }),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        assert_eq!(icon.size, 24);
        assert!(doc.locate_id("halo").is_none());
    }

    #[test]
    fn test_halo_with_shield_and_padding() {
        let style = Style {
            padding: Some(2),
            shield: Some(shield(Some(32))),
            halo: Some(Halo {
                fill: HexColor::WHITE,
                width: 1.0,
                opacity: 0.3,
            }),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        // 24 + max(8, 2) + 2 * 2
        assert_eq!(icon.size, 36);
        assert_eq!(by_id(&doc, "shield").attr("x"), Some("2"));
        // halo: padding + width; icon: max(8 / 2, width) + padding
        assert_eq!(by_id(&doc, "halo").attr("transform"), Some("translate(3,3)"));
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(6,6)"));
    }

    #[test]
    fn test_halo_with_padding() {
        let style = Style {
            padding: Some(3),
            halo: Some(Halo {
                fill: HexColor::WHITE,
                width: 1.5,
                opacity: 0.3,
            }),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        // 24 + 3 + 2 * 3
        assert_eq!(icon.size, 33);
        assert_eq!(by_id(&doc, "halo").attr("transform"), Some("translate(4.5,4.5)"));
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(4.5,4.5)"));
    }

    #[test]
    fn test_oversized_result_is_rejected() {
        let padded = Style {
            padding: Some(3_000_000_000),
            ..Default::default()
        };
        let err = transform_icon(&padded, "bank", 24, BANK).unwrap_err();
        assert!(matches!(err, SvgError::TooLarge(_)));

        let haloed = Style {
            halo: Some(Halo {
                fill: HexColor::WHITE,
                width: 1e12,
                opacity: 0.3,
            }),
            ..Default::default()
        };
        let err = transform_icon(&haloed, "bank", 24, BANK).unwrap_err();
        assert!(matches!(err, SvgError::TooLarge(_)));

        let shielded = Style {
            shield: Some(shield(Some(u32::MAX))),
            padding: Some(1),
            ..Default::default()
        };
        assert!(transform_icon(&shielded, "bank", 24, BANK).is_err());
    }

    #[test]
    fn test_halo_wider_than_shield_increase() {
        let style = Style {
            shield: Some(shield(Some(26))),
            halo: Some(Halo {
                fill: HexColor::WHITE,
                width: 2.0,
                opacity: 0.5,
            }),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        // max(26 - 24, 2 * 2) = 4
        assert_eq!(icon.size, 28);
        assert_eq!(by_id(&doc, "bank").attr("transform"), Some("translate(2,2)"));
    }

    #[test]
    fn test_fill() {
        let style = Style {
            fill: HexColor::parse("#734a08"),
            ..Default::default()
        };
        let (_, doc) = transform(&style);
        assert_eq!(by_id(&doc, "bank").attr("style"), Some("fill:#734a08"));
    }

    #[test]
    fn test_fill_appended_when_missing() {
        let markup = BANK.replace(r#" style="fill:#444444;stroke:none""#, "");
        let style = Style {
            fill: HexColor::parse("#734a08"),
            ..Default::default()
        };
        let icon = transform_icon(&style, "bank", 24, &markup).unwrap();
        let doc = Document::parse(&icon.markup).unwrap();
        assert_eq!(by_id(&doc, "bank").attr("style"), Some("fill:#734a08"));
    }

    #[test]
    fn test_remove_canvas() {
        let style = Style {
            canvas: Some(false),
            ..Default::default()
        };
        let (icon, doc) = transform(&style);
        assert!(doc.locate_id("canvas").is_none());

        // already canvas-less documents pass through
        let again = transform_icon(&style, "bank", 24, &icon.markup).unwrap();
        assert_eq!(again.size, 24);
    }

    #[test]
    fn test_shield_without_canvas() {
        let markup = BANK.replace(
            r#"<rect id="canvas" width="24" height="24" x="0" y="0" style="fill:none;stroke:none"/>"#,
            "",
        );
        let style = Style {
            canvas: Some(false),
            shield: Some(shield(Some(28))),
            ..Default::default()
        };
        let icon = transform_icon(&style, "bank", 24, &markup).unwrap();
        let doc = Document::parse(&icon.markup).unwrap();
        assert_eq!(doc.locate_id("shield").unwrap(), vec![0]);
        assert_eq!(icon.size, 28);
    }

    #[test]
    fn test_missing_elements() {
        let result = transform_icon(&Style::default(), "cafe", 24, BANK);
        assert!(matches!(result, Err(SvgError::Missing(id)) if id == "cafe"));

        let markup = BANK.replace("id=\"canvas\"", "id=\"background\"");
        let result = transform_icon(&Style::default(), "bank", 24, &markup);
        assert!(matches!(result, Err(SvgError::Missing(id)) if id == "canvas"));
    }

    #[test]
    fn test_malformed_markup() {
        let result = transform_icon(&Style::default(), "bank", 24, "<svg><g></svg>");
        assert!(result.is_err());
    }

    #[test]
    fn test_prefixed_document() {
        let markup = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" viewBox="0 0 12 12">
  <svg:rect id="canvas" width="12" height="12"/>
  <svg:path id="dot" d="M 6 6 Z"/>
</svg:svg>"#;
        let style = Style {
            shield: Some(shield(Some(14))),
            ..Default::default()
        };
        let icon = transform_icon(&style, "dot", 12, markup).unwrap();
        let doc = Document::parse(&icon.markup).unwrap();
        assert_eq!(by_id(&doc, "shield").name, "svg:rect");
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 14 14"));
        assert_eq!(doc.root.attr("width"), None);
    }
}

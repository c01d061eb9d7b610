//! Sprite sheet packing.
//!
//! Packs exported icons into a fixed grid inside one SVG document. Every cell
//! has the same size, so an icon's position depends only on its rank in
//! file-name order and the column count.
//!
//! ```text
//! outer_padding
//!   ┌──────────┬──────────┬──────────┐
//!   │ icon_pad │          │          │
//!   │  ┌────┐  │  ┌────┐  │  ┌────┐  │
//!   │  │ r0 │  │  │ r1 │  │  │ r2 │  │   cell = max size + 2 * icon_padding
//!   │  └────┘  │  └────┘  │  └────┘  │
//!   ├──────────┼──────────┼──────────┤
//!   │  ┌────┐  │          │          │
//!   │  │ r3 │  │          │          │
//!   │  └────┘  │          │          │
//!   └──────────┴──────────┴──────────┘
//! ```

use super::svg::{Document, Element, Node};
use crate::config::SpriteConfig;
use crate::icon::ExportedIcon;
use crate::utils::{path::remove_dir_if_empty, plural::plural_count};
use crate::{debug, log};
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, Event};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root children that are not copied into the sheet.
const SKIPPED_ELEMENTS: &[&str] = &["metadata", "defs"];

// ============================================================================
// layout
// ============================================================================

/// Grid geometry of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteLayout {
    pub cols: u32,
    pub outer_padding: u32,
    pub icon_padding: u32,
    /// Edge length of one grid cell.
    pub cell: u32,
    pub count: u32,
}

impl SpriteLayout {
    /// Layout for `count` icons no larger than `icon_size`.
    ///
    /// `None` when the sheet would not fit in `u32` coordinates.
    pub fn new(config: &SpriteConfig, icon_size: u32, count: u32) -> Option<Self> {
        let cols = config.cols.max(1);
        let cell = config
            .icon_padding
            .checked_mul(2)
            .and_then(|padding| padding.checked_add(icon_size))?;
        let layout = Self {
            cols,
            outer_padding: config.outer_padding,
            icon_padding: config.icon_padding,
            cell,
            count,
        };

        // Positions stay below these edges.
        let margin = config.outer_padding.checked_mul(2)?;
        margin.checked_add(cols.checked_mul(cell)?)?;
        margin.checked_add(layout.rows().checked_mul(cell)?)?;
        Some(layout)
    }

    pub fn rows(&self) -> u32 {
        self.count.div_ceil(self.cols)
    }

    pub fn width(&self) -> u32 {
        2 * self.outer_padding + self.cols * self.cell
    }

    pub fn height(&self) -> u32 {
        2 * self.outer_padding + self.rows() * self.cell
    }

    /// Top-left corner of the icon with the given rank.
    pub fn position(&self, rank: u32) -> (u32, u32) {
        let origin = self.outer_padding + self.icon_padding;
        let col = rank % self.cols;
        let row = rank / self.cols;
        (origin + col * self.cell, origin + row * self.cell)
    }
}

// ============================================================================
// manifest
// ============================================================================

/// JSON manifest written next to the sheet.
#[derive(Debug, Serialize)]
pub struct SpriteManifest {
    pub width: u32,
    pub height: u32,
    pub icons: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// packing
// ============================================================================

/// Files produced by [`pack_sprite`].
#[derive(Debug)]
pub struct PackedSprite {
    pub svg_path: PathBuf,
    pub manifest_path: Option<PathBuf>,
    pub layout: SpriteLayout,
    pub entries: Vec<ManifestEntry>,
}

/// Pack `icons` into `<output>/<filename>.svg`.
///
/// Packed per-icon files are deleted along with directories they leave
/// empty (never `output` itself). Unreadable icons are skipped. Returns
/// `None` when nothing could be packed.
pub fn pack_sprite(
    icons: &[ExportedIcon],
    config: &SpriteConfig,
    output: &Path,
) -> Result<Option<PackedSprite>> {
    let mut ordered: Vec<&ExportedIcon> = icons.iter().collect();
    ordered.sort_by(|a, b| {
        a.file_name()
            .cmp(b.file_name())
            .then_with(|| a.dir.cmp(&b.dir))
    });

    let loaded: Vec<(&ExportedIcon, Document)> = ordered
        .into_iter()
        .filter_map(|icon| match load_icon(&icon.path) {
            Ok(doc) => Some((icon, doc)),
            Err(e) => {
                log!("warning"; "skipping {} in sprite: {e:#}", icon.path.display());
                None
            }
        })
        .collect();

    if loaded.is_empty() {
        log!("warning"; "no icons to pack, sprite not written");
        return Ok(None);
    }

    let icon_size = loaded.iter().map(|(icon, _)| icon.size).max().unwrap_or(0);
    let count = u32::try_from(loaded.len()).context("too many icons for one sprite")?;
    let Some(layout) = SpriteLayout::new(config, icon_size, count) else {
        log!(
            "warning";
            "sprite of {} at {icon_size}px with {} columns is too large, sprite not written",
            plural_count(loaded.len(), "icon"),
            config.cols
        );
        return Ok(None);
    };

    let mut root = Element::new("svg")
        .with_attr("xmlns", "http://www.w3.org/2000/svg")
        .with_attr("version", "1.1")
        .with_attr("width", layout.width().to_string())
        .with_attr("height", layout.height().to_string())
        .with_attr(
            "viewBox",
            format!("0 0 {} {}", layout.width(), layout.height()),
        );

    if let Some(background) = config.background {
        let rect = Element::new("rect")
            .with_attr("x", "0")
            .with_attr("y", "0")
            .with_attr("width", layout.width().to_string())
            .with_attr("height", layout.height().to_string())
            .with_attr("style", format!("fill:{background}"));
        root.children.push(Node::Element(rect));
    }

    let mut entries = Vec::with_capacity(loaded.len());
    for (rank, (icon, doc)) in (0..count).zip(loaded) {
        let (x, y) = layout.position(rank);
        root.children
            .push(Node::Element(icon_group(&icon.id, doc, x, y)));
        entries.push(ManifestEntry {
            id: icon.id.clone(),
            x,
            y,
            width: icon.size,
            height: icon.size,
        });
        remove_packed(&icon.path, output);
    }

    let svg_path = output.join(format!("{}.svg", config.filename));
    let sheet = Document {
        prolog: vec![Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))],
        root,
    };
    let markup = sheet.to_markup().context("failed to serialize sprite")?;
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    fs::write(&svg_path, markup)
        .with_context(|| format!("failed to write {}", svg_path.display()))?;

    let manifest_path = if config.manifest {
        let path = output.join(format!("{}.json", config.filename));
        write_manifest(&path, &layout, &entries)?;
        Some(path)
    } else {
        None
    };

    log!(
        "sprite";
        "packed {} into {}x{} ({} columns)",
        plural_count(entries.len(), "icon"),
        layout.width(),
        layout.height(),
        layout.cols
    );

    Ok(Some(PackedSprite {
        svg_path,
        manifest_path,
        layout,
        entries,
    }))
}

fn load_icon(path: &Path) -> Result<Document> {
    let markup = fs::read_to_string(path).context("failed to read")?;
    Ok(Document::parse(&markup)?)
}

/// `<g id=... transform=translate(x,y)>` holding the icon's drawable content.
///
/// Prefixed namespace declarations of the icon root move onto the group so
/// editor elements and attributes (`sodipodi:*`, `inkscape:*`) stay bound.
fn icon_group(id: &str, doc: Document, x: u32, y: u32) -> Element {
    let mut group = Element::new("g");
    for (name, value) in &doc.root.attrs {
        if name.starts_with("xmlns:") {
            group.set_attr(name, value.as_str());
        }
    }
    let mut group = group
        .with_attr("id", id)
        .with_attr("transform", format!("translate({x},{y})"));
    group.children = doc
        .root
        .children
        .into_iter()
        .filter(|node| match node {
            Node::Element(element) => !SKIPPED_ELEMENTS.contains(&element.local_name()),
            Node::Other(_) => true,
        })
        .collect();
    group
}

/// Delete a packed icon file and its directory once empty.
fn remove_packed(path: &Path, output: &Path) {
    if let Err(e) = fs::remove_file(path) {
        log!("warning"; "failed to remove {}: {e}", path.display());
        return;
    }
    if let Some(dir) = path.parent()
        && dir != output
        && remove_dir_if_empty(dir)
    {
        debug!("sprite"; "removed empty {}", dir.display());
    }
}

fn write_manifest(path: &Path, layout: &SpriteLayout, entries: &[ManifestEntry]) -> Result<()> {
    let manifest = SpriteManifest {
        width: layout.width(),
        height: layout.height(),
        icons: entries.to_vec(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::{NsReader, name::ResolveResult};
    use tempfile::TempDir;

    fn config() -> SpriteConfig {
        SpriteConfig::default()
    }

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <metadata><title>icon</title></metadata>
  <defs/>
  <rect id="canvas" width="24" height="24"/>
  <path id="ID" d="M 0 0 Z"/>
</svg>"#;

    fn write_icon(output: &Path, dir: &str, id: &str, size: u32) -> ExportedIcon {
        let dir_path = output.join(dir);
        fs::create_dir_all(&dir_path).unwrap();
        let path = dir_path.join(format!("{id}-{size}.svg"));
        fs::write(&path, ICON.replace("ID", id)).unwrap();
        ExportedIcon {
            id: id.to_string(),
            size,
            dir: dir.to_string(),
            path,
        }
    }

    #[test]
    fn test_layout_dimensions() {
        // 13 icons of 24px, 12 columns, paddings 4
        let layout = SpriteLayout::new(&config(), 24, 13).unwrap();
        assert_eq!(layout.cell, 32);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.width(), 8 + 12 * 32);
        assert_eq!(layout.height(), 72);
    }

    #[test]
    fn test_layout_single_row() {
        let layout = SpriteLayout::new(&config(), 24, 12).unwrap();
        assert_eq!(layout.rows(), 1);
        assert_eq!(layout.height(), 40);
    }

    #[test]
    fn test_positions() {
        let layout = SpriteLayout::new(
            &SpriteConfig {
                cols: 3,
                ..config()
            },
            24,
            7,
        )
        .unwrap();
        assert_eq!(layout.position(0), (8, 8));
        assert_eq!(layout.position(1), (40, 8));
        assert_eq!(layout.position(2), (72, 8));
        assert_eq!(layout.position(3), (8, 40));
        assert_eq!(layout.position(6), (8, 72));
    }

    #[test]
    fn test_zero_paddings() {
        let layout = SpriteLayout::new(
            &SpriteConfig {
                cols: 2,
                outer_padding: 0,
                icon_padding: 0,
                ..config()
            },
            10,
            3,
        )
        .unwrap();
        assert_eq!(layout.width(), 20);
        assert_eq!(layout.height(), 20);
        assert_eq!(layout.position(2), (0, 10));
    }

    #[test]
    fn test_layout_too_large() {
        let wide = SpriteConfig {
            cols: u32::MAX,
            ..config()
        };
        assert!(SpriteLayout::new(&wide, 24, 13).is_none());

        let padded = SpriteConfig {
            outer_padding: u32::MAX / 2 + 1,
            ..config()
        };
        assert!(SpriteLayout::new(&padded, 24, 1).is_none());

        let big_cell = SpriteConfig {
            icon_padding: u32::MAX / 2,
            ..config()
        };
        assert!(SpriteLayout::new(&big_cell, 24, 1).is_none());

        let tall = SpriteConfig {
            cols: 1,
            ..config()
        };
        assert!(SpriteLayout::new(&tall, 1 << 20, 1 << 13).is_none());
        assert!(SpriteLayout::new(&tall, 1 << 20, 1 << 11).is_some());
    }

    #[test]
    fn test_pack_too_large_keeps_icons() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path();
        let icons = vec![write_icon(output, "amenity", "bank", 24)];
        let config = SpriteConfig {
            outer_padding: u32::MAX,
            ..config()
        };

        assert!(pack_sprite(&icons, &config, output).unwrap().is_none());
        assert!(output.join("amenity/bank-24.svg").exists());
        assert!(!output.join("sprite.svg").exists());
    }

    #[test]
    fn test_pack_keeps_namespace_declarations() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path();
        let path = output.join("bank-24.svg");
        fs::write(
            &path,
            r#"<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     viewBox="0 0 24 24">
  <sodipodi:namedview id="base" inkscape:zoom="1"/>
  <rect id="canvas" width="24" height="24"/>
  <path id="bank" d="M 0 0 Z" inkscape:connector-curvature="0"/>
</svg>"#,
        )
        .unwrap();
        let icons = vec![ExportedIcon {
            id: "bank".to_string(),
            size: 24,
            dir: String::new(),
            path,
        }];

        let packed = pack_sprite(&icons, &config(), output).unwrap().unwrap();
        let markup = fs::read_to_string(&packed.svg_path).unwrap();
        assert_namespaces_bound(&markup);

        let sheet = Document::parse(&markup).unwrap();
        let group = sheet.root.child_elements().next().unwrap();
        assert_eq!(
            group.attr("xmlns:inkscape"),
            Some("http://www.inkscape.org/namespaces/inkscape")
        );
        assert_eq!(group.id(), Some("bank"));
    }

    /// Every prefixed element and attribute name resolves to a namespace.
    fn assert_namespaces_bound(markup: &str) {
        let mut reader = NsReader::from_str(markup);
        loop {
            let (ns, event) = reader.read_resolved_event().unwrap();
            assert!(
                !matches!(ns, ResolveResult::Unknown(_)),
                "unbound element prefix in {event:?}"
            );
            match event {
                Event::Start(e) | Event::Empty(e) => {
                    for attr in e.attributes() {
                        let attr = attr.unwrap();
                        let (ns, _) = reader.resolve_attribute(attr.key);
                        assert!(
                            !matches!(ns, ResolveResult::Unknown(_)),
                            "unbound attribute prefix in {e:?}"
                        );
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
    }

    #[test]
    fn test_pack_orders_by_file_name() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path();
        let icons = vec![
            write_icon(output, "shop", "cafe", 24),
            write_icon(output, "amenity", "bank", 24),
            write_icon(output, "amenity", "zoo", 24),
        ];

        let packed = pack_sprite(&icons, &config(), output).unwrap().unwrap();
        let ids: Vec<_> = packed.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["bank", "cafe", "zoo"]);
        assert_eq!((packed.entries[1].x, packed.entries[1].y), (40, 8));
        assert_eq!(packed.svg_path, output.join("sprite.svg"));
        assert!(packed.manifest_path.is_none());

        let sheet = Document::parse(&fs::read_to_string(&packed.svg_path).unwrap()).unwrap();
        assert_eq!(sheet.root.attr("width"), Some("392"));
        assert_eq!(sheet.root.attr("height"), Some("40"));

        let groups: Vec<_> = sheet.root.child_elements().collect();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].id(), Some("bank"));
        assert_eq!(groups[0].attr("transform"), Some("translate(8,8)"));
        let children: Vec<_> = groups[0].child_elements().map(Element::local_name).collect();
        assert_eq!(children, ["rect", "path"]);
    }

    #[test]
    fn test_pack_removes_icon_files_and_empty_dirs() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path();
        let icons = vec![
            write_icon(output, "amenity", "bank", 24),
            write_icon(output, "", "cafe", 24),
        ];
        fs::write(output.join("amenity").join("keep.txt"), "").unwrap();
        let shop = write_icon(output, "shop", "bakery", 24);

        pack_sprite(&[icons, vec![shop]].concat(), &config(), output).unwrap();

        assert!(!output.join("amenity/bank-24.svg").exists());
        assert!(output.join("amenity").exists());
        assert!(!output.join("cafe-24.svg").exists());
        assert!(!output.join("shop").exists());
        assert!(output.exists());
    }

    #[test]
    fn test_pack_background_and_manifest() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path();
        let icons = vec![write_icon(output, "amenity", "bank", 24)];
        let config = SpriteConfig {
            background: crate::config::HexColor::parse("#ffffff"),
            filename: "maki".to_string(),
            manifest: true,
            ..config()
        };

        let packed = pack_sprite(&icons, &config, output).unwrap().unwrap();
        assert_eq!(packed.svg_path, output.join("maki.svg"));

        let sheet = Document::parse(&fs::read_to_string(&packed.svg_path).unwrap()).unwrap();
        let first = sheet.root.child_elements().next().unwrap();
        assert_eq!(first.local_name(), "rect");
        assert_eq!(first.attr("style"), Some("fill:#ffffff"));

        let manifest_path = packed.manifest_path.unwrap();
        assert_eq!(manifest_path, output.join("maki.json"));
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(manifest_path).unwrap()).unwrap();
        assert_eq!(manifest["width"], 392);
        assert_eq!(manifest["height"], 40);
        assert_eq!(manifest["icons"][0]["id"], "bank");
        assert_eq!(manifest["icons"][0]["x"], 8);
        assert_eq!(manifest["icons"][0]["width"], 24);
    }

    #[test]
    fn test_pack_nothing() {
        let tmp = TempDir::new().unwrap();
        let packed = pack_sprite(&[], &config(), tmp.path()).unwrap();
        assert!(packed.is_none());
        assert!(!tmp.path().join("sprite.svg").exists());
    }

    #[test]
    fn test_pack_skips_unreadable_icons() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path();
        let good = write_icon(output, "", "bank", 24);
        let broken = ExportedIcon {
            id: "cafe".to_string(),
            size: 24,
            dir: String::new(),
            path: output.join("cafe-24.svg"),
        };

        let packed = pack_sprite(&[broken, good], &config(), output).unwrap().unwrap();
        assert_eq!(packed.layout.count, 1);
        assert_eq!(packed.entries.len(), 1);
        assert_eq!(packed.entries[0].id, "bank");
    }
}

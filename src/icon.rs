//! Icon catalog and glyph types.
//!
//! A glyph is an ordered list of drawing primitives defined on the 24x24
//! Lucide design grid. The bundled catalog is parsed once, on first access,
//! and is shared read-only by every render afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Side length of the square grid every glyph is designed on.
pub const DESIGN_GRID: f64 = 24.0;

/// Meta-entry of the icon module that is not an icon.
pub const RESERVED_NAME: &str = "Icon";

/// Attribute keys that belong to the component runtime, not to the drawing.
const INTERNAL_ATTRIBUTES: [&str; 3] = ["children", "ref", "key"];

const BUNDLED_CATALOG: &str = include_str!("../assets/lucide-icons.json");

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());

/// Unprefixed XML attribute names.
static ATTRIBUTE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").unwrap());

static BUNDLED: Lazy<IconCatalog> = Lazy::new(|| {
    IconCatalog::from_json(BUNDLED_CATALOG).unwrap_or_else(|err| {
        log::error!("bundled icon catalog is unreadable, continuing without icons: {err}");
        IconCatalog::default()
    })
});

static EMPTY_GLYPH: IconGlyph = IconGlyph {
    primitives: Vec::new(),
};

/// Returns true if `name` can be used as a catalog key.
pub fn is_valid_icon_name(name: &str) -> bool {
    name != RESERVED_NAME && IDENTIFIER_RE.is_match(name)
}

// ============================================================================
// Primitives
// ============================================================================

/// The SVG element a primitive is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Path,
    Line,
    Circle,
    Ellipse,
    Rect,
    Polyline,
    Polygon,
}

impl PrimitiveKind {
    /// Returns the element name used in vector markup.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Line => "line",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Rect => "rect",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
        }
    }
}

/// An attribute value as it appears in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One drawing instruction of a glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct IconPrimitive {
    pub kind: PrimitiveKind,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl IconPrimitive {
    pub fn new<K, V>(kind: PrimitiveKind, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        Self {
            kind,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Attributes that should reach the output markup.
    ///
    /// Runtime-only keys (`children`, `ref`, `key`) are skipped, and so are
    /// keys that are not plain XML attribute names.
    pub fn drawing_attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .filter(|(key, _)| !INTERNAL_ATTRIBUTES.contains(key))
            .filter(|(key, _)| {
                let valid = ATTRIBUTE_NAME_RE.is_match(key);
                if !valid {
                    log::warn!("dropping {} attribute {key:?}", self.kind.tag());
                }
                valid
            })
    }
}

/// Catalog form of a primitive: `["path", { "d": "..." }]`.
#[derive(Deserialize)]
struct RawNode(PrimitiveKind, BTreeMap<String, AttrValue>);

impl From<RawNode> for IconPrimitive {
    fn from(node: RawNode) -> Self {
        Self {
            kind: node.0,
            attributes: node.1,
        }
    }
}

// ============================================================================
// IconGlyph
// ============================================================================

/// A resolved icon: primitives in paint order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconGlyph {
    pub primitives: Vec<IconPrimitive>,
}

impl IconGlyph {
    pub fn new(primitives: Vec<IconPrimitive>) -> Self {
        Self { primitives }
    }

    /// The glyph used for "no icon": draws nothing.
    pub fn empty() -> &'static IconGlyph {
        &EMPTY_GLYPH
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconPrimitive> {
        self.primitives.iter()
    }
}

// ============================================================================
// IconCatalog
// ============================================================================

#[derive(Deserialize)]
struct RawCatalog {
    icons: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

/// Name to glyph lookup table.
///
/// Names are capitalized identifiers; aliases share the glyph of their
/// target. [`names`](Self::names) is kept in a stable, case-insensitive
/// order for browsing.
#[derive(Debug, Clone, Default)]
pub struct IconCatalog {
    glyphs: Vec<IconGlyph>,
    index: HashMap<String, usize>,
    names: Vec<String>,
}

impl IconCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide catalog built from the bundled Lucide set.
    pub fn bundled() -> &'static IconCatalog {
        &BUNDLED
    }

    /// Parses a catalog in Lucide icon-node form.
    ///
    /// ```json
    /// {
    ///   "icons": { "Plus": [["path", { "d": "M5 12h14" }]] },
    ///   "aliases": { "Add": "Plus" }
    /// }
    /// ```
    ///
    /// Entries with invalid names or unreadable node lists are skipped, not
    /// rejected. Only a document that is not a catalog at all is an error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let mut catalog = Self::new();

        for (name, nodes) in raw.icons {
            let nodes = match Vec::<RawNode>::deserialize(nodes) {
                Ok(nodes) => nodes,
                Err(err) => {
                    log::warn!("skipping icon {name:?}: {err}");
                    continue;
                }
            };
            let glyph = IconGlyph::new(nodes.into_iter().map(IconPrimitive::from).collect());
            if !catalog.insert(name.clone(), glyph) {
                log::warn!("skipping icon with invalid name {name:?}");
            }
        }
        for (alias, target) in raw.aliases {
            if !catalog.alias(alias.clone(), &target) {
                log::warn!("skipping alias {alias:?} -> {target:?}");
            }
        }

        log::debug!("loaded icon catalog with {} names", catalog.len());
        Ok(catalog)
    }

    /// Adds or replaces a glyph. Returns false if the name is not allowed.
    pub fn insert(&mut self, name: impl Into<String>, glyph: IconGlyph) -> bool {
        let name = name.into();
        if !is_valid_icon_name(&name) {
            return false;
        }
        if let Some(&slot) = self.index.get(&name) {
            self.glyphs[slot] = glyph;
            return true;
        }
        self.glyphs.push(glyph);
        self.index.insert(name.clone(), self.glyphs.len() - 1);
        self.insert_name(name);
        true
    }

    /// Registers `alias` as another name for `target`.
    ///
    /// Returns false if the alias is not a valid name, already exists, or
    /// the target is unknown.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> bool {
        let alias = alias.into();
        if !is_valid_icon_name(&alias) || self.index.contains_key(&alias) {
            return false;
        }
        let Some(&slot) = self.index.get(target) else {
            return false;
        };
        self.index.insert(alias.clone(), slot);
        self.insert_name(alias);
        true
    }

    fn insert_name(&mut self, name: String) {
        let key = sort_key(&name);
        let pos = self
            .names
            .binary_search_by(|probe| sort_key(probe).cmp(&key))
            .unwrap_or_else(|pos| pos);
        self.names.insert(pos, name);
    }

    /// Looks up a glyph by name. Empty or unknown names give `None`.
    pub fn resolve(&self, id: &str) -> Option<&IconGlyph> {
        self.index.get(id).map(|&slot| &self.glyphs[slot])
    }

    /// Like [`resolve`](Self::resolve), but a miss yields the empty glyph.
    pub fn lookup(&self, id: Option<&str>) -> &IconGlyph {
        id.and_then(|id| self.resolve(id))
            .unwrap_or(&EMPTY_GLYPH)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All names, aliases included, in browse order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Names containing `query`, case-insensitively. A blank query matches all.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        self.names
            .iter()
            .filter(|name| query.is_empty() || name.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn sort_key(name: &str) -> (String, &str) {
    (name.to_lowercase(), name)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_glyph() -> IconGlyph {
        IconGlyph::new(vec![
            IconPrimitive::new(PrimitiveKind::Path, [("d", "M5 12h14")]),
            IconPrimitive::new(PrimitiveKind::Path, [("d", "M12 5v14")]),
        ])
    }

    #[test]
    fn bundled_catalog_loads() {
        let catalog = IconCatalog::bundled();
        assert!(!catalog.is_empty());
        assert!(catalog.contains("House"));
        assert!(catalog.contains("Plus"));
        assert!(!catalog.contains(RESERVED_NAME));
    }

    #[test]
    fn bundled_names_are_sorted_identifiers() {
        let names = IconCatalog::bundled().names();
        for name in names {
            assert!(is_valid_icon_name(name), "{name} is not a valid identifier");
        }
        for pair in names.windows(2) {
            assert!(
                pair[0].to_lowercase() <= pair[1].to_lowercase(),
                "{} should sort before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn alias_shares_target_glyph() {
        let catalog = IconCatalog::bundled();
        let home = catalog.resolve("Home").unwrap();
        let house = catalog.resolve("House").unwrap();
        assert_eq!(home, house);
        assert!(catalog.names().iter().any(|n| n == "Home"));
    }

    #[test]
    fn primitive_order_is_preserved() {
        let plus = IconCatalog::bundled().resolve("Plus").unwrap();
        let ds: Vec<String> = plus
            .iter()
            .map(|p| p.attributes["d"].to_string())
            .collect();
        assert_eq!(ds, ["M5 12h14", "M12 5v14"]);
    }

    #[test]
    fn empty_and_unknown_ids_resolve_to_nothing() {
        let catalog = IconCatalog::bundled();
        assert!(catalog.resolve("").is_none());
        assert!(catalog.resolve("NoSuchIcon").is_none());
        assert!(catalog.lookup(None).is_empty());
        assert!(catalog.lookup(Some("")).is_empty());
        assert!(catalog.lookup(Some("NoSuchIcon")).is_empty());
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(!is_valid_icon_name("Icon"));
        assert!(!is_valid_icon_name("createLucideIcon"));
        assert!(!is_valid_icon_name("Arrow-Up"));
        assert!(!is_valid_icon_name(""));
        assert!(is_valid_icon_name("ArrowUp2"));

        let mut catalog = IconCatalog::new();
        assert!(!catalog.insert("icons", plus_glyph()));
        assert!(!catalog.insert("Icon", plus_glyph()));
        assert!(catalog.is_empty());
    }

    #[test]
    fn from_json_skips_bad_entries() {
        let json = r#"{
            "icons": {
                "Plus": [["path", { "d": "M5 12h14" }], ["path", { "d": "M12 5v14" }]],
                "Icon": [["circle", { "cx": 12, "cy": 12, "r": 10 }]],
                "lowercase": [["line", { "x1": 0, "y1": 0, "x2": 1, "y2": 1 }]]
            },
            "aliases": { "Add": "Plus", "Missing": "Nowhere" }
        }"#;
        let catalog = IconCatalog::from_json(json).unwrap();
        assert_eq!(catalog.names(), ["Add", "Plus"]);
        assert_eq!(catalog.resolve("Add"), Some(&plus_glyph()));
        assert!(catalog.resolve("Missing").is_none());
    }

    #[test]
    fn numeric_attributes_keep_their_value() {
        let json = r#"{ "icons": { "Dot": [["circle", { "cx": 7.5, "cy": 12, "r": 0.5 }]] } }"#;
        let catalog = IconCatalog::from_json(json).unwrap();
        let dot = &catalog.resolve("Dot").unwrap().primitives[0];
        assert_eq!(dot.kind, PrimitiveKind::Circle);
        assert_eq!(dot.attributes["cx"].to_string(), "7.5");
        assert_eq!(dot.attributes["cy"].to_string(), "12");
        assert_eq!(dot.attributes["r"].to_string(), "0.5");
    }

    #[test]
    fn internal_attributes_are_not_drawn() {
        let primitive = IconPrimitive::new(
            PrimitiveKind::Path,
            [("d", "M5 12h14"), ("key", "svg-0"), ("children", ""), ("ref", "x")],
        );
        let keys: Vec<&str> = primitive.drawing_attributes().map(|(k, _)| k).collect();
        assert_eq!(keys, ["d"]);
    }

    #[test]
    fn malformed_attribute_names_are_not_drawn() {
        let primitive = IconPrimitive::new(
            PrimitiveKind::Path,
            [("d", "M5 12h14"), ("bad key", "1"), ("on<x", "2"), ("xlink:href", "#a")],
        );
        let keys: Vec<&str> = primitive.drawing_attributes().map(|(k, _)| k).collect();
        assert_eq!(keys, ["d"]);

        let stroke = IconPrimitive::new(PrimitiveKind::Line, [("stroke-width", 1.0), ("x1", 2.0)]);
        assert_eq!(stroke.drawing_attributes().count(), 2);
    }

    #[test]
    fn unknown_primitive_skips_only_that_icon() {
        let json = r#"{
            "icons": {
                "Group": [["g", {}], ["path", { "d": "M1 1h2" }]],
                "Broken": "not a node list",
                "Plus": [["path", { "d": "M5 12h14" }], ["path", { "d": "M12 5v14" }]]
            },
            "aliases": { "Cluster": "Group" }
        }"#;
        let catalog = IconCatalog::from_json(json).unwrap();
        assert_eq!(catalog.names(), ["Plus"]);
        assert!(IconCatalog::from_json(r#"{"icons": []}"#).is_err());
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = IconCatalog::bundled();
        let hits = catalog.search("  ARROW ");
        assert!(hits.contains(&"ArrowUp"));
        assert!(hits.iter().all(|n| n.to_lowercase().contains("arrow")));
        assert_eq!(catalog.search("").len(), catalog.len());
    }

    #[test]
    fn insert_replaces_existing_glyph() {
        let mut catalog = IconCatalog::new();
        catalog.insert("Plus", IconGlyph::default());
        catalog.insert("Plus", plus_glyph());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve("Plus").unwrap().len(), 2);
    }
}

//! Deterministic colour assignment for tags created without an explicit colour.
//!
//! The name is lower-cased before hashing so `Bug` and `bug` get the same colour,
//! matching the case-insensitive tag identity.

/// Tag colour palette offered by the card composer.
const PALETTE: &[&str] = &[
    "#FF6B6B", // coral
    "#51CF66", // green
    "#4FD1FF", // sky
    "#FFD93D", // yellow
    "#A78BFA", // lavender
    "#FFA94D", // orange
    "#F472B6", // pink
    "#22D3EE", // cyan
    "#2DD4BF", // teal
    "#06B6D4", // ocean
    "#EF4444", // red
    "#10B981", // emerald
    "#8B5CF6", // violet
    "#EC4899", // magenta
    "#F59E0B", // amber
];

/// Return a deterministic palette colour (with leading `#`) for a tag name.
pub fn auto_color(name: &str) -> &'static str {
    let hash = fnv1a(&name.trim().to_lowercase());
    PALETTE[(hash as usize) % PALETTE.len()]
}

/// FNV-1a hash (32-bit)
fn fnv1a(s: &str) -> u32 {
    s.bytes().fold(0x811c_9dc5, |hash, byte| {
        (hash ^ byte as u32).wrapping_mul(0x0100_0193)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_color_ignores_case() {
        assert_eq!(auto_color("Bug"), auto_color("bug"));
        assert_eq!(auto_color(" DOCS "), auto_color("docs"));
    }

    #[test]
    fn test_auto_color_is_from_palette() {
        for name in ["bug", "feature", "docs", "refactor", "frontend", "v2"] {
            let color = auto_color(name);
            assert!(PALETTE.contains(&color));
            assert_eq!(color.len(), 7);
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_palette_coverage() {
        let seen: std::collections::HashSet<_> =
            (0..100).map(|i| auto_color(&format!("tag-{i}"))).collect();
        assert!(seen.len() >= 8, "only hit {} palette entries", seen.len());
    }
}

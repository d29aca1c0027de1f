// ABOUTME: Named two-zone layouts for common LED wall configurations.
// ABOUTME: Built-in layouts can be shadowed or extended from the config file.

use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};

/// A named pair of geometries, one per zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPreset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub zone1: Geometry,
    pub zone2: Geometry,
}

impl LayoutPreset {
    fn builtin(name: &str, description: &str, zone1: Geometry, zone2: Geometry) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            zone1,
            zone2,
        }
    }
}

/// Layouts available without any configuration, sized for a 1920x1080 display.
pub fn builtin_presets() -> Vec<LayoutPreset> {
    vec![
        LayoutPreset::builtin(
            "fullscreen-zone1",
            "Full screen on zone 1 only",
            Geometry::new(0, 0, 1920, 1080),
            Geometry::new(0, 0, 0, 0),
        ),
        LayoutPreset::builtin(
            "fullscreen-zone2",
            "Full screen on zone 2 only",
            Geometry::new(0, 0, 0, 0),
            Geometry::new(0, 0, 1920, 1080),
        ),
        LayoutPreset::builtin(
            "side-by-side",
            "Side by side split (50/50)",
            Geometry::new(0, 0, 960, 1080),
            Geometry::new(960, 0, 960, 1080),
        ),
        LayoutPreset::builtin(
            "top-bottom",
            "Top and bottom split (50/50)",
            Geometry::new(0, 0, 1920, 540),
            Geometry::new(0, 540, 1920, 540),
        ),
        LayoutPreset::builtin(
            "pip-bottom-right",
            "Picture-in-picture (zone 2 in bottom right)",
            Geometry::new(0, 0, 1920, 1080),
            Geometry::new(1440, 810, 480, 270),
        ),
        LayoutPreset::builtin(
            "main-monitor",
            "Main content (70%) + monitor feed (30%)",
            Geometry::new(0, 0, 1344, 1080),
            Geometry::new(1344, 0, 576, 1080),
        ),
        LayoutPreset::builtin(
            "quad-top",
            "Quad layout - top two zones",
            Geometry::new(0, 0, 960, 540),
            Geometry::new(960, 0, 960, 540),
        ),
    ]
}

/// Built-in layouts followed by configured ones; a configured layout replaces
/// a built-in of the same name in place.
pub fn merge_presets(custom: &[LayoutPreset]) -> Vec<LayoutPreset> {
    let mut presets = builtin_presets();
    for preset in custom {
        match presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset.clone(),
            None => presets.push(preset.clone()),
        }
    }
    presets
}

pub fn find_preset<'a>(presets: &'a [LayoutPreset], name: &str) -> Option<&'a LayoutPreset> {
    presets.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets() {
        let presets = builtin_presets();
        assert_eq!(presets.len(), 7);

        let side = find_preset(&presets, "side-by-side").unwrap();
        assert_eq!(side.zone1, Geometry::new(0, 0, 960, 1080));
        assert_eq!(side.zone2, Geometry::new(960, 0, 960, 1080));

        assert!(find_preset(&presets, "missing").is_none());
    }

    #[test]
    fn test_custom_preset_shadows_builtin() {
        let custom = vec![
            LayoutPreset {
                name: "side-by-side".to_string(),
                description: "Portrait halves".to_string(),
                zone1: Geometry::new(0, 0, 540, 1920),
                zone2: Geometry::new(540, 0, 540, 1920),
            },
            LayoutPreset {
                name: "lobby".to_string(),
                description: String::new(),
                zone1: Geometry::new(0, 0, 1280, 720),
                zone2: Geometry::new(1280, 0, 640, 720),
            },
        ];

        let presets = merge_presets(&custom);
        assert_eq!(presets.len(), 8);
        assert_eq!(
            find_preset(&presets, "side-by-side").unwrap().description,
            "Portrait halves"
        );
        // Shadowing keeps the built-in's position in the list
        assert_eq!(presets[2].name, "side-by-side");
        assert_eq!(presets.last().unwrap().name, "lobby");
    }
}

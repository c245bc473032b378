//! Shape libraries listed in the library panel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibrarySourceType {
    Builtin,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub license: String,
    pub source_type: LibrarySourceType,
    pub item_count: u32,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution_url: Option<String>,
}

const ATTRIBUTION: &str = "https://excalidraw.com/libraries";

fn builtin(id: &str, name: &str, description: &str, item_count: u32, enabled: bool) -> LibraryEntry {
    LibraryEntry {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        license: "MIT".to_string(),
        source_type: LibrarySourceType::Builtin,
        item_count,
        enabled,
        attribution_url: Some(ATTRIBUTION.to_string()),
    }
}

/// Libraries bundled with the app.
pub fn builtin_libraries() -> Vec<LibraryEntry> {
    vec![
        builtin(
            "flowchart-basics",
            "Flowchart Basics",
            "Core shapes for rapid process mapping.",
            42,
            true,
        ),
        builtin(
            "sticky-notes",
            "Stickies & Callouts",
            "Colorful sticky notes and callouts for ideation.",
            28,
            true,
        ),
        builtin(
            "simple-uml",
            "Simple UML",
            "Lightweight UML components for diagrams.",
            35,
            false,
        ),
        builtin(
            "generic-icons",
            "Generic Icons",
            "Utility icons for quick annotations and flows.",
            56,
            false,
        ),
    ]
}

/// Copy of `libraries` with `id`'s enabled flag flipped. Unknown ids change nothing.
pub fn toggle_library(libraries: &[LibraryEntry], id: &str) -> Vec<LibraryEntry> {
    libraries
        .iter()
        .map(|library| {
            if library.id == id {
                LibraryEntry {
                    enabled: !library.enabled,
                    ..library.clone()
                }
            } else {
                library.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_libraries() {
        let libs = builtin_libraries();
        assert_eq!(libs.len(), 4);
        assert_eq!(libs.iter().filter(|l| l.enabled).count(), 2);
    }

    #[test]
    fn test_toggle_library() {
        let libs = builtin_libraries();
        let toggled = toggle_library(&libs, "simple-uml");
        assert!(toggled.iter().find(|l| l.id == "simple-uml").unwrap().enabled);
        assert!(!libs.iter().find(|l| l.id == "simple-uml").unwrap().enabled);
        assert_eq!(toggle_library(&libs, "missing"), libs);
    }
}

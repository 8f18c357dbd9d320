//! Static catalog of the hardware parts shown on the bench.

use crate::error::{FolioError, Result};
use fnv::FnvHashMap;
use std::sync::OnceLock;

/// Descriptive metadata for one selectable hardware component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub asset_path: &'static str,
}

/// Catalog entries in bench order (left to right).
pub static PARTS: [PartDescriptor; 4] = [
    PartDescriptor {
        id: "stm32",
        name: "STM32 Microcontroller",
        description: "This is the STM32 microcontroller used to run the system.",
        asset_path: "/stm32.glb",
    },
    PartDescriptor {
        id: "lcd",
        name: "LCD Display",
        description: "This is the LCD screen used to display the game state.",
        asset_path: "/lcd.glb",
    },
    PartDescriptor {
        id: "joystick",
        name: "Potentiometer Joystick",
        description: "This is a potentiometer-based joystick for controlling input.",
        asset_path: "/joystick.glb",
    },
    PartDescriptor {
        id: "breadboard",
        name: "Breadboard",
        description: "This breadboard connects and powers all the components.",
        asset_path: "/breadboard.glb",
    },
];

fn catalog() -> &'static FnvHashMap<&'static str, &'static PartDescriptor> {
    static CATALOG: OnceLock<FnvHashMap<&'static str, &'static PartDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| PARTS.iter().map(|p| (p.id, p)).collect())
}

/// Look up a part by id.
pub fn part(id: &str) -> Result<&'static PartDescriptor> {
    catalog()
        .get(id)
        .copied()
        .ok_or_else(|| FolioError::UnknownPart(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_four_unique_ids() {
        assert_eq!(catalog().len(), 4);
    }

    #[test]
    fn lookup_returns_matching_entry() {
        let lcd = part("lcd").unwrap();
        assert_eq!(lcd.name, "LCD Display");
        assert_eq!(lcd.asset_path, "/lcd.glb");
    }

    #[test]
    fn unknown_id_is_an_error() {
        let err = part("oscilloscope").unwrap_err();
        assert_eq!(err.to_string(), "unknown part id: oscilloscope");
    }
}

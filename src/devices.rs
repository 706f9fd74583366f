//! Known device screen resolutions.
//!
//! Used to fill the preview's device picker and to name the device a custom
//! resolution belongs to. Resolutions are physical pixels in the device's
//! natural orientation; lookups accept either orientation.

use serde::Serialize;

use crate::config::{HEIGHT_RANGE, WIDTH_RANGE};
use DeviceCategory::{Desktop, Foldable, Laptop, Phone, Tablet};

/// Device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Phone,
    Tablet,
    Laptop,
    Desktop,
    Foldable,
}

/// A named screen resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Device {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub category: DeviceCategory,
}

const fn device(name: &'static str, width: u32, height: u32, category: DeviceCategory) -> Device {
    Device {
        name,
        width,
        height,
        category,
    }
}

/// Every known resolution, newest models first. Resolutions are unique.
pub const DEVICES: &[Device] = &[
    device("iPhone 17 Pro Max / 16 Pro Max", 1320, 2868, Phone),
    device("iPhone 17 Pro / 17 Plus / 15 Pro Max", 1290, 2796, Phone),
    device("iPhone 17 / 16 / 15 / 14 Pro", 1179, 2556, Phone),
    device("iPhone 16 Pro", 1206, 2622, Phone),
    device("iPhone 14 Plus / 13 Pro Max", 1284, 2778, Phone),
    device("iPhone 14 / 13 / 12", 1170, 2532, Phone),
    device("iPhone 13 mini / Samsung S25", 1080, 2340, Phone),
    device("iPhone 11 Pro Max / XS Max", 1242, 2688, Phone),
    device("iPhone 11 Pro / XS / X", 1125, 2436, Phone),
    device("iPhone 11 / XR", 828, 1792, Phone),
    device("iPhone SE / 8", 750, 1334, Phone),
    device("iPhone 8 Plus", 1080, 1920, Phone),
    device("Samsung S25 Ultra / OnePlus 13", 1440, 3200, Phone),
    device("Google Pixel 9 Pro XL", 1440, 3120, Phone),
    device("Google Pixel 9 Pro / 9", 1080, 2424, Phone),
    device("Xiaomi 15 Pro / 14 Ultra", 1440, 3168, Phone),
    device("Xiaomi 15 / 14", 1200, 2670, Phone),
    device("vivo X200 Pro", 1264, 2780, Phone),
    device("iPad Pro 13\" (M4)", 2064, 2752, Tablet),
    device("iPad Pro 11\"", 1668, 2388, Tablet),
    device("iPad Pro 12.9\"", 2048, 2732, Tablet),
    device("iPad Air (M2)", 1640, 2360, Tablet),
    device("iPad mini (A17 Pro)", 1488, 2266, Tablet),
    device("iPad Air 5 / iPad 10", 1620, 2160, Tablet),
    device("MacBook Pro 14\"", 3024, 1964, Laptop),
    device("MacBook Pro 16\"", 3456, 2234, Laptop),
    device("MacBook Air 15\"", 2880, 1864, Laptop),
    device("MacBook Air 13\"", 2560, 1664, Laptop),
    device("iMac 27\" / Studio Display", 5120, 2880, Desktop),
    device("iMac 24\"", 4480, 2520, Desktop),
    device("Pro Display XDR", 4096, 2304, Desktop),
    device("Galaxy Z Fold 6 (inner)", 1812, 2176, Foldable),
    device("Galaxy Z Fold 6 (cover)", 904, 2316, Foldable),
    device("Galaxy Z Flip 6", 1080, 2640, Foldable),
    device("Pixel 9 Pro Fold (inner)", 2076, 2152, Foldable),
    device("OnePlus Open (inner)", 2156, 2156, Foldable),
    device("Xiaomi MIX Fold 4 (inner)", 1116, 2484, Foldable),
    device("Huawei Mate X6 (inner)", 1316, 2832, Foldable),
];

impl Device {
    /// Whether wallpapers can be rendered at exactly this resolution.
    pub fn is_renderable(&self) -> bool {
        (WIDTH_RANGE.0..=WIDTH_RANGE.1).contains(&self.width)
            && (HEIGHT_RANGE.0..=HEIGHT_RANGE.1).contains(&self.height)
    }
}

/// Devices offered for rendering; sizes outside the accepted range would
/// be clamped to a different aspect ratio.
pub fn renderable_devices() -> impl Iterator<Item = &'static Device> {
    DEVICES.iter().filter(|d| d.is_renderable())
}

/// Find the device with this resolution, in either orientation.
pub fn detect_device(width: u32, height: u32) -> Option<&'static Device> {
    DEVICES.iter().find(|d| {
        (d.width == width && d.height == height) || (d.width == height && d.height == width)
    })
}

/// Human-readable name for a resolution.
///
/// Known devices use their table name; anything else is classified by size
/// and aspect ratio.
pub fn describe(width: u32, height: u32) -> &'static str {
    if let Some(device) = detect_device(width, height) {
        return device.name;
    }

    match width {
        w if w >= 5120 => return "5K display",
        w if w >= 3840 => return "4K UHD display",
        w if w >= 3440 => return "UltraWide display",
        w if w >= 2560 => return "QHD display",
        w if w >= 1920 => return "Full HD display",
        _ => {}
    }

    if height == 0 {
        return "Unknown device";
    }
    let aspect = f64::from(width) / f64::from(height);
    if aspect > 2.0 {
        "Ultra-wide screen"
    } else if aspect > 0.4 && aspect < 0.6 {
        "Phone"
    } else if aspect > 1.3 && aspect < 1.4 {
        "Tablet"
    } else {
        "Unknown device"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_detect_either_orientation() {
        let portrait = detect_device(1179, 2556).unwrap();
        let landscape = detect_device(2556, 1179).unwrap();
        assert_eq!(portrait, landscape);
        assert_eq!(portrait.category, DeviceCategory::Phone);

        assert_eq!(detect_device(1964, 3024).unwrap().category, DeviceCategory::Laptop);
        assert!(detect_device(1000, 1000).is_none());
    }

    #[test]
    fn test_resolutions_are_unique() {
        let mut seen = HashSet::new();
        for d in DEVICES {
            let key = (d.width.min(d.height), d.width.max(d.height));
            assert!(seen.insert(key), "duplicate resolution for {}", d.name);
        }
    }

    #[test]
    fn test_default_size_is_known() {
        assert!(detect_device(crate::config::DEFAULT_WIDTH, crate::config::DEFAULT_HEIGHT).is_some());
    }

    #[test]
    fn test_describe_fallbacks() {
        assert_eq!(describe(5120, 2880), "iMac 27\" / Studio Display");
        assert_eq!(describe(3840, 2160), "4K UHD display");
        assert_eq!(describe(1920, 1200), "Full HD display");
        // a known size names its device in either orientation
        assert_eq!(describe(1920, 1080), "iPhone 8 Plus");
        assert_eq!(describe(1000, 2000), "Phone");
        assert_eq!(describe(1000, 1000), "Unknown device");
        assert_eq!(describe(0, 0), "Unknown device");
    }

    #[test]
    fn test_renderable_devices_survive_decoding() {
        for d in renderable_devices() {
            let config = crate::codec::decode(&format!("w={}&h={}", d.width, d.height));
            assert_eq!((config.width, config.height), (d.width, d.height), "{}", d.name);
        }
    }

    #[test]
    fn test_oversized_devices_are_not_offered() {
        let offered: Vec<_> = renderable_devices().map(|d| d.name).collect();
        assert!(!offered.contains(&"iMac 27\" / Studio Display"));
        assert!(!offered.contains(&"iMac 24\""));
        assert!(offered.contains(&"Pro Display XDR"));
        assert_eq!(offered.len(), DEVICES.len() - 2);
    }

    #[test]
    fn test_serializes_for_picker() {
        let json = serde_json::to_string(&DEVICES[0]).unwrap();
        assert!(json.contains("\"width\":1320"));
        assert!(json.contains("\"category\":\"phone\""));
    }
}

use crate::shared::constants::DEFAULT_KEY_COLOR;

use super::hsv::Hsv;

/// The reference color removed from the foreground, as three channel values
/// in the same order as the frames it is compared against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyColor {
    pub channels: [u8; 3],
}

impl KeyColor {
    pub fn new(c0: u8, c1: u8, c2: u8) -> Self {
        Self {
            channels: [c0, c1, c2],
        }
    }

    pub fn to_hsv(self) -> Hsv {
        let [r, g, b] = self.channels;
        Hsv::from_rgb(r, g, b)
    }
}

impl Default for KeyColor {
    fn default() -> Self {
        Self {
            channels: DEFAULT_KEY_COLOR,
        }
    }
}

impl From<[u8; 3]> for KeyColor {
    fn from(channels: [u8; 3]) -> Self {
        Self { channels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pure_green() {
        assert_eq!(KeyColor::default(), KeyColor::new(0, 255, 0));
    }

    #[test]
    fn test_to_hsv() {
        let hsv = KeyColor::new(0, 255, 0).to_hsv();
        assert_eq!(hsv.h, 60);
        assert_eq!(hsv.s, 255);
        assert_eq!(hsv.v, 255);
    }

    #[test]
    fn test_from_array() {
        let key: KeyColor = [1, 2, 3].into();
        assert_eq!(key.channels, [1, 2, 3]);
    }
}

//! Extended colour scanner for SGR parameter lists
//!
//! `38` and `48` open an extended colour for the foreground or background.
//! The next parameter selects the colour space: `5` takes one xterm palette
//! index, `2` takes a red, green and blue triple. Anything out of place drops
//! the pending colour without raising an error.

use super::state::{Color, Layer};

/// Result of feeding one parameter to the scanner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The parameter is not part of an extended colour
    Pass,
    /// The parameter was swallowed by a pending extended colour
    Consumed,
    /// The parameter completed an extended colour
    Color(Layer, Color),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Space {
    #[default]
    Unselected,
    Xterm,
    Rgb,
}

/// Scan state, reset at the start of every SGR parameter list
#[derive(Clone, Debug, Default)]
pub struct Extension {
    layer: Option<Layer>,
    space: Space,
    red: Option<u8>,
    green: Option<u8>,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True while a colour is open but not yet complete.
    pub fn is_pending(&self) -> bool {
        self.layer.is_some()
    }

    /// Feed the next parameter of the list.
    pub fn scan(&mut self, param: u8) -> Step {
        let Some(layer) = self.layer else {
            return match param {
                38 => self.open(Layer::Foreground),
                48 => self.open(Layer::Background),
                _ => Step::Pass,
            };
        };

        match self.space {
            Space::Unselected => {
                match param {
                    5 => self.space = Space::Xterm,
                    2 => self.space = Space::Rgb,
                    _ => self.reset(),
                }
                Step::Consumed
            }
            Space::Xterm => {
                self.reset();
                Step::Color(layer, Color::Xterm(param))
            }
            Space::Rgb => match (self.red, self.green) {
                (None, _) => {
                    self.red = Some(param);
                    Step::Consumed
                }
                (Some(_), None) => {
                    self.green = Some(param);
                    Step::Consumed
                }
                (Some(r), Some(g)) => {
                    self.reset();
                    Step::Color(layer, Color::Rgb(r, g, param))
                }
            },
        }
    }

    fn open(&mut self, layer: Layer) -> Step {
        self.reset();
        self.layer = Some(layer);
        Step::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(params: &[u8]) -> Vec<Step> {
        let mut ext = Extension::new();
        params.iter().map(|&p| ext.scan(p)).collect()
    }

    #[test]
    fn test_plain_params_pass() {
        assert_eq!(feed(&[0, 1, 31]), vec![Step::Pass; 3]);
    }

    #[test]
    fn test_xterm_foreground() {
        let steps = feed(&[38, 5, 233]);
        assert_eq!(steps[0], Step::Consumed);
        assert_eq!(steps[1], Step::Consumed);
        assert_eq!(steps[2], Step::Color(Layer::Foreground, Color::Xterm(233)));
    }

    #[test]
    fn test_rgb_background() {
        let steps = feed(&[48, 2, 10, 20, 30, 1]);
        assert_eq!(steps[4], Step::Color(Layer::Background, Color::Rgb(10, 20, 30)));
        // scanner is back to idle afterwards
        assert_eq!(steps[5], Step::Pass);
    }

    #[test]
    fn test_bad_selector_resets() {
        let mut ext = Extension::new();
        assert_eq!(ext.scan(38), Step::Consumed);
        assert_eq!(ext.scan(7), Step::Consumed);
        assert!(!ext.is_pending());
        assert_eq!(ext.scan(1), Step::Pass);
    }

    #[test]
    fn test_incomplete_stays_pending() {
        let mut ext = Extension::new();
        ext.scan(48);
        ext.scan(2);
        ext.scan(255);
        assert!(ext.is_pending());
        ext.reset();
        assert!(!ext.is_pending());
    }
}

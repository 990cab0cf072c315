// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory

use std::fmt::{Display, Formatter, Result};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;

/// A 64x32 monochrome framebuffer, one bool per pixel, row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    pixels: Vec<bool>,
}

impl Screen {
    /// Constructs a blank screen
    pub fn new() -> Self {
        Screen {
            pixels: vec![false; WIDTH * HEIGHT],
        }
    }

    /// Gets the pixel at (x, y), wrapping coordinates onto the screen
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let screen = Screen::new();
    /// assert!(!screen.get(3, 4));
    /// ```
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::index(x, y)]
    }

    /// Gets every pixel, row by row
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Turns every pixel off
    pub fn clear(&mut self) -> &mut Self {
        self.pixels.fill(false);
        self
    }

    /// XORs `on` into the pixel at (x, y), wrapping coordinates onto the screen.
    ///
    /// Returns true if a lit pixel was turned off.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut screen = Screen::new();
    /// assert!(!screen.toggle(64, 0, true)); // wraps to (0, 0)
    /// assert!(screen.get(0, 0));
    /// assert!(screen.toggle(0, 32, true));  // wraps to (0, 0) again
    /// assert!(!screen.get(0, 0));
    /// ```
    pub fn toggle(&mut self, x: usize, y: usize, on: bool) -> bool {
        let pixel = &mut self.pixels[Self::index(x, y)];
        let collided = *pixel && on;
        *pixel ^= on;
        collided
    }

    /// Counts the lit pixels
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    #[inline(always)]
    fn index(x: usize, y: usize) -> usize {
        (y % HEIGHT) * WIDTH + (x % WIDTH)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws the screen with half-block characters, two rows per line
impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for rows in self.pixels.chunks(WIDTH * 2) {
            let (top, bottom) = rows.split_at(WIDTH);
            for (&t, &b) in top.iter().zip(bottom) {
                write!(
                    f,
                    "{}",
                    match (t, b) {
                        (true, true) => '█',
                        (true, false) => '▀',
                        (false, true) => '▄',
                        (false, false) => ' ',
                    }
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

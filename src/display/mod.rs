// Display module - Palette and frame buffer types
//
// This module provides:
// - NES master palette (64 entries) with RGB / RGB565 / RGBA conversions
// - Frame buffer (256×240 packed RGB 5-6-5 pixels)
//
// Window creation, scaling, and presentation belong to the host shell.

pub mod framebuffer;
pub mod palette;

pub use framebuffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_SIZE, SCREEN_WIDTH};
pub use palette::{palette_to_rgb, palette_to_rgb565, rgb565_to_rgb, NES_PALETTE};

//! PPU Timing Tests
//!
//! Tests for PPU frame timing:
//! - VBlank set/clear points
//! - NMI edge generation
//! - Frame counter and odd-frame toggle
//! - Sprite 0 hit lifetime

use super::*;

#[test]
fn test_vblank_sets_at_241_dot_1() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    ppu.step_cycle(241, 0);
    assert_eq!(ppu.ppustatus & 0x80, 0, "Not yet at dot 1");

    ppu.step_cycle(241, 1);
    assert_eq!(ppu.ppustatus & 0x80, 0x80, "VBlank set at (241, 1)");
}

#[test]
fn test_vblank_clears_at_prerender_dot_1() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    ppu.step_cycle(241, 1);
    assert_ne!(ppu.ppustatus & 0x80, 0);

    ppu.step_cycle(261, 1);
    assert_eq!(ppu.ppustatus & 0x80, 0, "VBlank cleared at (261, 1)");
}

#[test]
fn test_nmi_edge_only_when_enabled() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    // NMI disabled: VBlank sets but no edge
    ppu.step_cycle(241, 1);
    assert!(!ppu.nmi_pending(), "No NMI edge with CTRL bit 7 clear");

    // Enable and run the next frame's VBlank
    reg_write(&mut ppu, PPUCTRL, 0x80);
    ppu.step_cycle(261, 1);
    ppu.step_cycle(241, 1);
    assert!(ppu.nmi_pending(), "NMI edge with CTRL bit 7 set");

    ppu.clear_nmi();
    assert!(!ppu.nmi_pending());
}

#[test]
fn test_prerender_clears_sprite_flags() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    ppu.ppustatus |= 0x60; // Sprite 0 hit + overflow

    ppu.step_cycle(261, 1);

    assert_eq!(ppu.ppustatus & 0x40, 0, "Sprite 0 hit cleared at pre-render");
    assert_eq!(ppu.ppustatus & 0x20, 0, "Overflow cleared at pre-render");
}

#[test]
fn test_end_frame_advances_counter_and_parity() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    assert_eq!(ppu.frame_count(), 0);
    assert!(!ppu.is_odd_frame());

    ppu.end_frame();
    assert_eq!(ppu.frame_count(), 1);
    assert!(ppu.is_odd_frame());

    ppu.end_frame();
    assert!(!ppu.is_odd_frame());
}

#[test]
fn test_end_frame_clears_vblank_and_sprite0() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    ppu.ppustatus |= 0xC0;
    ppu.end_frame();

    assert_eq!(ppu.ppustatus & 0xC0, 0, "Frame end clears VBlank and hit");
}

#[test]
fn test_frame_scroll_captured_at_vblank() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    // Leave the visible region so the write covers all lines
    ppu.scanline = 250;
    reg_write(&mut ppu, PPUSCROLL, 0x30);
    reg_write(&mut ppu, PPUSCROLL, 0x05);
    reg_write(&mut ppu, PPUCTRL, 0x01);

    ppu.step_cycle(241, 1);

    assert_eq!(ppu.frame_scroll_x, 0x30);
    assert_eq!(ppu.frame_scroll_y, 0x05);
    assert_eq!(ppu.frame_ctrl, 0x01);
    assert_eq!(ppu.scroll_x_line[0], 0x30, "Arrays re-seeded at capture");
    assert_eq!(ppu.ctrl_line[239], 0x01);
}

#[test]
fn test_ctrl_latched_per_scanline() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    reg_write(&mut ppu, PPUCTRL, 0x10);
    ppu.step_cycle(5, 0);
    assert_eq!(ppu.ctrl_line[5], 0x10, "CTRL latched at dot 0");

    reg_write(&mut ppu, PPUCTRL, 0x00);
    ppu.step_cycle(6, 0);
    assert_eq!(ppu.ctrl_line[6], 0x00);
    assert_eq!(ppu.ctrl_line[5], 0x10, "Earlier line keeps its latch");
}

#[test]
fn test_scanline_and_cycle_tracked() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    ppu.step_cycle(100, 200);

    assert_eq!(ppu.scanline(), 100);
    assert_eq!(ppu.cycle(), 200);
}

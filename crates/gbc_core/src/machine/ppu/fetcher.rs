//! Pixel fetcher and FIFO feed for mode 3.
//!
//! Columns are tracked in "FIFO space": FIFO position 0 is the first pixel of
//! the tile containing SCX, so the first `SCX % 8` pixels popped each line are
//! thrown away. Sprites are placed in the same space.

use super::lcd::{shade, Lcdc};
use super::Ppu;
use crate::SCREEN_WIDTH;

const OBJ_BG_PRIORITY: u8 = 0x80;
const OBJ_Y_FLIP: u8 = 0x40;
const OBJ_X_FLIP: u8 = 0x20;
const OBJ_PALETTE1: u8 = 0x10;
const MAX_LINE_SPRITES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FetchStage {
    #[default]
    Tile,
    Data0,
    Data1,
    Idle,
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct OamEntry {
    pub y: u8,
    pub x: u8,
    pub tile: u8,
    pub flags: u8,
}

impl OamEntry {
    fn from_bytes(bytes: &[u8]) -> Self {
        match *bytes {
            [y, x, tile, flags, ..] => OamEntry { y, x, tile, flags },
            _ => OamEntry::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FetchedSprite {
    entry: OamEntry,
    lo: u8,
    hi: u8,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Fetcher {
    stage: FetchStage,
    /// FIFO-space column of the next tile to fetch.
    fetch_x: u16,
    /// FIFO-space column of the next pixel to enqueue.
    fifo_x: u16,
    /// Pixels popped this line, discarded ones included.
    line_x: u16,
    /// Pixels written to the frame buffer this line.
    pub(crate) pushed_x: usize,
    /// `None` when the background is disabled.
    tile: Option<u8>,
    tile_row: u8,
    data_lo: u8,
    data_hi: u8,
    pub(crate) window_drawn: bool,
    sprites: Vec<FetchedSprite>,
}

impl Fetcher {
    pub(crate) fn start_line(&mut self) {
        self.stage = FetchStage::Tile;
        self.fetch_x = 0;
        self.fifo_x = 0;
        self.line_x = 0;
        self.pushed_x = 0;
        self.window_drawn = false;
        self.sprites.clear();
    }
}

fn vram_read(vram: &[u8], addr: u16) -> u8 {
    vram.get((addr & 0x1FFF) as usize).copied().unwrap_or(0xFF)
}

impl Ppu {
    /// Collect the first ten sprites OAM lists for this line, ordered by X.
    pub(super) fn select_line_sprites(&mut self, oam: &[u8]) {
        self.line_sprites.clear();
        self.sprite_height = self.lcdc.obj_height();
        let height = u16::from(self.sprite_height);
        let line = u16::from(self.ly) + 16;

        for entry in oam.chunks_exact(4).map(OamEntry::from_bytes) {
            let top = u16::from(entry.y);
            if top <= line && line < top + height {
                self.line_sprites.push(entry);
                if self.line_sprites.len() == MAX_LINE_SPRITES {
                    break;
                }
            }
        }
        self.line_sprites.sort_by_key(|entry| entry.x);
    }

    /// One dot of mode 3: the fetcher moves on even dots, the FIFO drains
    /// every dot.
    pub(super) fn pipeline_tick(&mut self, vram: &[u8]) {
        if self.line_ticks & 1 == 0 {
            self.fetch_step(vram);
        }
        self.push_pixel();
    }

    fn fetch_step(&mut self, vram: &[u8]) {
        match self.fetcher.stage {
            FetchStage::Tile => {
                self.fetch_tile_index(vram);
                self.fetch_sprite_entries();
                self.fetcher.fetch_x += 8;
                self.fetcher.stage = FetchStage::Data0;
            }
            FetchStage::Data0 => {
                self.fetcher.data_lo = self.fetch_tile_byte(vram, 0);
                self.fetch_sprite_data(vram, 0);
                self.fetcher.stage = FetchStage::Data1;
            }
            FetchStage::Data1 => {
                self.fetcher.data_hi = self.fetch_tile_byte(vram, 1);
                self.fetch_sprite_data(vram, 1);
                self.fetcher.stage = FetchStage::Idle;
            }
            FetchStage::Idle => self.fetcher.stage = FetchStage::Push,
            FetchStage::Push => {
                if self.fifo_add() {
                    self.fetcher.stage = FetchStage::Tile;
                }
            }
        }
    }

    fn window_covers(&self, screen_x: i32) -> bool {
        self.lcdc.contains(Lcdc::WINDOW_ENABLE)
            && self.ly >= self.wy
            && self.wx <= 166
            && screen_x + 7 >= i32::from(self.wx)
    }

    fn fetch_tile_index(&mut self, vram: &[u8]) {
        if !self.lcdc.contains(Lcdc::BG_WINDOW_ENABLE) {
            self.fetcher.tile = None;
            return;
        }

        let screen_x = i32::from(self.fetcher.fetch_x) - i32::from(self.scx % 8);
        let (map, column, row) = if self.window_covers(screen_x) {
            self.fetcher.window_drawn = true;
            let column = (screen_x + 7 - i32::from(self.wx)).max(0) as u16 / 8;
            (self.lcdc.window_map(), column, self.window_line)
        } else {
            let map_x = (self.fetcher.fetch_x as u8).wrapping_add(self.scx);
            let map_y = self.ly.wrapping_add(self.scy);
            (self.lcdc.bg_map(), u16::from(map_x / 8), map_y)
        };

        let addr = map + (column & 0x1F) + u16::from(row / 8) * 32;
        self.fetcher.tile = Some(vram_read(vram, addr));
        self.fetcher.tile_row = row % 8;
    }

    fn fetch_tile_byte(&self, vram: &[u8], offset: u16) -> u8 {
        match self.fetcher.tile {
            Some(tile) => {
                let addr = self.lcdc.tile_data(tile) + u16::from(self.fetcher.tile_row) * 2;
                vram_read(vram, addr + offset)
            }
            None => 0,
        }
    }

    /// Pick the line sprites overlapping the tile being fetched.
    fn fetch_sprite_entries(&mut self) {
        self.fetcher.sprites.clear();
        if !self.lcdc.contains(Lcdc::OBJ_ENABLE) {
            return;
        }
        let fine = i32::from(self.scx % 8);
        let tile_start = i32::from(self.fetcher.fetch_x);
        for entry in &self.line_sprites {
            let sprite_x = i32::from(entry.x) - 8 + fine;
            if sprite_x < tile_start + 8 && sprite_x + 8 > tile_start {
                self.fetcher.sprites.push(FetchedSprite {
                    entry: *entry,
                    lo: 0,
                    hi: 0,
                });
            }
        }
    }

    fn fetch_sprite_data(&mut self, vram: &[u8], offset: u16) {
        // Rows were picked with the height seen during OAM scan, even if LCDC
        // changed since.
        let height = self.sprite_height;
        let tall = height == 16;
        let line = self.ly.wrapping_add(16);

        for sprite in &mut self.fetcher.sprites {
            let mut row = line.wrapping_sub(sprite.entry.y) & (height - 1);
            if sprite.entry.flags & OBJ_Y_FLIP != 0 {
                row = height - 1 - row;
            }
            let tile = if tall {
                sprite.entry.tile & 0xFE
            } else {
                sprite.entry.tile
            };
            let addr = 0x8000 + u16::from(tile) * 16 + u16::from(row) * 2 + offset;
            let byte = vram_read(vram, addr);
            if offset == 0 {
                sprite.lo = byte;
            } else {
                sprite.hi = byte;
            }
        }
    }

    /// Queue the fetched tile row. Refused while the FIFO holds more than
    /// eight pixels.
    fn fifo_add(&mut self) -> bool {
        if self.fifo.len() > 8 {
            return false;
        }

        for bit in (0..8).rev() {
            let index = match self.fetcher.tile {
                Some(_) => {
                    (((self.fetcher.data_hi >> bit) & 1) << 1) | ((self.fetcher.data_lo >> bit) & 1)
                }
                None => 0,
            };
            let color = self
                .sprite_pixel(index)
                .unwrap_or(self.palette[shade(self.bgp, index)]);
            if !self.fifo.push(color) {
                break;
            }
            self.fetcher.fifo_x += 1;
        }
        true
    }

    /// Color of the highest-priority opaque sprite pixel at the current FIFO
    /// column, unless the background wins.
    fn sprite_pixel(&self, bg_index: u8) -> Option<u32> {
        let fine = i32::from(self.scx % 8);
        let column = i32::from(self.fetcher.fifo_x);

        for sprite in &self.fetcher.sprites {
            let offset = column - (i32::from(sprite.entry.x) - 8 + fine);
            if !(0..8).contains(&offset) {
                continue;
            }
            let bit = if sprite.entry.flags & OBJ_X_FLIP != 0 {
                offset
            } else {
                7 - offset
            };
            let index = (((sprite.hi >> bit) & 1) << 1) | ((sprite.lo >> bit) & 1);
            if index == 0 {
                continue;
            }
            if sprite.entry.flags & OBJ_BG_PRIORITY != 0 && bg_index != 0 {
                return None;
            }
            let palette = if sprite.entry.flags & OBJ_PALETTE1 != 0 {
                self.obp1
            } else {
                self.obp0
            };
            return Some(self.palette[shade(palette, index)]);
        }
        None
    }

    /// Pop one pixel into the frame buffer once more than eight are queued.
    fn push_pixel(&mut self) {
        if self.fifo.len() <= 8 {
            return;
        }
        let Some(color) = self.fifo.pop() else {
            return;
        };

        if self.fetcher.line_x >= u16::from(self.scx % 8) && self.fetcher.pushed_x < SCREEN_WIDTH {
            let index = usize::from(self.ly) * SCREEN_WIDTH + self.fetcher.pushed_x;
            if let Some(pixel) = self.frame_buffer.get_mut(index) {
                *pixel = color;
            }
            self.fetcher.pushed_x += 1;
        }
        self.fetcher.line_x += 1;
    }
}

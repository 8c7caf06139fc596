//! Album art rendered with half-block cells: each terminal cell shows two
//! vertically stacked pixels (`▀` foreground = top, background = bottom).

use image::imageops::{self, FilterType};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::artwork::Artwork;

const DEFAULT_ART: [&str; 7] = [
    r"   .-'''''-.   ",
    r"  /  .---.  \  ",
    r" |  /     \  | ",
    r" | |   o   | | ",
    r" |  \     /  | ",
    r"  \  '---'  /  ",
    r"   '-.....-'   ",
];

/// Lines that fill at most `width` x `height` cells.
pub fn artwork_lines(artwork: &Artwork, width: u16, height: u16) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    match artwork {
        Artwork::Embedded(img) if img.width() > 0 && img.height() > 0 => {
            let (iw, ih) = (img.width() as f64, img.height() as f64);
            let scale = f64::min(width as f64 / iw, (height as f64 * 2.0) / ih);
            let tw = ((iw * scale).floor() as u32).max(1);
            let th = ((ih * scale).floor() as u32).max(1);
            let scaled = imageops::resize(img, tw, th, FilterType::Triangle);

            (0..th.div_ceil(2))
                .map(|row| {
                    let spans: Vec<Span<'static>> = (0..tw)
                        .map(|x| {
                            let top = scaled.get_pixel(x, row * 2).0;
                            let bottom = if row * 2 + 1 < th {
                                let p = scaled.get_pixel(x, row * 2 + 1).0;
                                Color::Rgb(p[0], p[1], p[2])
                            } else {
                                Color::Reset
                            };
                            Span::styled(
                                "▀",
                                Style::default()
                                    .fg(Color::Rgb(top[0], top[1], top[2]))
                                    .bg(bottom),
                            )
                        })
                        .collect();
                    Line::from(spans)
                })
                .collect()
        }
        _ => DEFAULT_ART
            .iter()
            .take(height as usize)
            .map(|l| Line::from(*l))
            .collect(),
    }
}

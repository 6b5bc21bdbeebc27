//! Built-in presets.
//!
//! Each constructor assembles its canonical item list from the pool and
//! drops the items its [`PresetOptions`] toggles disable.

use crate::blend::BlendMode;
use crate::error::FilterResult;
use crate::layer::{LayerItem, LayeredFilter};
use crate::pool::{FilterPool, FilterSpec};

use super::PresetOptions;

const ORANGE: [u8; 3] = [0xe8, 0x7b, 0x22];
const SUN: [u8; 3] = [0xf4, 0x96, 0x00];
const HAZE: [u8; 3] = [0x68, 0x99, 0xba];
const MAJESTY: [u8; 3] = [0xea, 0x1c, 0x5d];

const ALL_CHANNELS: &[usize] = &[0, 1, 2];

/// Faded sepia print with film grain.
///
/// `vignette = false` drops the final vignette.
pub fn vintage(pool: &FilterPool, options: &PresetOptions) -> FilterResult<LayeredFilter> {
    let canonical = vec![
        pool.item(FilterSpec::greyscale())?,
        pool.item(FilterSpec::contrast(5.0))?,
        pool.item(FilterSpec::noise(3.0))?,
        pool.item(FilterSpec::sepia(100.0))?,
        pool.item(FilterSpec::channels(8.0, 2.0, 4.0))?,
        pool.item(FilterSpec::gamma(0.87))?,
        pool.try_item(FilterSpec::vignette(40.0, 30.0))?,
    ];
    let omit: &[usize] = if options.vignette { &[] } else { &[6] };
    LayeredFilter::from_canonical("Vintage", canonical, omit)
}

/// Toy-camera look: crushed curve, heavy gamma and a dark vignette.
///
/// `vignette = false` drops the vignette but keeps the final brightness lift.
pub fn lomo(pool: &FilterPool, options: &PresetOptions) -> FilterResult<LayeredFilter> {
    let canonical = vec![
        pool.item(FilterSpec::brightness(15.0))?,
        pool.try_item(FilterSpec::exposure(15.0))?,
        pool.try_item(FilterSpec::curves(
            ALL_CHANNELS,
            &[(0, 0), (200, 0), (155, 255), (255, 255)],
        ))?,
        pool.item(FilterSpec::saturation(-20.0))?,
        pool.item(FilterSpec::gamma(1.8))?,
        pool.try_item(FilterSpec::vignette(50.0, 60.0))?,
        pool.item(FilterSpec::brightness(5.0))?,
    ];
    let omit: &[usize] = if options.vignette { &[] } else { &[5] };
    LayeredFilter::from_canonical("Lomo", canonical, omit)
}

/// Crisp, punchy colors.
///
/// `grey = true` adds a greyscale conversion and a contrast bump at the end.
pub fn clarity(pool: &FilterPool, options: &PresetOptions) -> FilterResult<LayeredFilter> {
    let canonical = vec![
        pool.item(FilterSpec::vibrance(20.0))?,
        pool.try_item(FilterSpec::curves(
            ALL_CHANNELS,
            &[(5, 0), (130, 150), (190, 220), (250, 255)],
        ))?,
        pool.item(FilterSpec::sharpen(15.0))?,
        pool.try_item(FilterSpec::vignette(45.0, 20.0))?,
        pool.item(FilterSpec::greyscale())?,
        pool.item(FilterSpec::contrast(4.0))?,
    ];
    let omit: &[usize] = if options.grey { &[] } else { &[4, 5] };
    LayeredFilter::from_canonical("Clarity", canonical, omit)
}

/// High-contrast posterized black and white.
pub fn sin_city(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "SinCity",
        vec![
            pool.item(FilterSpec::contrast(100.0))?,
            pool.item(FilterSpec::brightness(15.0))?,
            pool.try_item(FilterSpec::exposure(10.0))?,
            pool.try_item(FilterSpec::posterize(80.0))?,
            pool.item(FilterSpec::clip(30.0))?,
            pool.item(FilterSpec::greyscale())?,
        ],
    ))
}

pub fn sunrise(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "Sunrise",
        vec![
            pool.try_item(FilterSpec::exposure(3.5))?,
            pool.item(FilterSpec::saturation(-5.0))?,
            pool.item(FilterSpec::vibrance(50.0))?,
            pool.item(FilterSpec::sepia(60.0))?,
            pool.item(FilterSpec::colorize(ORANGE, 10.0))?,
            pool.item(FilterSpec::channels(8.0, 0.0, 8.0))?,
            pool.item(FilterSpec::contrast(5.0))?,
            pool.item(FilterSpec::gamma(1.2))?,
            pool.try_item(FilterSpec::vignette(55.0, 25.0))?,
        ],
    ))
}

pub fn cross_process(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "CrossProcess",
        vec![
            pool.try_item(FilterSpec::exposure(5.0))?,
            pool.item(FilterSpec::colorize(ORANGE, 4.0))?,
            pool.item(FilterSpec::sepia(20.0))?,
            pool.item(FilterSpec::channels(3.0, 0.0, 8.0))?,
            pool.try_item(FilterSpec::curves(
                &[2],
                &[(0, 0), (100, 150), (180, 180), (255, 255)],
            ))?,
            pool.item(FilterSpec::contrast(15.0))?,
            pool.item(FilterSpec::vibrance(75.0))?,
            pool.item(FilterSpec::gamma(1.6))?,
        ],
    ))
}

pub fn orange_peel(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "OrangePeel",
        vec![
            pool.try_item(FilterSpec::curves(
                ALL_CHANNELS,
                &[(0, 0), (100, 50), (140, 200), (255, 255)],
            ))?,
            pool.item(FilterSpec::vibrance(-30.0))?,
            pool.item(FilterSpec::saturation(-30.0))?,
            pool.item(FilterSpec::colorize([0xff, 0x90, 0x00], 30.0))?,
            pool.item(FilterSpec::contrast(-5.0))?,
            pool.item(FilterSpec::gamma(1.4))?,
        ],
    ))
}

pub fn love(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "Love",
        vec![
            pool.item(FilterSpec::brightness(5.0))?,
            pool.try_item(FilterSpec::exposure(8.0))?,
            pool.item(FilterSpec::contrast(4.0))?,
            pool.item(FilterSpec::colorize([0xc4, 0x20, 0x07], 30.0))?,
            pool.item(FilterSpec::vibrance(50.0))?,
            pool.item(FilterSpec::gamma(1.3))?,
        ],
    ))
}

pub fn grungy(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "Grungy",
        vec![
            pool.item(FilterSpec::gamma(1.5))?,
            pool.item(FilterSpec::clip(25.0))?,
            pool.item(FilterSpec::saturation(-60.0))?,
            pool.item(FilterSpec::contrast(5.0))?,
            pool.item(FilterSpec::noise(5.0))?,
            pool.try_item(FilterSpec::vignette(50.0, 30.0))?,
        ],
    ))
}

/// Per-channel curves followed by a light sharpen.
pub fn jarques(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "Jarques",
        vec![
            pool.item(FilterSpec::saturation(-35.0))?,
            pool.try_item(FilterSpec::curves(
                &[2],
                &[(20, 0), (90, 120), (186, 144), (255, 230)],
            ))?,
            pool.try_item(FilterSpec::curves(
                &[0],
                &[(0, 0), (144, 90), (138, 120), (255, 255)],
            ))?,
            pool.try_item(FilterSpec::curves(
                &[1],
                &[(10, 0), (115, 105), (148, 100), (255, 248)],
            ))?,
            pool.try_item(FilterSpec::curves(
                ALL_CHANNELS,
                &[(0, 0), (120, 100), (128, 140), (255, 255)],
            ))?,
            pool.item(FilterSpec::sharpen(20.0))?,
        ],
    ))
}

pub fn pinhole(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "Pinhole",
        vec![
            pool.item(FilterSpec::greyscale())?,
            pool.item(FilterSpec::sepia(10.0))?,
            pool.try_item(FilterSpec::exposure(10.0))?,
            pool.item(FilterSpec::contrast(15.0))?,
            pool.try_item(FilterSpec::vignette(60.0, 35.0))?,
        ],
    ))
}

pub fn old_boot(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "OldBoot",
        vec![
            pool.item(FilterSpec::saturation(-20.0))?,
            pool.item(FilterSpec::vibrance(-50.0))?,
            pool.item(FilterSpec::gamma(1.1))?,
            pool.item(FilterSpec::sepia(30.0))?,
            pool.item(FilterSpec::channels(-10.0, 0.0, 5.0))?,
            pool.try_item(FilterSpec::curves(
                ALL_CHANNELS,
                &[(0, 0), (80, 50), (128, 230), (255, 255)],
            ))?,
            pool.try_item(FilterSpec::vignette(60.0, 30.0))?,
        ],
    ))
}

/// Warm glow from a multiplied contrast layer and a soft-light orange fill.
///
/// `vignette = false` drops the final vignette.
pub fn glowing_sun(pool: &FilterPool, options: &PresetOptions) -> FilterResult<LayeredFilter> {
    let canonical = vec![
        pool.item(FilterSpec::brightness(10.0))?,
        LayerItem::layer(
            80.0,
            BlendMode::Multiply,
            vec![
                pool.item(FilterSpec::gamma(0.8))?,
                pool.item(FilterSpec::contrast(50.0))?,
                pool.try_item(FilterSpec::exposure(10.0))?,
            ],
        )?,
        LayerItem::layer(
            80.0,
            BlendMode::SoftLight,
            vec![pool.item(FilterSpec::fill_color(SUN))?],
        )?,
        pool.try_item(FilterSpec::exposure(20.0))?,
        pool.item(FilterSpec::gamma(0.8))?,
        pool.try_item(FilterSpec::vignette(45.0, 20.0))?,
    ];
    let omit: &[usize] = if options.vignette { &[] } else { &[5] };
    LayeredFilter::from_canonical("GlowingSun", canonical, omit)
}

/// Soft, washed-out summer haze built from three blended layers.
pub fn hazy_days(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    let haze_curve: &[(i32, i32)] = &[(0, 40), (128, 128), (128, 128), (255, 215)];

    Ok(LayeredFilter::new(
        "HazyDays",
        vec![
            pool.item(FilterSpec::gamma(1.2))?,
            LayerItem::layer(
                60.0,
                BlendMode::Overlay,
                vec![
                    pool.item(FilterSpec::channels(5.0, 0.0, 0.0))?,
                    pool.try_item(FilterSpec::gaussian_blur(15.0))?,
                ],
            )?,
            LayerItem::layer(
                40.0,
                BlendMode::Addition,
                vec![pool.item(FilterSpec::fill_color(HAZE))?],
            )?,
            LayerItem::layer(
                35.0,
                BlendMode::Multiply,
                vec![
                    pool.item(FilterSpec::brightness(40.0))?,
                    pool.item(FilterSpec::vibrance(40.0))?,
                    pool.try_item(FilterSpec::exposure(30.0))?,
                    pool.item(FilterSpec::contrast(15.0))?,
                    pool.try_item(FilterSpec::curves(&[0], haze_curve))?,
                    pool.try_item(FilterSpec::curves(&[1], haze_curve))?,
                    pool.try_item(FilterSpec::curves(&[2], haze_curve))?,
                    pool.try_item(FilterSpec::gaussian_blur(5.0))?,
                ],
            )?,
            pool.try_item(FilterSpec::curves(
                &[0],
                &[(20, 0), (128, 158), (128, 128), (235, 255)],
            ))?,
            pool.try_item(FilterSpec::curves(
                &[1],
                &[(20, 0), (128, 128), (128, 128), (235, 255)],
            ))?,
            pool.try_item(FilterSpec::curves(
                &[2],
                &[(20, 0), (128, 108), (128, 128), (235, 255)],
            ))?,
            pool.try_item(FilterSpec::vignette(45.0, 20.0))?,
        ],
    ))
}

/// Pink-tinted portrait look with a nested fill layer.
pub fn her_majesty(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "HerMajesty",
        vec![
            pool.item(FilterSpec::brightness(40.0))?,
            pool.item(FilterSpec::colorize(MAJESTY, 10.0))?,
            pool.try_item(FilterSpec::curves(
                &[2],
                &[(0, 10), (128, 180), (190, 190), (255, 255)],
            ))?,
            LayerItem::layer(
                50.0,
                BlendMode::Overlay,
                vec![
                    pool.item(FilterSpec::gamma(0.7))?,
                    LayerItem::layer(
                        60.0,
                        BlendMode::Normal,
                        vec![pool.item(FilterSpec::fill_color(MAJESTY))?],
                    )?,
                ],
            )?,
            LayerItem::layer(
                60.0,
                BlendMode::Multiply,
                vec![
                    pool.item(FilterSpec::saturation(50.0))?,
                    pool.item(FilterSpec::hue(90.0))?,
                    pool.item(FilterSpec::contrast(10.0))?,
                ],
            )?,
            pool.item(FilterSpec::gamma(1.4))?,
            pool.item(FilterSpec::vibrance(-30.0))?,
            LayerItem::layer(
                10.0,
                BlendMode::Normal,
                vec![pool.item(FilterSpec::fill_color([0xe5, 0xf0, 0xff]))?],
            )?,
        ],
    ))
}

pub fn nostalgia(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "Nostalgia",
        vec![
            pool.item(FilterSpec::saturation(20.0))?,
            pool.item(FilterSpec::gamma(1.4))?,
            pool.item(FilterSpec::greyscale())?,
            pool.item(FilterSpec::contrast(5.0))?,
            pool.item(FilterSpec::sepia(100.0))?,
            pool.item(FilterSpec::channels(8.0, 4.0, 2.0))?,
            pool.item(FilterSpec::gamma(0.8))?,
            pool.item(FilterSpec::contrast(5.0))?,
            pool.try_item(FilterSpec::exposure(10.0))?,
            LayerItem::layer(
                55.0,
                BlendMode::Overlay,
                vec![pool.try_item(FilterSpec::gaussian_blur(10.0))?],
            )?,
            pool.try_item(FilterSpec::vignette(50.0, 30.0))?,
        ],
    ))
}

pub fn hemingway(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "Hemingway",
        vec![
            pool.item(FilterSpec::greyscale())?,
            pool.item(FilterSpec::contrast(10.0))?,
            pool.item(FilterSpec::gamma(0.9))?,
            LayerItem::layer(
                40.0,
                BlendMode::Multiply,
                vec![
                    pool.try_item(FilterSpec::exposure(15.0))?,
                    pool.item(FilterSpec::contrast(15.0))?,
                    pool.item(FilterSpec::channels(5.0, 10.0, 0.0))?,
                ],
            )?,
            pool.item(FilterSpec::sepia(30.0))?,
            pool.try_item(FilterSpec::curves(
                ALL_CHANNELS,
                &[(0, 10), (120, 90), (180, 200), (235, 255)],
            ))?,
            pool.item(FilterSpec::channels(5.0, -2.0, 0.0))?,
            pool.try_item(FilterSpec::exposure(15.0))?,
        ],
    ))
}

pub fn concentrate(pool: &FilterPool, _options: &PresetOptions) -> FilterResult<LayeredFilter> {
    Ok(LayeredFilter::new(
        "Concentrate",
        vec![
            pool.item(FilterSpec::sharpen(40.0))?,
            pool.item(FilterSpec::saturation(-50.0))?,
            pool.item(FilterSpec::channels(3.0, 0.0, 0.0))?,
            LayerItem::layer(
                80.0,
                BlendMode::Multiply,
                vec![
                    pool.item(FilterSpec::sharpen(5.0))?,
                    pool.item(FilterSpec::contrast(50.0))?,
                    pool.try_item(FilterSpec::exposure(10.0))?,
                    pool.item(FilterSpec::channels(0.0, 0.0, 5.0))?,
                ],
            )?,
            pool.item(FilterSpec::brightness(10.0))?,
        ],
    ))
}

//! Count plots rendered with [`plotters`].
//!
//! The rendering style (figure size, font family, font scale) is a
//! process-wide setting: it is configured once at startup, before the first
//! chart is drawn.

use std::fmt::Display;
use std::path::Path;
use std::sync::OnceLock;

use log::{debug, warn};
use plotters::coord::ranged1d::SegmentedCoord;
use plotters::coord::types::RangedCoordu32;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::report::*;

/// Same blue as the first color of the seaborn "deep" palette.
const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);

/// Has glyphs for the Chinese labels of the registration data.
pub const DEFAULT_FONT_FAMILY: &str = "AR PL UKai TW";
pub const FALLBACK_FONT_FAMILY: &str = "sans-serif";

// Between the category labels and the x axis description.
const LABEL_PADDING: u32 = 20;

#[derive(PartialEq, Debug, Clone)]
pub struct RenderingStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    /// Multiplies the base font sizes, except for the category labels.
    pub font_scale: f64,
}

impl Default for RenderingStyle {
    // 12x8 inches at 100 dpi, fonts twice as large as the base sizes.
    fn default() -> Self {
        RenderingStyle {
            width: 1200,
            height: 800,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_scale: 2.0,
        }
    }
}

impl RenderingStyle {
    fn caption_size(&self) -> f64 {
        20.0 * self.font_scale
    }

    fn axis_desc_size(&self) -> f64 {
        16.0 * self.font_scale
    }

    fn y_tick_size(&self) -> f64 {
        12.0 * self.font_scale
    }

    // The category labels keep a fixed size: there may be many of them.
    fn x_tick_size(&self) -> f64 {
        16.0
    }

    /// Replaces the font family with the fallback when it cannot be loaded.
    fn with_available_font<F: Fn(&str) -> bool>(self, available: F) -> RenderingStyle {
        if available(&self.font_family) {
            return self;
        }
        warn!(
            "Font family {} not found, using {}",
            self.font_family, FALLBACK_FONT_FAMILY
        );
        RenderingStyle {
            font_family: FALLBACK_FONT_FAMILY.to_string(),
            ..self
        }
    }

    // The labels are rotated: their width is the height they take below the
    // axis. Very long labels are cut so that the bars keep half the figure.
    fn x_label_area_size(&self, longest_label: u32) -> u32 {
        let needed = longest_label + self.axis_desc_size().ceil() as u32 + LABEL_PADDING;
        let cap = self.height / 2;
        if needed > cap {
            warn!(
                "Category labels need {} pixels, only {} available",
                needed, cap
            );
        }
        needed.min(cap)
    }
}

fn font_available(family: &str) -> bool {
    FontDesc::new(FontFamily::from(family), 16.0, FontStyle::Normal)
        .box_size("Ag")
        .is_ok()
}

static RENDERING_STYLE: OnceLock<RenderingStyle> = OnceLock::new();

/// Sets the rendering style for the rest of the process.
///
/// Only the first call has an effect.
pub fn configure_rendering(style: RenderingStyle) {
    let style = style.with_available_font(font_available);
    debug!("configure_rendering: {:?}", style);
    if let Err(style) = RENDERING_STYLE.set(style) {
        warn!(
            "Rendering style already configured, ignoring {:?}",
            style
        );
    }
}

pub fn rendering_style() -> &'static RenderingStyle {
    RENDERING_STYLE.get_or_init(|| RenderingStyle::default().with_available_font(font_available))
}

/// One segment per bar.
///
/// A segmented range includes its end, so `n` bars need the range `0..n-1`.
fn category_axis(num_bars: usize) -> SegmentedCoord<RangedCoordu32> {
    let last = num_bars.saturating_sub(1) as u32;
    (0u32..last).into_segmented()
}

fn longest_label(chart: &CountChart, style: &RenderingStyle, path: &Path) -> RepResult<u32> {
    let font = FontDesc::new(
        FontFamily::from(style.font_family.as_str()),
        style.x_tick_size(),
        FontStyle::Normal,
    );
    let mut longest = 0;
    for (label, _) in chart.bars.iter() {
        let (w, _) = font.box_size(label).map_err(drawing_failed(path))?;
        longest = longest.max(w);
    }
    Ok(longest)
}

fn drawing_failed<E: Display>(path: &Path) -> impl Fn(E) -> ReportError + '_ {
    move |e| ReportError::Drawing {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Draws one bar per category, in the order of the chart, and saves the
/// image. The image format follows the extension of `path`.
pub fn render_count_plot(chart: &CountChart, path: &Path) -> RepResult<()> {
    let style = rendering_style();
    let family = style.font_family.as_str();

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_failed(path))?;

    let y_max = chart.bars.iter().map(|(_, count)| *count).max().unwrap_or(0);
    // Leave some room above the highest bar.
    let y_top = y_max + (y_max / 20).max(1);

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.title.as_str(), (family, style.caption_size()))
        .margin(20)
        .x_label_area_size(style.x_label_area_size(longest_label(chart, style, path)?))
        .y_label_area_size(100)
        .build_cartesian_2d(category_axis(chart.bars.len()), 0u64..y_top)
        .map_err(drawing_failed(path))?;

    let category_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(idx) => chart
            .bars
            .get(*idx as usize)
            .map(|(label, _)| label.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(chart.bars.len().max(1))
        .x_label_formatter(&category_label)
        // Read bottom to top, ending at the tick.
        .x_label_style(
            TextStyle::from(
                (family, style.x_tick_size())
                    .into_font()
                    .transform(FontTransform::Rotate270),
            )
            .pos(Pos::new(HPos::Right, VPos::Center)),
        )
        .y_label_style((family, style.y_tick_size()))
        .x_desc(chart.x_description.as_str())
        .y_desc(chart.y_description.as_str())
        .axis_desc_style((family, style.axis_desc_size()))
        .draw()
        .map_err(drawing_failed(path))?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(BAR_COLOR.filled())
            .margin(10)
            .data(
                chart
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(idx, (_, count))| (idx as u32, *count)),
            ),
    )
    .map_err(drawing_failed(path))?;

    root.present().map_err(drawing_failed(path))?;
    debug!("render_count_plot: wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::coord::ranged1d::Ranged;

    fn attendees_chart() -> CountChart {
        CountChart {
            identifier: "Title_Categories".to_string(),
            x_description: "Job Titles".to_string(),
            title: "Job Titles of the Attendees in 2019".to_string(),
            y_description: Y_DESCRIPTION.to_string(),
            bars: vec![
                ("Engineer".to_string(), 10),
                ("Manager".to_string(), 5),
                ("professional, scientific, and technical services".to_string(), 4),
                ("Other".to_string(), 3),
                ("No Record".to_string(), 1),
            ],
        }
    }

    #[test]
    fn default_style() {
        let style = RenderingStyle::default();
        assert_eq!((style.width, style.height), (1200, 800));
        assert_eq!(style.font_family, "AR PL UKai TW");
        assert_eq!(style.caption_size(), 40.0);
        assert_eq!(style.axis_desc_size(), 32.0);
        assert_eq!(style.x_tick_size(), 16.0);
    }

    #[test]
    fn font_fallback() {
        let style = RenderingStyle::default().with_available_font(|_| false);
        assert_eq!(style.font_family, FALLBACK_FONT_FAMILY);
        assert_eq!(style.width, 1200);

        let style = RenderingStyle::default().with_available_font(|f| f == "AR PL UKai TW");
        assert_eq!(style.font_family, DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn one_segment_per_bar() {
        // 5 bars on 1000 pixels: 200 pixels each, labels at the centers.
        let axis = category_axis(5);
        let centers: Vec<i32> = (0..5)
            .map(|idx| axis.map(&SegmentValue::CenterOf(idx), (0, 1000)))
            .collect();
        assert_eq!(centers, vec![100, 300, 500, 700, 900]);
        assert_eq!(axis.map(&SegmentValue::Last, (0, 1000)), 1000);

        let single = category_axis(1);
        assert_eq!(single.map(&SegmentValue::CenterOf(0), (0, 1000)), 500);
    }

    #[test]
    fn label_area_fits_labels() {
        let style = RenderingStyle::default();
        // Longest label, axis description and padding.
        assert_eq!(style.x_label_area_size(150), 150 + 32 + 20);
        // Never more than half of the figure.
        assert_eq!(style.x_label_area_size(1000), 400);
    }

    #[test]
    #[ignore = "requires system fonts"]
    fn render_attendees() {
        let chart = attendees_chart();
        let path = std::env::temp_dir().join("atta_render_test.jpg");
        let style = rendering_style();
        let longest = longest_label(&chart, style, &path).unwrap();
        let font = FontDesc::new(
            FontFamily::from(style.font_family.as_str()),
            style.x_tick_size(),
            FontStyle::Normal,
        );
        for (label, _) in chart.bars.iter() {
            let (w, _) = font.box_size(label).unwrap();
            assert!(w <= longest);
            assert!(w < style.x_label_area_size(longest));
        }
        render_count_plot(&chart, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

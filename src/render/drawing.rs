use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::basemap::ATTRIBUTION;
use super::projection::{Mercator, Viewport};

/// Result of a drawing function.
pub type DrawResult<T> = Result<T, Box<dyn std::error::Error>>;

pub const BACKGROUND: RGBColor = RGBColor(242, 239, 233);

pub const PALETTE: [RGBColor; 8] = [
    BLUE,
    RED,
    RGBColor(0, 128, 0),
    RGBColor(255, 165, 0),
    RGBColor(128, 0, 128),
    RGBColor(165, 42, 42),
    MAGENTA,
    RGBColor(0, 128, 128),
];

const MARKER_RADIUS: i32 = 5;
const LINE_WIDTH: u32 = 3;
const ARROW_LENGTH_PX: f64 = 10.0;
const ARROW_HALF_WIDTH_PX: f64 = 5.0;

pub fn colour_for(vehicle: usize) -> RGBColor {
    PALETTE[vehicle % PALETTE.len()]
}

/// Everything drawn above the basemap, in Web Mercator metres.
pub struct MapLayers<'a> {
    pub viewport: &'a Viewport,
    pub title: &'a str,
    pub routes: Vec<(usize, Vec<Mercator>)>,
    pub nodes: Vec<(&'a str, Mercator)>,
    pub attribution: bool,
}

/// Draws the background, routes, arrows, node markers, legend and title.
pub fn draw_map<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layers: &MapLayers,
) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&BACKGROUND)?;

    let (min_x, min_y, max_x, max_y) = layers.viewport.bounds();
    let mut chart = ChartBuilder::on(root).build_cartesian_2d(min_x..max_x, min_y..max_y)?;
    let metres_per_px = 1.0 / layers.viewport.scale;

    for (vehicle, stops) in &layers.routes {
        let colour = colour_for(*vehicle);
        let line: Vec<(f64, f64)> = stops.iter().map(|m| (m.x, m.y)).collect();

        chart
            .draw_series(LineSeries::new(
                line.iter().copied(),
                colour.stroke_width(LINE_WIDTH),
            ))?
            .label(format!("Vehicle {vehicle}"))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(LINE_WIDTH))
            });

        chart.draw_series(
            line.windows(2)
                .filter_map(|pair| arrow_head(pair[0], pair[1], metres_per_px))
                .map(|head| PathElement::new(head, colour.stroke_width(LINE_WIDTH))),
        )?;
    }

    chart.draw_series(layers.nodes.iter().map(|(name, m)| {
        EmptyElement::at((m.x, m.y))
            + Circle::new((0, 0), MARKER_RADIUS, BLACK.filled())
            + Text::new(name.to_string(), (8, -20), ("sans-serif", 12).into_font())
    }))?;

    if !layers.routes.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .margin(40)
            .label_font(("sans-serif", 12))
            .background_style(&WHITE.mix(0.85))
            .border_style(&RGBColor(153, 153, 153))
            .draw()?;
    }

    let (width, height) = root.dim_in_pixel();
    root.draw(&Text::new(
        layers.title.to_string(),
        (width as i32 / 2, 12),
        TextStyle::from(("sans-serif", 20).into_font().style(FontStyle::Bold))
            .pos(Pos::new(HPos::Center, VPos::Top)),
    ))?;
    if layers.attribution {
        root.draw(&Text::new(
            ATTRIBUTION,
            (width as i32 - 6, height as i32 - 6),
            TextStyle::from(("sans-serif", 10).into_font())
                .color(&RGBColor(85, 85, 85))
                .pos(Pos::new(HPos::Right, VPos::Bottom)),
        ))?;
    }

    root.present()?;
    Ok(())
}

/// Open arrowhead pointing at `to`, pulled back so it stops at the node
/// marker. `None` when the segment is too short on screen to carry one.
pub fn arrow_head(
    from: (f64, f64),
    to: (f64, f64),
    metres_per_px: f64,
) -> Option<Vec<(f64, f64)>> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    let gap = (MARKER_RADIUS as f64 + 1.0) * metres_per_px;
    let head = ARROW_LENGTH_PX * metres_per_px;
    if len <= 2.0 * gap + head {
        return None;
    }

    let (ux, uy) = (dx / len, dy / len);
    let tip = (to.0 - ux * gap, to.1 - uy * gap);
    let back = (tip.0 - ux * head, tip.1 - uy * head);
    let half = ARROW_HALF_WIDTH_PX * metres_per_px;
    let (nx, ny) = (-uy * half, ux * half);
    Some(vec![(back.0 + nx, back.1 + ny), tip, (back.0 - nx, back.1 - ny)])
}

use crate::app::SalesApp;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui};
use sales_pred::{format_sales, Category, OutletSize, SessionHistory};
use std::ops::RangeInclusive;

const CHART_HEIGHT: f32 = 320.0;
/// Room left around the plot area for axis labels.
const MARGIN_LEFT: f32 = 70.0;
const MARGIN_BOTTOM: f32 = 40.0;
const MARGIN_TOP: f32 = 30.0;
const MARGIN_RIGHT: f32 = 110.0;

/// Data range to screen range mapping for one chart.
struct Axes {
    x: RangeInclusive<f64>,
    y: RangeInclusive<f64>,
    plot: Rect,
}

impl Axes {
    fn to_screen(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(
            egui::remap(
                x as f32,
                *self.x.start() as f32..=*self.x.end() as f32,
                self.plot.x_range(),
            ),
            egui::remap(
                y as f32,
                *self.y.start() as f32..=*self.y.end() as f32,
                self.plot.bottom()..=self.plot.top(),
            ),
        )
    }
}

/// Min and max of `values` widened by 5% on each side.
///
/// A single distinct value gets a band of ±1 so it does not collapse to a line.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Option<RangeInclusive<f64>> {
    let (min, max) = values
        .into_iter()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        return Some(min - 1.0..=max + 1.0);
    }
    let pad = span * 0.05;
    Some(min - pad..=max + pad)
}

/// Allocates a chart, draws its title, frame and axis labels.
fn chart_frame(
    ui: &mut Ui,
    title: &str,
    x_label: &str,
    y_label: &str,
    x: RangeInclusive<f64>,
    y: RangeInclusive<f64>,
) -> (egui::Response, egui::Painter, Axes) {
    let size = egui::vec2(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let outer = response.rect;
    let plot = Rect::from_min_max(
        Pos2::new(outer.left() + MARGIN_LEFT, outer.top() + MARGIN_TOP),
        Pos2::new(outer.right() - MARGIN_RIGHT, outer.bottom() - MARGIN_BOTTOM),
    );
    let text_color = ui.visuals().text_color();
    let axis_stroke = Stroke::new(1.0, ui.visuals().weak_text_color());

    painter.text(
        Pos2::new(plot.center().x, outer.top() + 4.0),
        Align2::CENTER_TOP,
        title,
        FontId::proportional(16.0),
        text_color,
    );
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis_stroke);
    painter.line_segment([plot.left_bottom(), plot.left_top()], axis_stroke);

    painter.text(
        Pos2::new(plot.center().x, plot.bottom() + 22.0),
        Align2::CENTER_TOP,
        x_label,
        FontId::default(),
        text_color,
    );
    painter.text(
        Pos2::new(outer.left() + 2.0, plot.top() - 18.0),
        Align2::LEFT_TOP,
        y_label,
        FontId::default(),
        text_color,
    );

    // End values of the y axis.
    let small = FontId::monospace(11.0);
    painter.text(
        Pos2::new(plot.left() - 6.0, plot.bottom()),
        Align2::RIGHT_CENTER,
        format_sales(*y.start()),
        small.clone(),
        text_color,
    );
    painter.text(
        Pos2::new(plot.left() - 6.0, plot.top()),
        Align2::RIGHT_CENTER,
        format_sales(*y.end()),
        small,
        text_color,
    );

    (response, painter, Axes { x, y, plot })
}

fn draw_legend(painter: &egui::Painter, plot: Rect, sizes: &[OutletSize], text_color: Color32) {
    let mut pos = Pos2::new(plot.right() + 16.0, plot.top());
    painter.text(pos, Align2::LEFT_TOP, "Outlet Size", FontId::default(), text_color);
    for &size in sizes {
        pos.y += 20.0;
        let swatch = Pos2::new(pos.x + 6.0, pos.y + 8.0);
        painter.circle_filled(swatch, 5.0, SalesApp::outlet_size_color(size));
        painter.text(
            Pos2::new(pos.x + 16.0, pos.y),
            Align2::LEFT_TOP,
            size.label(),
            FontId::default(),
            text_color,
        );
    }
}

/// Scatter of Item MRP against predicted sales, colored by outlet size.
pub fn draw_mrp_scatter(ui: &mut Ui, history: &SessionHistory) {
    let points = history.scatter_points();
    let (Some(x), Some(y)) = (
        padded_range(points.iter().map(|p| p.0)),
        padded_range(points.iter().map(|p| p.1)),
    ) else {
        return;
    };
    let text_color = ui.visuals().text_color();
    let (response, painter, axes) = chart_frame(
        ui,
        "Item MRP vs Item Outlet Sales",
        "Item MRP",
        "Item Outlet Sales",
        x,
        y,
    );

    painter.text(
        Pos2::new(axes.plot.left(), axes.plot.bottom() + 4.0),
        Align2::LEFT_TOP,
        format!("{:.1}", axes.x.start()),
        FontId::monospace(11.0),
        text_color,
    );
    painter.text(
        Pos2::new(axes.plot.right(), axes.plot.bottom() + 4.0),
        Align2::RIGHT_TOP,
        format!("{:.1}", axes.x.end()),
        FontId::monospace(11.0),
        text_color,
    );

    let mut screen_points = Vec::with_capacity(points.len());
    for &(mrp, sales, size) in &points {
        let center = axes.to_screen(mrp, sales);
        painter.circle_filled(center, 6.0, SalesApp::outlet_size_color(size));
        painter.circle_stroke(center, 6.0, Stroke::new(1.0, Color32::BLACK));
        screen_points.push(center);
    }

    let present: Vec<OutletSize> = OutletSize::ALL
        .iter()
        .copied()
        .filter(|s| points.iter().any(|p| p.2 == *s))
        .collect();
    draw_legend(&painter, axes.plot, &present, text_color);

    // Tooltip for the point under the pointer.
    if let Some(hover) = response.hover_pos() {
        let nearest = screen_points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance(hover)))
            .filter(|(_, d)| *d <= 8.0)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((i, _)) = nearest {
            let (mrp, sales, size) = points[i];
            painter.text(
                screen_points[i] + egui::vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                format!(
                    "Item MRP: {:.2}\nSales: {}\nOutlet Size: {}",
                    mrp,
                    format_sales(sales),
                    size
                ),
                FontId::default(),
                text_color,
            );
        }
    }
}

/// Bar chart of the mean predicted sales per outlet size.
pub fn draw_mean_sales_bars(ui: &mut Ui, history: &SessionHistory) {
    let means = history.mean_sales_by_outlet_size();
    let Some(max_mean) = means.iter().map(|m| m.1).reduce(f64::max) else {
        return;
    };
    let text_color = ui.visuals().text_color();
    let top = if max_mean > 0.0 { max_mean * 1.1 } else { 1.0 };
    let (_response, painter, axes) = chart_frame(
        ui,
        "Outlet Size vs Average Item Sales",
        "Outlet Size",
        "Average Item Sales",
        0.0..=means.len() as f64,
        0.0..=top,
    );

    for (i, &(size, mean)) in means.iter().enumerate() {
        let left = axes.to_screen(i as f64 + 0.2, 0.0);
        let right_top = axes.to_screen(i as f64 + 0.8, mean.max(0.0));
        let bar = Rect::from_two_pos(left, right_top);
        painter.rect_filled(bar, 2.0, SalesApp::outlet_size_color(size));

        painter.text(
            Pos2::new(bar.center().x, axes.plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            size.label(),
            FontId::default(),
            text_color,
        );
        painter.text(
            Pos2::new(bar.center().x, bar.top() - 2.0),
            Align2::CENTER_BOTTOM,
            format_sales(mean),
            FontId::monospace(11.0),
            text_color,
        );
    }

    let sizes: Vec<OutletSize> = means.iter().map(|m| m.0).collect();
    draw_legend(&painter, axes.plot, &sizes, text_color);
}

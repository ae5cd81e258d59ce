use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};
use std::time::Instant;

use crate::config::PlotConfig;
use crate::store::RollingStore;
use crate::types::Channel;
use crate::utils::IntervalTimer;

/// Format a y-axis label at a fixed width so the plot does not shift as the
/// value range changes.
fn format_fixed_width_y_label(value: f64) -> String {
    let abs_value = value.abs();
    if abs_value >= 1000.0 {
        format!("{:>7.1e}", value)
    } else if abs_value >= 100.0 {
        format!("{:>7.0}", value)
    } else if abs_value >= 10.0 {
        format!("{:>7.1}", value)
    } else {
        format!("{:>7.2}", value)
    }
}

/// y-range covering every value with 5% padding, or `None` without data.
pub fn y_bounds<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    let (min, max) = series
        .into_iter()
        .flat_map(|s| s.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });

    if min > max {
        return None;
    }
    let range = (max - min).max(0.1);
    Some((min - range * 0.05, max + range * 0.05))
}

/// Chart layout for one group of three axes.
struct ChartSpec {
    id: &'static str,
    heading: &'static str,
    y_label: &'static str,
    channels: [Channel; 3],
}

const CHARTS: [ChartSpec; 2] = [
    ChartSpec {
        id: "rotation_plot",
        heading: "Rotations",
        y_label: "Rotation (rad/s)",
        channels: Channel::ROTATION,
    },
    ChartSpec {
        id: "acceleration_plot",
        heading: "Accelerations",
        y_label: "Acceleration (m/s^2)",
        channels: Channel::ACCELERATION,
    },
];

/// Rolling rotation/acceleration charts.
///
/// Snapshots are taken from the store on a fixed interval and drawn from the
/// cache in between, so the store is only read, never held.
pub struct TelemetryPlot {
    /// Indexed like `CHARTS`, then by axis
    series: [[Vec<f64>; 3]; 2],
    bounds: [Option<(f64, f64)>; 2],
    capacity: usize,
    refresh: IntervalTimer,
}

impl TelemetryPlot {
    pub fn new(config: &PlotConfig) -> Self {
        Self {
            series: Default::default(),
            bounds: [None, None],
            capacity: config.history_capacity,
            refresh: IntervalTimer::from_millis(config.refresh_interval_ms),
        }
    }

    /// Re-snapshot the store if the refresh interval has elapsed.
    /// Returns true when the cache changed.
    pub fn maybe_refresh(&mut self, store: &RollingStore, now: Instant) -> bool {
        if !self.refresh.poll(now) {
            return false;
        }
        self.refresh_now(store);
        true
    }

    pub fn refresh_now(&mut self, store: &RollingStore) {
        for (chart, spec) in CHARTS.iter().enumerate() {
            for (axis, channel) in spec.channels.iter().enumerate() {
                self.series[chart][axis] = store.snapshot(*channel);
            }
            self.bounds[chart] = y_bounds(self.series[chart].iter().map(Vec::as_slice));
        }
        self.capacity = store.capacity();
    }

    pub fn series(&self, channel: Channel) -> Option<&[f64]> {
        CHARTS.iter().enumerate().find_map(|(chart, spec)| {
            spec.channels
                .iter()
                .position(|c| *c == channel)
                .map(|axis| self.series[chart][axis].as_slice())
        })
    }

    pub fn ui(&self, ui: &mut egui::Ui, config: &PlotConfig) {
        let colors = [
            color(config.colors.x_axis),
            color(config.colors.y_axis),
            color(config.colors.z_axis),
        ];

        for (chart, spec) in CHARTS.iter().enumerate() {
            ui.heading(spec.heading);
            self.plot_chart(ui, chart, spec, &colors, config.plot_height);
            ui.add_space(6.0);
        }
    }

    fn plot_chart(
        &self,
        ui: &mut egui::Ui,
        chart: usize,
        spec: &ChartSpec,
        colors: &[Color32; 3],
        height: f32,
    ) {
        let series = &self.series[chart];
        let bounds = self.bounds[chart];
        let x_max = series
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.capacity)
            .saturating_sub(1) as f64;

        Plot::new(spec.id)
            .height(height)
            .legend(Legend::default())
            .x_axis_label("Samples")
            .y_axis_label(spec.y_label)
            .y_axis_formatter(|v, _| format_fixed_width_y_label(v.value))
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                if let Some((y_min, y_max)) = bounds {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max([0.0, y_min], [x_max.max(1.0), y_max]));
                }

                for (axis, channel) in spec.channels.iter().enumerate() {
                    let points: Vec<[f64; 2]> = series[axis]
                        .iter()
                        .enumerate()
                        .map(|(i, &y)| [i as f64, y])
                        .collect();
                    plot_ui.line(
                        Line::new(channel.label(), PlotPoints::from(points))
                            .color(colors[axis])
                            .width(1.5),
                    );
                }
            });
    }
}

fn color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

//! Plot data derived from the panel state
//! 
//! The renderer only ever sees `PlotData`; which sequence pair to draw is decided
//! here from the view mode and the displayed measurement.

use super::config::{AxisLabels, PlotStyle};
use super::model::{MeasurementModel, ModelChange, ViewMode};

/// One line on the plot
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub label: &'static str,
    pub color: [u8; 4],
    pub y: Vec<f64>,
}

/// Everything needed to draw the displayed measurement
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub title: String,
    pub mode: ViewMode,
    pub x: Vec<f64>,
    pub traces: Vec<Trace>,
    pub labels: AxisLabels,
    pub line_width: f32,
    pub show_grid: bool,
}

impl PlotData {
    /// Derive plot data for the current mode
    /// 
    /// # Returns
    /// `None` while no measurement is displayed
    pub fn derive(model: &MeasurementModel, style: &PlotStyle) -> Option<Self> {
        let measurement = model.displayed_measurement()?;
        let mode = model.view_mode();

        let (x, samples, labels) = match mode {
            ViewMode::Time => (
                measurement.tdx().to_vec(),
                measurement.tdy(),
                style.time_labels.clone(),
            ),
            ViewMode::Fft => (
                // Hz → MHz
                measurement.fdx().iter().map(|f| f * 1e-6).collect(),
                measurement.fdy(),
                style.frequency_labels.clone(),
            ),
        };

        let mut traces = vec![
            Trace {
                label: "Real",
                color: style.real_color,
                y: samples.iter().map(|c| c.re).collect(),
            },
            Trace {
                label: "Imaginary",
                color: style.imag_color,
                y: samples.iter().map(|c| c.im).collect(),
            },
        ];
        if style.show_magnitude {
            traces.push(Trace {
                label: "Magnitude",
                color: style.magnitude_color,
                y: samples.iter().map(|c| c.norm()).collect(),
            });
        }

        Some(Self {
            title: measurement.name().to_string(),
            mode,
            x,
            traces,
            labels,
            line_width: style.line_width,
            show_grid: style.show_grid,
        })
    }
}

/// Drawing backend provided by the host
pub trait Renderer {
    fn render(&mut self, plot: &PlotData);

    /// Nothing to show
    fn clear(&mut self);
}

/// Plot area of the panel
/// 
/// Owns its style from construction on.
pub struct PlotView<R: Renderer> {
    style: PlotStyle,
    renderer: R,
}

impl<R: Renderer> PlotView<R> {
    pub fn new(style: PlotStyle, renderer: R) -> Self {
        Self { style, renderer }
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Redraw from scratch
    pub fn redraw(&mut self, model: &MeasurementModel) {
        match PlotData::derive(model, &self.style) {
            Some(plot) => self.renderer.render(&plot),
            None => self.renderer.clear(),
        }
    }

    /// Redraw if any of `changes` affects the plot
    /// 
    /// # Returns
    /// Whether a redraw happened
    pub fn apply_changes(&mut self, model: &MeasurementModel, changes: &[ModelChange]) -> bool {
        let affected = changes
            .iter()
            .any(|c| matches!(c, ModelChange::ViewMode(_) | ModelChange::Displayed(_)));
        if affected {
            self.redraw(model);
        }
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Measurement;
    use num_complex::Complex64;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<PlotData>,
        clears: usize,
    }

    impl Renderer for Recorder {
        fn render(&mut self, plot: &PlotData) {
            self.frames.push(plot.clone());
        }

        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    fn model_with_signal() -> MeasurementModel {
        let mut model = MeasurementModel::default();
        let tdx = (0..8).map(|k| k as f64).collect();
        let tdy = vec![Complex64::new(3.0, 4.0); 8];
        model.add_and_display(Measurement::new(tdx, tdy, 1e6, 0.0).unwrap());
        model
    }

    #[test]
    fn test_time_view_traces() {
        let model = model_with_signal();
        let plot = PlotData::derive(&model, &PlotStyle::default()).unwrap();

        assert_eq!(plot.mode, ViewMode::Time);
        assert_eq!(plot.x, (0..8).map(|k| k as f64).collect::<Vec<_>>());
        assert_eq!(plot.traces.len(), 3);
        assert_eq!(plot.traces[0].y[0], 3.0);
        assert_eq!(plot.traces[1].y[0], 4.0);
        assert_eq!(plot.traces[2].y[0], 5.0);
    }

    #[test]
    fn test_fft_view_uses_frequency_axis() {
        let mut model = model_with_signal();
        model.toggle_view_mode();
        let style = PlotStyle {
            show_magnitude: false,
            ..PlotStyle::default()
        };
        let plot = PlotData::derive(&model, &style).unwrap();

        assert_eq!(plot.mode, ViewMode::Fft);
        assert_eq!(plot.traces.len(), 2);
        assert_eq!(plot.labels, style.frequency_labels);
        // 1 µs dwell, 8 points: axis spans -0.5 MHz .. 0.375 MHz
        assert!((plot.x[0] + 0.5).abs() < 1e-12);
        assert!((plot.x[4]).abs() < 1e-12);
    }

    #[test]
    fn test_view_redraws_on_relevant_changes() {
        let mut model = MeasurementModel::default();
        let mut view = PlotView::new(PlotStyle::default(), Recorder::default());

        view.redraw(&model);
        assert_eq!(view.renderer().clears, 1);

        model.set_busy(true);
        let changes = model.take_changes();
        assert!(!view.apply_changes(&model, &changes));

        let mut model = model_with_signal();
        let changes = model.take_changes();
        assert!(view.apply_changes(&model, &changes));
        assert_eq!(view.renderer().frames.len(), 1);
    }
}

//! Declarative chart descriptions.
//!
//! A [`ChartSpec`] is what the dashboard hands to a renderer: an ordered list of
//! traces plus layout flags. It is rebuilt on every recompute and carries no
//! identity.
//!
//! Line (`scatter`) and waterfall traces use the plotting vocabulary's field
//! shapes. Indicator cards carry pre-formatted text and flat colours, and
//! `layout.note` is Vista's own; a renderer maps those itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::transform::Measure;

/// Fixed colour palette.
pub mod palette {
    /// Decreasing waterfall bars.
    pub const RED: &str = "#AD1B02";
    /// Increasing waterfall bars.
    pub const ORANGE: &str = "#E88D14";
    /// Total waterfall bars.
    pub const PINK: &str = "#E669A2";
    /// Indicator number text.
    pub const GREY: &str = "#7E7E7E";
    /// Indicator title text.
    pub const DARK_GREY: &str = "#333333";
    /// Waterfall connector lines.
    pub const CONNECTOR: &str = "rgb(63, 63, 63)";

    /// Line colours, cycled per trace.
    pub const SERIES: [&str; 6] = ["#E88D14", "#AD1B02", "#E669A2", "#7E7E7E", "#333333", "#F2C14E"];

    /// Colour of the `i`-th line trace.
    pub fn series(i: usize) -> &'static str {
        SERIES[i % SERIES.len()]
    }
}

/// Layout theme.
pub const TEMPLATE: &str = "plotly_white";

/// Width of waterfall bars as a fraction of the category slot.
pub const BAR_WIDTH: f64 = 0.5;

/// Hover label of waterfall bars.
pub const WATERFALL_HOVER: &str = "%{x}: %{y:$.2s}<extra></extra>";

/// Value on a category or date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    /// Calendar date.
    Date(NaiveDate),
    /// Integer position such as a projection year.
    Int(i64),
    /// Category label.
    Label(String),
}

/// How a line trace draws its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// Joined lines.
    Lines,
    /// Joined lines with point markers.
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Line stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke colour.
    pub color: String,
    /// Dash pattern, solid when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

/// Fill colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Colour.
    pub color: String,
}

/// Style of one waterfall direction, `{"marker": {"color": ..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarStyle {
    /// Bar fill.
    pub marker: Marker,
}

impl BarStyle {
    /// Bars filled with `color`.
    pub fn filled(color: &str) -> Self {
        Self {
            marker: Marker {
                color: color.to_string(),
            },
        }
    }
}

/// Stroke of a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorLine {
    /// Colour.
    pub color: String,
}

/// Waterfall connector, `{"line": {"color": ..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Connector stroke.
    pub line: ConnectorLine,
}

impl Default for Connector {
    fn default() -> Self {
        Self {
            line: ConnectorLine {
                color: palette::CONNECTOR.to_string(),
            },
        }
    }
}

/// Delta display of an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// Baseline value the live value is compared to.
    pub reference: f64,
    /// `value - reference`.
    pub value: f64,
}

/// Trace kinds the assembler emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    /// Line chart series.
    #[serde(rename = "scatter")]
    Line {
        /// Legend label.
        name: String,
        /// X positions.
        x: Vec<AxisValue>,
        /// Y values; `None` leaves a gap.
        y: Vec<Option<f64>>,
        /// Draw mode.
        mode: DrawMode,
        /// Stroke.
        line: LineStyle,
    },
    /// Waterfall chart.
    Waterfall {
        /// Bar labels.
        x: Vec<String>,
        /// Signed bar values.
        y: Vec<f64>,
        /// Relative or total per bar.
        measure: Vec<Measure>,
        /// Where bar text sits.
        textposition: String,
        /// Hover label format.
        hovertemplate: String,
        /// Increasing bar style.
        increasing: BarStyle,
        /// Decreasing bar style.
        decreasing: BarStyle,
        /// Total bar style.
        totals: BarStyle,
        /// Connector line.
        connector: Connector,
        /// Bar width.
        width: f64,
    },
    /// Single number with a delta against a reference.
    Indicator {
        /// Title text.
        title: String,
        /// Live value.
        value: f64,
        /// Delta against the baseline.
        delta: Delta,
        /// Number prefix.
        prefix: String,
        /// Pre-formatted value text.
        display: String,
        /// Title colour.
        title_color: String,
        /// Number colour.
        number_color: String,
    },
}

/// Plot margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    /// Left.
    pub l: u32,
    /// Right.
    pub r: u32,
    /// Top.
    pub t: u32,
    /// Bottom.
    pub b: u32,
}

/// Layout flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Whether a legend is drawn.
    pub showlegend: bool,
    /// Theme name.
    pub template: String,
    /// Chart title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Plot margins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    /// Message shown in place of data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            showlegend: true,
            template: TEMPLATE.to_string(),
            title: None,
            margin: None,
            note: None,
        }
    }
}

/// A renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Traces in draw order.
    pub traces: Vec<Trace>,
    /// Layout.
    pub layout: Layout,
}

impl ChartSpec {
    /// Chart with the given traces and default layout.
    pub fn new(traces: Vec<Trace>) -> Self {
        Self {
            traces,
            layout: Layout::default(),
        }
    }

    /// Neutral chart with no traces.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns true if the chart has no traces.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.layout.title = Some(title.into());
        self
    }

    /// Sets legend visibility.
    pub fn with_legend(mut self, show: bool) -> Self {
        self.layout.showlegend = show;
        self
    }

    /// Sets plot margins.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.layout.margin = Some(margin);
        self
    }

    /// Attaches a note for the renderer to show.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.layout.note = Some(note.into());
        self
    }

    /// Deterministic JSON encoding.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

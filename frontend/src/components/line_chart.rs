//! Minimal SVG line chart for date-indexed balances.
//!
//! Gaps (`None`) break a line into separate segments. A series without a
//! single value is left out, legend entry included.

use yew::prelude::*;

use crate::format::format_amount;

const WIDTH: f64 = 800.0;
const PAD_LEFT: f64 = 90.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 20.0;
const PAD_BOTTOM: f64 = 40.0;
const Y_TICKS: usize = 5;
const MAX_X_LABELS: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub values: Vec<Option<f64>>,
}

impl Series {
    fn has_values(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }
}

#[derive(Properties, PartialEq)]
pub struct LineChartProps {
    /// One label per x position, shared by every series.
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    #[prop_or(320.0)]
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Frame {
    count: usize,
    min: f64,
    max: f64,
    height: f64,
}

impl Frame {
    fn plot_height(&self) -> f64 {
        self.height - PAD_TOP - PAD_BOTTOM
    }

    fn x(&self, index: usize) -> f64 {
        let plot_width = WIDTH - PAD_LEFT - PAD_RIGHT;
        if self.count <= 1 {
            PAD_LEFT + plot_width / 2.0
        } else {
            PAD_LEFT + plot_width * index as f64 / (self.count - 1) as f64
        }
    }

    fn y(&self, value: f64) -> f64 {
        if self.max == self.min {
            PAD_TOP + self.plot_height() / 2.0
        } else {
            PAD_TOP + (self.max - value) / (self.max - self.min) * self.plot_height()
        }
    }
}

fn value_range<'a>(series: impl IntoIterator<Item = &'a Series>) -> Option<(f64, f64)> {
    series
        .into_iter()
        .flat_map(|s| s.values.iter().flatten().copied())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// `points` attribute strings, one per run of consecutive values.
fn segments(values: &[Option<f64>], frame: &Frame) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push(format!("{:.1},{:.1}", frame.x(i), frame.y(*v))),
            None if !current.is_empty() => out.push(std::mem::take(&mut current).join(" ")),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}

/// Indices that get an x-axis label; always includes the first and last.
fn label_indices(count: usize) -> Vec<usize> {
    if count <= MAX_X_LABELS {
        return (0..count).collect();
    }
    let step = (count - 1) as f64 / (MAX_X_LABELS - 1) as f64;
    (0..MAX_X_LABELS)
        .map(|i| (i as f64 * step).round() as usize)
        .collect()
}

#[function_component(LineChart)]
pub fn line_chart(props: &LineChartProps) -> Html {
    let visible: Vec<&Series> = props.series.iter().filter(|s| s.has_values()).collect();
    let Some((min, max)) = value_range(visible.iter().copied()) else {
        return html! {
            <p class="text-sm text-muted-foreground">{"No data to chart."}</p>
        };
    };

    let frame = Frame {
        count: props.labels.len(),
        min,
        max,
        height: props.height,
    };
    let view_box = format!("0 0 {} {}", WIDTH, props.height);

    let y_axis = (0..Y_TICKS).map(|i| {
        let value = if Y_TICKS > 1 {
            min + (max - min) * i as f64 / (Y_TICKS - 1) as f64
        } else {
            min
        };
        let y = format!("{:.1}", frame.y(value));
        html! {
            <g>
                <line x1={PAD_LEFT.to_string()} x2={(WIDTH - PAD_RIGHT).to_string()} y1={y.clone()} y2={y.clone()} stroke="#e2e8f0" stroke-width="1" />
                <text x={(PAD_LEFT - 8.0).to_string()} y={y} text-anchor="end" dominant-baseline="middle" font-size="11" fill="#64748b">
                    { format_amount(value) }
                </text>
            </g>
        }
    });

    let x_axis = label_indices(frame.count).into_iter().map(|i| {
        let label = props.labels.get(i).cloned().unwrap_or_default();
        html! {
            <text x={format!("{:.1}", frame.x(i))} y={(props.height - PAD_BOTTOM + 18.0).to_string()} text-anchor="middle" font-size="11" fill="#64748b">
                { label }
            </text>
        }
    });

    let lines = visible.iter().flat_map(|s| {
        segments(&s.values, &frame).into_iter().map(move |points| {
            html! {
                <polyline points={points} fill="none" stroke={s.color} stroke-width="2" />
            }
        })
    });

    html! {
        <div class="space-y-2">
            <svg viewBox={view_box} class="w-full h-auto">
                { for y_axis }
                { for x_axis }
                { for lines }
            </svg>
            <div class="flex gap-4 text-xs text-muted-foreground justify-center">
                { for visible.iter().map(|s| html! {
                    <span class="flex items-center gap-1">
                        <span class="inline-block w-3 h-3 rounded-sm" style={format!("background:{}", s.color)}></span>
                        { s.label }
                    </span>
                }) }
            </div>
        </div>
    }
}

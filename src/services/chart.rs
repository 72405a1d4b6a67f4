//! 图表生成
//!
//! 将时间序列转换为 OHLC 四条数据序列，并用 plotters 渲染为可直接嵌入页面的 SVG

use plotters::prelude::*;

use crate::config::ChartConfig;
use crate::error::{StockError, StockResult};
use crate::models::{ChartKind, ChartSpec, RenderedChart, TimeSeries};

// Solarized 深色配色
const BACKGROUND: RGBColor = RGBColor(0x00, 0x2b, 0x36);
const FOREGROUND: RGBColor = RGBColor(0x83, 0x94, 0x96);
const GRID: RGBColor = RGBColor(0x07, 0x36, 0x42);
const PALETTE: [RGBColor; 4] = [
    RGBColor(0xb5, 0x89, 0x00),
    RGBColor(0xcb, 0x4b, 0x16),
    RGBColor(0xdc, 0x32, 0x2f),
    RGBColor(0x26, 0x8b, 0xd2),
];

/// 横轴最多显示的日期标签数
const MAX_X_LABELS: usize = 12;

/// 生成图表
///
/// 先校验图表类型，类型无效时不读取任何数据
pub fn build_chart(
    series: &TimeSeries,
    title: &str,
    kind: &str,
    options: &ChartConfig,
) -> StockResult<RenderedChart> {
    let kind: ChartKind = kind.parse()?;
    let spec = ChartSpec::from_series(series, title, kind)?;
    render_svg(&spec, options)
}

/// 渲染为 SVG 字符串
pub fn render_svg(spec: &ChartSpec, options: &ChartConfig) -> StockResult<RenderedChart> {
    let count = spec.labels.len();
    if spec.series().iter().any(|(_, values)| values.iter().any(|v| !v.is_finite())) {
        return Err(StockError::Render("数据中包含非有限数值".to_string()));
    }
    let (min, max) = spec
        .value_range()
        .ok_or_else(|| StockError::Render("没有可绘制的数据".to_string()))?;
    let (y_min, y_max) = padded_range(min, max);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height)).into_drawing_area();
        root.fill(&BACKGROUND).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(&spec.title, ("sans-serif", 24).into_font().color(&FOREGROUND))
            .x_label_area_size(70)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(count as f64 - 0.5), y_min..y_max)
            .map_err(render_error)?;

        let labels = &spec.labels;
        let label_at = |x: &f64| date_label(labels, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(count.min(MAX_X_LABELS))
            .x_label_formatter(&label_at)
            .y_label_formatter(&|y| format!("{:.2}", y))
            .axis_style(FOREGROUND)
            .light_line_style(GRID)
            .bold_line_style(GRID)
            .label_style(("sans-serif", 12).into_font().color(&FOREGROUND))
            .draw()
            .map_err(render_error)?;

        let bar_width = 0.8 / PALETTE.len() as f64;
        for (idx, (name, values)) in spec.series().into_iter().enumerate() {
            let color = PALETTE[idx];
            let annotation = match spec.kind {
                ChartKind::Line => chart.draw_series(LineSeries::new(
                    values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                    color.stroke_width(2),
                )),
                ChartKind::Bar => chart.draw_series(values.iter().enumerate().map(|(i, v)| {
                    let left = i as f64 - 0.4 + idx as f64 * bar_width;
                    Rectangle::new([(left, y_min), (left + bar_width, *v)], color.filled())
                })),
            }
            .map_err(render_error)?;

            annotation
                .label(name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(BACKGROUND.mix(0.8))
            .border_style(FOREGROUND)
            .label_font(("sans-serif", 12).into_font().color(&FOREGROUND))
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    Ok(RenderedChart(svg))
}

/// 上下各留 5% 空白，单一数值时扩展为 ±1
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// 横轴刻度只在整数位置显示对应日期
fn date_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn render_error<E: std::fmt::Display>(e: E) -> StockError {
    StockError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSeriesPoint;
    use serde_json::json;

    fn two_day_series() -> TimeSeries {
        let raw = json!({
            "2024-01-02": {"1. open": "100", "2. high": "105", "3. low": "99", "4. close": "102"},
            "2024-01-03": {"1. open": "102", "2. high": "103", "3. low": "101", "4. close": "101.5"}
        });
        TimeSeries::from_json(raw.as_object().unwrap())
    }

    fn options() -> ChartConfig {
        ChartConfig::default()
    }

    #[test]
    fn test_spec_from_two_day_series() {
        let spec = ChartSpec::from_series(&two_day_series(), "X", ChartKind::Line).unwrap();
        assert_eq!(spec.title, "X");
        assert_eq!(spec.labels, vec!["2024-01-02", "2024-01-03"]);
        assert_eq!(spec.open, vec![100.0, 102.0]);
        assert_eq!(spec.high, vec![105.0, 103.0]);
        assert_eq!(spec.low, vec![99.0, 101.0]);
        assert_eq!(spec.close, vec![102.0, 101.5]);

        let names: Vec<&str> = spec.series().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Open", "High", "Low", "Close"]);
        assert!(spec.series().iter().all(|(_, values)| values.len() == 2));
        assert_eq!(spec.value_range(), Some((99.0, 105.0)));
    }

    #[test]
    fn test_labels_follow_series_order() {
        let raw = json!({
            "2024-01-03": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1"},
            "2024-01-02": {"1. open": "2", "2. high": "2", "3. low": "2", "4. close": "2"}
        });
        let series = TimeSeries::from_json(raw.as_object().unwrap());
        let spec = ChartSpec::from_series(&series, "X", ChartKind::Bar).unwrap();
        assert_eq!(spec.labels, vec!["2024-01-03", "2024-01-02"]);
        assert_eq!(spec.open, vec![1.0, 2.0]);
    }

    #[test]
    fn test_invalid_kind_rejected_before_reading_data() {
        // 数据本身也是坏的，但应先报图表类型错误
        let bad = TimeSeries::new(vec![TimeSeriesPoint::new(
            "2024-01-02",
            json!({"1. open": "oops"}).as_object().cloned().unwrap(),
        )]);
        for kind in ["Pie", "line", ""] {
            assert!(matches!(
                build_chart(&bad, "X", kind, &options()),
                Err(StockError::InvalidChartKind(_))
            ));
        }
    }

    #[test]
    fn test_non_numeric_field_fails_request() {
        let bad = TimeSeries::new(vec![TimeSeriesPoint::new(
            "2024-01-02",
            json!({"1. open": "1", "2. high": "abc", "3. low": "1", "4. close": "1"})
                .as_object()
                .cloned()
                .unwrap(),
        )]);
        match build_chart(&bad, "X", "Line", &options()) {
            Err(StockError::InvalidFieldValue { date, field, value }) => {
                assert_eq!(date, "2024-01-02");
                assert_eq!(field, "2. high");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_field_fails_request() {
        for raw in ["NaN", "inf"] {
            let bad = TimeSeries::new(vec![TimeSeriesPoint::new(
                "2024-01-02",
                json!({"1. open": raw, "2. high": "1", "3. low": "1", "4. close": "1"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )]);
            for kind in ["Line", "Bar"] {
                match build_chart(&bad, "X", kind, &options()) {
                    Err(StockError::InvalidFieldValue { field, value, .. }) => {
                        assert_eq!(field, "1. open");
                        assert_eq!(value, raw);
                    }
                    other => panic!("unexpected: {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_render_line_chart_svg() {
        let chart = build_chart(&two_day_series(), "IBM Stock Prices", "Line", &options()).unwrap();
        let svg = chart.svg();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("IBM Stock Prices"));
        for name in ["Open", "High", "Low", "Close"] {
            assert!(svg.contains(name), "缺少图例 {}", name);
        }
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn test_render_bar_chart_svg() {
        let chart = build_chart(&two_day_series(), "Bars", "Bar", &options()).unwrap();
        let svg = chart.svg();
        assert!(svg.contains("Bars"));
        // 背景 + 8 根柱子 + 4 个图例色块 + 图例背景
        assert!(svg.matches("<rect").count() >= 8);
    }

    #[test]
    fn test_render_single_point_with_flat_values() {
        let raw = json!({"2024-01-02": {"1. open": "5", "2. high": "5", "3. low": "5", "4. close": "5"}});
        let series = TimeSeries::from_json(raw.as_object().unwrap());
        assert!(build_chart(&series, "Flat", "Line", &options()).is_ok());
    }

    #[test]
    fn test_empty_spec_cannot_render() {
        let spec = ChartSpec::from_series(&TimeSeries::default(), "Empty", ChartKind::Line).unwrap();
        assert!(matches!(render_svg(&spec, &options()), Err(StockError::Render(_))));
    }

    #[test]
    fn test_render_rejects_non_finite_spec() {
        let mut spec = ChartSpec::from_series(&two_day_series(), "X", ChartKind::Line).unwrap();
        spec.close[1] = f64::INFINITY;
        assert!(matches!(render_svg(&spec, &options()), Err(StockError::Render(_))));
        spec.close[1] = f64::NAN;
        assert!(matches!(render_svg(&spec, &options()), Err(StockError::Render(_))));
    }

    #[test]
    fn test_date_label_only_on_integer_ticks() {
        let labels = vec!["2024-01-02".to_string(), "2024-01-03".to_string()];
        assert_eq!(date_label(&labels, 0.0), "2024-01-02");
        assert_eq!(date_label(&labels, 1.0), "2024-01-03");
        assert_eq!(date_label(&labels, 0.5), "");
        assert_eq!(date_label(&labels, -0.5), "");
        assert_eq!(date_label(&labels, 2.0), "");
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(5.0, 5.0), (4.0, 6.0));
        let (lo, hi) = padded_range(100.0, 200.0);
        assert_eq!((lo, hi), (95.0, 205.0));
    }
}

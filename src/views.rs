//! 页面渲染
//!
//! 单页表单：选择股票代码、时间粒度、图表类型和日期区间，下方内嵌 SVG 图表

use crate::models::{ChartForm, ChartKind, RenderedChart, FUNCTIONS};

/// 首页渲染所需数据
#[derive(Debug, Default)]
pub struct IndexPage<'a> {
    pub symbols: &'a [String],
    /// 上次提交的表单，用于保留选择
    pub form: Option<&'a ChartForm>,
    pub chart: Option<&'a RenderedChart>,
    /// 本次请求失败的原因
    pub message: Option<String>,
}

pub fn render_index(page: &IndexPage<'_>) -> String {
    let selected_symbol = page.form.map(|f| f.symbol.as_str());
    let selected_kind = page.form.map(|f| f.chart_type.as_str());
    let selected_function = page.form.map(|f| f.function.as_str());
    let start_date = page.form.map(|f| f.start_date.as_str()).unwrap_or_default();
    let end_date = page.form.map(|f| f.end_date.as_str()).unwrap_or_default();

    let mut symbol_options = String::new();
    for symbol in page.symbols {
        push_option(&mut symbol_options, symbol, symbol, selected_symbol == Some(symbol.as_str()));
    }

    let mut kind_options = String::new();
    for kind in ChartKind::ALL {
        push_option(&mut kind_options, kind.as_str(), kind.as_str(), selected_kind == Some(kind.as_str()));
    }

    let mut function_options = String::new();
    for (value, label) in FUNCTIONS {
        push_option(&mut function_options, value, label, selected_function == Some(*value));
    }

    let message = page
        .message
        .as_deref()
        .map(|m| format!("<p class=\"error\">{}</p>\n", escape_html(m)))
        .unwrap_or_default();

    let chart = page
        .chart
        .map(|c| format!("<div class=\"chart\">\n{}\n</div>\n", c.svg()))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stock Data Visualizer</title>
<style>
body {{ font-family: sans-serif; background: #fdf6e3; color: #073642; margin: 2em; }}
form {{ display: grid; grid-template-columns: max-content 16em; gap: 0.6em 1em; }}
.error {{ color: #dc322f; }}
.chart {{ margin-top: 2em; }}
</style>
</head>
<body>
<h1>Stock Data Visualizer</h1>
{message}<form method="post" action="/">
<label for="symbol">Symbol</label>
<select id="symbol" name="symbol" required>
{symbol_options}</select>
<label for="chart_type">Chart Type</label>
<select id="chart_type" name="chart_type" required>
{kind_options}</select>
<label for="function">Time Series</label>
<select id="function" name="function" required>
{function_options}</select>
<label for="start_date">Start Date</label>
<input type="date" id="start_date" name="start_date" value="{start_date}" required>
<label for="end_date">End Date</label>
<input type="date" id="end_date" name="end_date" value="{end_date}" required>
<span></span>
<button type="submit">Generate Chart</button>
</form>
{chart}</body>
</html>
"#,
        message = message,
        symbol_options = symbol_options,
        kind_options = kind_options,
        function_options = function_options,
        start_date = escape_html(start_date),
        end_date = escape_html(end_date),
        chart = chart,
    )
}

fn push_option(out: &mut String, value: &str, label: &str, selected: bool) {
    out.push_str(&format!(
        "<option value=\"{}\"{}>{}</option>\n",
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    ));
}

/// 转义 HTML 特殊字符
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

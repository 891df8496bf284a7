//! ECharts containers and the helpers shared by the summary and dashboard charts.
//!
//! Charts are built with `charming`, serialized to JSON and initialised by a
//! script in the page head.

use charming::{
    Chart,
    component::{Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, Color, JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, summary::CategoryExpense};

/// A chart with its HTML container ID and ECharts configuration.
pub struct ChartView {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// A grid of empty containers that [charts_head_elements] fills in.
pub fn charts_view(charts: &[ChartView]) -> Markup {
    html!(
        div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
        {
            @for chart in charts {
                div
                    id=(chart.id)
                    data-chart="true"
                    class="min-h-[380px] rounded dark:bg-gray-100"
                {}
            }
        }
    )
}

/// The head elements that load ECharts and initialise `charts`, with dark
/// mode support and resizing.
pub fn charts_head_elements(charts: &[ChartView]) -> [HeadElement; 2] {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        HeadElement::ScriptSource(PreEscaped(wrapped_script)),
    ]
}

pub fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IE', {
              style: 'currency',
              currency: 'EUR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// An axis tooltip that shows values as euros.
pub fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

pub fn chart_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .top(70)
        .contain_label(true)
}

/// A doughnut chart of expenses, one slice per category in its own color.
pub fn category_chart(title: &str, categories: &[CategoryExpense]) -> Chart {
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|category| (category.total, category.name.as_str()))
        .collect();
    let colors: Vec<Color> = categories
        .iter()
        .map(|category| Color::from(category.color.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .color(colors)
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .center(vec!["50%", "50%"])
                .data(data),
        )
}

//! The pie chart of spending by category on the ledger page.
//!
//! The chart is generated as ECharts options with `charming` and initialised
//! by a small script once the page has loaded.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::html::HeadElement;

use super::core::Category;

/// The HTML element ID of the category chart container.
pub const CATEGORY_CHART_ID: &str = "category-chart";

/// Build the pie chart of `totals`.
pub fn category_chart(totals: &[(Category, f64)]) -> Chart {
    let data = totals
        .iter()
        .map(|(category, total)| (*total, category.label()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Spending by Category").left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom(0))
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// Renders the container the chart is drawn into.
pub fn category_chart_view() -> Markup {
    html!(
        div
            id=(CATEGORY_CHART_ID)
            class="min-h-[380px] w-full rounded dark:bg-gray-100"
        {}
    )
}

/// Generates the script that draws `chart` once the page has loaded.
///
/// The chart follows the browser's dark mode setting and resizes with the window.
pub fn category_chart_script(chart: &Chart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
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
        }});"#,
        CATEGORY_CHART_ID, chart
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

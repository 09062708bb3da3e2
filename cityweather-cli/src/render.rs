use cityweather_core::{CurrentConditions, ForecastSet, QueryResult};

const DAY_FORMAT: &str = "%a %d %b";

pub fn render_current(current: &CurrentConditions) -> String {
    format!(
        "{}\n{:.1}°C\n{}\n",
        current.location,
        current.temperature_c,
        capitalize_words(&current.description)
    )
}

pub fn render_forecast(forecast: &ForecastSet) -> String {
    if forecast.is_empty() {
        return String::new();
    }

    let mut out = String::from("\nForecast\n");
    for entry in forecast {
        out.push_str(&format!(
            "  {}  {:>6.1}°C  {}\n",
            entry.timestamp.format(DAY_FORMAT),
            entry.temperature_c,
            capitalize_words(&entry.description)
        ));
    }
    out
}

pub fn render_result(result: &QueryResult) -> String {
    let mut out = render_current(&result.current);
    out.push_str(&render_forecast(&result.forecast));
    out
}

/// "clear sky" -> "Clear Sky"
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

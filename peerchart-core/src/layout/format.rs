/// Round to one decimal place, halves away from zero.
pub fn round1dp(x: f64) -> f64 {
    let r = (x * 10.0).round() / 10.0;
    if r == 0.0 { 0.0 } else { r } // normalise -0.0
}

/// Label text for a marker value: always exactly one decimal digit.
pub fn format_one_decimal(x: f64) -> String {
    format!("{:.1}", round1dp(x))
}

/// Tick label text; `step` decides how many decimals are significant.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    let s = format!("{:.*}", decimals, value);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

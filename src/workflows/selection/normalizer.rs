/// Collapse a free-text measurement cell into one representative number.
///
/// Catalog spreadsheets carry values like `"5, 10"`, `"≥ 3.5"`, `"< 10"`, or
/// `"1,200"`. Qualifier symbols are stripped without interpreting their
/// direction; every numeric token left over contributes to an arithmetic
/// mean, rounded to two decimals. Unit text is ignored, not understood, so
/// callers must only apply this to fields where digits mean the measurement.
pub(crate) fn normalize_measurement(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .replace(',', "")
        .replace(['*', '<', '>', '\u{2265}', '\u{2264}'], "");

    let tokens = numeric_tokens(&cleaned);
    if tokens.is_empty() {
        return None;
    }

    let mean = tokens.iter().sum::<f64>() / tokens.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

/// Scan for maximal `digits [ '.' digits ]` runs; a trailing dot is tolerated.
fn numeric_tokens(value: &str) -> Vec<f64> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut seen_dot = false;

    for ch in value.chars() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if ch == '.' && !seen_dot && !current.is_empty() {
            current.push(ch);
            seen_dot = true;
        } else {
            push_token(&mut tokens, &mut current);
            seen_dot = false;
        }
    }
    push_token(&mut tokens, &mut current);

    tokens
}

fn push_token(tokens: &mut Vec<f64>, current: &mut String) {
    if current.is_empty() {
        return;
    }

    if let Ok(parsed) = current.trim_end_matches('.').parse::<f64>() {
        tokens.push(parsed);
    }
    current.clear();
}

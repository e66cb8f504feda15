//! Number ⇄ text conversion shared by `str:`, `num:`, `print:` and prompts

/// Format a number the way the display shows it: four decimals with trailing
/// zeros removed, or `d.dddde<exp>` outside 0.001..=10^7.
pub fn format_number(number: f32) -> String {
    if number.is_nan() {
        return "nan".to_string();
    }
    if number.is_infinite() {
        return if number > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if number == 0.0 {
        return "0".to_string();
    }

    let mut magnitude = number.abs();
    if magnitude > 10_000_000.0 || magnitude < 0.001 {
        let mut exponent = 0i32;
        while magnitude >= 10.0 {
            magnitude /= 10.0;
            exponent += 1;
        }
        while magnitude < 1.0 {
            magnitude *= 10.0;
            exponent -= 1;
        }
        let mantissa = if number < 0.0 { -magnitude } else { magnitude };
        return format!("{:.4}e{}", mantissa, exponent);
    }

    let text = format!("{:.4}", number);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse the longest numeric prefix of `text`, C `atof` style. Text without a
/// leading number parses as 0.
pub fn parse_number(text: &[u8]) -> f32 {
    let start = text
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(text.len());
    let text = &text[start..];

    let digits_from = |from: usize| {
        text[from..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(text.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let integer = digits_from(end);
    end += integer;
    let mut fraction = 0;
    if text.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        end += 1 + fraction;
    }
    if integer + fraction == 0 {
        return 0.0;
    }
    if matches!(text.get(end), Some(b'e') | Some(b'E')) {
        let mut exponent_end = end + 1;
        if matches!(text.get(exponent_end), Some(b'+') | Some(b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = digits_from(exponent_end);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    std::str::from_utf8(&text[..end])
        .ok()
        .and_then(|number| number.parse::<f32>().ok())
        .unwrap_or(0.0)
}

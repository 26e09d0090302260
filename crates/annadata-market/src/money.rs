//! Rupee formatting.

/// Format paise as rupees with Indian digit grouping, e.g. `12,34,567.50`.
/// Whole-rupee amounts drop the paise.
pub fn format_inr(paise: u64) -> String {
    let rupees = paise / 100;
    let rem = paise % 100;
    let digits = rupees.to_string();

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, last3) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        if end > 0 {
            groups.push(&head[..end]);
        }
        groups.reverse();
        format!("{},{last3}", groups.join(","))
    };

    if rem == 0 {
        grouped
    } else {
        format!("{grouped}.{rem:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0), "0");
        assert_eq!(format_inr(4_500), "45");
        assert_eq!(format_inr(4_505), "45.05");
        assert_eq!(format_inr(99_900), "999");
        assert_eq!(format_inr(100_000), "1,000");
        assert_eq!(format_inr(1_250_050), "12,500.50");
        assert_eq!(format_inr(123_456_700), "12,34,567");
        assert_eq!(format_inr(1_234_567_800), "1,23,45,678");
    }
}

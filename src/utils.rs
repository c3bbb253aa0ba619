/*!
 * Utility functions for dagdump
 */

/// Shorten a CID for display, keeping both ends
pub fn abbreviate_cid(cid: &str, max_len: usize) -> String {
    let chars: Vec<char> = cid.chars().collect();
    if chars.len() <= max_len || max_len < 5 {
        return cid.to_string();
    }

    let keep = max_len - 3;
    let head = keep - keep / 2;
    let tail = keep / 2;

    let mut short: String = chars[..head].iter().collect();
    short.push_str("...");
    short.extend(&chars[chars.len() - tail..]);
    short
}

/// Format a number with human-readable units
pub fn format_number(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate_cid() {
        assert_eq!(abbreviate_cid("bafyshort", 24), "bafyshort");
        assert_eq!(
            abbreviate_cid("bafyb4iadbza7ckc3djc2k5lfaorwaufcjurzxzkjsj5e7qt2wrguqs7ywm", 13),
            "bafyb...s7ywm"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(2_340_000), "2.3M");
    }
}

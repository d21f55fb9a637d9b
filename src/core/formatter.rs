/// Returns "$1,234.56": two decimals, thousands separated.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, whole, cents % 100)
}

/// Round to two decimals, for machine-readable output.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Returns "3,150.0 GB", or "1.25 TB" from 1024 GB upward.
pub fn format_gb(size_gb: f64) -> String {
    if size_gb >= 1024.0 {
        format!("{:.2} TB", size_gb / 1024.0)
    } else {
        let tenths = (size_gb.max(0.0) * 10.0).round() as u64;
        format!("{}.{} GB", group_thousands(tenths / 10), tenths % 10)
    }
}

/// Returns "12.5%".
pub fn format_share(share: f64) -> String {
    format!("{:.1}%", share.clamp(0.0, 1.0) * 100.0)
}

/// Returns "[████░░░░░░░░]" where █ is the layer's share of the total.
/// Width is the number of block characters inside the brackets.
pub fn format_share_bar(share: f64, width: usize) -> String {
    let share = share.clamp(0.0, 1.0);
    let filled_blocks = (share * width as f64).round() as usize;
    let empty_blocks = width.saturating_sub(filled_blocks);

    format!("[{}{}]", "█".repeat(filled_blocks), "░".repeat(empty_blocks))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_cents_drops_float_noise() {
        assert_eq!(round_cents(75.60000000000001), 75.6);
        assert_eq!(round_cents(3.402), 3.4);
        assert_eq!(round_cents(0.0), 0.0);
    }

    #[test]
    fn format_usd_two_decimals() {
        assert_eq!(format_usd(72.45), "$72.45");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(3.402), "$3.40");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-5.0), "-$5.00");
    }

    #[test]
    fn format_gb_switches_to_tb() {
        assert_eq!(format_gb(3150.0), "3.08 TB");
        assert_eq!(format_gb(500.0), "500.0 GB");
        assert_eq!(format_gb(36.3), "36.3 GB");
        assert_eq!(format_gb(1023.96), "1,024.0 GB");
    }

    #[test]
    fn format_share_percent() {
        assert_eq!(format_share(0.125), "12.5%");
        assert_eq!(format_share(1.5), "100.0%");
    }

    #[test]
    fn format_share_bar_width() {
        assert_eq!(format_share_bar(0.0, 12), "[░░░░░░░░░░░░]");
        assert_eq!(format_share_bar(1.0, 12), "[████████████]");
        assert_eq!(format_share_bar(0.5, 12), "[██████░░░░░░]");
    }

    #[test]
    fn group_thousands_boundaries() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(123456), "123,456");
    }
}

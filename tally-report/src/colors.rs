//! Month-based row shading.

/// Background color per calendar month, January first.
pub const MONTH_COLORS: [u32; 12] = [
    0xFFCCCC, 0xFFE5CC, 0xFFFFCC, 0xE5FFCC, 0xCCFFCC, 0xCCFFE5, 0xCCFFFF, 0xCCE5FF, 0xCCCCFF,
    0xE5CCFF, 0xFFCCFF, 0xFFCCE5,
];

pub const DEFAULT_COLOR: u32 = 0xFFFFFF;

/// RGB color for a month (1-12); anything else is white.
pub fn month_color(month: u32) -> u32 {
    match month {
        1..=12 => MONTH_COLORS[(month - 1) as usize],
        _ => DEFAULT_COLOR,
    }
}

/// `#RRGGBB` form, for logs and summaries.
pub fn hex(color: u32) -> String {
    format!("#{color:06X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_table() {
        assert_eq!(hex(month_color(1)), "#FFCCCC");
        assert_eq!(hex(month_color(9)), "#CCCCFF");
        assert_eq!(hex(month_color(12)), "#FFCCE5");
    }

    #[test]
    fn test_out_of_range_is_white() {
        assert_eq!(month_color(0), DEFAULT_COLOR);
        assert_eq!(month_color(13), DEFAULT_COLOR);
    }
}

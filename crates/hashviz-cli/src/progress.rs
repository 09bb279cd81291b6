use std::fmt::Display;

pub struct PercentBar {
    pub percent: f32,
    pub width: usize,
}

impl PercentBar {
    pub fn print(&self) {
        print!("\r{self}");
    }
}

impl Display for PercentBar {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let percent = self.percent.clamp(0.0, 1.0);
        let filled = ((self.width - 1) as f32 * percent).round() as usize;
        write!(
            f,
            "[{empty:=>width_left$}>{empty:.<width_right$}] {percent:.1}%",
            empty = "",
            width_left = filled,
            width_right = self.width - 1 - filled,
            percent = 100. * percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::PercentBar;

    #[test]
    fn bar() {
        let bar = PercentBar {
            percent: 0.5,
            width: 11,
        };
        assert_eq!(bar.to_string(), "[=====>.....] 50.0%");
        let full = PercentBar {
            percent: 2.0,
            width: 5,
        };
        assert_eq!(full.to_string(), "[====>] 100.0%");
    }
}

/// Column count for a grid holding `count` entries.
pub fn columns_for(count: usize) -> usize {
    match count {
        2 => 2,
        3 => 3,
        4 => 2,
        5 | 6 => 3,
        n if n >= 7 => 4,
        _ => 1,
    }
}

/// Presentation constants shared by the HTML and egui renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub min_column_width_px: f32,
    pub gap_rem: f32,
    pub margin_em: f32,
    pub corner_radius_px: u8,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            min_column_width_px: 220.0,
            gap_rem: 1.0,
            margin_em: 1.0,
            corner_radius_px: 8,
        }
    }
}

impl GridStyle {
    pub fn template_columns(&self, columns: usize) -> String {
        format!(
            "repeat({}, minmax({}px, 1fr))",
            columns, self.min_column_width_px
        )
    }

    /// Width of one column when `available` pixels are split `columns` ways,
    /// never narrower than the minimum column width.
    pub fn column_width(&self, available: f32, columns: usize, spacing: f32) -> f32 {
        let columns = columns.max(1) as f32;
        let gaps = spacing * (columns - 1.0);
        ((available - gaps) / columns).max(self.min_column_width_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_table() {
        let inputs = [1, 2, 3, 4, 5, 6, 7, 10];
        let expected = [1, 2, 3, 2, 3, 3, 4, 4];
        let got: Vec<usize> = inputs.iter().map(|&n| columns_for(n)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn empty_grid_uses_one_column() {
        assert_eq!(columns_for(0), 1);
    }

    #[test]
    fn template_matches_css_grid_syntax() {
        let style = GridStyle::default();
        assert_eq!(style.template_columns(3), "repeat(3, minmax(220px, 1fr))");
    }

    #[test]
    fn column_width_respects_minimum() {
        let style = GridStyle::default();
        assert_eq!(style.column_width(1000.0, 2, 10.0), 495.0);
        assert_eq!(style.column_width(300.0, 4, 10.0), 220.0);
    }
}

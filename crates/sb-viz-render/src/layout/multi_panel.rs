use crate::layout::margins::PlotArea;

/// Main panel above a ratio panel sharing the x axis.
#[derive(Debug, Clone)]
pub struct MainRatioLayout {
    pub main: PlotArea,
    pub ratio: PlotArea,
}

impl MainRatioLayout {
    pub fn new(
        left: f64,
        top: f64,
        width: f64,
        total_height: f64,
        gap: f64,
        ratio_frac: f64,
    ) -> Self {
        let ratio_h = total_height * ratio_frac;
        let main_h = total_height - ratio_h - gap;

        Self {
            main: PlotArea::new(left, top, width, main_h),
            ratio: PlotArea::new(left, top + main_h + gap, width, ratio_h),
        }
    }
}

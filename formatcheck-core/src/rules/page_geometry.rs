use super::engine::{CheckContext, CheckRule};
use crate::config::{ProfileConfig, StyleGuide};
use crate::geometry::{points_to_cm, within_tolerance};
use crate::types::{Finding, FindingCategory};

// PageGeometryRule - margins and paper size of the first section
pub struct PageGeometryRule<'a> {
    style: &'a StyleGuide,
}

impl<'a> PageGeometryRule<'a> {
    pub fn new(config: &'a ProfileConfig) -> Self {
        Self {
            style: &config.style,
        }
    }
}

impl<'a> CheckRule for PageGeometryRule<'a> {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        let setup = match &context.model.page_setup {
            Ok(setup) => setup,
            Err(e) => {
                log::warn!("Page setup unavailable: {e}");
                return vec![Finding::new(
                    FindingCategory::Skipped,
                    format!("Could not read page setup: {e}"),
                )];
            }
        };

        let tolerance = self.style.tolerance_cm;
        let margins = &self.style.margins;
        let sides = [
            ("Left", setup.left_margin, margins.left),
            ("Right", setup.right_margin, margins.right),
            ("Top", setup.top_margin, margins.top),
            ("Bottom", setup.bottom_margin, margins.bottom),
        ];

        let mut findings: Vec<Finding> = sides
            .iter()
            .filter_map(|&(side, actual_points, expected)| {
                let actual = points_to_cm(actual_points);
                (!within_tolerance(actual, expected, tolerance)).then(|| {
                    Finding::new(
                        FindingCategory::PageGeometry,
                        format!("{side} Margin is {actual:.2} cm (should be {expected:.2} cm)"),
                    )
                })
            })
            .collect();

        let width = points_to_cm(setup.page_width);
        let height = points_to_cm(setup.page_height);
        if !within_tolerance(width, self.style.page_width_cm, tolerance)
            || !within_tolerance(height, self.style.page_height_cm, tolerance)
        {
            findings.push(Finding::new(
                FindingCategory::PageGeometry,
                format!(
                    "Page size is {width:.2} cm x {height:.2} cm (should be {:.2} cm x {:.2} cm)",
                    self.style.page_width_cm, self.style.page_height_cm
                ),
            ));
        }

        findings
    }

    fn name(&self) -> &str {
        "PageGeometry"
    }
}

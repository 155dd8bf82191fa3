//! Karat purity table

use rust_decimal::Decimal;
use serde::Serialize;

/// One karat tier and its display metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurityGrade {
    pub label: &'static str,
    /// Fraction of pure gold in thousandths (24K = 1000)
    pub fineness: u32,
    pub name: &'static str,
    pub purity: &'static str,
    pub description: &'static str,
}

impl PurityGrade {
    /// Fractional purity multiplier in (0, 1]
    pub fn multiplier(&self) -> Decimal {
        Decimal::new(self.fineness as i64, 3).normalize()
    }
}

pub const PURITY_TABLE: &[PurityGrade] = &[
    PurityGrade {
        label: "24K",
        fineness: 1000,
        name: "24 Karat",
        purity: "99.9%",
        description: "Pure Gold - Investment Grade",
    },
    PurityGrade {
        label: "22K",
        fineness: 916,
        name: "22 Karat",
        purity: "91.6%",
        description: "Traditional Jewelry Gold",
    },
    PurityGrade {
        label: "21K",
        fineness: 875,
        name: "21 Karat",
        purity: "87.5%",
        description: "Middle Eastern Standard",
    },
    PurityGrade {
        label: "18K",
        fineness: 750,
        name: "18 Karat",
        purity: "75%",
        description: "Premium Jewelry Gold",
    },
    PurityGrade {
        label: "14K",
        fineness: 585,
        name: "14 Karat",
        purity: "58.5%",
        description: "Popular Western Standard",
    },
    PurityGrade {
        label: "10K",
        fineness: 417,
        name: "10 Karat",
        purity: "41.7%",
        description: "Affordable Jewelry Gold",
    },
    PurityGrade {
        label: "9K",
        fineness: 375,
        name: "9 Karat",
        purity: "37.5%",
        description: "Budget Jewelry Gold",
    },
];

/// Look up a grade by its label (e.g. "18K")
pub fn find_grade(label: &str) -> Option<&'static PurityGrade> {
    PURITY_TABLE.iter().find(|g| g.label == label)
}

/// Multiplier for a label; unknown labels price as pure gold
pub fn multiplier_for(label: &str) -> Decimal {
    find_grade(label)
        .map(PurityGrade::multiplier)
        .unwrap_or(Decimal::ONE)
}

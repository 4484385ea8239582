use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter};

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The five fixed enhancement presets. Exactly one is applied per call.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumCount, EnumIter,
)]
pub enum Enhancement {
    #[default]
    BilateralFiltering,
    UnsharpMasking,
    SaturationEnhancement,
    GammaCorrection,
    EdgeEnhancement,
}

impl Enhancement {
    pub fn len() -> usize {
        Self::COUNT
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    /// Human readable label, also used to name the output file.
    pub fn label(&self) -> &'static str {
        match self {
            Enhancement::BilateralFiltering => "Bilateral Filtering",
            Enhancement::UnsharpMasking => "Unsharp Masking",
            Enhancement::SaturationEnhancement => "Saturation Enhancement",
            Enhancement::GammaCorrection => "Gamma Correction",
            Enhancement::EdgeEnhancement => "Edge Enhancement (Laplacian)",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Enhancement::BilateralFiltering => "bilateral-filtering",
            Enhancement::UnsharpMasking => "unsharp-masking",
            Enhancement::SaturationEnhancement => "saturation-enhancement",
            Enhancement::GammaCorrection => "gamma-correction",
            Enhancement::EdgeEnhancement => "edge-enhancement",
        }
    }

    /// File name offered for download, e.g. `Gamma Correction_enhanced_image.png`.
    pub fn output_file_name(&self) -> String {
        format!("{}_enhanced_image.png", self.label())
    }

    pub fn comparison_file_name(&self) -> String {
        format!("{}_comparison.png", self.label())
    }
}

impl fmt::Display for Enhancement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Enhancement {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if let Some(found) = Self::iter().find(|e| e.label() == s) {
            return Ok(found);
        }

        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "bilateral-filtering" | "bilateral" => Ok(Enhancement::BilateralFiltering),
            "unsharp-masking" | "unsharp" => Ok(Enhancement::UnsharpMasking),
            "saturation-enhancement" | "saturation" => Ok(Enhancement::SaturationEnhancement),
            "gamma-correction" | "gamma" => Ok(Enhancement::GammaCorrection),
            "edge-enhancement" | "edge-enhancement-(laplacian)" | "laplacian" => {
                Ok(Enhancement::EdgeEnhancement)
            }
            _ => Err(Error::UnsupportedOperation(s.to_string())),
        }
    }
}

impl FromStr for Enhancement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

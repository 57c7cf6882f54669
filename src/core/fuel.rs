//! SAT product keys (c_ClaveProdServ) for the fuels tracked in reports.

use serde::{Deserialize, Serialize};

/// Fuel category derived from the declared SAT key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelCategory {
    /// Regular gasoline (< 91 octane).
    Magna,
    /// Premium gasoline (>= 91 octane).
    Premium,
    Diesel,
}

impl FuelCategory {
    /// All categories in catalog order.
    pub const ALL: [Self; 3] = [Self::Magna, Self::Premium, Self::Diesel];

    /// The SAT product key for this category.
    pub fn sat_key(&self) -> &'static str {
        match self {
            Self::Magna => "15101514",
            Self::Premium => "15101515",
            Self::Diesel => "15101505",
        }
    }

    /// Lowercase label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Magna => "magna",
            Self::Premium => "premium",
            Self::Diesel => "diesel",
        }
    }
}

impl std::fmt::Display for FuelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for FuelCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("unknown fuel category '{s}'"))
    }
}

/// Map a SAT product key to its fuel category. Keys outside the catalog,
/// including the empty string, have no category.
pub fn fuel_category(sat_key: &str) -> Option<FuelCategory> {
    match sat_key {
        "15101514" => Some(FuelCategory::Magna),
        "15101515" => Some(FuelCategory::Premium),
        "15101505" => Some(FuelCategory::Diesel),
        _ => None,
    }
}

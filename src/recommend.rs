//! Hand-authored crop and fertilizer recommendations.

use chrono::Month;
use serde::Serialize;

use crate::error::Error;
use crate::models::SoilType;

/// Crops (in display order) and an N-P-K fertilizer formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub crops: &'static [&'static str],
    pub fertilizer: &'static str,
}

/// Recommendation for a classified soil type
pub fn for_soil(soil: SoilType) -> Recommendation {
    match soil {
        SoilType::Black => Recommendation {
            crops: &[
                "Cotton", "Sugarcane", "Rice", "Linseed", "Jawar", "chilly", "Ragi", "Maize",
                "Wheat",
            ],
            fertilizer: "N-P-K 10-10-10",
        },
        SoilType::Cinder => Recommendation {
            crops: &[
                "Barley", "Cabbage", "Carrot", "Pea", "Potato", "Tomato", "Raddish", "Onion",
                "Spinach",
            ],
            fertilizer: "N-P-K 5-10-5",
        },
        SoilType::Laterite => Recommendation {
            crops: &[
                "Cashew",
                "Cassava",
                "Pineapple",
                "Rubber",
                "Jackfruit",
                "Coconut",
                "Tamarind",
                "Black Pepper",
                "Ginger",
            ],
            fertilizer: "N-P-K 8-8-8",
        },
        SoilType::Peat => Recommendation {
            crops: &[
                "Cranberry",
                "Potato",
                "Rice",
                "Soybean",
                "Blueberries",
                "Sphagnum Moss",
                "Bog Rosemary",
                "Bog Bean",
            ],
            fertilizer: "N-P-K 5-10-20",
        },
        SoilType::Yellow => Recommendation {
            crops: &[
                "Maize",
                "Sorghum",
                "Sunflower",
                "Tomato",
                "Groundnut",
                "Soybean",
                "Cotton",
                "Mustard",
                "Sugarcane",
                "Turmeric",
            ],
            fertilizer: "N-P-K 15-5-10",
        },
    }
}

// Most months extend this shared tail of year-round market crops
macro_rules! with_common_tail {
    ($($crop:literal),* $(,)?) => {
        &[
            $($crop,)*
            "Corn", "Rice", "Wheat", "Pineapple", "Cabbage", "Carrot", "Cashew", "Cassava",
            "Pineapple", "Rubber", "Jackfruit", "Coconut", "Tamarind", "Black Pepper", "Ginger",
            "Rice", "Linseed", "Jawar", "chilly", "Ragi", "Maize",
        ]
    };
}

/// Market demand and fertilizer for a sowing month
pub fn for_month(month: Month) -> Recommendation {
    match month {
        Month::January => Recommendation {
            crops: &[
                "Cotton", "Sugarcane", "Wheat", "Rice", "Linseed", "Jawar", "chilly", "Ragi",
                "Maize", "Groundnut", "Soybean", "Cotton", "Mustard",
            ],
            fertilizer: "N-P-K 10-10-10",
        },
        Month::February => Recommendation {
            crops: &[
                "Barley", "Cabbage", "Carrot", "Pea", "Potato", "Tomato", "Raddish", "Onion",
                "Spinach", "Rice", "Linseed", "Jawar", "chilly", "Ragi", "Maize",
            ],
            fertilizer: "N-P-K 5-10-5",
        },
        Month::March => Recommendation {
            crops: &[
                "Pineapple", "Cabbage", "Carrot", "Cashew", "Cassava", "Pineapple", "Rubber",
                "Jackfruit", "Coconut", "Tamarind", "Black Pepper", "Ginger", "Rice", "Linseed",
                "Jawar", "chilly", "Ragi", "Maize",
            ],
            fertilizer: "N-P-K 8-8-8",
        },
        Month::April => Recommendation {
            crops: with_common_tail!(),
            fertilizer: "N-P-K 10-10-10",
        },
        Month::May => Recommendation {
            crops: with_common_tail!("Cotton", "Soybean", "Peanut"),
            fertilizer: "N-P-K 5-10-5",
        },
        Month::June => Recommendation {
            crops: with_common_tail!(
                "Barley", "Rice", "Soybean", "Cotton", "Mustard", "Cotton", "Soybean", "Peanut"
            ),
            fertilizer: "N-P-K 8-8-8",
        },
        Month::July => Recommendation {
            crops: with_common_tail!(
                "Cotton", "Peanut", "Sunflower", "Cotton", "Soybean", "Peanut"
            ),
            fertilizer: "N-P-K 5-10-20",
        },
        Month::August => Recommendation {
            crops: with_common_tail!(
                "Corn", "Tomato", "Cucumber", "Cotton", "Soybean", "Peanut"
            ),
            fertilizer: "N-P-K 10-10-10",
        },
        Month::September => Recommendation {
            crops: with_common_tail!(
                "Wheat", "Barley", "Lettuce", "Cotton", "Soybean", "Peanut"
            ),
            fertilizer: "N-P-K 5-10-5",
        },
        Month::October => Recommendation {
            crops: with_common_tail!("Soybean", "Pea", "Carrot"),
            fertilizer: "N-P-K 8-8-8",
        },
        Month::November => Recommendation {
            crops: with_common_tail!("Maize", "Sorghum", "Sunflower"),
            fertilizer: "N-P-K 15-5-10",
        },
        Month::December => Recommendation {
            crops: with_common_tail!(
                "Cabbage", "Carrot", "Potato", "Cotton", "Soybean", "Peanut"
            ),
            fertilizer: "N-P-K 5-10-20",
        },
    }
}

/// Parse a month name ("March") or abbreviation ("mar"), any case
pub fn parse_month(name: &str) -> Result<Month, Error> {
    name.trim()
        .parse::<Month>()
        .map_err(|_| Error::UnknownMonth(name.to_string()))
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Per-spot configuration.

use vista_core::MediaKind;

/// Advertiser category a spot can restrict itself to.
///
/// Wire ids follow the ad server's category table; `Unknown` asks for
/// anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdCategory {
    /// No restriction.
    #[default]
    Unknown,
    /// Alcoholic beverages.
    AlcoholicBeverages,
    /// Automotive.
    Automotive,
    /// Business and industrial services.
    BusinessAndIndustrialServices,
    /// Clothing and accessories.
    ClothingAndAccessories,
    /// Computing products and consumer electronics.
    ComputingProductsAndConsumerElectronics,
    /// Construction.
    Construction,
    /// Consulting and legal.
    ConsultingAndLegal,
    /// Energy, oil, gas, utilities.
    EnergyOilGasUtilities,
    /// Entertainment.
    Entertainment,
    /// Financial services.
    FinancialServices,
    /// Food.
    Food,
    /// Home and garden.
    HomeAndGarden,
    /// Insurance.
    Insurance,
    /// Jobs and education.
    JobsAndEducation,
    /// Media and communications.
    MediaAndCommunications,
    /// Mining.
    Mining,
    /// Non-profit and social.
    NonProfitAndSocial,
    /// Pharmaceutical and healthcare.
    PharmaceuticalAndHealthcare,
    /// Political.
    Political,
    /// Real estate.
    RealEstate,
    /// Retail.
    Retail,
    /// Soft drinks.
    SoftDrinks,
    /// Sport and fitness.
    SportAndFitness,
    /// Telecom and internet.
    TelecomAndInternet,
    /// Toys.
    Toys,
    /// Travel and tourism.
    TravelAndTourism,
    /// Video games.
    VideoGames,
}

impl AdCategory {
    /// Numeric id used on the wire. `Unknown` is zero.
    #[must_use]
    pub fn wire_id(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::AlcoholicBeverages => 1,
            Self::Automotive => 2,
            Self::BusinessAndIndustrialServices => 3,
            Self::ClothingAndAccessories => 4,
            Self::ComputingProductsAndConsumerElectronics => 5,
            Self::Construction => 6,
            Self::ConsultingAndLegal => 7,
            Self::EnergyOilGasUtilities => 8,
            Self::Entertainment => 9,
            Self::FinancialServices => 10,
            Self::Food => 11,
            Self::HomeAndGarden => 12,
            Self::Insurance => 13,
            Self::JobsAndEducation => 14,
            Self::MediaAndCommunications => 15,
            Self::Mining => 16,
            Self::NonProfitAndSocial => 17,
            Self::PharmaceuticalAndHealthcare => 18,
            Self::Political => 19,
            Self::RealEstate => 20,
            Self::Retail => 21,
            Self::SoftDrinks => 22,
            Self::SportAndFitness => 23,
            Self::TelecomAndInternet => 24,
            Self::Toys => 25,
            Self::TravelAndTourism => 26,
            Self::VideoGames => 27,
        }
    }
}

/// Static configuration of one ad spot.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotConfig {
    /// Creative format this spot displays.
    pub media: MediaKind,
    /// Advertiser category restriction.
    pub category: AdCategory,
    /// Developer-assigned identifier of this placement.
    pub spot_id: String,
    /// Request an ad as soon as the spot starts.
    pub play_on_awake: bool,
    /// Request a fresh ad whenever the current one finishes.
    pub auto_play_next: bool,
    /// Upper bound, in seconds, of the randomized delay before a
    /// prepared video may start. Staggers spots that would otherwise all
    /// begin decoding on the same frame.
    pub initial_random_delay: f32,
    /// How long a still image shows before rotation, in seconds.
    pub image_duration: f32,
    /// Minimum instantaneous screen share, in percent, before a prepared
    /// video starts playing.
    pub proximity_percent: f32,
    /// Whether clicks on the spot open the creative's link.
    pub clickable: bool,
}

impl Default for SpotConfig {
    fn default() -> Self {
        Self {
            media: MediaKind::LandscapeVideo,
            category: AdCategory::Unknown,
            spot_id: String::new(),
            play_on_awake: true,
            auto_play_next: true,
            initial_random_delay: 0.0,
            image_duration: 10.0,
            proximity_percent: 3.0,
            clickable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spot_is_an_autoplaying_landscape_video() {
        let config = SpotConfig::default();
        assert_eq!(config.media, MediaKind::LandscapeVideo);
        assert_eq!(config.category, AdCategory::Unknown);
        assert!(config.play_on_awake);
        assert!(config.auto_play_next);
        assert_eq!(config.image_duration, 10.0);
        assert_eq!(config.proximity_percent, 3.0);
        assert!(!config.clickable);
    }

    #[test]
    fn category_wire_ids_are_dense_from_zero() {
        assert_eq!(AdCategory::Unknown.wire_id(), 0);
        assert_eq!(AdCategory::AlcoholicBeverages.wire_id(), 1);
        assert_eq!(AdCategory::VideoGames.wire_id(), 27);
    }
}

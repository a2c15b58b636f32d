use serde::{Deserialize, Serialize};

/// The seven fixed feature categories attached to a property. Each is stored
/// as a JSONB blob and must survive a write/read round-trip bit-for-bit.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Amenities {
    pub air_conditioning: bool,
    pub heating: bool,
    pub furnished: bool,
    pub pets_allowed: bool,
    pub washer_dryer: bool,
    pub in_unit_laundry: bool,
    pub elevator: bool,
    pub outdoor_space: bool,
    pub balcony: bool,
    pub disability_access: bool,
    pub hardwood_floors: bool,
    pub fireplace: bool,
    pub pool: bool,
    pub gym: bool,
    pub parking: i32,
    pub garages: i32,
    pub ceiling_height: f64,
    pub lot_size: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityFeature {
    pub security_system: bool,
    pub doorman: bool,
    pub security_camera: bool,
    pub gated_community: bool,
    pub fire_alarm: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnologyFeature {
    pub internet_wifi: bool,
    pub smart_home: bool,
    pub dishwasher: bool,
    pub garbage_disposal: bool,
    pub cable_tv: bool,
    pub refrigerator: bool,
    pub microwave: bool,
    pub stove_oven: bool,
    pub ceiling_fans: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LuxuryFeature {
    pub fireplace: bool,
    pub pool: bool,
    pub gym: bool,
    pub walk_in_closets: bool,
    pub jacuzzi: bool,
    pub sauna: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommunityFeature {
    pub concierge: bool,
    pub business_center: bool,
    pub conference_room: bool,
    pub guest_parking: bool,
    pub playground: bool,
    pub bbq_area: bool,
    pub community_garden: bool,
    pub tennis_court: bool,
    pub basketball_court: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtilsFeature {
    pub water_included: bool,
    pub gas_included: bool,
    pub electricity_included: bool,
    pub trash_removal_included: bool,
    pub internet_included: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnergyFeature {
    pub solar_panels: bool,
    pub energy_efficient_appliances: bool,
    pub green_certification: bool,
    pub ev_charging: bool,
    pub rainwater_harvesting: bool,
    pub programmable_thermostat: bool,
}

/// The rehydrated feature bundle: free-form tags plus the seven categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub amenities: Amenities,
    #[serde(rename = "securityFeature", default)]
    pub security: SecurityFeature,
    #[serde(rename = "technologyFeature", default)]
    pub technology: TechnologyFeature,
    #[serde(rename = "luxuryFeature", default)]
    pub luxury: LuxuryFeature,
    #[serde(rename = "communityFeature", default)]
    pub community: CommunityFeature,
    #[serde(rename = "utilsFeature", default)]
    pub utils: UtilsFeature,
    #[serde(rename = "energyFeature", default)]
    pub energy: EnergyFeature,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle() -> FeatureBundle {
        FeatureBundle {
            features: vec!["lake view".into(), "rooftop".into()],
            amenities: Amenities {
                air_conditioning: true,
                furnished: true,
                balcony: true,
                parking: 2,
                garages: 1,
                ceiling_height: 3.2,
                lot_size: 150.5,
                ..Default::default()
            },
            security: SecurityFeature {
                security_camera: true,
                gated_community: true,
                ..Default::default()
            },
            technology: TechnologyFeature {
                internet_wifi: true,
                cable_tv: true,
                stove_oven: true,
                ..Default::default()
            },
            luxury: LuxuryFeature {
                jacuzzi: true,
                ..Default::default()
            },
            community: CommunityFeature {
                bbq_area: true,
                basketball_court: true,
                ..Default::default()
            },
            utils: UtilsFeature {
                water_included: true,
                internet_included: true,
                ..Default::default()
            },
            energy: EnergyFeature {
                solar_panels: true,
                ev_charging: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn bundle_roundtrips_through_json_exactly() {
        let bundle = sample_bundle();
        let value = serde_json::to_value(&bundle).unwrap();
        let back: FeatureBundle = serde_json::from_value(value).unwrap();
        assert_eq!(back, bundle);
    }

    #[test]
    fn categories_roundtrip_independently() {
        let bundle = sample_bundle();

        let value = serde_json::to_value(&bundle.amenities).unwrap();
        let back: Amenities = serde_json::from_value(value).unwrap();
        assert_eq!(back, bundle.amenities);

        let value = serde_json::to_value(&bundle.energy).unwrap();
        let back: EnergyFeature = serde_json::from_value(value).unwrap();
        assert_eq!(back, bundle.energy);
    }

    #[test]
    fn empty_blob_deserializes_to_defaults() {
        let amenities: Amenities = serde_json::from_str("{}").unwrap();
        assert_eq!(amenities, Amenities::default());

        let bundle: FeatureBundle = serde_json::from_str("{}").unwrap();
        assert_eq!(bundle, FeatureBundle::default());
    }

    #[test]
    fn json_keys_are_camel_case() {
        let value = serde_json::to_value(sample_bundle()).unwrap();
        let amenities = value.get("amenities").unwrap();
        assert!(amenities.get("airConditioning").is_some());
        assert!(amenities.get("ceilingHeight").is_some());
        assert!(value.get("securityFeature").is_some());
        assert!(value.get("utilsFeature").is_some());
    }
}

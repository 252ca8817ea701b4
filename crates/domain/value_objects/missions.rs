use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::missions::InsertMissionEntity,
    value_objects::enums::mission_statuses::MissionStatus,
};

/// Platform cut of a mission price, fixed at creation time and rounded to
/// whole cents so it survives the trip through minor-currency units.
pub fn compute_commission(estimated_price: f64, commission_rate: f64) -> f64 {
    (estimated_price * commission_rate * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertMissionModel {
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_urgent: Option<bool>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub estimated_price: f64,
}

impl InsertMissionModel {
    pub fn to_entity(&self, client_id: Uuid, commission_rate: f64) -> InsertMissionEntity {
        InsertMissionEntity {
            id: Uuid::new_v4(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            is_urgent: self.is_urgent.unwrap_or(false),
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address.clone(),
            estimated_price: self.estimated_price,
            commission: compute_commission(self.estimated_price, commission_rate),
            status: MissionStatus::Pending.to_string(),
            client_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MissionFilter {
    pub status: Option<MissionStatus>,
    pub category: Option<String>,
    pub is_urgent: Option<bool>,
}

/// Which side of a mission the caller wants their listing scoped to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantSide {
    Client,
    Provider,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMissionStatusModel {
    pub status: MissionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_follows_the_configured_rate() {
        assert_eq!(compute_commission(100.0, 0.15), 15.0);
        assert_eq!(compute_commission(80.0, 0.15), 12.0);
    }

    #[test]
    fn commission_rounds_to_whole_cents() {
        // 99.99 * 0.15 = 14.9985 -> 15.00
        assert_eq!(compute_commission(99.99, 0.15), 15.0);
        // 33.33 * 0.15 = 4.9995 -> 5.00
        assert_eq!(compute_commission(33.33, 0.15), 5.0);
        // 10.10 * 0.12 = 1.212 -> 1.21
        assert_eq!(compute_commission(10.10, 0.12), 1.21);
    }

    #[test]
    fn new_missions_start_pending_with_commission_applied() {
        let model = InsertMissionModel {
            title: "Assemble wardrobe".to_string(),
            description: "Two-door wardrobe, parts included".to_string(),
            category: "handyman".to_string(),
            is_urgent: None,
            latitude: 48.8566,
            longitude: 2.3522,
            address: "10 Rue de Rivoli, Paris".to_string(),
            estimated_price: 100.0,
        };

        let entity = model.to_entity(Uuid::new_v4(), 0.15);
        assert_eq!(entity.status, "PENDING");
        assert_eq!(entity.commission, 15.0);
        assert!(!entity.is_urgent);
    }
}

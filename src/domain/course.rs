use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub course_id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub currency: String,
    pub capacity_max: Option<i32>,
    pub capacity_current: i32,
}

impl Course {
    /// Charge amount in minor units: the discount price wins when present,
    /// rounded so prices like 99.99 map to exactly 9999.
    pub fn charge_amount_minor(&self) -> i64 {
        let major = self.discount_price.unwrap_or(self.price);
        (major * 100.0).round() as i64
    }

    pub fn has_open_seat(&self) -> bool {
        self.capacity_max.map_or(true, |max| self.capacity_current < max)
    }

    /// Advisory availability check at intent-creation time. The authoritative
    /// guard is the conditional capacity increment in the courses repo.
    pub fn is_available(&self) -> bool {
        self.is_active && self.has_open_seat()
    }
}

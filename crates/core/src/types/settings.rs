//! Store settings singleton.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Delivery pricing for one wilaya (province).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZone {
    pub name: String,
    /// Home delivery price.
    pub home_price: Decimal,
    /// Pickup-point delivery price.
    pub office_price: Decimal,
}

impl DeliveryZone {
    fn new(name: &str, home_price: i64, office_price: i64) -> Self {
        Self {
            name: name.to_string(),
            home_price: Decimal::from(home_price),
            office_price: Decimal::from(office_price),
        }
    }
}

/// Store identity and delivery configuration.
///
/// This is a singleton record, seeded from [`StoreSettings::default`] when
/// absent. Updates are shallow merges: the delivery zone list is replaced
/// wholesale, never deep-merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub store_phone: String,
    #[serde(default)]
    pub store_email: String,
    #[serde(default)]
    pub store_address: String,
    #[serde(default)]
    pub delivery_wilayas: Vec<DeliveryZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial settings update, shallow-merged over the stored singleton.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub store_name: Option<String>,
    pub store_phone: Option<String>,
    pub store_email: Option<String>,
    pub store_address: Option<String>,
    pub delivery_wilayas: Option<Vec<DeliveryZone>>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_name: "bijoux.store".to_string(),
            store_phone: "+213 555 00 00 00".to_string(),
            store_email: String::new(),
            store_address: "Alger, Algérie".to_string(),
            delivery_wilayas: vec![
                DeliveryZone::new("Alger", 400, 300),
                DeliveryZone::new("Blida", 500, 400),
                DeliveryZone::new("Tipaza", 600, 500),
                DeliveryZone::new("Boumerdes", 600, 500),
                DeliveryZone::new("Oran", 1000, 800),
                DeliveryZone::new("Constantine", 1200, 1000),
                DeliveryZone::new("Annaba", 1300, 1100),
                DeliveryZone::new("Tizi Ouzou", 800, 600),
                DeliveryZone::new("Sétif", 1000, 800),
                DeliveryZone::new("Batna", 1100, 900),
            ],
            updated_at: None,
        }
    }
}

impl StoreSettings {
    /// Shallow-merge a patch over these settings and stamp `updated_at`.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(store_name) = patch.store_name {
            self.store_name = store_name;
        }
        if let Some(store_phone) = patch.store_phone {
            self.store_phone = store_phone;
        }
        if let Some(store_email) = patch.store_email {
            self.store_email = store_email;
        }
        if let Some(store_address) = patch.store_address {
            self.store_address = store_address;
        }
        if let Some(delivery_wilayas) = patch.delivery_wilayas {
            self.delivery_wilayas = delivery_wilayas;
        }
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_shallowly() {
        let mut settings = StoreSettings::default();
        let zones_before = settings.delivery_wilayas.clone();

        settings.apply(SettingsPatch {
            store_name: Some("atelier".to_string()),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.store_name, "atelier");
        assert_eq!(settings.delivery_wilayas, zones_before);
        assert!(settings.updated_at.is_some());
    }

    #[test]
    fn delivery_zones_replace_wholesale() {
        let mut settings = StoreSettings::default();
        settings.apply(SettingsPatch {
            delivery_wilayas: Some(vec![DeliveryZone::new("Alger", 450, 350)]),
            ..SettingsPatch::default()
        });
        assert_eq!(settings.delivery_wilayas.len(), 1);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let json = serde_json::to_value(StoreSettings::default()).unwrap_or_default();
        assert!(json.get("storeName").is_some());
        assert!(json.get("deliveryWilayas").is_some());
    }
}

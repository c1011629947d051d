// lib/src/services/hospital_service.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use moka::future::Cache;
use serde_json::Value;

use models::{GeoPoint, HospitalRecord, RankedHospital};

use crate::engine::rank_by_proximity;
use crate::errors::{MediAlertError, Result};
use crate::storage_engine::HospitalStorageEngine;

pub const DEFAULT_HEALTHSITES_URL: &str = "https://api.healthsites.io/api/v1/facilities";

/// Tuning for live lookups and the built-in fallback list.
#[derive(Debug, Clone)]
pub struct HospitalServiceConfig {
    pub healthsites_url: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    pub fallback_limit: usize,
    pub search_radius_km: f64,
}

impl Default for HospitalServiceConfig {
    fn default() -> Self {
        Self {
            healthsites_url: DEFAULT_HEALTHSITES_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(3600),
            cache_capacity: 1_000,
            fallback_limit: 5,
            search_radius_km: 30.0,
        }
    }
}

/// An upstream directory of health facilities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FacilityDirectory: Send + Sync + 'static {
    async fn fetch_facilities(&self, origin: GeoPoint, radius_km: f64) -> Result<Vec<HospitalRecord>>;
}

/// Healthsites.io GeoJSON facility search.
pub struct HealthsitesClient {
    client: reqwest::Client,
    url: String,
}

impl HealthsitesClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl FacilityDirectory for HealthsitesClient {
    async fn fetch_facilities(&self, origin: GeoPoint, radius_km: f64) -> Result<Vec<HospitalRecord>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("latitude", origin.latitude.to_string()),
                ("longitude", origin.longitude.to_string()),
                ("radius", (radius_km * 1000.0).to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediAlertError::UpstreamStatus(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(parse_facilities(&body))
    }
}

fn str_prop<'a>(props: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| props.get(*key).and_then(Value::as_str))
}

fn parse_feature(feature: &Value) -> Option<HospitalRecord> {
    let props = feature.get("properties").cloned().unwrap_or(Value::Null);
    let coords = feature.get("geometry")?.get("coordinates")?.as_array()?;
    let longitude = coords.first()?.as_f64()?;
    let latitude = coords.get(1)?.as_f64()?;

    let id = match feature.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    let services = props
        .get("amenities")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|s| s.as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    let emergency = str_prop(&props, &["emergency"]).map_or(true, |e| e.eq_ignore_ascii_case("yes"));

    Some(HospitalRecord {
        id,
        name: str_prop(&props, &["name"]).unwrap_or("Unknown Hospital").to_string(),
        address: str_prop(&props, &["addr:full", "address"]).unwrap_or("Unknown").to_string(),
        phone: Some(str_prop(&props, &["contact:phone", "phone"]).unwrap_or("+234-XXX-XXXX").to_string()),
        latitude,
        longitude,
        services,
        facility_type: Some(str_prop(&props, &["type"]).unwrap_or("hospital").to_string()),
        beds: props.get("beds").and_then(Value::as_u64).and_then(|b| u32::try_from(b).ok()),
        emergency,
        operating_hours: Some(str_prop(&props, &["opening_hours"]).unwrap_or("24/7").to_string()),
        rating: Some(props.get("rating").and_then(Value::as_f64).unwrap_or(4.5) as f32),
        website: Some(str_prop(&props, &["website"]).unwrap_or("").to_string()),
    })
}

/// Parses a GeoJSON feature collection. Features without usable coordinates are skipped.
pub fn parse_facilities(data: &Value) -> Vec<HospitalRecord> {
    let Some(features) = data.get("features").and_then(Value::as_array) else {
        return Vec::new();
    };
    features
        .iter()
        .filter_map(|feature| {
            let parsed = parse_feature(feature);
            if parsed.is_none() {
                warn!("Skipping facility without coordinates: {:?}", feature.get("id"));
            }
            parsed
        })
        .collect()
}

struct SampleHospital {
    id: &'static str,
    name: &'static str,
    address: &'static str,
    phone: &'static str,
    latitude: f64,
    longitude: f64,
    services: &'static [&'static str],
    facility_type: &'static str,
    beds: u32,
    rating: f32,
    website: &'static str,
}

impl SampleHospital {
    fn record(&self) -> HospitalRecord {
        HospitalRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            address: self.address.to_string(),
            phone: Some(self.phone.to_string()),
            latitude: self.latitude,
            longitude: self.longitude,
            services: self.services.iter().map(|s| s.to_string()).collect(),
            facility_type: Some(self.facility_type.to_string()),
            beds: Some(self.beds),
            emergency: true,
            operating_hours: Some("24/7".to_string()),
            rating: Some(self.rating),
            website: Some(self.website.to_string()),
        }
    }
}

// Served when the live directory cannot be reached.
const FALLBACK_HOSPITALS: [SampleHospital; 5] = [
    SampleHospital {
        id: "ph_01",
        name: "Rivers State University Teaching Hospital",
        address: "Alakahia Road, Port Harcourt, Rivers State",
        phone: "+234-803-123-4567",
        latitude: 4.8156,
        longitude: 6.9271,
        services: &["Emergency", "Surgery", "ICU", "Maternity", "Cardiology"],
        facility_type: "teaching_hospital",
        beds: 500,
        rating: 4.7,
        website: "https://rsuth.edu.ng",
    },
    SampleHospital {
        id: "ph_02",
        name: "University of Port Harcourt Teaching Hospital",
        address: "Choba, Port Harcourt, Rivers State",
        phone: "+234-803-456-7890",
        latitude: 4.9081,
        longitude: 6.9131,
        services: &["Emergency", "General", "Cardiology", "Orthopedics"],
        facility_type: "teaching_hospital",
        beds: 400,
        rating: 4.6,
        website: "https://uniport.edu.ng/hospital",
    },
    SampleHospital {
        id: "ph_03",
        name: "Port Harcourt Private Hospital",
        address: "Diobu, Port Harcourt, Rivers State",
        phone: "+234-803-789-0123",
        latitude: 4.8300,
        longitude: 6.9400,
        services: &["Emergency", "ICU", "Surgery", "Pediatrics"],
        facility_type: "private_hospital",
        beds: 150,
        rating: 4.8,
        website: "https://phhospital.com",
    },
    SampleHospital {
        id: "ph_04",
        name: "Saint Luke's Medical Centre",
        address: "GRA, Port Harcourt, Rivers State",
        phone: "+234-803-234-5678",
        latitude: 4.7900,
        longitude: 6.9600,
        services: &["Emergency", "General", "Pediatrics", "Maternity"],
        facility_type: "private_hospital",
        beds: 120,
        rating: 4.5,
        website: "https://stlukes.com.ng",
    },
    SampleHospital {
        id: "ph_05",
        name: "Victory Clinic & Maternity",
        address: "Mile 1, Port Harcourt, Rivers State",
        phone: "+234-803-345-6789",
        latitude: 4.8500,
        longitude: 6.9200,
        services: &["Emergency", "Maternity", "General", "Pediatrics"],
        facility_type: "clinic",
        beds: 50,
        rating: 4.4,
        website: "https://victoryclinic.com.ng",
    },
];

// Seeded into the stored catalog by `sync_catalog`.
fn catalog_seed() -> Vec<HospitalRecord> {
    vec![
        HospitalRecord::new(
            "Rivers State University Teaching Hospital",
            "Rivers State University Teaching Hospital",
            "Port Harcourt, Rivers State",
            GeoPoint::new(4.8156, 6.9271),
        )
        .with_phone("+234-803-XXXX")
        .with_services(["Emergency", "Surgery", "ICU", "Maternity"]),
        HospitalRecord::new(
            "University of Port Harcourt Teaching Hospital",
            "University of Port Harcourt Teaching Hospital",
            "Choba, Port Harcourt",
            GeoPoint::new(4.9081, 6.9131),
        )
        .with_phone("+234-803-XXXX")
        .with_services(["Emergency", "General", "Cardiology"]),
    ]
}

/// Hospital lookups: the stored catalog, the live directory and the fallback list.
pub struct HospitalService {
    directory: Arc<dyn FacilityDirectory>,
    storage: Arc<dyn HospitalStorageEngine>,
    cache: Cache<String, Arc<Vec<RankedHospital>>>,
    config: HospitalServiceConfig,
}

impl HospitalService {
    pub fn new(
        directory: Arc<dyn FacilityDirectory>,
        storage: Arc<dyn HospitalStorageEngine>,
        config: HospitalServiceConfig,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();
        Self { directory, storage, cache, config }
    }

    /// Service backed by the Healthsites.io client described by `config`.
    pub fn with_healthsites(storage: Arc<dyn HospitalStorageEngine>, config: HospitalServiceConfig) -> Result<Self> {
        let client = HealthsitesClient::new(config.healthsites_url.clone(), config.request_timeout)?;
        Ok(Self::new(Arc::new(client), storage, config))
    }

    /// Seeds the stored catalog. Returns the size of the seed list.
    pub async fn sync_catalog(&self) -> Result<usize> {
        let seed = catalog_seed();
        let mut inserted = 0;
        for hospital in &seed {
            if self.storage.insert_if_absent(hospital).await? {
                inserted += 1;
            }
        }
        info!("Hospital catalog synced: {} new of {}", inserted, seed.len());
        Ok(seed.len())
    }

    /// Stored hospitals within `radius_km`, nearest first.
    pub async fn nearby(&self, origin: GeoPoint, radius_km: f64) -> Result<Vec<RankedHospital>> {
        let hospitals = self.storage.list_hospitals().await?;
        Ok(rank_by_proximity(&hospitals, origin, radius_km)
            .into_iter()
            .map(RankedHospital::rounded)
            .collect())
    }

    /// Live lookup with a TTL cache. Falls back to the built-in list if the
    /// directory fails; fallback results are not cached.
    pub async fn real_nearby(&self, origin: GeoPoint, radius_km: f64) -> Vec<RankedHospital> {
        let cache_key = format!("{},{},{}", origin.latitude, origin.longitude, radius_km);
        if let Some(cached) = self.cache.get(&cache_key).await {
            debug!("Hospital cache hit for {}", cache_key);
            return (*cached).clone();
        }

        match self.directory.fetch_facilities(origin, radius_km).await {
            Ok(records) => {
                let ranked: Vec<RankedHospital> = rank_by_proximity(&records, origin, radius_km)
                    .into_iter()
                    .map(RankedHospital::rounded)
                    .collect();
                info!("Fetched {} hospitals for {}", ranked.len(), cache_key);
                self.cache.insert(cache_key, Arc::new(ranked.clone())).await;
                ranked
            }
            Err(e) => {
                warn!("Hospital directory lookup failed, serving fallback list: {}", e);
                self.fallback_hospitals(origin)
            }
        }
    }

    /// Live lookup within the search radius, filtered by name.
    pub async fn search(&self, query: &str, origin: GeoPoint) -> Vec<RankedHospital> {
        let needle = query.to_lowercase();
        self.real_nearby(origin, self.config.search_radius_km)
            .await
            .into_iter()
            .filter(|ranked| ranked.hospital.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// The built-in list ranked from `origin` without a radius limit.
    pub fn fallback_hospitals(&self, origin: GeoPoint) -> Vec<RankedHospital> {
        let records: Vec<HospitalRecord> = FALLBACK_HOSPITALS.iter().map(SampleHospital::record).collect();
        rank_by_proximity(&records, origin, f64::INFINITY)
            .into_iter()
            .take(self.config.fallback_limit)
            .map(RankedHospital::rounded)
            .collect()
    }
}

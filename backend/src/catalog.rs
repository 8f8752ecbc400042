use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::error::PlanError;
use crate::models::{Car, Pricing};

static DEFAULT_CARS: Lazy<Vec<Car>> = Lazy::new(|| {
    vec![
        car("sedan", "Swift Dzire", "Sedan", 4, 3900.0, 12.0, 300.0),
        car("suv", "Mahindra XUV700", "SUV", 6, 4900.0, 15.0, 400.0),
        car("innova", "Toyota Innova Crysta", "MUV", 7, 5900.0, 18.0, 500.0),
        car("tempo", "Force Tempo Traveller", "Van", 12, 8900.0, 24.0, 600.0),
    ]
});

fn car(
    id: &str,
    name: &str,
    category: &str,
    seats: u8,
    base_fare: f64,
    per_km_rate: f64,
    driver_allowance_per_day: f64,
) -> Car {
    Car {
        id: id.into(),
        name: name.into(),
        category: category.into(),
        seats,
        base_fare,
        per_km_rate,
        driver_allowance_per_day,
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read car catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse car catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("car catalog is empty")]
    Empty,
    #[error("car catalog lists {0:?} more than once")]
    DuplicateId(String),
    #[error("car {0:?} has a negative or non-finite price")]
    InvalidPricing(String),
}

/// Rentable vehicles. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct Catalog {
    cars: Vec<Car>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            cars: DEFAULT_CARS.clone(),
        }
    }

    pub fn from_cars(cars: Vec<Car>) -> Result<Self, CatalogError> {
        if cars.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for car in &cars {
            if !seen.insert(car.id.as_str()) {
                return Err(CatalogError::DuplicateId(car.id.clone()));
            }
            let prices = [car.base_fare, car.per_km_rate, car.driver_allowance_per_day];
            if prices.iter().any(|price| !price.is_finite() || *price < 0.0) {
                return Err(CatalogError::InvalidPricing(car.id.clone()));
            }
        }
        Ok(Self { cars })
    }

    /// Load a JSON array of cars.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)?;
        let cars: Vec<Car> = serde_json::from_str(&body)?;
        tracing::info!("Loaded {} car(s) from {}", cars.len(), path.display());
        Self::from_cars(cars)
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn find(&self, id: &str) -> Option<&Car> {
        self.cars.iter().find(|car| car.id == id)
    }

    pub fn car(&self, id: &str) -> Result<&Car, PlanError> {
        self.find(id)
            .ok_or_else(|| PlanError::UnknownCar(id.to_string()))
    }

    pub fn pricing(&self, id: &str) -> Result<Pricing, PlanError> {
        self.car(id).map(Car::pricing)
    }
}
